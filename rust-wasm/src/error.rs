//! Error types for smoothed region growing.

use thiserror::Error;

/// Result type for region growing operations.
pub type GrowResult<T> = Result<T, GrowError>;

/// Errors that can occur while growing labelled regions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum GrowError {
    /// A grid has unsupported dimensionality or inconsistent extents.
    #[error("invalid {what} shape: {reason}")]
    InvalidShape {
        /// Which input was rejected ("labels", "kernel", ...).
        what: &'static str,
        /// Human readable description of the problem.
        reason: String,
    },

    /// The labelled volume has no positive seed voxel.
    #[error("labelled input contains no positive seed labels")]
    EmptyInput,

    /// The barrier border is too thin for the structural element.
    #[error(
        "barrier border too thin at voxel {voxel:?}: axis {axis} needs {required} voxel(s) of margin"
    )]
    MalformedBorder {
        /// Non-barrier voxel whose kernel neighbourhood leaves the volume.
        voxel: (usize, usize, usize),
        /// Axis (0 = x, 1 = y, 2 = z) on which the neighbourhood overflows.
        axis: usize,
        /// Margin the kernel needs on that side of the voxel.
        required: usize,
    },

    /// The internal iteration ceiling was exceeded.
    #[error("maximum number of iterations ({limit}) has been exceeded")]
    IterationBudgetExceeded {
        /// The ceiling that was in force.
        limit: usize,
    },
}
