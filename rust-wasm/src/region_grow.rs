//! Smoothed multi-label region growing
//!
//! Grows every positively labelled seed region into the zero-valued mask at
//! the same time, one 6-connected layer per round. Which label a voxel takes
//! is decided by kernel-weighted votes from already labelled voxels, so a
//! spherical structural element yields smooth boundaries between regions
//! instead of a jagged voxel-by-voxel front.
//!
//! Label semantics of the input volume:
//! - `> 0` seed region label
//! - `== 0` mask to grow into
//! - `< 0` fixed barrier, never overwritten
//!
//! Voxels that no region can reach are left at 0.

use log::{debug, warn};

use crate::error::{GrowError, GrowResult};
use crate::frontier::FrontierScheduler;
use crate::kernels::structural_element::structural_element_margin;
use crate::label_index::LabelIndexer;
use crate::utils::padding::{add_border, remove_border};
use crate::volume::{neighbors6, Grid3D};
use crate::vote_counts::{KernelSupport, VoteCountField};

/// Round ceiling used when the caller gives none
pub const DEFAULT_MAX_ITERATIONS: usize = 1_000_000_000;

/// Parameters for region growing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GrowParams {
    /// Maximum number of rounds.
    ///
    /// `Some(n)`: growth stops after n rounds and the partial result is
    /// returned with `truncated` set. `None`: `DEFAULT_MAX_ITERATIONS` applies
    /// and exceeding it is an error.
    pub max_iterations: Option<usize>,
}

impl GrowParams {
    pub fn with_max_iterations(max_iterations: usize) -> Self {
        Self {
            max_iterations: Some(max_iterations),
        }
    }
}

/// Result of a growing run
#[derive(Debug, Clone)]
pub struct GrowOutcome {
    /// Output label volume, same shape as the input
    pub labels: Grid3D<i8>,
    /// Number of rounds run
    pub rounds: usize,
    /// Number of mask voxels that received a label
    pub voxels_labeled: usize,
    /// True if an explicit iteration limit stopped growth early
    pub truncated: bool,
}

/// How the round limit is enforced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IterationBudget {
    /// Caller-chosen limit: stop and return what has been grown
    Explicit(usize),
    /// Internal safety ceiling: exceeding it is an error
    Ceiling(usize),
}

impl From<&GrowParams> for IterationBudget {
    fn from(params: &GrowParams) -> Self {
        match params.max_iterations {
            Some(n) => IterationBudget::Explicit(n),
            None => IterationBudget::Ceiling(DEFAULT_MAX_ITERATIONS),
        }
    }
}

/// Grow labelled regions into the mask
///
/// # Arguments
/// * `labels` - Input labels; needs a border of negative voxels at least as
///   thick as the kernel's reach on each axis
/// * `kernel` - Structural element; positive cells are neighbourhood members
/// * `params` - Iteration limit
///
/// # Returns
/// Grown labels with run statistics
pub fn grow(
    labels: &Grid3D<i8>,
    kernel: &Grid3D<i8>,
    params: &GrowParams,
) -> GrowResult<GrowOutcome> {
    grow_with_progress(labels, kernel, params, |_, _| {})
}

/// Grow with the internal iteration ceiling
pub fn grow_default(labels: &Grid3D<i8>, kernel: &Grid3D<i8>) -> GrowResult<GrowOutcome> {
    grow(labels, kernel, &GrowParams::default())
}

/// Grow with progress callback
///
/// `progress_callback(round, voxels_labeled)` is called after every round.
pub fn grow_with_progress<F>(
    labels: &Grid3D<i8>,
    kernel: &Grid3D<i8>,
    params: &GrowParams,
    progress_callback: F,
) -> GrowResult<GrowOutcome>
where
    F: FnMut(usize, usize),
{
    grow_within_budget(labels, kernel, IterationBudget::from(params), progress_callback)
}

fn grow_within_budget<F>(
    labels: &Grid3D<i8>,
    kernel: &Grid3D<i8>,
    budget: IterationBudget,
    mut progress_callback: F,
) -> GrowResult<GrowOutcome>
where
    F: FnMut(usize, usize),
{
    let dims = labels.dims();
    let input = labels.as_slice();

    let indexer = LabelIndexer::build(input)?;
    debug!(
        "region growing {}x{}x{}: {} label(s) {:?}",
        dims.0, dims.1, dims.2, indexer.num_labels(), indexer.labels()
    );

    // Every seed voxel votes before growth starts
    let support = KernelSupport::new(kernel, dims);
    if support.is_empty() {
        warn!("structural element has no positive cells; only label {} can grow", indexer.label_of(0));
    }
    let mut votes = VoteCountField::new(dims, indexer.num_labels(), support);
    for (idx, &label) in input.iter().enumerate() {
        if let Some(label_index) = indexer.index_of(label) {
            votes.splat(idx, label_index)?;
        }
    }

    let mut output = labels.clone();
    let mut frontier = FrontierScheduler::seed_initial(output.as_slice(), dims);
    let mut voxels_labeled = 0usize;
    let mut truncated = false;

    while frontier.has_pending() {
        // Starting another round would take the counter past the limit
        match budget {
            IterationBudget::Explicit(limit) if frontier.round_count() >= limit => {
                warn!(
                    "terminating as the specified maximum iteration number ({}) has been reached; {} voxel(s) still pending",
                    limit,
                    frontier.pending()
                );
                truncated = true;
                break;
            }
            IterationBudget::Ceiling(limit) if frontier.round_count() >= limit => {
                return Err(GrowError::IterationBudgetExceeded { limit });
            }
            _ => {}
        }

        let out = output.as_mut_slice();
        for p in frontier.drain_round() {
            if out[p] != 0 {
                continue;
            }

            // The vote winner must also be directly 6-connected to p
            let candidate = votes.argmax_label(p);
            let label = indexer.label_of(candidate);
            if !neighbors6(p, dims).any(|n| out[n] == label) {
                continue;
            }

            out[p] = label;
            votes.splat(p, candidate)?;
            voxels_labeled += 1;

            for n in neighbors6(p, dims) {
                if out[n] == 0 {
                    frontier.schedule_for_next_round(n);
                }
            }
        }

        frontier.promote(output.as_slice());
        progress_callback(frontier.round_count(), voxels_labeled);
    }

    debug!(
        "region growing finished after {} round(s), {} voxel(s) labelled",
        frontier.round_count(),
        voxels_labeled
    );

    Ok(GrowOutcome {
        labels: output,
        rounds: frontier.round_count(),
        voxels_labeled,
        truncated,
    })
}

/// Grow labels that do not carry their own barrier border
///
/// Pads `labels` with -1 by the kernel's reach on each axis, grows, and crops
/// the result back to the input shape.
pub fn grow_with_border(
    labels: &Grid3D<i8>,
    kernel: &Grid3D<i8>,
    params: &GrowParams,
) -> GrowResult<GrowOutcome> {
    grow_with_border_and_progress(labels, kernel, params, |_, _| {})
}

/// `grow_with_border` with progress callback
pub fn grow_with_border_and_progress<F>(
    labels: &Grid3D<i8>,
    kernel: &Grid3D<i8>,
    params: &GrowParams,
    progress_callback: F,
) -> GrowResult<GrowOutcome>
where
    F: FnMut(usize, usize),
{
    let margin = structural_element_margin(kernel);
    let padded = add_border(labels, margin, -1)?;

    let mut outcome = grow_with_progress(&padded, kernel, params, progress_callback)?;
    outcome.labels = remove_border(&outcome.labels, margin)?;
    Ok(outcome)
}
