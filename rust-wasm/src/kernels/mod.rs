//! Structural elements for region growing
//!
//! This module provides the kernels that weight votes during growth:
//! - Spherical element sized in mm for smooth boundaries
//! - Box, cross and single-cell elements

pub mod structural_element;

pub use structural_element::*;
