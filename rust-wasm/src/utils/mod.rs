//! Utility functions for label volumes
//!
//! This module provides:
//! - Barrier border padding and removal

pub mod padding;

pub use padding::*;
