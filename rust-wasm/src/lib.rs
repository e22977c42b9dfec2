//! Region-Grow-WASM: smoothed multi-label region growing for WebAssembly
//!
//! Grows labelled seed regions of a segmented volume into a masked area,
//! using structural-element weighted votes so that the boundaries between
//! regions follow the kernel's shape rather than a jagged voxel front.
//! Typical use is refining lobe or airway segmentations in medical images.
//!
//! # Modules
//! - `volume`: Fortran-order 3D grids and 6-neighbourhood indexing
//! - `label_index`: Dense indexing of seed labels
//! - `vote_counts`: Per-voxel, per-label vote accumulation
//! - `frontier`: Round-based candidate scheduling
//! - `region_grow`: The growing engine
//! - `kernels`: Structural elements (sphere, box, cross)
//! - `utils`: Border padding

// Core modules
pub mod error;
pub mod volume;
pub mod label_index;
pub mod vote_counts;
pub mod frontier;
pub mod region_grow;

// Supporting modules
pub mod kernels;
pub mod utils;

pub use error::{GrowError, GrowResult};
pub use region_grow::{
    grow, grow_default, grow_with_border, grow_with_progress, GrowOutcome, GrowParams,
    DEFAULT_MAX_ITERATIONS,
};
pub use volume::Grid3D;

use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    fn log(s: &str);
}

#[allow(unused_macros)]
macro_rules! console_log {
    ($($t:tt)*) => (log(&format_args!($($t)*).to_string()))
}

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

fn to_js_error(err: GrowError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn params_from(max_iterations: Option<u32>) -> GrowParams {
    GrowParams {
        max_iterations: max_iterations.map(|n| n as usize),
    }
}

fn finish(outcome: GrowOutcome) -> Vec<i8> {
    if outcome.truncated {
        console_log!(
            "WASM region growing: terminating as the specified maximum iteration number has been reached ({} rounds)",
            outcome.rounds
        );
    }
    console_log!(
        "WASM region growing complete: {} rounds, {} voxels labelled",
        outcome.rounds, outcome.voxels_labeled
    );
    outcome.labels.into_vec()
}

// ============================================================================
// WASM Exports: Smoothed Region Growing
// ============================================================================

/// Smoothed region growing from a bordered label image
///
/// # Arguments
/// * `labels` - Int8Array of labels (nx * ny * nz), Fortran order.
///   > 0 seed regions, 0 mask to grow into, < 0 fixed barriers.
///   Must carry a barrier border at least as thick as the kernel's reach.
/// * `nx`, `ny`, `nz` - Label volume dimensions (nz = 1 for 2D)
/// * `kernel` - Int8Array structural element (kx * ky * kz), > 0 = member
/// * `kx`, `ky`, `kz` - Kernel dimensions
/// * `max_iterations` - Optional round limit; when reached the partial
///   result is returned
///
/// # Returns
/// Grown labels as Int8Array (nx * ny * nz)
#[wasm_bindgen]
pub fn smoothed_region_growing_wasm(
    labels: &[i8],
    nx: usize, ny: usize, nz: usize,
    kernel: &[i8],
    kx: usize, ky: usize, kz: usize,
    max_iterations: Option<u32>,
) -> Result<Vec<i8>, JsValue> {
    console_log!("WASM smoothed region growing: {}x{}x{}, kernel {}x{}x{}",
                 nx, ny, nz, kx, ky, kz);

    let labels = Grid3D::new(labels.to_vec(), (nx, ny, nz)).map_err(to_js_error)?;
    let kernel = Grid3D::new(kernel.to_vec(), (kx, ky, kz)).map_err(to_js_error)?;

    let outcome = region_grow::grow(&labels, &kernel, &params_from(max_iterations))
        .map_err(to_js_error)?;

    Ok(finish(outcome))
}

/// Smoothed region growing with progress callback
///
/// `progress_callback(round, voxels_labelled)` is called after every round.
#[wasm_bindgen]
pub fn smoothed_region_growing_wasm_with_progress(
    labels: &[i8],
    nx: usize, ny: usize, nz: usize,
    kernel: &[i8],
    kx: usize, ky: usize, kz: usize,
    max_iterations: Option<u32>,
    progress_callback: &js_sys::Function,
) -> Result<Vec<i8>, JsValue> {
    console_log!("WASM smoothed region growing with progress: {}x{}x{}, kernel {}x{}x{}",
                 nx, ny, nz, kx, ky, kz);

    let labels = Grid3D::new(labels.to_vec(), (nx, ny, nz)).map_err(to_js_error)?;
    let kernel = Grid3D::new(kernel.to_vec(), (kx, ky, kz)).map_err(to_js_error)?;

    let callback = progress_callback.clone();
    let outcome = region_grow::grow_with_progress(
        &labels, &kernel, &params_from(max_iterations),
        |round, labelled| {
            let this = JsValue::null();
            let _ = callback.call2(&this,
                &JsValue::from(round as u32),
                &JsValue::from(labelled as u32));
        }
    ).map_err(to_js_error)?;

    Ok(finish(outcome))
}

/// Smoothed region growing with a spherical structural element
///
/// The label image does not need a barrier border: one is added to fit the
/// sphere and removed from the result.
///
/// # Arguments
/// * `labels` - Int8Array of labels (nx * ny * nz), Fortran order
/// * `nx`, `ny`, `nz` - Array dimensions
/// * `radius` - Sphere radius in mm
/// * `vsx`, `vsy`, `vsz` - Voxel sizes in mm
/// * `max_iterations` - Optional round limit
///
/// # Returns
/// Grown labels as Int8Array (nx * ny * nz)
#[wasm_bindgen]
pub fn smoothed_region_growing_sphere_wasm(
    labels: &[i8],
    nx: usize, ny: usize, nz: usize,
    radius: f64,
    vsx: f64, vsy: f64, vsz: f64,
    max_iterations: Option<u32>,
) -> Result<Vec<i8>, JsValue> {
    console_log!("WASM smoothed region growing (sphere): {}x{}x{}, radius={:.1}mm, voxel=({:.2},{:.2},{:.2})",
                 nx, ny, nz, radius, vsx, vsy, vsz);

    let labels = Grid3D::new(labels.to_vec(), (nx, ny, nz)).map_err(to_js_error)?;
    let kernel = kernels::spherical_element(radius, (vsx, vsy, vsz));
    let (kx, ky, kz) = kernel.dims();
    console_log!("WASM structural element: {}x{}x{}", kx, ky, kz);

    let outcome = region_grow::grow_with_border(&labels, &kernel, &params_from(max_iterations))
        .map_err(to_js_error)?;

    Ok(finish(outcome))
}

/// Spherical structural element for use with `smoothed_region_growing_wasm`
///
/// # Returns
/// Flattened array: first three elements are kx, ky, kz, followed by the
/// kx * ky * kz element values
#[wasm_bindgen]
pub fn spherical_element_wasm(radius: f64, vsx: f64, vsy: f64, vsz: f64) -> Vec<i32> {
    let kernel = kernels::spherical_element(radius, (vsx, vsy, vsz));
    let (kx, ky, kz) = kernel.dims();

    let mut result = vec![kx as i32, ky as i32, kz as i32];
    result.extend(kernel.as_slice().iter().map(|&v| v as i32));
    result
}

/// Get version information
#[wasm_bindgen]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        let version = get_version();
        assert!(!version.is_empty());
    }

    #[test]
    fn test_spherical_element_wasm_layout() {
        let flat = spherical_element_wasm(1.0, 1.0, 1.0, 1.0);
        assert_eq!(&flat[..3], &[3, 3, 3]);
        assert_eq!(flat.len(), 3 + 27);
        // Centre of the 3x3x3 element
        assert_eq!(flat[3 + 13], 1);
        assert_eq!(flat[3..].iter().sum::<i32>(), 7);
    }
}
