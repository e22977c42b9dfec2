//! Border padding for label volumes
//!
//! Region growing reads the structural element's neighbourhood around every
//! labelled voxel without bounds checks, so volumes need a barrier border.
//! These helpers add one and strip it again.

use crate::error::{GrowError, GrowResult};
use crate::volume::{idx3d, Grid3D};

/// Pad a 3D grid with `value` on every side
///
/// # Arguments
/// * `grid` - Input grid (nx * ny * nz)
/// * `pad` - Border thickness (px, py, pz) added on both sides of each axis
/// * `value` - Fill value for the border
///
/// # Returns
/// Grid of dimensions (nx + 2px, ny + 2py, nz + 2pz)
pub fn add_border<T: Copy>(
    grid: &Grid3D<T>,
    pad: (usize, usize, usize),
    value: T,
) -> GrowResult<Grid3D<T>> {
    let (nx, ny, nz) = grid.dims();
    let (px, py, pz) = pad;
    let new_nx = nx + 2 * px;
    let new_ny = ny + 2 * py;
    let new_nz = nz + 2 * pz;

    let mut padded = vec![value; new_nx * new_ny * new_nz];
    let data = grid.as_slice();

    // Fortran order: index = i + j*nx + k*nx*ny
    for k in 0..nz {
        for j in 0..ny {
            for i in 0..nx {
                let old_idx = idx3d(i, j, k, nx, ny);
                let new_idx = idx3d(i + px, j + py, k + pz, new_nx, new_ny);
                padded[new_idx] = data[old_idx];
            }
        }
    }

    Grid3D::new(padded, (new_nx, new_ny, new_nz))
}

/// Strip a border added by `add_border`
pub fn remove_border<T: Copy>(
    padded: &Grid3D<T>,
    pad: (usize, usize, usize),
) -> GrowResult<Grid3D<T>> {
    let (padded_nx, padded_ny, padded_nz) = padded.dims();
    let (px, py, pz) = pad;

    if 2 * px >= padded_nx || 2 * py >= padded_ny || 2 * pz >= padded_nz {
        return Err(GrowError::InvalidShape {
            what: "padded grid",
            reason: format!(
                "border {:?} leaves nothing of a {}x{}x{} grid",
                pad, padded_nx, padded_ny, padded_nz
            ),
        });
    }

    let orig_nx = padded_nx - 2 * px;
    let orig_ny = padded_ny - 2 * py;
    let orig_nz = padded_nz - 2 * pz;
    let src = padded.as_slice();

    let mut data = Vec::with_capacity(orig_nx * orig_ny * orig_nz);
    for k in 0..orig_nz {
        for j in 0..orig_ny {
            for i in 0..orig_nx {
                data.push(src[idx3d(i + px, j + py, k + pz, padded_nx, padded_ny)]);
            }
        }
    }

    Grid3D::new(data, (orig_nx, orig_ny, orig_nz))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_border_layout() {
        let grid = Grid3D::from_2d(vec![1i8, 2, 3, 4], (2, 2)).unwrap();
        let padded = add_border(&grid, (1, 1, 0), -1).unwrap();

        assert_eq!(padded.dims(), (4, 4, 1));
        assert_eq!(
            padded.as_slice(),
            &[
                -1, -1, -1, -1,
                -1, 1, 2, -1,
                -1, 3, 4, -1,
                -1, -1, -1, -1,
            ]
        );
    }

    #[test]
    fn test_border_is_stripped_exactly() {
        let grid = Grid3D::from_fn((3, 4, 2), |i, j, k| (i + 10 * j + 100 * k) as i16);
        let padded = add_border(&grid, (2, 1, 3), -5).unwrap();
        assert_eq!(padded.dims(), (7, 6, 8));
        assert_eq!(padded.get(0, 0, 0), -5);
        assert_eq!(padded.get(2, 1, 3), 0);

        let stripped = remove_border(&padded, (2, 1, 3)).unwrap();
        assert_eq!(stripped, grid);
    }

    #[test]
    fn test_remove_border_too_thick() {
        let grid = Grid3D::filled(0u8, (4, 4, 1)).unwrap();
        assert!(matches!(
            remove_border(&grid, (2, 0, 0)),
            Err(GrowError::InvalidShape { .. })
        ));
    }
}
