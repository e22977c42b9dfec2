//! Structural elements for smoothed region growing
//!
//! Binary kernels (1 = neighbourhood member, 0 = outside) centred at
//! (kx/2, ky/2, kz/2). A spherical element gives smooth region boundaries;
//! the cross element makes votes equal to 6-neighbour counts.

use crate::volume::Grid3D;
use crate::vote_counts::KernelSupport;

/// Binary sphere of given radius in mm
///
/// The box is `2*floor(radius/vs) + 1` voxels along each axis, so the centre
/// voxel is always included.
///
/// # Arguments
/// * `radius` - Sphere radius in mm
/// * `voxel_size` - (vsx, vsy, vsz) in mm
pub fn spherical_element(radius: f64, voxel_size: (f64, f64, f64)) -> Grid3D<i8> {
    let (vsx, vsy, vsz) = voxel_size;
    let radius = radius.max(0.0);
    let r_squared = radius * radius;

    let half = |vs: f64| -> usize {
        if vs > 0.0 && vs.is_finite() {
            (radius / vs).floor() as usize
        } else {
            0
        }
    };
    let (hx, hy, hz) = (half(vsx), half(vsy), half(vsz));

    Grid3D::from_fn((2 * hx + 1, 2 * hy + 1, 2 * hz + 1), |i, j, k| {
        let dx = (i as f64 - hx as f64) * vsx;
        let dy = (j as f64 - hy as f64) * vsy;
        let dz = (k as f64 - hz as f64) * vsz;

        let dist_sq = dx * dx + dy * dy + dz * dz;
        if dist_sq <= r_squared || (i == hx && j == hy && k == hz) {
            1
        } else {
            0
        }
    })
}

/// Solid cuboid, every cell a member
///
/// Panics if any extent is zero.
pub fn box_element(dims: (usize, usize, usize)) -> Grid3D<i8> {
    Grid3D::from_fn(dims, |_, _, _| 1)
}

/// Single-cell element
///
/// Only the voxel itself votes, so unlabelled voxels never receive votes and
/// the first label always wins the count.
pub fn point_element() -> Grid3D<i8> {
    Grid3D::from_fn((1, 1, 1), |_, _, _| 1)
}

/// 3x3x3 element of the centre and its six face neighbours
pub fn cross_element() -> Grid3D<i8> {
    Grid3D::from_fn((3, 3, 3), |i, j, k| {
        let off_centre = (i != 1) as u8 + (j != 1) as u8 + (k != 1) as u8;
        if off_centre <= 1 {
            1
        } else {
            0
        }
    })
}

/// Middle z-slice of an element, for growing in single-slice volumes
pub fn central_slice(kernel: &Grid3D<i8>) -> Grid3D<i8> {
    let (kx, ky, kz) = kernel.dims();
    let k = kz / 2;
    Grid3D::from_fn((kx, ky, 1), |i, j, _| kernel.get(i, j, k))
}

/// Border thickness (x, y, z) that a labelled volume needs for this element
pub fn structural_element_margin(kernel: &Grid3D<i8>) -> (usize, usize, usize) {
    KernelSupport::new(kernel, kernel.dims()).margin()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn members(kernel: &Grid3D<i8>) -> usize {
        kernel.as_slice().iter().filter(|&&v| v > 0).count()
    }

    #[test]
    fn test_sphere_unit_radius_is_cross() {
        let sphere = spherical_element(1.0, (1.0, 1.0, 1.0));
        assert_eq!(sphere, cross_element());
        assert_eq!(members(&sphere), 7);
    }

    #[test]
    fn test_sphere_radius_two() {
        let sphere = spherical_element(2.0, (1.0, 1.0, 1.0));
        assert_eq!(sphere.dims(), (5, 5, 5));
        // Lattice points with x²+y²+z² <= 4
        assert_eq!(members(&sphere), 33);
        assert_eq!(sphere.get(2, 2, 2), 1);
        assert_eq!(sphere.get(0, 2, 2), 1);
        assert_eq!(sphere.get(0, 0, 2), 0);
    }

    #[test]
    fn test_sphere_anisotropic_voxels() {
        // 3 mm slices: radius 2 mm stays within the centre slice
        let sphere = spherical_element(2.0, (1.0, 1.0, 3.0));
        assert_eq!(sphere.dims(), (5, 5, 1));
        assert_eq!(structural_element_margin(&sphere), (2, 2, 0));
    }

    #[test]
    fn test_small_radius_keeps_centre() {
        let sphere = spherical_element(0.4, (1.0, 1.0, 1.0));
        assert_eq!(sphere, point_element());
    }

    #[test]
    fn test_central_slice_of_cross() {
        let plus = central_slice(&cross_element());
        assert_eq!(plus.dims(), (3, 3, 1));
        assert_eq!(plus.as_slice(), &[0, 1, 0, 1, 1, 1, 0, 1, 0]);
    }

    #[test]
    fn test_margins() {
        assert_eq!(structural_element_margin(&point_element()), (0, 0, 0));
        assert_eq!(structural_element_margin(&box_element((5, 3, 1))), (2, 1, 0));
        // Even extent: centre rounds down, reach below dominates
        assert_eq!(structural_element_margin(&box_element((4, 1, 1))), (2, 0, 0));
    }
}
