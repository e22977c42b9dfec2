//! Per-voxel, per-label vote accumulation
//!
//! Every labelled voxel casts one vote for its label onto each voxel covered
//! by the structural element centred on it. The field therefore holds, for
//! every voxel q and label l, the number of voxels labelled l whose kernel
//! neighbourhood covers q. Votes are only ever added since labels are never
//! removed.

use crate::error::{GrowError, GrowResult};
use crate::volume::{coords3d, Grid3D};

/// Positive cells of a structural element, as flat offsets into a volume
#[derive(Debug, Clone)]
pub struct KernelSupport {
    /// Flat index offsets (relative to the kernel centre) of positive cells
    offsets: Vec<isize>,
    /// Per-axis reach of the positive cells below the centre
    below: [usize; 3],
    /// Per-axis reach of the positive cells above the centre
    above: [usize; 3],
}

impl KernelSupport {
    /// Precompute the offsets of `kernel`'s positive cells for a volume of
    /// dimensions `volume_dims`.
    ///
    /// The kernel centre is (kx/2, ky/2, kz/2), rounding down.
    pub fn new(kernel: &Grid3D<i8>, volume_dims: (usize, usize, usize)) -> Self {
        let (kx, ky, kz) = kernel.dims();
        let (nx, ny, _) = volume_dims;
        let centre = [(kx / 2) as isize, (ky / 2) as isize, (kz / 2) as isize];

        let mut offsets = Vec::new();
        let mut below = [0usize; 3];
        let mut above = [0usize; 3];

        for k in 0..kz {
            for j in 0..ky {
                for i in 0..kx {
                    if kernel.get(i, j, k) <= 0 {
                        continue;
                    }

                    let rel = [
                        i as isize - centre[0],
                        j as isize - centre[1],
                        k as isize - centre[2],
                    ];
                    for axis in 0..3 {
                        if rel[axis] < 0 {
                            below[axis] = below[axis].max((-rel[axis]) as usize);
                        } else {
                            above[axis] = above[axis].max(rel[axis] as usize);
                        }
                    }

                    offsets.push(rel[0] + rel[1] * nx as isize + rel[2] * (nx * ny) as isize);
                }
            }
        }

        KernelSupport { offsets, below, above }
    }

    /// Number of positive cells
    #[inline]
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// (below, above) reach of the positive support on each axis
    pub fn extent(&self) -> ([usize; 3], [usize; 3]) {
        (self.below, self.above)
    }

    /// Margin needed on each axis so that any voxel can be a kernel centre
    pub fn margin(&self) -> (usize, usize, usize) {
        (
            self.below[0].max(self.above[0]),
            self.below[1].max(self.above[1]),
            self.below[2].max(self.above[2]),
        )
    }

    /// Check that the support centred at (i, j, k) stays inside the volume.
    ///
    /// Returns the first offending axis and the margin that axis needs.
    pub fn check_fits(
        &self,
        (i, j, k): (usize, usize, usize),
        (nx, ny, nz): (usize, usize, usize),
    ) -> Result<(), (usize, usize)> {
        if self.offsets.is_empty() {
            return Ok(());
        }

        let pos = [i, j, k];
        let size = [nx, ny, nz];
        for axis in 0..3 {
            if pos[axis] < self.below[axis] {
                return Err((axis, self.below[axis]));
            }
            if pos[axis] + self.above[axis] >= size[axis] {
                return Err((axis, self.above[axis]));
            }
        }
        Ok(())
    }
}

/// Vote counts for every voxel and every dense label index
///
/// Layout is label-major: count for (voxel, label) lives at
/// `label * n_voxels + voxel`.
pub struct VoteCountField {
    counts: Vec<u32>,
    n_voxels: usize,
    num_labels: usize,
    support: KernelSupport,
    dims: (usize, usize, usize),
}

impl VoteCountField {
    /// Zero-initialised field for a volume of `dims` and `num_labels` labels
    pub fn new(dims: (usize, usize, usize), num_labels: usize, support: KernelSupport) -> Self {
        let n_voxels = dims.0 * dims.1 * dims.2;
        VoteCountField {
            counts: vec![0; n_voxels * num_labels],
            n_voxels,
            num_labels,
            support,
            dims,
        }
    }

    /// Add one vote for `label_index` to every voxel in the kernel
    /// neighbourhood of `center`.
    ///
    /// Fails with `MalformedBorder` if the neighbourhood would leave the
    /// volume; no counts are touched in that case.
    pub fn splat(&mut self, center: usize, label_index: usize) -> GrowResult<()> {
        let voxel = coords3d(center, self.dims.0, self.dims.1);
        self.support
            .check_fits(voxel, self.dims)
            .map_err(|(axis, required)| GrowError::MalformedBorder { voxel, axis, required })?;

        let base = label_index * self.n_voxels;
        let counts = &mut self.counts[base..base + self.n_voxels];
        for &offset in &self.support.offsets {
            counts[(center as isize + offset) as usize] += 1;
        }
        Ok(())
    }

    /// Votes for `label_index` at `voxel`
    #[inline]
    pub fn count(&self, voxel: usize, label_index: usize) -> u32 {
        self.counts[label_index * self.n_voxels + voxel]
    }

    /// Dense label index with the strictly greatest count at `voxel`
    ///
    /// Ties go to the lowest index; a voxel without votes yields 0.
    pub fn argmax_label(&self, voxel: usize) -> usize {
        let mut max_count = 0u32;
        let mut max_index = 0usize;

        for label_index in 0..self.num_labels {
            let c = self.counts[label_index * self.n_voxels + voxel];
            if c > max_count {
                max_count = c;
                max_index = label_index;
            }
        }

        max_index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::volume::idx3d;

    fn cross_kernel_2d() -> Grid3D<i8> {
        // 3x3 plus shape
        Grid3D::from_2d(vec![0, 1, 0, 1, 1, 1, 0, 1, 0], (3, 3)).unwrap()
    }

    #[test]
    fn test_support_offsets_and_extent() {
        let support = KernelSupport::new(&cross_kernel_2d(), (10, 10, 1));
        assert_eq!(support.len(), 5);
        assert_eq!(support.extent(), ([1, 1, 0], [1, 1, 0]));
        assert_eq!(support.margin(), (1, 1, 0));

        let mut offsets = support.offsets.clone();
        offsets.sort();
        assert_eq!(offsets, vec![-10, -1, 0, 1, 10]);
    }

    #[test]
    fn test_even_kernel_centre_rounds_down() {
        // 2x1x1 kernel, both cells positive: centre is cell 1, so reach is 1 below, 0 above
        let kernel = Grid3D::new(vec![1i8, 1], (2, 1, 1)).unwrap();
        let support = KernelSupport::new(&kernel, (5, 1, 1));
        assert_eq!(support.extent(), ([1, 0, 0], [0, 0, 0]));
    }

    #[test]
    fn test_check_fits() {
        let support = KernelSupport::new(&cross_kernel_2d(), (5, 5, 1));
        assert!(support.check_fits((1, 1, 0), (5, 5, 1)).is_ok());
        assert_eq!(support.check_fits((0, 2, 0), (5, 5, 1)), Err((0, 1)));
        assert_eq!(support.check_fits((2, 4, 0), (5, 5, 1)), Err((1, 1)));
    }

    #[test]
    fn test_splat_and_argmax() {
        let dims = (5, 5, 1);
        let mut field = VoteCountField::new(dims, 2, KernelSupport::new(&cross_kernel_2d(), dims));

        let a = idx3d(1, 2, 0, 5, 5);
        let b = idx3d(3, 2, 0, 5, 5);
        field.splat(a, 0).unwrap();
        field.splat(b, 1).unwrap();
        field.splat(idx3d(3, 1, 0, 5, 5), 1).unwrap();

        let centre = idx3d(2, 2, 0, 5, 5);
        assert_eq!(field.count(centre, 0), 1);
        assert_eq!(field.count(centre, 1), 1);
        assert_eq!(field.count(a, 0), 1);
        assert_eq!(field.count(a, 1), 0);

        // Tie at centre resolves to the lower index
        assert_eq!(field.argmax_label(centre), 0);
        // (3,2) sees two votes for label 1
        assert_eq!(field.count(b, 1), 2);
        assert_eq!(field.argmax_label(b), 1);
        // No votes at all -> index 0
        assert_eq!(field.argmax_label(idx3d(0, 4, 0, 5, 5)), 0);
    }

    #[test]
    fn test_splat_rejects_edge_voxel() {
        let dims = (5, 5, 1);
        let mut field = VoteCountField::new(dims, 1, KernelSupport::new(&cross_kernel_2d(), dims));

        let edge = idx3d(4, 2, 0, 5, 5);
        let err = field.splat(edge, 0).unwrap_err();
        assert_eq!(err, GrowError::MalformedBorder { voxel: (4, 2, 0), axis: 0, required: 1 });
        // Nothing was counted, not even the centre
        assert_eq!(field.count(edge, 0), 0);
    }
}
