//! Dense 3D voxel grids
//!
//! `Grid3D` owns a flat buffer in Fortran order (index = i + j*nx + k*nx*ny,
//! matching NIfTI) together with its dimensions. 2D inputs are stored as
//! volumes with `nz == 1`.

use ndarray::{Array3, ArrayBase, Data, Dimension, ShapeBuilder};

use crate::error::{GrowError, GrowResult};

/// Unit offsets to the six face-connected neighbours: +x, -x, +y, -y, +z, -z
pub const NEIGHBOR_OFFSETS: [(isize, isize, isize); 6] = [
    (1, 0, 0),
    (-1, 0, 0),
    (0, 1, 0),
    (0, -1, 0),
    (0, 0, 1),
    (0, 0, -1),
];

/// Convert 3D index to flat index (Fortran order / column-major)
#[inline(always)]
pub fn idx3d(i: usize, j: usize, k: usize, nx: usize, ny: usize) -> usize {
    i + j * nx + k * nx * ny
}

/// Convert flat index back to (i, j, k)
#[inline(always)]
pub fn coords3d(idx: usize, nx: usize, ny: usize) -> (usize, usize, usize) {
    let k = idx / (nx * ny);
    let rem = idx - k * nx * ny;
    let j = rem / nx;
    (rem - j * nx, j, k)
}

/// Flat indices of the in-bounds 6-connected neighbours of `idx`
pub fn neighbors6(
    idx: usize,
    dims: (usize, usize, usize),
) -> impl Iterator<Item = usize> {
    let (nx, ny, nz) = dims;
    let (i, j, k) = coords3d(idx, nx, ny);

    NEIGHBOR_OFFSETS.iter().filter_map(move |&(di, dj, dk)| {
        let ni = i as isize + di;
        let nj = j as isize + dj;
        let nk = k as isize + dk;

        if ni >= 0 && ni < nx as isize && nj >= 0 && nj < ny as isize && nk >= 0 && nk < nz as isize {
            Some(idx3d(ni as usize, nj as usize, nk as usize, nx, ny))
        } else {
            None
        }
    })
}

/// Owned 3D grid in Fortran order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid3D<T> {
    data: Vec<T>,
    dims: (usize, usize, usize),
}

impl<T: Copy> Grid3D<T> {
    /// Wrap a flat Fortran-order buffer
    ///
    /// Fails if any extent is zero or the buffer length is not nx*ny*nz.
    pub fn new(data: Vec<T>, dims: (usize, usize, usize)) -> GrowResult<Self> {
        let (nx, ny, nz) = dims;
        if nx == 0 || ny == 0 || nz == 0 {
            return Err(GrowError::InvalidShape {
                what: "grid",
                reason: format!("zero extent in dimensions {}x{}x{}", nx, ny, nz),
            });
        }
        if data.len() != nx * ny * nz {
            return Err(GrowError::InvalidShape {
                what: "grid",
                reason: format!(
                    "buffer holds {} values but dimensions {}x{}x{} need {}",
                    data.len(), nx, ny, nz, nx * ny * nz
                ),
            });
        }
        Ok(Self { data, dims })
    }

    /// Wrap a flat 2D buffer (index = i + j*nx) as a single-slice volume
    pub fn from_2d(data: Vec<T>, dims: (usize, usize)) -> GrowResult<Self> {
        Self::new(data, (dims.0, dims.1, 1))
    }

    /// Grid of the given dimensions with every voxel set to `value`
    pub fn filled(value: T, dims: (usize, usize, usize)) -> GrowResult<Self> {
        Self::new(vec![value; dims.0 * dims.1 * dims.2], dims)
    }

    /// Grid whose value at (i, j, k) is `f(i, j, k)`
    ///
    /// Panics if any extent is zero.
    pub fn from_fn<F>(dims: (usize, usize, usize), mut f: F) -> Self
    where
        F: FnMut(usize, usize, usize) -> T,
    {
        let (nx, ny, nz) = dims;
        assert!(nx > 0 && ny > 0 && nz > 0, "grid extents must be non-zero, got {:?}", dims);

        let mut data = Vec::with_capacity(nx * ny * nz);
        for k in 0..nz {
            for j in 0..ny {
                for i in 0..nx {
                    data.push(f(i, j, k));
                }
            }
        }
        Self { data, dims }
    }

    /// Copy a 2D or 3D ndarray into a grid
    ///
    /// Axis 0 of the array becomes `i` (fastest varying in the flat buffer).
    pub fn from_ndarray<S, D>(array: &ArrayBase<S, D>) -> GrowResult<Self>
    where
        S: Data<Elem = T>,
        D: Dimension,
    {
        let dims = match *array.shape() {
            [nx, ny] => (nx, ny, 1),
            [nx, ny, nz] => (nx, ny, nz),
            _ => {
                return Err(GrowError::InvalidShape {
                    what: "array",
                    reason: format!("expected 2 or 3 dimensions, got {}", array.ndim()),
                })
            }
        };

        // Reversing the axes makes logical iteration order run i fastest
        let data: Vec<T> = array.view().reversed_axes().iter().copied().collect();
        Self::new(data, dims)
    }

    /// Copy into an (nx, ny, nz) ndarray with Fortran memory layout
    pub fn to_ndarray(&self) -> GrowResult<Array3<T>> {
        Array3::from_shape_vec(self.dims.f(), self.data.clone()).map_err(|e| {
            GrowError::InvalidShape {
                what: "array",
                reason: e.to_string(),
            }
        })
    }

    #[inline]
    pub fn dims(&self) -> (usize, usize, usize) {
        self.dims
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    #[inline]
    pub fn index_of(&self, i: usize, j: usize, k: usize) -> usize {
        idx3d(i, j, k, self.dims.0, self.dims.1)
    }

    #[inline]
    pub fn coords_of(&self, idx: usize) -> (usize, usize, usize) {
        coords3d(idx, self.dims.0, self.dims.1)
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize, k: usize) -> T {
        self.data[self.index_of(i, j, k)]
    }

    #[inline]
    pub fn set(&mut self, i: usize, j: usize, k: usize, value: T) {
        let idx = self.index_of(i, j, k);
        self.data[idx] = value;
    }
}
