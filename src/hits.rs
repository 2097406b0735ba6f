//! Hit batches: the four coordinate columns fed to the graph builder.

use crate::error::{Error, Result};
use ndarray::{Array2, ArrayView2};

/// A single detector hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// x position (m).
    pub x: f32,
    /// y position (m).
    pub y: f32,
    /// z position (m).
    pub z: f32,
    /// Time-like coordinate. Its unit depends on the correlation mode.
    pub t: f32,
}

impl Hit {
    /// Squared spatial distance to `other`.
    #[inline]
    pub fn distance_sq(&self, other: &Hit) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        dx * dx + dy * dy + dz * dz
    }
}

/// Column-oriented batch of hits.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HitBatch {
    x: Vec<f32>,
    y: Vec<f32>,
    z: Vec<f32>,
    t: Vec<f32>,
}

impl HitBatch {
    /// Build a batch from four columns of equal length.
    pub fn new(x: Vec<f32>, y: Vec<f32>, z: Vec<f32>, t: Vec<f32>) -> Result<Self> {
        let n = x.len();
        for (name, len) in [("y", y.len()), ("z", z.len()), ("t", t.len())] {
            if len != n {
                return Err(Error::shape(
                    format!("{n} values in every column"),
                    format!("{len} values in column {name}"),
                ));
            }
        }
        Ok(Self { x, y, z, t })
    }

    /// Build a batch from an `n x 4` array with columns `x, y, z, t`.
    pub fn from_array(data: ArrayView2<'_, f32>) -> Result<Self> {
        if data.ncols() != 4 {
            return Err(Error::shape("4 columns", format!("{} columns", data.ncols())));
        }
        let col = |c: usize| data.column(c).to_vec();
        Self::new(col(0), col(1), col(2), col(3))
    }

    /// Number of hits.
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Whether the batch is empty.
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Hit at index `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= len()`.
    #[inline]
    pub fn get(&self, i: usize) -> Hit {
        Hit {
            x: self.x[i],
            y: self.y[i],
            z: self.z[i],
            t: self.t[i],
        }
    }

    /// Sub-batch `[start, end)`, clamped to the batch length.
    pub fn slice(&self, start: usize, end: usize) -> HitBatch {
        let end = end.min(self.len());
        let start = start.min(end);
        HitBatch {
            x: self.x[start..end].to_vec(),
            y: self.y[start..end].to_vec(),
            z: self.z[start..end].to_vec(),
            t: self.t[start..end].to_vec(),
        }
    }

    /// Copy of the batch with every time value multiplied by `factor`.
    ///
    /// Converts between `c·t` (metres) and nanoseconds.
    pub fn scale_time(&self, factor: f32) -> HitBatch {
        HitBatch {
            t: self.t.iter().map(|t| t * factor).collect(),
            ..self.clone()
        }
    }

    /// The batch as an `n x 4` array.
    pub fn to_array(&self) -> Array2<f32> {
        let mut out = Array2::zeros((self.len(), 4));
        for (i, mut row) in out.rows_mut().into_iter().enumerate() {
            row[0] = self.x[i];
            row[1] = self.y[i];
            row[2] = self.z[i];
            row[3] = self.t[i];
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_unequal_columns_rejected() {
        let err = HitBatch::new(vec![0.0; 3], vec![0.0; 3], vec![0.0; 2], vec![0.0; 3]).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { .. }));
    }

    #[test]
    fn test_array_round_trip() {
        let data = array![[0.0f32, 1.0, 2.0, 3.0], [4.0, 5.0, 6.0, 7.0]];
        let batch = HitBatch::from_array(data.view()).unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.get(1).z, 6.0);
        assert_eq!(batch.to_array(), data);
    }

    #[test]
    fn test_wrong_column_count() {
        let data = Array2::<f32>::zeros((5, 3));
        assert!(HitBatch::from_array(data.view()).is_err());
    }

    #[test]
    fn test_slice_clamps() {
        let batch = HitBatch::new(vec![1.0, 2.0, 3.0], vec![0.0; 3], vec![0.0; 3], vec![0.0; 3]).unwrap();
        assert_eq!(batch.slice(1, 10).len(), 2);
        assert_eq!(batch.slice(5, 10).len(), 0);
        assert_eq!(batch.slice(1, 2).get(0).x, 2.0);
    }
}
