use std::ops::{Add, Index, IndexMut, Mul};

use crate::constants::{EXPM_SCALE_THRESHOLD, EXPM_TAYLOR_TERMS};

/// Small dense row-major matrix
///
/// Sized for state-space models of a handful of states; no attempt is made
/// at blocking or SIMD.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n, n);
        for i in 0..n {
            m[(i, i)] = 1.0;
        }
        m
    }

    /// Build from row slices. All rows must have the same length.
    pub fn from_rows(rows: &[&[f64]]) -> Self {
        let cols = rows.first().map_or(0, |r| r.len());
        let mut data = Vec::with_capacity(rows.len() * cols);
        for row in rows {
            assert_eq!(row.len(), cols, "ragged matrix rows");
            data.extend_from_slice(row);
        }
        Self {
            rows: rows.len(),
            cols,
            data,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    pub fn scale(&self, k: f64) -> Self {
        Self {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(|v| v * k).collect(),
        }
    }

    /// Matrix-vector product.
    pub fn mul_vec(&self, v: &[f64]) -> Vec<f64> {
        assert_eq!(self.cols, v.len(), "matrix dimension mismatch");
        (0..self.rows)
            .map(|i| {
                self.data[i * self.cols..(i + 1) * self.cols]
                    .iter()
                    .zip(v)
                    .map(|(a, b)| a * b)
                    .sum()
            })
            .collect()
    }

    /// Column `j` copied out, restricted to the first `n` rows.
    pub fn column_head(&self, j: usize, n: usize) -> Vec<f64> {
        (0..n).map(|i| self[(i, j)]).collect()
    }

    /// Top-left `n x n` block.
    pub fn top_left(&self, n: usize) -> Matrix {
        let mut out = Matrix::zeros(n, n);
        for i in 0..n {
            for j in 0..n {
                out[(i, j)] = self[(i, j)];
            }
        }
        out
    }

    /// Maximum absolute column sum.
    pub fn norm_1(&self) -> f64 {
        (0..self.cols)
            .map(|j| (0..self.rows).map(|i| self[(i, j)].abs()).sum::<f64>())
            .fold(0.0, f64::max)
    }

    /// Matrix exponential by scaling and squaring with a truncated Taylor
    /// series.
    pub fn expm(&self) -> Matrix {
        assert!(self.is_square(), "expm requires a square matrix");
        let n = self.rows;

        let norm = self.norm_1();
        if !norm.is_finite() {
            return Matrix {
                rows: n,
                cols: n,
                data: vec![f64::NAN; n * n],
            };
        }
        let squarings = if norm > EXPM_SCALE_THRESHOLD {
            (norm / EXPM_SCALE_THRESHOLD).log2().ceil() as i32
        } else {
            0
        };
        let scaled = self.scale(0.5_f64.powi(squarings));

        let mut result = Matrix::identity(n);
        let mut term = Matrix::identity(n);
        for k in 1..=EXPM_TAYLOR_TERMS {
            term = (&term * &scaled).scale(1.0 / k as f64);
            result = &result + &term;
        }

        for _ in 0..squarings {
            result = &result * &result;
        }
        result
    }
}

impl Add for &Matrix {
    type Output = Matrix;

    fn add(self, other: &Matrix) -> Matrix {
        assert_eq!((self.rows, self.cols), (other.rows, other.cols));
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self
                .data
                .iter()
                .zip(other.data.iter())
                .map(|(a, b)| a + b)
                .collect(),
        }
    }
}

impl Mul for &Matrix {
    type Output = Matrix;

    fn mul(self, other: &Matrix) -> Matrix {
        assert_eq!(self.cols, other.rows, "matrix dimension mismatch");
        let mut out = Matrix::zeros(self.rows, other.cols);
        for i in 0..self.rows {
            for k in 0..self.cols {
                let a = self[(i, k)];
                if a == 0.0 {
                    continue;
                }
                for j in 0..other.cols {
                    out[(i, j)] += a * other[(k, j)];
                }
            }
        }
        out
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    fn index(&self, (i, j): (usize, usize)) -> &f64 {
        &self.data[i * self.cols + j]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut f64 {
        &mut self.data[i * self.cols + j]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_expm_zero_is_identity() {
        let e = Matrix::zeros(3, 3).expm();
        assert_eq!(e, Matrix::identity(3));
    }

    #[test]
    fn test_expm_diagonal() {
        let m = Matrix::from_rows(&[&[-2.0, 0.0], &[0.0, 3.5]]);
        let e = m.expm();
        assert_relative_eq!(e[(0, 0)], (-2.0_f64).exp(), max_relative = 1e-12);
        assert_relative_eq!(e[(1, 1)], 3.5_f64.exp(), max_relative = 1e-12);
        assert_relative_eq!(e[(0, 1)], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_expm_large_scalar() {
        let e = Matrix::from_rows(&[&[-250.0]]).expm();
        assert_relative_eq!(e[(0, 0)], (-250.0_f64).exp(), max_relative = 1e-9);
    }

    #[test]
    fn test_expm_non_finite_returns_nan() {
        let e = Matrix::from_rows(&[&[f64::INFINITY, 0.0], &[0.0, -1.0]]).expm();
        assert_eq!(e.rows(), 2);
        assert!((0..2).all(|i| (0..2).all(|j| e[(i, j)].is_nan())));
    }

    #[test]
    fn test_expm_rotation() {
        // exp([[0, -w], [w, 0]]) is a rotation by w
        let w = 1.3_f64;
        let e = Matrix::from_rows(&[&[0.0, -w], &[w, 0.0]]).expm();
        assert_relative_eq!(e[(0, 0)], w.cos(), epsilon = 1e-12);
        assert_relative_eq!(e[(1, 0)], w.sin(), epsilon = 1e-12);
    }

    #[test]
    fn test_expm_nilpotent() {
        let e = Matrix::from_rows(&[&[0.0, 1.0], &[0.0, 0.0]]).expm();
        assert_eq!(e, Matrix::from_rows(&[&[1.0, 1.0], &[0.0, 1.0]]));
    }

    #[test]
    fn test_mul_vec() {
        let m = Matrix::from_rows(&[&[1.0, 2.0], &[3.0, 4.0]]);
        assert_eq!(m.mul_vec(&[1.0, 1.0]), vec![3.0, 7.0]);
    }
}
