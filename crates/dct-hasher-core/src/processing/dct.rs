//! # Separable 2D DCT-II
//!
//! The 2D transform of a square matrix is computed as two passes of a 1D DCT-II:
//! transform every row, transpose, transform every row again, transpose back.
//!
//! The 1D transform uses the plain (unnormalized) definition
//!
//! ```text
//! y[k] = 2 * sum_{n=0}^{N-1} x[n] * cos(pi * k * (2n + 1) / (2N))
//! ```
//!
//! No orthonormal scaling is applied, so coefficient values line up with the
//! reference hash corpora. The cosine table is computed once per [`Dct2d`] plan.

use image::GrayImage;
use std::f64::consts::PI;

use crate::error::{Error, Result};

/// Side length of the matrix the DCT hash transforms
pub const DCT_SIZE: usize = 32;

/// A real-valued square matrix stored in row-major order
#[derive(Debug, Clone, PartialEq)]
pub struct SquareMatrix {
    size: usize,
    values: Vec<f64>,
}

/// Output of [`Dct2d::transform`]; coefficient (0, 0) is the DC term
pub type FrequencyMatrix = SquareMatrix;

impl SquareMatrix {
    pub fn zeros(size: usize) -> Self {
        Self {
            size,
            values: vec![0.0; size * size],
        }
    }

    /// Wrap row-major values; `values.len()` must be `size * size`
    pub fn from_values(size: usize, values: Vec<f64>) -> Result<Self> {
        if values.len() != size * size {
            return Err(Error::dimension(
                "matrix",
                (size as u32, size as u32),
                (values.len() as u32, 1),
            ));
        }
        Ok(Self { size, values })
    }

    /// Intensities of a square greyscale grid as floats
    pub fn from_grey(grid: &GrayImage) -> Result<Self> {
        let (width, height) = grid.dimensions();
        if width != height {
            return Err(Error::dimension("matrix", (width, width), (width, height)));
        }

        let values = grid.pixels().map(|p| p.0[0] as f64).collect();
        Ok(Self {
            size: width as usize,
            values,
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row * self.size + col]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.values[row * self.size + col] = value;
    }

    pub fn row(&self, row: usize) -> &[f64] {
        let start = row * self.size;
        &self.values[start..start + self.size]
    }

    pub fn transpose(&self) -> Self {
        let mut out = Self::zeros(self.size);
        for r in 0..self.size {
            for c in 0..self.size {
                out.values[c * self.size + r] = self.values[r * self.size + c];
            }
        }
        out
    }

    /// Sum of every element
    pub fn sum(&self) -> f64 {
        self.values.iter().sum()
    }
}

/// A DCT-II plan for one matrix size
#[derive(Debug, Clone)]
pub struct Dct2d {
    size: usize,
    // cos_table[k * size + n] = cos(pi * k * (2n + 1) / 2N)
    cos_table: Vec<f64>,
}

impl Dct2d {
    pub fn new(size: usize) -> Self {
        let n = size as f64;
        let cos_table = (0..size)
            .flat_map(|k| {
                (0..size).map(move |x| ((2 * x + 1) as f64 * k as f64 * PI / (2.0 * n)).cos())
            })
            .collect();

        Self { size, cos_table }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// 1D DCT-II of `input` into `output`; both must be `size` long
    pub fn transform_1d(&self, input: &[f64], output: &mut [f64]) {
        debug_assert_eq!(input.len(), self.size);
        debug_assert_eq!(output.len(), self.size);

        for (k, out) in output.iter_mut().enumerate() {
            let basis = &self.cos_table[k * self.size..(k + 1) * self.size];
            let sum: f64 = input.iter().zip(basis).map(|(x, c)| x * c).sum();
            *out = 2.0 * sum;
        }
    }

    fn transform_rows(&self, matrix: &SquareMatrix) -> SquareMatrix {
        let mut out = SquareMatrix::zeros(self.size);
        for r in 0..self.size {
            let start = r * self.size;
            self.transform_1d(matrix.row(r), &mut out.values[start..start + self.size]);
        }
        out
    }

    /// 2D DCT-II of a matrix of the plan's size
    pub fn transform(&self, matrix: &SquareMatrix) -> Result<FrequencyMatrix> {
        if matrix.size() != self.size {
            let (expected, actual) = (self.size as u32, matrix.size() as u32);
            return Err(Error::dimension(
                "dct",
                (expected, expected),
                (actual, actual),
            ));
        }

        let rows = self.transform_rows(matrix).transpose();
        Ok(self.transform_rows(&rows).transpose())
    }
}

impl Default for Dct2d {
    fn default() -> Self {
        Self::new(DCT_SIZE)
    }
}
