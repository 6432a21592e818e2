use rand::Rng;
use serde::{Serialize, Deserialize};
use std::ops::Index;

use crate::error::{NnError, Result};

/// Dense row-major matrix of `f64`.
///
/// Operations come in two families:
/// - in-place operations (`add_matrix`, `mul_scalar`, `map`, ...) mutate the
///   receiver and hand it back as `&mut Self` so calls can be chained;
/// - allocating operations (`transpose`, `Matrix::subtract`,
///   `Matrix::product`, ...) leave their operands untouched and return a new
///   matrix.
///
/// Every row always holds exactly `cols` values, which is why the storage is
/// private. Serialized form carries the shape next to the rows, so zero-sized
/// matrices survive a round trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MatrixRepr", into = "MatrixRepr")]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<Vec<f64>>,
}

impl Matrix {
    /// All-zero matrix. Zero-sized shapes are allowed; arithmetic on them is
    /// a no-op.
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix {
            rows,
            cols,
            data: vec![vec![0.0; cols]; rows],
        }
    }

    /// All-zero matrix that rejects zero dimensions.
    pub fn new(rows: usize, cols: usize) -> Result<Matrix> {
        if rows == 0 {
            return Err(NnError::InvalidTopology { what: "matrix rows" });
        }
        if cols == 0 {
            return Err(NnError::InvalidTopology { what: "matrix cols" });
        }
        Ok(Matrix::zeros(rows, cols))
    }

    pub fn identity(n: usize) -> Matrix {
        let mut res = Matrix::zeros(n, n);
        res.map(|_, i, j| if i == j { 1.0 } else { 0.0 });
        res
    }

    /// Matrix of the given shape filled from `uniform[-1, 1)` using `rng`.
    pub fn random_with<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Matrix {
        let mut res = Matrix::zeros(rows, cols);
        res.randomize_with(rng);
        res
    }

    /// Column matrix (`len x 1`) holding `values` in order.
    pub fn from_array(values: &[f64]) -> Matrix {
        let mut res = Matrix::zeros(values.len(), 1);
        res.map(|_, i, _| values[i]);
        res
    }

    /// Builds a matrix from a list of rows.
    ///
    /// Fails with `MissingOperand` when no rows are given (the column count
    /// cannot be inferred) and with `ShapeMismatch` when the rows are ragged.
    pub fn from_rows(data: Vec<Vec<f64>>) -> Result<Matrix> {
        let cols = match data.first() {
            Some(row) => row.len(),
            None => return Err(NnError::MissingOperand { op: "from_rows" }),
        };
        if let Some(bad) = data.iter().find(|row| row.len() != cols) {
            return Err(NnError::ShapeMismatch {
                op: "from_rows",
                left: (1, cols),
                right: (1, bad.len()),
            });
        }
        Ok(Matrix {
            rows: data.len(),
            cols,
            data,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.data.get(row).and_then(|r| r.get(col)).copied()
    }

    /// Flattens row-major: `[i][j]` lands at index `i * cols + j`.
    pub fn to_array(&self) -> Vec<f64> {
        self.data.iter().flatten().copied().collect()
    }

    // ---------------------------------------------------------------------
    // In-place operations
    // ---------------------------------------------------------------------

    /// Refills every cell from `uniform[-1, 1)` using the thread-local RNG.
    pub fn randomize(&mut self) -> &mut Self {
        self.randomize_with(&mut rand::thread_rng())
    }

    pub fn randomize_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> &mut Self {
        self.map(|_, _, _| rng.gen_range(-1.0..1.0))
    }

    /// Applies `functor(value, row, col)` to every cell in row-major order.
    pub fn map<F>(&mut self, mut functor: F) -> &mut Self
    where
        F: FnMut(f64, usize, usize) -> f64,
    {
        for (i, row) in self.data.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = functor(*cell, i, j);
            }
        }
        self
    }

    pub fn add_scalar(&mut self, n: f64) -> &mut Self {
        self.map(|x, _, _| x + n)
    }

    pub fn mul_scalar(&mut self, n: f64) -> &mut Self {
        self.map(|x, _, _| x * n)
    }

    /// Elementwise sum with a matrix of identical shape.
    pub fn add_matrix(&mut self, rhs: &Matrix) -> Result<&mut Self> {
        self.check_same_shape("add", rhs)?;
        Ok(self.map(|x, i, j| x + rhs.data[i][j]))
    }

    /// Hadamard product with a matrix of identical shape.
    pub fn mul_elementwise(&mut self, rhs: &Matrix) -> Result<&mut Self> {
        self.check_same_shape("multiply", rhs)?;
        Ok(self.map(|x, i, j| x * rhs.data[i][j]))
    }

    // ---------------------------------------------------------------------
    // Allocating operations
    // ---------------------------------------------------------------------

    pub fn transpose(&self) -> Matrix {
        let mut res = Matrix::zeros(self.cols, self.rows);

        for i in 0..res.rows {
            for j in 0..res.cols {
                res.data[i][j] = self.data[j][i];
            }
        }

        res
    }

    /// `a - b` into a new matrix; neither operand is touched.
    pub fn subtract(a: &Matrix, b: &Matrix) -> Result<Matrix> {
        a.check_same_shape("subtract", b)?;

        let mut res = a.clone();
        res.map(|x, i, j| x - b.data[i][j]);
        Ok(res)
    }

    /// True matrix product `a x b`, shaped `rows(a) x cols(b)`.
    pub fn product(a: &Matrix, b: &Matrix) -> Result<Matrix> {
        if a.cols != b.rows {
            return Err(NnError::ShapeMismatch {
                op: "product",
                left: a.shape(),
                right: b.shape(),
            });
        }

        let mut res = Matrix::zeros(a.rows, b.cols);

        for i in 0..res.rows {
            for j in 0..res.cols {
                let mut sum = 0.0;

                for k in 0..a.cols {
                    sum += a.data[i][k] * b.data[k][j];
                }

                res.data[i][j] = sum;
            }
        }

        Ok(res)
    }

    fn check_same_shape(&self, op: &'static str, rhs: &Matrix) -> Result<()> {
        if self.rows != rhs.rows || self.cols != rhs.cols {
            return Err(NnError::ShapeMismatch {
                op,
                left: self.shape(),
                right: rhs.shape(),
            });
        }
        Ok(())
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Matrix::zeros(0, 0)
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    fn index(&self, (row, col): (usize, usize)) -> &f64 {
        &self.data[row][col]
    }
}

/// Wire shape of a `Matrix`; validated on the way in.
#[derive(Serialize, Deserialize)]
struct MatrixRepr {
    rows: usize,
    cols: usize,
    data: Vec<Vec<f64>>,
}

impl TryFrom<MatrixRepr> for Matrix {
    type Error = NnError;

    fn try_from(repr: MatrixRepr) -> Result<Matrix> {
        let declared = (repr.rows, repr.cols);
        if repr.data.len() != repr.rows {
            return Err(NnError::ShapeMismatch {
                op: "deserialize",
                left: declared,
                right: (repr.data.len(), repr.cols),
            });
        }
        if let Some(bad) = repr.data.iter().find(|row| row.len() != repr.cols) {
            return Err(NnError::ShapeMismatch {
                op: "deserialize",
                left: declared,
                right: (repr.rows, bad.len()),
            });
        }
        Ok(Matrix {
            rows: repr.rows,
            cols: repr.cols,
            data: repr.data,
        })
    }
}

impl From<Matrix> for MatrixRepr {
    fn from(m: Matrix) -> Self {
        MatrixRepr {
            rows: m.rows,
            cols: m.cols,
            data: m.data,
        }
    }
}
