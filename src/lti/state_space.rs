use super::matrix::Matrix;

/// SISO state-space model `x' = A x + B u`, `y = C x + D u`
#[derive(Debug, Clone, PartialEq)]
pub struct StateSpace {
    a: Matrix,
    b: Vec<f64>,
    c: Vec<f64>,
    d: f64,
}

impl StateSpace {
    /// # Panics
    /// Panics if the dimensions of `a`, `b` and `c` disagree.
    pub fn new(a: Matrix, b: Vec<f64>, c: Vec<f64>, d: f64) -> Self {
        assert!(a.is_square(), "A must be square");
        assert_eq!(a.rows(), b.len(), "B must have one entry per state");
        assert_eq!(a.rows(), c.len(), "C must have one entry per state");
        Self { a, b, c, d }
    }

    /// Number of states.
    pub fn order(&self) -> usize {
        self.b.len()
    }

    pub fn a(&self) -> &Matrix {
        &self.a
    }

    pub fn b(&self) -> &[f64] {
        &self.b
    }

    pub fn c(&self) -> &[f64] {
        &self.c
    }

    pub fn d(&self) -> f64 {
        self.d
    }

    /// `y = C x + D u`
    pub fn output(&self, x: &[f64], u: f64) -> f64 {
        self.c.iter().zip(x).map(|(c, x)| c * x).sum::<f64>() + self.d * u
    }

    /// Exact first-order-hold discretization over an interval `h`.
    ///
    /// Returns `(Ad, Bd0, Bd1)` such that
    /// `x[k+1] = Ad x[k] + Bd0 u[k] + Bd1 u[k+1]` when `u` is linear between
    /// the two samples. Obtained from the exponential of
    /// `[[A h, B h, 0], [0, 0, 1], [0, 0, 0]]`.
    pub fn discretize_foh(&self, h: f64) -> Discretized {
        let n = self.order();
        let mut m = Matrix::zeros(n + 2, n + 2);
        for i in 0..n {
            for j in 0..n {
                m[(i, j)] = self.a[(i, j)] * h;
            }
            m[(i, n)] = self.b[i] * h;
        }
        m[(n, n + 1)] = 1.0;

        let e = m.expm();
        let ad = e.top_left(n);
        let bd1 = e.column_head(n + 1, n);
        let bd0: Vec<f64> = e
            .column_head(n, n)
            .iter()
            .zip(&bd1)
            .map(|(g0, g1)| g0 - g1)
            .collect();

        Discretized { ad, bd0, bd1 }
    }
}

/// One interval's worth of discretized dynamics
#[derive(Debug, Clone)]
pub struct Discretized {
    pub ad: Matrix,
    pub bd0: Vec<f64>,
    pub bd1: Vec<f64>,
}

impl Discretized {
    /// Advance the state from sample `k` to `k + 1`.
    pub fn step(&self, x: &[f64], u0: f64, u1: f64) -> Vec<f64> {
        self.ad
            .mul_vec(x)
            .into_iter()
            .zip(self.bd0.iter().zip(&self.bd1))
            .map(|(ax, (b0, b1))| ax + b0 * u0 + b1 * u1)
            .collect()
    }
}
