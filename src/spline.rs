/// Natural cubic spline: interpolates `(x, y)` knots with a piecewise cubic
/// that has continuous first and second derivatives everywhere, and zero
/// second derivative at both endpoints. Built by solving a tridiagonal system
/// for the knot second derivatives (Thomas algorithm), then evaluated
/// per-interval. See SPEC_FULL.md §4.3.
///
/// This replaces a teacher dependency (`splines`) that only offers
/// local/C1 schemes (Catmull-Rom, Bezier); the envelope fit this crate builds
/// needs a global C2 solve.
#[derive(Debug, Clone)]
pub struct NaturalCubicSpline {
    x: Vec<f64>,
    y: Vec<f64>,
    /// second derivative at each knot
    m: Vec<f64>,
}

impl NaturalCubicSpline {
    /// Fit a natural cubic spline through `(x[i], y[i])`. `x` must be
    /// strictly increasing and at least 2 knots long.
    pub fn fit(x: &[f64], y: &[f64]) -> Option<Self> {
        let n = x.len();
        if n < 2 || y.len() != n {
            return None;
        }
        if x.windows(2).any(|w| w[1] <= w[0]) {
            return None;
        }
        if n == 2 {
            return Some(Self {
                x: x.to_vec(),
                y: y.to_vec(),
                m: vec![0.0, 0.0],
            });
        }

        let h: Vec<f64> = x.windows(2).map(|w| w[1] - w[0]).collect();

        // tridiagonal system for interior second derivatives, natural
        // (m[0] = m[n-1] = 0) boundary conditions; Thomas algorithm.
        let interior = n - 2;
        let mut sub = vec![0.0; interior];
        let mut diag = vec![0.0; interior];
        let mut sup = vec![0.0; interior];
        let mut rhs = vec![0.0; interior];
        for i in 0..interior {
            let k = i + 1;
            sub[i] = h[k - 1];
            diag[i] = 2.0 * (h[k - 1] + h[k]);
            sup[i] = h[k];
            rhs[i] = 6.0 * ((y[k + 1] - y[k]) / h[k] - (y[k] - y[k - 1]) / h[k - 1]);
        }

        let mut cp = vec![0.0; interior];
        let mut dp = vec![0.0; interior];
        if interior > 0 {
            cp[0] = sup[0] / diag[0];
            dp[0] = rhs[0] / diag[0];
            for i in 1..interior {
                let denom = diag[i] - sub[i] * cp[i - 1];
                cp[i] = sup[i] / denom;
                dp[i] = (rhs[i] - sub[i] * dp[i - 1]) / denom;
            }
        }

        let mut m = vec![0.0; n];
        if interior > 0 {
            m[interior] = dp[interior - 1];
            for i in (0..interior - 1).rev() {
                m[i + 1] = dp[i] - cp[i] * m[i + 2];
            }
        }

        Some(Self {
            x: x.to_vec(),
            y: y.to_vec(),
            m,
        })
    }

    /// Evaluate the spline at `t`, clamping to the boundary cubic beyond the
    /// fitted range rather than extrapolating it (callers mirror far enough
    /// past the signal's edges that this should never trigger in practice).
    pub fn eval(&self, t: f64) -> f64 {
        let n = self.x.len();
        let k = match self.x.partition_point(|&xi| xi <= t) {
            0 => 0,
            p if p >= n => n - 2,
            p => p - 1,
        };
        let h = self.x[k + 1] - self.x[k];
        let a = (self.x[k + 1] - t) / h;
        let b = (t - self.x[k]) / h;
        a * self.y[k]
            + b * self.y[k + 1]
            + ((a.powi(3) - a) * self.m[k] + (b.powi(3) - b) * self.m[k + 1]) * h * h / 6.0
    }

    /// Evaluate the spline at every point in `ts`.
    pub fn eval_many(&self, ts: &[f64]) -> Vec<f64> {
        ts.iter().map(|&t| self.eval(t)).collect()
    }
}
