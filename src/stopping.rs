use num_complex::Complex64;

use crate::options::Options;

/// Which of the three sifting stopping regimes is active, resolved once from
/// [`Options`] (`fixe` and `fixe_h` are mutually exclusive, enforced by
/// [`Options::validate`]). See SPEC_FULL.md §4.5.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Criterion {
    /// Huang's theta-criterion: stop once the envelope-amplitude-normalized
    /// mean stays below `threshold_1` on all but a fraction `alpha` of
    /// samples, and never exceeds `threshold_2` anywhere.
    Default {
        threshold_1: f64,
        threshold_2: f64,
        alpha: f64,
    },
    /// Sift exactly this many times, no criterion involved.
    Fixe(usize),
    /// Sift until the extrema/zero-crossing counts stay within 1 of each
    /// other for this many consecutive iterations.
    FixeH(usize),
}

impl Criterion {
    pub fn from_options(o: &Options) -> Self {
        if o.fixe != 0 {
            Criterion::Fixe(o.fixe)
        } else if o.fixe_h != 0 {
            Criterion::FixeH(o.fixe_h)
        } else {
            Criterion::Default {
                threshold_1: o.threshold_1,
                threshold_2: o.threshold_2,
                alpha: o.alpha,
            }
        }
    }
}

/// Evaluate the theta-criterion for one sifting iteration.
///
/// The reference implementation's `fixe` branch assigns a 4-tuple result to a
/// 2-tuple target and is unreachable in practice; this crate does not carry
/// that bug forward; `Criterion::Fixe`/`Criterion::FixeH` are evaluated in
/// `sift::sift_mode` itself rather than through this function. See SPEC_FULL.md §9.
pub fn evaluate_default(mean: &[Complex64], amplitude: &[f64], n_extrema: usize, threshold_1: f64, threshold_2: f64, alpha: f64) -> bool {
    if n_extrema < 3 {
        return true;
    }
    let n = mean.len();
    let mut exceeding_1 = 0usize;
    let mut exceeds_2 = false;
    for i in 0..n {
        let ratio = if amplitude[i] > 0.0 { mean[i].norm() / amplitude[i] } else { 0.0 };
        if ratio > threshold_1 {
            exceeding_1 += 1;
        }
        if ratio > threshold_2 {
            exceeds_2 = true;
        }
    }
    let frac = exceeding_1 as f64 / n as f64;
    frac < alpha && !exceeds_2
}

/// Whether the extrema count and zero-crossing count of one sifting
/// iteration's candidate are "stable" in Huang's S-number sense: they differ
/// by at most one.
pub fn extrema_stable(n_extrema: usize, n_zero: usize) -> bool {
    (n_extrema as i64 - n_zero as i64).abs() <= 1
}
