use num_complex::Complex64;

use crate::error::EmdError;
use crate::extrema::has_enough_structure;
use crate::mean_amplitude;
use crate::options::{Mode, Options};
use crate::stopping::{evaluate_default, extrema_stable, Criterion};

/// Result of sifting one candidate down to an intrinsic mode function.
pub struct SiftResult {
    pub imf: Vec<Complex64>,
    pub iterations: usize,
}

/// What one call to [`sift_mode`] produced: either a sifted IMF, or a signal
/// that the residue has underflowed and the whole decomposition should stop
/// (SPEC_FULL.md §4.6 step 3, §4.7 state machine: `Sifting` + amplitude
/// underflow → `Terminated`). Not an `EmdError` variant: the distilled spec
/// treats this as a normal, if early, termination path (§7).
pub enum SiftOutcome {
    Imf(SiftResult),
    AmplitudeUnderflow,
}

fn evaluate_step(
    mode: Mode,
    current: &[Complex64],
    t: &[f64],
    opts: &Options,
    criterion: Criterion,
    iterations: usize,
    stable_run: &mut usize,
) -> Result<(bool, Vec<Complex64>), EmdError> {
    match mean_amplitude::compute(mode, current, t, opts.ndirs, opts.nbsym) {
        Ok(ma) => {
            let stop = match criterion {
                Criterion::Default {
                    threshold_1,
                    threshold_2,
                    alpha,
                } => evaluate_default(&ma.mean, &ma.amplitude, ma.n_extrema, threshold_1, threshold_2, alpha),
                Criterion::Fixe(target) => iterations >= target,
                Criterion::FixeH(target) => {
                    if extrema_stable(ma.n_extrema, ma.n_zero) {
                        *stable_run += 1;
                    } else {
                        *stable_run = 0;
                    }
                    *stable_run >= target
                }
            };
            Ok((stop, ma.mean))
        }
        // §4.5: fewer than three extrema means the evaluator reports stop=true
        // with a zero mean rather than propagating the error, letting sifting
        // exit cleanly.
        Err(EmdError::InsufficientExtrema) => Ok((true, vec![Complex64::new(0.0, 0.0); current.len()])),
        Err(e) => Err(e),
    }
}

/// Sift `candidate` to one IMF. See SPEC_FULL.md §4.6, grounded on the inner
/// while-loop of `pyhht.emd.decompose` and the convergence-loop shape this
/// crate's teacher uses for its iterative despike/finning passes.
///
/// `source_max_abs` is the max magnitude of the signal the whole
/// decomposition started from (not just this candidate), the reference point
/// the amplitude-underflow pre-check is normalized against.
pub fn sift_mode(candidate: &[Complex64], t: &[f64], mode: Mode, opts: &Options, source_max_abs: f64) -> Result<SiftOutcome, EmdError> {
    let criterion = Criterion::from_options(opts);
    let mut current = candidate.to_vec();
    let mut iterations = 0usize;
    let mut stable_run = 0usize;

    // Step 3's pre-check, run ahead of step 2's (otherwise-wasted) evaluator
    // call since it doesn't depend on that call's result.
    let max_m = current.iter().map(|c| c.norm()).fold(0.0, f64::max);
    if max_m < 1e-10 * source_max_abs {
        log::info!(
            "sifting aborted: residue amplitude underflowed (max|residue| = {max_m:e} < 1e-10 * max|signal| = {source_max_abs:e})"
        );
        return Ok(SiftOutcome::AmplitudeUnderflow);
    }

    let (mut stop, mut mean) = evaluate_step(mode, &current, t, opts, criterion, iterations, &mut stable_run)?;

    while !stop && iterations < opts.maxiter {
        current = current.iter().zip(&mean).map(|(c, m)| c - m).collect();
        iterations += 1;
        let next = evaluate_step(mode, &current, t, opts, criterion, iterations, &mut stable_run)?;
        stop = next.0;
        mean = next.1;
    }

    if !stop && iterations >= opts.maxiter {
        log::warn!("sifting hit maxiter ({}) without converging", opts.maxiter);
    }

    Ok(SiftOutcome::Imf(SiftResult {
        imf: current,
        iterations,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linspace(n: usize) -> Vec<f64> {
        (0..n).map(|i| i as f64).collect()
    }

    fn outcome_imf(outcome: SiftOutcome) -> SiftResult {
        match outcome {
            SiftOutcome::Imf(result) => result,
            SiftOutcome::AmplitudeUnderflow => panic!("expected an IMF, got AmplitudeUnderflow"),
        }
    }

    #[test]
    fn sifts_a_two_tone_signal_down_toward_an_imf() {
        let n = 100;
        let t = linspace(n);
        let x: Vec<Complex64> = (0..n)
            .map(|i| {
                let ti = i as f64;
                let fast = (2.0 * std::f64::consts::PI * 10.0 * ti / n as f64).sin();
                let slow = 0.3 * (2.0 * std::f64::consts::PI * ti / n as f64).sin();
                Complex64::new(fast + slow, 0.0)
            })
            .collect();
        let opts = Options::default();
        let source_max = x.iter().map(|c| c.norm()).fold(0.0, f64::max);
        let result = outcome_imf(sift_mode(&x, &t, Mode::Real, &opts, source_max).unwrap());
        assert!(result.iterations >= 1);
        assert_eq!(result.imf.len(), n);
    }

    #[test]
    fn fixe_mode_runs_exactly_the_requested_iteration_count() {
        let n = 60;
        let t = linspace(n);
        let x: Vec<Complex64> = (0..n)
            .map(|i| Complex64::new((2.0 * std::f64::consts::PI * 5.0 * i as f64 / n as f64).sin(), 0.0))
            .collect();
        let mut opts = Options::default();
        opts.fixe = 3;
        let source_max = x.iter().map(|c| c.norm()).fold(0.0, f64::max);
        let result = outcome_imf(sift_mode(&x, &t, Mode::Real, &opts, source_max).unwrap());
        assert_eq!(result.iterations, 3);
    }

    #[test]
    fn stops_immediately_on_a_signal_with_too_few_extrema() {
        let t = linspace(5);
        let x: Vec<Complex64> = (0..5).map(|i| Complex64::new(i as f64, 0.0)).collect();
        let opts = Options::default();
        let source_max = x.iter().map(|c| c.norm()).fold(0.0, f64::max);
        let result = outcome_imf(sift_mode(&x, &t, Mode::Real, &opts, source_max).unwrap());
        assert_eq!(result.iterations, 0);
    }

    #[test]
    fn amplitude_underflow_is_reported_without_sifting() {
        let n = 40;
        let t = linspace(n);
        let x: Vec<Complex64> = (0..n)
            .map(|i| Complex64::new((2.0 * std::f64::consts::PI * 3.0 * i as f64 / n as f64).sin(), 0.0))
            .collect();
        let opts = Options::default();
        // A residue that is numerically zero next to the original signal's scale.
        let tiny_residue = vec![Complex64::new(1e-13, 0.0); n];
        let source_max = x.iter().map(|c| c.norm()).fold(0.0, f64::max);
        let outcome = sift_mode(&tiny_residue, &t, Mode::Real, &opts, source_max).unwrap();
        assert!(matches!(outcome, SiftOutcome::AmplitudeUnderflow));
    }
}
