use num_complex::Complex64;

use crate::envelope::build_envelope;
use crate::error::EmdError;
use crate::extrema::find_extrema;
use crate::mirror::mirror_extrema;
use crate::options::Mode;

/// Local mean and envelope amplitude of a signal at one sifting iteration,
/// plus the extrema count the stopping criterion needs. See SPEC_FULL.md §4.4,
/// grounded on `pyhht.emd.mean_and_amplitude`.
pub struct MeanAmplitude {
    pub mean: Vec<Complex64>,
    pub amplitude: Vec<f64>,
    pub n_extrema: usize,
    pub n_zero: usize,
}

/// Real-mode envelope: ordinary upper/lower spline envelope of `x`'s own
/// extrema.
fn real_mean_amplitude(x: &[f64], t: &[f64], nbsym: usize) -> Result<MeanAmplitude, EmdError> {
    let extrema = find_extrema(x);
    let n_extrema = extrema.count();
    let n_zero = extrema.indzer.len();
    let m = mirror_extrema(x, t, x, nbsym)?;
    let env = build_envelope(&m.tmin, &m.zmin, &m.tmax, &m.zmax, t)?;
    Ok(MeanAmplitude {
        mean: env.mean().into_iter().map(|v| Complex64::new(v, 0.0)).collect(),
        amplitude: env.amplitude(),
        n_extrema,
        n_zero,
    })
}

/// Build the upper (maxima) envelope of `z`, projected along `phi`, as a
/// complex-valued curve sampled at `t`: the extrema are found on the real
/// projection `Re(e^{-i phi} z)`, but the envelope is fit through the
/// original complex values at those extrema, separately for the real and
/// imaginary parts.
fn directional_envelope(
    z: &[Complex64],
    t: &[f64],
    phi: f64,
    nbsym: usize,
    use_minima: bool,
) -> Result<(Vec<f64>, Vec<f64>, usize, usize), EmdError> {
    let rot = Complex64::from_polar(1.0, -phi);
    let proj: Vec<f64> = z.iter().map(|c| (c * rot).re).collect();
    let extrema = find_extrema(&proj);
    let n_extrema = extrema.count();
    let n_zero = extrema.indzer.len();
    let z_re: Vec<f64> = z.iter().map(|c| c.re).collect();
    let z_im: Vec<f64> = z.iter().map(|c| c.im).collect();

    let m_re = mirror_extrema(&proj, t, &z_re, nbsym)?;
    let m_im = mirror_extrema(&proj, t, &z_im, nbsym)?;

    let (t_knots_re, v_knots_re, t_knots_im, v_knots_im) = if use_minima {
        (&m_re.tmin, &m_re.zmin, &m_im.tmin, &m_im.zmin)
    } else {
        (&m_re.tmax, &m_re.zmax, &m_im.tmax, &m_im.zmax)
    };

    let re_curve = crate::spline::NaturalCubicSpline::fit(t_knots_re, v_knots_re)
        .ok_or_else(|| EmdError::InternalInvariantViolated("failed to fit directional envelope (real part)".to_string()))?
        .eval_many(t);
    let im_curve = crate::spline::NaturalCubicSpline::fit(t_knots_im, v_knots_im)
        .ok_or_else(|| EmdError::InternalInvariantViolated("failed to fit directional envelope (imaginary part)".to_string()))?
        .eval_many(t);

    Ok((re_curve, im_curve, n_extrema, n_zero))
}

/// `ComplexV1`: each direction contributes both a maxima and a minima
/// envelope, projected along `phi = k*pi/ndirs` but never rotated back; the
/// mean is the average of the un-rotated per-direction midpoints
/// `(envmin_k + envmax_k)/2`. See SPEC_FULL.md §4.4, §9.
fn complex_v1_mean_amplitude(
    z: &[Complex64],
    t: &[f64],
    ndirs: usize,
    nbsym: usize,
) -> Result<MeanAmplitude, EmdError> {
    let n = t.len();
    let mut mean = vec![Complex64::new(0.0, 0.0); n];
    let mut amplitude = vec![0.0; n];
    let mut min_extrema = usize::MAX;
    let mut min_zero = usize::MAX;

    for k in 0..ndirs {
        let phi = std::f64::consts::PI * k as f64 / ndirs as f64;
        let (max_re, max_im, n_extrema_max, n_zero_max) = directional_envelope(z, t, phi, nbsym, false)?;
        let (min_re, min_im, n_extrema_min, n_zero_min) = directional_envelope(z, t, phi, nbsym, true)?;
        min_extrema = min_extrema.min(n_extrema_max).min(n_extrema_min);
        min_zero = min_zero.min(n_zero_max).min(n_zero_min);

        for i in 0..n {
            let upper = Complex64::new(max_re[i], max_im[i]);
            let lower = Complex64::new(min_re[i], min_im[i]);
            mean[i] += 0.5 * (upper + lower);
            amplitude[i] += (0.5 * (upper - lower)).norm();
        }
    }
    for v in mean.iter_mut() {
        *v /= ndirs as f64;
    }
    for v in amplitude.iter_mut() {
        *v /= ndirs as f64;
    }

    Ok(MeanAmplitude {
        mean,
        amplitude,
        n_extrema: min_extrema,
        n_zero: min_zero,
    })
}

/// `ComplexV2`: each direction contributes both a maxima and a minima
/// envelope, projected along `phi = k*pi/ndirs` and rotated back by `e^{i
/// phi}` before being folded into the mean; the amplitude is rotation
/// invariant so it is computed directly from the un-rotated envelopes.
fn complex_v2_mean_amplitude(
    z: &[Complex64],
    t: &[f64],
    ndirs: usize,
    nbsym: usize,
) -> Result<MeanAmplitude, EmdError> {
    let n = t.len();
    let mut mean = vec![Complex64::new(0.0, 0.0); n];
    let mut amplitude = vec![0.0; n];
    let mut min_extrema = usize::MAX;
    let mut min_zero = usize::MAX;

    for k in 0..ndirs {
        let phi = std::f64::consts::PI * k as f64 / ndirs as f64;
        let back_rotation = Complex64::from_polar(1.0, phi);
        let (max_re, max_im, n_extrema_max, n_zero_max) = directional_envelope(z, t, phi, nbsym, false)?;
        let (min_re, min_im, n_extrema_min, n_zero_min) = directional_envelope(z, t, phi, nbsym, true)?;
        min_extrema = min_extrema.min(n_extrema_max).min(n_extrema_min);
        min_zero = min_zero.min(n_zero_max).min(n_zero_min);

        for i in 0..n {
            let upper = Complex64::new(max_re[i], max_im[i]);
            let lower = Complex64::new(min_re[i], min_im[i]);
            mean[i] += back_rotation * (upper + lower);
            amplitude[i] += (0.5 * (upper - lower)).norm();
        }
    }
    for v in mean.iter_mut() {
        *v /= ndirs as f64;
    }
    for v in amplitude.iter_mut() {
        *v /= ndirs as f64;
    }

    Ok(MeanAmplitude {
        mean,
        amplitude,
        n_extrema: min_extrema,
        n_zero: min_zero,
    })
}

/// Dispatch to the mode-appropriate mean/amplitude estimator. `mode` must
/// already be resolved (never `Mode::Auto`).
pub fn compute(mode: Mode, z: &[Complex64], t: &[f64], ndirs: usize, nbsym: usize) -> Result<MeanAmplitude, EmdError> {
    match mode {
        Mode::Real => {
            let x: Vec<f64> = z.iter().map(|c| c.re).collect();
            real_mean_amplitude(&x, t, nbsym)
        }
        Mode::ComplexV1 => complex_v1_mean_amplitude(z, t, ndirs, nbsym),
        Mode::ComplexV2 => complex_v2_mean_amplitude(z, t, ndirs, nbsym),
        Mode::Auto => Err(EmdError::InternalInvariantViolated(
            "Mode::Auto reached mean_amplitude::compute unresolved".to_string(),
        )),
    }
}
