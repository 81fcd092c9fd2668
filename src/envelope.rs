use crate::error::EmdError;
use crate::spline::NaturalCubicSpline;

/// Upper and lower envelopes sampled at a caller-supplied time axis, built by
/// fitting a [`NaturalCubicSpline`] through mirrored extrema positions and
/// values. See SPEC_FULL.md §4.3, grounded on the fit-then-sample-at-each-x
/// shape this crate's teacher uses for baseline correction.
#[derive(Debug, Clone)]
pub struct Envelope {
    pub upper: Vec<f64>,
    pub lower: Vec<f64>,
}

fn fit_at(knot_t: &[f64], knot_v: &[f64], sample_t: &[f64], which: &str) -> Result<Vec<f64>, EmdError> {
    let spline = NaturalCubicSpline::fit(knot_t, knot_v).ok_or_else(|| {
        EmdError::InternalInvariantViolated(format!("failed to fit {which} envelope spline"))
    })?;
    Ok(spline.eval_many(sample_t))
}

/// Build both envelopes from mirrored minima/maxima, evaluated at every
/// instant in `t`.
pub fn build_envelope(
    tmin: &[f64],
    zmin: &[f64],
    tmax: &[f64],
    zmax: &[f64],
    t: &[f64],
) -> Result<Envelope, EmdError> {
    Ok(Envelope {
        lower: fit_at(tmin, zmin, t, "lower")?,
        upper: fit_at(tmax, zmax, t, "upper")?,
    })
}

impl Envelope {
    pub fn mean(&self) -> Vec<f64> {
        self.upper.iter().zip(&self.lower).map(|(u, l)| 0.5 * (u + l)).collect()
    }

    pub fn amplitude(&self) -> Vec<f64> {
        self.upper.iter().zip(&self.lower).map(|(u, l)| 0.5 * (u - l)).collect()
    }
}
