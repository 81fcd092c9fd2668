use num_complex::Complex64;

use crate::error::EmdError;

/// A finite ordered sequence of real or complex samples.
///
/// Internally every sample is carried as [`Complex64`] (see SPEC_FULL.md §3):
/// a signal built from real `f64`s simply has all-zero imaginary parts, so the
/// sifting machinery downstream never needs two code paths for element type.
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    samples: Vec<Complex64>,
    has_imaginary_part: bool,
}

impl Signal {
    /// Build a signal from real samples. Fails if shorter than 4 samples or
    /// any sample is non-finite.
    pub fn from_real(samples: &[f64]) -> Result<Self, EmdError> {
        Self::from_complex(&samples.iter().map(|&re| Complex64::new(re, 0.0)).collect::<Vec<_>>())
    }

    /// Build a signal from complex samples. Fails if shorter than 4 samples or
    /// any sample is non-finite.
    pub fn from_complex(samples: &[Complex64]) -> Result<Self, EmdError> {
        if samples.len() < 4 {
            return Err(EmdError::InvalidInput(format!(
                "signal must have at least 4 samples, got {}",
                samples.len()
            )));
        }
        if let Some((i, s)) = samples.iter().enumerate().find(|(_, s)| !s.re.is_finite() || !s.im.is_finite()) {
            return Err(EmdError::InvalidInput(format!(
                "sample at index {i} is not finite: {s}"
            )));
        }
        let has_imaginary_part = samples.iter().any(|s| s.im != 0.0);
        Ok(Self {
            samples: samples.to_vec(),
            has_imaginary_part,
        })
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn as_slice(&self) -> &[Complex64] {
        &self.samples
    }

    /// Whether any sample carries a non-zero imaginary part. Used by
    /// [`crate::options::Mode::Auto`] to pick `Real` vs `ComplexV2`.
    pub fn has_imaginary_part(&self) -> bool {
        self.has_imaginary_part
    }
}

/// A finite, strictly increasing sequence of real sample timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeAxis {
    instants: Vec<f64>,
}

impl TimeAxis {
    /// Build a time axis, validating that it is finite, strictly increasing,
    /// and matches `signal_len` in length.
    pub fn new(instants: &[f64], signal_len: usize) -> Result<Self, EmdError> {
        if instants.len() != signal_len {
            return Err(EmdError::InvalidInput(format!(
                "time axis length {} does not match signal length {signal_len}",
                instants.len()
            )));
        }
        if let Some((i, t)) = instants.iter().enumerate().find(|(_, t)| !t.is_finite()) {
            return Err(EmdError::InvalidInput(format!(
                "time instant at index {i} is not finite: {t}"
            )));
        }
        if instants.windows(2).any(|w| w[1] <= w[0]) {
            return Err(EmdError::InvalidInput(
                "time axis must be strictly increasing".to_string(),
            ));
        }
        Ok(Self {
            instants: instants.to_vec(),
        })
    }

    /// `0, 1, ..., n - 1`, the default axis when none is supplied.
    pub fn sample_indices(n: usize) -> Self {
        Self {
            instants: (0..n).map(|i| i as f64).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.instants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instants.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.instants
    }
}
