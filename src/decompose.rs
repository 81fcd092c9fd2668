use ndarray::Array2;
use num_complex::Complex64;

use crate::error::EmdError;
use crate::extrema::has_enough_structure;
use crate::options::Options;
use crate::signal::{Signal, TimeAxis};
use crate::sift::{sift_mode, SiftOutcome};

/// Owns the configuration for one decomposition run and drives the outer
/// IMF-extraction loop. See SPEC_FULL.md §4.7, grounded on the outer
/// `while`/`keep_decomposing` loop of `pyhht.emd.decompose` and the chained
/// transform shape of this crate's teacher's `Pipeline::apply`.
#[derive(Debug)]
pub struct Decomposer {
    signal: Signal,
    time: TimeAxis,
    options: Options,
}

/// The finished decomposition: a stack of IMFs in extraction order, plus the
/// leftover residual trend.
pub struct Decomposition {
    imfs: Array2<Complex64>,
    residue: Vec<Complex64>,
    iterations_per_imf: Vec<usize>,
    source: Vec<Complex64>,
}

impl Decomposer {
    /// `time` defaults to sample indices `0..signal.len()` if `None`.
    pub fn new(signal: Signal, time: Option<TimeAxis>, options: Options) -> Result<Self, EmdError> {
        options.validate()?;
        let time = match time {
            Some(t) => {
                if t.len() != signal.len() {
                    return Err(EmdError::InvalidInput(format!(
                        "time axis length {} does not match signal length {}",
                        t.len(),
                        signal.len()
                    )));
                }
                t
            }
            None => TimeAxis::sample_indices(signal.len()),
        };
        Ok(Self { signal, time, options })
    }

    /// Run the outer loop: repeatedly sift the current residue down to an
    /// IMF and subtract it, until the residue runs out of extrema or
    /// `n_imfs` IMFs have been extracted (`0` means unbounded).
    pub fn decompose(self) -> Result<Decomposition, EmdError> {
        let mode = self.options.mode.resolve(&self.signal);
        let source: Vec<Complex64> = self.signal.as_slice().to_vec();
        let t = self.time.as_slice();
        let n = source.len();

        let source_max_abs = source.iter().map(|c| c.norm()).fold(0.0, f64::max);

        let mut residue = source.clone();
        let mut imfs: Vec<Vec<Complex64>> = Vec::new();
        let mut iterations_per_imf = Vec::new();

        loop {
            if !has_enough_structure(&residue) {
                break;
            }
            if self.options.n_imfs != 0 && imfs.len() >= self.options.n_imfs {
                break;
            }

            match sift_mode(&residue, t, mode, &self.options, source_max_abs)? {
                SiftOutcome::AmplitudeUnderflow => break,
                SiftOutcome::Imf(result) => {
                    for i in 0..n {
                        residue[i] -= result.imf[i];
                    }
                    iterations_per_imf.push(result.iterations);
                    imfs.push(result.imf);
                }
            }
        }

        let mut imfs_flat = Vec::with_capacity(imfs.len() * n);
        for imf in &imfs {
            imfs_flat.extend_from_slice(imf);
        }
        let imfs_array = Array2::from_shape_vec((imfs.len(), n), imfs_flat)
            .map_err(|e| EmdError::InternalInvariantViolated(format!("IMF stack has inconsistent shape: {e}")))?;

        Ok(Decomposition {
            imfs: imfs_array,
            residue,
            iterations_per_imf,
            source,
        })
    }
}

impl Decomposition {
    pub fn imfs(&self) -> &Array2<Complex64> {
        &self.imfs
    }

    pub fn residue(&self) -> &[Complex64] {
        &self.residue
    }

    pub fn n_imfs(&self) -> usize {
        self.imfs.nrows()
    }

    pub fn iterations_per_imf(&self) -> &[usize] {
        &self.iterations_per_imf
    }

    /// Index of orthogonality: how much energy the extracted IMFs leak into
    /// each other, normalized by the original signal's energy. Zero for a
    /// perfectly orthogonal decomposition. See SPEC_FULL.md §4.7, grounded on
    /// `pyhht.emd.io`.
    pub fn io(&self) -> f64 {
        let energy: f64 = self.source.iter().map(|c| c.norm_sqr()).sum();
        if energy == 0.0 {
            return 0.0;
        }
        let n_imfs = self.imfs.nrows();
        let n = self.imfs.ncols();
        let mut cross = 0.0;
        for i in 0..n_imfs {
            for j in (i + 1)..n_imfs {
                let row_i = self.imfs.row(i);
                let row_j = self.imfs.row(j);
                for k in 0..n {
                    cross += (row_i[k] * row_j[k].conj()).re;
                }
            }
        }
        cross / energy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linspace(n: usize) -> Vec<f64> {
        (0..n).map(|i| i as f64).collect()
    }

    #[test]
    fn decomposes_a_two_tone_signal_into_imfs_plus_residue() {
        let n = 200;
        let values: Vec<f64> = (0..n)
            .map(|i| {
                let ti = i as f64;
                let fast = (2.0 * std::f64::consts::PI * 15.0 * ti / n as f64).sin();
                let slow = 0.4 * (2.0 * std::f64::consts::PI * ti / n as f64).sin();
                let trend = 0.002 * ti;
                fast + slow + trend
            })
            .collect();
        let signal = Signal::from_real(&values).unwrap();
        let decomposer = Decomposer::new(signal, None, Options::default()).unwrap();
        let result = decomposer.decompose().unwrap();
        assert!(result.n_imfs() >= 1);
        assert_eq!(result.residue().len(), n);
        for &k in result.iterations_per_imf() {
            assert!(k <= Options::default().maxiter);
        }
    }

    #[test]
    fn reassembly_recovers_the_original_signal() {
        let n = 150;
        let values: Vec<f64> = (0..n)
            .map(|i| {
                let ti = i as f64;
                (2.0 * std::f64::consts::PI * 8.0 * ti / n as f64).sin() + 0.5 * (ti / n as f64)
            })
            .collect();
        let signal = Signal::from_real(&values).unwrap();
        let decomposer = Decomposer::new(signal, None, Options::default()).unwrap();
        let result = decomposer.decompose().unwrap();
        let mut reassembled = result.residue().to_vec();
        for row in result.imfs().rows() {
            for (i, v) in row.iter().enumerate() {
                reassembled[i] += v;
            }
        }
        for (orig, got) in values.iter().zip(reassembled.iter()) {
            assert!((orig - got.re).abs() < 1e-6);
        }
    }

    #[test]
    fn short_candidate_has_no_structure_to_sift() {
        // N = 3 is below the public constructor's N >= 4 floor; exercised
        // directly against the residue-extrema check it guards instead.
        let candidate = [Complex64::new(0.0, 0.0), Complex64::new(1.0, 0.0), Complex64::new(0.5, 0.0)];
        assert!(!has_enough_structure(&candidate));
    }

    #[test]
    fn bounded_by_n_imfs() {
        let n = 200;
        let values: Vec<f64> = (0..n)
            .map(|i| {
                let ti = i as f64;
                (2.0 * std::f64::consts::PI * 20.0 * ti / n as f64).sin()
                    + 0.3 * (2.0 * std::f64::consts::PI * 5.0 * ti / n as f64).sin()
                    + 0.1 * (2.0 * std::f64::consts::PI * ti / n as f64).sin()
            })
            .collect();
        let signal = Signal::from_real(&values).unwrap();
        let mut opts = Options::default();
        opts.n_imfs = 1;
        let decomposer = Decomposer::new(signal, None, opts).unwrap();
        let result = decomposer.decompose().unwrap();
        assert_eq!(result.n_imfs(), 1);
    }

    #[test]
    fn monotonic_trend_yields_no_imfs() {
        let values = linspace(30);
        let signal = Signal::from_real(&values).unwrap();
        let decomposer = Decomposer::new(signal, None, Options::default()).unwrap();
        let result = decomposer.decompose().unwrap();
        assert_eq!(result.n_imfs(), 0);
        assert_eq!(result.residue().len(), 30);
    }

    #[test]
    fn rejects_mismatched_time_axis_length() {
        let signal = Signal::from_real(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        let time = TimeAxis::new(&[0.0, 1.0, 2.0, 3.0], 4).unwrap();
        let err = Decomposer::new(signal, Some(time), Options::default()).unwrap_err();
        assert!(matches!(err, EmdError::InvalidInput(_)));
    }
}
