use serde::{Deserialize, Serialize};

use crate::error::EmdError;
use crate::signal::Signal;

/// How the sifting engine treats the signal's value type.
///
/// `Auto` is resolved once, at [`crate::Decomposer`] construction, by
/// inspecting the signal (`Real` if every sample has a zero imaginary part,
/// `ComplexV2` otherwise). `ComplexV1` is never auto-selected; a caller must
/// ask for it explicitly. See SPEC_FULL.md §9.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    Real,
    ComplexV1,
    ComplexV2,
    Auto,
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Auto
    }
}

impl Mode {
    pub(crate) fn resolve(self, signal: &Signal) -> Mode {
        match self {
            Mode::Auto => {
                if signal.has_imaginary_part() {
                    Mode::ComplexV2
                } else {
                    Mode::Real
                }
            }
            explicit => explicit,
        }
    }

    pub(crate) fn is_complex(self) -> bool {
        matches!(self, Mode::ComplexV1 | Mode::ComplexV2)
    }
}

/// Configuration fixed at [`crate::Decomposer`] construction. See SPEC_FULL.md
/// §3 for the effect of each field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Options {
    pub threshold_1: f64,
    pub threshold_2: f64,
    pub alpha: f64,
    pub ndirs: usize,
    pub nbsym: usize,
    pub fixe: usize,
    pub fixe_h: usize,
    pub maxiter: usize,
    pub n_imfs: usize,
    pub mode: Mode,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            threshold_1: 0.05,
            threshold_2: 0.5,
            alpha: 0.05,
            ndirs: 4,
            nbsym: 2,
            fixe: 0,
            fixe_h: 0,
            maxiter: 2000,
            n_imfs: 0,
            mode: Mode::Auto,
        }
    }
}

impl Options {
    /// Reject configurations that are inconsistent on their face, before any
    /// signal is looked at: `fixe` and `fixe_h` are mutually exclusive
    /// (SPEC_FULL.md §4.5), matching the reference implementation's
    /// `TypeError("Cannot use both fixe and fixe_h modes")`.
    pub fn validate(&self) -> Result<(), EmdError> {
        if self.fixe != 0 && self.fixe_h != 0 {
            return Err(EmdError::InvalidInput(
                "fixe and fixe_h cannot both be set".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_spec_table() {
        let o = Options::default();
        assert_eq!(o.threshold_1, 0.05);
        assert_eq!(o.threshold_2, 0.5);
        assert_eq!(o.alpha, 0.05);
        assert_eq!(o.ndirs, 4);
        assert_eq!(o.nbsym, 2);
        assert_eq!(o.fixe, 0);
        assert_eq!(o.fixe_h, 0);
        assert_eq!(o.maxiter, 2000);
        assert_eq!(o.n_imfs, 0);
        assert_eq!(o.mode, Mode::Auto);
    }

    #[test]
    fn rejects_fixe_and_fixe_h_together() {
        let mut o = Options::default();
        o.fixe = 5;
        o.fixe_h = 3;
        assert!(matches!(o.validate(), Err(EmdError::InvalidInput(_))));
    }

    #[test]
    fn auto_resolves_real_for_all_real_signal() {
        let s = Signal::from_real(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(Mode::Auto.resolve(&s), Mode::Real);
    }
}
