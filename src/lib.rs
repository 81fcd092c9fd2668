//! Empirical Mode Decomposition: a sifting engine that decomposes a 1-D
//! real- or complex-valued signal into intrinsic mode functions plus a
//! residual trend.
//!
//! ```no_run
//! use emd_sift::{Decomposer, Options, Signal};
//!
//! let values: Vec<f64> = (0..256).map(|i| (i as f64 / 8.0).sin()).collect();
//! let signal = Signal::from_real(&values)?;
//! let decomposer = Decomposer::new(signal, None, Options::default())?;
//! let decomposition = decomposer.decompose()?;
//! println!("extracted {} IMFs, io = {}", decomposition.n_imfs(), decomposition.io());
//! # Ok::<(), emd_sift::EmdError>(())
//! ```

mod decompose;
mod envelope;
mod error;
mod extrema;
mod mean_amplitude;
mod mirror;
mod options;
mod signal;
mod sift;
mod spline;
mod stopping;

pub use decompose::{Decomposer, Decomposition};
pub use error::EmdError;
pub use options::{Mode, Options};
pub use signal::{Signal, TimeAxis};
