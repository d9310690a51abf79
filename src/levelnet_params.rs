//! # Configuration
//!
//! [`LevelnetParams`] gathers every tunable of a computation run: where and how the external
//! solver is run, which reference frame label results are stamped with, and the global
//! adjustment parameters written to the solver input ([`GamaParameters`]).
//!
//! Three ways to obtain parameters:
//!
//! ```rust
//! use std::time::Duration;
//! use levelnet::levelnet_params::LevelnetParams;
//!
//! // 1. Defaults
//! let params = LevelnetParams::default();
//! assert_eq!(params.gama_executable, "gama-local");
//!
//! // 2. Fluent builder, validated on build
//! let params = LevelnetParams::builder()
//!     .work_dir("/tmp/projects")
//!     .timeout(Duration::from_secs(600))
//!     .build()
//!     .unwrap();
//! assert_eq!(params.timeout(), Some(Duration::from_secs(600)));
//!
//! // 3. TOML, every key optional
//! let params = LevelnetParams::from_toml_str(r#"
//!     output_system = "DVR90"
//!     timeout_ms = 30000
//!
//!     [gama]
//!     latitude = 56.1
//! "#).unwrap();
//! assert_eq!(params.gama.latitude, 56.1);
//! ```
use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;

use crate::{
    constants::{DEFAULT_GAMA_EXECUTABLE, DEFAULT_OUTPUT_SYSTEM},
    levelnet_errors::LevelnetError,
};

/// Global adjustment parameters of the solver input (`<parameters .../>` element).
///
/// Defaults
/// -----------------
/// * `algorithm`: `gso`
/// * `angles`: `400` (gon)
/// * `conf_pr`: `0.95`
/// * `cov_band`: `0`
/// * `ellipsoid`: `grs80`
/// * `latitude`: `55.7`
/// * `sigma_act`: `aposteriori`
/// * `sigma_apr`: `1.0`
/// * `tol_abs`: `1000.0`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GamaParameters {
    pub algorithm: String,
    pub angles: u32,
    pub conf_pr: f64,
    pub cov_band: i32,
    pub ellipsoid: String,
    pub latitude: f64,
    pub sigma_act: String,
    pub sigma_apr: f64,
    pub tol_abs: f64,
}

impl Default for GamaParameters {
    fn default() -> Self {
        GamaParameters {
            algorithm: "gso".into(),
            angles: 400,
            conf_pr: 0.95,
            cov_band: 0,
            ellipsoid: "grs80".into(),
            latitude: 55.7,
            sigma_act: "aposteriori".into(),
            sigma_apr: 1.0,
            tol_abs: 1000.0,
        }
    }
}

/// Parameters of a computation run.
///
/// Fields
/// -----------------
/// * `gama_executable` – Solver program, looked up on `PATH` unless absolute.
/// * `work_dir` – Directory receiving the solver input, result and report.
/// * `timeout_ms` – Optional wall-clock limit for the solver, in milliseconds.
/// * `poll_interval_ms` – How often a running solver is checked against the timeout.
/// * `output_system` – Reference frame label stamped on reconciled rows.
/// * `strict_soft_failure` – Turn a soft solver failure into an error instead of a warning.
/// * `gama` – Global adjustment parameters.
///
/// Concurrent runs on the same project and `work_dir` share artifact file names and must be
/// serialized by the caller.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LevelnetParams {
    pub gama_executable: String,
    pub work_dir: Utf8PathBuf,
    pub timeout_ms: Option<u64>,
    pub poll_interval_ms: u64,
    pub output_system: String,
    pub strict_soft_failure: bool,
    pub gama: GamaParameters,
}

impl Default for LevelnetParams {
    fn default() -> Self {
        LevelnetParams {
            gama_executable: DEFAULT_GAMA_EXECUTABLE.into(),
            work_dir: Utf8PathBuf::from("."),
            timeout_ms: None,
            poll_interval_ms: 50,
            output_system: DEFAULT_OUTPUT_SYSTEM.into(),
            strict_soft_failure: false,
            gama: GamaParameters::default(),
        }
    }
}

impl LevelnetParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> LevelnetParamsBuilder {
        LevelnetParamsBuilder::new()
    }

    /// Solver timeout, if any
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Parse parameters from TOML text. Missing keys take their default value.
    pub fn from_toml_str(text: &str) -> Result<Self, LevelnetError> {
        let params: LevelnetParams = toml::from_str(text)?;
        params.validate()?;
        Ok(params)
    }

    /// Read parameters from a TOML file.
    pub fn from_toml_file(path: &Utf8Path) -> Result<Self, LevelnetError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    fn validate(&self) -> Result<(), LevelnetError> {
        if self.gama_executable.trim().is_empty() {
            return Err(LevelnetError::InvalidParameter(
                "gama_executable must not be empty".into(),
            ));
        }
        if self.poll_interval_ms == 0 {
            return Err(LevelnetError::InvalidParameter(
                "poll_interval_ms must be positive".into(),
            ));
        }
        if self.timeout_ms == Some(0) {
            return Err(LevelnetError::InvalidParameter(
                "timeout_ms must be positive when set".into(),
            ));
        }
        if !(self.gama.conf_pr > 0.0 && self.gama.conf_pr < 1.0) {
            return Err(LevelnetError::InvalidParameter(
                "gama.conf_pr must lie in (0, 1)".into(),
            ));
        }
        if self.gama.sigma_apr <= 0.0 {
            return Err(LevelnetError::InvalidParameter(
                "gama.sigma_apr must be positive".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct LevelnetParamsBuilder {
    params: LevelnetParams,
}

impl Default for LevelnetParamsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LevelnetParamsBuilder {
    pub fn new() -> Self {
        Self {
            params: LevelnetParams::default(),
        }
    }

    pub fn gama_executable(mut self, v: impl Into<String>) -> Self {
        self.params.gama_executable = v.into();
        self
    }
    pub fn work_dir(mut self, v: impl Into<Utf8PathBuf>) -> Self {
        self.params.work_dir = v.into();
        self
    }
    pub fn timeout(mut self, v: Duration) -> Self {
        self.params.timeout_ms = Some(v.as_millis() as u64);
        self
    }
    pub fn poll_interval(mut self, v: Duration) -> Self {
        self.params.poll_interval_ms = v.as_millis() as u64;
        self
    }
    pub fn output_system(mut self, v: impl Into<String>) -> Self {
        self.params.output_system = v.into();
        self
    }
    pub fn strict_soft_failure(mut self, v: bool) -> Self {
        self.params.strict_soft_failure = v;
        self
    }
    pub fn gama(mut self, v: GamaParameters) -> Self {
        self.params.gama = v;
        self
    }

    /// Validate and return the parameters.
    pub fn build(self) -> Result<LevelnetParams, LevelnetError> {
        self.params.validate()?;
        Ok(self.params)
    }
}
