//! # Solver invocation
//!
//! Runs `gama-local` on a written input file and classifies the run into an
//! [`AdjustmentOutcome`]:
//!
//! | Exit status | Result file | Outcome                            |
//! |-------------|-------------|------------------------------------|
//! | `0`         | any         | [`AdjustmentOutcome::Success`]     |
//! | non-zero    | present     | [`AdjustmentOutcome::SoftFailure`] |
//! | non-zero    | missing     | [`AdjustmentOutcome::HardFailure`] |
//!
//! A result file left by an earlier run is removed before the solver starts, so the table
//! above only ever reflects the current run.
//!
//! When a timeout is configured, the running process is polled and killed once the limit is
//! exceeded; the run then fails with [`LevelnetError::AdjustmentTimeout`].
use std::{
    process::{Child, Command, ExitStatus, Stdio},
    thread,
    time::{Duration, Instant},
};

use camino::{Utf8Path, Utf8PathBuf};

use crate::{levelnet_errors::LevelnetError, levelnet_params::LevelnetParams};

use super::artifacts::GamaArtifacts;

/// Outcome of one solver run. Every variant carries the report location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdjustmentOutcome {
    Success {
        report: Utf8PathBuf,
    },
    /// Non-zero exit, but a result was produced: usable, the report must be checked by hand
    SoftFailure {
        report: Utf8PathBuf,
        code: Option<i32>,
    },
    /// Non-zero exit without result
    HardFailure {
        report: Utf8PathBuf,
        code: Option<i32>,
    },
}

impl AdjustmentOutcome {
    /// Classify a finished run from its exit status and the presence of a result file.
    pub fn classify(
        success: bool,
        code: Option<i32>,
        result_exists: bool,
        report: Utf8PathBuf,
    ) -> Self {
        match (success, result_exists) {
            (true, _) => AdjustmentOutcome::Success { report },
            (false, true) => AdjustmentOutcome::SoftFailure { report, code },
            (false, false) => AdjustmentOutcome::HardFailure { report, code },
        }
    }

    pub fn report(&self) -> &Utf8Path {
        match self {
            AdjustmentOutcome::Success { report }
            | AdjustmentOutcome::SoftFailure { report, .. }
            | AdjustmentOutcome::HardFailure { report, .. } => report,
        }
    }

    pub fn is_soft_failure(&self) -> bool {
        matches!(self, AdjustmentOutcome::SoftFailure { .. })
    }

    /// Turn the outcome into the report location, or an error when processing must stop.
    ///
    /// Arguments
    /// -----------------
    /// * `strict`: if `true`, a soft failure is also an error.
    ///
    /// Return
    /// ----------
    /// * `Ok(report)` on success, and on soft failure unless `strict`.
    /// * [`LevelnetError::AdjustmentFailed`] on hard failure.
    /// * [`LevelnetError::AdjustmentSoftFailure`] on soft failure when `strict`.
    pub fn into_report(self, strict: bool) -> Result<Utf8PathBuf, LevelnetError> {
        match self {
            AdjustmentOutcome::Success { report } => Ok(report),
            AdjustmentOutcome::SoftFailure { report, .. } if strict => {
                Err(LevelnetError::AdjustmentSoftFailure { report })
            }
            AdjustmentOutcome::SoftFailure { report, .. } => Ok(report),
            AdjustmentOutcome::HardFailure { report, .. } => {
                Err(LevelnetError::AdjustmentFailed { report })
            }
        }
    }
}

fn wait_with_timeout(
    child: &mut Child,
    timeout: Option<Duration>,
    poll: Duration,
) -> Result<ExitStatus, LevelnetError> {
    let Some(limit) = timeout else {
        return Ok(child.wait()?);
    };

    let started = Instant::now();
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(status);
        }
        if started.elapsed() >= limit {
            // The process may have exited since try_wait: kill errors are irrelevant
            let _ = child.kill();
            child.wait()?;
            return Err(LevelnetError::AdjustmentTimeout { timeout: limit });
        }
        thread::sleep(poll);
    }
}

/// Run the solver on `artifacts.input`, writing `artifacts.result` and `artifacts.report`.
///
/// The input file must already exist. Failures to start the program are returned as
/// [`LevelnetError::IoError`]; a non-zero exit is not an error here but an outcome.
pub fn run_gama(
    params: &LevelnetParams,
    artifacts: &GamaArtifacts,
) -> Result<AdjustmentOutcome, LevelnetError> {
    artifacts.remove_stale_result()?;

    log::info!(
        "Running {} on {} (report: {})",
        params.gama_executable,
        artifacts.input,
        artifacts.report
    );

    let mut child = Command::new(&params.gama_executable)
        .arg(artifacts.input.as_str())
        .arg("--xml")
        .arg(artifacts.result.as_str())
        .arg("--html")
        .arg(artifacts.report.as_str())
        .stdin(Stdio::null())
        .spawn()?;

    let status = wait_with_timeout(&mut child, params.timeout(), params.poll_interval())?;

    let outcome = AdjustmentOutcome::classify(
        status.success(),
        status.code(),
        artifacts.result.is_file(),
        artifacts.report.clone(),
    );

    match &outcome {
        AdjustmentOutcome::Success { .. } => log::info!("Adjustment completed"),
        AdjustmentOutcome::SoftFailure { report, code } => log::warn!(
            "Adjustment exited with status {code:?} but produced a result: check {report}"
        ),
        AdjustmentOutcome::HardFailure { report, code } => log::error!(
            "Adjustment not completed (status {code:?}, see {report}). Check that the network \
             is connected, and for several networks that each one has a fixed point"
        ),
    }

    Ok(outcome)
}
