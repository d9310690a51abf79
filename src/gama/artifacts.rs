use std::io;

use camino::{Utf8Path, Utf8PathBuf};

use crate::phase::ComputationPhase;

/// Files exchanged with the solver for one project and phase.
///
/// Names only depend on the project name and the phase, so two concurrent runs on the same
/// project overwrite each other's files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GamaArtifacts {
    /// Network description written for the solver
    pub input: Utf8PathBuf,
    /// Machine-readable adjustment result
    pub result: Utf8PathBuf,
    /// Human-readable adjustment report
    pub report: Utf8PathBuf,
}

impl GamaArtifacts {
    pub fn new(work_dir: &Utf8Path, project: &str, phase: ComputationPhase) -> Self {
        GamaArtifacts {
            input: work_dir.join(format!("{project}.xml")),
            result: work_dir.join(format!("{project}-resultat.xml")),
            report: work_dir.join(format!("{project}-resultat-{}.html", phase.label())),
        }
    }

    /// Remove a result file left over by a previous run, if any.
    pub fn remove_stale_result(&self) -> io::Result<()> {
        match std::fs::remove_file(&self.result) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }
}
