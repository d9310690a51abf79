//! # Levelnet: one adjustment of a levelling project
//!
//! [`Levelnet`] ties the workbook, the network collaborators and the solver together. A call
//! to [`Levelnet::compute`] performs one pass:
//!
//! 1. Infer the [`ComputationPhase`] from the sheets present in the workbook.
//! 2. Read the observations and the current working set. In the final phase, the dates of the
//!    point overview are adopted row by row.
//! 3. Select the fixed points and derive the points to estimate from the connected points.
//! 4. Write the `gama-local` input, run the solver and read its result.
//! 5. Reconcile the adjusted heights into the working set and write it to the next sheet.
//!
//! Nothing is written to the workbook unless every step before the last one succeeded.
//!
//! ## Example
//!
//! ```rust, no_run
//! use std::collections::BTreeSet;
//! use hifitime::Epoch;
//! use levelnet::{
//!     collaborators::FixedValidity,
//!     levelnet::Levelnet,
//!     levelnet_errors::LevelnetError,
//!     levelnet_params::LevelnetParams,
//!     workbook::MemoryWorkbook,
//! };
//!
//! let params = LevelnetParams::builder().work_dir("/tmp/projekt").build().unwrap();
//! let network = |_: &str| -> Result<BTreeSet<String>, LevelnetError> { Ok(BTreeSet::new()) };
//! let validity = FixedValidity(Epoch::from_gregorian_utc_at_midnight(2024, 5, 1));
//!
//! let mut levelnet = Levelnet::new(params, MemoryWorkbook::new(), network, validity);
//! let summary = levelnet.compute("projekt")?;
//! println!("{}", summary.working_set);
//! # Ok::<(), LevelnetError>(())
//! ```
use camino::Utf8PathBuf;

use crate::{
    collaborators::{ConnectivityAnalysis, ValidityLookup},
    constants::SHEET_POINT_OVERVIEW,
    gama::{
        artifacts::GamaArtifacts, input_writer::GamaInput, invoker::run_gama,
        output_reader::read_gama_output,
    },
    levelnet_errors::LevelnetError,
    levelnet_params::LevelnetParams,
    phase::ComputationPhase,
    workbook::WorkbookStore,
    working_set::{
        fixed_points::{estimated_points, select_fixed},
        reconcile::reconcile,
        WorkingSet,
    },
};

/// What one call to [`Levelnet::compute`] did
#[derive(Debug, Clone, PartialEq)]
pub struct ComputationSummary {
    pub phase: ComputationPhase,
    pub n_fixed: usize,
    pub n_estimated: usize,
    pub report: Utf8PathBuf,
    /// The solver exited non-zero but produced a result; the report must be checked by hand
    pub soft_failure: bool,
    /// The working set as written to [`ComputationPhase::next_sheet`]
    pub working_set: WorkingSet,
}

#[derive(Debug)]
pub struct Levelnet<S, N, V> {
    params: LevelnetParams,
    store: S,
    network: N,
    validity: V,
}

impl<S, N, V> Levelnet<S, N, V>
where
    S: WorkbookStore,
    N: ConnectivityAnalysis,
    V: ValidityLookup,
{
    pub fn new(params: LevelnetParams, store: S, network: N, validity: V) -> Self {
        Levelnet {
            params,
            store,
            network,
            validity,
        }
    }

    pub fn params(&self) -> &LevelnetParams {
        &self.params
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_parts(self) -> (LevelnetParams, S, N, V) {
        (self.params, self.store, self.network, self.validity)
    }

    /// Run one adjustment of `project` and store the reconciled working set.
    ///
    /// Arguments
    /// -----------------
    /// * `project`: project name, used for the solver files and passed to the collaborators.
    ///
    /// Return
    /// ----------
    /// * A [`ComputationSummary`] once the working set has been written to the next sheet.
    /// * [`LevelnetError::NoFixedPoints`], [`LevelnetError::MissingFixedHeight`],
    ///   [`LevelnetError::AdjustmentFailed`], [`LevelnetError::AdjustmentTimeout`] or
    ///   [`LevelnetError::ResultCardinalityMismatch`] without touching the workbook.
    pub fn compute(&mut self, project: &str) -> Result<ComputationSummary, LevelnetError> {
        let phase = ComputationPhase::infer(self.store.has_control_computation());
        log::info!("Starting {phase} computation of {project}");

        let observations = self.store.read_observations()?;
        let mut working_set = self.store.read_working_set(phase.current_sheet())?;
        if !phase.is_control() {
            let overview = self.store.read_working_set(SHEET_POINT_OVERVIEW)?;
            working_set.adopt_dates(&overview);
        }

        let fixed = select_fixed(&working_set, phase)?;
        let connected = self.network.connected_points(project)?;
        let estimated = estimated_points(&connected, &fixed);
        log::info!(
            "{} fixed points, {} points to estimate, {} observations",
            fixed.len(),
            estimated.len(),
            observations.len()
        );

        let artifacts = GamaArtifacts::new(&self.params.work_dir, project, phase);
        GamaInput {
            project,
            parameters: &self.params.gama,
            fixed: &fixed,
            estimated: &estimated,
            observations: &observations,
        }
        .write_file(&artifacts.input)?;

        let outcome = run_gama(&self.params, &artifacts)?;
        let soft_failure = outcome.is_soft_failure();
        let report = outcome.into_report(self.params.strict_soft_failure)?;

        let (adjusted, valid_at) = read_gama_output(&artifacts.result, project, &self.validity)?;
        let reconciled = reconcile(
            &adjusted,
            &working_set,
            valid_at,
            &self.params.output_system,
        );

        self.store
            .write_working_set(phase.next_sheet(), &reconciled)?;
        log::info!(
            "Wrote {} rows to '{}', report in {report}",
            reconciled.len(),
            phase.next_sheet()
        );

        Ok(ComputationSummary {
            phase,
            n_fixed: fixed.len(),
            n_estimated: estimated.len(),
            report,
            soft_failure,
            working_set: reconciled,
        })
    }
}
