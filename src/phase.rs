//! # Computation phase
//!
//! A leveling project is computed twice:
//!
//! 1. **Control** – the first pass, run on the `Punktoversigt` sheet and written to
//!    `Kontrolberegning`. Only points flagged `"x"` are held fixed. Its purpose is to validate
//!    the observations and let the operator switch off bad ones.
//! 2. **Final** – every later pass, run on `Kontrolberegning` and written to
//!    `Endelig beregning`. Every point with a non-empty fixed-flag is held fixed, and the
//!    original observation dates from `Punktoversigt` are used.
//!
//! The phase is not stored anywhere: it is inferred from which result sheet already exists.

use std::fmt;

use crate::constants::{
    SHEET_CONTROL_COMPUTATION, SHEET_FINAL_COMPUTATION, SHEET_POINT_OVERVIEW,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComputationPhase {
    Control,
    Final,
}

impl ComputationPhase {
    /// Infer the phase from the workbook state.
    ///
    /// Arguments
    /// -----------------
    /// * `has_control_sheet`: whether a `Kontrolberegning` sheet already exists.
    pub fn infer(has_control_sheet: bool) -> Self {
        if has_control_sheet {
            ComputationPhase::Final
        } else {
            ComputationPhase::Control
        }
    }

    pub fn is_control(&self) -> bool {
        matches!(self, ComputationPhase::Control)
    }

    /// Sheet holding the working set this phase starts from
    pub fn current_sheet(&self) -> &'static str {
        match self {
            ComputationPhase::Control => SHEET_POINT_OVERVIEW,
            ComputationPhase::Final => SHEET_CONTROL_COMPUTATION,
        }
    }

    /// Sheet receiving the reconciled working set
    pub fn next_sheet(&self) -> &'static str {
        match self {
            ComputationPhase::Control => SHEET_CONTROL_COMPUTATION,
            ComputationPhase::Final => SHEET_FINAL_COMPUTATION,
        }
    }

    /// Suffix appended to report artifacts written by downstream collaborators
    pub fn infix(&self) -> &'static str {
        match self {
            ComputationPhase::Control => "-kon",
            ComputationPhase::Final => "",
        }
    }

    /// Short name used in the solver report file name
    pub fn label(&self) -> &'static str {
        match self {
            ComputationPhase::Control => "kontrol",
            ComputationPhase::Final => "endelig",
        }
    }
}

impl fmt::Display for ComputationPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComputationPhase::Control => write!(f, "control computation"),
            ComputationPhase::Final => write!(f, "final computation"),
        }
    }
}
