//! # Case workbook access
//!
//! The case workbook is a set of named sheets (`Punktoversigt`, `Kontrolberegning`,
//! `Endelig beregning`, `Observationer`, ...). Reading and writing the actual spreadsheet file
//! is left to the caller through the [`WorkbookStore`] trait.
//!
//! [`MemoryWorkbook`] keeps the sheets in memory; it backs the tests and suits callers that
//! load the whole workbook up front.
use std::collections::BTreeMap;

use crate::{
    constants::SHEET_CONTROL_COMPUTATION, levelnet_errors::LevelnetError,
    observations::Observations, working_set::WorkingSet,
};

pub trait WorkbookStore {
    /// Whether a sheet named `sheet` exists
    fn has_sheet(&self, sheet: &str) -> bool;

    /// The `Observationer` sheet
    fn read_observations(&self) -> Result<Observations, LevelnetError>;

    /// A point sheet (`Punktoversigt`, `Kontrolberegning` or `Endelig beregning`)
    fn read_working_set(&self, sheet: &str) -> Result<WorkingSet, LevelnetError>;

    /// Create or replace a point sheet
    fn write_working_set(&mut self, sheet: &str, working_set: &WorkingSet)
        -> Result<(), LevelnetError>;

    /// Whether the control computation has already been written
    fn has_control_computation(&self) -> bool {
        self.has_sheet(SHEET_CONTROL_COMPUTATION)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryWorkbook {
    observations: Option<Observations>,
    sheets: BTreeMap<String, WorkingSet>,
}

impl MemoryWorkbook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_observations(mut self, observations: Observations) -> Self {
        self.observations = Some(observations);
        self
    }

    pub fn with_sheet(mut self, sheet: impl Into<String>, working_set: WorkingSet) -> Self {
        self.sheets.insert(sheet.into(), working_set);
        self
    }

    pub fn sheet(&self, sheet: &str) -> Option<&WorkingSet> {
        self.sheets.get(sheet)
    }

    pub fn sheet_names(&self) -> impl Iterator<Item = &str> {
        self.sheets.keys().map(String::as_str)
    }
}

impl WorkbookStore for MemoryWorkbook {
    fn has_sheet(&self, sheet: &str) -> bool {
        self.sheets.contains_key(sheet)
            || (sheet == crate::constants::SHEET_OBSERVATIONS && self.observations.is_some())
    }

    fn read_observations(&self) -> Result<Observations, LevelnetError> {
        self.observations
            .clone()
            .ok_or_else(|| LevelnetError::MissingSheet(crate::constants::SHEET_OBSERVATIONS.into()))
    }

    fn read_working_set(&self, sheet: &str) -> Result<WorkingSet, LevelnetError> {
        self.sheets
            .get(sheet)
            .cloned()
            .ok_or_else(|| LevelnetError::MissingSheet(sheet.into()))
    }

    fn write_working_set(
        &mut self,
        sheet: &str,
        working_set: &WorkingSet,
    ) -> Result<(), LevelnetError> {
        self.sheets.insert(sheet.into(), working_set.clone());
        Ok(())
    }
}
