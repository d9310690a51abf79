//! # Working set ("Arbejdssæt")
//!
//! The working set is the table of points under adjustment, as found on the `Punktoversigt`,
//! `Kontrolberegning` and `Endelig beregning` sheets. Each [`WorkingPoint`] is one row.
//!
//! ## Components
//!
//! * [`WorkingSet`] – Ordered rows, with point lookup and the final-phase date adoption.
//! * [`fixed_points`] – Selection of the points held fixed in a given [`ComputationPhase`](crate::phase::ComputationPhase).
//! * [`reconcile`] – Merge of an adjustment result into a working set.
//! * [`display`] – Tabular rendering for operator summaries.
//!
//! ## Row order
//!
//! Row order is significant: the reconciler locates points by their **first** matching row,
//! and the final phase copies dates positionally from the point overview. Rows are therefore
//! never re-sorted by this crate.
pub mod display;
pub mod fixed_points;
pub mod reconcile;

use std::ops::Index;

use hifitime::Epoch;

use crate::constants::{Meter, Millimeter, PointId};

/// One row of the working set.
///
/// Fields
/// -----------------
/// * `point` – Point id ("Punkt").
/// * `fixed` – Fixed-flag ("Fasthold"): `"x"` holds the point in both phases, any other
///   non-empty marker only in the final phase.
/// * `when` – Date of the last valid height ("Hvornår").
/// * `height`, `sigma` – Prior height in meters and its uncertainty ("Kote", "σ").
/// * `new_height`, `new_sigma` – Adjusted height and uncertainty ("Ny kote", "Ny σ").
/// * `delta_height` – Height change in mm ("Δ-kote \[mm\]").
/// * `uplift` – Height change rate in mm/year ("Opløft \[mm/år\]").
/// * `system` – Height reference frame label ("System").
/// * `north`, `east` – Planar coordinates ("Nord", "Øst").
/// * `uuid` – Record id of the prior height, if any.
/// * `exclude_publication` – Marker excluding the point from publication ("Udelad publikation").
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WorkingPoint {
    pub point: PointId,
    pub fixed: String,
    pub when: Option<Epoch>,
    pub height: Option<Meter>,
    pub sigma: Option<Millimeter>,
    pub new_height: Option<Meter>,
    pub new_sigma: Option<Millimeter>,
    pub delta_height: Option<Millimeter>,
    pub uplift: Option<f64>,
    pub system: String,
    pub north: Option<Meter>,
    pub east: Option<Meter>,
    pub uuid: Option<String>,
    pub exclude_publication: String,
}

impl WorkingPoint {
    /// A row with only a point id, every other field empty
    pub fn new(point: impl Into<PointId>) -> Self {
        WorkingPoint {
            point: point.into(),
            ..Default::default()
        }
    }

    /// A row holding a prior height valid at `when`
    pub fn with_height(point: impl Into<PointId>, height: Meter, when: Epoch) -> Self {
        WorkingPoint {
            point: point.into(),
            height: Some(height),
            when: Some(when),
            ..Default::default()
        }
    }

    /// Set the fixed-flag of this row
    pub fn fixed(mut self, flag: impl Into<String>) -> Self {
        self.fixed = flag.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct WorkingSet {
    rows: Vec<WorkingPoint>,
}

impl WorkingSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[WorkingPoint] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, WorkingPoint> {
        self.rows.iter()
    }

    pub fn push(&mut self, row: WorkingPoint) {
        self.rows.push(row);
    }

    /// Index of the first row holding `point`
    pub fn position(&self, point: &str) -> Option<usize> {
        self.rows.iter().position(|row| row.point == point)
    }

    /// First row holding `point`
    pub fn get(&self, point: &str) -> Option<&WorkingPoint> {
        self.position(point).map(|i| &self.rows[i])
    }

    pub(crate) fn rows_mut(&mut self) -> &mut Vec<WorkingPoint> {
        &mut self.rows
    }

    /// Replace the dates of this working set by those of `overview`, row by row.
    ///
    /// The final computation must use the original observation dates, which only the point
    /// overview still holds once the control computation has stamped its own validity time.
    /// Rows beyond the end of `overview` are left without a date.
    pub fn adopt_dates(&mut self, overview: &WorkingSet) {
        for (i, row) in self.rows.iter_mut().enumerate() {
            row.when = overview.rows.get(i).and_then(|o| o.when);
        }
    }
}

impl From<Vec<WorkingPoint>> for WorkingSet {
    fn from(rows: Vec<WorkingPoint>) -> Self {
        WorkingSet { rows }
    }
}

impl FromIterator<WorkingPoint> for WorkingSet {
    fn from_iter<I: IntoIterator<Item = WorkingPoint>>(iter: I) -> Self {
        WorkingSet {
            rows: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for WorkingSet {
    type Item = WorkingPoint;
    type IntoIter = std::vec::IntoIter<WorkingPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

impl<'a> IntoIterator for &'a WorkingSet {
    type Item = &'a WorkingPoint;
    type IntoIter = std::slice::Iter<'a, WorkingPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

impl Index<usize> for WorkingSet {
    type Output = WorkingPoint;

    fn index(&self, index: usize) -> &Self::Output {
        &self.rows[index]
    }
}
