//! Selection of the points held fixed in an adjustment, and of the points left to estimate.
use std::collections::{BTreeMap, BTreeSet};

use crate::{
    constants::{Meter, PointId, CONTROL_FIXED_MARK},
    levelnet_errors::LevelnetError,
    phase::ComputationPhase,
};

use super::{WorkingPoint, WorkingSet};

/// Fixed points with the heights they are held at, sorted by point id
pub type FixedPoints = BTreeMap<PointId, Meter>;

fn is_fixed(row: &WorkingPoint, phase: ComputationPhase) -> bool {
    match phase {
        ComputationPhase::Control => row.fixed == CONTROL_FIXED_MARK,
        ComputationPhase::Final => !row.fixed.is_empty(),
    }
}

/// Find the points to hold fixed in the adjustment.
///
/// * Control phase: rows whose fixed-flag is exactly `"x"`.
/// * Final phase: rows with any non-empty fixed-flag.
///
/// When a point occurs on several rows, its first row decides the held height.
///
/// Return
/// ----------
/// * The fixed points and their prior heights.
/// * [`LevelnetError::NoFixedPoints`] if nothing is selected.
/// * [`LevelnetError::MissingFixedHeight`] if a selected row has no prior height.
pub fn select_fixed(
    working_set: &WorkingSet,
    phase: ComputationPhase,
) -> Result<FixedPoints, LevelnetError> {
    let mut fixed = FixedPoints::new();
    for row in working_set.iter().filter(|row| is_fixed(row, phase)) {
        if fixed.contains_key(&row.point) {
            continue;
        }
        let height = row
            .height
            .ok_or_else(|| LevelnetError::MissingFixedHeight(row.point.clone()))?;
        fixed.insert(row.point.clone(), height);
    }

    if fixed.is_empty() {
        return Err(LevelnetError::NoFixedPoints);
    }
    Ok(fixed)
}

/// Points to estimate: the connected points that are not held fixed, sorted.
pub fn estimated_points(connected: &BTreeSet<PointId>, fixed: &FixedPoints) -> Vec<PointId> {
    connected
        .iter()
        .filter(|point| !fixed.contains_key(*point))
        .cloned()
        .collect()
}
