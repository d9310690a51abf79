//! # Reconciliation of an adjustment result into a working set
//!
//! [`reconcile`] merges the adjusted heights and variances returned by the solver into the
//! working set the adjustment started from, and derives the height change (mm) and uplift rate
//! (mm/year) of every re-estimated point.
//!
//! ## Merge rules
//!
//! The result is walked in solver order. For the `j`-th adjusted point, the first row `i` of the
//! working set holding the same point id decides the case:
//!
//! | Case                      | Condition      | Effect                                                  |
//! |---------------------------|----------------|---------------------------------------------------------|
//! | [`Merge::UpdateInPlace`]  | `i <= j`       | row `i` is updated                                      |
//! | [`Merge::DuplicateThenUpdate`] | `i > j`   | a copy of row `i` is appended, then row `i` is updated   |
//! | [`Merge::AppendNew`]      | no row         | a fresh row is appended                                 |
//!
//! The copy keeps the row as it was before the update, so the prior record survives at the
//! end of the sheet.
//!
//! Updating a row sets the new height, the new uncertainty `sqrt(variance)` and the height
//! change `(new - prior) · 1000` mm (snapped to `0` below 0.001 mm). If the row date equals
//! the validity time, the row is a recomputation of an already current height and nothing
//! else changes. Otherwise the uplift rate is the height change divided by the elapsed time
//! in Julian years, and the row is stamped with the validity time and the output frame label.
//!
//! ## Notes
//!
//! * The input working set is never modified: a new one is returned.
//! * The correspondence between the solver's coordinate order and its covariance diagonal is
//!   an external contract that this crate trusts, see
//!   [`read_gama_result`](crate::gama::output_reader::read_gama_result).
use hifitime::{Duration, Epoch};
use itertools::izip;

use crate::{
    constants::{Meter, Millimeter, PointId, DELTA_HEIGHT_NOISE_MM, MM_PER_M},
    gama::output_reader::AdjustedPoint,
    levelnet_errors::LevelnetError,
    time::elapsed_years,
};

use super::{WorkingPoint, WorkingSet};

/// How one adjusted point is merged into the working set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Merge {
    /// Overwrite row `i`
    UpdateInPlace(usize),
    /// Append a copy of row `i`, then overwrite row `i`
    DuplicateThenUpdate(usize),
    /// Append a new row
    AppendNew,
}

impl Merge {
    /// Decide the merge case for the `j`-th adjusted point, found at row `found` (if any).
    pub fn plan(j: usize, found: Option<usize>) -> Self {
        match found {
            Some(i) if i > j => Merge::DuplicateThenUpdate(i),
            Some(i) => Merge::UpdateInPlace(i),
            None => Merge::AppendNew,
        }
    }
}

/// Height change in millimeters, with sub-micrometer noise snapped to zero
pub fn delta_height_mm(new_height: Meter, prior_height: Meter) -> Millimeter {
    let delta = (new_height - prior_height) * MM_PER_M;
    if delta.abs() < DELTA_HEIGHT_NOISE_MM {
        0.0
    } else {
        delta
    }
}

fn update_row(row: &mut WorkingPoint, adjusted: &AdjustedPoint, valid_at: Epoch, system: &str) {
    row.new_height = Some(adjusted.height);
    row.new_sigma = Some(adjusted.variance.sqrt());

    let delta = row.height.map(|prior| delta_height_mm(adjusted.height, prior));
    row.delta_height = delta;

    match row.when {
        // Recomputation of an already registered height
        Some(when) if valid_at - when == Duration::ZERO => return,
        Some(when) => {
            let years = elapsed_years(when, valid_at);
            row.uplift = delta.map(|d| d / years);
        }
        None => row.uplift = None,
    }
    row.when = Some(valid_at);
    row.system = system.to_string();
}

fn new_row(adjusted: &AdjustedPoint, valid_at: Epoch, system: &str) -> WorkingPoint {
    WorkingPoint {
        point: adjusted.point.clone(),
        when: Some(valid_at),
        new_height: Some(adjusted.height),
        new_sigma: Some(adjusted.variance.sqrt()),
        system: system.to_string(),
        ..Default::default()
    }
}

/// Merge adjusted heights into a working set.
///
/// Arguments
/// -----------------
/// * `adjusted`: adjusted points in solver order.
/// * `working_set`: the working set the adjustment started from.
/// * `valid_at`: validity time of the adjustment.
/// * `system`: reference frame label written on updated and appended rows.
///
/// Return
/// ----------
/// * The reconciled working set. Every adjusted point has a row with a new height and a new
///   uncertainty.
pub fn reconcile(
    adjusted: &[AdjustedPoint],
    working_set: &WorkingSet,
    valid_at: Epoch,
    system: &str,
) -> WorkingSet {
    let mut result = working_set.clone();
    let rows = result.rows_mut();

    for (j, point) in adjusted.iter().enumerate() {
        let found = rows.iter().position(|row| row.point == point.point);
        match Merge::plan(j, found) {
            Merge::UpdateInPlace(i) => {
                update_row(&mut rows[i], point, valid_at, system);
            }
            Merge::DuplicateThenUpdate(i) => {
                log::debug!("Keeping prior record of {} before update", point.point);
                let mut history = rows[i].clone();
                history.system = system.to_string();
                rows.push(history);
                update_row(&mut rows[i], point, valid_at, system);
            }
            Merge::AppendNew => {
                log::debug!("New point {} appended to working set", point.point);
                rows.push(new_row(point, valid_at, system));
            }
        }
    }

    result
}

/// Column-wise variant of [`reconcile`], checking that the three columns line up.
///
/// Return
/// ----------
/// * [`LevelnetError::ResultCardinalityMismatch`] before any merge if `heights` and
///   `variances` (or `points`) differ in length.
pub fn reconcile_columns(
    points: &[PointId],
    heights: &[Meter],
    variances: &[f64],
    working_set: &WorkingSet,
    valid_at: Epoch,
    system: &str,
) -> Result<WorkingSet, LevelnetError> {
    if points.len() != heights.len() || heights.len() != variances.len() {
        return Err(LevelnetError::ResultCardinalityMismatch {
            heights: heights.len(),
            variances: variances.len(),
        });
    }

    let adjusted: Vec<AdjustedPoint> = izip!(points, heights, variances)
        .map(|(point, &height, &variance)| AdjustedPoint {
            point: point.clone(),
            height,
            variance,
        })
        .collect();

    Ok(reconcile(&adjusted, working_set, valid_at, system))
}
