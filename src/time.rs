use hifitime::{Duration, Epoch};

use crate::constants::SECONDS_PER_YEAR;

/// Elapsed time between two epochs, in Julian years (365.25 days)
///
/// Argument
/// --------
/// * `from`: the earlier epoch (e.g. the date of the last valid height)
/// * `to`: the later epoch (e.g. the validity time of the new adjustment)
///
/// Return
/// ------
/// * the signed elapsed time in years, `0.0` when both epochs coincide
pub fn elapsed_years(from: Epoch, to: Epoch) -> f64 {
    elapsed(from, to).to_seconds() / SECONDS_PER_YEAR
}

/// Signed duration `to - from`
pub fn elapsed(from: Epoch, to: Epoch) -> Duration {
    to - from
}

/// Render an epoch as `YYYY-MM-DD HH:MM` in UTC, for tabular output
pub fn fmt_utc_minutes(epoch: Epoch) -> String {
    let (y, m, d, hh, mm, _, _) = epoch.to_gregorian_utc();
    format!("{y:04}-{m:02}-{d:02} {hh:02}:{mm:02}")
}
