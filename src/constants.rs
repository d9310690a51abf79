//! # Constants and type definitions for levelnet
//!
//! This module centralizes the **conversion factors**, **sheet names**, and **common type
//! aliases** used throughout the `levelnet` library.
//!
//! ## Overview
//!
//! - Unit conversions (meters ↔ millimeters, seconds ↔ years)
//! - Logical sheet names of the case workbook
//! - Core type aliases used across the crate

// -------------------------------------------------------------------------------------------------
// Unit conversions
// -------------------------------------------------------------------------------------------------

/// Number of seconds in a day
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Length of the year used for uplift rates (Julian year)
pub const DAYS_PER_YEAR: f64 = 365.25;

/// Number of seconds in a Julian year
pub const SECONDS_PER_YEAR: f64 = DAYS_PER_YEAR * SECONDS_PER_DAY;

/// Meters → millimeters
pub const MM_PER_M: f64 = 1000.0;

/// Height changes below this magnitude (in mm) are reported as exactly zero
pub const DELTA_HEIGHT_NOISE_MM: f64 = 0.001;

/// Reference frame label written on every reconciled row
pub const DEFAULT_OUTPUT_SYSTEM: &str = "DVR90";

/// Default name of the external adjustment program
pub const DEFAULT_GAMA_EXECUTABLE: &str = "gama-local";

// -------------------------------------------------------------------------------------------------
// Workbook sheet names
// -------------------------------------------------------------------------------------------------

/// Overview of all points in the project, written when observations are read in
pub const SHEET_POINT_OVERVIEW: &str = "Punktoversigt";

/// Result of the first (control) computation
pub const SHEET_CONTROL_COMPUTATION: &str = "Kontrolberegning";

/// Result of the second (final) computation
pub const SHEET_FINAL_COMPUTATION: &str = "Endelig beregning";

/// Observed height differences
pub const SHEET_OBSERVATIONS: &str = "Observationer";

/// Fixed-flag marking a point held fixed in the control computation
pub const CONTROL_FIXED_MARK: &str = "x";

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Identifier of a leveling point (e.g. `"K-63-09446"`)
pub type PointId = String;
/// Length or height in meters
pub type Meter = f64;
/// Length or height in millimeters
pub type Millimeter = f64;
