//! # A-priori observation error model
//!
//! This module computes the **a-priori standard deviation** of a leveling observation, i.e. the
//! weight handed to the least-squares adjustment before any residual is known.
//!
//! ## Public API
//!
//! ### [`crate::error_models::MeasurementType`]
//! Enumeration of the supported measurement types:
//!
//! - `MeasurementType::MTL` – motorized trigonometric leveling, error grows linearly with distance
//! - `MeasurementType::MGL` – geometric (spirit) leveling, error grows with the square root of distance
//! - `MeasurementType::NUL` – exact tie between two fixed points, zero a-priori error
//!
//! Parsing is case-insensitive:
//!
//! ```rust
//! use levelnet::error_models::MeasurementType;
//! let kind: MeasurementType = "mgl".parse().unwrap();
//! assert_eq!(kind, MeasurementType::MGL);
//! ```
//!
//! ### [`crate::error_models::apriori_deviation`]
//!
//! ```rust
//! use levelnet::error_models::apriori_deviation;
//!
//! let sigma = apriori_deviation("MGL", 500.0, 3, 0.6, 0.01).unwrap();
//! assert!((sigma - 0.4246).abs() < 1e-4);
//! ```
//!
//! ## Model
//!
//! Both MTL and MGL combine a setup-dependent centering term with a distance-dependent term:
//!
//! ```text
//! setup    = sqrt(n_setups · centering²)
//! MTL dist = coeff · L / 1000
//! MGL dist = coeff · sqrt(L / 1000)
//! σ        = hypot(dist, setup)
//! ```
//!
//! with `L` in meters and coefficients in millimeters, so that `σ` is in millimeters.
//! Negative coefficients act as their absolute value. A negative distance is rejected with
//! [`LevelnetError::InvalidGeometry`].
//!
//! NUL observations are used to bind disjoint sub-networks together: they reproduce the height
//! difference between two fixed points exactly.

use std::str::FromStr;

use crate::{
    constants::{Meter, Millimeter},
    levelnet_errors::LevelnetError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeasurementType {
    MTL,
    MGL,
    NUL,
}

impl FromStr for MeasurementType {
    type Err = LevelnetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "MTL" => Ok(MeasurementType::MTL),
            "MGL" => Ok(MeasurementType::MGL),
            "NUL" => Ok(MeasurementType::NUL),
            _ => Err(LevelnetError::InvalidMeasurementType(s.to_string())),
        }
    }
}

impl TryFrom<&str> for MeasurementType {
    type Error = LevelnetError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl MeasurementType {
    /// A-priori standard deviation of one observation of this type.
    ///
    /// Arguments
    /// -----------------
    /// * `distance`: leveled distance in meters, must be non-negative.
    /// * `n_setups`: number of instrument setups along the line.
    /// * `distance_coeff`: distance-dependent deviation in mm (per km for MTL, per √km for MGL).
    /// * `centering_coeff`: centering deviation per setup in mm.
    ///
    /// Return
    /// ----------
    /// * The standard deviation in millimeters, or [`LevelnetError::InvalidGeometry`] for a
    ///   negative distance.
    pub fn deviation(
        &self,
        distance: Meter,
        n_setups: u32,
        distance_coeff: Millimeter,
        centering_coeff: Millimeter,
    ) -> Result<Millimeter, LevelnetError> {
        if *self == MeasurementType::NUL {
            return Ok(0.0);
        }

        if distance < 0.0 {
            return Err(LevelnetError::InvalidGeometry(distance));
        }

        let setup_term = (f64::from(n_setups) * centering_coeff.powi(2)).sqrt();

        let distance_term = match self {
            MeasurementType::MTL => distance_coeff.abs() * distance / 1000.0,
            MeasurementType::MGL => distance_coeff.abs() * (distance / 1000.0).sqrt(),
            MeasurementType::NUL => 0.0,
        };

        Ok(distance_term.hypot(setup_term))
    }
}

/// A-priori standard deviation for a leveling observation, from its raw type code.
///
/// The type code is matched case-insensitively against `MTL`, `MGL` and `NUL`.
///
/// Return
/// ----------
/// * `Ok(σ)` in millimeters.
/// * `Err(LevelnetError::InvalidMeasurementType)` for any other type code.
/// * `Err(LevelnetError::InvalidGeometry)` for a negative distance.
///
/// See also
/// ------------
/// * [`MeasurementType::deviation`] – The typed variant.
pub fn apriori_deviation(
    measurement_type: &str,
    distance: Meter,
    n_setups: u32,
    distance_coeff: Millimeter,
    centering_coeff: Millimeter,
) -> Result<Millimeter, LevelnetError> {
    measurement_type
        .parse::<MeasurementType>()?
        .deviation(distance, n_setups, distance_coeff, centering_coeff)
}
