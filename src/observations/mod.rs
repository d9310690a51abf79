//! # Leveling observations
//!
//! One [`Observation`] is one measured height difference between two points, as read from the
//! `Observationer` sheet of the case workbook. The sheet itself is read by an external
//! collaborator; this module only holds the typed rows.
//!
//! ## Data model
//!
//! Every field of the sheet is carried, even those the adjustment never uses (environmental
//! readings, provenance), so that a round trip through the pipeline keeps the sheet intact.
//!
//! The fields feeding the adjustment are:
//! - `from` / `to` – endpoints,
//! - `delta_h` – measured height difference in meters (`to - from`),
//! - `distance` – leveled distance in meters,
//! - `n_setups`, `measurement_type`, `distance_coeff`, `centering_coeff` – a-priori error model
//!   inputs (see [`crate::error_models`]),
//! - `journal` – source journal id, written to the solver input for traceability,
//! - `excluded` – the "sluk" flag; excluded observations are never sent to the solver.

use hifitime::Epoch;

use crate::{
    constants::{Meter, Millimeter, PointId},
    error_models::apriori_deviation,
    levelnet_errors::LevelnetError,
};

/// Ordered list of observations, in sheet order
pub type Observations = Vec<Observation>;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Observation {
    pub journal: String,
    pub excluded: bool,
    pub from: PointId,
    pub to: PointId,
    pub delta_h: Meter,
    pub distance: Meter,
    pub n_setups: u32,
    pub distance_coeff: Millimeter,
    pub centering_coeff: Millimeter,
    pub comment: String,
    pub when: Option<Epoch>,
    pub temperature: Option<f64>,
    pub cloud_cover: Option<f64>,
    pub sun: Option<f64>,
    pub wind: Option<f64>,
    pub visibility: Option<f64>,
    pub source: String,
    pub measurement_type: String,
    pub uuid: String,
}

impl Observation {
    /// Create a new observation with the fields used by the adjustment.
    ///
    /// Every other field is left empty; set them directly on the returned value.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        journal: impl Into<String>,
        from: impl Into<PointId>,
        to: impl Into<PointId>,
        delta_h: Meter,
        distance: Meter,
        n_setups: u32,
        measurement_type: impl Into<String>,
        distance_coeff: Millimeter,
        centering_coeff: Millimeter,
    ) -> Self {
        Observation {
            journal: journal.into(),
            from: from.into(),
            to: to.into(),
            delta_h,
            distance,
            n_setups,
            measurement_type: measurement_type.into(),
            distance_coeff,
            centering_coeff,
            ..Default::default()
        }
    }

    /// Mark the observation as excluded ("sluk") or not
    pub fn with_excluded(mut self, excluded: bool) -> Self {
        self.excluded = excluded;
        self
    }

    /// A-priori standard deviation of this observation, in millimeters
    pub fn apriori_deviation(&self) -> Result<Millimeter, LevelnetError> {
        apriori_deviation(
            &self.measurement_type,
            self.distance,
            self.n_setups,
            self.distance_coeff,
            self.centering_coeff,
        )
    }
}

/// Iterate over the observations that take part in the adjustment, in input order.
pub fn active(observations: &[Observation]) -> impl Iterator<Item = &Observation> {
    observations.iter().filter(|obs| !obs.excluded)
}
