//! # Solver output reader
//!
//! Parses the `gama-local` XML result. Only two parts of the document are used:
//!
//! ```text
//! gama-local-adjustment
//! └── coordinates
//!     ├── adjusted/point*   { id, z }
//!     └── cov-mat/flt*      variances (diagonal, cov-band 0)
//! ```
//!
//! The `i`-th variance is taken to belong to the `i`-th adjusted point. The solver's own
//! documentation is ambiguous on this point (its XML hints at a permutation through
//! `original-index`), but this order is the one its HTML report presents, and it is the order
//! used here. Only the cardinality of the two lists is checked.
use camino::Utf8Path;
use hifitime::Epoch;
use quick_xml::de::from_str;
use serde::Deserialize;

use crate::{
    collaborators::ValidityLookup,
    constants::{Meter, PointId},
    levelnet_errors::LevelnetError,
};

#[derive(Debug, Deserialize)]
struct GamaLocalAdjustment {
    coordinates: Coordinates,
}

#[derive(Debug, Deserialize)]
struct Coordinates {
    #[serde(default)]
    adjusted: Adjusted,
    #[serde(rename = "cov-mat", default)]
    cov_mat: CovMat,
}

#[derive(Debug, Default, Deserialize)]
struct Adjusted {
    #[serde(rename = "point", default)]
    points: Vec<GamaPoint>,
}

#[derive(Debug, Deserialize)]
struct GamaPoint {
    id: String,
    #[serde(alias = "Z")]
    z: f64,
}

#[derive(Debug, Default, Deserialize)]
struct CovMat {
    #[serde(rename = "flt", default)]
    flt: Vec<f64>,
}

/// One adjusted point with its height and variance, in solver order
#[derive(Debug, Clone, PartialEq)]
pub struct AdjustedPoint {
    pub point: PointId,
    pub height: Meter,
    pub variance: f64,
}

/// Parse the solver result document.
///
/// Return
/// ----------
/// * The adjusted points with their variances, in solver order.
/// * [`LevelnetError::ResultCardinalityMismatch`] if the number of adjusted heights differs
///   from the number of variances.
/// * [`LevelnetError::XmlDeError`] if the document does not have the expected shape.
pub fn parse_gama_result(xml: &str) -> Result<Vec<AdjustedPoint>, LevelnetError> {
    let doc: GamaLocalAdjustment = from_str(xml)?;
    let points = doc.coordinates.adjusted.points;
    let variances = doc.coordinates.cov_mat.flt;

    if points.len() != variances.len() {
        return Err(LevelnetError::ResultCardinalityMismatch {
            heights: points.len(),
            variances: variances.len(),
        });
    }

    Ok(points
        .into_iter()
        .zip(variances)
        .map(|(p, variance)| AdjustedPoint {
            point: p.id,
            height: p.z,
            variance,
        })
        .collect())
}

/// Read and parse the solver result file.
pub fn read_gama_result(path: &Utf8Path) -> Result<Vec<AdjustedPoint>, LevelnetError> {
    let xml = std::fs::read_to_string(path)?;
    parse_gama_result(&xml)
}

/// Read the solver result and look up the validity time of the project.
///
/// Return
/// ----------
/// * `(adjusted points, validity time)`.
pub fn read_gama_output<V: ValidityLookup + ?Sized>(
    path: &Utf8Path,
    project: &str,
    validity: &V,
) -> Result<(Vec<AdjustedPoint>, Epoch), LevelnetError> {
    let adjusted = read_gama_result(path)?;
    log::info!("Read {} adjusted heights from {path}", adjusted.len());
    let valid_at = validity.valid_at(project)?;
    Ok((adjusted, valid_at))
}
