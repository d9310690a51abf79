use std::time::Duration;

use camino::Utf8PathBuf;
use thiserror::Error;

use crate::constants::PointId;

#[derive(Error, Debug)]
pub enum LevelnetError {
    #[error("Unknown measurement type: {0}")]
    InvalidMeasurementType(String),

    #[error("Invalid observation geometry: negative distance {0} m")]
    InvalidGeometry(f64),

    #[error("At least one point must be held fixed in a computation")]
    NoFixedPoints,

    #[error("Fixed point {0} has no height to hold")]
    MissingFixedHeight(PointId),

    #[error(
        "Adjustment not completed (see {report}). Check that the network is connected, \
         and for several networks that each one has a fixed point"
    )]
    AdjustmentFailed { report: Utf8PathBuf },

    #[error("Adjustment produced a result but reported failure, check {report}")]
    AdjustmentSoftFailure { report: Utf8PathBuf },

    #[error("Adjustment did not finish within {timeout:?}")]
    AdjustmentTimeout { timeout: Duration },

    #[error("Mismatch between number of heights ({heights}) and variances ({variances})")]
    ResultCardinalityMismatch { heights: usize, variances: usize },

    #[error("Sheet not found in workbook: {0}")]
    MissingSheet(String),

    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Unable to parse adjustment result: {0}")]
    XmlDeError(#[from] quick_xml::DeError),

    #[error("XML error: {0}")]
    XmlError(#[from] quick_xml::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] toml::de::Error),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Generated document is not valid UTF-8: {0}")]
    Utf8Error(#[from] std::string::FromUtf8Error),

    #[error("Collaborator failure: {0}")]
    CollaboratorError(String),
}

impl PartialEq for LevelnetError {
    fn eq(&self, other: &Self) -> bool {
        use LevelnetError::*;
        match (self, other) {
            (InvalidMeasurementType(a), InvalidMeasurementType(b)) => a == b,
            (InvalidGeometry(a), InvalidGeometry(b)) => a == b,
            (MissingFixedHeight(a), MissingFixedHeight(b)) => a == b,
            (AdjustmentFailed { report: a }, AdjustmentFailed { report: b }) => a == b,
            (AdjustmentSoftFailure { report: a }, AdjustmentSoftFailure { report: b }) => a == b,
            (AdjustmentTimeout { timeout: a }, AdjustmentTimeout { timeout: b }) => a == b,
            (
                ResultCardinalityMismatch {
                    heights: h1,
                    variances: v1,
                },
                ResultCardinalityMismatch {
                    heights: h2,
                    variances: v2,
                },
            ) => h1 == h2 && v1 == v2,
            (MissingSheet(a), MissingSheet(b)) => a == b,
            (InvalidParameter(a), InvalidParameter(b)) => a == b,
            (CollaboratorError(a), CollaboratorError(b)) => a == b,

            // Foreign errors are not comparable: same variant is enough
            (IoError(_), IoError(_)) => true,
            (XmlDeError(_), XmlDeError(_)) => true,
            (XmlError(_), XmlError(_)) => true,
            (Utf8Error(_), Utf8Error(_)) => true,
            (InvalidConfig(_), InvalidConfig(_)) => true,

            (NoFixedPoints, NoFixedPoints) => true,

            _ => false,
        }
    }
}
