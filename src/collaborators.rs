//! # External collaborators
//!
//! The computation depends on two services it does not implement itself:
//!
//! * [`ConnectivityAnalysis`] – which points are connected to the network, given the current
//!   observations and fixed points. Free points are the connected points that are not fixed.
//! * [`ValidityLookup`] – the validity time ("as of") of the project's new heights.
//!
//! Both are injected into [`Levelnet`](crate::levelnet::Levelnet). Plain closures implement
//! them, which is how tests provide them:
//!
//! ```rust
//! use std::collections::BTreeSet;
//! use hifitime::Epoch;
//! use levelnet::collaborators::{ConnectivityAnalysis, ValidityLookup};
//! use levelnet::levelnet_errors::LevelnetError;
//!
//! let net = |_: &str| -> Result<BTreeSet<String>, LevelnetError> {
//!     Ok(["A", "B"].iter().map(|s| s.to_string()).collect())
//! };
//! let clock = |_: &str| -> Result<Epoch, LevelnetError> {
//!     Ok(Epoch::from_gregorian_utc_at_midnight(2024, 1, 1))
//! };
//! assert_eq!(net.connected_points("demo").unwrap().len(), 2);
//! assert!(clock.valid_at("demo").is_ok());
//! ```
use std::collections::BTreeSet;

use hifitime::Epoch;

use crate::{constants::PointId, levelnet_errors::LevelnetError};

pub trait ConnectivityAnalysis {
    /// Points connected in the network graph of `project`
    fn connected_points(&self, project: &str) -> Result<BTreeSet<PointId>, LevelnetError>;
}

impl<F> ConnectivityAnalysis for F
where
    F: Fn(&str) -> Result<BTreeSet<PointId>, LevelnetError>,
{
    fn connected_points(&self, project: &str) -> Result<BTreeSet<PointId>, LevelnetError> {
        self(project)
    }
}

pub trait ValidityLookup {
    /// Validity time of the heights computed for `project`
    fn valid_at(&self, project: &str) -> Result<Epoch, LevelnetError>;
}

impl<F> ValidityLookup for F
where
    F: Fn(&str) -> Result<Epoch, LevelnetError>,
{
    fn valid_at(&self, project: &str) -> Result<Epoch, LevelnetError> {
        self(project)
    }
}

/// A validity lookup that always answers the same epoch
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedValidity(pub Epoch);

impl ValidityLookup for FixedValidity {
    fn valid_at(&self, _project: &str) -> Result<Epoch, LevelnetError> {
        Ok(self.0)
    }
}
