use std::error;
use std::fmt;

use serde::Serialize;
use tracker::ApiError;
use waypoints::SourceError;

pub mod config;
pub mod delivery;
pub mod pacing;
pub mod profile;
pub mod run;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

pub use run::{run, RunSummary};

use pacing::PacingError;
use session::LifecycleError;

/// Provisioning step that failed. Used to tell the operator what was not
/// created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    CreateUser,
    Authenticate,
    CreateVehicle,
    CreateRoute,
    ChangeRouteState,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Stage::CreateUser => write!(f, "New User NOT Created"),
            Stage::Authenticate => write!(f, "User NOT Authenticated"),
            Stage::CreateVehicle => write!(f, "Vehicle NOT Created"),
            Stage::CreateRoute => write!(f, "Route NOT Created"),
            Stage::ChangeRouteState => write!(f, "Route State NOT Changed"),
        }
    }
}

/// Everything that ends a simulation run. A rejected waypoint is not in
/// here, the delivery loop carries on after it.
#[derive(Debug, Clone)]
pub enum SimulationError {
    Source(SourceError),
    Pacing(PacingError),
    Setup { stage: Stage, error: ApiError },
    Lifecycle(LifecycleError),
}

impl SimulationError {
    pub fn setup(stage: Stage) -> impl FnOnce(ApiError) -> Self {
        move |error| SimulationError::Setup { stage, error }
    }
}

impl error::Error for SimulationError {}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SimulationError::Source(e) => write!(f, "{}", e),
            SimulationError::Pacing(e) => write!(f, "{}", e),
            SimulationError::Setup { stage, error } => match error.message() {
                Some(message) => write!(f, "{}: {}", stage, message),
                None => write!(f, "{}: {}", stage, error),
            },
            SimulationError::Lifecycle(e) => write!(f, "{}", e),
        }
    }
}

impl From<SourceError> for SimulationError {
    fn from(e: SourceError) -> Self {
        SimulationError::Source(e)
    }
}

impl From<PacingError> for SimulationError {
    fn from(e: PacingError) -> Self {
        SimulationError::Pacing(e)
    }
}

impl From<LifecycleError> for SimulationError {
    fn from(e: LifecycleError) -> Self {
        SimulationError::Lifecycle(e)
    }
}

/// Pretty printed json for the log.
pub(crate) fn pretty<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("<{e}>"))
}
