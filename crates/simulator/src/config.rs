use std::path::PathBuf;

use model::user::Login;
use waypoints::{
    choice::{FirstCandidate, InteractiveChooser, RouteChooser},
    directions::{DirectionsConfig, DirectionsSource},
    track::TrackFileSource,
    SourceError, WaypointSource,
};

use crate::session::Account;

pub const DEFAULT_ADMIN_USERNAME: &str = "deadpool";
pub const DEFAULT_ADMIN_PASSWORD: &str = "hunter2";

/// Everything a run needs besides the tracker and the waypoints.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    pub account: Account,
    /// Seconds between two waypoints. Absent or not positive means the
    /// delay is derived from the route duration.
    pub delay: Option<f64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            account: Account::Create {
                admin: Login::new(DEFAULT_ADMIN_USERNAME, DEFAULT_ADMIN_PASSWORD),
            },
            delay: None,
        }
    }
}

/// Where the waypoints come from.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceSelection {
    Track(PathBuf),
    Directions {
        start: String,
        end: String,
        non_interactive: bool,
    },
}

impl SourceSelection {
    pub fn source(
        &self,
        directions: &DirectionsConfig,
    ) -> Result<Box<dyn WaypointSource>, SourceError> {
        match self {
            SourceSelection::Track(path) => Ok(Box::new(TrackFileSource::new(path))),
            SourceSelection::Directions {
                start,
                end,
                non_interactive,
            } => {
                let chooser: Box<dyn RouteChooser> = if *non_interactive {
                    Box::new(FirstCandidate)
                } else {
                    Box::new(InteractiveChooser::stdio())
                };
                let source = DirectionsSource::new(directions, start, end, chooser)?;
                Ok(Box::new(source))
            }
        }
    }
}
