use std::error;
use std::fmt;
use std::io;
use std::sync::Arc;

use async_trait::async_trait;
use model::waypoint::Coordinate;

pub mod choice;
pub mod directions;
pub mod polyline;
pub mod track;

use choice::ChoiceError;
use polyline::PolylineError;

/// Ordered points of a route together with the time the whole route is
/// expected to take.
#[derive(Debug, Clone, PartialEq)]
pub struct WaypointPlan {
    pub points: Vec<Coordinate>,
    pub duration_seconds: f64,
}

impl WaypointPlan {
    pub fn new(points: Vec<Coordinate>, duration_seconds: f64) -> Self {
        Self {
            points,
            duration_seconds,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn length_km(&self) -> f64 {
        utility::geo::path_length(self.points.iter().map(|&point| point.into()))
    }
}

/// Anything that can produce the points to drive along.
#[async_trait]
pub trait WaypointSource: Send {
    async fn produce(&mut self) -> Result<WaypointPlan, SourceError>;
}

#[derive(Debug, Clone)]
pub enum SourceError {
    /// The directions source was selected without an api key.
    MissingApiKey,
    RequestError(Arc<reqwest::Error>),
    JsonError(Arc<serde_json::Error>),
    /// The directions provider answered but refused the query.
    Provider {
        status: String,
        message: Option<String>,
    },
    NoRoutes,
    Polyline(PolylineError),
    Io(Arc<io::Error>),
    Gpx(Arc<serde_xml_rs::Error>),
    NoTrack,
    Choice(ChoiceError),
}

impl error::Error for SourceError {}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SourceError::MissingApiKey => write!(
                f,
                "Google Maps API key must be in environment variables as: {}",
                directions::API_KEY_VARIABLE
            ),
            SourceError::RequestError(e) => write!(f, "HTTP request error: {}", e),
            SourceError::JsonError(e) => write!(f, "JSON parse error: {}", e),
            SourceError::Provider { status, message } => match message {
                Some(text) => write!(f, "Directions query failed ({}): {}", status, text),
                None => write!(f, "Directions query failed ({})", status),
            },
            SourceError::NoRoutes => write!(f, "No route found."),
            SourceError::Polyline(e) => write!(f, "Polyline error: {}", e),
            SourceError::Io(e) => write!(f, "IO error: {}", e),
            SourceError::Gpx(e) => write!(f, "GPX parse error: {}", e),
            SourceError::NoTrack => write!(f, "GPX file contains no track."),
            SourceError::Choice(e) => write!(f, "{}", e),
        }
    }
}

impl From<reqwest::Error> for SourceError {
    fn from(e: reqwest::Error) -> Self {
        SourceError::RequestError(Arc::new(e))
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(e: serde_json::Error) -> Self {
        SourceError::JsonError(Arc::new(e))
    }
}

impl From<serde_xml_rs::Error> for SourceError {
    fn from(e: serde_xml_rs::Error) -> Self {
        SourceError::Gpx(Arc::new(e))
    }
}

impl From<io::Error> for SourceError {
    fn from(e: io::Error) -> Self {
        SourceError::Io(Arc::new(e))
    }
}

impl From<PolylineError> for SourceError {
    fn from(e: PolylineError) -> Self {
        SourceError::Polyline(e)
    }
}

impl From<ChoiceError> for SourceError {
    fn from(e: ChoiceError) -> Self {
        SourceError::Choice(e)
    }
}
