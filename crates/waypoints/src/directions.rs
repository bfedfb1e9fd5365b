use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use model::waypoint::Coordinate;

use crate::{
    choice::{Candidate, ChoiceError, RouteChooser},
    polyline::{self, PolylineError},
    SourceError, WaypointPlan, WaypointSource,
};

pub const GOOGLE_MAPS_URL: &str = "https://maps.googleapis.com";
pub const API_KEY_VARIABLE: &str = "GOOGLE_MAPS_API_KEY";

const DIRECTIONS_ENDPOINT: &str = "maps/api/directions/json";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectionsConfig {
    pub api_key: Option<String>,
    pub base_url: String,
}

impl Default for DirectionsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: GOOGLE_MAPS_URL.to_owned(),
        }
    }
}

/* - GOOGLE DIRECTIONS API */

#[derive(Debug, Clone, Deserialize)]
pub struct DirectionsResponse {
    pub status: String,
    pub error_message: Option<String>,
    #[serde(default)]
    pub routes: Vec<DirectionsRoute>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DirectionsRoute {
    #[serde(default)]
    pub summary: String,
    pub legs: Vec<Leg>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Leg {
    pub distance: Quantity,
    pub duration: Quantity,
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// A value in SI units (metres, seconds) with its human readable text.
#[derive(Debug, Clone, Deserialize)]
pub struct Quantity {
    pub value: f64,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Step {
    pub polyline: EncodedPolyline,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EncodedPolyline {
    pub points: String,
}

impl DirectionsRoute {
    pub fn distance_km(&self) -> f64 {
        self.legs.iter().map(|leg| leg.distance.value).sum::<f64>() / 1000.0
    }

    pub fn duration_seconds(&self) -> f64 {
        self.legs.iter().map(|leg| leg.duration.value).sum()
    }

    /// All steps of all legs, decoded and concatenated in driving order.
    pub fn coordinates(&self) -> Result<Vec<Coordinate>, PolylineError> {
        let mut coordinates = Vec::new();
        for step in self.legs.iter().flat_map(|leg| leg.steps.iter()) {
            coordinates.extend(polyline::decode(&step.polyline.points, polyline::PRECISION)?);
        }
        Ok(coordinates)
    }

    pub fn candidate(&self) -> Candidate {
        Candidate {
            summary: self.summary.clone(),
            distance_km: self.distance_km(),
        }
    }
}

/// Picks the candidate to drive. The chooser is only asked when there is
/// something to choose from.
pub fn select_route(
    routes: &[DirectionsRoute],
    chooser: &mut dyn RouteChooser,
) -> Result<usize, SourceError> {
    match routes.len() {
        0 => Err(SourceError::NoRoutes),
        1 => Ok(0),
        len => {
            let candidates = routes.iter().map(|route| route.candidate()).collect::<Vec<_>>();
            let index = chooser.choose(&candidates)?;
            if index < len {
                Ok(index)
            } else {
                Err(ChoiceError::OutOfRange {
                    index,
                    candidates: len,
                }
                .into())
            }
        }
    }
}

/// Driving directions between two locations (addresses or `lat,lng`).
pub struct DirectionsSource {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    start: String,
    end: String,
    chooser: Box<dyn RouteChooser>,
}

impl DirectionsSource {
    pub fn new<S: Into<String>, E: Into<String>>(
        config: &DirectionsConfig,
        start: S,
        end: E,
        chooser: Box<dyn RouteChooser>,
    ) -> Result<Self, SourceError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or(SourceError::MissingApiKey)?;
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            start: start.into(),
            end: end.into(),
            chooser,
        })
    }

    pub async fn directions(&self) -> Result<Vec<DirectionsRoute>, SourceError> {
        let url = format!("{}/{}", self.base_url, DIRECTIONS_ENDPOINT);
        log::info!("Requesting directions from '{}' to '{}'.", self.start, self.end);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("origin", self.start.as_str()),
                ("destination", self.end.as_str()),
                ("mode", "driving"),
                ("alternatives", "true"),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let status_code = response.status();
        let text = response.text().await?;
        if !status_code.is_success() {
            return Err(SourceError::Provider {
                status: status_code.to_string(),
                message: Some(text).filter(|text| !text.trim().is_empty()),
            });
        }

        let directions: DirectionsResponse = serde_json::from_str(&text)?;
        match directions.status.as_str() {
            "OK" => Ok(directions.routes),
            "ZERO_RESULTS" => Ok(Vec::new()),
            _ => Err(SourceError::Provider {
                status: directions.status,
                message: directions.error_message,
            }),
        }
    }
}

#[async_trait]
impl WaypointSource for DirectionsSource {
    async fn produce(&mut self) -> Result<WaypointPlan, SourceError> {
        let routes = self.directions().await?;
        let index = select_route(&routes, self.chooser.as_mut())?;
        let route = &routes[index];

        let plan = WaypointPlan::new(route.coordinates()?, route.duration_seconds());
        log::info!(
            "Using route #{} '{}': {} points, {:.2} km, {} s.",
            index,
            route.summary,
            plan.len(),
            route.distance_km(),
            plan.duration_seconds
        );
        Ok(plan)
    }
}
