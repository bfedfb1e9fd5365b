use std::error;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use model::{
    route::{Route, RouteState},
    user::{Credential, Login, User},
    vehicle::Vehicle,
    waypoint::Waypoint,
    WithId,
};
use serde_json::Value;
use utility::id::Id;

pub mod client;

pub use client::{TrackerClient, TrackerConfig};
pub use reqwest::StatusCode;

#[derive(Debug, Clone)]
pub enum ApiError {
    RequestError(Arc<reqwest::Error>),
    JsonError(Arc<serde_json::Error>),
    InvalidUrl(String),
    /// The service answered with something other than `200 OK`.
    Rejected {
        status_code: reqwest::StatusCode,
        url: String,
        message: Option<String>,
    },
}

impl ApiError {
    /// The reason given by the service, if it gave one.
    pub fn message(&self) -> Option<&str> {
        match self {
            ApiError::Rejected { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

impl error::Error for ApiError {}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ApiError::RequestError(e) => write!(f, "HTTP request error: {}", e),
            ApiError::JsonError(e) => write!(f, "JSON parse error: {}", e),
            ApiError::InvalidUrl(e) => write!(f, "Invalid URL: {}", e),
            ApiError::Rejected {
                status_code,
                url,
                message,
            } => match message {
                Some(text) => {
                    write!(f, "Rejected ({}) {}: {}", status_code, url, text)
                }
                None => write!(f, "Rejected ({}) {}", status_code, url),
            },
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        ApiError::RequestError(Arc::new(e))
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::JsonError(Arc::new(e))
    }
}

/// Operations of the tracking service used by the simulator. Every call
/// except `authenticate` needs the credential handed out by it.
#[async_trait]
pub trait Tracker: Send + Sync {
    /// `POST /auth`
    async fn authenticate(&self, login: &Login) -> Result<Credential, ApiError>;

    /// `POST /user`, requires an administrator's credential.
    async fn create_user(
        &self,
        admin: &Credential,
        user: &User,
    ) -> Result<User, ApiError>;

    /// `POST /vehicle`
    async fn create_vehicle(
        &self,
        credential: &Credential,
        vehicle: &Vehicle,
    ) -> Result<WithId<Vehicle>, ApiError>;

    /// `POST /route`
    async fn create_route(
        &self,
        credential: &Credential,
        vehicle_id: &Id<Vehicle>,
        state: RouteState,
    ) -> Result<WithId<Route>, ApiError>;

    /// `PUT /route/{id}`. The answer is only logged, so it is kept as
    /// plain json.
    async fn set_route_state(
        &self,
        credential: &Credential,
        route_id: &Id<Route>,
        state: RouteState,
    ) -> Result<Value, ApiError>;

    /// `POST /route/{id}/waypoint`. The answer is only logged, so it is kept
    /// as plain json.
    async fn submit_waypoint(
        &self,
        credential: &Credential,
        route_id: &Id<Route>,
        waypoint: &Waypoint,
    ) -> Result<Value, ApiError>;
}
