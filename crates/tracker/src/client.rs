use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, StatusCode, Url};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use model::{
    route::{Route, RouteState},
    user::{Credential, Login, User},
    vehicle::Vehicle,
    waypoint::Waypoint,
    WithId,
};
use utility::id::Id;

use crate::{ApiError, Tracker};

pub const DEFAULT_SERVER: &str = "http://sw708e16.cs.aau.dk";
pub const DEFAULT_SERVICE_PREFIX: &str = "/services-1.0.0";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackerConfig {
    pub server: String,
    pub service_prefix: String,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            server: DEFAULT_SERVER.to_owned(),
            service_prefix: DEFAULT_SERVICE_PREFIX.to_owned(),
        }
    }
}

impl TrackerConfig {
    pub fn new<S: Into<String>, P: Into<String>>(server: S, service_prefix: P) -> Self {
        Self {
            server: server.into(),
            service_prefix: service_prefix.into(),
        }
    }

    /// The prefix is joined like an absolute path, so a path already present
    /// in the server url is replaced by it.
    pub fn base_url(&self) -> Result<Url, ApiError> {
        let server = Url::parse(&self.server)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", self.server, e)))?;
        server
            .join(&self.service_prefix)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", self.service_prefix, e)))
    }
}

/// Body of error responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

pub struct TrackerClient {
    inner: reqwest::Client,
    base: String,
}

impl TrackerClient {
    pub fn new(config: &TrackerConfig) -> Result<Self, ApiError> {
        let inner = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        let base = config.base_url()?.as_str().trim_end_matches('/').to_owned();

        Ok(Self { inner, base })
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Send a json body to an endpoint and parse the json answer.
    async fn send<B, T>(
        &self,
        method: Method,
        endpoint: &str,
        credential: Option<&Credential>,
        body: &B,
    ) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let url = format!("{}/{}", self.base, endpoint);
        log::debug!("{method} {url}");

        let mut request = self.inner.request(method, &url).json(body);
        if let Some(credential) = credential {
            request = request.header(
                reqwest::header::AUTHORIZATION,
                credential.authorization(),
            );
        }
        let response = request.send().await?;

        match response.status() {
            StatusCode::OK => {
                let text = response.text().await?;
                // an empty answer reads as `null`
                let text = match text.trim() {
                    "" => "null",
                    text => text,
                };
                Ok(serde_json::from_str(text)?)
            }
            other => {
                let message = response
                    .text()
                    .await
                    .ok()
                    .and_then(|text| error_message(&text));
                Err(ApiError::Rejected {
                    status_code: other,
                    url,
                    message,
                })
            }
        }
    }
}

/// Prefer the `message` field of an error body, fall back to the raw text.
fn error_message(text: &str) -> Option<String> {
    match serde_json::from_str::<ErrorBody>(text) {
        Ok(body) => Some(body.message),
        Err(_) if text.trim().is_empty() => None,
        Err(_) => Some(text.trim().to_owned()),
    }
}

#[async_trait]
impl Tracker for TrackerClient {
    async fn authenticate(&self, login: &Login) -> Result<Credential, ApiError> {
        self.send(Method::POST, "auth", None, login).await
    }

    async fn create_user(
        &self,
        admin: &Credential,
        user: &User,
    ) -> Result<User, ApiError> {
        self.send(Method::POST, "user", Some(admin), user).await
    }

    async fn create_vehicle(
        &self,
        credential: &Credential,
        vehicle: &Vehicle,
    ) -> Result<WithId<Vehicle>, ApiError> {
        self.send(Method::POST, "vehicle", Some(credential), vehicle)
            .await
    }

    async fn create_route(
        &self,
        credential: &Credential,
        vehicle_id: &Id<Vehicle>,
        state: RouteState,
    ) -> Result<WithId<Route>, ApiError> {
        let route = Route::new(vehicle_id.clone(), state);
        self.send(Method::POST, "route", Some(credential), &route)
            .await
    }

    async fn set_route_state(
        &self,
        credential: &Credential,
        route_id: &Id<Route>,
        state: RouteState,
    ) -> Result<Value, ApiError> {
        let change = Route::state_change(state);
        self.send(
            Method::PUT,
            &format!("route/{route_id}"),
            Some(credential),
            &change,
        )
        .await
    }

    async fn submit_waypoint(
        &self,
        credential: &Credential,
        route_id: &Id<Route>,
        waypoint: &Waypoint,
    ) -> Result<Value, ApiError> {
        self.send(
            Method::POST,
            &format!("route/{route_id}/waypoint"),
            Some(credential),
            waypoint,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_replaces_server_path() {
        let config = TrackerConfig::new("http://example.org/ignored/", "/services-1.0.0");
        assert_eq!(
            config.base_url().unwrap().as_str(),
            "http://example.org/services-1.0.0"
        );
    }

    #[test]
    fn invalid_server_url() {
        let config = TrackerConfig::new("not a url", "/services-1.0.0");
        assert!(matches!(config.base_url(), Err(ApiError::InvalidUrl(_))));
    }

    #[test]
    fn error_message_extraction() {
        assert_eq!(
            error_message(r#"{"message": "Invalid credentials"}"#).as_deref(),
            Some("Invalid credentials")
        );
        assert_eq!(error_message("Bad Gateway\n").as_deref(), Some("Bad Gateway"));
        assert_eq!(error_message("  "), None);
    }
}
