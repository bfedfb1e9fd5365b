//! In-memory tracking service for tests.

use std::collections::HashSet;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use model::{
    route::{Route, RouteState},
    user::{Credential, Login, User},
    vehicle::Vehicle,
    waypoint::{Coordinate, Waypoint},
    WithId,
};
use serde_json::{json, Value};
use tracker::{ApiError, StatusCode, Tracker};
use utility::id::Id;

use crate::Stage;

pub const VEHICLE_ID: &str = "31";
pub const ROUTE_ID: &str = "9";

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Authenticate { username: String },
    CreateUser { admin: String, username: String },
    CreateVehicle { vehicle: Vehicle },
    CreateRoute { vehicle: String, state: RouteState },
    SetRouteState { route: String, state: RouteState },
    SubmitWaypoint { route: String, waypoint: Waypoint },
}

#[derive(Default)]
pub struct FakeTracker {
    calls: Mutex<Vec<Call>>,
    latency: Duration,
    rejected_waypoints: HashSet<usize>,
    failing: Option<Stage>,
}

pub fn coordinates(count: usize) -> Vec<Coordinate> {
    (0..count)
        .map(|i| Coordinate::new(57.0 + i as f64 * 0.001, 9.9 + i as f64 * 0.002))
        .collect()
}

fn rejected(endpoint: &str) -> ApiError {
    ApiError::Rejected {
        status_code: StatusCode::BAD_REQUEST,
        url: format!("http://tracker.test/services-1.0.0/{endpoint}"),
        message: Some("rejected by fake tracker".to_owned()),
    }
}

impl FakeTracker {
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Rejects the waypoint submitted at `index` (zero based).
    pub fn rejecting_waypoint(mut self, index: usize) -> Self {
        self.rejected_waypoints.insert(index);
        self
    }

    pub fn failing_at(mut self, stage: Stage) -> Self {
        self.failing = Some(stage);
        self
    }

    pub fn credential(&self) -> Credential {
        Credential::new("token-driver")
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn submitted(&self) -> Vec<Waypoint> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::SubmitWaypoint { waypoint, .. } => Some(waypoint),
                _ => None,
            })
            .collect()
    }

    /// Route states in the order the service was told about them.
    pub fn route_states(&self) -> Vec<RouteState> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::CreateRoute { state, .. } | Call::SetRouteState { state, .. } => {
                    Some(state)
                }
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) -> usize {
        let mut calls = self.calls.lock().unwrap();
        calls.push(call);
        calls.len()
    }

    fn check(&self, stage: Stage, endpoint: &str) -> Result<(), ApiError> {
        match self.failing {
            Some(failing) if failing == stage => Err(rejected(endpoint)),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl Tracker for FakeTracker {
    async fn authenticate(&self, login: &Login) -> Result<Credential, ApiError> {
        self.record(Call::Authenticate {
            username: login.username.clone(),
        });
        self.check(Stage::Authenticate, "auth")?;
        Ok(Credential::new(format!("token-{}", login.username)))
    }

    async fn create_user(&self, admin: &Credential, user: &User) -> Result<User, ApiError> {
        self.record(Call::CreateUser {
            admin: admin.token.clone(),
            username: user.username.clone(),
        });
        self.check(Stage::CreateUser, "user")?;
        Ok(User {
            password: None,
            ..user.clone()
        })
    }

    async fn create_vehicle(
        &self,
        _credential: &Credential,
        vehicle: &Vehicle,
    ) -> Result<WithId<Vehicle>, ApiError> {
        self.record(Call::CreateVehicle {
            vehicle: vehicle.clone(),
        });
        self.check(Stage::CreateVehicle, "vehicle")?;
        Ok(WithId::new(Id::new(VEHICLE_ID.to_owned()), vehicle.clone()))
    }

    async fn create_route(
        &self,
        _credential: &Credential,
        vehicle_id: &Id<Vehicle>,
        state: RouteState,
    ) -> Result<WithId<Route>, ApiError> {
        self.record(Call::CreateRoute {
            vehicle: vehicle_id.raw(),
            state,
        });
        self.check(Stage::CreateRoute, "route")?;
        Ok(WithId::new(
            Id::new(ROUTE_ID.to_owned()),
            Route::new(vehicle_id.clone(), state),
        ))
    }

    async fn set_route_state(
        &self,
        _credential: &Credential,
        route_id: &Id<Route>,
        state: RouteState,
    ) -> Result<Value, ApiError> {
        self.record(Call::SetRouteState {
            route: route_id.raw(),
            state,
        });
        self.check(Stage::ChangeRouteState, "route")?;
        Ok(json!({ "id": route_id.raw() }))
    }

    async fn submit_waypoint(
        &self,
        _credential: &Credential,
        route_id: &Id<Route>,
        waypoint: &Waypoint,
    ) -> Result<Value, ApiError> {
        let index = self.submitted().len();
        self.record(Call::SubmitWaypoint {
            route: route_id.raw(),
            waypoint: waypoint.clone(),
        });
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        if self.rejected_waypoints.contains(&index) {
            return Err(rejected("waypoint"));
        }
        Ok(json!({ "id": index }))
    }
}
