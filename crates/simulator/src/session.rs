use std::error;
use std::fmt;

use rand::Rng;

use model::{
    route::{Route, RouteState},
    user::{Credential, Login},
    vehicle::Vehicle,
    waypoint::Coordinate,
};
use tracker::Tracker;
use utility::id::Id;

use crate::{
    delivery::{self, DeliveryReport},
    pacing::PacingPlan,
    pretty,
    profile::ProfileGenerator,
    SimulationError, Stage,
};

/// Who the run acts as.
#[derive(Debug, Clone)]
pub enum Account {
    /// Log in as a user that already exists.
    Existing(Login),
    /// Create a fresh user with the administrator's credential first.
    Create { admin: Login },
}

#[derive(Debug, Clone, PartialEq)]
pub enum LifecycleError {
    InvalidTransition { from: RouteState, to: RouteState },
    NotActive(RouteState),
}

impl error::Error for LifecycleError {}

impl fmt::Display for LifecycleError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LifecycleError::InvalidTransition { from, to } => {
                write!(f, "Route cannot go from {} to {}", from, to)
            }
            LifecycleError::NotActive(state) => {
                write!(f, "Waypoints need an ACTIVE route, it is {}", state)
            }
        }
    }
}

/// A route created during this run and the states it went through.
#[derive(Debug, Clone)]
pub struct RouteHandle {
    id: Id<Route>,
    state: RouteState,
    history: Vec<RouteState>,
}

impl RouteHandle {
    pub fn id(&self) -> &Id<Route> {
        &self.id
    }

    pub fn state(&self) -> RouteState {
        self.state
    }

    pub fn history(&self) -> &[RouteState] {
        &self.history
    }
}

/// An authenticated connection to the tracking service.
pub struct Session<'a, T: Tracker + ?Sized> {
    tracker: &'a T,
    credential: Credential,
    username: String,
}

impl<'a, T: Tracker + ?Sized> Session<'a, T> {
    pub async fn open<R: Rng>(
        tracker: &'a T,
        account: &Account,
        profiles: &mut ProfileGenerator<R>,
    ) -> Result<Session<'a, T>, SimulationError> {
        let login = match account {
            Account::Existing(login) => login.clone(),
            Account::Create { admin } => {
                let admin_credential = tracker
                    .authenticate(admin)
                    .await
                    .map_err(SimulationError::setup(Stage::Authenticate))?;
                let user = profiles.user();
                let created = tracker
                    .create_user(&admin_credential, &user)
                    .await
                    .map_err(SimulationError::setup(Stage::CreateUser))?;
                log::info!("New User Created:\n{}", pretty(&created));
                Login::new(created.username, profiles.password())
            }
        };

        let credential = tracker
            .authenticate(&login)
            .await
            .map_err(SimulationError::setup(Stage::Authenticate))?;
        log::info!("User Authenticated: {}", login.username);

        Ok(Session {
            tracker,
            credential,
            username: login.username,
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub async fn register_vehicle<R: Rng>(
        &self,
        profiles: &mut ProfileGenerator<R>,
    ) -> Result<Id<Vehicle>, SimulationError> {
        let vehicle = profiles.vehicle();
        let created = self
            .tracker
            .create_vehicle(&self.credential, &vehicle)
            .await
            .map_err(SimulationError::setup(Stage::CreateVehicle))?;
        log::info!("Vehicle Created:\n{}", pretty(&created));
        Ok(created.id)
    }

    pub async fn create_route(
        &self,
        vehicle_id: &Id<Vehicle>,
    ) -> Result<RouteHandle, SimulationError> {
        let state = RouteState::Created;
        let created = self
            .tracker
            .create_route(&self.credential, vehicle_id, state)
            .await
            .map_err(SimulationError::setup(Stage::CreateRoute))?;
        log::info!("Route Created:\n{}", pretty(&created));
        Ok(RouteHandle {
            id: created.id,
            state,
            history: vec![state],
        })
    }

    /// Moves the route on to `state`, which has to be the next state of its
    /// lifecycle. Anything else fails without contacting the service.
    pub async fn transition(
        &self,
        route: &mut RouteHandle,
        state: RouteState,
    ) -> Result<(), SimulationError> {
        if route.state.successor() != Some(state) {
            return Err(LifecycleError::InvalidTransition {
                from: route.state,
                to: state,
            }
            .into());
        }

        let changed = self
            .tracker
            .set_route_state(&self.credential, &route.id, state)
            .await
            .map_err(SimulationError::setup(Stage::ChangeRouteState))?;
        log::info!("Route State Changed:\n{}", pretty(&changed));

        route.state = state;
        route.history.push(state);
        Ok(())
    }

    pub async fn deliver(
        &self,
        route: &RouteHandle,
        points: &[Coordinate],
        pacing: &PacingPlan,
    ) -> Result<DeliveryReport, SimulationError> {
        if route.state != RouteState::Active {
            return Err(LifecycleError::NotActive(route.state).into());
        }
        Ok(delivery::deliver(self.tracker, &self.credential, &route.id, points, pacing).await)
    }
}
