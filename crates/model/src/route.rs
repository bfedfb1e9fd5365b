use std::fmt;

use serde::{Deserialize, Serialize};
use utility::id::{HasId, Id};

use crate::vehicle::Vehicle;

/// Lifecycle of a route on the tracking service. A route only ever moves
/// forward: `Created` -> `Active` -> `Complete`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RouteState {
    Created,
    Active,
    Complete,
}

impl RouteState {
    /// The only state this one may transition to.
    pub fn successor(&self) -> Option<RouteState> {
        match self {
            Self::Created => Some(Self::Active),
            Self::Active => Some(Self::Complete),
            Self::Complete => None,
        }
    }
}

impl fmt::Display for RouteState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Created => write!(f, "CREATED"),
            Self::Active => write!(f, "ACTIVE"),
            Self::Complete => write!(f, "COMPLETE"),
        }
    }
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    #[serde(
        rename = "vehicleid",
        default,
        deserialize_with = "utility::serde::id::deserialize_option"
    )]
    pub vehicle_id: Option<Id<Vehicle>>,
    pub route_state: RouteState,
}

impl Route {
    pub fn new(vehicle_id: Id<Vehicle>, route_state: RouteState) -> Self {
        Self {
            vehicle_id: Some(vehicle_id),
            route_state,
        }
    }

    /// Body of a state change request, which only carries the state.
    pub fn state_change(route_state: RouteState) -> Self {
        Self {
            vehicle_id: None,
            route_state,
        }
    }
}

impl HasId for Route {
    type IdType = String;
}
