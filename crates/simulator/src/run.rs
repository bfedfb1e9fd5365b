use rand::Rng;

use model::route::{Route, RouteState};
use tracker::Tracker;
use utility::id::Id;
use waypoints::WaypointSource;

use crate::{
    config::SimulationConfig,
    delivery::DeliveryReport,
    pacing::PacingPlan,
    profile::ProfileGenerator,
    session::Session,
    SimulationError,
};

/// What a finished run did.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub route_id: Id<Route>,
    pub states: Vec<RouteState>,
    pub report: DeliveryReport,
}

/// Drives one route from start to end: fetch the waypoints, provision a
/// user, vehicle and route, then replay the waypoints while the route is
/// active. Any failure before the delivery ends the run, rejected waypoints
/// do not.
pub async fn run<T, S, R>(
    tracker: &T,
    source: &mut S,
    config: &SimulationConfig,
    profiles: &mut ProfileGenerator<R>,
) -> Result<RunSummary, SimulationError>
where
    T: Tracker + ?Sized,
    S: WaypointSource + ?Sized,
    R: Rng,
{
    let plan = source.produce().await?;
    let pacing = PacingPlan::derive(config.delay, plan.duration_seconds, plan.len())?;
    log::info!(
        "Route has {} waypoints over {:.2} km, sending one every {:.3} s.",
        plan.len(),
        plan.length_km(),
        pacing.delay_seconds()
    );

    let session = Session::open(tracker, &config.account, profiles).await?;
    let vehicle_id = session.register_vehicle(profiles).await?;
    let mut route = session.create_route(&vehicle_id).await?;

    session.transition(&mut route, RouteState::Active).await?;
    let report = session.deliver(&route, &plan.points, &pacing).await?;
    if report.rejected() > 0 {
        log::warn!(
            "{} of {} waypoints were not created.",
            report.rejected(),
            plan.len()
        );
    }
    session.transition(&mut route, RouteState::Complete).await?;

    Ok(RunSummary {
        route_id: route.id().clone(),
        states: route.history().to_vec(),
        report,
    })
}
