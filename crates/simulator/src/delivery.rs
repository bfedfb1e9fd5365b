use std::fmt;

use tokio::time::{sleep, Instant};

use model::{
    route::Route,
    user::Credential,
    waypoint::{Coordinate, Waypoint},
};
use serde_json::Value;
use tracker::{ApiError, Tracker};
use utility::id::Id;

use crate::{pacing::PacingPlan, pretty};

/// Progress line printed after a waypoint was created.
#[derive(Debug, Clone, PartialEq)]
pub struct Progress {
    pub sent: usize,
    pub total: usize,
    pub time_left: chrono::Duration,
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} out of {} | estimated time left: {}",
            self.sent,
            self.total,
            clock(&self.time_left)
        )
    }
}

/// `H:MM:SS`, with microseconds only when there are any and whole days in
/// front (`2 days, 1:02:03`) once the hours reach 24.
fn clock(duration: &chrono::Duration) -> String {
    let micros = duration.num_microseconds().unwrap_or(i64::MAX).max(0);
    let seconds = micros / 1_000_000;
    let fraction = micros % 1_000_000;
    let days = seconds / 86_400;
    let seconds = seconds % 86_400;
    let (hours, minutes, seconds) = (seconds / 3600, (seconds % 3600) / 60, seconds % 60);

    let mut clock = match days {
        0 => String::new(),
        1 => "1 day, ".to_owned(),
        days => format!("{} days, ", days),
    };
    clock.push_str(&format!("{}:{:02}:{:02}", hours, minutes, seconds));
    if fraction != 0 {
        clock.push_str(&format!(".{:06}", fraction));
    }
    clock
}

#[derive(Debug, Clone)]
pub enum Outcome {
    Delivered {
        waypoint: Waypoint,
        /// The service's answer as it was logged.
        record: Value,
        progress: Progress,
    },
    Rejected {
        coordinate: Coordinate,
        error: ApiError,
    },
}

impl Outcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, Outcome::Delivered { .. })
    }
}

/// One outcome per waypoint, in submission order.
#[derive(Debug, Clone, Default)]
pub struct DeliveryReport {
    pub outcomes: Vec<Outcome>,
}

impl DeliveryReport {
    pub fn delivered(&self) -> usize {
        self.outcomes.iter().filter(|outcome| outcome.is_delivered()).count()
    }

    pub fn rejected(&self) -> usize {
        self.outcomes.len() - self.delivered()
    }

    pub fn progress(&self) -> impl Iterator<Item = &Progress> {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            Outcome::Delivered { progress, .. } => Some(progress),
            Outcome::Rejected { .. } => None,
        })
    }
}

/// Sends every point in order, one per `pacing.delay()`. Time spent waiting
/// for the service counts towards the delay, a slow answer shortens the
/// following pause down to none. A rejected waypoint is reported and
/// skipped.
pub async fn deliver<T>(
    tracker: &T,
    credential: &Credential,
    route_id: &Id<Route>,
    points: &[Coordinate],
    pacing: &PacingPlan,
) -> DeliveryReport
where
    T: Tracker + ?Sized,
{
    let total = points.len();
    let delay = pacing.delay();
    let mut report = DeliveryReport {
        outcomes: Vec::with_capacity(total),
    };

    for (i, &coordinate) in points.iter().enumerate() {
        let started = Instant::now();

        let waypoint = Waypoint::now(coordinate);
        match tracker.submit_waypoint(credential, route_id, &waypoint).await {
            Ok(record) => {
                log::info!("Waypoint Created:\n{}", pretty(&record));
                let progress = Progress {
                    sent: i + 1,
                    total,
                    time_left: chrono::Duration::microseconds(
                        (pacing.time_left(i, total) * 1e6).round() as i64,
                    ),
                };
                log::info!("{}", progress);
                report.outcomes.push(Outcome::Delivered {
                    waypoint,
                    record,
                    progress,
                });
            }
            Err(error) => {
                log::warn!("Waypoint NOT Created ({} of {}): {}", i + 1, total, error);
                report.outcomes.push(Outcome::Rejected { coordinate, error });
            }
        }

        let elapsed = started.elapsed();
        if elapsed < delay {
            sleep(delay - elapsed).await;
        }
    }

    report
}
