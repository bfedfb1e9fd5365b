use std::error;
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub enum PacingError {
    /// There are no waypoints to spread the duration over.
    EmptyRoute,
    InvalidDelay(f64),
}

impl error::Error for PacingError {}

impl fmt::Display for PacingError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PacingError::EmptyRoute => write!(f, "The route has no waypoints."),
            PacingError::InvalidDelay(delay) => {
                write!(f, "Invalid delay between waypoints: {} s", delay)
            }
        }
    }
}

/// Target time between two waypoint submissions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PacingPlan {
    delay_seconds: f64,
    delay: Duration,
}

impl PacingPlan {
    /// A positive explicit delay wins, otherwise the duration of the whole
    /// route is spread evenly over its waypoints.
    pub fn derive(
        explicit_delay: Option<f64>,
        total_duration_seconds: f64,
        waypoints: usize,
    ) -> Result<Self, PacingError> {
        if waypoints == 0 {
            return Err(PacingError::EmptyRoute);
        }

        let delay_seconds = match explicit_delay {
            Some(delay) if delay > 0.0 => delay,
            _ => total_duration_seconds / waypoints as f64,
        };
        Self::fixed(delay_seconds)
    }

    /// The delay has to fit a `Duration`, i.e. be finite, not negative and
    /// not absurdly large.
    pub fn fixed(delay_seconds: f64) -> Result<Self, PacingError> {
        let delay = Duration::try_from_secs_f64(delay_seconds)
            .map_err(|_| PacingError::InvalidDelay(delay_seconds))?;
        Ok(Self {
            delay_seconds,
            delay,
        })
    }

    pub fn delay_seconds(&self) -> f64 {
        self.delay_seconds
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Linear estimate of the time left before sending waypoint `index`
    /// (zero based) of `total`.
    pub fn time_left(&self, index: usize, total: usize) -> f64 {
        self.delay_seconds * total.saturating_sub(index) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_from_duration() {
        let plan = PacingPlan::derive(None, 100.0, 8).unwrap();
        assert!((plan.delay_seconds() - 12.5).abs() < 1e-12);

        let plan = PacingPlan::derive(Some(0.0), 30.0, 3).unwrap();
        assert!((plan.delay_seconds() - 10.0).abs() < 1e-12);

        let plan = PacingPlan::derive(Some(-1.0), 30.0, 4).unwrap();
        assert!((plan.delay_seconds() - 7.5).abs() < 1e-12);
    }

    #[test]
    fn explicit_delay_is_used_verbatim() {
        let plan = PacingPlan::derive(Some(2.5), 1000.0, 3).unwrap();
        assert_eq!(plan.delay_seconds(), 2.5);
        assert_eq!(plan.delay(), Duration::from_millis(2500));
    }

    #[test]
    fn empty_route() {
        assert_eq!(
            PacingPlan::derive(Some(1.0), 10.0, 0),
            Err(PacingError::EmptyRoute)
        );
    }

    #[test]
    fn invalid_delays() {
        assert!(matches!(
            PacingPlan::derive(Some(f64::INFINITY), 10.0, 2),
            Err(PacingError::InvalidDelay(_))
        ));
        assert!(matches!(
            PacingPlan::derive(None, -10.0, 2),
            Err(PacingError::InvalidDelay(_))
        ));
        assert!(matches!(
            PacingPlan::derive(Some(1e20), 10.0, 1),
            Err(PacingError::InvalidDelay(_))
        ));
        assert!(matches!(
            PacingPlan::fixed(f64::NAN),
            Err(PacingError::InvalidDelay(_))
        ));
    }

    #[test]
    fn time_left_is_linear() {
        let plan = PacingPlan::fixed(2.0).unwrap();
        assert_eq!(plan.time_left(0, 3), 6.0);
        assert_eq!(plan.time_left(1, 3), 4.0);
        assert_eq!(plan.time_left(2, 3), 2.0);
    }
}
