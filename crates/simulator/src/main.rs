use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgGroup, Parser};

use model::user::Login;
use simulator::{
    config::{SimulationConfig, SourceSelection, DEFAULT_ADMIN_PASSWORD, DEFAULT_ADMIN_USERNAME},
    profile::ProfileGenerator,
    session::Account,
    RunSummary,
};
use tracker::{
    client::{DEFAULT_SERVER, DEFAULT_SERVICE_PREFIX},
    TrackerClient, TrackerConfig,
};
use waypoints::directions::{DirectionsConfig, API_KEY_VARIABLE, GOOGLE_MAPS_URL};

/// Replays a route against the tracking service, one waypoint at a time.
#[derive(Debug, Parser)]
#[command(name = "route-simulator", version, about)]
#[command(group(ArgGroup::new("source").required(true).args(["waypoints", "start"])))]
struct Args {
    /// Tracking service to send the route to.
    #[arg(long, env = "TRACKER_SERVER", default_value = DEFAULT_SERVER)]
    server: String,

    #[arg(long, env = "TRACKER_SERVICE_PREFIX", default_value = DEFAULT_SERVICE_PREFIX)]
    service_prefix: String,

    /// Existing user to log in as. Without it a new user is created.
    #[arg(long, env = "TRACKER_USERNAME", requires = "password")]
    username: Option<String>,

    #[arg(long, env = "TRACKER_PASSWORD", requires = "username")]
    password: Option<String>,

    /// Administrator used to create the new user.
    #[arg(long, env = "TRACKER_ADMIN_USERNAME", default_value = DEFAULT_ADMIN_USERNAME)]
    admin_username: String,

    #[arg(long, env = "TRACKER_ADMIN_PASSWORD", default_value = DEFAULT_ADMIN_PASSWORD)]
    admin_password: String,

    /// GPX file with the track to replay.
    #[arg(long, value_name = "FILE")]
    waypoints: Option<PathBuf>,

    /// Start location for the directions query.
    #[arg(long, value_name = "LOCATION", requires = "end")]
    start: Option<String>,

    /// End location for the directions query.
    #[arg(long, value_name = "LOCATION", requires = "start")]
    end: Option<String>,

    /// Seconds between two waypoints. Derived from the route duration when
    /// left out or not positive.
    #[arg(long, value_name = "SECONDS", allow_negative_numbers = true)]
    delay: Option<f64>,

    /// Take the first route instead of asking when there are several.
    #[arg(long)]
    non_interactive: bool,

    #[arg(long, env = API_KEY_VARIABLE, hide_env_values = true)]
    google_maps_api_key: Option<String>,

    #[arg(long, env = "GOOGLE_MAPS_URL", default_value = GOOGLE_MAPS_URL)]
    directions_url: String,
}

impl Args {
    fn selection(&self) -> Option<SourceSelection> {
        if let Some(path) = &self.waypoints {
            return Some(SourceSelection::Track(path.clone()));
        }
        match (&self.start, &self.end) {
            (Some(start), Some(end)) => Some(SourceSelection::Directions {
                start: start.clone(),
                end: end.clone(),
                non_interactive: self.non_interactive,
            }),
            _ => None,
        }
    }

    fn account(&self) -> Account {
        match (&self.username, &self.password) {
            (Some(username), Some(password)) => Account::Existing(Login::new(username, password)),
            _ => Account::Create {
                admin: Login::new(&self.admin_username, &self.admin_password),
            },
        }
    }
}

async fn simulate(args: Args) -> Result<RunSummary, Box<dyn Error>> {
    let selection = args
        .selection()
        .ok_or("either --waypoints or --start and --end are required")?;

    // waypoints
    let directions = DirectionsConfig {
        api_key: args.google_maps_api_key.clone(),
        base_url: args.directions_url.clone(),
    };
    let mut source = selection.source(&directions)?;

    // tracking service
    let tracker = TrackerClient::new(&TrackerConfig::new(&args.server, &args.service_prefix))?;
    log::info!("Sending route to {}", tracker.base());

    let config = SimulationConfig {
        account: args.account(),
        delay: args.delay,
    };
    let mut profiles = ProfileGenerator::from_entropy();

    let summary = simulator::run(&tracker, source.as_mut(), &config, &mut profiles).await?;
    Ok(summary)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match simulate(Args::parse()).await {
        Ok(summary) => {
            log::info!(
                "Route {} completed, {} waypoints created, {} rejected.",
                summary.route_id,
                summary.report.delivered(),
                summary.report.rejected()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
