use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;

use model::waypoint::Coordinate;

use crate::{SourceError, WaypointPlan, WaypointSource};

/* - GPX 1.1 (only the parts needed for tracks) */

#[derive(Debug, Deserialize)]
pub struct Gpx {
    #[serde(rename = "trk", default)]
    pub tracks: Vec<Track>,
}

#[derive(Debug, Deserialize)]
pub struct Track {
    #[serde(rename = "trkseg", default)]
    pub segments: Vec<TrackSegment>,
}

#[derive(Debug, Deserialize)]
pub struct TrackSegment {
    #[serde(rename = "trkpt", default)]
    pub points: Vec<TrackPoint>,
}

#[derive(Debug, Deserialize)]
pub struct TrackPoint {
    pub lat: f64, /* xml-attribute */
    pub lon: f64, /* xml-attribute */
}

/// Points of the first track of a recorded GPX file.
pub struct TrackFileSource {
    path: PathBuf,
}

impl TrackFileSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_owned(),
        }
    }

    pub fn parse(document: &str) -> Result<WaypointPlan, SourceError> {
        let gpx: Gpx = serde_xml_rs::from_str(document)?;
        let track = gpx.tracks.into_iter().next().ok_or(SourceError::NoTrack)?;

        let points = track
            .segments
            .into_iter()
            .flat_map(|segment| segment.points)
            .map(|point| Coordinate::new(point.lat, point.lon))
            .collect::<Vec<_>>();

        // Recorded timestamps are not evaluated, the duration is simply the
        // number of points.
        let duration_seconds = points.len() as f64;
        Ok(WaypointPlan::new(points, duration_seconds))
    }
}

#[async_trait]
impl WaypointSource for TrackFileSource {
    async fn produce(&mut self) -> Result<WaypointPlan, SourceError> {
        log::info!("Reading track from '{}'.", self.path.display());
        let document = fs::read_to_string(&self.path)?;
        let plan = Self::parse(&document)?;

        log::info!(
            "Track has {} points, {:.2} km.",
            plan.len(),
            plan.length_km()
        );
        log::warn!(
            "Track timing is not evaluated, assuming one second per point ({} s).",
            plan.duration_seconds
        );
        Ok(plan)
    }
}
