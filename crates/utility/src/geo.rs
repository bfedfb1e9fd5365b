pub const EARTH_RADIUS_KM: f64 = 6371.0;

fn to_radians(degrees: f64) -> f64 {
    degrees * std::f64::consts::PI / 180.0
}

pub fn haversine_distance(
    latitude_1: f64,
    longitude_1: f64,
    latitude_2: f64,
    longitude_2: f64,
) -> f64 {
    let lat1_rad = to_radians(latitude_1);
    let lon1_rad = to_radians(longitude_1);
    let lat2_rad = to_radians(latitude_2);
    let lon2_rad = to_radians(longitude_2);

    let dlat = lat2_rad - lat1_rad;
    let dlon = lon2_rad - lon1_rad;

    let a = (dlat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Length of a polyline given as `(latitude, longitude)` pairs, in km.
pub fn path_length<I>(points: I) -> f64
where
    I: IntoIterator<Item = (f64, f64)>,
{
    let mut points = points.into_iter();
    let Some(mut previous) = points.next() else {
        return 0.0;
    };
    let mut length = 0.0;
    for point in points {
        length += haversine_distance(previous.0, previous.1, point.0, point.1);
        previous = point;
    }
    length
}
