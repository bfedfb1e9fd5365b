//! Decoder for the encoded polyline format used by the Google Maps APIs.
//!
//! Every value is the difference to the previous one, multiplied by
//! `10^precision`, zig-zag encoded and split into 5 bit chunks, each chunk
//! offset by 63 so it is a printable character. Values alternate between
//! latitude and longitude.

use std::error;
use std::fmt;

use model::waypoint::Coordinate;

/// Precision of polylines returned by the directions api.
pub const PRECISION: u32 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolylineError {
    InvalidCharacter { position: usize, character: char },
    /// The input ends in the middle of a value.
    Truncated,
    /// A latitude without the matching longitude.
    MissingLongitude,
    Overflow { position: usize },
}

impl error::Error for PolylineError {}

impl fmt::Display for PolylineError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PolylineError::InvalidCharacter {
                position,
                character,
            } => write!(f, "invalid character {:?} at {}", character, position),
            PolylineError::Truncated => write!(f, "polyline ends inside a value"),
            PolylineError::MissingLongitude => {
                write!(f, "polyline ends with a latitude but no longitude")
            }
            PolylineError::Overflow { position } => {
                write!(f, "value at {} does not fit into 64 bits", position)
            }
        }
    }
}

pub fn decode(encoded: &str, precision: u32) -> Result<Vec<Coordinate>, PolylineError> {
    let factor = 10_f64.powi(precision as i32);
    let mut values = Values {
        bytes: encoded.as_bytes(),
        position: 0,
    };

    let mut coordinates = Vec::new();
    let (mut latitude, mut longitude) = (0_i64, 0_i64);
    while let Some(delta_latitude) = values.next_value()? {
        let delta_longitude = values
            .next_value()?
            .ok_or(PolylineError::MissingLongitude)?;
        latitude += delta_latitude;
        longitude += delta_longitude;
        coordinates.push(Coordinate::new(
            latitude as f64 / factor,
            longitude as f64 / factor,
        ));
    }
    Ok(coordinates)
}

struct Values<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl<'a> Values<'a> {
    fn next_value(&mut self) -> Result<Option<i64>, PolylineError> {
        if self.position >= self.bytes.len() {
            return Ok(None);
        }

        let start = self.position;
        let mut result: u64 = 0;
        let mut shift = 0;
        loop {
            let Some(&byte) = self.bytes.get(self.position) else {
                return Err(PolylineError::Truncated);
            };
            if !(63..=126).contains(&byte) {
                return Err(PolylineError::InvalidCharacter {
                    position: self.position,
                    character: byte as char,
                });
            }
            if shift > 60 {
                return Err(PolylineError::Overflow { position: start });
            }
            self.position += 1;

            let chunk = (byte - 63) as u64;
            result |= (chunk & 0x1f) << shift;
            shift += 5;
            if chunk < 0x20 {
                break;
            }
        }

        // zig-zag
        let value = if result & 1 == 1 {
            !((result >> 1) as i64)
        } else {
            (result >> 1) as i64
        };
        Ok(Some(value))
    }
}
