use std::fmt;
use thiserror::Error;

/// Coordinate axis a hemisphere letter belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Latitude,
    Longitude,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Latitude => f.write_str("latitude"),
            Axis::Longitude => f.write_str("longitude"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hemisphere {
    North,
    South,
    East,
    West,
}

impl Hemisphere {
    /// Parses an EXIF reference letter (`N`, `S`, `E`, `W`) for the given axis.
    /// Letters belonging to the other axis are rejected.
    pub fn parse_for(axis: Axis, reference: &str) -> Option<Self> {
        let letter = reference.trim().chars().next()?.to_ascii_uppercase();
        match (axis, letter) {
            (Axis::Latitude, 'N') => Some(Hemisphere::North),
            (Axis::Latitude, 'S') => Some(Hemisphere::South),
            (Axis::Longitude, 'E') => Some(Hemisphere::East),
            (Axis::Longitude, 'W') => Some(Hemisphere::West),
            _ => None,
        }
    }

    pub fn axis(self) -> Axis {
        match self {
            Hemisphere::North | Hemisphere::South => Axis::Latitude,
            Hemisphere::East | Hemisphere::West => Axis::Longitude,
        }
    }

    pub fn letter(self) -> char {
        match self {
            Hemisphere::North => 'N',
            Hemisphere::South => 'S',
            Hemisphere::East => 'E',
            Hemisphere::West => 'W',
        }
    }

    fn sign(self) -> f64 {
        match self {
            Hemisphere::South | Hemisphere::West => -1.0,
            Hemisphere::North | Hemisphere::East => 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidCoordinate {
    #[error("degrees must be a finite non-negative number, got {0}")]
    Degrees(f64),
    #[error("minutes must be in [0, 60), got {0}")]
    Minutes(f64),
    #[error("seconds must be in [0, 60), got {0}")]
    Seconds(f64),
    #[error("{expected} expects a matching hemisphere, got {got:?}")]
    WrongAxis { expected: Axis, got: Hemisphere },
}

/// One axis of a GPS position in degrees/minutes/seconds form.
///
/// Magnitudes are always non-negative; the sign lives in the hemisphere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoCoordinate {
    degrees: f64,
    minutes: f64,
    seconds: f64,
    hemisphere: Hemisphere,
}

impl GeoCoordinate {
    pub fn new(
        degrees: f64,
        minutes: f64,
        seconds: f64,
        hemisphere: Hemisphere,
    ) -> Result<Self, InvalidCoordinate> {
        if !degrees.is_finite() || degrees < 0.0 {
            return Err(InvalidCoordinate::Degrees(degrees));
        }
        // NaN fails `contains`, so it is rejected here too
        if !(0.0..60.0).contains(&minutes) {
            return Err(InvalidCoordinate::Minutes(minutes));
        }
        if !(0.0..60.0).contains(&seconds) {
            return Err(InvalidCoordinate::Seconds(seconds));
        }

        Ok(Self {
            degrees,
            minutes,
            seconds,
            hemisphere,
        })
    }

    pub fn minutes(&self) -> f64 {
        self.minutes
    }

    pub fn hemisphere(&self) -> Hemisphere {
        self.hemisphere
    }

    /// Signed decimal degrees (S and W are negative)
    pub fn to_decimal(&self) -> f64 {
        let magnitude = self.degrees + self.minutes / 60.0 + self.seconds / 3600.0;
        magnitude * self.hemisphere.sign()
    }
}

impl fmt::Display for GeoCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}° {}' {}\" {}",
            self.degrees,
            self.minutes,
            self.seconds,
            self.hemisphere.letter()
        )
    }
}

/// A complete GPS position. There is no partial form: either both axes
/// exist or there is no location at all.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoLocation {
    latitude: GeoCoordinate,
    longitude: GeoCoordinate,
}

impl GeoLocation {
    pub fn new(
        latitude: GeoCoordinate,
        longitude: GeoCoordinate,
    ) -> Result<Self, InvalidCoordinate> {
        if latitude.hemisphere.axis() != Axis::Latitude {
            return Err(InvalidCoordinate::WrongAxis {
                expected: Axis::Latitude,
                got: latitude.hemisphere,
            });
        }
        if longitude.hemisphere.axis() != Axis::Longitude {
            return Err(InvalidCoordinate::WrongAxis {
                expected: Axis::Longitude,
                got: longitude.hemisphere,
            });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> &GeoCoordinate {
        &self.latitude
    }

    pub fn longitude(&self) -> &GeoCoordinate {
        &self.longitude
    }

    /// `(latitude, longitude)` in signed decimal degrees
    pub fn to_decimal_pair(&self) -> (f64, f64) {
        (self.latitude.to_decimal(), self.longitude.to_decimal())
    }

    /// `[longitude, latitude]`, the order the reverse geocoder expects
    pub fn query_coordinates(&self) -> [f64; 2] {
        let (lat, lon) = self.to_decimal_pair();
        [lon, lat]
    }
}
