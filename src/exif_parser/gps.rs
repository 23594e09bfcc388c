use exif::{Exif, In, Tag, Value};
use tracing::{debug, warn};

use crate::location::{Axis, GeoCoordinate, GeoLocation, Hemisphere};

/// Reads the GPS block of `exif` into a location.
///
/// All four fields (`GPSLatitude`, `GPSLatitudeRef`, `GPSLongitude`,
/// `GPSLongitudeRef`) must be present and usable; otherwise the image is
/// treated as having no location at all.
pub fn extract_location(exif: &Exif) -> Option<GeoLocation> {
    let latitude = read_triplet(exif, Tag::GPSLatitude)
        .zip(read_hemisphere(exif, Tag::GPSLatitudeRef, Axis::Latitude));
    let longitude = read_triplet(exif, Tag::GPSLongitude)
        .zip(read_hemisphere(exif, Tag::GPSLongitudeRef, Axis::Longitude));

    let Some(((lat, lat_ref), (lon, lon_ref))) = latitude.zip(longitude) else {
        debug!("GPS block missing or incomplete");
        return None;
    };

    let latitude = to_coordinate(lat, lat_ref)?;
    let longitude = to_coordinate(lon, lon_ref)?;

    match GeoLocation::new(latitude, longitude) {
        Ok(location) => Some(location),
        Err(e) => {
            warn!("Ignoring GPS data: {}", e);
            None
        }
    }
}

fn to_coordinate([d, m, s]: [f64; 3], hemisphere: Hemisphere) -> Option<GeoCoordinate> {
    match GeoCoordinate::new(d, m, s, hemisphere) {
        Ok(coord) => Some(coord),
        Err(e) => {
            warn!("Ignoring GPS {}: {}", hemisphere.axis(), e);
            None
        }
    }
}

/// Degrees/minutes/seconds as three rationals
fn read_triplet(exif: &Exif, tag: Tag) -> Option<[f64; 3]> {
    let field = exif.get_field(tag, In::PRIMARY)?;
    let parts: Vec<f64> = match field.value {
        Value::Rational(ref vec) => vec.iter().map(|r| r.to_f64()).collect(),
        Value::SRational(ref vec) => vec.iter().map(|r| r.to_f64()).collect(),
        _ => {
            debug!("{} has unexpected value type", tag);
            return None;
        }
    };

    match parts.as_slice() {
        &[d, m, s] => Some([d, m, s]),
        _ => {
            debug!("{} has {} components, expected 3", tag, parts.len());
            None
        }
    }
}

fn read_hemisphere(exif: &Exif, tag: Tag, axis: Axis) -> Option<Hemisphere> {
    let field = exif.get_field(tag, In::PRIMARY)?;
    let Value::Ascii(ref vec) = field.value else {
        debug!("{} is not ASCII", tag);
        return None;
    };

    let text = vec.first().and_then(|bytes| std::str::from_utf8(bytes).ok())?;
    let hemisphere = Hemisphere::parse_for(axis, text);
    if hemisphere.is_none() {
        debug!("{} has invalid {} reference {:?}", tag, axis, text);
    }
    hemisphere
}
