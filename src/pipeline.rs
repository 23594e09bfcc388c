use exif::Exif;
use std::io::{self, Write};
use tracing::info;

use crate::exif_parser::extract_location;
use crate::geocoding::{ReverseGeocoder, ServiceError};
use crate::location::GeoLocation;

pub const NO_GPS_MESSAGE: &str = "No GPS data found in the image.";
pub const NO_ADDRESS_MESSAGE: &str = "Could not find an address for these coordinates.";

/// Outcome of one image run
#[derive(Debug, Clone, PartialEq)]
pub enum Report {
    NoLocation,
    Located {
        location: GeoLocation,
        address: Option<String>,
    },
}

/// Extracts the location from `exif` and, when there is one, resolves its
/// address with a single geocoder call.
pub fn locate(
    exif: Option<&Exif>,
    geocoder: &dyn ReverseGeocoder,
) -> Result<Report, ServiceError> {
    let Some(location) = exif.and_then(extract_location) else {
        info!("Image has no usable GPS data");
        return Ok(Report::NoLocation);
    };

    let [longitude, latitude] = location.query_coordinates();
    let address = geocoder.resolve_address(longitude, latitude)?;
    if address.is_none() {
        info!("No address for {}, {}", latitude, longitude);
    }

    Ok(Report::Located { location, address })
}

impl Report {
    pub fn render(&self, out: &mut impl Write) -> io::Result<()> {
        match self {
            Report::NoLocation => writeln!(out, "{}", NO_GPS_MESSAGE),
            Report::Located { location, address } => {
                let (lat, lon) = location.to_decimal_pair();
                writeln!(out, "GPS coordinates found:")?;
                writeln!(out, "Latitude: {}", location.latitude())?;
                writeln!(out, "Longitude: {}", location.longitude())?;
                writeln!(out, "Decimal: {:.6}, {:.6}", lat, lon)?;
                writeln!(out)?;
                match address {
                    Some(address) => {
                        writeln!(out, "Address found:")?;
                        writeln!(out, "{}", address)
                    }
                    None => writeln!(out, "{}", NO_ADDRESS_MESSAGE),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geocoding::parse_address;
    use crate::test_utils::{assert_abs_diff_eq, exif_with, liberty_island_fields};
    use std::cell::RefCell;

    /// Answers every call with a canned response body and records the query.
    struct CannedGeocoder {
        body: &'static str,
        calls: RefCell<Vec<(f64, f64)>>,
    }

    impl CannedGeocoder {
        fn new(body: &'static str) -> Self {
            Self {
                body,
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl ReverseGeocoder for CannedGeocoder {
        fn resolve_address(
            &self,
            longitude: f64,
            latitude: f64,
        ) -> Result<Option<String>, ServiceError> {
            self.calls.borrow_mut().push((longitude, latitude));
            parse_address(self.body)
        }
    }

    fn rendered(report: &Report) -> String {
        let mut out = Vec::new();
        report.render(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    const LIBERTY_RESPONSE: &str = r#"{"features": [{"properties": {"address": {
        "formattedAddress": "Liberty Island, New York, NY 10004, United States"
    }}}]}"#;

    #[test]
    fn resolves_address_with_longitude_first() {
        let exif = exif_with(&liberty_island_fields());
        let geocoder = CannedGeocoder::new(LIBERTY_RESPONSE);

        let report = locate(Some(&exif), &geocoder).unwrap();

        let calls = geocoder.calls.borrow();
        assert_eq!(calls.len(), 1);
        let (lon, lat) = calls[0];
        assert_abs_diff_eq!(lon, -74.0444, epsilon = 1e-4);
        assert_abs_diff_eq!(lat, 40.6892, epsilon = 1e-4);

        let text = rendered(&report);
        assert_eq!(
            text,
            "GPS coordinates found:\n\
             Latitude: 40° 41' 21\" N\n\
             Longitude: 74° 2' 40\" W\n\
             Decimal: 40.689167, -74.044444\n\
             \n\
             Address found:\n\
             Liberty Island, New York, NY 10004, United States\n"
        );
    }

    #[test]
    fn empty_response_reports_no_address() {
        let exif = exif_with(&liberty_island_fields());
        let geocoder = CannedGeocoder::new(r#"{"features": []}"#);

        let report = locate(Some(&exif), &geocoder).unwrap();

        assert!(matches!(report, Report::Located { address: None, .. }));
        let text = rendered(&report);
        assert!(text.starts_with("GPS coordinates found:\n"));
        assert!(text.ends_with(&format!("{}\n", NO_ADDRESS_MESSAGE)));
        assert_eq!(geocoder.calls.borrow().len(), 1);
    }

    #[test]
    fn no_gps_block_never_calls_geocoder() {
        let exif = exif_with(&[]);
        let geocoder = CannedGeocoder::new(LIBERTY_RESPONSE);

        let report = locate(Some(&exif), &geocoder).unwrap();

        assert_eq!(report, Report::NoLocation);
        assert_eq!(rendered(&report), format!("{}\n", NO_GPS_MESSAGE));
        assert!(geocoder.calls.borrow().is_empty());
    }

    #[test]
    fn no_metadata_never_calls_geocoder() {
        let geocoder = CannedGeocoder::new(LIBERTY_RESPONSE);

        let report = locate(None, &geocoder).unwrap();

        assert_eq!(report, Report::NoLocation);
        assert!(geocoder.calls.borrow().is_empty());
    }

    #[test]
    fn service_errors_propagate() {
        let exif = exif_with(&liberty_island_fields());
        let geocoder = CannedGeocoder::new("not json");

        let err = locate(Some(&exif), &geocoder).unwrap_err();
        assert!(matches!(err, ServiceError::MalformedResponse(_)));
    }
}
