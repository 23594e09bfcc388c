//! Reads the GPS position embedded in an image and resolves it to a street
//! address with Azure Maps reverse geocoding.

pub mod exif_parser;
pub mod geocoding;
pub mod location;
pub mod pipeline;
pub mod settings;
pub mod utils;

#[cfg(test)]
mod test_utils;
