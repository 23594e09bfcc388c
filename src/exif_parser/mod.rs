pub mod container;
pub mod gps;

pub use container::read_metadata;
pub use gps::extract_location;
