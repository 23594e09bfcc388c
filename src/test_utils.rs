//! Test helpers: float assertions and in-memory EXIF fixtures.

use std::io::Cursor;

use exif::experimental::Writer;
use exif::{Exif, Field, In, Rational, Reader, Tag, Value};

pub use approx::assert_abs_diff_eq;

/// Epsilon for values that should be exactly equal up to rounding.
pub const F64_EPSILON: f64 = 1e-10;

/// Rational triplet field such as `GPSLatitude=(40/1, 41/1, 21/1)`
pub fn rational_triplet(tag: Tag, parts: [(u32, u32); 3]) -> Field {
    Field {
        tag,
        ifd_num: In::PRIMARY,
        value: Value::Rational(parts.iter().map(|&p| Rational::from(p)).collect()),
    }
}

pub fn ascii(tag: Tag, text: &str) -> Field {
    Field {
        tag,
        ifd_num: In::PRIMARY,
        value: Value::Ascii(vec![text.as_bytes().to_vec()]),
    }
}

/// The four GPS fields of the Statue of Liberty sample image.
pub fn liberty_island_fields() -> Vec<Field> {
    vec![
        rational_triplet(Tag::GPSLatitude, [(40, 1), (41, 1), (21, 1)]),
        ascii(Tag::GPSLatitudeRef, "N"),
        rational_triplet(Tag::GPSLongitude, [(74, 1), (2, 1), (40, 1)]),
        ascii(Tag::GPSLongitudeRef, "W"),
    ]
}

/// Serializes `fields` into a big-endian TIFF blob. An `ImageDescription`
/// is always added so the primary IFD is never empty.
pub fn tiff_bytes(fields: &[Field]) -> Vec<u8> {
    let description = ascii(Tag::ImageDescription, "fixture");
    let mut writer = Writer::new();
    writer.push_field(&description);
    for field in fields {
        writer.push_field(field);
    }

    let mut buf = Cursor::new(Vec::new());
    writer.write(&mut buf, false).expect("write TIFF fixture");
    buf.into_inner()
}

pub fn exif_with(fields: &[Field]) -> Exif {
    Reader::new()
        .read_raw(tiff_bytes(fields))
        .expect("parse TIFF fixture")
}
