//! Binary and textual point codec
//!
//! Converts a [`GeoPoint`] to and from its storage representation: a
//! geometry value tagged with SRID 4326, carrying longitude and latitude
//! (in that axis order) as IEEE-754 doubles. A textual `POINT(lon lat)`
//! form is accepted as a fallback input.
//!
//! Layout of the binary form:
//!
//! ```text
//! [0]      byte-order flag (0x00 big-endian, 0x01 little-endian)
//! [1..5]   SRID (u32)
//! [5..9]   geometry type tag (u32, 1 = point)
//! [9..17]  X = longitude (f64)
//! [17..25] Y = latitude (f64)
//! ```
//!
//! Decoding is a pure, failure-tolerant transform: a corrupt buffer yields a
//! [`PointDecodeError`] value, never a panic, so callers can treat it as "no
//! location available".

use super::point::{GeoPoint, SRID_WGS84};
use thiserror::Error;

/// Geometry type tag for a point
pub const POINT_GEOMETRY_TYPE: u32 = 1;

/// Minimum byte length of an encoded point: flag + SRID + type + two doubles
pub const ENCODED_POINT_LEN: usize = 1 + 4 + 4 + 8 + 8;

const LITTLE_ENDIAN: u8 = 0x01;
const BIG_ENDIAN: u8 = 0x00;

/// Reasons a stored geometry value fails to decode
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PointDecodeError {
    /// Buffer shorter than the fixed header + payload size
    #[error("buffer too short: {0} bytes, need at least {}", ENCODED_POINT_LEN)]
    ShortBuffer(usize),

    /// Leading byte is neither the big- nor little-endian marker
    #[error("unknown byte-order flag: {0:#04x}")]
    UnknownByteOrder(u8),

    /// SRID tag is not WGS84
    #[error("unsupported SRID: {0}, expected {}", SRID_WGS84)]
    UnsupportedSrid(u32),

    /// Geometry type tag is not a point
    #[error("unsupported geometry type: {0}, expected point ({})", POINT_GEOMETRY_TYPE)]
    UnsupportedGeometry(u32),

    /// Decoded coordinates fall outside the legal WGS84 ranges
    #[error("coordinates out of range: lat {latitude}, lng {longitude}")]
    OutOfRange {
        latitude: f64,
        longitude: f64,
    },

    /// Textual form does not parse as `POINT(lon lat)`
    #[error("malformed point text: {0}")]
    MalformedText(String),
}

/// Encode a point into its binary storage form (little-endian, SRID 4326)
pub fn encode(point: &GeoPoint) -> Vec<u8> {
    let mut buf = Vec::with_capacity(ENCODED_POINT_LEN);
    buf.push(LITTLE_ENDIAN);
    buf.extend_from_slice(&SRID_WGS84.to_le_bytes());
    buf.extend_from_slice(&POINT_GEOMETRY_TYPE.to_le_bytes());
    buf.extend_from_slice(&point.longitude().to_le_bytes());
    buf.extend_from_slice(&point.latitude().to_le_bytes());
    buf
}

/// Decode a point from its binary storage form, honoring the declared
/// endianness
pub fn decode(buf: &[u8]) -> Result<GeoPoint, PointDecodeError> {
    if buf.len() < ENCODED_POINT_LEN {
        return Err(PointDecodeError::ShortBuffer(buf.len()));
    }

    let little = match buf[0] {
        LITTLE_ENDIAN => true,
        BIG_ENDIAN => false,
        other => return Err(PointDecodeError::UnknownByteOrder(other)),
    };

    let read_u32 = |bytes: [u8; 4]| {
        if little {
            u32::from_le_bytes(bytes)
        } else {
            u32::from_be_bytes(bytes)
        }
    };
    let read_f64 = |bytes: [u8; 8]| {
        if little {
            f64::from_le_bytes(bytes)
        } else {
            f64::from_be_bytes(bytes)
        }
    };

    let srid = read_u32(buf[1..5].try_into().expect("slice length checked"));
    if srid != SRID_WGS84 {
        return Err(PointDecodeError::UnsupportedSrid(srid));
    }

    let geometry = read_u32(buf[5..9].try_into().expect("slice length checked"));
    if geometry != POINT_GEOMETRY_TYPE {
        return Err(PointDecodeError::UnsupportedGeometry(geometry));
    }

    let longitude = read_f64(buf[9..17].try_into().expect("slice length checked"));
    let latitude = read_f64(buf[17..25].try_into().expect("slice length checked"));

    checked_point(latitude, longitude)
}

/// Decode a stored geometry value of either form
///
/// Tries the binary layout first, then falls back to the textual
/// `POINT(lon lat)` representation when the buffer is printable. The
/// binary diagnosis wins when neither form parses.
pub fn decode_any(buf: &[u8]) -> Result<GeoPoint, PointDecodeError> {
    match decode(buf) {
        Ok(point) => Ok(point),
        Err(binary_err) => match std::str::from_utf8(buf) {
            Ok(text) => decode_wkt(text).map_err(|_| binary_err),
            Err(_) => Err(binary_err),
        },
    }
}

/// Decode the textual fallback form: `POINT(lon lat)`, optionally prefixed
/// with `SRID=4326;`
pub fn decode_wkt(text: &str) -> Result<GeoPoint, PointDecodeError> {
    let malformed = || PointDecodeError::MalformedText(text.to_string());

    let mut body = text.trim();
    if let Some((prefix, rest)) = body.split_once(';') {
        let srid = prefix
            .trim()
            .to_ascii_uppercase()
            .strip_prefix("SRID=")
            .and_then(|v| v.trim().parse::<u32>().ok())
            .ok_or_else(malformed)?;
        if srid != SRID_WGS84 {
            return Err(PointDecodeError::UnsupportedSrid(srid));
        }
        body = rest.trim();
    }

    let upper = body.to_ascii_uppercase();
    let rest = upper.strip_prefix("POINT").ok_or_else(malformed)?;
    let inner = rest
        .trim()
        .strip_prefix('(')
        .and_then(|v| v.strip_suffix(')'))
        .ok_or_else(malformed)?;

    let mut parts = inner.split_whitespace();
    let longitude: f64 = parts
        .next()
        .and_then(|v| v.parse().ok())
        .ok_or_else(malformed)?;
    let latitude: f64 = parts
        .next()
        .and_then(|v| v.parse().ok())
        .ok_or_else(malformed)?;
    if parts.next().is_some() {
        return Err(malformed());
    }

    checked_point(latitude, longitude)
}

fn checked_point(latitude: f64, longitude: f64) -> Result<GeoPoint, PointDecodeError> {
    GeoPoint::new(latitude, longitude).map_err(|_| PointDecodeError::OutOfRange {
        latitude,
        longitude,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let points = [
            GeoPoint::new(10.0, 20.0).unwrap(),
            GeoPoint::new(-33.868, 151.209).unwrap(),
            GeoPoint::new(90.0, 180.0).unwrap(),
            GeoPoint::new(-90.0, -180.0).unwrap(),
            GeoPoint::new(0.0, 0.0).unwrap(),
        ];

        for p in points {
            let decoded = decode(&encode(&p)).unwrap();
            assert!((decoded.latitude() - p.latitude()).abs() < 1e-12);
            assert!((decoded.longitude() - p.longitude()).abs() < 1e-12);
        }
    }

    #[test]
    fn test_encoded_layout() {
        let p = GeoPoint::new(4.6097, -74.0817).unwrap();
        let buf = encode(&p);

        assert_eq!(buf.len(), ENCODED_POINT_LEN);
        assert_eq!(buf[0], 0x01);
        assert_eq!(u32::from_le_bytes(buf[1..5].try_into().unwrap()), 4326);
        assert_eq!(u32::from_le_bytes(buf[5..9].try_into().unwrap()), 1);
        // X axis comes first and carries the longitude
        assert_eq!(
            f64::from_le_bytes(buf[9..17].try_into().unwrap()),
            -74.0817
        );
    }

    #[test]
    fn test_decode_big_endian() {
        let p = GeoPoint::new(12.5, -7.25).unwrap();
        let mut buf = vec![0x00];
        buf.extend_from_slice(&4326u32.to_be_bytes());
        buf.extend_from_slice(&1u32.to_be_bytes());
        buf.extend_from_slice(&p.longitude().to_be_bytes());
        buf.extend_from_slice(&p.latitude().to_be_bytes());

        let decoded = decode(&buf).unwrap();
        assert_eq!(decoded, p);
    }

    #[test]
    fn test_short_buffer_rejected() {
        let err = decode(&[0x01, 0x00, 0x00]).unwrap_err();
        assert_eq!(err, PointDecodeError::ShortBuffer(3));
    }

    #[test]
    fn test_unknown_byte_order_rejected() {
        let mut buf = encode(&GeoPoint::new(1.0, 2.0).unwrap());
        buf[0] = 0x42;
        assert!(matches!(
            decode(&buf).unwrap_err(),
            PointDecodeError::UnknownByteOrder(0x42)
        ));
    }

    #[test]
    fn test_foreign_srid_rejected() {
        let mut buf = encode(&GeoPoint::new(1.0, 2.0).unwrap());
        buf[1..5].copy_from_slice(&3857u32.to_le_bytes());
        assert_eq!(
            decode(&buf).unwrap_err(),
            PointDecodeError::UnsupportedSrid(3857)
        );
    }

    #[test]
    fn test_non_point_geometry_rejected() {
        let mut buf = encode(&GeoPoint::new(1.0, 2.0).unwrap());
        buf[5..9].copy_from_slice(&2u32.to_le_bytes());
        assert_eq!(
            decode(&buf).unwrap_err(),
            PointDecodeError::UnsupportedGeometry(2)
        );
    }

    #[test]
    fn test_out_of_range_payload_rejected() {
        let mut buf = vec![0x01];
        buf.extend_from_slice(&4326u32.to_le_bytes());
        buf.extend_from_slice(&1u32.to_le_bytes());
        buf.extend_from_slice(&200.0f64.to_le_bytes()); // longitude
        buf.extend_from_slice(&95.0f64.to_le_bytes()); // latitude
        assert!(matches!(
            decode(&buf).unwrap_err(),
            PointDecodeError::OutOfRange { .. }
        ));
    }

    #[test]
    fn test_wkt_fallback() {
        let p = decode_wkt("POINT(-74.0817 4.6097)").unwrap();
        assert_eq!(p.longitude(), -74.0817);
        assert_eq!(p.latitude(), 4.6097);

        let p = decode_wkt("  point ( 20.0 10.0 ) ").unwrap();
        assert_eq!(p.longitude(), 20.0);
        assert_eq!(p.latitude(), 10.0);

        let p = decode_wkt("SRID=4326;POINT(1.5 2.5)").unwrap();
        assert_eq!(p.longitude(), 1.5);
    }

    #[test]
    fn test_decode_any_accepts_both_forms() {
        let p = GeoPoint::new(4.6097, -74.0817).unwrap();
        assert_eq!(decode_any(&encode(&p)).unwrap(), p);

        let decoded = decode_any(b"POINT(-74.0817 4.6097)").unwrap();
        assert_eq!(decoded.longitude(), -74.0817);

        // Neither form: the binary diagnosis is reported
        assert!(matches!(
            decode_any(b"bogus").unwrap_err(),
            PointDecodeError::ShortBuffer(5)
        ));
    }

    #[test]
    fn test_wkt_rejects_garbage() {
        assert!(decode_wkt("LINESTRING(0 0, 1 1)").is_err());
        assert!(decode_wkt("POINT(1.0)").is_err());
        assert!(decode_wkt("POINT(a b)").is_err());
        assert!(decode_wkt("SRID=3857;POINT(1 2)").is_err());
        assert!(decode_wkt("").is_err());
    }
}
