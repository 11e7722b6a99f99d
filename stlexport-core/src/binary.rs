//! Binary STL encoding
//!
//! Layout, little-endian throughout:
//! - 80 bytes: header, zero-filled by the exporter
//! - 4 bytes: triangle count (u32)
//! - 50 bytes per triangle: normal (3 x f32), three vertices (9 x f32),
//!   attribute byte count (u16, always 0)
use nalgebra::{Point3, Vector3};

use crate::serializer::{FacetScratch, FacetWriter};

pub const HEADER_LEN: usize = 80;
pub const PREAMBLE_LEN: usize = HEADER_LEN + 4;
pub const FACET_LEN: usize = 50;

/// Exact encoded size for `triangles` facets
pub fn encoded_len(triangles: usize) -> usize {
    PREAMBLE_LEN + FACET_LEN * triangles
}

/// Writes facets into a buffer sized up front from the triangle count
pub struct BinaryWriter {
    buf: Vec<u8>,
}

impl BinaryWriter {
    pub fn new(triangle_count: u32) -> Self {
        let mut buf = Vec::with_capacity(encoded_len(triangle_count as usize));
        buf.resize(HEADER_LEN, 0);
        buf.extend_from_slice(&triangle_count.to_le_bytes());
        Self { buf }
    }

    fn write_vector(&mut self, x: f32, y: f32, z: f32) {
        self.buf.extend_from_slice(&x.to_le_bytes());
        self.buf.extend_from_slice(&y.to_le_bytes());
        self.buf.extend_from_slice(&z.to_le_bytes());
    }

    fn write_point(&mut self, p: &Point3<f32>) {
        self.write_vector(p.x, p.y, p.z);
    }

    fn write_normal(&mut self, n: &Vector3<f32>) {
        self.write_vector(n.x, n.y, n.z);
    }

    pub fn finish(self) -> Vec<u8> {
        self.buf
    }
}

impl FacetWriter for BinaryWriter {
    fn write_facet(&mut self, facet: &FacetScratch) {
        self.write_normal(&facet.normal);
        self.write_point(&facet.a);
        self.write_point(&facet.b);
        self.write_point(&facet.c);
        self.buf.extend_from_slice(&0u16.to_le_bytes());
    }
}

/// Overwrite the 80-byte header of an encoded binary STL with `text`.
///
/// Text longer than the header is truncated; the remainder is zeroed.
/// Callers should avoid text starting with `solid`, which some readers
/// take as a sign of ASCII data.
///
/// # Panics
///
/// Panics if `buf` is shorter than the 80-byte header.
pub fn set_binary_header(buf: &mut [u8], text: &str) {
    let header = &mut buf[..HEADER_LEN];
    header.fill(0);
    let len = text.len().min(HEADER_LEN);
    header[..len].copy_from_slice(&text.as_bytes()[..len]);
}
