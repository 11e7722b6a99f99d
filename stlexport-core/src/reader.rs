//! STL reader for binary and ASCII data
//!
//! Reads facets back exactly as stored, without recomputing normals.
use nalgebra::{Point3, Vector3};
use nom::{
    bytes::complete::{tag, take},
    character::complete::{multispace0, multispace1, not_line_ending},
    multi::{count, many0},
    number::complete::{float, le_f32, le_u16, le_u32},
    sequence::preceded,
    IResult,
};

use crate::binary::{encoded_len, HEADER_LEN, PREAMBLE_LEN};
use crate::error::{ReadError, ReadResult};

/// One triangle as stored in an STL file
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Facet {
    pub normal: Vector3<f32>,
    pub vertices: [Point3<f32>; 3],
}

/// Parse a binary STL file
pub fn read_binary(data: &[u8]) -> ReadResult<Vec<Facet>> {
    if data.len() < PREAMBLE_LEN {
        return Err(ReadError::TooShort(data.len()));
    }

    let truncated = |triangles: usize| ReadError::Truncated {
        expected: encoded_len(triangles),
        actual: data.len(),
    };

    let (body, triangle_count) =
        preceded(take(HEADER_LEN), le_u32::<_, nom::error::Error<&[u8]>>)(data)
            .map_err(|_| ReadError::TooShort(data.len()))?;
    let triangle_count = triangle_count as usize;

    if data.len() < encoded_len(triangle_count) {
        return Err(truncated(triangle_count));
    }

    let (_, facets) = count(binary_facet, triangle_count)(body).map_err(|_| truncated(triangle_count))?;
    Ok(facets)
}

fn binary_vector(input: &[u8]) -> IResult<&[u8], (f32, f32, f32)> {
    let (input, x) = le_f32(input)?;
    let (input, y) = le_f32(input)?;
    let (input, z) = le_f32(input)?;
    Ok((input, (x, y, z)))
}

fn binary_facet(input: &[u8]) -> IResult<&[u8], Facet> {
    let (input, (nx, ny, nz)) = binary_vector(input)?;
    let mut vertices = [Point3::origin(); 3];
    let mut input = input;
    for vertex in &mut vertices {
        let (rest, (x, y, z)) = binary_vector(input)?;
        *vertex = Point3::new(x, y, z);
        input = rest;
    }
    // Attribute byte count
    let (input, _) = le_u16(input)?;

    Ok((
        input,
        Facet {
            normal: Vector3::new(nx, ny, nz),
            vertices,
        },
    ))
}

/// Parse an ASCII STL file
pub fn read_ascii(input: &str) -> ReadResult<Vec<Facet>> {
    match ascii_solid(input) {
        Ok((rest, facets)) if rest.is_empty() => Ok(facets),
        Ok((rest, _)) => Err(ReadError::Ascii(format!(
            "unexpected trailing content: {:?}",
            rest.lines().next().unwrap_or_default()
        ))),
        Err(e) => Err(ReadError::Ascii(format!("{:?}", e))),
    }
}

fn ascii_solid(input: &str) -> IResult<&str, Vec<Facet>> {
    let (input, _) = preceded(multispace0, tag("solid"))(input)?;
    let (input, _) = not_line_ending(input)?; // Optional name
    let (input, facets) = many0(ascii_facet)(input)?;
    let (input, _) = preceded(multispace0, tag("endsolid"))(input)?;
    let (input, _) = not_line_ending(input)?;
    let (input, _) = multispace0(input)?;
    Ok((input, facets))
}

fn ascii_facet(input: &str) -> IResult<&str, Facet> {
    let (input, _) = preceded(multispace0, tag("facet"))(input)?;
    let (input, _) = preceded(multispace1, tag("normal"))(input)?;
    let (input, (nx, ny, nz)) = ascii_vector(input)?;
    let (input, _) = preceded(multispace0, tag("outer"))(input)?;
    let (input, _) = preceded(multispace1, tag("loop"))(input)?;
    let (input, a) = ascii_vertex(input)?;
    let (input, b) = ascii_vertex(input)?;
    let (input, c) = ascii_vertex(input)?;
    let (input, _) = preceded(multispace0, tag("endloop"))(input)?;
    let (input, _) = preceded(multispace0, tag("endfacet"))(input)?;

    Ok((
        input,
        Facet {
            normal: Vector3::new(nx, ny, nz),
            vertices: [a, b, c],
        },
    ))
}

fn ascii_vertex(input: &str) -> IResult<&str, Point3<f32>> {
    let (input, _) = preceded(multispace0, tag("vertex"))(input)?;
    let (input, (x, y, z)) = ascii_vector(input)?;
    Ok((input, Point3::new(x, y, z)))
}

fn ascii_vector(input: &str) -> IResult<&str, (f32, f32, f32)> {
    let (input, _) = multispace0(input)?;
    let (input, x) = float(input)?;
    let (input, _) = multispace1(input)?;
    let (input, y) = float(input)?;
    let (input, _) = multispace1(input)?;
    let (input, z) = float(input)?;
    Ok((input, (x, y, z)))
}

/// Detect and parse STL data (binary or ASCII)
///
/// Data whose first non-whitespace bytes are `solid` is read as ASCII.
/// Binary headers may also start with `solid`, so a failed ASCII parse
/// falls back to binary only when the length matches the binary layout.
pub fn read_stl(data: &[u8]) -> ReadResult<Vec<Facet>> {
    let start = data
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(data.len());

    if !data[start..].starts_with(b"solid") {
        return read_binary(data);
    }

    let ascii = std::str::from_utf8(data)
        .map_err(|e| ReadError::Ascii(e.to_string()))
        .and_then(read_ascii);

    match ascii {
        Ok(facets) => Ok(facets),
        Err(_) if has_binary_size(data) => read_binary(data),
        Err(e) => Err(e),
    }
}

/// True when the length is exactly what the header's triangle count implies
fn has_binary_size(data: &[u8]) -> bool {
    data.get(HEADER_LEN..PREAMBLE_LEN)
        .and_then(|count| <[u8; 4]>::try_from(count).ok())
        .map_or(false, |count| {
            data.len() == encoded_len(u32::from_le_bytes(count) as usize)
        })
}
