//! STL reader.
//!
//! Handles both the binary layout (80-byte header, little-endian u32
//! triangle count, 50 bytes per triangle) and the ASCII `solid`/`facet`
//! layout. Stored facet normals are ignored; normals are recomputed from
//! the vertex winding.

use std::fs;
use std::path::Path;

use crate::error::MeshError;
use crate::math::vec3::Vec3;
use crate::mesh::Triangle;

const HEADER_LEN: usize = 80;
const RECORD_LEN: usize = 50;

/// Read an STL file from disk.
pub fn load_stl<P: AsRef<Path>>(path: P) -> Result<Vec<Triangle>, MeshError> {
    let bytes = fs::read(path)?;
    parse_stl(&bytes)
}

/// Parse STL data, detecting binary vs ASCII.
///
/// Binary exporters often start the header with `solid` too, so data of the
/// wrong binary size that yields no ASCII facets is reported as truncated.
pub fn parse_stl(bytes: &[u8]) -> Result<Vec<Triangle>, MeshError> {
    let mut truncated = None;
    if let Some(count) = binary_triangle_count(bytes) {
        let expected = HEADER_LEN + 4 + RECORD_LEN * count;
        if bytes.len() == expected {
            return parse_binary(bytes, count);
        }
        let error = MeshError::Truncated {
            expected,
            found: bytes.len(),
        };
        if !looks_like_ascii(bytes) {
            return Err(error);
        }
        truncated = Some(error);
    }

    let text = match std::str::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            return Err(truncated.unwrap_or_else(|| MeshError::Parse {
                line: 0,
                message: format!("not a binary STL and not valid UTF-8: {e}"),
            }))
        }
    };

    let triangles = parse_ascii(text)?;
    match truncated {
        Some(error) if triangles.is_empty() => Err(error),
        _ => Ok(triangles),
    }
}

fn binary_triangle_count(bytes: &[u8]) -> Option<usize> {
    let raw: [u8; 4] = bytes.get(HEADER_LEN..HEADER_LEN + 4)?.try_into().ok()?;
    Some(u32::from_le_bytes(raw) as usize)
}

fn looks_like_ascii(bytes: &[u8]) -> bool {
    let start = bytes.iter().position(|b| !b.is_ascii_whitespace()).unwrap_or(0);
    bytes[start..].starts_with(b"solid")
}

fn parse_binary(bytes: &[u8], count: usize) -> Result<Vec<Triangle>, MeshError> {
    let records = &bytes[HEADER_LEN + 4..];
    let mut triangles = Vec::with_capacity(count);

    for record in records.chunks_exact(RECORD_LEN) {
        let read_vec = |offset: usize| {
            let f = |i: usize| {
                let start = offset + 4 * i;
                f32::from_le_bytes([
                    record[start],
                    record[start + 1],
                    record[start + 2],
                    record[start + 3],
                ])
            };
            Vec3::new(f(0), f(1), f(2))
        };
        // Bytes 0..12 hold the stored normal, 48..50 the attribute count.
        triangles.push(Triangle::new(read_vec(12), read_vec(24), read_vec(36)));
    }

    Ok(triangles)
}

fn parse_ascii(text: &str) -> Result<Vec<Triangle>, MeshError> {
    let mut triangles = Vec::new();
    let mut facet: Option<Vec<Vec3>> = None;
    let mut saw_solid = false;

    for (index, line) in text.lines().enumerate() {
        let line_no = index + 1;
        let parse_error = |message: String| MeshError::Parse {
            line: line_no,
            message,
        };

        let mut parts = line.split_whitespace();
        let Some(keyword) = parts.next() else {
            continue;
        };

        match keyword {
            "solid" => saw_solid = true,
            "facet" => {
                if facet.is_some() {
                    return Err(parse_error("nested facet".to_string()));
                }
                facet = Some(Vec::with_capacity(3));
            }
            "vertex" => {
                let vertices = facet
                    .as_mut()
                    .ok_or_else(|| parse_error("vertex outside of facet".to_string()))?;
                let mut coord = || -> Result<f32, MeshError> {
                    let token = parts
                        .next()
                        .ok_or_else(|| parse_error("vertex needs three coordinates".to_string()))?;
                    token
                        .parse::<f32>()
                        .map_err(|_| parse_error(format!("invalid coordinate {token:?}")))
                };
                let (x, y, z) = (coord()?, coord()?, coord()?);
                vertices.push(Vec3::new(x, y, z));
            }
            "endfacet" => {
                let vertices = facet
                    .take()
                    .ok_or_else(|| parse_error("endfacet without facet".to_string()))?;
                if vertices.len() < 3 {
                    return Err(parse_error(format!(
                        "facet has {} vertices, need at least 3",
                        vertices.len()
                    )));
                }
                // Fan-triangulate polygonal facets
                for i in 1..vertices.len() - 1 {
                    triangles.push(Triangle::new(vertices[0], vertices[i], vertices[i + 1]));
                }
            }
            "outer" | "endloop" | "endsolid" => {}
            other => return Err(parse_error(format!("unexpected keyword {other:?}"))),
        }
    }

    if !saw_solid {
        return Err(MeshError::Parse {
            line: 1,
            message: "missing `solid` header".to_string(),
        });
    }
    if facet.is_some() {
        return Err(MeshError::Parse {
            line: text.lines().count(),
            message: "unterminated facet".to_string(),
        });
    }

    Ok(triangles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const ASCII_TRIANGLE: &str = "solid tri
  facet normal 0 0 1
    outer loop
      vertex 0 0 0
      vertex 1 0 0
      vertex 0 1 0
    endloop
  endfacet
endsolid tri
";

    fn binary_stl(triangles: &[[[f32; 3]; 3]]) -> Vec<u8> {
        // Header deliberately starts with "solid" like many exporters emit
        let mut bytes = b"solid exported by a binary writer".to_vec();
        bytes.resize(HEADER_LEN, 0);
        bytes.extend_from_slice(&(triangles.len() as u32).to_le_bytes());
        for triangle in triangles {
            bytes.extend_from_slice(&[0u8; 12]);
            for vertex in triangle {
                for c in vertex {
                    bytes.extend_from_slice(&c.to_le_bytes());
                }
            }
            bytes.extend_from_slice(&[0u8; 2]);
        }
        bytes
    }

    #[test]
    fn parses_ascii_facets() {
        let triangles = parse_stl(ASCII_TRIANGLE.as_bytes()).unwrap();
        assert_eq!(triangles.len(), 1);
        assert_relative_eq!(triangles[0].normal().z, 1.0);
        assert_eq!(triangles[0].vertices[1].position, Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn parses_binary_records() {
        let bytes = binary_stl(&[
            [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            [[0.0, 0.0, 1.0], [0.0, 1.0, 1.0], [1.0, 0.0, 1.0]],
        ]);
        let triangles = parse_stl(&bytes).unwrap();
        assert_eq!(triangles.len(), 2);
        assert_relative_eq!(triangles[1].normal().z, -1.0);
        assert_eq!(triangles[1].vertices[2].position, Vec3::new(1.0, 0.0, 1.0));
    }

    #[test]
    fn truncated_binary_is_an_error() {
        let mut bytes = binary_stl(&[[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]]);
        bytes[0] = 0; // no longer looks like ASCII
        bytes.truncate(bytes.len() - 10);
        assert!(matches!(
            parse_stl(&bytes),
            Err(MeshError::Truncated { expected: 134, found: 124 })
        ));
    }

    #[test]
    fn truncated_binary_with_solid_header_is_an_error() {
        let mut bytes = binary_stl(&[
            [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            [[0.0, 0.0, 1.0], [0.0, 1.0, 1.0], [1.0, 0.0, 1.0]],
        ]);
        bytes.truncate(HEADER_LEN + 4 + 60);
        bytes[HEADER_LEN + 4..].fill(0);
        assert!(matches!(
            parse_stl(&bytes),
            Err(MeshError::Truncated { expected: 184, found: 144 })
        ));
    }

    #[test]
    fn quad_facet_is_fan_triangulated() {
        let text = "solid quad
  facet normal 0 0 1
    outer loop
      vertex 0 0 0
      vertex 1 0 0
      vertex 1 1 0
      vertex 0 1 0
    endloop
  endfacet
endsolid quad
";
        let triangles = parse_stl(text.as_bytes()).unwrap();
        assert_eq!(triangles.len(), 2);
        assert_eq!(triangles[1].vertices[0].position, Vec3::ZERO);
        assert_eq!(triangles[1].vertices[2].position, Vec3::new(0.0, 1.0, 0.0));
        assert!(triangles.iter().all(|t| t.normal().z > 0.99));
    }

    #[test]
    fn bad_coordinate_reports_line() {
        let text = ASCII_TRIANGLE.replace("vertex 1 0 0", "vertex 1 zero 0");
        match parse_stl(text.as_bytes()) {
            Err(MeshError::Parse { line, .. }) => assert_eq!(line, 5),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(parse_stl(b"hello").is_err());
    }
}
