/// Loader for the comma-separated mesh text format
///
/// Line 1 declares `vertexCount, faceCount`; the next `vertexCount` lines
/// are `id, x, y, z` records and the final `faceCount` lines are
/// `v0, v1, v2` records referencing vertex ids. Whitespace around commas
/// and blank lines are tolerated; anything else fails hard, and a failed
/// parse never yields a partial mesh.
use nom::{
    character::complete::{char, digit1, space0},
    combinator::{all_consuming, map_res},
    number::complete::float,
    sequence::{delimited, separated_pair, tuple},
    IResult,
};
use thiserror::Error;
use tracing::debug;

use crate::geometry::{Mesh, Vertex};

/// Load-time failure. Line numbers are 1-based positions in the input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("line 1: expected `vertexCount, faceCount`")]
    MalformedHeader,
    #[error("line {line}: malformed record `{content}`")]
    NonNumericField { line: usize, content: String },
    #[error("declared {declared} vertices but found {found} vertex records")]
    VertexCountMismatch { declared: usize, found: usize },
    #[error("declared {declared} faces but found {found} face records")]
    FaceCountMismatch { declared: usize, found: usize },
    #[error("line {line}: face references vertex {id}, outside [0, {count})")]
    DanglingFaceReference { line: usize, id: usize, count: usize },
    #[error("line {line}: vertex id {id} outside the declared range [0, {count})")]
    VertexIdOutOfRange { line: usize, id: usize, count: usize },
    #[error("line {line}: vertex id {id} declared more than once")]
    DuplicateVertexId { line: usize, id: usize },
    #[error("line {line}: face repeats vertex {id}")]
    RepeatedFaceVertex { line: usize, id: usize },
}

fn comma(input: &str) -> IResult<&str, char> {
    delimited(space0, char(','), space0)(input)
}

fn integer(input: &str) -> IResult<&str, usize> {
    map_res(digit1, str::parse)(input)
}

fn header_line(input: &str) -> IResult<&str, (usize, usize)> {
    all_consuming(separated_pair(integer, comma, integer))(input)
}

fn vertex_line(input: &str) -> IResult<&str, (usize, f32, f32, f32)> {
    let (input, (id, _, x, _, y, _, z)) =
        all_consuming(tuple((integer, comma, float, comma, float, comma, float)))(input)?;
    Ok((input, (id, x, y, z)))
}

fn face_line(input: &str) -> IResult<&str, [usize; 3]> {
    let (input, (v0, _, v1, _, v2)) =
        all_consuming(tuple((integer, comma, integer, comma, integer)))(input)?;
    Ok((input, [v0, v1, v2]))
}

/// Parse the text format into a validated [`Mesh`].
pub fn parse_mesh(text: &str) -> Result<Mesh, ParseError> {
    // Blank lines carry no records; original line numbers are kept for errors
    let lines: Vec<(usize, &str)> = text
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty())
        .collect();

    let Some(&(_, header)) = lines.first() else {
        return Err(ParseError::MalformedHeader);
    };
    let (vertex_count, face_count) = header_line(header)
        .map(|(_, counts)| counts)
        .map_err(|_| ParseError::MalformedHeader)?;

    let records = &lines[1..];
    if records.len() < vertex_count {
        return Err(ParseError::VertexCountMismatch {
            declared: vertex_count,
            found: records.len(),
        });
    }

    let mut slots: Vec<Option<Vertex>> = vec![None; vertex_count];
    for &(line, content) in &records[..vertex_count] {
        let (id, x, y, z) = vertex_line(content)
            .map(|(_, fields)| fields)
            .map_err(|_| ParseError::NonNumericField {
                line,
                content: content.to_string(),
            })?;
        if id >= vertex_count {
            return Err(ParseError::VertexIdOutOfRange {
                line,
                id,
                count: vertex_count,
            });
        }
        if slots[id].is_some() {
            return Err(ParseError::DuplicateVertexId { line, id });
        }
        slots[id] = Some(Vertex::new(id, x, y, z));
    }
    // Dense + unique + in range means every slot is filled
    let vertices: Vec<Vertex> = slots.into_iter().flatten().collect();

    let face_records = &records[vertex_count..];
    if face_records.len() != face_count {
        return Err(ParseError::FaceCountMismatch {
            declared: face_count,
            found: face_records.len(),
        });
    }

    let mut face_ids = Vec::with_capacity(face_count);
    for &(line, content) in face_records {
        let ids = face_line(content)
            .map(|(_, ids)| ids)
            .map_err(|_| ParseError::NonNumericField {
                line,
                content: content.to_string(),
            })?;
        for &id in &ids {
            if id >= vertex_count {
                return Err(ParseError::DanglingFaceReference {
                    line,
                    id,
                    count: vertex_count,
                });
            }
        }
        if ids[0] == ids[1] || ids[0] == ids[2] {
            return Err(ParseError::RepeatedFaceVertex { line, id: ids[0] });
        }
        if ids[1] == ids[2] {
            return Err(ParseError::RepeatedFaceVertex { line, id: ids[1] });
        }
        face_ids.push(ids);
    }

    let mesh = Mesh::assemble(vertices, &face_ids);
    debug!(
        vertices = mesh.vertex_count(),
        faces = mesh.face_count(),
        "mesh loaded"
    );
    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    const TETRAHEDRON: &str = "\
4, 4
0, -1.0, -1.0, 1.0
1, 1.0, -1.0, 1.0
2, 0.0, 1.0, 0.0
3, 0.0, -1.0, -1.0
0, 3, 1
0, 1, 2
1, 3, 2
3, 0, 2
";

    #[test]
    fn test_parse_sample_tetrahedron() {
        let mesh = parse_mesh(TETRAHEDRON).unwrap();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.face_count(), 4);
        let v = mesh.vertex_at(2).unwrap();
        assert_eq!(v.position, Point3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_whitespace_and_blank_lines_tolerated() {
        let text = "3 , 1\n\n0,0,0,0\n 1 , 1.0 ,0, 0\n2, 0, 1, 0\n\n0 ,1, 2\n\n";
        let mesh = parse_mesh(text).unwrap();
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.face_count(), 1);
    }

    #[test]
    fn test_malformed_header() {
        assert_eq!(parse_mesh(""), Err(ParseError::MalformedHeader));
        assert_eq!(parse_mesh("4\n"), Err(ParseError::MalformedHeader));
        assert_eq!(parse_mesh("four, 4\n"), Err(ParseError::MalformedHeader));
    }

    #[test]
    fn test_vertex_count_mismatch() {
        let text = "2, 0\n0, 0, 0, 0\n";
        assert_eq!(
            parse_mesh(text),
            Err(ParseError::VertexCountMismatch {
                declared: 2,
                found: 1
            })
        );
    }

    #[test]
    fn test_face_count_mismatch_with_trailing_records() {
        let text = "3, 1\n0,0,0,0\n1,1,0,0\n2,0,1,0\n0,1,2\n0,2,1\n";
        assert_eq!(
            parse_mesh(text),
            Err(ParseError::FaceCountMismatch {
                declared: 1,
                found: 2
            })
        );
    }

    #[test]
    fn test_non_numeric_field() {
        let text = "1, 0\n0, x, 0, 0\n";
        assert!(matches!(
            parse_mesh(text),
            Err(ParseError::NonNumericField { line: 2, .. })
        ));
    }

    #[test]
    fn test_dangling_face_reference() {
        let text = "3, 1\n0,0,0,0\n1,1,0,0\n2,0,1,0\n0,1,3\n";
        assert_eq!(
            parse_mesh(text),
            Err(ParseError::DanglingFaceReference {
                line: 5,
                id: 3,
                count: 3
            })
        );
    }

    #[test]
    fn test_repeated_face_vertex() {
        let text = "3, 1\n0,0,0,0\n1,1,0,0\n2,0,1,0\n0,1,1\n";
        assert_eq!(
            parse_mesh(text),
            Err(ParseError::RepeatedFaceVertex { line: 5, id: 1 })
        );
    }

    #[test]
    fn test_duplicate_and_out_of_range_vertex_ids() {
        let dup = "2, 0\n0,0,0,0\n0,1,0,0\n";
        assert_eq!(
            parse_mesh(dup),
            Err(ParseError::DuplicateVertexId { line: 3, id: 0 })
        );
        let range = "2, 0\n0,0,0,0\n5,1,0,0\n";
        assert_eq!(
            parse_mesh(range),
            Err(ParseError::VertexIdOutOfRange {
                line: 3,
                id: 5,
                count: 2
            })
        );
    }

    #[test]
    fn test_signed_and_fractional_coordinates() {
        let text = "2, 0\n0, -0.5, +2.25, 1e2\n1, .5, 0, -3\n";
        let mesh = parse_mesh(text).unwrap();
        let v0 = mesh.vertex_at(0).unwrap();
        assert_eq!(v0.position, Point3::new(-0.5, 2.25, 100.0));
    }
}
