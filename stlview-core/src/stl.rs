/// ASCII STL loader
///
/// Parsing is line oriented: each line is classified by its first word and
/// only `solid`, `facet`, `vertex` and `endloop` carry meaning. Everything
/// else (`outer loop`, `endfacet`, `endsolid`, blank lines) is skipped.
use nom::{
    bytes::complete::tag,
    character::complete::{space0, space1},
    combinator::eof,
    number::complete::double,
    sequence::{pair, preceded, terminated, tuple},
    IResult,
};
use std::path::Path;

use crate::error::{Error, Result};
use crate::geometry::{vertex, Face, Geometry, Vertex};

/// Store an STL normal in viewer axes: `(nx, -nz, ny, 1)`
pub fn remap_normal(nx: f64, ny: f64, nz: f64) -> Vertex {
    Vertex::new(nx, -nz, ny, 1.0)
}

/// Read and parse an ASCII STL file
pub fn load(path: impl AsRef<Path>) -> Result<Geometry> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_ascii_stl(&text)
}

/// Parse ASCII STL text into a face list
pub fn parse_ascii_stl(input: &str) -> Result<Geometry> {
    let mut geometry = Geometry::new();
    let mut seen_solid = false;
    let mut normal: Option<Vertex> = None;
    let mut pending: Vec<Vertex> = Vec::with_capacity(3);

    for (index, raw) in input.lines().enumerate() {
        let line_no = index + 1;
        let line = raw.trim();
        let mut words = line.splitn(2, char::is_whitespace);
        let keyword = words.next().unwrap_or("");
        let rest = words.next().unwrap_or("");

        match keyword {
            "solid" => seen_solid = true,
            "facet" => {
                require_solid(seen_solid, line_no)?;
                if normal.is_some() {
                    return Err(Error::format(line_no, "facet opened before endloop"));
                }
                let (nx, ny, nz) = parse_with(facet_normal, rest, line_no)?;
                normal = Some(remap_normal(nx, ny, nz));
            }
            "vertex" => {
                require_solid(seen_solid, line_no)?;
                if normal.is_none() {
                    return Err(Error::format(line_no, "vertex outside of a facet"));
                }
                if pending.len() == 3 {
                    return Err(Error::format(line_no, "more than 3 vertices in facet"));
                }
                let (x, y, z) = parse_with(triple, rest, line_no)?;
                pending.push(vertex(x, y, z));
            }
            "endloop" => {
                require_solid(seen_solid, line_no)?;
                let Some(n) = normal.take() else {
                    return Err(Error::format(line_no, "endloop without facet"));
                };
                if pending.len() != 3 {
                    return Err(Error::format(
                        line_no,
                        format!("expected 3 vertices, found {}", pending.len()),
                    ));
                }
                geometry.add_face(Face::new(pending[0], pending[1], pending[2], n));
                pending.clear();
            }
            _ => {}
        }
    }

    if !seen_solid {
        return Err(Error::format(0, "missing 'solid' header"));
    }
    if normal.is_some() {
        return Err(Error::format(0, "unterminated facet at end of input"));
    }

    tracing::debug!("Parsed {} faces", geometry.len());
    Ok(geometry)
}

fn require_solid(seen_solid: bool, line_no: usize) -> Result<()> {
    if seen_solid {
        Ok(())
    } else {
        Err(Error::format(line_no, "geometry before 'solid' header"))
    }
}

fn parse_with<'a, T>(
    parser: impl Fn(&'a str) -> IResult<&'a str, T>,
    input: &'a str,
    line_no: usize,
) -> Result<T> {
    // Trailing text after the last number is malformed, not ignored
    terminated(parser, pair(space0, eof))(input)
        .map(|(_, value)| value)
        .map_err(|e| Error::format(line_no, format!("bad coordinates: {e}")))
}

fn facet_normal(input: &str) -> IResult<&str, (f64, f64, f64)> {
    preceded(tuple((space0, tag("normal"))), triple)(input)
}

fn triple(input: &str) -> IResult<&str, (f64, f64, f64)> {
    let (input, x) = preceded(space0, double)(input)?;
    let (input, y) = preceded(space1, double)(input)?;
    let (input, z) = preceded(space1, double)(input)?;
    Ok((input, (x, y, z)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIANGLE: &str = "solid tri
  facet normal 0 0 1
    outer loop
      vertex 0 0 0
      vertex 1 0 0
      vertex 0 1 0
    endloop
  endfacet
endsolid tri
";

    #[test]
    fn test_parse_single_facet() {
        let geometry = parse_ascii_stl(TRIANGLE).unwrap();
        assert_eq!(geometry.len(), 1);
        let face = geometry.faces()[0];
        assert_eq!(face.vertices[1], vertex(1.0, 0.0, 0.0));
        assert_eq!(face.vertices[2], vertex(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_normal_is_remapped() {
        let text = TRIANGLE.replace("normal 0 0 1", "normal 0.25 0.5 0.75");
        let geometry = parse_ascii_stl(&text).unwrap();
        assert_eq!(geometry.faces()[0].normal, Vertex::new(0.25, -0.75, 0.5, 1.0));
    }

    #[test]
    fn test_tolerates_whitespace_and_exponents() {
        let text = "\t solid   x  \r\n facet normal -1.0e0 0 0\n outer loop\n\
                    vertex 1e-3 2.5 -3\n   vertex 0 0 0   \nvertex 1 1 1\n  endloop  \n";
        let geometry = parse_ascii_stl(text).unwrap();
        assert_eq!(geometry.len(), 1);
        assert_eq!(geometry.faces()[0].vertices[0], vertex(0.001, 2.5, -3.0));
    }

    #[test]
    fn test_missing_header() {
        let text = TRIANGLE.replacen("solid tri", "", 1);
        assert!(matches!(
            parse_ascii_stl(&text),
            Err(Error::Format { .. })
        ));
        assert!(matches!(parse_ascii_stl(""), Err(Error::Format { line: 0, .. })));
    }

    #[test]
    fn test_wrong_vertex_count() {
        let short = TRIANGLE.replacen("      vertex 0 1 0\n", "", 1);
        assert!(matches!(
            parse_ascii_stl(&short),
            Err(Error::Format { line: 6, .. })
        ));

        let long = TRIANGLE.replacen("vertex 0 1 0", "vertex 0 1 0\n vertex 1 1 1", 1);
        assert!(matches!(
            parse_ascii_stl(&long),
            Err(Error::Format { line: 7, .. })
        ));
    }

    #[test]
    fn test_unterminated_facet() {
        let text = "solid a\nfacet normal 0 0 1\nvertex 0 0 0\n";
        assert!(matches!(
            parse_ascii_stl(text),
            Err(Error::Format { line: 0, .. })
        ));
    }

    #[test]
    fn test_bad_number() {
        let text = TRIANGLE.replacen("vertex 1 0 0", "vertex 1 zero 0", 1);
        assert!(matches!(
            parse_ascii_stl(&text),
            Err(Error::Format { line: 5, .. })
        ));
    }

    #[test]
    fn test_trailing_garbage_rejected() {
        let glued = TRIANGLE.replacen("vertex 1 0 0", "vertex 1 0 0abc", 1);
        assert!(matches!(
            parse_ascii_stl(&glued),
            Err(Error::Format { line: 5, .. })
        ));

        let extra = TRIANGLE.replacen("vertex 1 0 0", "vertex 1 0 0 7", 1);
        assert!(matches!(
            parse_ascii_stl(&extra),
            Err(Error::Format { line: 5, .. })
        ));

        let normal = TRIANGLE.replacen("normal 0 0 1", "normal 0 0 1x", 1);
        assert!(matches!(
            parse_ascii_stl(&normal),
            Err(Error::Format { line: 2, .. })
        ));
    }

    #[test]
    fn test_empty_solid() {
        let geometry = parse_ascii_stl("solid empty\nendsolid empty\n").unwrap();
        assert!(geometry.is_empty());
    }
}
