use std::io::{self, BufRead, Write};

use log::debug;
use stlcodec_mesh::{IndexedMesh, Point3, VertexIndex};

use crate::{
    error::{Result, StlError},
    index_facet, resolve_facet,
};

// solid name
//   facet normal ni nj nk
//     outer loop
//       vertex v1x v1y v1z
//       vertex v2x v2y v2z
//       vertex v3x v3y v3z
//     endloop
//   endfacet
//   ...
// endsolid name
//
// Keywords are matched by substring, so indentation and trailing text are free. The facet
// normal is not parsed; writers recompute it from the vertices.

const END_OF_FILE: &str = "<end of file>";

/// Line cursor over the input. `line` is the 1-based number of the line held in `text`.
struct Lines<R> {
    inner: R,
    buf: Vec<u8>,
    text: String,
    line: usize,
}

impl<R: BufRead> Lines<R> {
    fn new(inner: R) -> Self {
        Self {
            inner,
            buf: Vec::new(),
            text: String::new(),
            line: 0,
        }
    }

    /// Moves to the next line. Returns false at the end of the input.
    fn advance(&mut self) -> io::Result<bool> {
        self.buf.clear();
        if self.inner.read_until(b'\n', &mut self.buf)? == 0 {
            self.text.clear();
            return Ok(false);
        }
        self.line += 1;
        self.text = String::from_utf8_lossy(&self.buf)
            .trim_end_matches(['\r', '\n'])
            .to_string();
        Ok(true)
    }

    /// Moves to the next line that is not blank. Skipped lines still count towards `line`.
    fn next_line(&mut self, expected: &'static str) -> Result<()> {
        while self.advance()? {
            if !self.text.trim().is_empty() {
                return Ok(());
            }
        }
        Err(StlError::grammar(expected, END_OF_FILE, self.line + 1))
    }

    fn check(&self, expected: &'static str) -> Result<()> {
        if self.text.contains(expected) {
            Ok(())
        } else {
            Err(StlError::grammar(expected, &self.text, self.line))
        }
    }

    fn expect(&mut self, expected: &'static str) -> Result<()> {
        self.next_line(expected)?;
        self.check(expected)
    }

    fn vertex(&mut self) -> Result<Point3> {
        self.next_line("vertex")?;
        let mut tokens = self.text.split_whitespace();
        if !tokens.next().is_some_and(|keyword| keyword.contains("vertex")) {
            return Err(StlError::grammar("vertex", &self.text, self.line));
        }
        let mut coordinate = || tokens.next().and_then(|t| t.parse::<f32>().ok());
        match (coordinate(), coordinate(), coordinate()) {
            (Some(x), Some(y), Some(z)) => Ok(Point3::new(x, y, z)),
            _ => Err(StlError::grammar("vertex x y z", &self.text, self.line)),
        }
    }
}

pub(crate) fn read_ascii<R: BufRead>(r: R) -> Result<IndexedMesh> {
    let mut lines = Lines::new(r);

    if !lines.advance()? {
        return Err(StlError::grammar("solid", END_OF_FILE, 1));
    }
    lines.check("solid")?;
    let name = lines
        .text
        .trim()
        .strip_prefix("solid")
        .unwrap_or_default()
        .trim();
    debug!("ASCII STL solid {name:?}");

    let mut index = VertexIndex::new();
    let mut facets = Vec::new();
    loop {
        lines.next_line("endsolid")?;
        if lines.text.contains("endsolid") {
            break;
        }
        lines.check("facet normal")?;
        lines.expect("outer loop")?;
        let p0 = lines.vertex()?;
        let p1 = lines.vertex()?;
        let p2 = lines.vertex()?;
        lines.expect("endloop")?;
        lines.expect("endfacet")?;
        facets.push(index_facet(&mut index, [p0, p1, p2])?);
    }
    Ok(IndexedMesh::new(index.into_points(), facets))
}

/// Writes `mesh` as ASCII STL.
///
/// Numbers use the shortest representation that parses back to the same `f32`, so reading
/// the output recovers every coordinate exactly.
pub(crate) fn write_ascii<W: Write>(mesh: &IndexedMesh, mut w: W) -> Result<()> {
    writeln!(w, "solid ascii")?;
    for (i, facet) in mesh.facets.iter().enumerate() {
        let (t, n) = resolve_facet(mesh, i, facet)?;
        writeln!(w, "  facet normal {} {} {}", n.x, n.y, n.z)?;
        writeln!(w, "    outer loop")?;
        for p in [t.p0, t.p1, t.p2] {
            writeln!(w, "      vertex {} {} {}", p.x, p.y, p.z)?;
        }
        writeln!(w, "    endloop")?;
        writeln!(w, "  endfacet")?;
    }
    writeln!(w, "endsolid")?;
    w.flush()?;
    Ok(())
}
