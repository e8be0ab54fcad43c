use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Cursor, Read, Write},
    path::Path,
};

use log::debug;
use stlcodec_mesh::{Facet, IndexedMesh, Point3, Triangle, Vector3, VertexIndex};

mod ascii;
mod binary;
mod buffers;
mod byte_stream;
mod config;
mod error;
mod format;

pub use binary::{FACET_SIZE, PREAMBLE_SIZE};
pub use buffers::{decode_into, encode_cells, Cell, CellKind, Coordinate, PointBuffer};
pub use byte_stream::HEADER_SIZE;
pub use config::{DecodeConfig, EncodeConfig, DEFAULT_HEADER};
pub use error::{Result, StlError};
pub use format::{can_decode, detect_format, is_stl_path, FileFormat};

/// Decodes an STL stream, detecting whether it is ASCII or binary.
pub fn decode<R: Read>(reader: R) -> Result<IndexedMesh> {
    decode_with(reader, &DecodeConfig::default())
}

pub fn decode_with<R: Read>(reader: R, config: &DecodeConfig) -> Result<IndexedMesh> {
    // Peek at the start of the stream to pick a format, then put those bytes back in front of
    // the rest so either codec sees the file from its first byte.
    let mut reader = BufReader::new(reader);
    let mut prefix = Vec::with_capacity(PREAMBLE_SIZE);
    reader
        .by_ref()
        .take(PREAMBLE_SIZE as u64)
        .read_to_end(&mut prefix)?;
    let format = match config.format {
        Some(format) => format,
        None => {
            // Detection looks at the whole first line, which may run past the preamble.
            if prefix.len() == PREAMBLE_SIZE && !prefix.contains(&b'\n') {
                reader.read_until(b'\n', &mut prefix)?;
            }
            detect_format(&prefix)
        }
    };
    debug!("decoding {format} STL");

    let stream = Cursor::new(prefix).chain(reader);
    let mesh = match format {
        FileFormat::Ascii => ascii::read_ascii(stream)?,
        FileFormat::Binary => binary::read_binary(stream)?,
    };
    debug!(
        "decoded {} facets over {} unique points",
        mesh.facet_count(),
        mesh.point_count()
    );
    Ok(mesh)
}

pub fn read_stl<P: AsRef<Path>>(p: P) -> Result<IndexedMesh> {
    let p = p.as_ref();
    let f = File::open(p).map_err(|source| StlError::Open {
        path: p.to_path_buf(),
        source,
    })?;
    decode(f)
}

pub fn parse_stl(data: &[u8]) -> Result<IndexedMesh> {
    decode(data)
}

/// Encodes `mesh` in `format`, using the default binary header.
pub fn encode<W: Write>(mesh: &IndexedMesh, format: FileFormat, writer: W) -> Result<()> {
    encode_with(mesh, &EncodeConfig::new(format), writer)
}

/// Encodes `mesh` as described by `config`.
///
/// Every facet is checked against the point list before the first byte is written, so an
/// invalid mesh leaves the writer untouched.
pub fn encode_with<W: Write>(mesh: &IndexedMesh, config: &EncodeConfig, writer: W) -> Result<()> {
    if let Some((facet, id)) = mesh.find_invalid_point_id() {
        return Err(StlError::InvalidPointId {
            facet,
            id,
            point_count: mesh.point_count(),
        });
    }
    debug!(
        "encoding {} facets as {} STL",
        mesh.facet_count(),
        config.format
    );
    let writer = BufWriter::new(writer);
    match config.format {
        FileFormat::Ascii => ascii::write_ascii(mesh, writer),
        FileFormat::Binary => binary::write_binary(mesh, &config.header, writer),
    }
}

pub fn write_stl<P: AsRef<Path>>(p: P, mesh: &IndexedMesh, format: FileFormat) -> Result<()> {
    let p = p.as_ref();
    let f = File::create(p).map_err(|source| StlError::Open {
        path: p.to_path_buf(),
        source,
    })?;
    encode(mesh, format, f)
}

pub trait StlReader: Read {
    fn read_stl(&mut self) -> Result<IndexedMesh>;
}

impl<T: Read> StlReader for T {
    fn read_stl(&mut self) -> Result<IndexedMesh> {
        decode(self)
    }
}

pub trait StlWriter: Write {
    fn write_stl(&mut self, mesh: &IndexedMesh, format: FileFormat) -> Result<()>;
}

impl<T: Write> StlWriter for T {
    fn write_stl(&mut self, mesh: &IndexedMesh, format: FileFormat) -> Result<()> {
        encode(mesh, format, self)
    }
}

/// Coordinates and normal to write for the `i`th facet of `mesh`.
pub(crate) fn resolve_facet(
    mesh: &IndexedMesh,
    i: usize,
    facet: &Facet,
) -> Result<(Triangle, Vector3)> {
    mesh.facet_geometry(facet)
        .ok_or_else(|| StlError::InvalidPointId {
            facet: i,
            id: facet
                .ids()
                .into_iter()
                .find(|&id| id as usize >= mesh.point_count())
                .unwrap_or(facet.p0),
            point_count: mesh.point_count(),
        })
}

/// Adds the vertices of a decoded facet to `index`.
pub(crate) fn index_facet(index: &mut VertexIndex, [p0, p1, p2]: [Point3; 3]) -> Result<Facet> {
    index
        .insert_facet(p0, p1, p2)
        .ok_or(StlError::TooManyPoints { count: index.len() })
}
