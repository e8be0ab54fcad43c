use std::io::{Read, Write};

use log::{debug, warn};
use stlcodec_mesh::{IndexedMesh, Point3, Vector3, VertexIndex};

use crate::{
    byte_stream::{ByteReader, ByteWriter, HEADER_SIZE},
    error::{Result, StlError},
    index_facet, resolve_facet,
};

// UINT8[80]    - Header (free-form, not parsed)
// UINT32       - Number of triangles
// foreach triangle
//     REAL32[3] - Normal vector
//     REAL32[3] - Vertex 1
//     REAL32[3] - Vertex 2
//     REAL32[3] - Vertex 3
//     UINT16    - Attribute byte count
// end

/// Header plus triangle count.
pub const PREAMBLE_SIZE: usize = HEADER_SIZE + 4;

/// Size of one facet record: normal, 3 vertices and the attribute byte count.
pub const FACET_SIZE: usize = 50;

// Upper bound on up-front allocations so a corrupt triangle count cannot reserve gigabytes
// before the first facet is read.
const MAX_PREALLOCATED_FACETS: usize = 1 << 20;

pub(crate) fn read_binary<R: Read>(r: R) -> Result<IndexedMesh> {
    let mut r = ByteReader::new(r);

    // Binary files start with an 80 byte header. There is no defined structure for this
    // header but some implementations will stash some metadata in this header. We only
    // log it.
    let header = r
        .read_header()
        .map_err(|e| StlError::from_read(e, 0, || "the 80-byte header".to_string()))?;
    debug!(
        "binary STL header: {:?}",
        String::from_utf8_lossy(&header).trim_end_matches(['\0', ' '])
    );

    // Immediately following the header is an unsigned 32-bit integer that indicates the
    // number of triangles that follow.
    let n_triangles = r.read_u32().map_err(|e| {
        StlError::from_read(e, HEADER_SIZE as u64, || "the triangle count".to_string())
    })?;
    debug!("binary STL declares {n_triangles} triangles");

    let capacity = (n_triangles as usize).min(MAX_PREALLOCATED_FACETS);
    let mut index = VertexIndex::with_capacity(capacity / 2);
    let mut facets = Vec::with_capacity(capacity);
    for i in 0..n_triangles {
        let offset = r.offset();
        let (normal, vertices) = read_facet(&mut r).map_err(|e| {
            StlError::from_read(e, offset, || format!("facet {} of {n_triangles}", i + 1))
        })?;
        // The stored normal is kept so that rewriting the facet reproduces it exactly.
        facets.push(index_facet(&mut index, vertices)?.with_normal(normal));
    }
    Ok(IndexedMesh::new(index.into_points(), facets))
}

fn read_facet<R: Read>(r: &mut ByteReader<R>) -> std::io::Result<(Vector3, [Point3; 3])> {
    let normal = r.read_vector()?;
    let v0 = r.read_vector()?;
    let v1 = r.read_vector()?;
    let v2 = r.read_vector()?;
    // After the triangle geometry there is a 2-byte unsigned integer called the
    // "attribute byte count". There is no standard structure of this field, but
    // some applications use this for color data. We drop it.
    let _attribute_byte_count = r.read_u16()?;
    Ok((normal, [v0, v1, v2]))
}

pub(crate) fn write_binary<W: Write>(mesh: &IndexedMesh, header: &str, w: W) -> Result<()> {
    let count = u32::try_from(mesh.facet_count()).map_err(|_| StlError::TooManyFacets {
        count: mesh.facet_count(),
    })?;
    if header.contains("solid") {
        warn!("binary header {header:?} contains \"solid\"; readers may detect the file as ASCII");
    }

    let mut w = ByteWriter::new(w);
    w.write_header(header)?;
    w.write_u32(count)?;
    for (i, facet) in mesh.facets.iter().enumerate() {
        let (t, normal) = resolve_facet(mesh, i, facet)?;
        w.write_vector(&normal)?;
        w.write_vector(&t.p0)?;
        w.write_vector(&t.p1)?;
        w.write_vector(&t.p2)?;
        w.write_u16(0)?;
    }
    w.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use stlcodec_mesh::Facet;
    use stlcodec_test_data::{STL_CUBE, STL_TRIANGLE};

    use super::*;

    fn facet_bytes(values: [f32; 12], attribute: u16) -> Vec<u8> {
        let mut out: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        out.extend_from_slice(&attribute.to_le_bytes());
        out
    }

    fn file(count: u32, facets: &[Vec<u8>]) -> Vec<u8> {
        let mut out = vec![0u8; HEADER_SIZE];
        out.extend_from_slice(&count.to_le_bytes());
        for f in facets {
            out.extend_from_slice(f);
        }
        out
    }

    #[test]
    fn single_triangle() {
        let mesh = read_binary(STL_TRIANGLE.bytes).unwrap();
        assert_eq!(
            vec![
                Vector3::new(0.0, 0.0, 0.0),
                Vector3::new(1.0, 0.0, 0.0),
                Vector3::new(0.0, 1.0, 0.0)
            ],
            mesh.points
        );
        assert_eq!(
            vec![Facet::new(0, 1, 2).with_normal(Vector3::new(0.0, 0.0, 1.0))],
            mesh.facets
        );
    }

    #[test]
    fn attribute_bytes_are_ignored() {
        let values = [0., 0., 1., 0., 0., 0., 1., 0., 0., 0., 1., 0.];
        let bytes = file(1, &[facet_bytes(values, 0xbeef)]);
        let mesh = read_binary(&bytes[..]).unwrap();
        assert_eq!(1, mesh.facet_count());
        assert_eq!(3, mesh.point_count());
    }

    #[test]
    fn shared_vertex_is_stored_once() {
        let a = facet_bytes([0., 0., 1., 0., 0., 0., 1., 0., 0., 0., 1., 0.], 0);
        let b = facet_bytes([0., 0., 1., 0., 0., 0., 0., 1., 0., -1., 0., 0.], 0);
        let c = facet_bytes([0., 0., 1., 0., 0., 0., -1., 0., 0., 0., -1., 0.], 0);
        let mesh = read_binary(&file(3, &[a, b, c])[..]).unwrap();
        assert_eq!(5, mesh.point_count());
        assert!(mesh.facets.iter().all(|f| f.p0 == 0));
    }

    #[test]
    fn one_ulp_is_another_point() {
        let nudged = f32::from_bits(1.0f32.to_bits() + 1);
        let a = facet_bytes([0., 0., 1., 0., 0., 0., 1., 0., 0., 0., 1., 0.], 0);
        let b = facet_bytes([0., 0., 1., 0., 0., 0., nudged, 0., 0., 0., 1., 0.], 0);
        let mesh = read_binary(&file(2, &[a, b])[..]).unwrap();
        assert_eq!(4, mesh.point_count());
        assert_eq!([0, 3, 2], mesh.facets[1].ids());
    }

    #[test]
    fn truncated_facets() {
        let values = [0., 0., 1., 0., 0., 0., 1., 0., 0., 0., 1., 0.];
        let mut bytes = file(5, &[facet_bytes(values, 0), facet_bytes(values, 0)]);
        bytes.extend_from_slice(&[0u8; 20]);
        match read_binary(&bytes[..]) {
            Err(StlError::Truncated { offset, section }) => {
                assert_eq!((PREAMBLE_SIZE + 2 * FACET_SIZE) as u64, offset);
                assert_eq!("facet 3 of 5", section);
            }
            other => panic!("expected truncation, got {other:?}"),
        }
    }

    #[test]
    fn truncated_header() {
        assert!(matches!(
            read_binary(&[0u8; 40][..]),
            Err(StlError::Truncated { offset: 0, .. })
        ));
        assert!(matches!(
            read_binary(&[0u8; 82][..]),
            Err(StlError::Truncated { offset: 80, .. })
        ));
    }

    #[test]
    fn empty_mesh() {
        let mesh = read_binary(&file(0, &[])[..]).unwrap();
        assert_eq!(0, mesh.facet_count());
        assert_eq!(0, mesh.point_count());
    }

    #[test]
    fn rewrite_keeps_facet_bytes() {
        let mesh = read_binary(STL_CUBE.bytes).unwrap();
        let mut out = Vec::new();
        write_binary(&mesh, "rewritten", &mut out).unwrap();
        assert_eq!(STL_CUBE.bytes.len(), out.len());
        assert_eq!(&STL_CUBE.bytes[HEADER_SIZE..], &out[HEADER_SIZE..]);
    }

    #[test]
    fn missing_normals_are_computed() {
        let mesh = IndexedMesh::new(
            vec![
                Vector3::new(0.0, 0.0, 0.0),
                Vector3::new(2.0, 0.0, 0.0),
                Vector3::new(0.0, 2.0, 0.0),
            ],
            vec![Facet::new(0, 1, 2)],
        );
        let mut out = Vec::new();
        write_binary(&mesh, "", &mut out).unwrap();
        assert_eq!(PREAMBLE_SIZE + FACET_SIZE, out.len());
        let expected = facet_bytes([0., 0., 4., 0., 0., 0., 2., 0., 0., 0., 2., 0.], 0);
        assert_eq!(&expected[..], &out[PREAMBLE_SIZE..]);
    }

    #[test]
    fn invalid_point_id_is_rejected() {
        let mesh = IndexedMesh::new(vec![Vector3::new(0.0, 0.0, 0.0)], vec![Facet::new(0, 0, 1)]);
        let err = write_binary(&mesh, "", Vec::new()).unwrap_err();
        assert!(matches!(
            err,
            StlError::InvalidPointId {
                facet: 0,
                id: 1,
                point_count: 1
            }
        ));
    }
}
