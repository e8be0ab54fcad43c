use std::{
    fmt,
    io::{Read, Write},
};

use log::debug;
use stlcodec_mesh::{Facet, IndexedMesh, Point3};

use crate::{
    config::{DecodeConfig, EncodeConfig},
    decode_with, encode_with,
    error::{Result, StlError},
};

/// A numeric type that point coordinates can be stored in.
pub trait Coordinate: Copy + fmt::Display {
    const NAME: &'static str;

    fn to_f32(self) -> Option<f32>;

    fn from_f32(value: f32) -> Option<Self>;
}

impl Coordinate for f32 {
    const NAME: &'static str = "f32";

    fn to_f32(self) -> Option<f32> {
        Some(self)
    }

    fn from_f32(value: f32) -> Option<Self> {
        Some(value)
    }
}

impl Coordinate for f64 {
    const NAME: &'static str = "f64";

    // Finite values beyond the f32 range would silently become infinities.
    fn to_f32(self) -> Option<f32> {
        let value = self as f32;
        if self.is_finite() && !value.is_finite() {
            None
        } else {
            Some(value)
        }
    }

    fn from_f32(value: f32) -> Option<Self> {
        Some(value.into())
    }
}

// Integer targets truncate toward zero. Values that do not fit, and NaN, have no integer
// representation. The upper bounds are exclusive powers of two: `MAX as f32` rounds up to
// 2^BITS for the wide types, and that value is already out of range.
macro_rules! unsigned_coordinate {
    ($($t:ty),*) => {
        $(
            impl Coordinate for $t {
                const NAME: &'static str = stringify!($t);

                fn to_f32(self) -> Option<f32> {
                    Some(self as f32)
                }

                fn from_f32(value: f32) -> Option<Self> {
                    if value > -1.0 && value < 2f32.powi(<$t>::BITS as i32) {
                        Some(value as $t)
                    } else {
                        None
                    }
                }
            }
        )*
    };
}

macro_rules! signed_coordinate {
    ($($t:ty),*) => {
        $(
            impl Coordinate for $t {
                const NAME: &'static str = stringify!($t);

                fn to_f32(self) -> Option<f32> {
                    Some(self as f32)
                }

                fn from_f32(value: f32) -> Option<Self> {
                    let bound = 2f32.powi(<$t>::BITS as i32 - 1);
                    if value >= -bound && value < bound {
                        Some(value as $t)
                    } else {
                        None
                    }
                }
            }
        )*
    };
}

unsigned_coordinate!(u8, u16, u32, u64, usize);
signed_coordinate!(i8, i16, i32, i64, isize);

/// Flat coordinates, `dimension` components per point.
#[derive(Debug, Clone, Copy)]
pub struct PointBuffer<'a, T> {
    pub dimension: usize,
    pub coords: &'a [T],
}

impl<'a, T: Coordinate> PointBuffer<'a, T> {
    pub fn new(dimension: usize, coords: &'a [T]) -> Self {
        Self { dimension, coords }
    }

    /// Converts the buffer to `f32` points.
    ///
    /// # Errors
    ///
    /// Fails when the dimension is not 3, when the buffer ends in the middle of a point, or
    /// when a coordinate cannot be represented as `f32`.
    pub fn to_points(&self) -> Result<Vec<Point3>> {
        if self.dimension != 3 {
            return Err(StlError::UnsupportedDimension {
                dimension: self.dimension,
            });
        }
        if self.coords.len() % 3 != 0 {
            return Err(StlError::IncompletePoint {
                len: self.coords.len(),
            });
        }
        let convert = |c: T| {
            c.to_f32().ok_or_else(|| StlError::UnsupportedComponentType {
                type_name: T::NAME,
                value: c.to_string(),
            })
        };
        self.coords
            .chunks_exact(3)
            .map(|p| -> Result<Point3> {
                Ok(Point3::new(convert(p[0])?, convert(p[1])?, convert(p[2])?))
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellKind {
    Vertex,
    Line,
    Triangle,
    Quadrilateral,
    Polygon,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub kind: CellKind,
    pub points: Vec<u32>,
}

impl Cell {
    pub fn new(kind: CellKind, points: Vec<u32>) -> Self {
        Self { kind, points }
    }

    pub fn triangle(p0: u32, p1: u32, p2: u32) -> Self {
        Self::new(CellKind::Triangle, vec![p0, p1, p2])
    }

    /// The three point identifiers if this cell is a triangle: either a `Triangle` cell or a
    /// `Polygon` with exactly three points.
    pub fn as_triangle(&self) -> Option<[u32; 3]> {
        match (self.kind, self.points.as_slice()) {
            (CellKind::Triangle | CellKind::Polygon, &[p0, p1, p2]) => Some([p0, p1, p2]),
            _ => None,
        }
    }
}

/// Writes the triangles among `cells` as STL. Other cells are skipped.
///
/// The point buffer is validated and converted before anything is written.
pub fn encode_cells<T: Coordinate, W: Write>(
    points: &PointBuffer<'_, T>,
    cells: &[Cell],
    config: &EncodeConfig,
    writer: W,
) -> Result<()> {
    let points = points.to_points()?;
    let facets: Vec<Facet> = cells
        .iter()
        .filter_map(Cell::as_triangle)
        .map(|[p0, p1, p2]| Facet::new(p0, p1, p2))
        .collect();
    let skipped = cells.len() - facets.len();
    if skipped > 0 {
        debug!("skipping {skipped} cells that are not triangles");
    }
    encode_with(&IndexedMesh::new(points, facets), config, writer)
}

/// Decodes an STL stream into flat coordinates of type `T` and triangle point identifiers.
pub fn decode_into<T: Coordinate, R: Read>(
    reader: R,
    config: &DecodeConfig,
) -> Result<(Vec<T>, Vec<[u32; 3]>)> {
    let mesh = decode_with(reader, config)?;
    let coords = mesh
        .points
        .iter()
        .flat_map(|p| [p.x, p.y, p.z])
        .map(|c| {
            T::from_f32(c).ok_or_else(|| StlError::UnsupportedComponentType {
                type_name: T::NAME,
                value: c.to_string(),
            })
        })
        .collect::<Result<Vec<T>>>()?;
    let triangles = mesh.facets.iter().map(Facet::ids).collect();
    Ok((coords, triangles))
}

#[cfg(test)]
mod tests {
    use stlcodec_test_data::STL_TRIANGLE;

    use super::*;
    use crate::{binary::PREAMBLE_SIZE, FileFormat};

    #[test]
    fn integer_points_are_converted() {
        let coords = [0i16, 0, 0, 1, 0, 0, 0, 1, 0];
        let points = PointBuffer::new(3, &coords).to_points().unwrap();
        assert_eq!(Point3::new(1.0, 0.0, 0.0), points[1]);
        assert_eq!(3, points.len());
    }

    #[test]
    fn f64_beyond_f32_range() {
        let coords = [0.0f64, 1e300, 0.0];
        match PointBuffer::new(3, &coords).to_points() {
            Err(StlError::UnsupportedComponentType { type_name, value }) => {
                assert_eq!("f64", type_name);
                assert_eq!(1e300f64.to_string(), value);
            }
            other => panic!("expected a conversion error, got {other:?}"),
        }

        let coords = [f64::INFINITY, f64::MIN_POSITIVE, -0.5];
        let points = PointBuffer::new(3, &coords).to_points().unwrap();
        assert_eq!(f32::INFINITY, points[0].x);
        assert_eq!(0.0, points[0].y);
    }

    #[test]
    fn integer_upper_bounds_are_exclusive() {
        let two_pow_31 = 2f32.powi(31);
        assert_eq!(None, i32::from_f32(two_pow_31));
        assert_eq!(Some(2147483520), i32::from_f32(2147483520.0));
        assert_eq!(Some(i32::MIN), i32::from_f32(-two_pow_31));
        assert_eq!(None, u32::from_f32(2f32.powi(32)));
        assert_eq!(None, u64::from_f32(2f32.powi(64)));
        assert_eq!(None, i64::from_f32(2f32.powi(63)));
        assert_eq!(Some(255), u8::from_f32(255.9));
        assert_eq!(None, u8::from_f32(256.0));
        assert_eq!(Some(-128), i8::from_f32(-128.0));
        assert_eq!(None, i8::from_f32(128.0));
        assert_eq!(Some(0), u16::from_f32(-0.5));
        assert_eq!(None, u16::from_f32(-1.0));
        assert_eq!(None, i16::from_f32(f32::NAN));
        assert_eq!(None, usize::from_f32(f32::INFINITY));
    }

    #[test]
    fn only_3d_points() {
        let coords = [0.0f64; 4];
        let err = PointBuffer::new(2, &coords).to_points().unwrap_err();
        assert!(matches!(err, StlError::UnsupportedDimension { dimension: 2 }));
    }

    #[test]
    fn partial_point() {
        let coords = [0.0f64; 4];
        let err = PointBuffer::new(3, &coords).to_points().unwrap_err();
        assert!(matches!(err, StlError::IncompletePoint { len: 4 }));
    }

    #[test]
    fn triangle_cells() {
        assert_eq!(Some([1, 2, 3]), Cell::triangle(1, 2, 3).as_triangle());
        assert_eq!(
            Some([4, 5, 6]),
            Cell::new(CellKind::Polygon, vec![4, 5, 6]).as_triangle()
        );
        assert_eq!(None, Cell::new(CellKind::Polygon, vec![1, 2, 3, 4]).as_triangle());
        assert_eq!(None, Cell::new(CellKind::Quadrilateral, vec![1, 2, 3, 4]).as_triangle());
        assert_eq!(None, Cell::new(CellKind::Line, vec![1, 2]).as_triangle());
    }

    #[test]
    fn non_triangles_are_not_counted() {
        let coords = [0.0f64, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0];
        let cells = [
            Cell::new(CellKind::Quadrilateral, vec![0, 1, 2, 3]),
            Cell::triangle(0, 1, 2),
            Cell::new(CellKind::Line, vec![0, 3]),
            Cell::new(CellKind::Polygon, vec![0, 2, 3]),
        ];
        let mut out = Vec::new();
        encode_cells(
            &PointBuffer::new(3, &coords),
            &cells,
            &EncodeConfig::default(),
            &mut out,
        )
        .unwrap();
        assert_eq!(2, u32::from_le_bytes([out[80], out[81], out[82], out[83]]));
        assert_eq!(PREAMBLE_SIZE + 2 * 50, out.len());
    }

    #[test]
    fn bad_dimension_writes_nothing() {
        let coords = [0.0f32; 8];
        let mut out = Vec::new();
        let err = encode_cells(
            &PointBuffer::new(4, &coords),
            &[Cell::triangle(0, 0, 1)],
            &EncodeConfig::new(FileFormat::Ascii),
            &mut out,
        )
        .unwrap_err();
        assert!(matches!(err, StlError::UnsupportedDimension { dimension: 4 }));
        assert!(out.is_empty());
    }

    #[test]
    fn decode_into_caller_type() {
        let (coords, triangles) =
            decode_into::<u8, _>(STL_TRIANGLE.bytes, &DecodeConfig::default()).unwrap();
        assert_eq!(vec![0u8, 0, 0, 1, 0, 0, 0, 1, 0], coords);
        assert_eq!(vec![[0, 1, 2]], triangles);

        let (coords, _) =
            decode_into::<f64, _>(STL_TRIANGLE.bytes, &DecodeConfig::default()).unwrap();
        assert_eq!(9, coords.len());
    }

    #[test]
    fn decode_into_out_of_range_type() {
        let text = "solid s\nfacet normal 0 0 0\nouter loop\nvertex -1 0 0\nvertex 0 0 0\n\
                    vertex 0 1 0\nendloop\nendfacet\nendsolid\n";
        let err = decode_into::<u32, _>(text.as_bytes(), &DecodeConfig::default()).unwrap_err();
        match err {
            StlError::UnsupportedComponentType { type_name, value } => {
                assert_eq!("u32", type_name);
                assert_eq!("-1", value);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }
}
