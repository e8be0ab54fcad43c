use crate::{
    geometry::{Point3, Triangle, Vector3},
    vertex_index::VertexIndex,
    TriangleMesh,
};

/// Maintains geometry for a single facet.
///
/// This type must be paired with a list of points. The points here are only indices into
/// another vector. We do this so we can store each vertex as 4 bytes instead of the 12 bytes
/// required to store the entire Vector3. This has further savings if a vertex is reused.
///
/// As a simple example, consider a simple geometry such as:
///
/// ```text
///    *-------*
///    |\     /|
///    | \   / |
///    |  \ /  |
///    |   *   |
///    |  / \  |
///    | /   \ |
///    |/     \|
///    *-------*
/// ```
///
/// Here we have 5 points and 4 facets. If we would store every facet as a series of points
/// we would need:
///    3 floats * 4b * 3 points * 4 facets = 144 bytes.
///
/// If instead we store:
///    3 floats * 4b * 5 points  = 60b
///  + 3 indices * 4b * 4 facets = 48b
///                              =======
///                               108b
#[derive(Debug, PartialEq, Copy, Clone)]
pub struct Facet {
    pub p0: u32,
    pub p1: u32,
    pub p2: u32,
    /// Normal carried over from the source file. When absent, writers derive one from the
    /// vertices with [`crate::facet_normal`].
    pub normal: Option<Vector3>,
}

impl Facet {
    pub fn new(p0: u32, p1: u32, p2: u32) -> Self {
        Self {
            p0,
            p1,
            p2,
            normal: None,
        }
    }

    pub fn with_normal(self, normal: Vector3) -> Self {
        Self {
            normal: Some(normal),
            ..self
        }
    }

    pub fn ids(&self) -> [u32; 3] {
        [self.p0, self.p1, self.p2]
    }
}

/// A triangle mesh with deduplicated points.
///
/// A point's identifier is its position in `points`, and every facet refers to points by
/// identifier.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct IndexedMesh {
    pub points: Vec<Point3>,
    pub facets: Vec<Facet>,
}

impl IndexedMesh {
    pub fn new(points: Vec<Point3>, facets: Vec<Facet>) -> Self {
        Self { points, facets }
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    pub fn facet_count(&self) -> usize {
        self.facets.len()
    }

    /// Resolves the coordinates of `facet`, or `None` if it references a missing point.
    pub fn facet_points(&self, facet: &Facet) -> Option<Triangle> {
        Some(Triangle {
            p0: *self.points.get(facet.p0 as usize)?,
            p1: *self.points.get(facet.p1 as usize)?,
            p2: *self.points.get(facet.p2 as usize)?,
        })
    }

    /// Resolves `facet` together with the normal to write for it: the stored normal if it has
    /// one, otherwise the normal derived from its vertices.
    pub fn facet_geometry(&self, facet: &Facet) -> Option<(Triangle, Vector3)> {
        let triangle = self.facet_points(facet)?;
        let normal = facet.normal.unwrap_or_else(|| triangle.normal());
        Some((triangle, normal))
    }

    /// Returns the position and offending identifier of the first facet that references a
    /// point outside of `points`.
    pub fn find_invalid_point_id(&self) -> Option<(usize, u32)> {
        let n = self.points.len();
        self.facets.iter().enumerate().find_map(|(i, f)| {
            f.ids()
                .into_iter()
                .find(|&id| id as usize >= n)
                .map(|id| (i, id))
        })
    }
}

impl TriangleMesh for IndexedMesh {
    fn from_triangles(triangles: Vec<Triangle>) -> Option<Self> {
        let mut index = VertexIndex::new();
        let facets = triangles
            .iter()
            .map(|t| index.insert_facet(t.p0, t.p1, t.p2))
            .collect::<Option<Vec<_>>>()?;
        Some(Self {
            points: index.into_points(),
            facets,
        })
    }

    fn triangle_count(&self) -> usize {
        self.facets.len()
    }

    fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        self.facets.iter().filter_map(|f| self.facet_points(f))
    }
}
