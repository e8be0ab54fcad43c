use std::collections::BTreeMap;

use ordered_float::OrderedFloat;

use crate::{geometry::Point3, indexed_mesh::Facet};

type PointKey = [OrderedFloat<f32>; 3];

#[inline(always)]
fn key(p: &Point3) -> PointKey {
    [OrderedFloat(p.x), OrderedFloat(p.y), OrderedFloat(p.z)]
}

/// Assigns a stable identifier to every distinct point it sees.
///
/// STL files repeat the coordinates of a vertex for every facet that touches it. Feeding each
/// facet vertex through `insert` collapses those repeats into a single entry of `points()`, and
/// the returned identifiers index into that list.
///
/// Points are merged only when they compare equal component by component. There is no
/// tolerance: two coordinates one ULP apart are two different points. Lookups go through an
/// ordered map keyed lexicographically on (x, y, z); that order is only used for lookup, the
/// identifiers themselves follow first-insertion order.
#[derive(Debug, Clone)]
pub struct VertexIndex {
    ids: BTreeMap<PointKey, u32>,
    points: Vec<Point3>,
    limit: usize,
}

/// Largest number of unique points an index hands out identifiers for.
pub const MAX_POINTS: usize = u32::MAX as usize;

impl Default for VertexIndex {
    fn default() -> Self {
        Self::with_limit(MAX_POINTS)
    }
}

impl VertexIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an index with room for `n` unique points.
    pub fn with_capacity(n: usize) -> Self {
        Self {
            points: Vec::with_capacity(n),
            ..Self::default()
        }
    }

    /// Creates an index that refuses new points once it holds `limit` of them. The limit is
    /// clamped to [`MAX_POINTS`].
    pub fn with_limit(limit: usize) -> Self {
        Self {
            ids: BTreeMap::new(),
            points: Vec::new(),
            limit: limit.min(MAX_POINTS),
        }
    }

    /// Returns the identifier of `point`, assigning the next free one if the point is new.
    ///
    /// Returns `None` when `point` is new but the index is full. Points already in the index
    /// keep resolving to their identifier.
    pub fn insert(&mut self, point: Point3) -> Option<u32> {
        let key = key(&point);
        if let Some(&id) = self.ids.get(&key) {
            return Some(id);
        }
        if self.points.len() >= self.limit {
            return None;
        }
        let id = u32::try_from(self.points.len()).ok()?;
        self.ids.insert(key, id);
        self.points.push(point);
        Some(id)
    }

    /// Inserts the three vertices of a facet and returns the facet referring to them.
    pub fn insert_facet(&mut self, p0: Point3, p1: Point3, p2: Point3) -> Option<Facet> {
        Some(Facet::new(self.insert(p0)?, self.insert(p1)?, self.insert(p2)?))
    }

    /// Returns the identifier previously assigned to `point`, if any.
    pub fn get(&self, point: &Point3) -> Option<u32> {
        self.ids.get(&key(point)).copied()
    }

    /// Unique points in identifier order.
    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn into_points(self) -> Vec<Point3> {
        self.points
    }
}
