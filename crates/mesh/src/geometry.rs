pub type Vector3 = cgmath::Vector3<f32>;

/// A location in space. Same representation as [`Vector3`]; the alias only marks the role.
pub type Point3 = Vector3;

// We rely on Vector3 being repr(c).
static_assertions::assert_eq_size!(Vector3, [f32; 3]);
static_assertions::assert_eq_align!(Vector3, f32);

#[derive(Debug, PartialEq, Copy, Clone)]
#[repr(C)]
pub struct Triangle {
    pub p0: Point3,
    pub p1: Point3,
    pub p2: Point3,
}

impl Triangle {
    pub fn normal(&self) -> Vector3 {
        facet_normal(self.p0, self.p1, self.p2)
    }
}

/// Computes the normal of the facet `p0, p1, p2` as `(p2 - p1) x (p0 - p1)`.
///
/// The result is not normalized; its magnitude is twice the facet area. Files written with
/// this convention carry normals whose sign follows the vertex winding, so swapping any two
/// vertices flips the normal.
pub fn facet_normal(p0: Point3, p1: Point3, p2: Point3) -> Vector3 {
    let v12 = p2 - p1;
    let v10 = p0 - p1;
    v12.cross(v10)
}
