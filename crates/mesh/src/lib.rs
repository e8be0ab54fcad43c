mod geometry;
mod indexed_mesh;
mod vertex_index;

pub use geometry::*;
pub use indexed_mesh::*;
pub use vertex_index::*;

pub trait TriangleMesh: Sized {
    /// Creates a TriangleMesh from a list of triangles.
    ///
    /// # Arguments
    ///
    /// * `triangles` - A vector of the triangles of the mesh.
    ///
    /// Returns `None` if the mesh cannot assign an identifier to every distinct point.
    fn from_triangles(triangles: Vec<Triangle>) -> Option<Self>;

    /// Returns the number of triangles that comprises this mesh.
    fn triangle_count(&self) -> usize;

    /// Iterates over the triangles of the mesh with their coordinates resolved.
    fn triangles(&self) -> impl Iterator<Item = Triangle> + '_;
}
