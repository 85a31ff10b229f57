/*

    Mesh data of scene objects and the primitive mesh builder interface.

    Building the actual topology of a box/sphere/capsule/cylinder/disc
    is left to the builder implementation. ParametricMeshBuilder only
    records which primitive was requested with which parameters.

@date: Oct-Nov 2025
@author: Bartu

*/

use crate::materials::CollisionMaterial;
use crate::shapes::{PrimitiveShape, ShapeKind};
use crate::prelude::*;

pub const DEFAULT_RADIUS: Float = 1.0;
pub const DEFAULT_LENGTH: Float = 2.0;
pub const DEFAULT_DISC_LENGTH: Float = 0.08;

/// Primitive a mesh was built from
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PrimitiveMesh {
    Box      { min: Vector3, max: Vector3 },
    Sphere   { radius: Float },
    Capsule  { radius: Float, height: Float },
    Cylinder { radius: Float, height: Float, is_capsule: bool },
    Disc     { radius: Float, length: Float },
}

#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub vertices: Vec<Vector3>,
    /// Per-vertex selection state, same length as vertices
    pub selected: Vec<bool>,
    pub primitive: Option<PrimitiveMesh>,
    pub materials: Vec<CollisionMaterial>,
}

impl MeshData {
    pub fn from_vertices(vertices: Vec<Vector3>) -> Self {
        let selected = vec![false; vertices.len()];
        Self { vertices, selected, ..Default::default() }
    }

    /// Select the given vertex indices, out of range indices are ignored
    pub fn select(&mut self, indices: &[usize]) {
        for &i in indices {
            match self.selected.get_mut(i) {
                Some(s) => *s = true,
                None => warn!("Vertex index {} is out of range ({} vertices)", i, self.vertices.len()),
            }
        }
    }

    pub fn select_all(&mut self) {
        self.selected.iter_mut().for_each(|s| *s = true);
    }

    pub fn deselect_all(&mut self) {
        self.selected.iter_mut().for_each(|s| *s = false);
    }

    pub fn selected_vertices(&self) -> Vec<Vector3> {
        self.vertices
            .iter()
            .zip(self.selected.iter())
            .filter_map(|(v, &s)| if s { Some(*v) } else { None })
            .collect()
    }
}

/// Default parameters of a newly created primitive bound
pub fn default_shape(kind: ShapeKind) -> PrimitiveShape {
    match kind {
        ShapeKind::Box      => PrimitiveShape::Box { min: -Vector3::ONE, max: Vector3::ONE },
        ShapeKind::Sphere   => PrimitiveShape::Sphere { radius: DEFAULT_RADIUS },
        ShapeKind::Capsule  => PrimitiveShape::Capsule { radius: DEFAULT_RADIUS, height: DEFAULT_LENGTH },
        ShapeKind::Cylinder => PrimitiveShape::Cylinder { radius: DEFAULT_RADIUS, height: DEFAULT_LENGTH },
    }
}


/// Creates primitive geometry inside a mesh
pub trait PrimitiveMeshBuilder {
    fn build_box(&mut self, mesh: &mut MeshData, min: Vector3, max: Vector3);
    fn build_sphere(&mut self, mesh: &mut MeshData, radius: Float);
    fn build_capsule(&mut self, mesh: &mut MeshData, radius: Float, height: Float);
    fn build_cylinder(&mut self, mesh: &mut MeshData, radius: Float, height: Float, is_capsule: bool);
    fn build_disc(&mut self, mesh: &mut MeshData, radius: Float, length: Float);

    fn build_shape(&mut self, mesh: &mut MeshData, shape: &PrimitiveShape) {
        match *shape {
            PrimitiveShape::Box { min, max } => self.build_box(mesh, min, max),
            PrimitiveShape::Sphere { radius } => self.build_sphere(mesh, radius),
            PrimitiveShape::Capsule { radius, height } => self.build_capsule(mesh, radius, height),
            PrimitiveShape::Cylinder { radius, height } => self.build_cylinder(mesh, radius, height, false),
        }
    }
}

/// Records the requested primitive on the mesh without generating topology
#[derive(Debug, Clone, Copy, Default)]
pub struct ParametricMeshBuilder;

impl ParametricMeshBuilder {
    fn record(mesh: &mut MeshData, primitive: PrimitiveMesh) {
        debug!("Building {:?}", primitive);
        mesh.primitive = Some(primitive);
    }
}

impl PrimitiveMeshBuilder for ParametricMeshBuilder {
    fn build_box(&mut self, mesh: &mut MeshData, min: Vector3, max: Vector3) {
        Self::record(mesh, PrimitiveMesh::Box { min, max });
    }

    fn build_sphere(&mut self, mesh: &mut MeshData, radius: Float) {
        Self::record(mesh, PrimitiveMesh::Sphere { radius });
    }

    fn build_capsule(&mut self, mesh: &mut MeshData, radius: Float, height: Float) {
        Self::record(mesh, PrimitiveMesh::Capsule { radius, height });
    }

    fn build_cylinder(&mut self, mesh: &mut MeshData, radius: Float, height: Float, is_capsule: bool) {
        Self::record(mesh, PrimitiveMesh::Cylinder { radius, height, is_capsule });
    }

    fn build_disc(&mut self, mesh: &mut MeshData, radius: Float, length: Float) {
        Self::record(mesh, PrimitiveMesh::Disc { radius, length });
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selected_vertices() {
        let mut mesh = MeshData::from_vertices(vec![Vector3::X, Vector3::Y, Vector3::Z]);
        assert!(mesh.selected_vertices().is_empty());
        mesh.select(&[2, 0, 9]);
        assert_eq!(mesh.selected_vertices(), vec![Vector3::X, Vector3::Z]);
        mesh.select_all();
        assert_eq!(mesh.selected_vertices().len(), 3);
        mesh.deselect_all();
        assert!(mesh.selected_vertices().is_empty());
    }

    #[test]
    fn test_fitted_cylinder_is_not_a_capsule() {
        let mut mesh = MeshData::default();
        let mut builder = ParametricMeshBuilder;
        builder.build_shape(&mut mesh, &PrimitiveShape::Cylinder { radius: 0.5, height: 3.0 });
        assert_eq!(mesh.primitive, Some(PrimitiveMesh::Cylinder { radius: 0.5, height: 3.0, is_capsule: false }));
    }

    #[test]
    fn test_default_box() {
        let mut mesh = MeshData::default();
        ParametricMeshBuilder.build_shape(&mut mesh, &default_shape(ShapeKind::Box));
        assert_eq!(mesh.primitive, Some(PrimitiveMesh::Box { min: -Vector3::ONE, max: Vector3::ONE }));
    }
}
