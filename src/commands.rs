/*

    Bound editing commands.

    Each command works on an injected scene graph, primitive mesh
    builder and collision material palette, validates its input first
    and only then mutates the scene. A rejected command leaves the scene
    untouched and is reported at the level its error asks for.

    @date: Oct, 2025
    @author: bartu
*/

use strum_macros::Display;

use crate::bounds::{BoundFlags, BoundType, PolygonType, SollumType};
use crate::error::{CommandError, CommandResult, ReportLevel};
use crate::fitter::fit_primitive;
use crate::materials::CollisionMaterials;
use crate::mesh::{default_shape, PrimitiveMeshBuilder, DEFAULT_DISC_LENGTH, DEFAULT_RADIUS};
use crate::scene::{ObjectId, ObjectMode, SceneGraph};
use crate::shapes::ShapeKind;
use crate::prelude::*;

/// Material appended to meshes converted to collision
pub const DEFAULT_COLLISION_MATERIAL: &str = "DEFAULT";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum BoundCommand {
    CreateBoundComposite,
    /// Any non-composite bound type, created under the active composite
    CreateBound(BoundType),
    CreatePolygonBound,
    CreateCollisionMaterial,
    LoadDefaultCollisionFlags,
    ClearCollisionFlags,
    MeshToPolygonBound,
    ConvertMeshToCollision,
}

pub struct CommandContext<'a> {
    pub scene: &'a mut dyn SceneGraph,
    pub builder: &'a mut dyn PrimitiveMeshBuilder,
    pub materials: &'a dyn CollisionMaterials,
}

impl<'a> CommandContext<'a> {
    pub fn new(
        scene: &'a mut dyn SceneGraph,
        builder: &'a mut dyn PrimitiveMeshBuilder,
        materials: &'a dyn CollisionMaterials,
    ) -> Self {
        Self { scene, builder, materials }
    }

    /// Run a command and report a rejection through tracing
    pub fn run(&mut self, command: BoundCommand) -> CommandResult<()> {
        let span = tracing::span!(tracing::Level::INFO, "command", name = %command);
        let _enter = span.enter();

        let result = match command {
            BoundCommand::CreateBoundComposite => self.create_bound_composite().map(|_| ()),
            BoundCommand::CreateBound(bound_type) => self.create_bound(bound_type).map(|_| ()),
            BoundCommand::CreatePolygonBound => self.create_polygon_bound().map(|_| ()),
            BoundCommand::CreateCollisionMaterial => self.create_collision_material(),
            BoundCommand::LoadDefaultCollisionFlags => self.load_default_collision_flags(),
            BoundCommand::ClearCollisionFlags => self.clear_collision_flags(),
            BoundCommand::MeshToPolygonBound => self.mesh_to_polygon_bound().map(|_| ()),
            BoundCommand::ConvertMeshToCollision => self.convert_mesh_to_collision().map(|_| ()),
        };

        match &result {
            Ok(()) => debug!("Finished {}", command),
            Err(e) => match e.report_level() {
                ReportLevel::Info => info!("{}", e),
                ReportLevel::Warning => warn!("{}", e),
            },
        }
        result
    }

    fn active_of_type(&self) -> Option<(ObjectId, SollumType)> {
        let id = self.scene.active_object()?;
        self.scene.object(id).map(|o| (id, o.sollum_type))
    }

    fn require_active_composite(&self, requested: SollumType) -> CommandResult<ObjectId> {
        match self.active_of_type() {
            Some((id, t)) if t.is_bound_type(BoundType::Composite) => Ok(id),
            _ => Err(CommandError::ActiveNotComposite { requested }),
        }
    }

    fn require_active_geometry(&self, requested: SollumType) -> CommandResult<ObjectId> {
        match self.active_of_type() {
            Some((id, SollumType::Bound(t))) if t.is_geometry() => Ok(id),
            _ => Err(CommandError::ActiveNotGeometry { requested }),
        }
    }

    /// Build a shape into the mesh of `id`
    fn build_into(&mut self, id: ObjectId, kind: ShapeKind) -> CommandResult<()> {
        let mesh = self.scene
            .object_mut(id)
            .and_then(|o| o.mesh_mut())
            .ok_or(CommandError::NotAMesh)?;
        self.builder.build_shape(mesh, &default_shape(kind));
        Ok(())
    }

    pub fn create_bound_composite(&mut self) -> CommandResult<ObjectId> {
        let id = self.scene.create_empty(BoundType::Composite.into());
        Ok(id)
    }

    /// Create a bound of the given type. Anything but a composite
    /// is created under the active composite and becomes active.
    pub fn create_bound(&mut self, bound_type: BoundType) -> CommandResult<ObjectId> {
        let sollum_type = SollumType::from(bound_type);

        let shape = match bound_type {
            BoundType::Composite => return self.create_bound_composite(),
            BoundType::Geometry | BoundType::GeometryBvh | BoundType::Cloth => None,
            BoundType::Box => Some(ShapeKind::Box),
            BoundType::Sphere => Some(ShapeKind::Sphere),
            BoundType::Capsule => Some(ShapeKind::Capsule),
            BoundType::Cylinder => Some(ShapeKind::Cylinder),
            BoundType::Disc => None,
        };

        let parent = self.require_active_composite(sollum_type)?;

        let id = match (bound_type, shape) {
            (BoundType::Disc, _) => {
                let id = self.scene.create_mesh(sollum_type);
                if let Some(mesh) = self.scene.object_mut(id).and_then(|o| o.mesh_mut()) {
                    self.builder.build_disc(mesh, DEFAULT_RADIUS, DEFAULT_DISC_LENGTH);
                }
                id
            }
            (_, Some(kind)) => {
                let id = self.scene.create_mesh(sollum_type);
                self.build_into(id, kind)?;
                id
            }
            (_, None) => self.scene.create_empty(sollum_type),
        };

        self.scene.set_parent(id, Some(parent))?;
        self.scene.set_active_object(Some(id));
        Ok(id)
    }

    /// Create a polygon of the configured type under the active
    /// geometry bound. The geometry bound stays active.
    pub fn create_polygon_bound(&mut self) -> CommandResult<ObjectId> {
        let poly_type = self.scene.settings().poly_bound_type;
        let parent = self.require_active_geometry(poly_type.into())?;

        let id = self.scene.create_mesh(poly_type.into());
        let kind = match poly_type {
            PolygonType::Box => Some(ShapeKind::Box),
            PolygonType::Sphere => Some(ShapeKind::Sphere),
            PolygonType::Capsule => Some(ShapeKind::Capsule),
            PolygonType::Cylinder => Some(ShapeKind::Cylinder),
            PolygonType::Triangle => None,
        };
        if let Some(kind) = kind {
            self.build_into(id, kind)?;
        }

        self.scene.set_parent(id, Some(parent))?;
        Ok(id)
    }

    /// Append the material at the configured palette index to the
    /// active polygon. Other object types are left alone.
    pub fn create_collision_material(&mut self) -> CommandResult<()> {
        let (id, sollum_type) = self.active_of_type().ok_or(CommandError::NoActiveObject)?;
        if !sollum_type.is_polygon() {
            debug!("Active object is a {}, not a polygon. Nothing to do.", sollum_type);
            return Ok(());
        }

        let index = self.scene.settings().collision_material_index;
        let material = self.materials
            .material_from_index(index)
            .ok_or_else(|| CommandError::UnknownMaterial(format!("index {}", index)))?;

        let mesh = self.scene
            .object_mut(id)
            .and_then(|o| o.mesh_mut())
            .ok_or(CommandError::NotAMesh)?;
        debug!("Appending collision material {}", material.name);
        mesh.materials.push(material);
        Ok(())
    }

    pub fn load_default_collision_flags(&mut self) -> CommandResult<()> {
        let id = self.scene.active_object().ok_or(CommandError::NoActiveObject)?;
        let object = self.scene.object_mut(id).ok_or(CommandError::NoActiveObject)?;
        object.composite_flags1 |= BoundFlags::MAP_DEFAULTS;
        object.composite_flags2 = BoundFlags::all();
        Ok(())
    }

    pub fn clear_collision_flags(&mut self) -> CommandResult<()> {
        let id = self.scene.active_object().ok_or(CommandError::NoActiveObject)?;
        let object = self.scene.object_mut(id).ok_or(CommandError::NoActiveObject)?;
        if object.sollum_type.is_bound() {
            object.composite_flags1 = BoundFlags::empty();
            object.composite_flags2 = BoundFlags::empty();
        }
        Ok(())
    }

    /// Fit a polygon to the selected vertices of the active mesh and
    /// place it under the configured geometry bound.
    pub fn mesh_to_polygon_bound(&mut self) -> CommandResult<ObjectId> {
        let source_id = self.scene.active_object().ok_or(CommandError::NotAMesh)?;
        let source = self.scene.object(source_id).ok_or(CommandError::NotAMesh)?;
        if !source.is_mesh() {
            return Err(CommandError::NotAMesh);
        }
        if source.mode != ObjectMode::Edit {
            return Err(CommandError::NotInEditMode);
        }
        let source_rotation = source.transform.rotation;

        let settings = self.scene.settings();
        let kind = settings.convert_poly_bound_type;
        let parent_id = settings.convert_poly_parent.ok_or(CommandError::MissingParent)?;
        let parent = self.scene.object(parent_id).ok_or(CommandError::MissingParent)?;
        match parent.sollum_type {
            SollumType::Bound(t) if t.is_geometry() => {}
            _ => return Err(CommandError::InvalidParent),
        }

        let points = self.scene.selected_vertices(source_id).unwrap_or_default();
        if points.is_empty() {
            return Err(CommandError::NoVerticesSelected);
        }

        let world = self.scene.world_matrix(source_id).ok_or(CommandError::MissingObject)?;
        let scale = self.scene.world_scale(source_id).ok_or(CommandError::MissingObject)?;
        let fitted = fit_primitive(&points, &world, scale, kind)?;

        let poly_type = PolygonType::from(fitted.shape.kind());
        let id = self.scene.create_mesh(poly_type.into());
        let object = self.scene.object_mut(id).ok_or(CommandError::MissingObject)?;
        object.transform.translation = fitted.center;
        object.transform.rotation = source_rotation;
        let mesh = object.mesh_mut().ok_or(CommandError::NotAMesh)?;
        self.builder.build_shape(mesh, &fitted.shape);

        self.scene.set_parent(id, Some(parent_id))?;
        info!("Converted {} selected vertices to a {}", points.len(), poly_type);
        Ok(id)
    }

    /// Turn every selected mesh into a triangle polygon under a new
    /// composite > geometry BVH hierarchy. Returns the new composites.
    pub fn convert_mesh_to_collision(&mut self) -> CommandResult<Vec<ObjectId>> {
        let selected = self.scene.selected_objects();
        for &id in &selected {
            let object = self.scene.object(id).ok_or(CommandError::MissingObject)?;
            if !object.is_mesh() {
                return Err(CommandError::NotAMesh);
            }
        }
        let material = self.materials
            .material_from_type(DEFAULT_COLLISION_MATERIAL)
            .ok_or_else(|| CommandError::UnknownMaterial(DEFAULT_COLLISION_MATERIAL.to_string()))?;

        let mut composites = Vec::with_capacity(selected.len());
        for id in selected {
            if let Some(mesh) = self.scene.object_mut(id).and_then(|o| o.mesh_mut()) {
                mesh.materials.push(material.clone());
            }

            let composite = self.create_bound_composite()?;
            let geometry = self.create_bound(BoundType::GeometryBvh)?;
            self.scene.set_parent(id, Some(geometry))?;
            if let Some(object) = self.scene.object_mut(id) {
                object.sollum_type = PolygonType::Triangle.into();
            }
            composites.push(composite);
        }
        Ok(composites)
    }
}
