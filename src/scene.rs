/*

    Declare the scene graph that bound commands operate on.

    SceneGraph is the interface commands are written against: object
    creation, parenting, active object and selection tracking, and
    world transforms. Scene is an in-memory implementation of it.

    @date: 2 Oct, 2025
    @author: Bartu
*/

use slotmap::{new_key_type, SlotMap};

use crate::bounds::{BoundFlags, PolygonType, SollumType};
use crate::error::{CommandError, CommandResult};
use crate::mesh::MeshData;
use crate::shapes::ShapeKind;
use crate::transform::{world_scale, Transform};
use crate::prelude::*;

new_key_type! {
    /// Handle of an object living in a scene
    pub struct ObjectId;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ObjectMode {
    #[default]
    Object,
    Edit,
}

#[derive(Debug, Clone)]
pub enum ObjectData {
    /// Transform-only object, e.g. composite and geometry containers
    Empty,
    Mesh(MeshData),
}

#[derive(Debug, Clone)]
pub struct SceneObject {
    pub name: String,
    pub sollum_type: SollumType,
    pub data: ObjectData,
    pub parent: Option<ObjectId>,
    pub transform: Transform,
    pub mode: ObjectMode,
    pub composite_flags1: BoundFlags,
    pub composite_flags2: BoundFlags,
}

impl SceneObject {
    pub fn new_empty(name: &str, sollum_type: SollumType) -> Self {
        Self {
            name: name.to_string(),
            sollum_type,
            data: ObjectData::Empty,
            parent: None,
            transform: Transform::IDENTITY,
            mode: ObjectMode::Object,
            composite_flags1: BoundFlags::empty(),
            composite_flags2: BoundFlags::empty(),
        }
    }

    pub fn new_mesh(name: &str, sollum_type: SollumType, mesh: MeshData) -> Self {
        Self {
            data: ObjectData::Mesh(mesh),
            ..Self::new_empty(name, sollum_type)
        }
    }

    pub fn mesh(&self) -> Option<&MeshData> {
        match &self.data {
            ObjectData::Mesh(mesh) => Some(mesh),
            ObjectData::Empty => None,
        }
    }

    pub fn mesh_mut(&mut self) -> Option<&mut MeshData> {
        match &mut self.data {
            ObjectData::Mesh(mesh) => Some(mesh),
            ObjectData::Empty => None,
        }
    }

    pub fn is_mesh(&self) -> bool {
        self.mesh().is_some()
    }
}

/// User-facing options the bound commands read
#[derive(Debug, Clone, SmartDefault)]
pub struct ToolSettings {
    /// Polygon type created under a geometry bound
    #[default(PolygonType::Box)]
    pub poly_bound_type: PolygonType,
    /// Shape a vertex selection is converted to
    #[default(ShapeKind::Box)]
    pub convert_poly_bound_type: ShapeKind,
    /// Geometry bound receiving converted polygons
    pub convert_poly_parent: Option<ObjectId>,
    pub collision_material_index: usize,
}


pub trait SceneGraph {
    /// Link a new object into the scene. Its name is made unique.
    fn add_object(&mut self, object: SceneObject) -> ObjectId;
    fn object(&self, id: ObjectId) -> Option<&SceneObject>;
    fn object_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject>;
    fn set_parent(&mut self, child: ObjectId, parent: Option<ObjectId>) -> CommandResult<()>;

    fn active_object(&self) -> Option<ObjectId>;
    fn set_active_object(&mut self, id: Option<ObjectId>);
    fn selected_objects(&self) -> Vec<ObjectId>;

    fn settings(&self) -> &ToolSettings;

    /// Create a transform-only object and make it active
    fn create_empty(&mut self, sollum_type: SollumType) -> ObjectId {
        let id = self.add_object(SceneObject::new_empty(&sollum_type.to_string(), sollum_type));
        self.set_active_object(Some(id));
        id
    }

    /// Create an object with empty mesh data, the active object is unchanged
    fn create_mesh(&mut self, sollum_type: SollumType) -> ObjectId {
        self.add_object(SceneObject::new_mesh(&sollum_type.to_string(), sollum_type, MeshData::default()))
    }

    fn world_matrix(&self, id: ObjectId) -> Option<Matrix4> {
        let mut object = self.object(id)?;
        let mut mat = object.transform.to_matrix();
        while let Some(parent_id) = object.parent {
            object = self.object(parent_id)?;
            mat = object.transform.to_matrix() * mat;
        }
        Some(mat)
    }

    fn world_scale(&self, id: ObjectId) -> Option<Vector3> {
        self.world_matrix(id).map(|mat| world_scale(&mat))
    }

    /// Local positions of the selected vertices of a mesh object
    fn selected_vertices(&self, id: ObjectId) -> Option<Vec<Vector3>> {
        self.object(id)?.mesh().map(|mesh| mesh.selected_vertices())
    }

    fn children(&self, id: ObjectId) -> Vec<ObjectId>;
}


#[derive(Debug, Default)]
pub struct Scene {
    objects: SlotMap<ObjectId, SceneObject>,
    active: Option<ObjectId>,
    selection: Vec<ObjectId>,
    pub settings: ToolSettings,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn select(&mut self, id: ObjectId) {
        if self.objects.contains_key(id) && !self.selection.contains(&id) {
            self.selection.push(id);
        }
    }

    pub fn deselect_all(&mut self) {
        self.selection.clear();
    }

    pub fn set_mode(&mut self, id: ObjectId, mode: ObjectMode) -> CommandResult<()> {
        let object = self.objects.get_mut(id).ok_or(CommandError::MissingObject)?;
        object.mode = mode;
        Ok(())
    }

    fn unique_name(&self, base: &str) -> String {
        let taken = |name: &str| self.objects.values().any(|o| o.name == name);
        if !taken(base) {
            return base.to_string();
        }
        (1..)
            .map(|i| format!("{}.{:03}", base, i))
            .find(|name| !taken(name))
            .unwrap_or_else(|| base.to_string())
    }

    fn is_ancestor(&self, ancestor: ObjectId, of: ObjectId) -> bool {
        let mut current = Some(of);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.objects.get(id).and_then(|o| o.parent);
        }
        false
    }
}

impl SceneGraph for Scene {
    fn add_object(&mut self, mut object: SceneObject) -> ObjectId {
        object.name = self.unique_name(&object.name);
        debug!("Linking object '{}' ({})", object.name, object.sollum_type);
        self.objects.insert(object)
    }

    fn object(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.get(id)
    }

    fn object_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        self.objects.get_mut(id)
    }

    fn set_parent(&mut self, child: ObjectId, parent: Option<ObjectId>) -> CommandResult<()> {
        if !self.objects.contains_key(child) {
            return Err(CommandError::MissingObject);
        }
        if let Some(parent_id) = parent {
            if !self.objects.contains_key(parent_id) {
                return Err(CommandError::MissingObject);
            }
            if self.is_ancestor(child, parent_id) {
                return Err(CommandError::ParentCycle);
            }
        }
        if let Some(object) = self.objects.get_mut(child) {
            object.parent = parent;
        }
        Ok(())
    }

    fn active_object(&self) -> Option<ObjectId> {
        self.active.filter(|id| self.objects.contains_key(*id))
    }

    fn set_active_object(&mut self, id: Option<ObjectId>) {
        self.active = id;
    }

    fn selected_objects(&self) -> Vec<ObjectId> {
        self.selection
            .iter()
            .copied()
            .filter(|id| self.objects.contains_key(*id))
            .collect()
    }

    fn settings(&self) -> &ToolSettings {
        &self.settings
    }

    fn children(&self, id: ObjectId) -> Vec<ObjectId> {
        self.objects
            .iter()
            .filter(|(_, o)| o.parent == Some(id))
            .map(|(child, _)| child)
            .collect()
    }
}
