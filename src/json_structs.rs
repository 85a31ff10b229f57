/*

    Declare data structs needed to parse fit request JSON files.

    - DataField: vertex data given inline or through a PLY file
    - SingleOrVec
    - VertexData: Type alias of DataField<Vector3>
    - Transformations: library of translations, scalings, rotations
      and composite matrices referenced by id, e.g. "t1 r2 s1"
    - FitRequest: what the boundfit binary is asked to do

    @date: 13 Oct, 2025
    @author: Bartu
*/

use serde::{Deserialize, de::{Deserializer}};
use std::{error::Error, fs::File, io::BufReader, ops::Index, path::Path, str::FromStr};

use crate::json_parser::{deser_float_vec, deser_opt_usize_vec, deser_string_or_struct, deser_usize, deser_vertex_data, parse_string_vecvec3, parse_transform_expression};
use crate::shapes::ShapeKind;
use crate::transform::axis_angle_degrees;
use crate::prelude::*;

#[derive(Debug, Clone, Default)]
pub struct DataField<T> {
    pub(crate) _data: Vec<T>,
    pub(crate) _type: String,
    pub(crate) _ply_file: String,
}

impl<T> Index<usize> for DataField<T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        &self._data[index]
    }
}

impl<T> DataField<T> {
    pub fn len(&self) -> usize {
        self._data.len()
    }

    pub fn is_empty(&self) -> bool {
        self._data.is_empty()
    }
}

impl<'de> Deserialize<'de> for DataField<Vector3> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Helper {
            #[serde(rename = "_data", default, deserialize_with = "deser_vertex_data")]
            _data: Vec<Vector3>,
            #[serde(rename = "_type", default)]
            _type: String,
            #[serde(rename = "_plyFile", default)]
            _ply_file: String,
        }

        let helper = Helper::deserialize(deserializer)?;
        Ok(DataField {
            _data: helper._data,
            _type: if helper._type.is_empty() { String::from("xyz") } else { helper._type },
            _ply_file: helper._ply_file,
        })
    }
}


// To handle JSON file having a single <object>
// or an array of <object>s
#[derive(Debug, Deserialize, Clone)]
#[serde(untagged)]
pub enum SingleOrVec<T> {
    Empty,
    Single(T),
    Multiple(Vec<T>),
}

impl<T> SingleOrVec<T> {
    pub fn as_slice(&self) -> &[T] {
        match self {
            SingleOrVec::Empty => &[],
            SingleOrVec::Single(t) => std::slice::from_ref(t),
            SingleOrVec::Multiple(vec) => vec.as_slice(),
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.as_slice().iter()
    }
}

impl<T> Default for SingleOrVec<T> {
    fn default() -> Self {
        SingleOrVec::Empty
    }
}


#[derive(Deserialize)]
pub struct Vertex {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

#[derive(Deserialize)]
pub struct PlyMesh {
    pub vertex: Vec<Vertex>,
}


pub type VertexData = DataField<Vector3>;

impl FromStr for VertexData {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let data = parse_string_vecvec3(s)
            .map_err(|e| format!("Failed to parse vertex data string: {e}"))?;
        Ok(DataField::<Vector3>{
            _data: data,
            _type: String::from("xyz"),
            _ply_file: String::from(""),
        })
    }
}


impl VertexData {

    /// If given vertex data has a component order other than xyz
    /// (specifically a permutation of xyz), reorder every vertex to
    /// xyz. Returns false if no change is applied.
    pub fn normalize_to_xyz(&mut self) -> bool {
        if self._type == "xyz" || self._type.is_empty() {
            return false; // already as expected
        }

        let layout = self._type.clone();
        for v in self._data.iter_mut() {
            let (a, b, c) = (v.x, v.y, v.z);
            *v = match layout.as_str() {
                "xzy" => Vector3::new(a, c, b),
                "yxz" => Vector3::new(b, a, c),
                "yzx" => Vector3::new(c, a, b),
                "zxy" => Vector3::new(b, c, a),
                "zyx" => Vector3::new(c, b, a),
                other => {
                    warn!("Unknown vertex data type '{other}', assuming xyz");
                    break;
                }
            };
        }

        self._type = "xyz".to_string();
        true
    }

    /// Append the vertices of the PLY file referenced by `_plyFile`,
    /// resolved relative to `json_dir`. Returns the number of vertices read.
    pub fn append_ply(&mut self, json_dir: &Path) -> Result<usize, Box<dyn Error>> {
        if self._ply_file.is_empty() {
            return Ok(0);
        }

        let ply_path = json_dir.join(&self._ply_file);
        if !ply_path.exists() {
            error!("PLY file NOT found at: {:?}", ply_path);
        }
        debug!("Loading vertex data from PLY file path: {:?}", ply_path);

        let file = File::open(ply_path)?;
        let reader = BufReader::new(file);
        let plymesh: PlyMesh = serde_ply::from_reader(reader)?;

        for vert in &plymesh.vertex {
            self._data.push(Vector3::new(vert.x as Float, vert.y as Float, vert.z as Float));
        }
        Ok(plymesh.vertex.len())
    }
}


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformKind {
    Translation,
    Scaling,
    Rotation,
    Composite,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct TransformField {
    #[serde(rename = "_id", deserialize_with = "deser_usize")]
    pub _id: usize,
    #[serde(rename = "_data", deserialize_with = "deser_float_vec")]
    pub _data: Vec<Float>,
}

impl TransformField {
    pub fn get_mat4(&self, kind: TransformKind) -> Matrix4 {
        let expected = match kind {
            TransformKind::Translation | TransformKind::Scaling => 3,
            TransformKind::Rotation => 4,
            TransformKind::Composite => 16,
        };
        if self._data.len() != expected {
            warn!("{:?} {} expects {} values, found {}. Using identity.", kind, self._id, expected, self._data.len());
            return Matrix4::IDENTITY;
        }

        let d = &self._data;
        match kind {
            TransformKind::Translation => Matrix4::from_translation(Vector3::new(d[0], d[1], d[2])),
            TransformKind::Scaling => Matrix4::from_scale(Vector3::new(d[0], d[1], d[2])),
            // Angle in degrees followed by the axis
            TransformKind::Rotation => Matrix4::from_quat(axis_angle_degrees(Vector3::new(d[1], d[2], d[3]), d[0])),
            // Given row-major
            TransformKind::Composite => {
                let mut cols = [0.0; 16];
                cols.copy_from_slice(d);
                Matrix4::from_cols_array(&cols).transpose()
            }
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Transformations {
    #[serde(rename = "Translation")]
    pub translations: SingleOrVec<TransformField>,
    #[serde(rename = "Scaling")]
    pub scalings: SingleOrVec<TransformField>,
    #[serde(rename = "Rotation")]
    pub rotations: SingleOrVec<TransformField>,
    #[serde(rename = "Composite")]
    pub composites: SingleOrVec<TransformField>,
}

impl Transformations {
    fn find(fields: &SingleOrVec<TransformField>, id: usize) -> Option<&TransformField> {
        fields.iter().find(|f| f._id == id)
    }

    pub fn find_translation(&self, id: usize) -> Option<&TransformField> {
        Self::find(&self.translations, id)
    }

    pub fn find_scaling(&self, id: usize) -> Option<&TransformField> {
        Self::find(&self.scalings, id)
    }

    pub fn find_rotation(&self, id: usize) -> Option<&TransformField> {
        Self::find(&self.rotations, id)
    }

    pub fn find_composite(&self, id: usize) -> Option<&TransformField> {
        Self::find(&self.composites, id)
    }
}


#[derive(Debug, Deserialize)]
pub struct RootRequest {
    #[serde(rename = "FitRequest")]
    pub request: FitRequest,
}

#[derive(Debug, Deserialize, SmartDefault)]
#[serde(rename_all = "PascalCase")]
#[serde(default)]
pub struct FitRequest {
    #[default(ShapeKind::Box)]
    pub shape_kind: ShapeKind,

    #[serde(deserialize_with = "deser_string_or_struct")]
    pub vertex_data: VertexData,

    /// 0-based indices of the selected vertices, None selects all
    #[serde(deserialize_with = "deser_opt_usize_vec")]
    pub selected_indices: Option<Vec<usize>>,

    pub transformations: Transformations,

    /// Transformation expression such as "t1 r1 s2", None for identity
    pub transform: Option<String>,
}

impl FitRequest {
    /// Adjustments after loading from a JSON file
    pub fn setup(&mut self, json_path: &Path) -> Result<(), Box<dyn Error>> {
        let previous_type = self.vertex_data._type.clone();
        if self.vertex_data.normalize_to_xyz() {
            warn!("VertexData _type is changed from '{}' to '{}'", previous_type, self.vertex_data._type);
        }

        let json_dir = json_path.parent().ok_or("JSON path has no parent directory")?;
        let n_ply = self.vertex_data.append_ply(json_dir)?;
        if n_ply > 0 {
            info!("Appended {} vertices from {}", n_ply, self.vertex_data._ply_file);
        }
        if self.vertex_data.is_empty() {
            warn!("Request has no vertex data");
        }
        Ok(())
    }

    /// Vertices the primitive is fitted to
    pub fn points(&self) -> Result<Vec<Vector3>, String> {
        let verts = &self.vertex_data;
        match &self.selected_indices {
            None => Ok(verts._data.clone()),
            Some(indices) => indices
                .iter()
                .map(|&i| {
                    if i < verts.len() {
                        Ok(verts[i])
                    } else {
                        Err(format!("Selected vertex index {} is out of range ({} vertices)", i, verts.len()))
                    }
                })
                .collect(),
        }
    }

    pub fn world_matrix(&self) -> Matrix4 {
        match self.transform.as_deref() {
            Some(expr) => parse_transform_expression(expr, &self.transformations),
            None => {
                debug!("Transform is not given, defaulting to Identity.");
                Matrix4::IDENTITY
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::approx_eq_vec;

    #[test]
    fn test_normalize_to_xyz() {
        let mut data: VertexData = DataField {
            _data: vec![Vector3::new(1., 2., 3.)],
            _type: String::from("zxy"),
            _ply_file: String::new(),
        };
        assert!(data.normalize_to_xyz());
        // Stored as (z, x, y) = (1, 2, 3)
        assert_eq!(data[0], Vector3::new(2., 3., 1.));
        assert!(!data.normalize_to_xyz());
    }

    #[test]
    fn test_rotation_field() {
        let field = TransformField { _id: 1, _data: vec![90., 0., 0., 1.] };
        let mat = field.get_mat4(TransformKind::Rotation);
        let p = crate::numeric::transform_point(&mat, &Vector3::X);
        assert!(approx_eq_vec(&p, &Vector3::Y));
    }

    #[test]
    fn test_bad_field_length_is_identity() {
        let field = TransformField { _id: 3, _data: vec![1., 2.] };
        assert_eq!(field.get_mat4(TransformKind::Translation), Matrix4::IDENTITY);
    }

    #[test]
    fn test_composite_is_row_major() {
        let field = TransformField {
            _id: 1,
            _data: vec![
                1., 0., 0., 5.,
                0., 1., 0., 6.,
                0., 0., 1., 7.,
                0., 0., 0., 1.,
            ],
        };
        let mat = field.get_mat4(TransformKind::Composite);
        let p = crate::numeric::transform_point(&mat, &Vector3::ZERO);
        assert_eq!(p, Vector3::new(5., 6., 7.));
    }

    #[test]
    fn test_selected_points() {
        let request = FitRequest {
            vertex_data: "0 0 0 1 1 1 2 2 2".parse().unwrap(),
            selected_indices: Some(vec![2, 0]),
            ..Default::default()
        };
        assert_eq!(request.points().unwrap(), vec![Vector3::splat(2.), Vector3::ZERO]);

        let request = FitRequest { selected_indices: Some(vec![3]), ..request };
        assert!(request.points().is_err());
    }
}
