/*

    Collision materials palette.

    Bounds carry collision materials which are looked up either
    by their index in the palette or by their type name, e.g.
    "DEFAULT" or "CONCRETE". The palette ships with the built-in
    table below and can be replaced by one loaded from JSON:

    { "Materials": { "Material": [ { "_id": "0", "Name": "DEFAULT" }, ... ] } }

    @date: Oct, 2025
    @author: bartu
*/

use std::{error::Error, fs::File, io::BufReader};

use crate::json_structs::SingleOrVec;
use crate::prelude::*;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CollisionMaterial {
    #[serde(rename = "_id", deserialize_with = "deser_usize")]
    pub index: usize,
    #[serde(rename = "Name")]
    pub name: String,
}

/// Material lookups needed by bound commands
pub trait CollisionMaterials {
    fn material_from_index(&self, index: usize) -> Option<CollisionMaterial>;
    fn material_from_type(&self, name: &str) -> Option<CollisionMaterial>;
}

const BUILTIN_MATERIALS: &[&str] = &[
    "DEFAULT",
    "CONCRETE",
    "CONCRETE_POTHOLE",
    "CONCRETE_DUSTY",
    "TARMAC",
    "TARMAC_PAINTED",
    "TARMAC_POTHOLE",
    "RUMBLE_STRIPS",
    "BREEZE_BLOCK",
    "ROCK",
    "ROCK_MOSSY",
    "STONE",
    "COBBLESTONE",
    "BRICK",
    "MARBLE",
    "PAVING_SLAB",
    "SANDSTONE_SOLID",
    "SANDSTONE_BRITTLE",
    "SAND_LOOSE",
    "SAND_COMPACT",
    "SAND_WET",
    "SAND_TRACK",
    "SAND_UNDERWATER",
    "SAND_DRY_DEEP",
    "SAND_WET_DEEP",
];

#[derive(Debug, Clone)]
pub struct MaterialPalette {
    materials: Vec<CollisionMaterial>,
}

impl Default for MaterialPalette {
    fn default() -> Self {
        let materials = BUILTIN_MATERIALS
            .iter()
            .enumerate()
            .map(|(index, name)| CollisionMaterial { index, name: name.to_string() })
            .collect();
        Self { materials }
    }
}

#[derive(Deserialize)]
struct PaletteJSON {
    #[serde(rename = "Materials")]
    materials: MaterialsJSON,
}

#[derive(Deserialize)]
struct MaterialsJSON {
    #[serde(rename = "Material", default)]
    material: SingleOrVec<CollisionMaterial>,
}

impl MaterialPalette {
    pub fn new(materials: Vec<CollisionMaterial>) -> Self {
        Self { materials }
    }

    pub fn from_json_str(s: &str) -> Result<Self, serde_json::Error> {
        let palette: PaletteJSON = serde_json::from_str(s)?;
        Ok(Self::new(palette.materials.material.as_slice().to_vec()))
    }

    pub fn load_json(path: &str) -> Result<Self, Box<dyn Error>> {
        let span = tracing::span!(tracing::Level::INFO, "load_palette");
        let _enter = span.enter();

        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let palette: PaletteJSON = serde_json::from_reader(reader)?;
        let palette = Self::new(palette.materials.material.as_slice().to_vec());
        debug!("Loaded {} collision materials from {}", palette.len(), path);
        Ok(palette)
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}

impl CollisionMaterials for MaterialPalette {
    fn material_from_index(&self, index: usize) -> Option<CollisionMaterial> {
        self.materials.iter().find(|m| m.index == index).cloned()
    }

    fn material_from_type(&self, name: &str) -> Option<CollisionMaterial> {
        self.materials
            .iter()
            .find(|m| m.name.eq_ignore_ascii_case(name))
            .cloned()
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_lookup() {
        let palette = MaterialPalette::default();
        let default = palette.material_from_type("default").unwrap();
        assert_eq!(default, CollisionMaterial { index: 0, name: "DEFAULT".into() });
        assert_eq!(palette.material_from_index(4).unwrap().name, "TARMAC");
        assert!(palette.material_from_index(palette.len()).is_none());
        assert!(palette.material_from_type("LAVA").is_none());
    }

    #[test]
    fn test_from_json() {
        let palette = MaterialPalette::from_json_str(
            r#"{ "Materials": { "Material": [ {"_id": "3", "Name": "GLASS"}, {"_id": 7, "Name": "WOOD"} ] } }"#,
        ).unwrap();
        assert_eq!(palette.len(), 2);
        assert_eq!(palette.material_from_index(7).unwrap().name, "WOOD");
        assert!(palette.material_from_index(0).is_none());

        let single = MaterialPalette::from_json_str(
            r#"{ "Materials": { "Material": {"_id": "1", "Name": "MUD"} } }"#,
        ).unwrap();
        assert_eq!(single.material_from_type("mud").unwrap().index, 1);
    }
}
