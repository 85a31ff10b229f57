/*

    Declare primitive collision shapes: Box, Sphere, Capsule, Cylinder

    Conventions in a shape's own frame:
        - Box is given by its min/max corners around its center
        - Cylinder and capsule axes are the local Y axis
        - Capsule height is the distance between the two cap centers,
          so its total extent along Y is height + 2 * radius

    @date: Oct, 2025
    @author: bartu
*/

use strum_macros::{Display, EnumIter};

use crate::prelude::*;


/// Shapes a vertex selection can be fitted to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Deserialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ShapeKind {
    Box,
    Sphere,
    Capsule,
    Cylinder,
}

/// Parameters of a fitted or default primitive
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PrimitiveShape {
    Box      { min: Vector3, max: Vector3 },
    Sphere   { radius: Float },
    Capsule  { radius: Float, height: Float },
    Cylinder { radius: Float, height: Float },
}

impl PrimitiveShape {
    pub fn kind(&self) -> ShapeKind {
        match self {
            PrimitiveShape::Box      { .. } => ShapeKind::Box,
            PrimitiveShape::Sphere   { .. } => ShapeKind::Sphere,
            PrimitiveShape::Capsule  { .. } => ShapeKind::Capsule,
            PrimitiveShape::Cylinder { .. } => ShapeKind::Cylinder,
        }
    }

    pub fn radius(&self) -> Option<Float> {
        match self {
            PrimitiveShape::Box { .. } => None,
            PrimitiveShape::Sphere   { radius }
            | PrimitiveShape::Capsule  { radius, .. }
            | PrimitiveShape::Cylinder { radius, .. } => Some(*radius),
        }
    }

    pub fn height(&self) -> Option<Float> {
        match self {
            PrimitiveShape::Capsule  { height, .. }
            | PrimitiveShape::Cylinder { height, .. } => Some(*height),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_kind_roundtrip() {
        let shapes = [
            PrimitiveShape::Box { min: -Vector3::ONE, max: Vector3::ONE },
            PrimitiveShape::Sphere { radius: 1.0 },
            PrimitiveShape::Capsule { radius: 0.5, height: 2.0 },
            PrimitiveShape::Cylinder { radius: 0.5, height: 2.0 },
        ];
        let kinds: Vec<ShapeKind> = shapes.iter().map(|s| s.kind()).collect();
        assert_eq!(kinds, ShapeKind::iter().collect::<Vec<_>>());
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(ShapeKind::Cylinder.to_string(), "cylinder");
        let kind: ShapeKind = serde_json::from_str("\"capsule\"").unwrap();
        assert_eq!(kind, ShapeKind::Capsule);
    }
}
