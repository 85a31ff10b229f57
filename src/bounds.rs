/*

    Declare the kinds of collision objects a scene can hold:
        - BoundType: composite containers and primitive bounds
        - PolygonType: polygons living under a geometry bound
        - BoundFlags: collision type/include flags of a bound

    @date: Oct, 2025
    @author: bartu
*/

use std::fmt;
use strum_macros::{Display, EnumIter};

use crate::shapes::ShapeKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum BoundType {
    #[strum(to_string = "Bound Composite")]
    Composite,
    #[strum(to_string = "Geometry Bound")]
    Geometry,
    #[strum(to_string = "Geometry Bound BVH")]
    GeometryBvh,
    #[strum(to_string = "Bound Box")]
    Box,
    #[strum(to_string = "Bound Sphere")]
    Sphere,
    #[strum(to_string = "Bound Capsule")]
    Capsule,
    #[strum(to_string = "Bound Cylinder")]
    Cylinder,
    #[strum(to_string = "Bound Disc")]
    Disc,
    #[strum(to_string = "Bound Cloth")]
    Cloth,
}

impl BoundType {
    /// Geometry bounds are the only valid parents of polygons
    pub fn is_geometry(&self) -> bool {
        matches!(self, BoundType::Geometry | BoundType::GeometryBvh)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum PolygonType {
    #[strum(to_string = "Poly Box")]
    Box,
    #[strum(to_string = "Poly Sphere")]
    Sphere,
    #[strum(to_string = "Poly Capsule")]
    Capsule,
    #[strum(to_string = "Poly Cylinder")]
    Cylinder,
    #[strum(to_string = "Poly Triangle")]
    Triangle,
}

impl From<ShapeKind> for PolygonType {
    fn from(kind: ShapeKind) -> Self {
        match kind {
            ShapeKind::Box => PolygonType::Box,
            ShapeKind::Sphere => PolygonType::Sphere,
            ShapeKind::Capsule => PolygonType::Capsule,
            ShapeKind::Cylinder => PolygonType::Cylinder,
        }
    }
}

/// Type tag carried by every scene object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SollumType {
    #[default]
    None,
    Bound(BoundType),
    Polygon(PolygonType),
}

impl fmt::Display for SollumType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SollumType::None => f.write_str("None"),
            SollumType::Bound(t) => fmt::Display::fmt(t, f),
            SollumType::Polygon(t) => fmt::Display::fmt(t, f),
        }
    }
}

impl SollumType {
    pub fn is_bound(&self) -> bool {
        matches!(self, SollumType::Bound(_))
    }

    pub fn is_polygon(&self) -> bool {
        matches!(self, SollumType::Polygon(_))
    }

    pub fn is_bound_type(&self, bound_type: BoundType) -> bool {
        *self == SollumType::Bound(bound_type)
    }
}

impl From<BoundType> for SollumType {
    fn from(t: BoundType) -> Self {
        SollumType::Bound(t)
    }
}

impl From<PolygonType> for SollumType {
    fn from(t: PolygonType) -> Self {
        SollumType::Polygon(t)
    }
}


bitflags::bitflags! {
    /// Collision type and include flags of a bound
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct BoundFlags: u32 {
        const UNKNOWN            = 1 << 0;
        const MAP_WEAPON         = 1 << 1;
        const MAP_DYNAMIC        = 1 << 2;
        const MAP_ANIMAL         = 1 << 3;
        const MAP_COVER          = 1 << 4;
        const MAP_VEHICLE        = 1 << 5;
        const VEHICLE_NOT_BVH    = 1 << 6;
        const VEHICLE_BVH        = 1 << 7;
        const PED                = 1 << 8;
        const RAGDOLL            = 1 << 9;
        const ANIMAL             = 1 << 10;
        const ANIMAL_RAGDOLL     = 1 << 11;
        const OBJECT             = 1 << 12;
        const OBJECT_ENV_CLOTH   = 1 << 13;
        const PLANT              = 1 << 14;
        const PROJECTILE         = 1 << 15;
        const EXPLOSION          = 1 << 16;
        const PICKUP             = 1 << 17;
        const FOLIAGE            = 1 << 18;
        const FORKLIFT_FORKS     = 1 << 19;
        const TEST_WEAPON        = 1 << 20;
        const TEST_CAMERA        = 1 << 21;
        const TEST_AI            = 1 << 22;
        const TEST_SCRIPT        = 1 << 23;
        const TEST_VEHICLE_WHEEL = 1 << 24;
        const GLASS              = 1 << 25;
        const MAP_RIVER          = 1 << 26;
        const SMOKE              = 1 << 27;
        const UNSMASHED          = 1 << 28;
        const MAP_STAIRS         = 1 << 29;
        const MAP_DEEP_SURFACE   = 1 << 30;
    }
}

impl BoundFlags {
    /// Commonly used collision type flags for map geometry
    pub const MAP_DEFAULTS: Self = Self::MAP_WEAPON
        .union(Self::MAP_DYNAMIC)
        .union(Self::MAP_ANIMAL)
        .union(Self::MAP_VEHICLE)
        .union(Self::MAP_COVER);
}


#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_display_names() {
        assert_eq!(SollumType::Bound(BoundType::GeometryBvh).to_string(), "Geometry Bound BVH");
        assert_eq!(SollumType::Polygon(PolygonType::Box).to_string(), "Poly Box");
        assert_eq!(SollumType::None.to_string(), "None");
    }

    #[test]
    fn test_geometry_bounds() {
        let geometry: Vec<BoundType> = BoundType::iter().filter(|t| t.is_geometry()).collect();
        assert_eq!(geometry, vec![BoundType::Geometry, BoundType::GeometryBvh]);
    }

    #[test]
    fn test_flag_set() {
        assert_eq!(BoundFlags::all().iter().count(), 31);
        assert!(BoundFlags::MAP_DEFAULTS.contains(BoundFlags::MAP_COVER));
        assert!(!BoundFlags::MAP_DEFAULTS.contains(BoundFlags::PED));
    }

    #[test]
    fn test_shape_kind_maps_to_polygon() {
        for kind in ShapeKind::iter() {
            assert_ne!(PolygonType::from(kind), PolygonType::Triangle);
        }
    }
}
