/*

    Axis Aligned Bounding Box built from per-axis intervals.

    A BBox of a vertex selection is what the fitter starts from:
    its min and max corners are the bbmin_local / bbmax_local of
    the selection.

    @author: bartu
    @date: 9 Nov, 2025
*/


use crate::prelude::*;
use crate::interval::Interval;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BBox {
    pub xmin: Float,
    pub xmax: Float,
    pub ymin: Float,
    pub ymax: Float,
    pub zmin: Float,
    pub zmax: Float,

    pub width: Float,
    pub height: Float,
    pub depth: Float,
}

impl BBox {
    pub fn new_from(xint: &Interval, yint: &Interval, zint: &Interval) -> Self {

        debug_assert!(xint.validate() && yint.validate() && zint.validate(), "Invalid interval, found max < min");
        Self {
            xmin: xint.min,
            xmax: xint.max,
            ymin: yint.min,
            ymax: yint.max,
            zmin: zint.min,
            zmax: zint.max,
            width: xint.size(),
            height: yint.size(),
            depth: zint.size(),
        }
    }

    /// Tightest box around the given points, None for an empty slice.
    pub fn from_points(points: &[Vector3]) -> Option<Self> {
        if points.is_empty() {
            return None;
        }

        let (mut xint, mut yint, mut zint) = (Interval::EMPTY, Interval::EMPTY, Interval::EMPTY);
        for p in points {
            xint.expand(p.x);
            yint.expand(p.y);
            zint.expand(p.z);
        }
        Some(BBox::new_from(&xint, &yint, &zint))
    }

    pub fn min(&self) -> Vector3 {
        Vector3::new(self.xmin, self.ymin, self.zmin)
    }

    pub fn max(&self) -> Vector3 {
        Vector3::new(self.xmax, self.ymax, self.zmax)
    }
}
