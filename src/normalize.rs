use crate::geom::Vec3;

/// Centre/scale transform used by the analytic and numeric surface solvers.
/// `centre` is the bounding-box midpoint of the mesh's vertices; `scale`
/// maps the largest extent to a span of 2 (unit cube centred at the
/// origin), or falls back to 1 for a degenerate (zero-extent) mesh.
#[derive(Debug, Clone, Copy)]
pub struct Normalization {
    pub centre: Vec3,
    pub scale: f64,
}

impl Normalization {
    /// Derive the transform from a vertex cloud, ignoring any non-finite
    /// coordinates in the extent calculation.
    #[must_use]
    pub fn from_vertices(vertices: &[Vec3]) -> Self {
        let Some(bbox) = crate::geom::BBox::from_points(vertices) else {
            return Self {
                centre: Vec3::ZERO,
                scale: 1.0,
            };
        };
        let extent = bbox.size();
        let max_extent = extent.x.max(extent.y).max(extent.z);
        let scale = if max_extent > 0.0 && max_extent.is_finite() {
            2.0 / max_extent
        } else {
            1.0
        };
        Self {
            centre: bbox.center(),
            scale,
        }
    }

    /// Map a point from original to normalised space: `(p - centre) * scale`.
    #[must_use]
    pub fn apply(&self, p: Vec3) -> Vec3 {
        (p - self.centre).mul_scalar(self.scale)
    }

    /// Map a point from normalised back to original space.
    #[must_use]
    pub fn unapply(&self, p: Vec3) -> Vec3 {
        p.mul_scalar(1.0 / self.scale) + self.centre
    }

    /// Map a collection of points from original to normalised space.
    #[must_use]
    pub fn apply_all(&self, points: &[Vec3]) -> Vec<Vec3> {
        points.iter().map(|&p| self.apply(p)).collect()
    }

    /// Convert a length measured in normalised space back into the mesh's
    /// original units.
    #[must_use]
    pub fn unapply_length(&self, length: f64) -> f64 {
        length / self.scale
    }
}
