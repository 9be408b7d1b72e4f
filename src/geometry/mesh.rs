use glam::{Vec2, Vec3, Vec4};

use crate::animation::values::{Interpolatable, interpolate_slice};
use crate::geometry::bounds_center;

/// Vertex data supplied by a mesh import collaborator.
///
/// Two meshes animate into each other vertex-by-vertex, so they must share
/// a vertex count. Optional attributes (normals, uvs, joint weights) are
/// blended when both sides carry the same number of entries; otherwise they
/// switch over discretely, as do joint indices and the index buffer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub joints: Vec<[u16; 4]>,
    pub weights: Vec<Vec4>,
    pub indices: Option<Vec<u32>>,
}

impl Mesh {
    #[must_use]
    pub fn new(positions: Vec<Vec3>) -> Self {
        Self {
            positions,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_normals(mut self, normals: Vec<Vec3>) -> Self {
        self.normals = normals;
        self
    }

    #[must_use]
    pub fn with_uvs(mut self, uvs: Vec<Vec2>) -> Self {
        self.uvs = uvs;
        self
    }

    #[must_use]
    pub fn with_skin(mut self, joints: Vec<[u16; 4]>, weights: Vec<Vec4>) -> Self {
        self.joints = joints;
        self.weights = weights;
        self
    }

    #[must_use]
    pub fn with_indices(mut self, indices: Vec<u32>) -> Self {
        self.indices = Some(indices);
        self
    }

    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Bounds center of the vertex positions.
    #[must_use]
    pub fn center(&self) -> Vec3 {
        bounds_center(&self.positions).unwrap_or(Vec3::ZERO)
    }

    /// Blends two meshes with the same vertex count.
    #[must_use]
    pub fn interpolate(start: &Self, end: &Self, t: f32) -> Self {
        let use_end = t >= 1.0;
        let discrete = if use_end { end } else { start };

        let normals = blend_or_switch(&start.normals, &end.normals, t, use_end)
            .into_iter()
            .map(Vec3::normalize_or_zero)
            .collect();

        Self {
            positions: interpolate_slice(&start.positions, &end.positions, t),
            normals,
            uvs: blend_or_switch(&start.uvs, &end.uvs, t, use_end),
            joints: discrete.joints.clone(),
            weights: blend_or_switch(&start.weights, &end.weights, t, use_end)
                .into_iter()
                .map(normalize_weights)
                .collect(),
            indices: discrete.indices.clone(),
        }
    }
}

/// Rescales joint weights to sum to one; all-zero weights stay zero.
fn normalize_weights(weights: Vec4) -> Vec4 {
    let sum = weights.element_sum();
    if sum > f32::EPSILON { weights / sum } else { weights }
}

fn blend_or_switch<T: Interpolatable>(start: &[T], end: &[T], t: f32, use_end: bool) -> Vec<T> {
    if start.len() == end.len() {
        interpolate_slice(start, end, t)
    } else if use_end {
        end.to_vec()
    } else {
        start.to_vec()
    }
}
