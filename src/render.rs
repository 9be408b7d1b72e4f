//! Render packet extraction.
//!
//! The engine draws nothing itself. [`extract`] flattens a frame into
//! renderer-agnostic packets: flat `f32` vertex buffers, polygon ring
//! ranges, a model matrix and the material channels, ready for upload.

use std::ops::Range;

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2, Vec3};
use smallvec::SmallVec;

use crate::animation::AnimationKind;
use crate::geometry::Polygon;
use crate::geometry::resolver::dominant_axis;
use crate::scene::camera::Camera;
use crate::scene::collection::Collection;
use crate::scene::material::{Material, Shading};
use crate::scene::node::{Shape, TransformNode};

/// Material values in a GPU-friendly layout.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct MaterialChannels {
    pub color: [f32; 4],
    pub opacity: f32,
    pub metallic: f32,
    pub roughness: f32,
    pub shininess: f32,
}

impl From<&Material> for MaterialChannels {
    fn from(material: &Material) -> Self {
        let (metallic, roughness, shininess) = match material.shading {
            Shading::Physical { metallic, roughness } => (metallic, roughness, 0.0),
            Shading::Legacy { shininess, .. } => (0.0, 1.0, shininess),
        };
        Self {
            color: material.color.to_array(),
            opacity: material.opacity,
            metallic,
            roughness,
            shininess,
        }
    }
}

/// One drawable node.
#[derive(Debug, Clone)]
pub struct RenderItem {
    pub name: String,
    pub kind: AnimationKind,
    /// xyz triples
    pub positions: Vec<f32>,
    /// xyz triples, one per position
    pub normals: Vec<f32>,
    /// uv pairs, one per position
    pub uvs: Vec<f32>,
    pub indices: Option<Vec<u32>>,
    /// Vertex ranges of the filled ring and each hole, drawn as line loops.
    /// Empty for meshes.
    pub rings: SmallVec<[Range<u32>; 4]>,
    pub model_matrix: Mat4,
    pub material: MaterialChannels,
}

/// View and projection of the first camera in a frame.
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct CameraPacket {
    pub view: Mat4,
    pub projection: Mat4,
    pub view_projection: Mat4,
}

fn flat<T: Pod>(values: &[T]) -> Vec<f32> {
    bytemuck::cast_slice(values).to_vec()
}

/// Packets for every polygon and mesh node, in member order.
#[must_use]
pub fn extract(frame: &Collection) -> Vec<RenderItem> {
    frame
        .flatten()
        .into_iter()
        .filter_map(|(matrix, node)| extract_node(node, Mat4::from(matrix)))
        .collect()
}

fn extract_node(node: &TransformNode, model_matrix: Mat4) -> Option<RenderItem> {
    let material = MaterialChannels::from(&node.material.unwrap_or_default());
    let (positions, normals, uvs, indices, rings) = match &node.shape {
        Shape::Polygon(polygon) => {
            let (positions, normals, uvs, rings) = polygon_buffers(polygon);
            (positions, normals, uvs, None, rings)
        }
        Shape::Mesh(mesh) => (
            flat(&mesh.positions),
            flat(&mesh.normals),
            flat(&mesh.uvs),
            mesh.indices.clone(),
            SmallVec::new(),
        ),
        Shape::Empty | Shape::Camera(_) => return None,
    };

    Some(RenderItem {
        name: node.name.clone(),
        kind: node.kind(),
        positions,
        normals,
        uvs,
        indices,
        rings,
        model_matrix,
        material,
    })
}

type PolygonBuffers = (Vec<f32>, Vec<f32>, Vec<f32>, SmallVec<[Range<u32>; 4]>);

/// Ring vertices with a shared face normal and planar uvs.
fn polygon_buffers(polygon: &Polygon) -> PolygonBuffers {
    let normal = polygon.normal().normalize_or(Vec3::Z);
    let (u, v) = match dominant_axis(normal) {
        0 => (1, 2),
        1 => (2, 0),
        _ => (0, 1),
    };

    let mut points: Vec<Vec3> = Vec::new();
    let mut rings = SmallVec::new();
    for ring in polygon.rings() {
        let start = points.len() as u32;
        points.extend_from_slice(ring);
        rings.push(start..points.len() as u32);
    }

    let planar: Vec<Vec2> = points.iter().map(|p| Vec2::new(p[u], p[v])).collect();
    let (min, max) = planar
        .iter()
        .fold((Vec2::splat(f32::MAX), Vec2::splat(f32::MIN)), |(min, max), p| {
            (min.min(*p), max.max(*p))
        });
    let extent = (max - min).max(Vec2::splat(f32::EPSILON));
    let uvs: Vec<Vec2> = planar.iter().map(|p| (*p - min) / extent).collect();
    let normals = vec![normal; points.len()];

    (flat(&points), flat(&normals), flat(&uvs), rings)
}

/// Matrices of the first camera node in `frame`, if any.
#[must_use]
pub fn extract_camera(frame: &Collection) -> Option<CameraPacket> {
    frame.flatten().into_iter().find_map(|(world, node)| match &node.shape {
        Shape::Camera(camera) => {
            let view = Camera::view_matrix(&world);
            let projection = camera.projection_matrix();
            Some(CameraPacket {
                view,
                projection,
                view_projection: projection * view,
            })
        }
        _ => None,
    })
}
