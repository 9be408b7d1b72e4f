use glam::{Vec3, Vec4};

use crate::animation::values::Interpolatable;

/// Shading model parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shading {
    /// Metallic/roughness workflow.
    Physical { metallic: f32, roughness: f32 },
    /// Legacy Phong-style workflow.
    Legacy {
        ambient: Vec3,
        diffuse: Vec3,
        specular: Vec3,
        shininess: f32,
    },
}

impl Shading {
    #[must_use]
    pub fn same_model(&self, other: &Self) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

impl Default for Shading {
    fn default() -> Self {
        Shading::Physical {
            metallic: 0.0,
            roughness: 1.0,
        }
    }
}

/// Surface appearance of a node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Linear RGBA
    pub color: Vec4,
    pub opacity: f32,
    pub shading: Shading,
}

impl Material {
    #[must_use]
    pub fn new(color: Vec4) -> Self {
        Self {
            color,
            opacity: 1.0,
            shading: Shading::default(),
        }
    }

    #[must_use]
    pub fn physical(color: Vec4, metallic: f32, roughness: f32) -> Self {
        Self {
            shading: Shading::Physical { metallic, roughness },
            ..Self::new(color)
        }
    }

    #[must_use]
    pub fn legacy(
        color: Vec4,
        ambient: Vec3,
        diffuse: Vec3,
        specular: Vec3,
        shininess: f32,
    ) -> Self {
        Self {
            shading: Shading::Legacy {
                ambient,
                diffuse,
                specular,
                shininess,
            },
            ..Self::new(color)
        }
    }

    #[must_use]
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::new(Vec4::ONE)
    }
}

impl Interpolatable for Material {
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self {
        let shading = match (start.shading, end.shading) {
            (
                Shading::Physical { metallic: m0, roughness: r0 },
                Shading::Physical { metallic: m1, roughness: r1 },
            ) => Shading::Physical {
                metallic: f32::interpolate_linear(m0, m1, t),
                roughness: f32::interpolate_linear(r0, r1, t),
            },
            (
                Shading::Legacy { ambient: a0, diffuse: d0, specular: s0, shininess: n0 },
                Shading::Legacy { ambient: a1, diffuse: d1, specular: s1, shininess: n1 },
            ) => Shading::Legacy {
                ambient: a0.lerp(a1, t),
                diffuse: d0.lerp(d1, t),
                specular: s0.lerp(s1, t),
                shininess: f32::interpolate_linear(n0, n1, t),
            },
            // Different models switch over once the blend completes
            (start_model, end_model) => {
                if t >= 1.0 {
                    end_model
                } else {
                    start_model
                }
            }
        };

        Self {
            color: start.color.lerp(end.color, t),
            opacity: f32::interpolate_linear(start.opacity, end.opacity, t),
            shading,
        }
    }
}
