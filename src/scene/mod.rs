//! Scene resources: camera, lights, materials, the icosahedron and the
//! three rings. Static configuration — all animation lives in [`crate::anim`].

pub mod camera;
pub mod geometry;
pub mod paint;

use crate::math::Vec3;
use camera::Camera;
use geometry::icosahedron_wireframe;

/// Physically-based material parameters.
///
/// The CPU painter consumes only a few of these directly (emissive, env-map
/// intensity); the rest document the authored look and keep the uniform set
/// the pulse animates in one place.
#[derive(Debug, Clone)]
pub struct PhysicalMaterial {
    pub color: [f32; 3],
    pub metalness: f32,
    pub roughness: f32,
    pub transmission: f32,
    pub thickness: f32,
    pub ior: f32,
    pub iridescence: f32,
    pub iridescence_ior: f32,
    pub clearcoat: f32,
    pub clearcoat_roughness: f32,
    pub env_map_intensity: f32,
    pub emissive_intensity: f32,
}

impl PhysicalMaterial {
    /// Translucent iridescent glass for the icosahedron.
    pub fn glass() -> Self {
        Self {
            color: [1.0, 1.0, 1.0],
            metalness: 0.0,
            roughness: 0.0,
            transmission: 1.0,
            thickness: 0.2,
            ior: 1.33,
            iridescence: 1.0,
            iridescence_ior: 1.3,
            clearcoat: 1.0,
            clearcoat_roughness: 0.1,
            env_map_intensity: 0.05,
            emissive_intensity: 0.0,
        }
    }

    /// Mirror chrome for the rings.
    pub fn chrome() -> Self {
        Self {
            color: [1.0, 1.0, 1.0],
            metalness: 1.0,
            roughness: 0.0,
            transmission: 0.0,
            thickness: 0.0,
            ior: 1.5,
            iridescence: 0.0,
            iridescence_ior: 1.0,
            clearcoat: 1.0,
            clearcoat_roughness: 0.0,
            env_map_intensity: 0.01,
            emissive_intensity: 0.0,
        }
    }
}

/// Bloom post-processing settings; `strength` is animated by the pulse.
#[derive(Debug, Clone)]
pub struct BloomSettings {
    pub strength: f32,
    pub radius: f32,
    pub threshold: f32,
}

impl Default for BloomSettings {
    fn default() -> Self {
        Self {
            strength: 0.0,
            radius: 0.5,
            threshold: 0.85,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DirectionalLight {
    pub position: Vec3,
    pub intensity: f32,
}

#[derive(Debug, Clone)]
pub struct PointLight {
    pub position: Vec3,
    pub intensity: f32,
    pub distance: f32,
}

/// The centerpiece mesh.
#[derive(Debug, Clone)]
pub struct Icosahedron {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: f32,
    pub wire: Vec<[Vec3; 2]>,
    pub material: PhysicalMaterial,
}

pub const ICOSA_RADIUS: f32 = 3.1;
pub const ICOSA_SCALE: f32 = 3.5;

/// One orbiting ring. `edges` stays `None` until its OBJ model loads; a
/// ring with no model simply never appears.
#[derive(Debug, Clone)]
pub struct Ring {
    pub position: Vec3,
    pub initial_position: Vec3,
    pub rotation: Vec3,
    pub scale: f32,
    pub edges: Option<Vec<[Vec3; 2]>>,
    pub material: PhysicalMaterial,
}

pub const RING_SCALE: f32 = 6.5;
pub const RING_COUNT: usize = 3;

/// Fixed ring placements: (position, rotation).
const RING_PLACEMENTS: [(Vec3, Vec3); RING_COUNT] = [
    (Vec3::new(-22.0, 8.0, 10.0), Vec3::new(15.1, 9.35, 1.3)),
    (Vec3::new(22.0, 15.0, 10.0), Vec3::new(1.7, 12.7, 2.22)),
    (Vec3::new(-25.0, -25.0, -10.0), Vec3::new(23.2, 14.15, 161.7)),
];

/// Everything the painter needs for one frame.
#[derive(Debug, Clone)]
pub struct SceneGraph {
    pub camera: Camera,
    pub icosahedron: Icosahedron,
    pub rings: Vec<Ring>,
    pub directional_lights: Vec<DirectionalLight>,
    pub point_light: PointLight,
    pub bloom: BloomSettings,
    /// Average color of the equirectangular environment map, once loaded.
    pub env_tint: Option<[f32; 3]>,
    /// Average color of the ring surface texture, once loaded.
    pub ring_tint: Option<[f32; 3]>,
}

impl SceneGraph {
    pub fn new() -> Self {
        let icosahedron = Icosahedron {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: ICOSA_SCALE,
            wire: icosahedron_wireframe(ICOSA_RADIUS),
            material: PhysicalMaterial::glass(),
        };

        let rings = RING_PLACEMENTS
            .iter()
            .map(|&(position, rotation)| Ring {
                position,
                initial_position: position,
                rotation,
                scale: RING_SCALE,
                edges: None,
                material: PhysicalMaterial::chrome(),
            })
            .collect();

        let directional_lights = [
            Vec3::new(10.0, 10.0, -25.0),
            Vec3::new(10.0, -10.0, -25.0),
            Vec3::new(-10.0, 10.0, -25.0),
            Vec3::new(-10.0, -10.0, -25.0),
        ]
        .iter()
        .map(|&position| DirectionalLight {
            position,
            intensity: 100.0,
        })
        .collect();

        Self {
            camera: Camera::default(),
            icosahedron,
            rings,
            directional_lights,
            point_light: PointLight {
                position: Vec3::ZERO,
                intensity: 0.0,
                distance: 100.0,
            },
            bloom: BloomSettings::default(),
            env_tint: None,
            ring_tint: None,
        }
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scene_starts_at_rest() {
        let scene = SceneGraph::new();
        assert_eq!(scene.rings.len(), RING_COUNT);
        assert_eq!(scene.icosahedron.material.emissive_intensity, 0.0);
        assert_eq!(scene.bloom.strength, 0.0);
        assert!(scene.rings.iter().all(|r| r.edges.is_none()));
    }

    #[test]
    fn rings_remember_initial_positions() {
        let scene = SceneGraph::new();
        for ring in &scene.rings {
            assert_eq!(ring.position, ring.initial_position);
        }
    }
}
