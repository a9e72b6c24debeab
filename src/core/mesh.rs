use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::{bounds::Aabb, triangle::Triangle, types::MaterialId};
use crate::error::{PhysicsError, Result};

/// Indexed triangle geometry handed over by the asset loader.
///
/// Vertices are in world space; polygon shapes are built without any
/// transform applied.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Surface {
    pub vertices: Vec<Vec3>,
    pub faces: Vec<[u32; 3]>,
    pub material: Option<MaterialId>,
}

impl Surface {
    pub fn new(vertices: Vec<Vec3>, faces: Vec<[u32; 3]>) -> Self {
        Self {
            vertices,
            faces,
            material: None,
        }
    }

    pub fn with_material(mut self, material: MaterialId) -> Self {
        self.material = Some(material);
        self
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    fn vertex(&self, surface: usize, face: usize, index: u32) -> Result<Vec3> {
        self.vertices
            .get(index as usize)
            .copied()
            .ok_or(PhysicsError::FaceIndexOutOfRange {
                surface,
                face,
                index,
                vertex_count: self.vertices.len(),
            })
    }
}

/// Bounds over every vertex of every surface, or `None` when there are none.
pub fn surfaces_extents(surfaces: &[Surface]) -> Option<Aabb> {
    let bounds = Aabb::from_points(surfaces.iter().flat_map(|s| s.vertices.iter().copied()));
    (!bounds.is_empty()).then_some(bounds)
}

/// Flattens all faces of all surfaces into one triangle array, tagging each
/// triangle with the material of the surface it came from.
pub fn triangulate_surfaces(surfaces: &[Surface]) -> Result<Vec<Triangle>> {
    let total: usize = surfaces.iter().map(Surface::face_count).sum();
    let mut triangles = Vec::with_capacity(total);

    for (surface_index, surface) in surfaces.iter().enumerate() {
        for (face_index, face) in surface.faces.iter().enumerate() {
            let [a, b, c] = [face[0], face[1], face[2]]
                .map(|index| surface.vertex(surface_index, face_index, index));
            triangles.push(Triangle::new(a?, b?, c?).with_material(surface.material));
        }
    }

    Ok(triangles)
}
