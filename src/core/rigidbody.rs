use std::sync::Arc;

use glam::Vec3;

use super::shape::CollisionShape;
use crate::{
    collision::contact::{Contact, ContactList},
    config::DEFAULT_ELASTICITY,
};

/// Simulated body: a point with linear velocity carrying a shared shape.
///
/// Polygon bodies are treated as static world geometry. They never move and
/// only count how many sphere/triangle contacts touched them this step.
#[derive(Debug, Clone)]
pub struct Body {
    pub position: Vec3,
    pub linear_velocity: Vec3,
    /// Kept for callers; no resolution path reads it.
    pub elasticity: f32,
    shape: Arc<CollisionShape>,
    contacts: ContactList,
    touches: u32,
}

impl Body {
    pub fn new(shape: Arc<CollisionShape>) -> Self {
        Self {
            position: Vec3::ZERO,
            linear_velocity: Vec3::ZERO,
            elasticity: DEFAULT_ELASTICITY,
            shape,
            contacts: ContactList::new(),
            touches: 0,
        }
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.linear_velocity = velocity;
        self
    }

    pub fn shape(&self) -> &CollisionShape {
        &self.shape
    }

    pub fn shape_handle(&self) -> &Arc<CollisionShape> {
        &self.shape
    }

    pub fn is_static(&self) -> bool {
        self.shape.is_static()
    }

    pub fn contacts(&self) -> &[Contact] {
        self.contacts.as_slice()
    }

    pub fn contact_count(&self) -> usize {
        self.contacts.len()
    }

    /// Sphere/triangle contacts against this (polygon) body in the last step.
    pub fn touches(&self) -> u32 {
        self.touches
    }

    pub(crate) fn begin_step(&mut self) {
        self.contacts.clear();
        self.touches = 0;
    }

    pub(crate) fn apply_gravity(&mut self, gravity_step: Vec3) {
        self.linear_velocity += gravity_step;
    }

    pub(crate) fn integrate(&mut self) {
        self.position += self.linear_velocity;
    }

    pub(crate) fn record_contact(&mut self, contact: Contact) -> bool {
        self.contacts.push(contact)
    }

    pub(crate) fn record_touch(&mut self) {
        self.touches = self.touches.saturating_add(1);
    }
}
