use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::{config::MAX_CONTACTS, utils::allocator::BodyId};

/// Contact recorded on a body during the step that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    /// Points away from `other`, towards the body holding the contact.
    pub normal: Vec3,
    /// Index into the polygon shape of `other`, `None` for sphere pairs.
    pub triangle: Option<usize>,
    pub other: BodyId,
    pub position: Vec3,
}

/// Fixed-capacity contact list. Recording past [`MAX_CONTACTS`] is silently
/// dropped.
#[derive(Debug, Clone)]
pub struct ContactList {
    contacts: Vec<Contact>,
}

impl Default for ContactList {
    fn default() -> Self {
        Self::new()
    }
}

impl ContactList {
    pub fn new() -> Self {
        Self {
            contacts: Vec::with_capacity(MAX_CONTACTS),
        }
    }

    /// Returns `false` when the list is already full.
    pub fn push(&mut self, contact: Contact) -> bool {
        if self.is_full() {
            return false;
        }
        self.contacts.push(contact);
        true
    }

    pub fn clear(&mut self) {
        self.contacts.clear();
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.contacts.len() >= MAX_CONTACTS
    }

    pub fn as_slice(&self) -> &[Contact] {
        &self.contacts
    }
}
