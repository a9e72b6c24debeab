use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Stable handle to a body stored in a [`BodyArena`].
///
/// The generation is bumped whenever a slot is freed, so a handle kept past
/// [`crate::DynamicsWorld::remove_body`] never resolves to a later body that
/// happens to reuse the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct BodyId {
    index: u32,
    generation: u32,
}

impl BodyId {
    pub fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    pub fn index(&self) -> usize {
        self.index as usize
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

/// Generational arena handing out [`BodyId`]s.
///
/// Freed slots are recycled, but iteration always follows insertion order:
/// a body inserted into a recycled slot is visited after every older body.
pub struct BodyArena<T> {
    items: Vec<Option<T>>,
    generations: Vec<u32>,
    free_list: VecDeque<usize>,
    /// Live slot indices, oldest first.
    order: Vec<u32>,
}

impl<T> Default for BodyArena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> BodyArena<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            generations: Vec::new(),
            free_list: VecDeque::new(),
            order: Vec::new(),
        }
    }

    pub fn insert(&mut self, item: T) -> BodyId {
        if let Some(index) = self.free_list.pop_front() {
            self.items[index] = Some(item);
            self.order.push(index as u32);
            return BodyId::new(index as u32, self.generations[index]);
        }

        let index = self.items.len();
        self.items.push(Some(item));
        self.order.push(index as u32);
        self.generations.push(0);
        BodyId::new(index as u32, 0)
    }

    pub fn get(&self, id: BodyId) -> Option<&T> {
        if self.is_valid(id) {
            self.items.get(id.index()).and_then(|slot| slot.as_ref())
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, id: BodyId) -> Option<&mut T> {
        if self.is_valid(id) {
            self.items.get_mut(id.index()).and_then(|slot| slot.as_mut())
        } else {
            None
        }
    }

    /// Borrows two distinct bodies mutably at once, preserving argument order.
    pub fn get2_mut(&mut self, id_a: BodyId, id_b: BodyId) -> Option<(&mut T, &mut T)> {
        if id_a.index() == id_b.index() {
            return None;
        }

        if !self.is_valid(id_a) || !self.is_valid(id_b) {
            return None;
        }

        let (first, second, flipped) = if id_a.index() < id_b.index() {
            (id_a, id_b, false)
        } else {
            (id_b, id_a, true)
        };

        let (left, right) = self.items.split_at_mut(second.index());
        let first_slot = left.get_mut(first.index()).and_then(|slot| slot.as_mut())?;
        let second_slot = right.get_mut(0).and_then(|slot| slot.as_mut())?;

        if flipped {
            Some((second_slot, first_slot))
        } else {
            Some((first_slot, second_slot))
        }
    }

    pub fn remove(&mut self, id: BodyId) -> Option<T> {
        if !self.is_valid(id) {
            return None;
        }
        let slot = self.items.get_mut(id.index())?;
        let item = slot.take();
        if item.is_some() {
            self.generations[id.index()] = self.generations[id.index()].wrapping_add(1);
            self.free_list.push_back(id.index());
            self.order.retain(|&index| index as usize != id.index());
        }
        item
    }

    pub fn contains(&self, id: BodyId) -> bool {
        self.get(id).is_some()
    }

    /// Live bodies in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (BodyId, &T)> + '_ {
        self.order.iter().filter_map(|&index| {
            let index = index as usize;
            self.items[index]
                .as_ref()
                .map(|item| (BodyId::new(index as u32, self.generations[index]), item))
        })
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> + '_ {
        let mut slots: Vec<Option<&mut T>> = self.items.iter_mut().map(Option::as_mut).collect();
        self.order
            .iter()
            .filter_map(move |&index| slots[index as usize].take())
    }

    pub fn ids(&self) -> impl Iterator<Item = BodyId> + '_ {
        self.iter().map(|(id, _)| id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn is_valid(&self, id: BodyId) -> bool {
        self.generations
            .get(id.index())
            .is_some_and(|&generation| generation == id.generation())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stale_ids_do_not_resolve_after_reuse() {
        let mut arena = BodyArena::new();
        let first = arena.insert("first");
        assert_eq!(arena.remove(first), Some("first"));

        let second = arena.insert("second");
        assert_eq!(first.index(), second.index());
        assert!(arena.get(first).is_none());
        assert_eq!(arena.get(second), Some(&"second"));
        assert_eq!(arena.len(), 1);
    }

    #[test]
    fn recycled_slot_iterates_after_older_bodies() {
        let mut arena = BodyArena::new();
        let a = arena.insert("a");
        let _b = arena.insert("b");
        let _c = arena.insert("c");
        arena.remove(a);
        let d = arena.insert("d");
        assert_eq!(d.index(), a.index());

        let names: Vec<_> = arena.iter().map(|(_, name)| *name).collect();
        assert_eq!(names, ["b", "c", "d"]);
        let names_mut: Vec<_> = arena.iter_mut().map(|name| *name).collect();
        assert_eq!(names_mut, ["b", "c", "d"]);
        assert_eq!(arena.ids().last(), Some(d));
    }

    #[test]
    fn get2_mut_keeps_argument_order() {
        let mut arena = BodyArena::new();
        let a = arena.insert(1);
        let b = arena.insert(2);

        let (rb, ra) = arena.get2_mut(b, a).unwrap();
        assert_eq!((*ra, *rb), (1, 2));
        assert!(arena.get2_mut(a, a).is_none());
    }
}
