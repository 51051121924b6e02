use alloc::vec::Vec;
use core::mem;

use super::node_id::NodeId;

#[derive(Clone)]
enum Slot<T> {
    Occupied(T),
    // Vacant slots form a singly linked free list threaded through the arena.
    Vacant { next_free: Option<NodeId> },
}

/// Slot storage for tree nodes.
///
/// Removed slots are recycled before the backing `Vec` grows, so a tree that
/// churns at a steady size does not reallocate.
#[derive(Clone)]
pub(crate) struct Arena<T> {
    slots: Vec<Slot<T>>,
    free_head: Option<NodeId>,
    len: usize,
}

impl<T> Arena<T> {
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_head: None,
            len: 0,
        }
    }

    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn insert(&mut self, element: T) -> NodeId {
        let id = if let Some(id) = self.free_head {
            let slot = &mut self.slots[id.index()];
            let Slot::Vacant { next_free } = *slot else {
                panic!("`Arena::insert()` - free list points at an occupied slot!");
            };
            self.free_head = next_free;
            *slot = Slot::Occupied(element);
            id
        } else {
            assert!(
                self.slots.len() <= NodeId::MAX,
                "`Arena::insert()` - arena is at maximum capacity ({})",
                NodeId::MAX
            );
            self.slots.push(Slot::Occupied(element));
            NodeId::new(self.slots.len() - 1)
        };
        self.len += 1;
        id
    }

    #[inline]
    pub(crate) fn get(&self, id: NodeId) -> &T {
        match &self.slots[id.index()] {
            Slot::Occupied(element) => element,
            Slot::Vacant { .. } => panic!("`Arena::get()` - `id` is vacant!"),
        }
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, id: NodeId) -> &mut T {
        match &mut self.slots[id.index()] {
            Slot::Occupied(element) => element,
            Slot::Vacant { .. } => panic!("`Arena::get_mut()` - `id` is vacant!"),
        }
    }

    pub(crate) fn remove(&mut self, id: NodeId) -> T {
        let vacant = Slot::Vacant {
            next_free: self.free_head,
        };
        match mem::replace(&mut self.slots[id.index()], vacant) {
            Slot::Occupied(element) => {
                self.free_head = Some(id);
                self.len -= 1;
                element
            }
            Slot::Vacant { .. } => panic!("`Arena::remove()` - `id` is vacant!"),
        }
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free_head = None;
        self.len = 0;
    }
}
