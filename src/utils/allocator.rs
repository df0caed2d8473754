use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

/// Slot index plus generation, so a handle to a removed slot never aliases its replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct GenerationalId {
    pub index: usize,
    pub generation: u32,
}

impl GenerationalId {
    pub fn new(index: usize, generation: u32) -> Self {
        Self { index, generation }
    }
}

/// Typed handle stored in an [`Arena`].
pub trait ArenaKey: Copy + Eq {
    fn from_raw(raw: GenerationalId) -> Self;
    fn raw(&self) -> GenerationalId;
}

macro_rules! arena_handle {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
        pub struct $name(pub GenerationalId);

        impl $name {
            pub fn new(index: usize, generation: u32) -> Self {
                Self(GenerationalId::new(index, generation))
            }

            pub fn index(&self) -> usize {
                self.0.index
            }

            pub fn generation(&self) -> u32 {
                self.0.generation
            }
        }

        impl ArenaKey for $name {
            fn from_raw(raw: GenerationalId) -> Self {
                Self(raw)
            }

            fn raw(&self) -> GenerationalId {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({}v{})", $prefix, self.0.index, self.0.generation)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}#{}", $prefix, self.0.index)
            }
        }
    };
}

arena_handle!(
    /// Identifier of a rig entity in the component registry.
    EntityId,
    "Entity"
);

arena_handle!(
    /// Non-owning reference to a node of a [`Skeleton`](crate::core::skeleton::Skeleton).
    NodeId,
    "Node"
);

/// Generational arena that hands out stable handles while preventing use-after-free.
pub struct Arena<T, K: ArenaKey = EntityId> {
    items: Vec<Option<T>>,
    generations: Vec<u32>,
    free_list: VecDeque<usize>,
    _key: std::marker::PhantomData<K>,
}

impl<T, K: ArenaKey> Default for Arena<T, K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone, K: ArenaKey> Clone for Arena<T, K> {
    fn clone(&self) -> Self {
        Self {
            items: self.items.clone(),
            generations: self.generations.clone(),
            free_list: self.free_list.clone(),
            _key: std::marker::PhantomData,
        }
    }
}

impl<T, K: ArenaKey> Arena<T, K> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            generations: Vec::new(),
            free_list: VecDeque::new(),
            _key: std::marker::PhantomData,
        }
    }

    pub fn insert(&mut self, item: T) -> K {
        if let Some(index) = self.free_list.pop_front() {
            let generation = self.generations[index];
            self.items[index] = Some(item);
            return K::from_raw(GenerationalId::new(index, generation));
        }

        let index = self.items.len();
        self.items.push(Some(item));
        self.generations.push(0);
        K::from_raw(GenerationalId::new(index, 0))
    }

    pub fn get(&self, id: K) -> Option<&T> {
        if self.contains(id) {
            self.items.get(id.raw().index).and_then(|slot| slot.as_ref())
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, id: K) -> Option<&mut T> {
        if self.contains(id) {
            self.items.get_mut(id.raw().index).and_then(|slot| slot.as_mut())
        } else {
            None
        }
    }

    pub fn remove(&mut self, id: K) -> Option<T> {
        if !self.contains(id) {
            return None;
        }
        let index = id.raw().index;
        let taken = self.items.get_mut(index).and_then(|slot| slot.take());
        if taken.is_some() {
            self.generations[index] = self.generations[index].wrapping_add(1);
            self.free_list.push_back(index);
        }
        taken
    }

    /// Returns true while `id` refers to a live slot of the same generation.
    pub fn contains(&self, id: K) -> bool {
        let raw = id.raw();
        self.generations.get(raw.index).copied() == Some(raw.generation)
            && self
                .items
                .get(raw.index)
                .map(|slot| slot.is_some())
                .unwrap_or(false)
    }

    pub fn iter(&self) -> impl Iterator<Item = (K, &T)> + '_ {
        self.items.iter().enumerate().filter_map(move |(index, slot)| {
            slot.as_ref().map(|item| {
                (
                    K::from_raw(GenerationalId::new(index, self.generations[index])),
                    item,
                )
            })
        })
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (K, &mut T)> + '_ {
        let generations = &self.generations;
        self.items
            .iter_mut()
            .enumerate()
            .filter_map(move |(index, slot)| {
                slot.as_mut().map(|item| {
                    (
                        K::from_raw(GenerationalId::new(index, generations[index])),
                        item,
                    )
                })
            })
    }

    pub fn ids(&self) -> impl Iterator<Item = K> + '_ {
        self.iter().map(|(id, _)| id)
    }

    pub fn len(&self) -> usize {
        self.items.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
