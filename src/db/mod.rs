//! In-memory keyed storage.
//!
//! A single generic store backs every entity kind. `MemoryStore<T>` is a
//! cheap handle: clones share the same map, so controllers can each hold one
//! without a central owner. Entity-specific queries (history by sensor,
//! reports by author, pruning by age) live in `repositories` as inherent
//! impls on the concrete store types.
//!
//! Values go in and come out by copy. `load` and `list_all` hand back owned
//! clones; a caller that edits one must `save` it for the change to stick.

use std::{
    collections::BTreeMap,
    fmt::Debug,
    sync::{Arc, RwLock},
};

use chrono::{DateTime, Utc};

pub mod models;
pub mod repositories;

pub use models::{
    Forecast, Level, LevelInput, LevelParameters, LevelPatch, MeasurementRecord, Report, Sensor,
};

use crate::utils::{read, write};

/// Key type of a store. Integer keys also feed the store's id sequence so
/// that allocated ids never collide with explicitly saved ones.
pub trait StoreKey: Copy + Ord + Debug + Send + Sync + 'static {
    fn as_sequence(self) -> Option<u64>;
}

impl StoreKey for u64 {
    fn as_sequence(self) -> Option<u64> {
        Some(self)
    }
}

impl StoreKey for u32 {
    fn as_sequence(self) -> Option<u64> {
        Some(u64::from(self))
    }
}

impl StoreKey for i64 {
    fn as_sequence(self) -> Option<u64> {
        u64::try_from(self).ok()
    }
}

/// Anything a store can hold: cloneable and carrying its own key.
pub trait Entity: Clone + Send + Sync + 'static {
    type Id: StoreKey;

    fn id(&self) -> Self::Id;

    /// True for entities whose id is still to be handed out by the store.
    /// Such entities are numbered on save and never overwrite each other.
    fn needs_id(&self) -> bool {
        false
    }

    /// Receives the id allocated for an entity that `needs_id`.
    fn set_id(&mut self, _id: u64) {}
}

/// Entities with a creation/observation time, prunable by age.
pub trait Timestamped {
    fn timestamp(&self) -> DateTime<Utc>;
}

/// Keyed store contract. Absence is `None` or a no-op, never an error.
pub trait Repository<T: Entity> {
    /// Inserts, or overwrites the entity stored under the same id.
    fn save(&self, entity: T);

    fn load(&self, id: T::Id) -> Option<T>;

    /// Removes the entity if present; missing ids are ignored.
    fn delete(&self, id: T::Id);

    /// All entities in ascending id order.
    fn list_all(&self) -> Vec<T>;

    fn len(&self) -> usize {
        self.list_all().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

struct StoreInner<T: Entity> {
    items: BTreeMap<T::Id, T>,
    /// Next id handed out by `allocate_id`; starts at 1 and only grows.
    next_seq: u64,
}

impl<T: Entity> StoreInner<T> {
    fn observe(&mut self, id: T::Id) {
        if let Some(seq) = id.as_sequence() {
            self.next_seq = self.next_seq.max(seq.saturating_add(1));
        }
    }

    fn next_id(&mut self) -> u64 {
        let id = self.next_seq;
        self.next_seq = self.next_seq.saturating_add(1);
        id
    }

    fn insert(&mut self, mut entity: T) -> T::Id {
        if entity.needs_id() {
            let id = self.next_id();
            entity.set_id(id);
        }
        let id = entity.id();
        self.observe(id);
        self.items.insert(id, entity);
        id
    }
}

pub struct MemoryStore<T: Entity> {
    name: &'static str,
    inner: Arc<RwLock<StoreInner<T>>>,
}

impl<T: Entity> Clone for MemoryStore<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Entity> MemoryStore<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            inner: Arc::new(RwLock::new(StoreInner {
                items: BTreeMap::new(),
                next_seq: 1,
            })),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The id `allocate_id` would hand out next.
    pub fn peek_next_id(&self) -> u64 {
        read(&self.inner).next_seq
    }

    /// Reserves a fresh id. Deleting entities never makes an id reusable.
    pub fn allocate_id(&self) -> u64 {
        write(&self.inner).next_id()
    }

    /// Same as `save`, returning the id the entity ended up under.
    pub fn insert_new(&self, entity: T) -> T::Id {
        write(&self.inner).insert(entity)
    }

    /// Entities matching `predicate`, in id order.
    pub fn find<P>(&self, predicate: P) -> Vec<T>
    where
        P: Fn(&T) -> bool,
    {
        read(&self.inner)
            .items
            .values()
            .filter(|entity| predicate(entity))
            .cloned()
            .collect()
    }

    /// Keeps only entities matching `keep`; returns how many were dropped.
    pub fn retain<P>(&self, keep: P) -> usize
    where
        P: Fn(&T) -> bool,
    {
        let mut guard = write(&self.inner);
        let before = guard.items.len();
        guard.items.retain(|_, entity| keep(entity));
        before - guard.items.len()
    }

    /// Applies `mutate` to every stored entity in place.
    pub fn update_all<F>(&self, mut mutate: F)
    where
        F: FnMut(&mut T),
    {
        let mut guard = write(&self.inner);
        for entity in guard.items.values_mut() {
            mutate(entity);
        }
    }

    pub fn clear(&self) {
        write(&self.inner).items.clear();
    }
}

impl<T: Entity + Timestamped> MemoryStore<T> {
    /// Drops entities older than `cutoff`; those stamped exactly at the
    /// cutoff stay. Returns the number removed.
    pub fn clear_by_age(&self, cutoff: DateTime<Utc>) -> usize {
        self.retain(|entity| entity.timestamp() >= cutoff)
    }
}

impl<T: Entity> Repository<T> for MemoryStore<T> {
    fn save(&self, entity: T) {
        write(&self.inner).insert(entity);
    }

    fn load(&self, id: T::Id) -> Option<T> {
        read(&self.inner).items.get(&id).cloned()
    }

    fn delete(&self, id: T::Id) {
        write(&self.inner).items.remove(&id);
    }

    fn list_all(&self) -> Vec<T> {
        read(&self.inner).items.values().cloned().collect()
    }

    fn len(&self) -> usize {
        read(&self.inner).items.len()
    }
}

impl<T: Entity> Debug for MemoryStore<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("name", &self.name)
            .field("len", &self.len())
            .finish()
    }
}
