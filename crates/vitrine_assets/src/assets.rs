use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use bevy_ecs::resource::Resource;
use uuid::Uuid;

// 1. The ID (Handle)
// It's just a unique number. Efficient to copy.
#[derive(Debug)]
pub struct Handle<T> {
    pub id: Uuid,
    marker: PhantomData<T>,
}

impl<T> Handle<T> {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            marker: PhantomData,
        }
    }

    pub fn from_id(id: Uuid) -> Self {
        Self {
            id,
            marker: PhantomData,
        }
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            marker: PhantomData,
        }
    }
}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for Handle<T> {}

// Crucial for using Handle as a HashMap key
impl<T> Hash for Handle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

// 2. The Storage (Bank)
// The render loop is single-threaded, so a plain map resource is
// enough; the IO side never touches this, it only sends messages.
#[derive(Resource)]
pub struct Assets<T: Send + Sync + 'static> {
    storage: HashMap<Uuid, T>,
}

impl<T: Send + Sync + 'static> Default for Assets<T> {
    fn default() -> Self {
        Self {
            storage: HashMap::new(),
        }
    }
}

impl<T: Send + Sync + 'static> Assets<T> {
    pub fn insert(&mut self, id: Uuid, asset: T) -> Handle<T> {
        self.storage.insert(id, asset);
        Handle::from_id(id)
    }

    pub fn get(&self, handle: &Handle<T>) -> Option<&T> {
        self.storage.get(&handle.id)
    }

    pub fn contains(&self, handle: &Handle<T>) -> bool {
        self.storage.contains_key(&handle.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_compare_by_id_only() {
        let a = Handle::<u32>::new();
        let b = a.clone();
        assert_eq!(a, b);
        assert_ne!(a, Handle::<u32>::new());
    }

    #[test]
    fn storage_round_trip() {
        let mut bank = Assets::<&'static str>::default();
        let h = bank.insert(Uuid::new_v4(), "poster");
        assert_eq!(bank.get(&h), Some(&"poster"));
        assert!(!bank.contains(&Handle::new()));
    }
}
