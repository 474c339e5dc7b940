//! Generic list controller
//!
//! One CRUD controller shared by every list-shaped record (goals, friends,
//! requests, activities, users, support requests). The whole list is read
//! once, mutated in memory and re-serialized in full after each change.

use crate::database::{LocalStore, Record};
use crate::error::Result;

pub struct Collection<T: Record> {
    store: LocalStore,
    items: Vec<T>,
}

impl<T: Record> Collection<T> {
    /// Read the list from its store key (empty when absent or unreadable)
    pub async fn load(store: &LocalStore) -> Result<Self> {
        let items: Vec<T> = store.load_or_default(T::STORE_KEY).await?;
        tracing::debug!("Loaded {} records from {}", items.len(), T::STORE_KEY);

        Ok(Self {
            store: store.clone(),
            items,
        })
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn find(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn find_by(&self, predicate: impl Fn(&T) -> bool) -> Option<&T> {
        self.items.iter().find(|item| predicate(item))
    }

    /// Append and persist
    pub async fn push(&mut self, item: T) -> Result<()> {
        self.items.push(item);
        self.save().await
    }

    /// Prepend and persist (feeds are newest first)
    pub async fn push_front(&mut self, item: T) -> Result<()> {
        self.items.insert(0, item);
        self.save().await
    }

    /// Apply `f` to the record with `id` and persist. Absent id: no write.
    pub async fn update(&mut self, id: &str, f: impl FnOnce(&mut T)) -> Result<Option<T>> {
        let Some(item) = self.items.iter_mut().find(|item| item.id() == id) else {
            return Ok(None);
        };

        f(item);
        let updated = item.clone();
        self.save().await?;

        Ok(Some(updated))
    }

    /// Remove the record with `id` and persist. Absent id: no write.
    pub async fn remove(&mut self, id: &str) -> Result<Option<T>> {
        let Some(index) = self.items.iter().position(|item| item.id() == id) else {
            return Ok(None);
        };

        let removed = self.items.remove(index);
        self.save().await?;

        Ok(Some(removed))
    }

    /// Keep only records matching `keep`. Writes only if something went.
    pub async fn retain(&mut self, keep: impl Fn(&T) -> bool) -> Result<usize> {
        let before = self.items.len();
        self.items.retain(|item| keep(item));

        let removed = before - self.items.len();
        if removed > 0 {
            self.save().await?;
        }
        Ok(removed)
    }

    async fn save(&self) -> Result<()> {
        self.store.save(T::STORE_KEY, &self.items).await
    }
}
