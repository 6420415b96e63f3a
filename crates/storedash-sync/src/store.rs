//! Ordered, id-keyed mirror of one server collection.

use serde::de::DeserializeOwned;
use serde_json::Value;
use storedash_core::{decode_collection, Resource, ShapeError};

/// The last server-confirmed state of a collection, in server order.
#[derive(Debug, Clone)]
pub struct ResourceStore<R> {
    items: Vec<R>,
}

impl<R> Default for ResourceStore<R> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<R: Resource> ResourceStore<R> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole collection.
    pub fn replace(&mut self, items: Vec<R>) {
        self.items = items;
    }

    /// Replaces the collection from a raw list response.
    ///
    /// # Errors
    ///
    /// Returns [`ShapeError`] and leaves the store untouched when the body is
    /// not a collection of `R`.
    pub fn load(&mut self, body: Value, envelope_keys: &[&str]) -> Result<(), ShapeError>
    where
        R: DeserializeOwned,
    {
        let items = decode_collection(body, envelope_keys)?;
        self.replace(items);
        Ok(())
    }

    /// Appends a newly created entity.
    pub fn apply_create(&mut self, entity: R) {
        self.items.push(entity);
    }

    /// Replaces the entity with `id` in place. Returns `false` when absent.
    pub fn apply_update(&mut self, id: &str, entity: R) -> bool {
        match self.position(id) {
            Some(index) => {
                self.items[index] = entity;
                true
            }
            None => false,
        }
    }

    /// Removes the entity with `id`, returning it.
    pub fn apply_delete(&mut self, id: &str) -> Option<R> {
        self.position(id).map(|index| self.items.remove(index))
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&R> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut R> {
        self.items.iter_mut().find(|item| item.id() == id)
    }

    #[must_use]
    pub fn position(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.items.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<'a, R: Resource> IntoIterator for &'a ResourceStore<R> {
    type Item = &'a R;
    type IntoIter = std::slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use storedash_core::Category;

    use super::*;

    fn shoes() -> Category {
        serde_json::from_value(json!({"_id": "c1", "name": "Shoes"})).unwrap()
    }

    fn ids(store: &ResourceStore<Category>) -> Vec<&str> {
        store.iter().map(|c| c.id.as_str()).collect()
    }

    #[test]
    fn load_preserves_length_and_order() {
        let mut store = ResourceStore::<Category>::new();
        store
            .load(
                json!([
                    {"_id": "b", "name": "B"},
                    {"_id": "a", "name": "A"},
                    {"_id": "c", "name": "C"}
                ]),
                &["data"],
            )
            .unwrap();
        assert_eq!(ids(&store), ["b", "a", "c"]);
    }

    #[test]
    fn malformed_load_leaves_store_unchanged() {
        let mut store = ResourceStore::new();
        store.apply_create(shoes());
        let err = store.load(json!({"error": "nope"}), &["data"]);
        assert!(err.is_err());
        assert_eq!(ids(&store), ["c1"]);

        let err = store.load(json!([{"_id": "x"}]), &[]);
        assert!(matches!(err, Err(ShapeError::BadElement { index: 0, .. })));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn create_appends_and_update_keeps_position() {
        let mut store = ResourceStore::new();
        store.replace(vec![shoes()]);
        let mut shirts = shoes();
        shirts.id = "c2".to_string();
        shirts.name = "Shirts".to_string();
        store.apply_create(shirts);

        let mut renamed = shoes();
        renamed.name = "Footwear".to_string();
        assert!(store.apply_update("c1", renamed));
        assert_eq!(ids(&store), ["c1", "c2"]);
        assert_eq!(store.get("c1").unwrap().name, "Footwear");
        assert!(!store.apply_update("zz", shoes()));
    }

    #[test]
    fn delete_removes_by_id() {
        let mut store = ResourceStore::new();
        store.replace(vec![shoes()]);
        assert!(store.apply_delete("c1").is_some());
        assert!(store.is_empty());
        assert!(store.apply_delete("c1").is_none());
    }
}
