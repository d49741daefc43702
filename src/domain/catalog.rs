//! In-memory catalog index.

use std::collections::HashMap;

use super::rarity::Rarity;
use super::skin::SkinCatalogItem;

/// Read-only catalog lookups needed by the outcome engine.
pub trait CatalogLookup: Send + Sync {
    /// Find a skin by exact (name, collection).
    fn get(&self, name: &str, collection: &str) -> Option<&SkinCatalogItem>;

    /// All skins of `rarity` in `collection`, in catalog order. Empty if none.
    fn outcomes_for(&self, collection: &str, rarity: Rarity) -> &[SkinCatalogItem];
}

/// Skin catalog indexed by (name, collection) and by (collection, rarity).
///
/// Built once and shared read-only across evaluations.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: Vec<SkinCatalogItem>,
    by_name_collection: HashMap<(String, String), usize>,
    by_collection_rarity: HashMap<(String, Rarity), Vec<SkinCatalogItem>>,
}

impl Catalog {
    pub fn new(items: Vec<SkinCatalogItem>) -> Self {
        let mut by_name_collection = HashMap::with_capacity(items.len());
        let mut by_collection_rarity: HashMap<(String, Rarity), Vec<SkinCatalogItem>> =
            HashMap::new();

        for (idx, item) in items.iter().enumerate() {
            // Duplicate rows: the last one wins for direct lookup.
            by_name_collection.insert((item.name.clone(), item.collection.clone()), idx);
            by_collection_rarity
                .entry((item.collection.clone(), item.rarity))
                .or_default()
                .push(item.clone());
        }

        Self {
            items,
            by_name_collection,
            by_collection_rarity,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[SkinCatalogItem] {
        &self.items
    }
}

impl CatalogLookup for Catalog {
    fn get(&self, name: &str, collection: &str) -> Option<&SkinCatalogItem> {
        self.by_name_collection
            .get(&(name.to_string(), collection.to_string()))
            .map(|&idx| &self.items[idx])
    }

    fn outcomes_for(&self, collection: &str, rarity: Rarity) -> &[SkinCatalogItem] {
        self.by_collection_rarity
            .get(&(collection.to_string(), rarity))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
