//! Operator preferences
//!
//! Category favorites, category sort order and product search history, each
//! stored as one JSON entry in the key-value store. A missing or corrupt
//! entry reads as the default.

use crate::storage::{KeyValueStore, StorageResult, read_json, write_json};
use crate::utils::filter::normalize_search;
use serde::{Deserialize, Serialize};
use shared::models::Category;
use std::cmp::Ordering;
use std::collections::BTreeSet;

pub const FAVORITES_KEY: &str = "senor-arroz-category-favorites";
pub const CATEGORY_SORT_KEY: &str = "senor-arroz-category-sort";
pub const SEARCH_HISTORY_KEY: &str = "senor-arroz-search-history";

/// Entries kept in the search history
pub const MAX_SEARCH_HISTORY: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategorySort {
    #[default]
    Name,
    Custom,
    ProductCount,
}

pub struct Preferences<S: KeyValueStore> {
    storage: S,
}

impl<S: KeyValueStore> Preferences<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    // ========== Favorites ==========

    pub fn favorites(&self) -> BTreeSet<i64> {
        read_json::<Vec<i64>>(&self.storage, FAVORITES_KEY)
            .unwrap_or_default()
            .into_iter()
            .collect()
    }

    pub fn is_favorite(&self, category_id: i64) -> bool {
        self.favorites().contains(&category_id)
    }

    /// Flip a category's favorite flag, returning the new state
    pub fn toggle_favorite(&self, category_id: i64) -> StorageResult<bool> {
        let mut favorites = self.favorites();
        let now_favorite = if favorites.remove(&category_id) {
            false
        } else {
            favorites.insert(category_id)
        };
        let ids: Vec<i64> = favorites.into_iter().collect();
        write_json(&self.storage, FAVORITES_KEY, &ids)?;
        tracing::debug!(category_id, favorite = now_favorite, "Category favorite toggled");
        Ok(now_favorite)
    }

    // ========== Category sort ==========

    pub fn category_sort(&self) -> CategorySort {
        read_json(&self.storage, CATEGORY_SORT_KEY).unwrap_or_default()
    }

    pub fn set_category_sort(&self, sort: CategorySort) -> StorageResult<()> {
        write_json(&self.storage, CATEGORY_SORT_KEY, &sort)
    }

    /// Favorites first, then by the stored sort preference
    pub fn sort_categories(&self, categories: &mut [Category]) {
        let favorites = self.favorites();
        let sort = self.category_sort();
        categories.sort_by(|a, b| {
            let fav_a = favorites.contains(&a.id);
            let fav_b = favorites.contains(&b.id);
            fav_b
                .cmp(&fav_a)
                .then_with(|| compare_categories(a, b, sort))
        });
    }

    // ========== Search history ==========

    /// Most recent first
    pub fn search_history(&self) -> Vec<String> {
        read_json(&self.storage, SEARCH_HISTORY_KEY).unwrap_or_default()
    }

    /// Record a search; blank queries are ignored
    pub fn add_search(&self, query: &str) -> StorageResult<()> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(());
        }
        let lowered = query.to_lowercase();

        let mut history = self.search_history();
        history.retain(|q| q.to_lowercase() != lowered);
        history.insert(0, query.to_string());
        history.truncate(MAX_SEARCH_HISTORY);
        write_json(&self.storage, SEARCH_HISTORY_KEY, &history)
    }

    pub fn clear_search_history(&self) -> StorageResult<()> {
        self.storage.remove(SEARCH_HISTORY_KEY)
    }
}

fn compare_categories(a: &Category, b: &Category, sort: CategorySort) -> Ordering {
    let by_name = || normalize_search(&a.name).cmp(&normalize_search(&b.name));
    match sort {
        CategorySort::Name => by_name(),
        CategorySort::Custom => a.sort_order.cmp(&b.sort_order).then_with(by_name),
        CategorySort::ProductCount => b.product_count.cmp(&a.product_count).then_with(by_name),
    }
}
