// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Inventory snapshot store.
//!
//! The store holds the current quantity of every item and persists it as a
//! full snapshot, one item per line:
//!
//! ```text
//! 0 Bread 20
//! 1 Brownies 0
//! ```
//!
//! Every save rewrites the whole file. Nothing is ever appended.

use crate::base::ItemId;
use crate::item::InventoryItem;
use crate::{InventoryError, catalog};
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use std::collections::HashSet;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info, warn};

/// Ordering for [`InventoryStore::items`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Snapshot file order.
    #[default]
    Insertion,
    /// Item ID ascending.
    Id,
    /// Quantity ascending, ties broken by ID.
    Quantity,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "insertion" => Ok(SortKey::Insertion),
            "id" => Ok(SortKey::Id),
            "quantity" => Ok(SortKey::Quantity),
            other => Err(format!(
                "unknown sort key '{other}' (expected 'insertion', 'id' or 'quantity')"
            )),
        }
    }
}

/// In-memory inventory backed by a snapshot file.
#[derive(Debug, Clone)]
pub struct InventoryStore {
    path: PathBuf,
    items: Vec<InventoryItem>,
}

impl InventoryStore {
    /// Loads the snapshot at `path`, creating it from the catalog if absent.
    ///
    /// A fresh snapshot holds every catalog item at quantity 0 and is written
    /// to disk before returning. Malformed lines in an existing snapshot are
    /// skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::Persistence`] if the file exists but cannot
    /// be read, or if a fresh snapshot cannot be written.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, InventoryError> {
        let path = path.into();
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!(path = %path.display(), "inventory file not found, creating from catalog");
                let store = Self::from_catalog(path);
                store.save()?;
                return Ok(store);
            }
            Err(e) => return Err(InventoryError::persistence(&path, e)),
        };

        let mut rdr = ReaderBuilder::new()
            .has_headers(false)
            .delimiter(b' ')
            .flexible(true)
            .from_reader(file);

        let mut items: Vec<InventoryItem> = Vec::new();
        let mut seen_ids = HashSet::new();
        let mut seen_names = HashSet::new();
        for (index, result) in rdr.records().enumerate() {
            let line = index + 1;
            let record = match result {
                Ok(record) => record,
                Err(e) if e.is_io_error() => return Err(InventoryError::persistence(&path, e)),
                Err(e) => {
                    warn!(path = %path.display(), line, "skipping unreadable inventory line: {e}");
                    continue;
                }
            };
            let Some(item) = parse_item(&record) else {
                warn!(path = %path.display(), line, "skipping malformed inventory line: {record:?}");
                continue;
            };
            if !seen_ids.insert(item.id()) || !seen_names.insert(item.name().to_string()) {
                warn!(path = %path.display(), line, "skipping duplicate inventory item {}", item.name());
                continue;
            }
            items.push(item);
        }

        if items.len() != catalog::CATALOG.len() {
            warn!(
                path = %path.display(),
                loaded = items.len(),
                expected = catalog::CATALOG.len(),
                "inventory file does not cover the full catalog"
            );
        }
        debug!(path = %path.display(), items = items.len(), "loaded inventory");
        Ok(Self { path, items })
    }

    /// Builds an unsaved store with every catalog item at quantity 0.
    pub fn from_catalog(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            items: catalog::entries()
                .map(|(id, name)| InventoryItem::new(id, name, 0))
                .collect(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items in snapshot order.
    pub fn iter(&self) -> impl Iterator<Item = &InventoryItem> {
        self.items.iter()
    }

    /// Sum of all quantities.
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity())).sum()
    }

    /// Returns a copy of every item in the requested order.
    pub fn items(&self, sort: SortKey) -> Vec<InventoryItem> {
        let mut items = self.items.clone();
        match sort {
            SortKey::Insertion => {}
            SortKey::Id => items.sort_by_key(|item| item.id()),
            SortKey::Quantity => items.sort_by_key(|item| (item.quantity(), item.id())),
        }
        items
    }

    /// Looks up an item by name.
    pub fn get(&self, name: &str) -> Result<&InventoryItem, InventoryError> {
        self.items
            .iter()
            .find(|item| item.name() == name)
            .ok_or_else(|| InventoryError::not_found(name))
    }

    /// Looks up an item by ID.
    pub fn get_by_id(&self, id: ItemId) -> Result<&InventoryItem, InventoryError> {
        self.items
            .iter()
            .find(|item| item.id() == id)
            .ok_or_else(|| InventoryError::not_found(format!("#{id}")))
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Result<&mut InventoryItem, InventoryError> {
        self.items
            .iter_mut()
            .find(|item| item.name() == name)
            .ok_or_else(|| InventoryError::not_found(name))
    }

    pub(crate) fn get_mut_by_id(&mut self, id: ItemId) -> Result<&mut InventoryItem, InventoryError> {
        self.items
            .iter_mut()
            .find(|item| item.id() == id)
            .ok_or_else(|| InventoryError::not_found(format!("#{id}")))
    }

    /// Overwrites the quantity of the named item in memory.
    pub fn set_quantity(&mut self, name: &str, quantity: u32) -> Result<(), InventoryError> {
        self.get_mut(name)?.set_quantity(quantity);
        Ok(())
    }

    /// Overwrites the quantity of the item with `id` in memory.
    pub fn set_quantity_by_id(&mut self, id: ItemId, quantity: u32) -> Result<(), InventoryError> {
        self.get_mut_by_id(id)?.set_quantity(quantity);
        Ok(())
    }

    /// Rewrites the snapshot file from the in-memory state.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::Persistence`] if the file cannot be created
    /// or written.
    pub fn save(&self) -> Result<(), InventoryError> {
        let file = File::create(&self.path).map_err(|e| InventoryError::persistence(&self.path, e))?;
        let mut wtr = WriterBuilder::new()
            .has_headers(false)
            .delimiter(b' ')
            .from_writer(file);

        for item in &self.items {
            wtr.write_record([
                item.id().to_string().as_str(),
                item.name(),
                item.quantity().to_string().as_str(),
            ])
            .map_err(|e| InventoryError::persistence(&self.path, e))?;
        }

        // Flush explicitly so write errors surface instead of being lost on drop.
        wtr.flush()
            .map_err(|e| InventoryError::persistence(&self.path, e))?;
        debug!(path = %self.path.display(), items = self.items.len(), "saved inventory");
        Ok(())
    }
}

/// Parses `<id> <name> <quantity>`, tolerating repeated spaces.
fn parse_item(record: &StringRecord) -> Option<InventoryItem> {
    let mut fields = record.iter().map(str::trim).filter(|field| !field.is_empty());
    let id = fields.next()?.parse::<u32>().ok()?;
    let name = fields.next()?;
    let quantity = fields.next()?.parse::<u32>().ok()?;
    Some(InventoryItem::new(ItemId(id), name, quantity))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn missing_file_is_created_from_catalog() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("inventory.txt");

        let store = InventoryStore::load(&path).unwrap();

        assert_eq!(store.len(), 7);
        assert!(store.iter().all(|item| item.quantity() == 0));
        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(
            contents,
            "0 Bread 0\n1 Brownies 0\n2 Cake 0\n3 Cookies 0\n4 Cupcakes 0\n5 Danish 0\n6 Donut 0\n"
        );
    }

    #[test]
    fn load_parses_existing_snapshot() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("inventory.txt");
        fs::write(&path, "0 Bread 20\n3 Cookies 4\n").unwrap();

        let store = InventoryStore::load(&path).unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.get("Bread").unwrap().quantity(), 20);
        assert_eq!(store.get_by_id(ItemId(3)).unwrap().name(), "Cookies");
    }

    #[test]
    fn load_skips_malformed_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("inventory.txt");
        fs::write(
            &path,
            "0 Bread 20\ngarbage\n1 Brownies -3\nx Cake 2\n3  Cookies   4\n",
        )
        .unwrap();

        let store = InventoryStore::load(&path).unwrap();

        let names: Vec<&str> = store.iter().map(|item| item.name()).collect();
        assert_eq!(names, vec!["Bread", "Cookies"]);
        assert_eq!(store.get("Cookies").unwrap().quantity(), 4);
    }

    #[test]
    fn load_skips_duplicate_items() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("inventory.txt");
        fs::write(&path, "0 Bread 20\n0 Bagel 1\n1 Bread 5\n").unwrap();

        let store = InventoryStore::load(&path).unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("Bread").unwrap().quantity(), 20);
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("inventory.txt");
        let mut store = InventoryStore::load(&path).unwrap();
        store.set_quantity("Cake", 12).unwrap();
        store.set_quantity_by_id(ItemId(6), 55).unwrap();
        store.save().unwrap();

        let reloaded = InventoryStore::load(&path).unwrap();

        assert_eq!(reloaded.items(SortKey::Insertion), store.items(SortKey::Insertion));
    }

    #[test]
    fn unknown_items_are_not_found() {
        let store = InventoryStore::from_catalog("unused.txt");
        assert_eq!(
            store.get("Baguette"),
            Err(InventoryError::not_found("Baguette"))
        );
        assert!(matches!(
            store.get_by_id(ItemId(42)),
            Err(InventoryError::NotFound { .. })
        ));
    }

    #[test]
    fn items_sort_by_quantity_then_id() {
        let mut store = InventoryStore::from_catalog("unused.txt");
        store.set_quantity("Bread", 9).unwrap();
        store.set_quantity("Cake", 1).unwrap();
        store.set_quantity("Donut", 1).unwrap();

        let ids: Vec<u32> = store
            .items(SortKey::Quantity)
            .iter()
            .map(|item| item.id().0)
            .collect();
        assert_eq!(ids, vec![1, 3, 4, 5, 2, 6, 0]);
    }

    #[test]
    fn sort_key_parses() {
        assert_eq!("ID".parse::<SortKey>(), Ok(SortKey::Id));
        assert_eq!("quantity".parse::<SortKey>(), Ok(SortKey::Quantity));
        assert!("price".parse::<SortKey>().is_err());
    }
}
