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

//! Stock adjustment engine.
//!
//! The [`Engine`] owns the inventory store, the identifier allocator and the
//! two transaction logs, and is the only way the presentation layer changes
//! stock.
//!
//! # Operations
//!
//! - **Deliveries**: add stock to an existing item.
//! - **Orders**: remove stock, rejected when stock is insufficient.
//! - **Overrides**: set a quantity directly, only with authorization.
//!
//! Every operation validates first, then mutates memory, then persists: the
//! log record is appended and the snapshot rewritten. A rejected request
//! leaves memory and disk untouched. If persisting fails the in-memory
//! quantity is restored, so memory never runs ahead of the snapshot.

use crate::InventoryError;
use crate::allocator::IdAllocator;
use crate::base::{ItemId, RecordId};
use crate::config::Config;
use crate::item::{InventoryItem, StockLevel};
use crate::ledger::{LogEntry, TransactionLog};
use crate::store::{InventoryStore, SortKey};
use crate::transaction::{Delivery, Order, RecordKind};
use serde::Serialize;
use std::fs;
use tracing::{debug, error, info};

/// Outcome of the external credential check guarding overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Authorization {
    Granted,
    Denied,
}

impl From<bool> for Authorization {
    fn from(authorized: bool) -> Self {
        if authorized {
            Authorization::Granted
        } else {
            Authorization::Denied
        }
    }
}

/// One row of the stock report: an item, its level and its share of all stock.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockReportRow {
    pub id: ItemId,
    pub name: String,
    pub quantity: u32,
    pub level: StockLevel,
    /// Percentage of total stock, 0 when there is no stock at all.
    pub share: f64,
}

/// Applies orders and deliveries to the inventory and persists them.
///
/// # Invariants
///
/// - Quantities never go negative.
/// - Record IDs are unique per kind, across restarts.
/// - The snapshot file reflects every committed operation.
#[derive(Debug)]
pub struct Engine {
    store: InventoryStore,
    ids: IdAllocator,
    orders: TransactionLog,
    deliveries: TransactionLog,
}

impl Engine {
    /// Opens the data files described by `config`.
    ///
    /// Creates the data directory and a fresh snapshot when missing, then
    /// replays both logs to reseed the identifier allocator. Quantities come
    /// from the snapshot only; log records are never re-applied.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::Persistence`] if the directory or files
    /// cannot be created or read.
    pub fn open(config: &Config) -> Result<Self, InventoryError> {
        fs::create_dir_all(&config.data_dir)
            .map_err(|e| InventoryError::persistence(&config.data_dir, e))?;

        let store = InventoryStore::load(config.inventory_path())?;
        let orders = TransactionLog::open(config.orders_path(), Order::KIND, config.log_format)?;
        let deliveries =
            TransactionLog::open(config.deliveries_path(), Delivery::KIND, config.log_format)?;

        let mut ids = IdAllocator::new();
        for log in [&orders, &deliveries] {
            let highest = log.highest_id()?;
            ids.reseed(log.kind(), highest);
            debug!(kind = %log.kind(), %highest, lines = log.lines(), "reseeded identifiers");
        }

        Ok(Self {
            store,
            ids,
            orders,
            deliveries,
        })
    }

    pub fn store(&self) -> &InventoryStore {
        &self.store
    }

    /// Returns every item in the requested order.
    pub fn list_items(&self, sort: SortKey) -> Vec<InventoryItem> {
        self.store.items(sort)
    }

    /// Looks up one item by name.
    pub fn item(&self, name: &str) -> Result<&InventoryItem, InventoryError> {
        self.store.get(name)
    }

    /// ID the next record of `kind` will receive.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::IdsExhausted`] when no IDs of `kind` are left.
    pub fn next_id(&self, kind: RecordKind) -> Result<RecordId, InventoryError> {
        self.ids.peek(kind)
    }

    /// Records stock received for `item_name`.
    ///
    /// # Errors
    ///
    /// - [`InventoryError::InvalidInput`] - Empty name, zero quantity, or overflow.
    /// - [`InventoryError::NotFound`] - No item with that name.
    /// - [`InventoryError::IdsExhausted`] - No delivery IDs are left.
    /// - [`InventoryError::Persistence`] - The log or snapshot could not be written.
    pub fn record_delivery(
        &mut self,
        item_name: &str,
        quantity: u32,
    ) -> Result<Delivery, InventoryError> {
        validate_request(item_name, quantity)?;

        let item = self.store.get_mut(item_name)?;
        let id = self.ids.peek(Delivery::KIND)?;
        let previous = item.quantity();
        item.restock(quantity)?;

        self.commit(Delivery::KIND, id, item_name, quantity, previous)?;
        info!(%id, item = item_name, quantity, "delivery recorded");
        Ok(Delivery::new(id, item_name, quantity))
    }

    /// Records stock sold from `item_name`.
    ///
    /// # Errors
    ///
    /// - [`InventoryError::InvalidInput`] - Empty name or zero quantity.
    /// - [`InventoryError::NotFound`] - No item with that name.
    /// - [`InventoryError::InsufficientStock`] - `quantity` exceeds current stock.
    /// - [`InventoryError::IdsExhausted`] - No order IDs are left.
    /// - [`InventoryError::Persistence`] - The log or snapshot could not be written.
    pub fn place_order(&mut self, item_name: &str, quantity: u32) -> Result<Order, InventoryError> {
        validate_request(item_name, quantity)?;

        let item = self.store.get_mut(item_name)?;
        let id = self.ids.peek(Order::KIND)?;
        let previous = item.quantity();
        item.consume(quantity)?;

        self.commit(Order::KIND, id, item_name, quantity, previous)?;
        info!(%id, item = item_name, quantity, "order placed");
        Ok(Order::new(id, item_name, quantity))
    }

    /// Overwrites the stock of `item_id`. Writes no log record.
    ///
    /// # Errors
    ///
    /// - [`InventoryError::Unauthorized`] - `authorization` is not granted.
    /// - [`InventoryError::NotFound`] - No item with that ID.
    /// - [`InventoryError::Persistence`] - The snapshot could not be written.
    pub fn update_quantity(
        &mut self,
        item_id: ItemId,
        quantity: u32,
        authorization: Authorization,
    ) -> Result<(), InventoryError> {
        if authorization != Authorization::Granted {
            return Err(InventoryError::Unauthorized);
        }

        let item = self.store.get_mut_by_id(item_id)?;
        let previous = item.quantity();
        item.set_quantity(quantity);

        if let Err(e) = self.store.save() {
            error!(item = %item_id, "failed to save inventory, reverting override: {e}");
            self.store.set_quantity_by_id(item_id, previous)?;
            return Err(e);
        }
        info!(item = %item_id, from = previous, to = quantity, "quantity overridden");
        Ok(())
    }

    /// Level and share of total stock for every item, in ID order.
    pub fn stock_report(&self) -> Vec<StockReportRow> {
        let total = self.store.total_quantity();
        self.store
            .items(SortKey::Id)
            .into_iter()
            .map(|item| StockReportRow {
                id: item.id(),
                name: item.name().to_string(),
                quantity: item.quantity(),
                level: item.stock_level(),
                share: if total == 0 {
                    0.0
                } else {
                    f64::from(item.quantity()) * 100.0 / total as f64
                },
            })
            .collect()
    }

    /// Replays the log of `kind` from disk.
    pub fn history(&self, kind: RecordKind) -> Result<Vec<LogEntry>, InventoryError> {
        self.log(kind).replay()
    }

    fn log(&self, kind: RecordKind) -> &TransactionLog {
        match kind {
            RecordKind::Order => &self.orders,
            RecordKind::Delivery => &self.deliveries,
        }
    }

    fn log_mut(&mut self, kind: RecordKind) -> &mut TransactionLog {
        match kind {
            RecordKind::Order => &mut self.orders,
            RecordKind::Delivery => &mut self.deliveries,
        }
    }

    /// Persists an already-applied stock change under the peeked `id`,
    /// restoring `previous` on failure.
    ///
    /// The ID is only consumed once the log record is written; a failed
    /// snapshot save after that keeps it consumed because the line exists.
    fn commit(
        &mut self,
        kind: RecordKind,
        id: RecordId,
        item_name: &str,
        quantity: u32,
        previous: u32,
    ) -> Result<(), InventoryError> {
        let entry = LogEntry {
            id,
            item_name: item_name.to_string(),
            quantity,
        };

        if let Err(e) = self.log_mut(kind).append(&entry) {
            error!(%kind, item = item_name, "failed to append log record: {e}");
            self.store.set_quantity(item_name, previous)?;
            return Err(e);
        }
        let issued = self.ids.next_id(kind)?;
        debug_assert_eq!(issued, id);

        if let Err(e) = self.store.save() {
            error!(%kind, %id, item = item_name, "failed to save inventory after logging: {e}");
            self.store.set_quantity(item_name, previous)?;
            return Err(e);
        }
        Ok(())
    }
}

fn validate_request(item_name: &str, quantity: u32) -> Result<(), InventoryError> {
    if item_name.trim().is_empty() {
        return Err(InventoryError::InvalidInput("no item selected".into()));
    }
    if quantity == 0 {
        return Err(InventoryError::InvalidInput(
            "quantity must be positive".into(),
        ));
    }
    Ok(())
}
