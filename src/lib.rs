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

//! # Bakery Inventory
//!
//! This library tracks the stock of a small bakery: it applies incoming
//! deliveries and outgoing orders to per-item quantities and keeps the
//! on-disk files consistent with them.
//!
//! ## Core Components
//!
//! - [`Engine`]: Applies orders, deliveries and overrides, then persists them
//! - [`InventoryStore`]: Current quantities, saved as a full snapshot file
//! - [`TransactionLog`]: Append-only order and delivery logs
//! - [`IdAllocator`]: Per-kind record IDs, reseeded from the logs on startup
//! - [`InventoryError`]: Error types for rejected or failed operations
//!
//! ## Example
//!
//! ```
//! use bakery_inventory::{Config, Engine, InventoryError};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let mut engine = Engine::open(&Config::in_dir(dir.path())).unwrap();
//!
//! engine.record_delivery("Bread", 20).unwrap();
//! assert_eq!(
//!     engine.place_order("Bread", 25),
//!     Err(InventoryError::InsufficientStock { available: 20 })
//! );
//!
//! let order = engine.place_order("Bread", 15).unwrap();
//! assert_eq!(order.id().0, 1);
//! assert_eq!(engine.item("Bread").unwrap().quantity(), 5);
//! ```
//!
//! ## Concurrency
//!
//! The engine is a single sequential actor. Mutating operations take
//! `&mut self`; there is no locking and no file locking, so only one process
//! should use a data directory at a time.

mod allocator;
mod base;
pub mod catalog;
mod config;
mod engine;
pub mod error;
mod item;
mod ledger;
mod store;
mod transaction;

pub use allocator::IdAllocator;
pub use base::{ItemId, RecordId};
pub use config::Config;
pub use engine::{Authorization, Engine, StockReportRow};
pub use error::InventoryError;
pub use item::{InventoryItem, StockLevel};
pub use ledger::{LogEntry, LogFormat, TransactionLog};
pub use store::{InventoryStore, SortKey};
pub use transaction::{Delivery, Order, RecordKind};
