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

//! Inventory items and their stock transitions.
//!
//! # Example
//!
//! ```
//! use bakery_inventory::{InventoryItem, ItemId, StockLevel};
//!
//! let item = InventoryItem::new(ItemId(0), "Bread", 0);
//! assert_eq!(item.quantity(), 0);
//! assert_eq!(item.stock_level(), StockLevel::Low);
//! ```

use crate::InventoryError;
use crate::base::ItemId;
use serde::Serialize;

/// One catalog item and its current stock.
///
/// Only the quantity is mutable, and only through the stock transitions
/// below. The unsigned quantity keeps stock from ever going negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventoryItem {
    id: ItemId,
    name: String,
    quantity: u32,
}

impl InventoryItem {
    /// Quantity at or below which stock counts as low.
    pub const LOW_STOCK: u32 = 5;
    /// Quantity at or above which stock counts as high.
    pub const HIGH_STOCK: u32 = 50;

    pub fn new(id: ItemId, name: impl Into<String>, quantity: u32) -> Self {
        Self {
            id,
            name: name.into(),
            quantity,
        }
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn stock_level(&self) -> StockLevel {
        StockLevel::for_quantity(self.quantity)
    }

    /// Adds delivered stock.
    pub(crate) fn restock(&mut self, quantity: u32) -> Result<(), InventoryError> {
        if quantity == 0 {
            return Err(InventoryError::InvalidInput(
                "quantity must be positive".into(),
            ));
        }
        self.quantity = self.quantity.checked_add(quantity).ok_or_else(|| {
            InventoryError::InvalidInput(format!(
                "delivery of {quantity} would overflow stock of {}",
                self.name
            ))
        })?;
        Ok(())
    }

    /// Removes ordered stock.
    pub(crate) fn consume(&mut self, quantity: u32) -> Result<(), InventoryError> {
        if quantity == 0 {
            return Err(InventoryError::InvalidInput(
                "quantity must be positive".into(),
            ));
        }
        if self.quantity < quantity {
            return Err(InventoryError::InsufficientStock {
                available: self.quantity,
            });
        }
        self.quantity -= quantity;
        Ok(())
    }

    /// Overwrites the quantity (administrative override and rollback).
    pub(crate) fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity;
    }
}

/// Coarse classification of an item's stock, for highlighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StockLevel {
    Low,
    Normal,
    High,
}

impl StockLevel {
    pub fn for_quantity(quantity: u32) -> Self {
        if quantity <= InventoryItem::LOW_STOCK {
            StockLevel::Low
        } else if quantity >= InventoryItem::HIGH_STOCK {
            StockLevel::High
        } else {
            StockLevel::Normal
        }
    }
}
