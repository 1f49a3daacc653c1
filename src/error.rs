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

//! Error types for inventory operations.

use crate::transaction::RecordKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Inventory operation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InventoryError {
    /// Referenced item name or ID is not in the inventory
    #[error("item not found: {item}")]
    NotFound { item: String },

    /// Quantity is zero, item name is empty, or the result would overflow
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Order quantity exceeds the current stock
    #[error("insufficient stock: only {available} available")]
    InsufficientStock { available: u32 },

    /// Administrative override attempted without authorization
    #[error("not authorized to override stock levels")]
    Unauthorized,

    /// Every record ID of this kind has already been issued
    #[error("no {kind} IDs left to issue")]
    IdsExhausted { kind: RecordKind },

    /// Reading or writing a data file failed
    #[error("persistence failure at {}: {reason}", .path.display())]
    Persistence { path: PathBuf, reason: String },
}

impl InventoryError {
    pub(crate) fn not_found(item: impl ToString) -> Self {
        InventoryError::NotFound {
            item: item.to_string(),
        }
    }

    pub(crate) fn persistence(path: &Path, err: impl std::fmt::Display) -> Self {
        InventoryError::Persistence {
            path: path.to_path_buf(),
            reason: err.to_string(),
        }
    }
}
