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

//! Order and delivery records.
//!
//! Records are immutable facts about history. They refer to inventory items
//! by name only and hold no reference into the store.

use crate::base::RecordId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which stream a record belongs to. IDs are allocated per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Order,
    Delivery,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Order => f.write_str("order"),
            RecordKind::Delivery => f.write_str("delivery"),
        }
    }
}

/// Stock sold to a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Order {
    id: RecordId,
    item_name: String,
    quantity: u32,
}

/// Stock received from a supplier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Delivery {
    id: RecordId,
    item_name: String,
    quantity: u32,
}

macro_rules! record_accessors {
    ($ty:ident, $kind:expr) => {
        impl $ty {
            pub(crate) fn new(id: RecordId, item_name: impl Into<String>, quantity: u32) -> Self {
                Self {
                    id,
                    item_name: item_name.into(),
                    quantity,
                }
            }

            pub const KIND: RecordKind = $kind;

            pub fn id(&self) -> RecordId {
                self.id
            }

            pub fn item_name(&self) -> &str {
                &self.item_name
            }

            pub fn quantity(&self) -> u32 {
                self.quantity
            }
        }
    };
}

record_accessors!(Order, RecordKind::Order);
record_accessors!(Delivery, RecordKind::Delivery);
