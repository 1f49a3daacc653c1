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

//! The fixed catalog of items the bakery sells.
//!
//! Item IDs are the positions in [`CATALOG`] and never change. A fresh
//! inventory contains exactly one item per entry.

use crate::base::ItemId;

/// Item names in ID order.
pub const CATALOG: [&str; 7] = [
    "Bread", "Brownies", "Cake", "Cookies", "Cupcakes", "Danish", "Donut",
];

/// Returns `(id, name)` pairs for every catalog entry.
pub fn entries() -> impl Iterator<Item = (ItemId, &'static str)> {
    CATALOG
        .iter()
        .enumerate()
        .map(|(index, name)| (ItemId(index as u32), *name))
}

/// Looks up the catalog name for an item ID.
pub fn name_of(id: ItemId) -> Option<&'static str> {
    CATALOG.get(id.0 as usize).copied()
}
