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

//! Per-kind record identifier allocation.
//!
//! Orders and deliveries draw from independent counters. Each counter starts
//! at 1 and only moves forward, so an ID is never handed out twice for the
//! same kind, including across restarts once the counter has been reseeded
//! from the persisted logs.

use crate::InventoryError;
use crate::base::RecordId;
use crate::transaction::RecordKind;

/// Issues monotonically increasing [`RecordId`]s per [`RecordKind`].
///
/// Counters are wider than [`RecordId`] so the last representable ID can be
/// issued once and every later request reports exhaustion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdAllocator {
    next_order: u64,
    next_delivery: u64,
}

impl IdAllocator {
    /// Creates an allocator for a fresh system.
    pub fn new() -> Self {
        Self {
            next_order: 1,
            next_delivery: 1,
        }
    }

    /// Returns the ID the next call to [`next_id`](Self::next_id) will issue.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::IdsExhausted`] once every ID of `kind` has
    /// been issued.
    pub fn peek(&self, kind: RecordKind) -> Result<RecordId, InventoryError> {
        u32::try_from(*self.counter(kind))
            .map(RecordId)
            .map_err(|_| InventoryError::IdsExhausted { kind })
    }

    /// Issues the next unused ID for `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::IdsExhausted`] once every ID of `kind` has
    /// been issued.
    pub fn next_id(&mut self, kind: RecordKind) -> Result<RecordId, InventoryError> {
        let id = self.peek(kind)?;
        *self.counter_mut(kind) += 1;
        Ok(id)
    }

    /// Advances the counter past `highest_seen`. Never moves it backwards.
    pub fn reseed(&mut self, kind: RecordKind, highest_seen: RecordId) {
        let counter = self.counter_mut(kind);
        *counter = (*counter).max(u64::from(highest_seen.0) + 1);
    }

    fn counter(&self, kind: RecordKind) -> &u64 {
        match kind {
            RecordKind::Order => &self.next_order,
            RecordKind::Delivery => &self.next_delivery,
        }
    }

    fn counter_mut(&mut self, kind: RecordKind) -> &mut u64 {
        match kind {
            RecordKind::Order => &mut self.next_order,
            RecordKind::Delivery => &mut self.next_delivery,
        }
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}
