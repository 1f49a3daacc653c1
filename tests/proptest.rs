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

//! Property-based tests for the stock adjustment engine.
//!
//! These tests verify invariants that should hold for any sequence of
//! orders and deliveries.

use bakery_inventory::{Config, Engine, InventoryError, RecordId, RecordKind, SortKey, catalog};
use proptest::prelude::*;
use std::collections::HashSet;
use tempfile::TempDir;

// =============================================================================
// Arbitrary Strategies
// =============================================================================

#[derive(Debug, Clone)]
enum Op {
    Deliver(usize, u32),
    Order(usize, u32),
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..catalog::CATALOG.len(), 1u32..=100).prop_map(|(item, q)| Op::Deliver(item, q)),
        (0..catalog::CATALOG.len(), 1u32..=100).prop_map(|(item, q)| Op::Order(item, q)),
    ]
}

fn fresh_engine() -> (TempDir, Engine) {
    let dir = TempDir::new().unwrap();
    let engine = Engine::open(&Config::in_dir(dir.path())).unwrap();
    (dir, engine)
}

fn stock(engine: &Engine, name: &str) -> u32 {
    engine.item(name).unwrap().quantity()
}

// =============================================================================
// Stock Invariant Tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Orders fail with InsufficientStock exactly when they exceed stock, and
    /// failures leave stock unchanged.
    #[test]
    fn orders_fail_iff_stock_is_short(ops in prop::collection::vec(arb_op(), 1..30)) {
        let (_dir, mut engine) = fresh_engine();

        for op in ops {
            match op {
                Op::Deliver(item, q) => {
                    let name = catalog::CATALOG[item];
                    let before = stock(&engine, name);
                    engine.record_delivery(name, q).unwrap();
                    prop_assert_eq!(stock(&engine, name), before + q);
                }
                Op::Order(item, q) => {
                    let name = catalog::CATALOG[item];
                    let before = stock(&engine, name);
                    let result = engine.place_order(name, q);
                    if q > before {
                        prop_assert_eq!(
                            result,
                            Err(InventoryError::InsufficientStock { available: before })
                        );
                        prop_assert_eq!(stock(&engine, name), before);
                    } else {
                        prop_assert!(result.is_ok());
                        prop_assert_eq!(stock(&engine, name), before - q);
                    }
                }
            }
        }
    }

    /// Stock equals delivered minus successfully ordered, per item.
    #[test]
    fn stock_matches_history(ops in prop::collection::vec(arb_op(), 1..30)) {
        let (_dir, mut engine) = fresh_engine();

        for op in ops {
            let _ = match op {
                Op::Deliver(item, q) => engine.record_delivery(catalog::CATALOG[item], q).map(|_| ()),
                Op::Order(item, q) => engine.place_order(catalog::CATALOG[item], q).map(|_| ()),
            };
        }

        let deliveries = engine.history(RecordKind::Delivery).unwrap();
        let orders = engine.history(RecordKind::Order).unwrap();
        for name in catalog::CATALOG {
            let delivered: u64 = deliveries.iter().filter(|e| e.item_name == name).map(|e| u64::from(e.quantity)).sum();
            let ordered: u64 = orders.iter().filter(|e| e.item_name == name).map(|e| u64::from(e.quantity)).sum();
            prop_assert_eq!(u64::from(stock(&engine, name)), delivered - ordered);
        }
    }

    /// IDs issued after a restart are greater than every ID issued before it.
    #[test]
    fn ids_never_repeat_across_restart(
        before in 0usize..8,
        after in 1usize..8,
    ) {
        let dir = TempDir::new().unwrap();
        let config = Config::in_dir(dir.path());
        let mut seen = HashSet::new();

        {
            let mut engine = Engine::open(&config).unwrap();
            for _ in 0..before {
                seen.insert(engine.record_delivery("Bread", 1).unwrap().id());
            }
        }

        let mut engine = Engine::open(&config).unwrap();
        let highest = seen.iter().copied().max().unwrap_or(RecordId(0));
        for _ in 0..after {
            let id = engine.record_delivery("Bread", 1).unwrap().id();
            prop_assert!(id > highest);
            prop_assert!(seen.insert(id));
        }
    }

    /// Reopening reproduces exactly the quantities last saved.
    #[test]
    fn snapshot_round_trips(quantities in prop::collection::vec(1u32..=500, 7)) {
        let dir = TempDir::new().unwrap();
        let config = Config::in_dir(dir.path());
        let saved = {
            let mut engine = Engine::open(&config).unwrap();
            for (name, q) in catalog::CATALOG.iter().zip(&quantities) {
                engine.record_delivery(name, *q).unwrap();
            }
            engine.list_items(SortKey::Insertion)
        };

        let engine = Engine::open(&config).unwrap();
        prop_assert_eq!(engine.list_items(SortKey::Insertion), saved);
    }
}
