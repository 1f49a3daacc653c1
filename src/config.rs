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

//! Data file locations and log settings.

use crate::ledger::LogFormat;
use std::path::PathBuf;

/// Where the engine keeps its files and how it writes log lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory holding all data files. Created on open if missing.
    pub data_dir: PathBuf,
    /// Snapshot file name, relative to `data_dir`.
    pub inventory_file: String,
    /// Order log file name, relative to `data_dir`.
    pub orders_file: String,
    /// Delivery log file name, relative to `data_dir`.
    pub deliveries_file: String,
    pub log_format: LogFormat,
}

impl Config {
    pub const DEFAULT_INVENTORY_FILE: &'static str = "inventory.txt";
    pub const DEFAULT_ORDERS_FILE: &'static str = "orders.txt";
    pub const DEFAULT_DELIVERIES_FILE: &'static str = "deliveries.txt";

    /// Default file names inside `data_dir`.
    pub fn in_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    pub fn with_log_format(mut self, log_format: LogFormat) -> Self {
        self.log_format = log_format;
        self
    }

    pub fn inventory_path(&self) -> PathBuf {
        self.data_dir.join(&self.inventory_file)
    }

    pub fn orders_path(&self) -> PathBuf {
        self.data_dir.join(&self.orders_file)
    }

    pub fn deliveries_path(&self) -> PathBuf {
        self.data_dir.join(&self.deliveries_file)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            inventory_file: Self::DEFAULT_INVENTORY_FILE.to_string(),
            orders_file: Self::DEFAULT_ORDERS_FILE.to_string(),
            deliveries_file: Self::DEFAULT_DELIVERIES_FILE.to_string(),
            log_format: LogFormat::Legacy,
        }
    }
}
