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

use bakery_inventory::{
    Authorization, Config, Engine, InventoryError, InventoryItem, ItemId, LogEntry, LogFormat,
    RecordKind, SortKey, StockLevel, StockReportRow,
};
use clap::{Parser, Subcommand, ValueEnum};
use csv::Writer;
use serde::Serialize;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Bakery Inventory - Track stock through orders and deliveries
///
/// Reads and updates the inventory snapshot and the order/delivery logs in
/// the data directory. Tabular output is CSV on stdout; diagnostics go to
/// stderr and are controlled by RUST_LOG.
#[derive(Parser, Debug)]
#[command(name = "bakery-inventory")]
#[command(about = "Track bakery stock through orders and deliveries", long_about = None)]
struct Args {
    /// Directory holding inventory.txt, orders.txt and deliveries.txt
    #[arg(long, env = "BAKERY_DATA_DIR", default_value = ".", value_name = "DIR")]
    data_dir: PathBuf,

    /// Log line layout: legacy (name,quantity) or identified (id,name,quantity)
    #[arg(long, env = "BAKERY_LOG_FORMAT", default_value = "legacy", value_name = "FORMAT")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every item with its current quantity
    List {
        /// Ordering: insertion, id or quantity
        #[arg(long, default_value = "insertion")]
        sort: SortKey,
    },
    /// Sell stock of an item
    Order { item: String, quantity: u32 },
    /// Receive stock of an item
    Deliver { item: String, quantity: u32 },
    /// Overwrite the quantity of an item (requires login)
    Set {
        item_id: u32,
        quantity: u32,
        #[arg(long)]
        user: String,
        #[arg(long)]
        password: String,
    },
    /// Show stock level and share of total stock per item
    Report,
    /// Show the recorded orders or deliveries
    History {
        #[arg(value_enum)]
        kind: HistoryKind,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum HistoryKind {
    Orders,
    Deliveries,
}

impl From<HistoryKind> for RecordKind {
    fn from(kind: HistoryKind) -> Self {
        match kind {
            HistoryKind::Orders => RecordKind::Order,
            HistoryKind::Deliveries => RecordKind::Delivery,
        }
    }
}

#[derive(Error, Debug)]
enum CliError {
    #[error(transparent)]
    Inventory(#[from] InventoryError),

    #[error("error writing output: {0}")]
    Output(#[from] csv::Error),

    #[error("error reading credentials: {0}")]
    Credentials(#[from] io::Error),

    #[error("login failed")]
    LoginFailed,
}

/// File holding the override credentials: username line, then password line.
const CREDENTIALS_FILE: &str = "login.dat";
const DEFAULT_USER: &str = "CookieMonsta";
const DEFAULT_PASSWORD: &str = "ILuvCookies";

fn main() {
    let args = Args::parse();
    init_tracing();

    if let Err(e) = run(args, io::stdout()) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Installs a stderr subscriber filtered by `RUST_LOG` (default `warn`).
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn run<W: Write>(args: Args, out: W) -> Result<(), CliError> {
    let config = Config::in_dir(&args.data_dir).with_log_format(args.log_format);
    let mut engine = Engine::open(&config)?;

    match args.command {
        Command::List { sort } => write_items(&engine.list_items(sort), out)?,
        Command::Order { item, quantity } => {
            let order = engine.place_order(&item, quantity)?;
            write_rows([order], out)?;
        }
        Command::Deliver { item, quantity } => {
            let delivery = engine.record_delivery(&item, quantity)?;
            write_rows([delivery], out)?;
        }
        Command::Set {
            item_id,
            quantity,
            user,
            password,
        } => {
            let authorized = check_login(&config.data_dir.join(CREDENTIALS_FILE), &user, &password)?;
            if !authorized {
                return Err(CliError::LoginFailed);
            }
            let item_id = ItemId(item_id);
            engine.update_quantity(item_id, quantity, Authorization::from(authorized))?;
            write_items(&[engine.store().get_by_id(item_id)?.clone()], out)?;
        }
        Command::Report => write_report(&engine.stock_report(), out)?,
        Command::History { kind } => write_history(&engine.history(kind.into())?, out)?,
    }
    Ok(())
}

/// Compares the given credentials against the credentials file.
///
/// The file is created with the default credentials when missing.
fn check_login(path: &Path, user: &str, password: &str) -> io::Result<bool> {
    if !path.exists() {
        fs::write(path, format!("{DEFAULT_USER}\n{DEFAULT_PASSWORD}\n"))?;
    }
    let contents = fs::read_to_string(path)?;
    let mut lines = contents.lines();
    let stored_user = lines.next().unwrap_or_default();
    let stored_password = lines.next().unwrap_or_default();
    Ok(user == stored_user && password == stored_password)
}

/// Write items as CSV.
///
/// # CSV Format
///
/// Columns: `id, name, quantity`
///
/// ```csv
/// id,name,quantity
/// 0,Bread,20
/// ```
fn write_items<W: Write>(items: &[InventoryItem], writer: W) -> Result<(), csv::Error> {
    write_rows(items, writer)
}

/// Report row with the share rounded for display.
#[derive(Serialize)]
struct ReportRecord<'a> {
    id: ItemId,
    name: &'a str,
    quantity: u32,
    level: StockLevel,
    share: String,
}

/// Write the stock report as CSV.
///
/// Columns: `id, name, quantity, level, share` where `share` is a
/// percentage with one decimal.
fn write_report<W: Write>(rows: &[StockReportRow], writer: W) -> Result<(), csv::Error> {
    write_rows(
        rows.iter().map(|row| ReportRecord {
            id: row.id,
            name: &row.name,
            quantity: row.quantity,
            level: row.level,
            share: format!("{:.1}", row.share),
        }),
        writer,
    )
}

/// Write replayed log entries as CSV.
///
/// Columns: `id, item_name, quantity`
fn write_history<W: Write>(entries: &[LogEntry], writer: W) -> Result<(), csv::Error> {
    write_rows(entries, writer)
}

fn write_rows<W, I>(rows: I, writer: W) -> Result<(), csv::Error>
where
    W: Write,
    I: IntoIterator,
    I::Item: Serialize,
{
    let mut wtr = Writer::from_writer(writer);
    for row in rows {
        wtr.serialize(row)?;
    }
    // Flush to ensure all data is written
    wtr.flush()?;
    Ok(())
}
