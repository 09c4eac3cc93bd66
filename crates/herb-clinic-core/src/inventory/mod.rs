//! Inventory ledger.
//!
//! Turns the quantity embedded in each prescribed dosage into a stock
//! deduction, refusing the whole batch when any medicine would run dry.

use rusqlite::Connection;
use thiserror::Error;
use tracing::debug;

use crate::db;
use crate::models::PrescriptionDraft;

/// Sentinel dosage for "as needed". Lines carrying it are not checked
/// against stock and deduct nothing.
pub const AS_NEEDED_DOSAGE: &str = "适量";

/// Ledger errors.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Database error: {0}")]
    Database(#[from] crate::db::DbError),

    #[error("Unknown medicine: {0}")]
    UnknownMedicine(String),

    #[error("No quantity found in dosage: {0}")]
    UnparseableDosage(String),

    #[error("Insufficient stock for {name}: {available} {unit} available, {requested} requested")]
    InsufficientStock {
        name: String,
        available: i64,
        unit: String,
        requested: f64,
    },
}

pub type LedgerResult<T> = Result<T, LedgerError>;

/// Extract the quantity from a free-form dosage string.
///
/// Grammar: optional surrounding whitespace, then one or more digits,
/// then at most one decimal point followed by digits. Everything after
/// the number (unit text such as "g" or "包") is ignored. A string with
/// no leading digits has no quantity.
pub fn parse_quantity(text: &str) -> LedgerResult<f64> {
    let trimmed = text.trim();
    let bytes = trimmed.as_bytes();

    let mut end = 0;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == 0 {
        return Err(LedgerError::UnparseableDosage(text.to_string()));
    }
    if end < bytes.len() && bytes[end] == b'.' {
        let mut frac = end + 1;
        while frac < bytes.len() && bytes[frac].is_ascii_digit() {
            frac += 1;
        }
        // A bare trailing dot is unit text, not a fraction
        if frac > end + 1 {
            end = frac;
        }
    }

    trimmed[..end]
        .parse::<f64>()
        .map_err(|_| LedgerError::UnparseableDosage(text.to_string()))
}

/// Whole stock units consumed by a quantity. Stock is integral, so a
/// fractional remainder consumes a full unit.
pub fn stock_units(quantity: f64) -> i64 {
    quantity.ceil() as i64
}

/// Validate and apply the stock deduction for every line, in order.
///
/// Runs inside the caller's transaction: the first failure aborts with
/// nothing deducted once the caller rolls back.
pub fn apply_deductions(conn: &Connection, lines: &[PrescriptionDraft]) -> LedgerResult<()> {
    for line in lines {
        let (id, stock, unit) = db::medicines::find_for_deduction(conn, &line.medicine)?
            .ok_or_else(|| LedgerError::UnknownMedicine(line.medicine.clone()))?;

        if line.dosage.trim() == AS_NEEDED_DOSAGE {
            continue;
        }

        let requested = parse_quantity(&line.dosage)?;
        let units = stock_units(requested);
        if units == 0 {
            continue;
        }

        if !db::medicines::deduct_stock(conn, id, units)? {
            // Re-read: an earlier line may already have drawn this row down
            let available = db::medicines::find_for_deduction(conn, &line.medicine)?
                .map(|(_, current, _)| current)
                .unwrap_or(stock);
            return Err(LedgerError::InsufficientStock {
                name: line.medicine.clone(),
                available,
                unit,
                requested,
            });
        }
        debug!(medicine = %line.medicine, units, "stock deducted");
    }
    Ok(())
}
