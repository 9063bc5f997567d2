//! Local input checks run before anything is sent to the ledger

use agrosafe_ledger_trait::{LedgerError, Result, is_valid_address};
use chrono::NaiveDate;

pub const NAME_MIN_CHARS: usize = 2;
pub const NAME_MAX_CHARS: usize = 100;
pub const LOCATION_MIN_CHARS: usize = 2;
pub const LOCATION_MAX_CHARS: usize = 200;
pub const CROP_TYPE_MIN_CHARS: usize = 2;
pub const CROP_TYPE_MAX_CHARS: usize = 100;

/// Largest page accepted by the listing reads
pub const MAX_PAGE_SIZE: u64 = 100;

/// Trim `value` and check its length in characters
pub fn bounded_text(field: &'static str, value: &str, min: usize, max: usize) -> Result<String> {
    let trimmed = value.trim();
    let chars = trimmed.chars().count();

    if chars == 0 {
        return Err(LedgerError::validation(field, "is required"));
    }

    if chars < min {
        return Err(LedgerError::validation(
            field,
            format!("must be at least {} characters long", min),
        ));
    }

    if chars > max {
        return Err(LedgerError::validation(
            field,
            format!("must be at most {} characters long, got {}", max, chars),
        ));
    }

    Ok(trimmed.to_string())
}

pub fn farmer_name(value: &str) -> Result<String> {
    bounded_text("name", value, NAME_MIN_CHARS, NAME_MAX_CHARS)
}

pub fn location(value: &str) -> Result<String> {
    bounded_text("location", value, LOCATION_MIN_CHARS, LOCATION_MAX_CHARS)
}

pub fn crop_type(value: &str) -> Result<String> {
    bounded_text("crop type", value, CROP_TYPE_MIN_CHARS, CROP_TYPE_MAX_CHARS)
}

/// Strict `YYYY-MM-DD` calendar date no later than `today`
pub fn harvest_date(value: &str, today: NaiveDate) -> Result<String> {
    const FIELD: &str = "harvest date";

    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(LedgerError::validation(FIELD, "is required"));
    }

    let shape_ok = trimmed.len() == 10
        && trimmed.char_indices().all(|(i, c)| match i {
            4 | 7 => c == '-',
            _ => c.is_ascii_digit(),
        });
    if !shape_ok {
        return Err(LedgerError::validation(FIELD, "must be in YYYY-MM-DD format"));
    }

    let date = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map_err(|_| {
        LedgerError::validation(FIELD, format!("{} is not a calendar date", trimmed))
    })?;

    if date > today {
        return Err(LedgerError::validation(
            FIELD,
            format!("{} is in the future (today is {})", trimmed, today),
        ));
    }

    Ok(trimmed.to_string())
}

/// Ledger ids start at 1
pub fn record_id(field: &'static str, id: u64) -> Result<u64> {
    if id == 0 {
        return Err(LedgerError::validation(field, "must be a positive integer"));
    }
    Ok(id)
}

/// 20-byte hex wallet address, returned lowercase
pub fn wallet(value: &str) -> Result<String> {
    let trimmed = value.trim();
    if !is_valid_address(trimmed) {
        return Err(LedgerError::validation(
            "wallet",
            format!("'{}' is not a 0x-prefixed 20-byte address", trimmed),
        ));
    }
    Ok(trimmed.to_ascii_lowercase())
}

/// `0x` followed by 64 hex digits, returned lowercase
pub fn tx_hash(value: &str) -> Result<String> {
    let trimmed = value.trim();
    let ok = trimmed.len() == 66
        && trimmed.starts_with("0x")
        && trimmed[2..].chars().all(|c| c.is_ascii_hexdigit());
    if !ok {
        return Err(LedgerError::validation(
            "transaction hash",
            format!("'{}' is not a 0x-prefixed 32-byte hash", trimmed),
        ));
    }
    Ok(trimmed.to_ascii_lowercase())
}

pub fn page(limit: u64) -> Result<u64> {
    if limit == 0 || limit > MAX_PAGE_SIZE {
        return Err(LedgerError::validation(
            "limit",
            format!("must be between 1 and {}", MAX_PAGE_SIZE),
        ));
    }
    Ok(limit)
}
