use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2,
};
use chrono::NaiveDate;
use std::collections::HashMap;
use tera::Value;

use crate::errors::AppError;

pub const ITEMS_PER_PAGE: i64 = 6;

/// Formats an amount in cents as US dollars, e.g. `$1,234.56`.
pub fn format_currency(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    let dollars = (abs / 100).to_string();
    let mut grouped = String::with_capacity(dollars.len() + dollars.len() / 3);
    for (i, ch) in dollars.chars().enumerate() {
        if i > 0 && (dollars.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{}${}.{:02}", sign, grouped, abs % 100)
}

/// `Dec 6, 2022`
pub fn format_date_to_local(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// Tera filter: `{{ invoice.date | local_date }}`.
pub fn local_date_filter(value: &Value, _: &HashMap<String, Value>) -> tera::Result<Value> {
    let raw = tera::from_value::<String>(value.clone())?;
    let date = NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
        .map_err(|e| tera::Error::msg(format!("local_date: cannot parse {raw:?}: {e}")))?;
    Ok(Value::String(format_date_to_local(date)))
}

/// Offset of the first row on a 1-based page. Pages below 1 are treated as 1.
pub fn page_offset(page: i64) -> i64 {
    (page.max(1) - 1).saturating_mul(ITEMS_PER_PAGE)
}

pub fn total_pages(count: i64) -> i64 {
    (count.max(0) + ITEMS_PER_PAGE - 1) / ITEMS_PER_PAGE
}

pub fn hash_password(password: &str) -> Result<String, AppError> {
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &SaltString::generate(&mut OsRng))
        .map_err(|e| {
            log::error!("Failed to hash password: {}", e);
            AppError::PasswordError(e.to_string())
        })?
        .to_string();
    Ok(hash)
}

#[cfg(test)]
pub fn verify_password(provided: &str, stored_hash: &str) -> Result<bool, AppError> {
    use argon2::password_hash::{PasswordHash, PasswordVerifier};

    let parsed = PasswordHash::new(stored_hash).map_err(|e| AppError::PasswordError(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(provided.as_bytes(), &parsed)
        .is_ok())
}
