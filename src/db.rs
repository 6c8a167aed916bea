use std::{str::FromStr, time::Duration};

use serde_json::{json, Value};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
    SqlitePool,
};

use crate::{
    config::Config,
    errors::AppError,
    structs::{
        CardData, CustomerField, CustomerTableRaw, CustomerTableRow, InvoiceForm,
        InvoiceFormRaw, InvoiceRow, InvoiceRowRaw, LatestInvoice, LatestInvoiceRaw, Revenue,
        SampleInvoice,
    },
    utils::{format_currency, page_offset, total_pages, ITEMS_PER_PAGE},
    AppState,
};

/// Builds the process-wide pool without touching the store. Only a malformed
/// connection string fails here; an unreachable database fails on first query.
pub fn connect_lazy(config: &Config) -> Result<SqlitePool, sqlx::Error> {
    let opts = SqliteConnectOptions::from_str(&config.database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .read_only(false)
        .busy_timeout(Duration::from_secs(5));

    Ok(SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect_lazy_with(opts))
}

/// Runs `SELECT 1` and returns the rows as JSON.
pub async fn ping(state: &AppState) -> Result<Value, sqlx::Error> {
    let value: i64 = sqlx::query_scalar("SELECT 1")
        .fetch_one(&state.db_pool)
        .await?;
    Ok(json!([{ "1": value }]))
}

pub async fn fetch_revenue(state: &AppState) -> Result<Vec<Revenue>, AppError> {
    let rows = sqlx::query_as::<_, Revenue>("SELECT month, revenue FROM revenue")
        .fetch_all(&state.db_pool)
        .await
        .map_err(AppError::database("Failed to fetch revenue data."))?;
    Ok(rows)
}

pub async fn fetch_latest_invoices(state: &AppState) -> Result<Vec<LatestInvoice>, AppError> {
    let rows = sqlx::query_as::<_, LatestInvoiceRaw>(
        r#"
        SELECT invoices.amount, customers.name, customers.image_url, customers.email, invoices.id
        FROM invoices
        JOIN customers ON invoices.customer_id = customers.id
        ORDER BY invoices.date DESC
        LIMIT 5
        "#,
    )
    .fetch_all(&state.db_pool)
    .await
    .map_err(AppError::database("Failed to fetch the latest invoices."))?;

    Ok(rows
        .into_iter()
        .map(|invoice| LatestInvoice {
            id: invoice.id,
            name: invoice.name,
            image_url: invoice.image_url,
            email: invoice.email,
            amount: format_currency(invoice.amount),
        })
        .collect())
}

pub async fn fetch_card_data(state: &AppState) -> Result<CardData, AppError> {
    let pool = &state.db_pool;
    let context = "Failed to fetch card data.";

    let invoice_count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM invoices")
        .fetch_one(pool);
    let customer_count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM customers")
        .fetch_one(pool);
    let status_totals = sqlx::query_as::<_, (i64, i64)>(
        r#"
        SELECT
            COALESCE(SUM(CASE WHEN status = 'paid' THEN amount ELSE 0 END), 0) AS paid,
            COALESCE(SUM(CASE WHEN status = 'pending' THEN amount ELSE 0 END), 0) AS pending
        FROM invoices
        "#,
    )
    .fetch_one(pool);

    let (number_of_invoices, number_of_customers, (paid, pending)) =
        futures::try_join!(invoice_count, customer_count, status_totals)
            .map_err(AppError::database(context))?;

    Ok(CardData {
        number_of_customers,
        number_of_invoices,
        total_paid_invoices: format_currency(paid),
        total_pending_invoices: format_currency(pending),
        total_paid_cents: paid,
        total_pending_cents: pending,
    })
}

const INVOICE_SEARCH_PREDICATE: &str = r#"
    LOWER(customers.name) LIKE LOWER(?1) OR
    LOWER(customers.email) LIKE LOWER(?1) OR
    CAST(invoices.amount AS TEXT) LIKE ?1 OR
    CAST(invoices.date AS TEXT) LIKE ?1 OR
    LOWER(invoices.status) LIKE LOWER(?1)
"#;

fn like_pattern(query: &str) -> String {
    format!("%{}%", query)
}

/// One page of invoices matching `query`, newest first. `page` is 1-based.
pub async fn fetch_filtered_invoices(
    state: &AppState,
    query: &str,
    page: i64,
) -> Result<Vec<InvoiceRow>, AppError> {
    let sql = format!(
        r#"
        SELECT
            invoices.id,
            invoices.amount,
            invoices.date,
            invoices.status,
            customers.name,
            customers.email,
            customers.image_url
        FROM invoices
        JOIN customers ON invoices.customer_id = customers.id
        WHERE {}
        ORDER BY invoices.date DESC, invoices.id ASC
        LIMIT ?2 OFFSET ?3
        "#,
        INVOICE_SEARCH_PREDICATE
    );

    let rows = sqlx::query_as::<_, InvoiceRowRaw>(&sql)
        .bind(like_pattern(query))
        .bind(ITEMS_PER_PAGE)
        .bind(page_offset(page))
        .fetch_all(&state.db_pool)
        .await
        .map_err(AppError::database("Failed to fetch invoices."))?;

    Ok(rows
        .into_iter()
        .map(|row| InvoiceRow {
            amount_display: format_currency(row.amount),
            id: row.id,
            amount: row.amount,
            date: row.date,
            status: row.status,
            name: row.name,
            email: row.email,
            image_url: row.image_url,
        })
        .collect())
}

pub async fn fetch_invoices_pages(state: &AppState, query: &str) -> Result<i64, AppError> {
    let sql = format!(
        r#"
        SELECT COUNT(*)
        FROM invoices
        JOIN customers ON invoices.customer_id = customers.id
        WHERE {}
        "#,
        INVOICE_SEARCH_PREDICATE
    );

    let count: i64 = sqlx::query_scalar(&sql)
        .bind(like_pattern(query))
        .fetch_one(&state.db_pool)
        .await
        .map_err(AppError::database("Failed to fetch total number of invoices."))?;

    Ok(total_pages(count))
}

/// Returns `None` when no invoice has this id; the amount is converted from cents.
pub async fn fetch_invoice_by_id(
    state: &AppState,
    id: &str,
) -> Result<Option<InvoiceForm>, AppError> {
    let row = sqlx::query_as::<_, InvoiceFormRaw>(
        r#"
        SELECT invoices.id, invoices.customer_id, invoices.amount, invoices.status
        FROM invoices
        WHERE invoices.id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(&state.db_pool)
    .await
    .map_err(AppError::database("Failed to fetch invoice."))?;

    if row.is_none() {
        log::info!("Invoice {} not found", id);
    }

    Ok(row.map(|invoice| InvoiceForm {
        id: invoice.id,
        customer_id: invoice.customer_id,
        amount: invoice.amount as f64 / 100.0,
        status: invoice.status,
    }))
}

pub async fn fetch_customers(state: &AppState) -> Result<Vec<CustomerField>, AppError> {
    let rows = sqlx::query_as::<_, CustomerField>(
        "SELECT id, name FROM customers ORDER BY name ASC",
    )
    .fetch_all(&state.db_pool)
    .await
    .map_err(AppError::database("Failed to fetch all customers."))?;
    Ok(rows)
}

pub async fn fetch_filtered_customers(
    state: &AppState,
    query: &str,
) -> Result<Vec<CustomerTableRow>, AppError> {
    let rows = sqlx::query_as::<_, CustomerTableRaw>(
        r#"
        SELECT
            customers.id,
            customers.name,
            customers.email,
            customers.image_url,
            COUNT(invoices.id) AS total_invoices,
            COALESCE(SUM(CASE WHEN invoices.status = 'pending' THEN invoices.amount ELSE 0 END), 0) AS total_pending,
            COALESCE(SUM(CASE WHEN invoices.status = 'paid' THEN invoices.amount ELSE 0 END), 0) AS total_paid
        FROM customers
        LEFT JOIN invoices ON customers.id = invoices.customer_id
        WHERE
            LOWER(customers.name) LIKE LOWER(?1) OR
            LOWER(customers.email) LIKE LOWER(?1)
        GROUP BY customers.id, customers.name, customers.email, customers.image_url
        ORDER BY customers.name ASC
        "#,
    )
    .bind(like_pattern(query))
    .fetch_all(&state.db_pool)
    .await
    .map_err(AppError::database("Failed to fetch customer table."))?;

    Ok(rows
        .into_iter()
        .map(|customer| CustomerTableRow {
            id: customer.id,
            name: customer.name,
            email: customer.email,
            image_url: customer.image_url,
            total_invoices: customer.total_invoices,
            total_pending: format_currency(customer.total_pending),
            total_paid: format_currency(customer.total_paid),
        })
        .collect())
}

/// Invoices of exactly $6.66 with their customer's name.
pub async fn list_invoices_666(state: &AppState) -> Result<Vec<SampleInvoice>, AppError> {
    let rows = sqlx::query_as::<_, SampleInvoice>(
        r#"
        SELECT invoices.amount, customers.name
        FROM invoices
        JOIN customers ON invoices.customer_id = customers.id
        WHERE invoices.amount = 666
        "#,
    )
    .fetch_all(&state.db_pool)
    .await
    .map_err(AppError::database("Failed to fetch invoices."))?;
    Ok(rows)
}

#[cfg(test)]
pub(crate) async fn test_state() -> AppState {
    let opts = SqliteConnectOptions::from_str("sqlite::memory:").unwrap();
    let db_pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(opts)
        .await
        .unwrap();
    AppState { db_pool }
}

#[cfg(test)]
pub(crate) async fn seeded_state() -> AppState {
    let state = test_state().await;
    crate::seed::seed_database(&state).await.unwrap();
    state
}
