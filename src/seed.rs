//! Idempotent loader for the placeholder dataset.
//!
//! Tables are seeded in the order users, customers, invoices, revenue. Every
//! row of a table is inserted concurrently with `INSERT OR IGNORE`, and the
//! next table starts only after all inserts of the previous one settled.
//! Nothing is wrapped in a transaction: rows committed before a failure stay.

use futures::future::try_join_all;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{
    errors::AppError,
    placeholder::{self, PlaceholderInvoice},
    utils::hash_password,
    AppState,
};

const CREATE_USERS: &str = r#"
    CREATE TABLE IF NOT EXISTS users (
        id CHAR(36) PRIMARY KEY,
        name VARCHAR(255) NOT NULL,
        email TEXT NOT NULL UNIQUE,
        password TEXT NOT NULL
    )
"#;

const CREATE_CUSTOMERS: &str = r#"
    CREATE TABLE IF NOT EXISTS customers (
        id CHAR(36) PRIMARY KEY,
        name VARCHAR(255) NOT NULL,
        email VARCHAR(255) NOT NULL,
        image_url VARCHAR(255) NOT NULL
    )
"#;

const CREATE_INVOICES: &str = r#"
    CREATE TABLE IF NOT EXISTS invoices (
        id CHAR(36) PRIMARY KEY,
        customer_id CHAR(36) NOT NULL,
        amount INTEGER NOT NULL,
        status VARCHAR(255) NOT NULL,
        date DATE NOT NULL
    )
"#;

const CREATE_REVENUE: &str = r#"
    CREATE TABLE IF NOT EXISTS revenue (
        month VARCHAR(4) NOT NULL UNIQUE,
        revenue INTEGER NOT NULL
    )
"#;

/// Rows actually inserted per table. All zero on a re-run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub users: u64,
    pub customers: u64,
    pub invoices: u64,
    pub revenue: u64,
}

/// Namespace for invoice identifiers derived from their content.
const INVOICE_NAMESPACE: Uuid = Uuid::from_u128(0x6f1c_2a4e_9b3d_4c7a_8e5f_1d2b_3c4d_5e6f);

/// Placeholder invoices carry no identifier of their own. Deriving it from the
/// row content keeps it stable across runs so `INSERT OR IGNORE` skips rows
/// that were already seeded.
pub fn invoice_id(invoice: &PlaceholderInvoice) -> String {
    let (y, m, d) = invoice.date;
    let key = format!(
        "{}|{:04}-{:02}-{:02}|{}|{}",
        invoice.customer_id,
        y,
        m,
        d,
        invoice.amount,
        invoice.status.as_str()
    );
    Uuid::new_v5(&INVOICE_NAMESPACE, key.as_bytes()).to_string()
}

fn id_or_new(id: Option<&str>) -> String {
    id.map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

async fn create_table(pool: &SqlitePool, table: &'static str, ddl: &str) -> Result<(), AppError> {
    sqlx::query(ddl)
        .execute(pool)
        .await
        .map_err(AppError::seed(table))?;
    Ok(())
}

/// Creates all four tables without inserting any rows.
pub async fn create_schema(state: &AppState) -> Result<(), AppError> {
    let pool = &state.db_pool;
    create_table(pool, "users", CREATE_USERS).await?;
    create_table(pool, "customers", CREATE_CUSTOMERS).await?;
    create_table(pool, "invoices", CREATE_INVOICES).await?;
    create_table(pool, "revenue", CREATE_REVENUE).await?;
    Ok(())
}

async fn seed_users(pool: &SqlitePool) -> Result<u64, AppError> {
    create_table(pool, "users", CREATE_USERS).await?;

    let inserts = placeholder::USERS.iter().map(|user| async move {
        let hashed = hash_password(user.password)?;
        let result = sqlx::query(
            "INSERT OR IGNORE INTO users (id, name, email, password) VALUES (?, ?, ?, ?)",
        )
        .bind(id_or_new(user.id))
        .bind(user.name)
        .bind(user.email)
        .bind(hashed)
        .execute(pool)
        .await
        .map_err(AppError::seed("users"))?;
        Ok::<_, AppError>(result.rows_affected())
    });

    Ok(try_join_all(inserts).await?.into_iter().sum())
}

async fn seed_customers(pool: &SqlitePool) -> Result<u64, AppError> {
    create_table(pool, "customers", CREATE_CUSTOMERS).await?;

    let inserts = placeholder::CUSTOMERS.iter().map(|customer| async move {
        let result = sqlx::query(
            "INSERT OR IGNORE INTO customers (id, name, email, image_url) VALUES (?, ?, ?, ?)",
        )
        .bind(id_or_new(customer.id))
        .bind(customer.name)
        .bind(customer.email)
        .bind(customer.image_url)
        .execute(pool)
        .await
        .map_err(AppError::seed("customers"))?;
        Ok::<_, AppError>(result.rows_affected())
    });

    Ok(try_join_all(inserts).await?.into_iter().sum())
}

async fn seed_invoices(pool: &SqlitePool) -> Result<u64, AppError> {
    create_table(pool, "invoices", CREATE_INVOICES).await?;

    let inserts = placeholder::INVOICES.iter().map(|invoice| async move {
        let date = invoice.date().ok_or_else(|| {
            AppError::seed("invoices")(sqlx::Error::Protocol(format!(
                "invalid placeholder date {:?}",
                invoice.date
            )))
        })?;
        let result = sqlx::query(
            "INSERT OR IGNORE INTO invoices (id, customer_id, amount, status, date) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(invoice_id(invoice))
        .bind(invoice.customer_id)
        .bind(invoice.amount)
        .bind(invoice.status)
        .bind(date)
        .execute(pool)
        .await
        .map_err(AppError::seed("invoices"))?;
        Ok::<_, AppError>(result.rows_affected())
    });

    Ok(try_join_all(inserts).await?.into_iter().sum())
}

async fn seed_revenue(pool: &SqlitePool) -> Result<u64, AppError> {
    create_table(pool, "revenue", CREATE_REVENUE).await?;

    let inserts = placeholder::REVENUE.iter().map(|rev| async move {
        let result = sqlx::query("INSERT OR IGNORE INTO revenue (month, revenue) VALUES (?, ?)")
            .bind(rev.month)
            .bind(rev.revenue)
            .execute(pool)
            .await
            .map_err(AppError::seed("revenue"))?;
        Ok::<_, AppError>(result.rows_affected())
    });

    Ok(try_join_all(inserts).await?.into_iter().sum())
}

pub async fn seed_database(state: &AppState) -> Result<SeedReport, AppError> {
    let pool = &state.db_pool;

    let report = SeedReport {
        users: seed_users(pool).await?,
        customers: seed_customers(pool).await?,
        invoices: seed_invoices(pool).await?,
        revenue: seed_revenue(pool).await?,
    };

    log::info!(
        "Seeded users={} customers={} invoices={} revenue={}",
        report.users,
        report.customers,
        report.invoices,
        report.revenue
    );
    Ok(report)
}
