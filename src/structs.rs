use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Pending,
    Paid,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Pending => "pending",
            InvoiceStatus::Paid => "paid",
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, FromRow)]
pub struct Revenue {
    pub month: String,
    pub revenue: i64,
}

#[derive(Debug, Clone, FromRow)]
pub struct LatestInvoiceRaw {
    pub id: String,
    pub name: String,
    pub image_url: String,
    pub email: String,
    pub amount: i64,
}

#[derive(Serialize, Debug, Clone)]
pub struct LatestInvoice {
    pub id: String,
    pub name: String,
    pub image_url: String,
    pub email: String,
    pub amount: String,
}

#[derive(Serialize, Debug, Clone)]
pub struct CardData {
    pub number_of_customers: i64,
    pub number_of_invoices: i64,
    pub total_paid_invoices: String,
    pub total_pending_invoices: String,
    pub total_paid_cents: i64,
    pub total_pending_cents: i64,
}

#[derive(Debug, Clone, FromRow)]
pub struct InvoiceRowRaw {
    pub id: String,
    pub amount: i64,
    pub date: NaiveDate,
    pub status: InvoiceStatus,
    pub name: String,
    pub email: String,
    pub image_url: String,
}

/// A row of the invoices table view. `amount` stays in cents, `amount_display`
/// is the formatted dollar value.
#[derive(Serialize, Debug, Clone)]
pub struct InvoiceRow {
    pub id: String,
    pub amount: i64,
    pub amount_display: String,
    pub date: NaiveDate,
    pub status: InvoiceStatus,
    pub name: String,
    pub email: String,
    pub image_url: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct InvoiceFormRaw {
    pub id: String,
    pub customer_id: String,
    pub amount: i64,
    pub status: InvoiceStatus,
}

/// Invoice as loaded for editing; `amount` is in dollars.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct InvoiceForm {
    pub id: String,
    pub customer_id: String,
    pub amount: f64,
    pub status: InvoiceStatus,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, FromRow)]
pub struct CustomerField {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct CustomerTableRaw {
    pub id: String,
    pub name: String,
    pub email: String,
    pub image_url: String,
    pub total_invoices: i64,
    pub total_pending: i64,
    pub total_paid: i64,
}

#[derive(Serialize, Debug, Clone)]
pub struct CustomerTableRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub image_url: String,
    pub total_invoices: i64,
    pub total_pending: String,
    pub total_paid: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, FromRow)]
pub struct SampleInvoice {
    pub amount: i64,
    pub name: String,
}
