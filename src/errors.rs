use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use sqlx::Error as SqlxError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// A query failed. Only the fixed `context` message is shown to callers,
    /// the driver error is kept as the source.
    #[error("{context}")]
    Database {
        context: &'static str,
        #[source]
        source: SqlxError,
    },

    #[error("Failed to seed {table}: {source}")]
    Seed {
        table: &'static str,
        #[source]
        source: SqlxError,
    },

    #[error("Not found")]
    NotFound,

    #[error("Template error: {0}")]
    TemplateError(#[from] tera::Error),

    #[error("Password error: {0}")]
    PasswordError(String),
}

impl AppError {
    /// Logs the driver error and replaces it with the fixed message of the
    /// calling query function.
    pub fn database(context: &'static str) -> impl FnOnce(SqlxError) -> AppError {
        move |source| {
            log::error!("Database Error: {}", source);
            AppError::Database { context, source }
        }
    }

    pub fn seed(table: &'static str) -> impl FnOnce(SqlxError) -> AppError {
        move |source| {
            log::error!("Failed to seed {}: {}", table, source);
            AppError::Seed { table, source }
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Database { .. }
            | AppError::Seed { .. }
            | AppError::TemplateError(_)
            | AppError::PasswordError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn database_error_hides_cause_but_keeps_source() {
        let err = AppError::database("Failed to fetch revenue data.")(SqlxError::RowNotFound);
        assert_eq!(err.to_string(), "Failed to fetch revenue data.");
        assert!(err.source().is_some());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn not_found_maps_to_404() {
        assert_eq!(AppError::NotFound.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn seed_error_names_table() {
        let err = AppError::seed("users")(SqlxError::PoolClosed);
        assert!(err.to_string().starts_with("Failed to seed users: "));
    }
}
