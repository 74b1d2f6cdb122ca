//! Repository Implementation

use crate::StorageError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::FromRow;
use std::str::FromStr;
use tracing::{debug, info};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS loan_request (
    id                 INTEGER PRIMARY KEY AUTOINCREMENT,
    gender             TEXT    NOT NULL,
    married            TEXT    NOT NULL,
    dependents         TEXT    NOT NULL,
    education          TEXT    NOT NULL,
    self_employed      TEXT    NOT NULL,
    applicant_income   REAL    NOT NULL,
    coapplicant_income REAL    NOT NULL,
    loan_amount        REAL    NOT NULL,
    loan_term          INTEGER NOT NULL,
    credit_history     REAL    NOT NULL,
    property_area      TEXT    NOT NULL,
    prediction         TEXT    NOT NULL,
    request_date       TEXT    NOT NULL
)";

const SELECT_COLUMNS: &str = "id, gender, married, dependents, education, self_employed, \
     applicant_income, coapplicant_income, loan_amount, loan_term, credit_history, \
     property_area, prediction, request_date";

/// Stored loan request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct LoanRequestRecord {
    pub id: i64,
    pub gender: String,
    pub married: String,
    pub dependents: String,
    pub education: String,
    pub self_employed: String,
    pub applicant_income: f64,
    pub coapplicant_income: f64,
    pub loan_amount: f64,
    pub loan_term: i64,
    pub credit_history: f64,
    pub property_area: String,
    pub prediction: String,
    pub request_date: DateTime<Utc>,
}

/// Loan request ready for insertion; id and date are assigned on insert
#[derive(Debug, Clone, PartialEq)]
pub struct NewLoanRequest {
    pub gender: String,
    pub married: String,
    pub dependents: String,
    pub education: String,
    pub self_employed: String,
    pub applicant_income: f64,
    pub coapplicant_income: f64,
    pub loan_amount: f64,
    pub loan_term: i64,
    pub credit_history: f64,
    pub property_area: String,
    pub prediction: String,
}

/// Repository for loan request records
#[derive(Debug, Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Connect to a SQLite database and create the schema.
    ///
    /// In-memory databases are pinned to a single connection so every query
    /// sees the same data.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, StorageError> {
        let in_memory = url.contains(":memory:") || url.contains("mode=memory");
        let max_connections = if in_memory { 1 } else { max_connections.max(1) };

        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            // an in-memory database lives only as long as its connection
            .idle_timeout(if in_memory { None } else { Some(std::time::Duration::from_secs(600)) })
            .max_lifetime(if in_memory { None } else { Some(std::time::Duration::from_secs(1800)) })
            .connect_with(options)
            .await?;

        info!("Connected to {} (max {} connections)", url, max_connections);

        let repo = Self { pool };
        repo.migrate().await?;
        Ok(repo)
    }

    /// Fresh in-memory repository
    pub async fn in_memory() -> Result<Self, StorageError> {
        Self::connect("sqlite::memory:", 1).await
    }

    async fn migrate(&self) -> Result<(), StorageError> {
        sqlx::query(SCHEMA).execute(&self.pool).await?;
        debug!("Schema ready");
        Ok(())
    }

    /// Insert a loan request, returning the assigned id
    pub async fn insert(&self, request: NewLoanRequest) -> Result<i64, StorageError> {
        let request_date = Utc::now();
        let result = sqlx::query(
            "INSERT INTO loan_request (gender, married, dependents, education, self_employed, \
             applicant_income, coapplicant_income, loan_amount, loan_term, credit_history, \
             property_area, prediction, request_date) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&request.gender)
        .bind(&request.married)
        .bind(&request.dependents)
        .bind(&request.education)
        .bind(&request.self_employed)
        .bind(request.applicant_income)
        .bind(request.coapplicant_income)
        .bind(request.loan_amount)
        .bind(request.loan_term)
        .bind(request.credit_history)
        .bind(&request.property_area)
        .bind(&request.prediction)
        .bind(request_date)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        debug!("Inserted loan request with ID {} ({})", id, request.prediction);
        Ok(id)
    }

    /// All loan requests, oldest first
    pub async fn list(&self) -> Result<Vec<LoanRequestRecord>, StorageError> {
        let query = format!("SELECT {} FROM loan_request ORDER BY id", SELECT_COLUMNS);
        let records = sqlx::query_as::<_, LoanRequestRecord>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(records)
    }

    /// Get one loan request
    pub async fn get(&self, id: i64) -> Result<LoanRequestRecord, StorageError> {
        let query = format!("SELECT {} FROM loan_request WHERE id = ?", SELECT_COLUMNS);
        sqlx::query_as::<_, LoanRequestRecord>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StorageError::NotFound(id))
    }

    /// Delete one loan request
    pub async fn delete(&self, id: i64) -> Result<(), StorageError> {
        let result = sqlx::query("DELETE FROM loan_request WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(id));
        }
        debug!("Deleted loan request {}", id);
        Ok(())
    }

    /// Get total loan request count
    pub async fn count(&self) -> Result<i64, StorageError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM loan_request")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Cheap connectivity probe
    pub async fn ping(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}
