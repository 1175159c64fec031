// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-connection database writer.
//!
//! Each enabled connection gets its own [`DbWriter`], built from the global
//! [`DbSettings`](crate::config::DbSettings) merged with that connection's
//! `db_user`/`db_password`. A writer reuses one pooled connection across
//! every `write` call for the lifetime of its worker.

use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{PgPool, Row};
use thiserror::Error;

use crate::config::DbSettings;
use ulog_protocol::Value;

#[derive(Debug, Error)]
pub enum DbWriterError {
    #[error("failed to connect to database: {0}")]
    Connect(String),
    #[error("failed to execute write: {0}")]
    Execute(String),
}

/// Writes a compiled SQL statement with bound named parameters to a
/// database. Implementations own their connection pool.
#[async_trait]
pub trait DbWriter: Send + Sync {
    async fn write(
        &self,
        sql: &str,
        params: &ulog_protocol::value::VarMap,
    ) -> Result<(), DbWriterError>;

    async fn close(&self);
}

fn connect_options(settings: &DbSettings, user: &str, password: &str) -> PgConnectOptions {
    let ssl_mode = match settings.sslmode.as_str() {
        "disable" => sqlx::postgres::PgSslMode::Disable,
        "allow" => sqlx::postgres::PgSslMode::Allow,
        "require" => sqlx::postgres::PgSslMode::Require,
        "verify-ca" => sqlx::postgres::PgSslMode::VerifyCa,
        "verify-full" => sqlx::postgres::PgSslMode::VerifyFull,
        _ => sqlx::postgres::PgSslMode::Prefer,
    };
    PgConnectOptions::new()
        .host(&settings.host)
        .port(settings.port)
        .database(&settings.database)
        .username(user)
        .password(password)
        .ssl_mode(ssl_mode)
}

/// A [`DbWriter`] backed by a `sqlx` Postgres connection pool.
pub struct SqlxDbWriter {
    pool: PgPool,
}

impl SqlxDbWriter {
    pub async fn connect(
        settings: &DbSettings,
        db_user: &str,
        db_password: &str,
    ) -> Result<Self, DbWriterError> {
        let options = connect_options(settings, db_user, db_password);
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| DbWriterError::Connect(e.to_string()))?;
        Ok(Self { pool })
    }

    pub async fn test_connection(
        settings: &DbSettings,
        db_user: &str,
        db_password: &str,
    ) -> Result<(), DbWriterError> {
        let options = connect_options(settings, db_user, db_password);
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(|e| DbWriterError::Connect(e.to_string()))?;
        let row = sqlx::query("SELECT 1")
            .fetch_one(&pool)
            .await
            .map_err(|e| DbWriterError::Execute(e.to_string()))?;
        let _: i32 = row.try_get(0).map_err(|e| DbWriterError::Execute(e.to_string()))?;
        pool.close().await;
        Ok(())
    }
}

#[async_trait]
impl DbWriter for SqlxDbWriter {
    async fn write(
        &self,
        sql: &str,
        params: &ulog_protocol::value::VarMap,
    ) -> Result<(), DbWriterError> {
        let (positional_sql, names) = rewrite_named_params(sql);
        let mut query = sqlx::query(&positional_sql);
        for name in &names {
            let value = params.get(name).unwrap_or(&Value::Null);
            query = match value {
                Value::Null => query.bind(None::<String>),
                Value::Bool(b) => query.bind(*b),
                Value::Int(i) => query.bind(*i),
                Value::Float(f) => query.bind(*f),
                Value::Text(s) => query.bind(s.clone()),
                Value::Timestamp(ts) => query.bind(ts.naive_local()),
            };
        }
        query
            .execute(&self.pool)
            .await
            .map_err(|e| DbWriterError::Execute(e.to_string()))?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

/// Rewrites `:name` named parameters (as emitted by
/// `ulog_protocol::compile_query_template`) into Postgres `$n` positional
/// parameters, returning the rewritten SQL and the parameter names in bind
/// order. A name repeated in the template reuses its first `$n` slot.
fn rewrite_named_params(sql: &str) -> (String, Vec<String>) {
    let chars: Vec<char> = sql.chars().collect();
    let n = chars.len();
    let mut out = String::new();
    let mut names: Vec<String> = Vec::new();
    let mut i = 0;

    while i < n {
        let ch = chars[i];
        if ch == ':' && i + 1 < n && (chars[i + 1] == '_' || chars[i + 1].is_alphabetic()) {
            let mut j = i + 1;
            while j < n && (chars[j] == '_' || chars[j].is_alphanumeric()) {
                j += 1;
            }
            let name: String = chars[i + 1..j].iter().collect();
            let idx = match names.iter().position(|existing| existing == &name) {
                Some(pos) => pos,
                None => {
                    names.push(name);
                    names.len() - 1
                }
            };
            out.push('$');
            out.push_str(&(idx + 1).to_string());
            i = j;
            continue;
        }
        out.push(ch);
        i += 1;
    }

    (out, names)
}

/// In-memory [`DbWriter`] for tests: records every write, optionally failing
/// on command.
#[cfg(any(test, feature = "test-support"))]
pub struct FakeDbWriter {
    writes: parking_lot::Mutex<Vec<(String, ulog_protocol::value::VarMap)>>,
    fail_next: std::sync::atomic::AtomicBool,
    closed: std::sync::atomic::AtomicBool,
}

#[cfg(any(test, feature = "test-support"))]
impl Default for FakeDbWriter {
    fn default() -> Self {
        Self {
            writes: parking_lot::Mutex::new(Vec::new()),
            fail_next: std::sync::atomic::AtomicBool::new(false),
            closed: std::sync::atomic::AtomicBool::new(false),
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
impl FakeDbWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `write` call fail, then resume succeeding.
    pub fn fail_next_write(&self) {
        self.fail_next.store(true, std::sync::atomic::Ordering::SeqCst);
    }

    pub fn writes(&self) -> Vec<(String, ulog_protocol::value::VarMap)> {
        self.writes.lock().clone()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(any(test, feature = "test-support"))]
#[async_trait]
impl DbWriter for FakeDbWriter {
    async fn write(
        &self,
        sql: &str,
        params: &ulog_protocol::value::VarMap,
    ) -> Result<(), DbWriterError> {
        if self
            .fail_next
            .swap(false, std::sync::atomic::Ordering::SeqCst)
        {
            return Err(DbWriterError::Execute("forced failure".to_string()));
        }
        self.writes.lock().push((sql.to_string(), params.clone()));
        Ok(())
    }

    async fn close(&self) {
        self.closed.store(true, std::sync::atomic::Ordering::SeqCst);
    }
}

#[cfg(test)]
#[path = "db_tests.rs"]
mod tests;
