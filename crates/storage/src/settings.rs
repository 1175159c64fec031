// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Load-on-read, rewrite-whole-file-on-write settings persistence.

use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use thiserror::Error;
use tracing::warn;

use crate::config::{AppSettings, ConnectionConfig, DbSettings};

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write settings file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings file format: {0}")]
    InvalidFormat(String),
    #[error("a connection named '{0}' already exists")]
    NameAlreadyExists(String),
}

/// Owns the settings JSON file. Every read loads the whole file fresh and
/// every write rewrites the whole file; there is no in-memory cache, so
/// callers always see the latest state even if the file changed externally.
///
/// A [`Mutex`] serializes read-modify-write sequences (e.g. `upsert_connection`)
/// across concurrent callers, since the document has no finer-grained lock.
pub struct SettingsStore {
    path: PathBuf,
    guard: Mutex<()>,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            guard: Mutex::new(()),
        }
    }

    fn ensure_parent_dir(&self) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| SettingsError::Write {
                    path: self.path.clone(),
                    source,
                })?;
            }
        }
        Ok(())
    }

    /// Loads the full settings document. A missing or empty file yields
    /// defaults rather than an error.
    pub fn load_app_settings(&self) -> Result<AppSettings, SettingsError> {
        load_app_settings(&self.path)
    }

    pub fn save_app_settings(&self, settings: &AppSettings) -> Result<(), SettingsError> {
        let _held = self.guard.lock();
        self.save_app_settings_locked(settings)
    }

    pub fn get_db_settings(&self) -> Result<DbSettings, SettingsError> {
        Ok(self.load_app_settings()?.db)
    }

    pub fn save_db_settings(&self, db: DbSettings) -> Result<DbSettings, SettingsError> {
        let _held = self.guard.lock();
        let mut settings = load_app_settings(&self.path)?;
        settings.db = db.clone();
        self.save_app_settings_locked(&settings)?;
        Ok(db)
    }

    pub fn get_connections(&self) -> Result<Vec<ConnectionConfig>, SettingsError> {
        Ok(self.load_app_settings()?.connections)
    }

    pub fn get_connection(&self, id: i64) -> Result<Option<ConnectionConfig>, SettingsError> {
        Ok(self
            .load_app_settings()?
            .connections
            .into_iter()
            .find(|c| c.id == Some(id)))
    }

    fn assign_new_connection_id(connections: &[ConnectionConfig]) -> i64 {
        connections.iter().filter_map(|c| c.id).max().unwrap_or(0) + 1
    }

    /// Creates or updates a connection. If `connection.id` is `None`, a new
    /// id is assigned. Rejects a name collision with a *different* id.
    pub fn upsert_connection(
        &self,
        mut connection: ConnectionConfig,
    ) -> Result<ConnectionConfig, SettingsError> {
        let _held = self.guard.lock();
        let mut settings = load_app_settings(&self.path)?;

        if let Some(existing) = settings
            .connections
            .iter()
            .find(|c| c.name == connection.name && c.id != connection.id)
        {
            return Err(SettingsError::NameAlreadyExists(existing.name.clone()));
        }

        match connection.id {
            None => {
                let new_id = Self::assign_new_connection_id(&settings.connections);
                connection.id = Some(new_id);
                settings.connections.push(connection.clone());
            }
            Some(id) => {
                match settings.connections.iter_mut().find(|c| c.id == Some(id)) {
                    Some(slot) => *slot = connection.clone(),
                    None => settings.connections.push(connection.clone()),
                }
            }
        }

        self.save_app_settings_locked(&settings)?;
        Ok(connection)
    }

    /// Deletes a connection by id. Returns whether a connection was removed.
    pub fn delete_connection(&self, id: i64) -> Result<bool, SettingsError> {
        let _held = self.guard.lock();
        let mut settings = load_app_settings(&self.path)?;
        let before = settings.connections.len();
        settings.connections.retain(|c| c.id != Some(id));
        let deleted = settings.connections.len() != before;
        if deleted {
            self.save_app_settings_locked(&settings)?;
        }
        Ok(deleted)
    }

    /// Replaces the full connection list, preserving order.
    pub fn save_connections(
        &self,
        connections: Vec<ConnectionConfig>,
    ) -> Result<Vec<ConnectionConfig>, SettingsError> {
        let _held = self.guard.lock();
        let mut settings = load_app_settings(&self.path)?;
        settings.connections = connections.clone();
        self.save_app_settings_locked(&settings)?;
        Ok(connections)
    }

    fn save_app_settings_locked(&self, settings: &AppSettings) -> Result<(), SettingsError> {
        self.ensure_parent_dir()?;
        let text = serde_json::to_string_pretty(settings)
            .map_err(|e| SettingsError::InvalidFormat(e.to_string()))?;
        std::fs::write(&self.path, text).map_err(|source| SettingsError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

fn load_app_settings(path: &Path) -> Result<AppSettings, SettingsError> {
    if !path.exists() {
        return Ok(AppSettings::default());
    }
    let raw = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    if raw.trim().is_empty() {
        return Ok(AppSettings::default());
    }
    serde_json::from_str(&raw).map_err(|e| {
        warn!(path = %path.display(), error = %e, "failed to parse settings file");
        SettingsError::InvalidFormat(e.to_string())
    })
}

#[cfg(test)]
#[path = "settings_tests.rs"]
mod tests;
