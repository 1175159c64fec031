// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bridges the settings document to the runtime manager: builds a
//! [`DbWriter`] for a connection per §4.11's rule and (re)registers
//! connections with [`ConnectionRuntimeManager`].

use std::sync::Arc;

use tracing::warn;
use ulog_engine::ConnectionRuntimeManager;
use ulog_storage::db::DbWriter;
use ulog_storage::{ConnectionConfig, DbSettings, SettingsStore, SqlxDbWriter};

/// Build a writer for `connection` against `db`, merged with the
/// connection's own `db_user`/`db_password`. Returns `None` (not an error)
/// when the connection is disabled or missing any of the fields a writer
/// needs — per §4.11, that combination means "this connection doesn't
/// write to a database", not "this connection is broken".
pub async fn build_db_writer(
    db: &DbSettings,
    connection: &ConnectionConfig,
) -> Option<Arc<dyn DbWriter>> {
    if !connection.enabled {
        return None;
    }
    let (Some(user), Some(password), Some(table), Some(template)) = (
        connection.db_user.as_deref(),
        connection.db_password.as_deref(),
        connection.table_name.as_deref(),
        connection.query_template.as_deref(),
    ) else {
        return None;
    };
    if user.is_empty() || password.is_empty() || table.is_empty() || template.is_empty() {
        return None;
    }

    match SqlxDbWriter::connect(db, user, password).await {
        Ok(writer) => Some(Arc::new(writer) as Arc<dyn DbWriter>),
        Err(e) => {
            warn!(connection = %connection.name, error = %e, "failed to connect db writer");
            None
        }
    }
}

/// Register a single connection with the manager, building its writer
/// first. Does not start it.
pub async fn register_connection(
    manager: &Arc<ConnectionRuntimeManager>,
    db: &DbSettings,
    connection: ConnectionConfig,
) -> Result<(), ulog_engine::ManagerError> {
    let writer = build_db_writer(db, &connection).await;
    manager.register_connection(connection, writer)?;
    Ok(())
}

/// Load every connection from `settings` and register it with `manager`,
/// starting those marked `autostart`. Called once at daemon boot.
pub async fn register_all(manager: &Arc<ConnectionRuntimeManager>, settings: &SettingsStore) {
    let app_settings = match settings.load_app_settings() {
        Ok(s) => s,
        Err(e) => {
            warn!(error = %e, "failed to load settings at startup");
            return;
        }
    };

    for connection in app_settings.connections {
        let Some(id) = connection.id else { continue };
        let autostart = connection.autostart;
        if let Err(e) = register_connection(manager, &app_settings.db, connection).await {
            warn!(connection_id = id, error = %e, "failed to register connection at startup");
            continue;
        }
        if autostart {
            if let Err(e) = manager.start_connection(id) {
                warn!(connection_id = id, error = %e, "failed to autostart connection");
            }
        }
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
