//! # gig-ledger backend
//!
//! Earnings, mileage and expense tracking for gig-economy drivers.
//!
//! This crate is the session-driven synchronization core behind the app:
//!
//! - **Storage**: the boundary to the remote store, raw rows and traits
//! - **Domain**: session monitor, snapshot loader, view router, mutations
//! - **Shell**: the single owner of application state and the view
//!
//! The surrounding presentation layer only renders what the shell exposes;
//! every branching decision (what to show, when) is made here.

pub mod config;
pub mod domain;
pub mod shell;
pub mod storage;

use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use crate::config::AppConfig;
use crate::domain::auth::AuthProvider;
use crate::storage::sqlite::{DbConnection, SqliteStore};

pub use shell::AppShell;

/// Wire up storage and the application shell
pub async fn initialize_shell(config: &AppConfig, auth: Arc<dyn AuthProvider>) -> Result<AppShell> {
    info!("setting up database");
    let db = DbConnection::new(&config.database_url).await?;

    info!("setting up application shell");
    let store = Arc::new(SqliteStore::new(db));
    Ok(AppShell::new(store, auth))
}
