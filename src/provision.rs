//! The bootstrap operation: authenticate, select, create.

use tracing::info;

use crate::config::Config;
use crate::db::{AdminSession, RoleBinding};
use crate::error::ProvisionError;

/// Provision the application user described by `cfg`.
///
/// Strictly linear: establish the administrative session against the
/// working database, create the application user with its single
/// `readWrite` binding, close. Nothing is retried; the first failure
/// propagates. Re-running against an already provisioned server fails at
/// the creation step; the surrounding deployment tooling is responsible
/// for running this at most once per fresh server instance.
pub async fn provision(cfg: &Config) -> Result<(), ProvisionError> {
    let mut session = AdminSession::authenticate(&cfg.server, &cfg.admin, &cfg.select_db).await?;
    info!(
        user = %cfg.admin.username,
        database = %cfg.select_db,
        "administrative session established"
    );

    let binding = RoleBinding::read_write(cfg.app_db.clone());
    session.create_user(&cfg.app, &binding).await?;
    info!(
        user = %cfg.app.username,
        role = binding.role.as_str(),
        scope = %binding.database,
        "application user created"
    );

    session.close().await
}
