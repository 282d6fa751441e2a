use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::{ConnectOptions, Connection};

use crate::config::{Credentials, ServerConfig};
use crate::db::sql::{self, RoleBinding};
use crate::error::ProvisionError;

/// A single authenticated connection bound to the working database.
///
/// One instance exists per run; it is consumed by `close` after the
/// provisioning call completes.
pub struct AdminSession {
    conn: PgConnection,
}

impl AdminSession {
    /// Authenticate against the server and bind the working database.
    ///
    /// The working database is part of session startup; nothing here
    /// validates its existence beyond what the server itself reports.
    pub async fn authenticate(
        server: &ServerConfig,
        admin: &Credentials,
        database: &str,
    ) -> Result<Self, ProvisionError> {
        let opts = PgConnectOptions::new()
            .host(&server.host)
            .port(server.port)
            .username(&admin.username)
            .password(admin.password.expose())
            .database(database);
        let conn = opts.connect().await.map_err(ProvisionError::session)?;
        Ok(Self { conn })
    }

    /// Create the application user with its role binding attached.
    ///
    /// The statement plan runs in one transaction: the user record appears
    /// complete with its binding or not at all. Not idempotent; an existing
    /// user of the same name makes the whole call fail.
    pub async fn create_user(
        &mut self,
        user: &Credentials,
        binding: &RoleBinding,
    ) -> Result<(), ProvisionError> {
        let mut tx = self.conn.begin().await?;
        for stmt in sql::user_creation_plan(user, binding) {
            sqlx::query(&stmt)
                .execute(&mut *tx)
                .await
                .map_err(ProvisionError::user_creation)?;
        }
        tx.commit().await?;
        Ok(())
    }

    /// Terminate the session cleanly.
    pub async fn close(self) -> Result<(), ProvisionError> {
        self.conn.close().await?;
        Ok(())
    }
}
