//! Typed process configuration.
//!
//! Assembled once in `main` from the environment and passed by value into
//! the provisioning call; no other module reads environment variables.
//! Validation is atomic: every missing or empty required entry is reported
//! in a single error, before any network activity.

use figment::{Figment, providers::Env};
use serde::Deserialize;

use crate::error::ProvisionError;
use crate::secret::Secret;

/// Environment variables recognized by the provisioner.
const KEYS: [&str; 9] = [
    "ADMIN_USER",
    "ADMIN_PASS",
    "SELECT_DB",
    "APP_USER",
    "APP_PASS",
    "APP_DB",
    "DB_HOST",
    "DB_PORT",
    "LOG_LEVEL",
];

/// A username/password pair. Two instances exist per run: the
/// administrative identity and the application identity being provisioned.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: Secret,
}

/// Address of the target server. The server itself is an external
/// collaborator; these entries only say where to reach it.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub admin: Credentials,
    /// Working database the administrative session binds.
    pub select_db: String,
    pub app: Credentials,
    /// Scope of the application user's role binding. Configured
    /// independently of `select_db`; the two are not assumed equal.
    pub app_db: String,
    pub log_level: String,
}

/// Raw extraction target. Everything is optional so that validation can
/// report the full set of missing entries at once.
#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(alias = "ADMIN_USER")]
    admin_user: Option<String>,
    #[serde(alias = "ADMIN_PASS")]
    admin_pass: Option<Secret>,
    #[serde(alias = "SELECT_DB")]
    select_db: Option<String>,
    #[serde(alias = "APP_USER")]
    app_user: Option<String>,
    #[serde(alias = "APP_PASS")]
    app_pass: Option<Secret>,
    #[serde(alias = "APP_DB")]
    app_db: Option<String>,
    #[serde(alias = "DB_HOST")]
    db_host: Option<String>,
    #[serde(alias = "DB_PORT")]
    db_port: Option<u16>,
    #[serde(alias = "LOG_LEVEL")]
    log_level: Option<String>,
}

impl Config {
    /// Read and validate the full configuration from the environment.
    pub fn from_env() -> Result<Self, ProvisionError> {
        let raw: RawConfig = Figment::new()
            .merge(Env::raw().only(&KEYS))
            .extract()
            .map_err(|e| ProvisionError::Configuration(e.to_string()))?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawConfig) -> Result<Self, ProvisionError> {
        let mut missing: Vec<&'static str> = Vec::new();

        let admin_user = require(raw.admin_user, "ADMIN_USER", &mut missing);
        let admin_pass = require_secret(raw.admin_pass, "ADMIN_PASS", &mut missing);
        let select_db = require(raw.select_db, "SELECT_DB", &mut missing);
        let app_user = require(raw.app_user, "APP_USER", &mut missing);
        let app_pass = require_secret(raw.app_pass, "APP_PASS", &mut missing);
        let app_db = require(raw.app_db, "APP_DB", &mut missing);

        if !missing.is_empty() {
            return Err(ProvisionError::Configuration(format!(
                "missing or empty environment variables: {}",
                missing.join(", ")
            )));
        }

        Ok(Config {
            server: ServerConfig {
                host: raw
                    .db_host
                    .filter(|h| !h.is_empty())
                    .unwrap_or_else(|| "localhost".to_string()),
                port: raw.db_port.unwrap_or(5432),
            },
            admin: Credentials {
                username: admin_user,
                password: admin_pass,
            },
            select_db,
            app: Credentials {
                username: app_user,
                password: app_pass,
            },
            app_db,
            log_level: raw.log_level.unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn require(slot: Option<String>, name: &'static str, missing: &mut Vec<&'static str>) -> String {
    match slot {
        Some(v) if !v.is_empty() => v,
        _ => {
            missing.push(name);
            String::new()
        }
    }
}

fn require_secret(
    slot: Option<Secret>,
    name: &'static str,
    missing: &mut Vec<&'static str>,
) -> Secret {
    match slot {
        Some(v) if !v.expose().is_empty() => v,
        _ => {
            missing.push(name);
            Secret::new("")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    fn set_required(jail: &mut Jail) {
        jail.set_env("ADMIN_USER", "root");
        jail.set_env("ADMIN_PASS", "rootpw");
        jail.set_env("SELECT_DB", "admin");
        jail.set_env("APP_USER", "app");
        jail.set_env("APP_PASS", "apppw");
        jail.set_env("APP_DB", "appdb");
    }

    #[test]
    fn reads_the_reference_environment() {
        Jail::expect_with(|jail| {
            set_required(jail);
            let cfg = Config::from_env().expect("config should load");
            assert_eq!(cfg.admin.username, "root");
            assert_eq!(cfg.admin.password.expose(), "rootpw");
            assert_eq!(cfg.select_db, "admin");
            assert_eq!(cfg.app.username, "app");
            assert_eq!(cfg.app.password.expose(), "apppw");
            assert_eq!(cfg.app_db, "appdb");
            Ok(())
        });
    }

    #[test]
    fn ambient_entries_have_defaults() {
        Jail::expect_with(|jail| {
            set_required(jail);
            let cfg = Config::from_env().expect("config should load");
            assert_eq!(cfg.server.host, "localhost");
            assert_eq!(cfg.server.port, 5432);
            assert_eq!(cfg.log_level, "info");
            Ok(())
        });
    }

    #[test]
    fn ambient_entries_are_overridable() {
        Jail::expect_with(|jail| {
            set_required(jail);
            jail.set_env("DB_HOST", "db.internal");
            jail.set_env("DB_PORT", "6432");
            jail.set_env("LOG_LEVEL", "debug");
            let cfg = Config::from_env().expect("config should load");
            assert_eq!(cfg.server.host, "db.internal");
            assert_eq!(cfg.server.port, 6432);
            assert_eq!(cfg.log_level, "debug");
            Ok(())
        });
    }

    #[test]
    fn missing_entries_are_reported_together() {
        Jail::expect_with(|jail| {
            jail.set_env("ADMIN_USER", "root");
            jail.set_env("SELECT_DB", "admin");
            jail.set_env("APP_USER", "app");
            jail.set_env("APP_DB", "appdb");
            let err = Config::from_env().expect_err("config should be rejected");
            let msg = err.to_string();
            assert!(msg.contains("ADMIN_PASS"), "got: {msg}");
            assert!(msg.contains("APP_PASS"), "got: {msg}");
            Ok(())
        });
    }

    #[test]
    fn empty_values_count_as_missing() {
        Jail::expect_with(|jail| {
            set_required(jail);
            jail.set_env("APP_DB", "");
            let err = Config::from_env().expect_err("config should be rejected");
            assert!(err.to_string().contains("APP_DB"));
            Ok(())
        });
    }

    #[test]
    fn debug_output_never_contains_passwords() {
        Jail::expect_with(|jail| {
            set_required(jail);
            let cfg = Config::from_env().expect("config should load");
            let dump = format!("{cfg:?}");
            assert!(!dump.contains("rootpw"));
            assert!(!dump.contains("apppw"));
            Ok(())
        });
    }
}
