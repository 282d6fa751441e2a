//! Role bindings and the user-creation statement plan.
//!
//! DDL does not take bind parameters, so names and passwords are embedded
//! with explicit quoting.

use crate::config::Credentials;

/// Permission level of a role binding. `readWrite` is the only level the
/// provisioner grants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    ReadWrite,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::ReadWrite => "readWrite",
        }
    }
}

/// An authorization grant pairing a permission level with a database scope.
/// Exactly one instance exists per run, attached to the application user at
/// creation time.
#[derive(Debug, Clone)]
pub struct RoleBinding {
    pub role: Role,
    pub database: String,
}

impl RoleBinding {
    pub fn read_write(database: impl Into<String>) -> Self {
        Self {
            role: Role::ReadWrite,
            database: database.into(),
        }
    }
}

/// Double-quote an identifier, doubling embedded quotes.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Single-quote a literal, doubling embedded quotes.
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// The statements that create the application user and attach its role
/// binding. The caller runs them inside one transaction so the user record
/// appears complete with its binding or not at all.
pub fn user_creation_plan(user: &Credentials, binding: &RoleBinding) -> Vec<String> {
    let create = format!(
        "CREATE ROLE {} WITH LOGIN PASSWORD {}",
        quote_ident(&user.username),
        quote_literal(user.password.expose()),
    );
    let grant = match binding.role {
        Role::ReadWrite => format!(
            "GRANT ALL PRIVILEGES ON DATABASE {} TO {}",
            quote_ident(&binding.database),
            quote_ident(&user.username),
        ),
    };
    vec![create, grant]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::secret::Secret;

    fn app() -> Credentials {
        Credentials {
            username: "app".to_string(),
            password: Secret::new("apppw"),
        }
    }

    #[test]
    fn identifiers_preserve_case_and_double_quotes() {
        assert_eq!(quote_ident("appdb"), r#""appdb""#);
        assert_eq!(quote_ident("AppDb"), r#""AppDb""#);
        assert_eq!(quote_ident(r#"we"ird"#), r#""we""ird""#);
    }

    #[test]
    fn literals_double_single_quotes() {
        assert_eq!(quote_literal("apppw"), "'apppw'");
        assert_eq!(quote_literal("it's"), "'it''s'");
    }

    #[test]
    fn plan_creates_the_user_then_grants_the_binding() {
        let binding = RoleBinding::read_write("appdb");
        let plan = user_creation_plan(&app(), &binding);
        assert_eq!(
            plan,
            vec![
                r#"CREATE ROLE "app" WITH LOGIN PASSWORD 'apppw'"#.to_string(),
                r#"GRANT ALL PRIVILEGES ON DATABASE "appdb" TO "app""#.to_string(),
            ]
        );
    }

    #[test]
    fn hostile_names_cannot_break_out_of_quoting() {
        let user = Credentials {
            username: r#"app"; DROP ROLE admin; --"#.to_string(),
            password: Secret::new("pw'); --"),
        };
        let plan = user_creation_plan(&user, &RoleBinding::read_write("appdb"));
        assert!(plan[0].contains(r#""app""; DROP ROLE admin; --""#));
        assert!(plan[0].contains("'pw''); --'"));
    }

    #[test]
    fn role_level_renders_as_read_write() {
        assert_eq!(Role::ReadWrite.as_str(), "readWrite");
    }
}
