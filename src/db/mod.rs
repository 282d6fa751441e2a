//! Database access: the administrative session and the statement plan it
//! executes.
//!
//! Layout:
//! - `session.rs`: single-connection administrative session
//! - `sql.rs`: role bindings, quoting, user-creation statements

pub mod session;
pub mod sql;

pub use session::AdminSession;
pub use sql::{Role, RoleBinding};
