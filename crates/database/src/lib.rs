//! # Martdash Database Crate
//!
//! Everything that touches MySQL lives here: the pool, the schema
//! migrations, the repository of dashboard queries and product mutations,
//! and the helpers behind the admin SQL console.
//!
//! ## Architectural Principles
//!
//! - **Layer Adapter:** the rest of the workspace never sees SQL. Handlers
//!   call repository methods and get typed rows or a `DbError` back.
//! - **Runtime-Checked Queries:** every query goes through the runtime
//!   `sqlx` APIs (`query`, `query_as`, `raw_sql`), so the workspace builds
//!   without a live database; the schema is versioned through embedded
//!   migrations instead.
//! - **Asynchronous & Pooled:** all operations are async over a shared
//!   `MySqlPool`; sizing comes from configuration, not constants.
//!
//! ## Public API
//!
//! - `connect` / `run_migrations`: pool construction and schema bootstrap.
//! - `DbRepository`: the data-access methods the HTTP layer calls
//!   (e.g. `revenue_by_method`, `delete_product`, `execute_statement`).
//! - `console`: denylist, statement classification, and dynamic row
//!   decoding for the ad-hoc SQL endpoint.
//! - `DbError`: what any of the above can fail with.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod console;
pub mod error;
pub mod repository;

// Re-export the key components to create a clean, public-facing API.
pub use connection::{connect, run_migrations};
pub use console::{forbidden_keyword, ExecuteOutcome, StatementKind, FORBIDDEN_KEYWORDS};
pub use error::DbError;
pub use repository::DbRepository;
