//! PostgreSQL adapters
//!
//! Implementations of repository traits using SeaORM and PostgreSQL.

pub mod post_repo;
pub mod schema;
pub mod user_repo;


pub use post_repo::PostgresPostRepository;
pub use schema::ensure_schema;
pub use user_repo::PostgresUserRepository;
