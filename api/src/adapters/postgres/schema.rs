//! Schema bootstrap
//!
//! Creates the tables from the SeaORM entities when they are missing, plus the
//! composite index that backs feed pagination.

use sea_orm::sea_query::{Index, IndexCreateStatement, TableCreateStatement};
use sea_orm::{ConnectionTrait, DatabaseConnection, DbBackend, EntityTrait, Schema};

use crate::entity::{posts, users, votes};
use crate::error::DomainError;

/// Name of the index serving `ORDER BY created_at DESC, id DESC`
pub const FEED_INDEX: &str = "idx_posts_created_at_id";

fn create_table<E: EntityTrait>(schema: &Schema, entity: E) -> TableCreateStatement {
    let mut stmt = schema.create_table_from_entity(entity);
    stmt.if_not_exists();
    stmt
}

fn feed_index() -> IndexCreateStatement {
    Index::create()
        .if_not_exists()
        .name(FEED_INDEX)
        .table(posts::Entity)
        .col(posts::Column::CreatedAt)
        .col(posts::Column::Id)
        .to_owned()
}

/// Statements run at startup, in dependency order
fn statements(backend: DbBackend) -> Vec<sea_orm::Statement> {
    let schema = Schema::new(backend);
    vec![
        backend.build(&create_table(&schema, users::Entity)),
        backend.build(&create_table(&schema, posts::Entity)),
        backend.build(&create_table(&schema, votes::Entity)),
        backend.build(&feed_index()),
    ]
}

/// Create any missing tables and indexes
pub async fn ensure_schema(db: &DatabaseConnection) -> Result<(), DomainError> {
    for stmt in statements(db.get_database_backend()) {
        db.execute(stmt)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;
    }
    tracing::info!("Database schema ready");
    Ok(())
}
