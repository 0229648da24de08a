//! PostgreSQL adapter for PostRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set, SqlErr, TransactionTrait,
};

use crate::domain::entities::{
    FeedCursor, NewPost, Post, PostCreator, PostId, UserId, VoteOutcome, VoteValue,
};
use crate::domain::ports::PostRepository;
use crate::entity::{posts, users, votes};
use crate::error::DomainError;

/// PostgreSQL implementation of PostRepository
pub struct PostgresPostRepository {
    db: DatabaseConnection,
}

impl PostgresPostRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Keyset filter: rows strictly after the cursor in `(created_at, id)` descending order
fn cursor_condition(cursor: FeedCursor) -> Condition {
    let created_at = cursor.created_at.fixed_offset();
    match cursor.id {
        None => Condition::all().add(posts::Column::CreatedAt.lt(created_at)),
        Some(id) => Condition::any()
            .add(posts::Column::CreatedAt.lt(created_at))
            .add(
                Condition::all()
                    .add(posts::Column::CreatedAt.eq(created_at))
                    .add(posts::Column::Id.lt(id.0)),
            ),
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_feed(
        &self,
        limit: u64,
        cursor: Option<FeedCursor>,
    ) -> Result<Vec<Post>, DomainError> {
        let mut query = posts::Entity::find().find_also_related(users::Entity);
        if let Some(cursor) = cursor {
            query = query.filter(cursor_condition(cursor));
        }

        let rows = query
            .order_by_desc(posts::Column::CreatedAt)
            .order_by_desc(posts::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        rows.into_iter()
            .map(|(post, creator)| to_post(post, creator))
            .collect()
    }

    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, DomainError> {
        let result = posts::Entity::find_by_id(id.0)
            .find_also_related(users::Entity)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        result
            .map(|(post, creator)| to_post(post, creator))
            .transpose()
    }

    async fn create(&self, post: &NewPost) -> Result<Post, DomainError> {
        let now = Utc::now().fixed_offset();

        let model = posts::ActiveModel {
            title: Set(post.title.clone()),
            text: Set(post.text.clone()),
            points: Set(0),
            creator_id: Set(post.creator_id.0),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model.insert(&self.db).await.map_err(|e| match e.sql_err() {
            Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
                DomainError::NotFound(format!("User {} not found", post.creator_id))
            }
            _ => DomainError::Database(e.to_string()),
        })?;

        self.find_by_id(PostId(result.id)).await?.ok_or_else(|| {
            DomainError::Internal(format!("Post {} vanished after insert", result.id))
        })
    }

    async fn update_title(&self, id: PostId, title: &str) -> Result<Option<Post>, DomainError> {
        let result = posts::Entity::update_many()
            .col_expr(posts::Column::Title, Expr::value(title))
            .col_expr(
                posts::Column::UpdatedAt,
                Expr::value(Utc::now().fixed_offset()),
            )
            .filter(posts::Column::Id.eq(id.0))
            .exec(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        if result.rows_affected == 0 {
            return Ok(None);
        }
        self.find_by_id(id).await
    }

    async fn delete(&self, id: PostId) -> Result<bool, DomainError> {
        let result = posts::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.rows_affected > 0)
    }

    async fn vote(
        &self,
        post_id: PostId,
        user_id: UserId,
        value: VoteValue,
    ) -> Result<VoteOutcome, DomainError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        let existing = votes::Entity::find_by_id((user_id.0, post_id.0))
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        let outcome = VoteOutcome::resolve(
            existing.as_ref().and_then(|v| VoteValue::from_i32(v.value)),
            value,
        );

        let vote = votes::ActiveModel {
            user_id: Set(user_id.0),
            post_id: Set(post_id.0),
            value: Set(value.as_i32()),
        };
        let written = match outcome {
            VoteOutcome::Unchanged => Ok(()),
            VoteOutcome::Cast => vote.insert(&txn).await.map(|_| ()),
            VoteOutcome::Changed => vote.update(&txn).await.map(|_| ()),
        };
        written.map_err(|e| vote_error(e, post_id))?;

        let delta = outcome.points_delta(value);
        if delta != 0 {
            // Atomic increment, concurrent votes by other users must not be lost
            let stmt = sea_orm::Statement::from_sql_and_values(
                sea_orm::DatabaseBackend::Postgres,
                "UPDATE posts SET points = points + $1 WHERE id = $2",
                [delta.into(), post_id.0.into()],
            );
            txn.execute(stmt)
                .await
                .map_err(|e| DomainError::Database(e.to_string()))?;
        }

        txn.commit()
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(outcome)
    }
}

fn vote_error(e: DbErr, post_id: PostId) -> DomainError {
    match e.sql_err() {
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
            DomainError::NotFound(format!("Post {} not found", post_id))
        }
        _ => DomainError::Database(e.to_string()),
    }
}

/// Convert a post row and its joined creator into a domain post
fn to_post(model: posts::Model, creator: Option<users::Model>) -> Result<Post, DomainError> {
    let creator = creator.ok_or_else(|| {
        DomainError::Database(format!(
            "Post {} references missing user {}",
            model.id, model.creator_id
        ))
    })?;

    Ok(Post {
        id: PostId(model.id),
        title: model.title,
        text: model.text,
        points: model.points,
        creator_id: UserId(model.creator_id),
        creator: PostCreator {
            id: UserId(creator.id),
            username: creator.username,
            email: creator.email,
        },
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    })
}
