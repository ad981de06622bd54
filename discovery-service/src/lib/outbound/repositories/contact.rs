use async_trait::async_trait;
use sqlx::PgPool;

use crate::contact::errors::ContactError;
use crate::contact::models::ContactMessage;
use crate::contact::ports::ContactRepository;

pub struct PostgresContactRepository {
    pool: PgPool,
}

impl PostgresContactRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContactRepository for PostgresContactRepository {
    async fn create(&self, message: ContactMessage) -> Result<ContactMessage, ContactError> {
        sqlx::query(
            r#"
            INSERT INTO contact_messages
                (id, name, email, subject, message, user_id, status, source, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(message.id.0)
        .bind(&message.name)
        .bind(message.email.as_str())
        .bind(message.subject.as_deref())
        .bind(&message.message)
        .bind(message.user_id.map(|id| id.0))
        .bind(message.status.as_str())
        .bind(&message.source)
        .bind(message.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| ContactError::DatabaseError(e.to_string()))?;

        Ok(message)
    }
}
