use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use sqlx::Row;

use crate::discovery::errors::DiscoveryError;
use crate::discovery::models::Content;
use crate::discovery::models::Discovery;
use crate::discovery::models::DiscoveryId;
use crate::discovery::models::DiscoveryStatus;
use crate::discovery::models::ImageUrl;
use crate::discovery::models::Slug;
use crate::discovery::models::Title;
use crate::discovery::ports::DiscoveryRepository;
use crate::user::models::UserId;

const DISCOVERY_COLUMNS: &str = "id, author_id, title, slug, excerpt, content_md, status, \
                                 image_url, published_at, like_count, created_at, updated_at";

pub struct PostgresDiscoveryRepository {
    pool: PgPool,
}

impl PostgresDiscoveryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn db_err(e: sqlx::Error) -> DiscoveryError {
    DiscoveryError::DatabaseError(e.to_string())
}

fn row_to_discovery(row: &PgRow) -> Result<Discovery, DiscoveryError> {
    let status: String = row.try_get("status").map_err(db_err)?;
    let image_url: Option<String> = row.try_get("image_url").map_err(db_err)?;

    Ok(Discovery {
        id: DiscoveryId(row.try_get("id").map_err(db_err)?),
        author_id: UserId(row.try_get("author_id").map_err(db_err)?),
        title: Title::new(row.try_get("title").map_err(db_err)?)?,
        slug: Slug::new(row.try_get("slug").map_err(db_err)?)?,
        excerpt: row.try_get("excerpt").map_err(db_err)?,
        content_md: Content::new(row.try_get("content_md").map_err(db_err)?)?,
        status: status.parse::<DiscoveryStatus>()?,
        image_url: image_url.map(ImageUrl::new).transpose()?,
        published_at: row.try_get("published_at").map_err(db_err)?,
        like_count: row.try_get("like_count").map_err(db_err)?,
        created_at: row.try_get("created_at").map_err(db_err)?,
        updated_at: row.try_get("updated_at").map_err(db_err)?,
    })
}

fn map_unique_violation(e: sqlx::Error, discovery: &Discovery) -> DiscoveryError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() && db_err.constraint() == Some("discoveries_slug_key") {
            return DiscoveryError::SlugAlreadyExists(discovery.slug.as_str().to_string());
        }
    }
    DiscoveryError::DatabaseError(e.to_string())
}

#[async_trait]
impl DiscoveryRepository for PostgresDiscoveryRepository {
    async fn create(&self, discovery: Discovery) -> Result<Discovery, DiscoveryError> {
        sqlx::query(
            r#"
            INSERT INTO discoveries
                (id, author_id, title, slug, excerpt, content_md, status, image_url,
                 published_at, like_count, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(discovery.id.0)
        .bind(discovery.author_id.0)
        .bind(discovery.title.as_str())
        .bind(discovery.slug.as_str())
        .bind(discovery.excerpt.as_deref())
        .bind(discovery.content_md.as_str())
        .bind(discovery.status.as_str())
        .bind(discovery.image_url.as_ref().map(|url| url.as_str()))
        .bind(discovery.published_at)
        .bind(discovery.like_count)
        .bind(discovery.created_at)
        .bind(discovery.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, &discovery))?;

        Ok(discovery)
    }

    async fn find_by_id(&self, id: &DiscoveryId) -> Result<Option<Discovery>, DiscoveryError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM discoveries WHERE id = $1",
            DISCOVERY_COLUMNS
        ))
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.as_ref().map(row_to_discovery).transpose()
    }

    async fn list_published(&self, limit: i64) -> Result<Vec<Discovery>, DiscoveryError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM discoveries WHERE status = 'published' \
             ORDER BY published_at DESC LIMIT $1",
            DISCOVERY_COLUMNS
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.iter().map(row_to_discovery).collect()
    }

    async fn list_all(&self) -> Result<Vec<Discovery>, DiscoveryError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM discoveries ORDER BY created_at DESC",
            DISCOVERY_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.iter().map(row_to_discovery).collect()
    }

    async fn update(&self, discovery: Discovery) -> Result<Discovery, DiscoveryError> {
        let result = sqlx::query(
            r#"
            UPDATE discoveries
            SET title = $2, excerpt = $3, content_md = $4, status = $5, image_url = $6,
                published_at = $7, updated_at = $8
            WHERE id = $1
            "#,
        )
        .bind(discovery.id.0)
        .bind(discovery.title.as_str())
        .bind(discovery.excerpt.as_deref())
        .bind(discovery.content_md.as_str())
        .bind(discovery.status.as_str())
        .bind(discovery.image_url.as_ref().map(|url| url.as_str()))
        .bind(discovery.published_at)
        .bind(discovery.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(DiscoveryError::NotFound(discovery.id.to_string()));
        }

        Ok(discovery)
    }

    async fn delete(&self, id: &DiscoveryId) -> Result<(), DiscoveryError> {
        let result = sqlx::query("DELETE FROM discoveries WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(DiscoveryError::NotFound(id.to_string()));
        }

        Ok(())
    }
}
