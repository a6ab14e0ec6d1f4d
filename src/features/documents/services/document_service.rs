use std::sync::Arc;

use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::categories::CategoryService;
use crate::features::documents::dtos::{DocumentUpload, UpdateDocumentDto};
use crate::features::documents::models::Document;
use crate::features::schools::models::School;
use crate::features::schools::SchoolService;
use crate::modules::storage::{FileVisibility, MinIOClient};
use crate::shared::uploads::UploadedFile;

const DOCUMENT_COLUMNS: &str = r#"
    id, school_id, category_id, title, description, file_url, file_key,
    content_type, file_size, checksum, is_published, created_at, updated_at
"#;

fn visibility(published: bool) -> FileVisibility {
    if published {
        FileVisibility::Public
    } else {
        FileVisibility::Private
    }
}

pub struct DocumentService {
    pool: PgPool,
    schools: Arc<SchoolService>,
    categories: Arc<CategoryService>,
    storage: Arc<MinIOClient>,
}

impl DocumentService {
    pub fn new(
        pool: PgPool,
        schools: Arc<SchoolService>,
        categories: Arc<CategoryService>,
        storage: Arc<MinIOClient>,
    ) -> Self {
        Self {
            pool,
            schools,
            categories,
            storage,
        }
    }

    pub async fn school(&self, id: Uuid) -> Result<School> {
        self.schools.get(id).await
    }

    /// Documents of a school, newest first
    pub async fn list(&self, school_id: Uuid, published: Option<bool>) -> Result<Vec<Document>> {
        sqlx::query_as::<_, Document>(&format!(
            r#"
            SELECT {DOCUMENT_COLUMNS} FROM documents
            WHERE school_id = $1 AND ($2::boolean IS NULL OR is_published = $2)
            ORDER BY created_at DESC
            "#
        ))
        .bind(school_id)
        .bind(published)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list documents: {:?}", e);
            AppError::Database(e)
        })
    }

    pub async fn get(&self, id: Uuid) -> Result<Document> {
        sqlx::query_as::<_, Document>(&format!(
            "SELECT {DOCUMENT_COLUMNS} FROM documents WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get document: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound(format!("Document {} not found", id)))
    }

    /// A published document; drafts look missing
    pub async fn get_published(&self, id: Uuid) -> Result<Document> {
        let document = self.get(id).await?;
        if !document.is_published {
            return Err(AppError::NotFound(format!("Document {} not found", id)));
        }
        Ok(document)
    }

    /// Time-limited download URL for a document
    pub async fn download_url(&self, document: &Document) -> Result<String> {
        self.storage.presigned_url(&document.file_key).await
    }

    pub async fn create(
        &self,
        school: &School,
        upload: DocumentUpload,
        file: UploadedFile,
    ) -> Result<Document> {
        if let Some(category_id) = upload.category_id {
            let category = self.categories.get(category_id).await?;
            if category.agency_id != school.agency_id {
                return Err(AppError::BadRequest(
                    "Category belongs to another agency".to_string(),
                ));
            }
        }

        let path = format!(
            "documents/{}/{}-{}",
            school.id,
            Uuid::now_v7(),
            file.file_name
        );
        let key = self
            .storage
            .generate_key(visibility(upload.is_published), &path);
        self.storage
            .upload(&key, &file.data, &file.content_type)
            .await?;
        let url = self.storage.file_url(&key);

        let inserted = sqlx::query_as::<_, Document>(&format!(
            r#"
            INSERT INTO documents (
                school_id, category_id, title, description, file_url, file_key,
                content_type, file_size, checksum, is_published
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {DOCUMENT_COLUMNS}
            "#
        ))
        .bind(school.id)
        .bind(upload.category_id)
        .bind(&upload.title)
        .bind(&upload.description)
        .bind(&url)
        .bind(&key)
        .bind(&file.content_type)
        .bind(file.data.len() as i64)
        .bind(file.checksum())
        .bind(upload.is_published)
        .fetch_one(&self.pool)
        .await;

        let document = match inserted {
            Ok(document) => document,
            Err(e) => {
                tracing::error!("Failed to create document: {:?}", e);
                if let Err(cleanup) = self.storage.delete(&key).await {
                    warn!("Failed to remove orphaned upload '{}': {}", key, cleanup);
                }
                return Err(AppError::Database(e));
            }
        };

        info!(
            "Document created: id={}, school={}, published={}",
            document.id, school.id, document.is_published
        );
        Ok(document)
    }

    /// Edit metadata; a publish toggle moves the object between prefixes
    pub async fn update(&self, document: &Document, dto: UpdateDocumentDto) -> Result<Document> {
        let published = dto.is_published.unwrap_or(document.is_published);
        let key = self
            .storage
            .with_visibility(&document.file_key, visibility(published));
        let url = self.storage.file_url(&key);

        self.storage.move_object(&document.file_key, &key).await?;

        let updated = sqlx::query_as::<_, Document>(&format!(
            r#"
            UPDATE documents
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                is_published = $4,
                file_key = $5,
                file_url = $6,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {DOCUMENT_COLUMNS}
            "#
        ))
        .bind(document.id)
        .bind(&dto.title)
        .bind(&dto.description)
        .bind(published)
        .bind(&key)
        .bind(&url)
        .fetch_one(&self.pool)
        .await;

        match updated {
            Ok(updated) => {
                info!("Document updated: id={}", updated.id);
                Ok(updated)
            }
            Err(e) => {
                tracing::error!("Failed to update document: {:?}", e);
                if let Err(undo) = self.storage.move_object(&key, &document.file_key).await {
                    warn!(
                        "Document {} row still points at '{}' but object is at '{}': {}",
                        document.id, document.file_key, key, undo
                    );
                }
                Err(AppError::Database(e))
            }
        }
    }

    /// Remove the row, then the stored object
    pub async fn delete(&self, document: &Document) -> Result<()> {
        sqlx::query("DELETE FROM documents WHERE id = $1")
            .bind(document.id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete document: {:?}", e);
                AppError::Database(e)
            })?;

        if let Err(e) = self.storage.delete(&document.file_key).await {
            warn!("Failed to delete object '{}': {}", document.file_key, e);
        }

        info!("Document deleted: id={}", document.id);
        Ok(())
    }
}
