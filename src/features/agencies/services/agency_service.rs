use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{map_unique_violation, AppError, Result};
use crate::features::agencies::dtos::{AgencyResponseDto, CreateAgencyDto, UpdateAgencyDto};
use crate::features::agencies::models::Agency;
use crate::shared::types::PaginationQuery;
use crate::shared::validation::ensure_code;

const AGENCY_COLUMNS: &str = "id, name, slug, is_active, created_at, updated_at";

pub struct AgencyService {
    pool: PgPool,
}

impl AgencyService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(
        &self,
        pagination: &PaginationQuery,
    ) -> Result<(Vec<AgencyResponseDto>, i64)> {
        let agencies = sqlx::query_as::<_, Agency>(&format!(
            "SELECT {AGENCY_COLUMNS} FROM agencies ORDER BY name LIMIT $1 OFFSET $2"
        ))
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list agencies: {:?}", e);
            AppError::Database(e)
        })?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM agencies")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count agencies: {:?}", e);
                AppError::Database(e)
            })?;

        Ok((agencies.into_iter().map(Into::into).collect(), total))
    }

    pub async fn get(&self, id: Uuid) -> Result<AgencyResponseDto> {
        sqlx::query_as::<_, Agency>(&format!(
            "SELECT {AGENCY_COLUMNS} FROM agencies WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get agency: {:?}", e);
            AppError::Database(e)
        })?
        .map(Into::into)
        .ok_or_else(|| AppError::NotFound(format!("Agency {} not found", id)))
    }

    pub async fn create(&self, dto: CreateAgencyDto) -> Result<AgencyResponseDto> {
        ensure_code("slug", &dto.slug)?;

        let agency = sqlx::query_as::<_, Agency>(&format!(
            "INSERT INTO agencies (name, slug) VALUES ($1, $2) RETURNING {AGENCY_COLUMNS}"
        ))
        .bind(dto.name.trim())
        .bind(&dto.slug)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create agency: {:?}", e);
            map_unique_violation(e, format!("Agency slug '{}' is already taken", dto.slug))
        })?;

        tracing::info!("Agency created: id={}, slug={}", agency.id, agency.slug);
        Ok(agency.into())
    }

    pub async fn update(&self, id: Uuid, dto: UpdateAgencyDto) -> Result<AgencyResponseDto> {
        let agency = sqlx::query_as::<_, Agency>(&format!(
            r#"
            UPDATE agencies
            SET name = COALESCE($2, name),
                is_active = COALESCE($3, is_active),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {AGENCY_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(dto.name.as_deref().map(str::trim))
        .bind(dto.is_active)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update agency: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound(format!("Agency {} not found", id)))?;

        tracing::info!("Agency updated: id={}", agency.id);
        Ok(agency.into())
    }
}
