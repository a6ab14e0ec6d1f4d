use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::schools::dtos::{CreateSchoolDto, SchoolResponseDto, UpdateSchoolDto};
use crate::features::schools::models::School;
use crate::shared::types::PaginationQuery;
use crate::shared::validation::normalize_grades;

const SCHOOL_COLUMNS: &str =
    "id, agency_id, name, gradeserved, address, is_active, created_at, updated_at";

pub struct SchoolService {
    pool: PgPool,
}

impl SchoolService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Active schools of one agency, optionally filtered by name
    pub async fn list(
        &self,
        agency_id: Uuid,
        search: Option<&str>,
        pagination: &PaginationQuery,
    ) -> Result<(Vec<SchoolResponseDto>, i64)> {
        let search = search.map(str::trim).filter(|s| !s.is_empty());

        let schools = sqlx::query_as::<_, School>(&format!(
            r#"
            SELECT {SCHOOL_COLUMNS}
            FROM schools
            WHERE agency_id = $1
              AND is_active
              AND ($2::text IS NULL OR name ILIKE '%' || $2 || '%')
            ORDER BY name
            LIMIT $3 OFFSET $4
            "#
        ))
        .bind(agency_id)
        .bind(search)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list schools: {:?}", e);
            AppError::Database(e)
        })?;

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM schools
            WHERE agency_id = $1
              AND is_active
              AND ($2::text IS NULL OR name ILIKE '%' || $2 || '%')
            "#,
        )
        .bind(agency_id)
        .bind(search)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count schools: {:?}", e);
            AppError::Database(e)
        })?;

        Ok((schools.into_iter().map(Into::into).collect(), total))
    }

    /// Every active school of an agency, unpaginated
    pub async fn list_all(&self, agency_id: Uuid) -> Result<Vec<School>> {
        sqlx::query_as::<_, School>(&format!(
            "SELECT {SCHOOL_COLUMNS} FROM schools WHERE agency_id = $1 AND is_active ORDER BY name"
        ))
        .bind(agency_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load schools: {:?}", e);
            AppError::Database(e)
        })
    }

    pub async fn get(&self, id: Uuid) -> Result<School> {
        sqlx::query_as::<_, School>(&format!(
            "SELECT {SCHOOL_COLUMNS} FROM schools WHERE id = $1 AND is_active"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get school: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound(format!("School {} not found", id)))
    }

    pub async fn create(&self, agency_id: Uuid, dto: CreateSchoolDto) -> Result<SchoolResponseDto> {
        let grades = normalize_grades(&dto.gradeserved)?;

        let school = sqlx::query_as::<_, School>(&format!(
            r#"
            INSERT INTO schools (agency_id, name, gradeserved, address)
            VALUES ($1, $2, $3, $4)
            RETURNING {SCHOOL_COLUMNS}
            "#
        ))
        .bind(agency_id)
        .bind(dto.name.trim())
        .bind(&grades)
        .bind(dto.address.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create school: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::info!("School created: id={}, agency={}", school.id, agency_id);
        Ok(school.into())
    }

    pub async fn update(&self, id: Uuid, dto: UpdateSchoolDto) -> Result<SchoolResponseDto> {
        let grades = dto
            .gradeserved
            .as_deref()
            .map(normalize_grades)
            .transpose()?;

        let school = sqlx::query_as::<_, School>(&format!(
            r#"
            UPDATE schools
            SET name = COALESCE($2, name),
                gradeserved = COALESCE($3, gradeserved),
                address = COALESCE($4, address),
                updated_at = NOW()
            WHERE id = $1 AND is_active
            RETURNING {SCHOOL_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(dto.name.as_deref().map(str::trim))
        .bind(grades)
        .bind(dto.address.as_deref())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update school: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound(format!("School {} not found", id)))?;

        tracing::info!("School updated: id={}", school.id);
        Ok(school.into())
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query(
            "UPDATE schools SET is_active = FALSE, updated_at = NOW() WHERE id = $1 AND is_active",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to delete school: {:?}", e);
            AppError::Database(e)
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("School {} not found", id)));
        }

        tracing::info!("School deactivated: id={}", id);
        Ok(())
    }
}
