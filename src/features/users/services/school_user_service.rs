use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{map_unique_violation, AppError, Result};
use crate::features::users::dtos::{
    CreateSchoolUserDto, SchoolUserResponseDto, UpdateSchoolUserDto,
};
use crate::features::users::models::{SchoolUser, SchoolUserRole};
use crate::shared::types::PaginationQuery;

const USER_COLUMNS: &str =
    "id, agency_id, school_id, first_name, last_name, email, role, created_at, updated_at";

pub struct SchoolUserService {
    pool: PgPool,
}

impl SchoolUserService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(
        &self,
        agency_id: Uuid,
        role: Option<SchoolUserRole>,
        pagination: &PaginationQuery,
    ) -> Result<(Vec<SchoolUserResponseDto>, i64)> {
        let users = sqlx::query_as::<_, SchoolUser>(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM school_users
            WHERE agency_id = $1 AND ($2::school_user_role IS NULL OR role = $2)
            ORDER BY first_name, last_name
            LIMIT $3 OFFSET $4
            "#
        ))
        .bind(agency_id)
        .bind(role)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list school users: {:?}", e);
            AppError::Database(e)
        })?;

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM school_users WHERE agency_id = $1 AND ($2::school_user_role IS NULL OR role = $2)",
        )
        .bind(agency_id)
        .bind(role)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count school users: {:?}", e);
            AppError::Database(e)
        })?;

        Ok((users.into_iter().map(Into::into).collect(), total))
    }

    pub async fn list_all(&self, agency_id: Uuid) -> Result<Vec<SchoolUser>> {
        sqlx::query_as::<_, SchoolUser>(&format!(
            "SELECT {USER_COLUMNS} FROM school_users WHERE agency_id = $1"
        ))
        .bind(agency_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load school users: {:?}", e);
            AppError::Database(e)
        })
    }

    pub async fn get(&self, id: Uuid) -> Result<SchoolUser> {
        sqlx::query_as::<_, SchoolUser>(&format!(
            "SELECT {USER_COLUMNS} FROM school_users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get school user: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))
    }

    pub async fn create(
        &self,
        agency_id: Uuid,
        dto: CreateSchoolUserDto,
    ) -> Result<SchoolUserResponseDto> {
        if let Some(school_id) = dto.school_id {
            self.ensure_school_in_agency(school_id, agency_id).await?;
        }

        let email = dto.email.trim().to_lowercase();
        let user = sqlx::query_as::<_, SchoolUser>(&format!(
            r#"
            INSERT INTO school_users (agency_id, school_id, first_name, last_name, email, role)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(agency_id)
        .bind(dto.school_id)
        .bind(dto.first_name.trim())
        .bind(dto.last_name.trim())
        .bind(&email)
        .bind(dto.role)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create school user: {:?}", e);
            map_unique_violation(e, format!("A user with email '{}' already exists", email))
        })?;

        tracing::info!("School user created: id={}, agency={}", user.id, agency_id);
        Ok(user.into())
    }

    pub async fn update(
        &self,
        existing: &SchoolUser,
        dto: UpdateSchoolUserDto,
    ) -> Result<SchoolUserResponseDto> {
        if let Some(school_id) = dto.school_id {
            self.ensure_school_in_agency(school_id, existing.agency_id)
                .await?;
        }

        let email = dto.email.as_deref().map(|e| e.trim().to_lowercase());
        let user = sqlx::query_as::<_, SchoolUser>(&format!(
            r#"
            UPDATE school_users
            SET school_id = COALESCE($2, school_id),
                first_name = COALESCE($3, first_name),
                last_name = COALESCE($4, last_name),
                email = COALESCE($5, email),
                role = COALESCE($6, role),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(existing.id)
        .bind(dto.school_id)
        .bind(dto.first_name.as_deref().map(str::trim))
        .bind(dto.last_name.as_deref().map(str::trim))
        .bind(email.as_deref())
        .bind(dto.role)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update school user: {:?}", e);
            map_unique_violation(e, "A user with this email already exists")
        })?;

        tracing::info!("School user updated: id={}", user.id);
        Ok(user.into())
    }

    /// Assigned submissions fall back to unassigned
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM school_users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete school user: {:?}", e);
                AppError::Database(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("User {} not found", id)));
        }

        tracing::info!("School user deleted: id={}", id);
        Ok(())
    }

    async fn ensure_school_in_agency(&self, school_id: Uuid, agency_id: Uuid) -> Result<()> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM schools WHERE id = $1 AND agency_id = $2 AND is_active)",
        )
        .bind(school_id)
        .bind(agency_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to check school: {:?}", e);
            AppError::Database(e)
        })?;

        if exists {
            Ok(())
        } else {
            Err(AppError::BadRequest(format!(
                "School {} does not belong to this agency",
                school_id
            )))
        }
    }
}
