use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::reports::dtos::{
    CreateReportDto, CreateScheduleDto, ScheduleResponseDto, UpdateReportDto,
};
use crate::features::reports::models::{
    Report, ReportCategoryRow, ReportSchedule, ReportWithDetails,
};

const REPORT_COLUMNS: &str = "id, agency_id, name, description, created_at, updated_at";
const SCHEDULE_COLUMNS: &str = "id, report_id, schedule_time, report_name, created_at";

pub struct ReportService {
    pool: PgPool,
}

impl ReportService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Every report of an agency with categories and schedules
    pub async fn list(&self, agency_id: Uuid) -> Result<Vec<ReportWithDetails>> {
        let reports = sqlx::query_as::<_, Report>(&format!(
            "SELECT {REPORT_COLUMNS} FROM reports WHERE agency_id = $1 ORDER BY name"
        ))
        .bind(agency_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list reports: {:?}", e);
            AppError::Database(e)
        })?;

        let ids: Vec<Uuid> = reports.iter().map(|r| r.id).collect();
        self.with_details(reports, &ids).await
    }

    pub async fn get(&self, id: Uuid) -> Result<ReportWithDetails> {
        let report = sqlx::query_as::<_, Report>(&format!(
            "SELECT {REPORT_COLUMNS} FROM reports WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get report: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound(format!("Report {} not found", id)))?;

        self.with_details(vec![report], &[id])
            .await?
            .pop()
            .ok_or_else(|| AppError::NotFound(format!("Report {} not found", id)))
    }

    async fn with_details(
        &self,
        reports: Vec<Report>,
        ids: &[Uuid],
    ) -> Result<Vec<ReportWithDetails>> {
        let categories = sqlx::query_as::<_, ReportCategoryRow>(
            r#"
            SELECT rc.report_id, c.id, c.agency_id, c.name, c.color, c.created_at, c.updated_at
            FROM report_categories rc
            JOIN categories c ON c.id = rc.category_id
            WHERE rc.report_id = ANY($1)
            ORDER BY c.name
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load report categories: {:?}", e);
            AppError::Database(e)
        })?;

        let schedules = sqlx::query_as::<_, ReportSchedule>(&format!(
            "SELECT {SCHEDULE_COLUMNS} FROM report_schedules WHERE report_id = ANY($1) ORDER BY schedule_time"
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load report schedules: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(ReportWithDetails::assemble(reports, categories, schedules))
    }

    pub async fn create(&self, agency_id: Uuid, dto: CreateReportDto) -> Result<ReportWithDetails> {
        let mut tx = self.begin().await?;

        let report = sqlx::query_as::<_, Report>(&format!(
            "INSERT INTO reports (agency_id, name, description) VALUES ($1, $2, $3) RETURNING {REPORT_COLUMNS}"
        ))
        .bind(agency_id)
        .bind(dto.name.trim())
        .bind(dto.description.as_deref())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create report: {:?}", e);
            AppError::Database(e)
        })?;

        link_categories(&mut tx, &report, &dto.category_ids).await?;
        for schedule in &dto.schedules {
            insert_schedule(&mut tx, report.id, schedule).await?;
        }

        commit(tx).await?;
        tracing::info!(
            "Report created: id={}, schedules={}",
            report.id,
            dto.schedules.len()
        );

        self.get(report.id).await
    }

    pub async fn update(&self, id: Uuid, dto: UpdateReportDto) -> Result<ReportWithDetails> {
        let mut tx = self.begin().await?;

        let report = sqlx::query_as::<_, Report>(&format!(
            r#"
            UPDATE reports
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {REPORT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(dto.name.as_deref().map(str::trim))
        .bind(dto.description.as_deref())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update report: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound(format!("Report {} not found", id)))?;

        if let Some(category_ids) = &dto.category_ids {
            sqlx::query("DELETE FROM report_categories WHERE report_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to clear report categories: {:?}", e);
                    AppError::Database(e)
                })?;
            link_categories(&mut tx, &report, category_ids).await?;
        }

        commit(tx).await?;
        tracing::info!("Report updated: id={}", id);

        self.get(id).await
    }

    /// Refused while any schedule still has submissions
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        if self.count_submissions("report_id", id).await? > 0 {
            return Err(AppError::Conflict(
                "Report has submissions and cannot be deleted".to_string(),
            ));
        }

        let result = sqlx::query("DELETE FROM reports WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete report: {:?}", e);
                AppError::Database(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Report {} not found", id)));
        }

        tracing::info!("Report deleted: id={}", id);
        Ok(())
    }

    pub async fn add_schedule(
        &self,
        report: &Report,
        dto: &CreateScheduleDto,
    ) -> Result<ScheduleResponseDto> {
        let mut tx = self.begin().await?;
        let schedule = insert_schedule(&mut tx, report.id, dto).await?;
        commit(tx).await?;

        tracing::info!(
            "Schedule added: report={}, date={}",
            report.id,
            schedule.schedule_time
        );
        Ok(ScheduleResponseDto::new(schedule, &report.name))
    }

    pub async fn remove_schedule(&self, report_id: Uuid, schedule_id: Uuid) -> Result<()> {
        if self
            .count_submissions("report_schedule_id", schedule_id)
            .await?
            > 0
        {
            return Err(AppError::Conflict(
                "Schedule has submissions and cannot be removed".to_string(),
            ));
        }

        let result = sqlx::query("DELETE FROM report_schedules WHERE id = $1 AND report_id = $2")
            .bind(schedule_id)
            .bind(report_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to remove schedule: {:?}", e);
                AppError::Database(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Schedule {} not found",
                schedule_id
            )));
        }

        tracing::info!("Schedule removed: report={}, schedule={}", report_id, schedule_id);
        Ok(())
    }

    /// Create the missing (schedule, school) submissions; returns how many
    pub async fn assign_schools(&self, report: &Report, school_ids: &[Uuid]) -> Result<u64> {
        let school_ids = dedupe(school_ids);

        let known: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM schools WHERE id = ANY($1) AND agency_id = $2 AND is_active",
        )
        .bind(&school_ids)
        .bind(report.agency_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to check schools: {:?}", e);
            AppError::Database(e)
        })?;

        if known as usize != school_ids.len() {
            return Err(AppError::BadRequest(
                "Every school must be an active school of the report's agency".to_string(),
            ));
        }

        let result = sqlx::query(
            r#"
            INSERT INTO submissions (agency_id, report_id, report_schedule_id, school_id, due_date)
            SELECT r.agency_id, r.id, rs.id, s.id, rs.schedule_time
            FROM reports r
            JOIN report_schedules rs ON rs.report_id = r.id
            CROSS JOIN UNNEST($2::uuid[]) AS s(id)
            WHERE r.id = $1
            ON CONFLICT (report_schedule_id, school_id) DO NOTHING
            "#,
        )
        .bind(report.id)
        .bind(&school_ids)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to assign report: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::info!(
            "Report {} assigned to {} schools, {} submissions created",
            report.id,
            school_ids.len(),
            result.rows_affected()
        );
        Ok(result.rows_affected())
    }

    async fn count_submissions(&self, column: &str, id: Uuid) -> Result<i64> {
        sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM submissions WHERE {column} = $1"
        ))
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count submissions: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn begin(&self) -> Result<Transaction<'static, Postgres>> {
        self.pool.begin().await.map_err(|e| {
            tracing::error!("Failed to start transaction: {:?}", e);
            AppError::Database(e)
        })
    }
}

async fn commit(tx: Transaction<'static, Postgres>) -> Result<()> {
    tx.commit().await.map_err(|e| {
        tracing::error!("Failed to commit transaction: {:?}", e);
        AppError::Database(e)
    })
}

/// Link categories of the report's own agency; unknown ids are rejected
async fn link_categories(
    tx: &mut Transaction<'static, Postgres>,
    report: &Report,
    category_ids: &[Uuid],
) -> Result<()> {
    let category_ids = dedupe(category_ids);
    if category_ids.is_empty() {
        return Ok(());
    }

    let result = sqlx::query(
        r#"
        INSERT INTO report_categories (report_id, category_id)
        SELECT $1, id FROM categories WHERE id = ANY($2) AND agency_id = $3
        "#,
    )
    .bind(report.id)
    .bind(&category_ids)
    .bind(report.agency_id)
    .execute(&mut **tx)
    .await
    .map_err(|e| {
        tracing::error!("Failed to link report categories: {:?}", e);
        AppError::Database(e)
    })?;

    if result.rows_affected() as usize != category_ids.len() {
        return Err(AppError::BadRequest(
            "Unknown category for this agency".to_string(),
        ));
    }
    Ok(())
}

async fn insert_schedule(
    tx: &mut Transaction<'static, Postgres>,
    report_id: Uuid,
    dto: &CreateScheduleDto,
) -> Result<ReportSchedule> {
    let report_name = dto
        .report_name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty());

    sqlx::query_as::<_, ReportSchedule>(&format!(
        "INSERT INTO report_schedules (report_id, schedule_time, report_name) VALUES ($1, $2, $3) RETURNING {SCHEDULE_COLUMNS}"
    ))
    .bind(report_id)
    .bind(dto.schedule_time)
    .bind(report_name)
    .fetch_one(&mut **tx)
    .await
    .map_err(|e| {
        tracing::error!("Failed to create schedule: {:?}", e);
        AppError::Database(e)
    })
}

/// Drop repeated ids, keeping first occurrence order
fn dedupe(ids: &[Uuid]) -> Vec<Uuid> {
    let mut seen = Vec::with_capacity(ids.len());
    for id in ids {
        if !seen.contains(id) {
            seen.push(*id);
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedupe_keeps_first_occurrence() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        assert_eq!(dedupe(&[a, b, a, b, a]), vec![a, b]);
        assert!(dedupe(&[]).is_empty());
    }
}
