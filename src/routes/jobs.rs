use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde::Deserialize;
use sqlx::{postgres::PgRow, PgPool, Row};
use uuid::Uuid;

use crate::domain::job::{Job, JobChanges, NewJob, NewJobBody};
use crate::domain::non_blank;
use crate::domain::publish_event::PublishEvent;
use crate::notifier::Notifier;
use crate::routes::errors::ContentError;

const JOB_COLUMNS: &str =
    "id, title, company, category, description, apply_link, deadline, created_at";

#[derive(Deserialize, Debug)]
pub struct JobFilters {
    pub category: Option<String>,
}

fn job_from_row(row: PgRow) -> Job {
    Job {
        id: row.get("id"),
        title: row.get("title"),
        company: row.get("company"),
        category: row.get("category"),
        description: row.get("description"),
        apply_link: row.get("apply_link"),
        deadline: row.get("deadline"),
        created_at: row.get("created_at"),
    }
}

#[tracing::instrument(name = "Listing jobs", skip(db_pool))]
pub async fn list_jobs(
    filters: web::Query<JobFilters>,
    db_pool: web::Data<PgPool>,
) -> Result<HttpResponse, ContentError> {
    let jobs = sqlx::query(&format!(
        r#"
        SELECT {}
        FROM jobs
        WHERE ($1::text IS NULL OR category = $1)
        ORDER BY created_at DESC
        "#,
        JOB_COLUMNS
    ))
    .bind(non_blank(&filters.category))
    .map(job_from_row)
    .fetch_all(db_pool.get_ref())
    .await
    .map_err(|err| ContentError::DatabaseError("fetch jobs", err))?;

    Ok(HttpResponse::Ok().json(jobs))
}

#[tracing::instrument(
    name = "Adding a new job",
    skip(body, db_pool, notifier),
    fields(job_title = %body.title)
)]
pub async fn create_job(
    body: web::Json<NewJobBody>,
    db_pool: web::Data<PgPool>,
    notifier: web::Data<Notifier>,
) -> Result<HttpResponse, ContentError> {
    let new_job: NewJob = body
        .into_inner()
        .try_into()
        .map_err(ContentError::ValidationError)?;

    let job = insert_job(&new_job, &db_pool)
        .await
        .map_err(|err| ContentError::DatabaseError("add job", err))?;

    notifier.spawn_notify_all(PublishEvent::job(
        &job.title,
        job.description.as_deref(),
        job.apply_link.as_deref(),
    ));

    Ok(HttpResponse::Ok().json(serde_json::json!({ "success": true, "id": job.id })))
}

#[tracing::instrument(name = "Insert a new job into the database", skip(new_job, db_pool))]
async fn insert_job(new_job: &NewJob, db_pool: &PgPool) -> Result<Job, sqlx::Error> {
    sqlx::query(&format!(
        r#"
        INSERT INTO jobs (id, title, company, category, description, apply_link, deadline, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING {}
        "#,
        JOB_COLUMNS
    ))
    .bind(Uuid::new_v4())
    .bind(new_job.title.as_ref())
    .bind(&new_job.company)
    .bind(&new_job.category)
    .bind(&new_job.description)
    .bind(&new_job.apply_link)
    .bind(new_job.deadline)
    .bind(Utc::now())
    .map(job_from_row)
    .fetch_one(db_pool)
    .await
}

#[tracing::instrument(name = "Fetching a job", skip(db_pool))]
pub async fn get_job(
    job_id: web::Path<Uuid>,
    db_pool: web::Data<PgPool>,
) -> Result<HttpResponse, ContentError> {
    let job = sqlx::query(&format!("SELECT {} FROM jobs WHERE id = $1", JOB_COLUMNS))
        .bind(job_id.into_inner())
        .map(job_from_row)
        .fetch_optional(db_pool.get_ref())
        .await
        .map_err(|err| ContentError::DatabaseError("fetch job", err))?
        .ok_or(ContentError::NotFound("Job"))?;

    Ok(HttpResponse::Ok().json(job))
}

#[tracing::instrument(name = "Updating a job", skip(changes, db_pool))]
pub async fn update_job(
    job_id: web::Path<Uuid>,
    changes: web::Json<JobChanges>,
    db_pool: web::Data<PgPool>,
) -> Result<HttpResponse, ContentError> {
    let changes = changes
        .into_inner()
        .validate()
        .map_err(ContentError::ValidationError)?;

    sqlx::query(
        r#"
        UPDATE jobs
        SET title = COALESCE($2, title),
            company = COALESCE($3, company),
            category = COALESCE($4, category),
            description = COALESCE($5, description),
            apply_link = COALESCE($6, apply_link),
            deadline = COALESCE($7, deadline)
        WHERE id = $1
        RETURNING id
        "#,
    )
    .bind(job_id.into_inner())
    .bind(&changes.title)
    .bind(&changes.company)
    .bind(&changes.category)
    .bind(&changes.description)
    .bind(&changes.apply_link)
    .bind(changes.deadline)
    .fetch_optional(db_pool.get_ref())
    .await
    .map_err(|err| ContentError::DatabaseError("update job", err))?
    .ok_or(ContentError::NotFound("Job"))?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "success": true })))
}

#[tracing::instrument(name = "Deleting a job", skip(db_pool))]
pub async fn delete_job(
    job_id: web::Path<Uuid>,
    db_pool: web::Data<PgPool>,
) -> Result<HttpResponse, ContentError> {
    let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
        .bind(job_id.into_inner())
        .execute(db_pool.get_ref())
        .await
        .map_err(|err| ContentError::DatabaseError("delete job", err))?;

    if result.rows_affected() == 0 {
        return Err(ContentError::NotFound("Job"));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({ "success": true })))
}
