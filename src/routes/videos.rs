use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde::Deserialize;
use sqlx::{postgres::PgRow, PgPool, Row};
use uuid::Uuid;

use crate::domain::non_blank;
use crate::domain::publish_event::PublishEvent;
use crate::domain::video::{NewVideo, NewVideoBody, Video, VideoChanges};
use crate::notifier::Notifier;
use crate::routes::errors::ContentError;

const VIDEO_COLUMNS: &str = "id, title, language, category, link, created_at";

#[derive(Deserialize, Debug)]
pub struct VideoFilters {
    pub language: Option<String>,
    pub category: Option<String>,
}

fn video_from_row(row: PgRow) -> Video {
    Video {
        id: row.get("id"),
        title: row.get("title"),
        language: row.get("language"),
        category: row.get("category"),
        link: row.get("link"),
        created_at: row.get("created_at"),
    }
}

#[tracing::instrument(name = "Listing videos", skip(db_pool))]
pub async fn list_videos(
    filters: web::Query<VideoFilters>,
    db_pool: web::Data<PgPool>,
) -> Result<HttpResponse, ContentError> {
    let videos = sqlx::query(&format!(
        r#"
        SELECT {}
        FROM videos
        WHERE ($1::text IS NULL OR lower(language) = lower($1))
          AND ($2::text IS NULL OR lower(category) = lower($2))
        ORDER BY created_at DESC
        "#,
        VIDEO_COLUMNS
    ))
    .bind(non_blank(&filters.language))
    .bind(non_blank(&filters.category))
    .map(video_from_row)
    .fetch_all(db_pool.get_ref())
    .await
    .map_err(|err| ContentError::DatabaseError("fetch videos", err))?;

    Ok(HttpResponse::Ok().json(videos))
}

#[tracing::instrument(
    name = "Adding a new video",
    skip(body, db_pool, notifier),
    fields(video_title = %body.title)
)]
pub async fn create_video(
    body: web::Json<NewVideoBody>,
    db_pool: web::Data<PgPool>,
    notifier: web::Data<Notifier>,
) -> Result<HttpResponse, ContentError> {
    let new_video: NewVideo = body
        .into_inner()
        .try_into()
        .map_err(ContentError::ValidationError)?;

    let video = insert_video(&new_video, &db_pool)
        .await
        .map_err(|err| ContentError::DatabaseError("add video", err))?;

    // Subscribers hear about the video in the background; the admin gets the
    // response as soon as the row is stored.
    notifier.spawn_notify_all(PublishEvent::video(
        &video.title,
        &video.link,
        video.language.as_deref(),
    ));

    Ok(HttpResponse::Ok().json(serde_json::json!({ "success": true, "id": video.id })))
}

#[tracing::instrument(name = "Insert a new video into the database", skip(new_video, db_pool))]
async fn insert_video(new_video: &NewVideo, db_pool: &PgPool) -> Result<Video, sqlx::Error> {
    sqlx::query(&format!(
        r#"
        INSERT INTO videos (id, title, language, category, link, created_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING {}
        "#,
        VIDEO_COLUMNS
    ))
    .bind(Uuid::new_v4())
    .bind(new_video.title.as_ref())
    .bind(&new_video.language)
    .bind(&new_video.category)
    .bind(&new_video.link)
    .bind(Utc::now())
    .map(video_from_row)
    .fetch_one(db_pool)
    .await
}

#[tracing::instrument(name = "Fetching a video", skip(db_pool))]
pub async fn get_video(
    video_id: web::Path<Uuid>,
    db_pool: web::Data<PgPool>,
) -> Result<HttpResponse, ContentError> {
    let video = sqlx::query(&format!("SELECT {} FROM videos WHERE id = $1", VIDEO_COLUMNS))
        .bind(video_id.into_inner())
        .map(video_from_row)
        .fetch_optional(db_pool.get_ref())
        .await
        .map_err(|err| ContentError::DatabaseError("fetch video", err))?
        .ok_or(ContentError::NotFound("Video"))?;

    Ok(HttpResponse::Ok().json(video))
}

#[tracing::instrument(name = "Updating a video", skip(changes, db_pool))]
pub async fn update_video(
    video_id: web::Path<Uuid>,
    changes: web::Json<VideoChanges>,
    db_pool: web::Data<PgPool>,
) -> Result<HttpResponse, ContentError> {
    let changes = changes
        .into_inner()
        .validate()
        .map_err(ContentError::ValidationError)?;

    sqlx::query(
        r#"
        UPDATE videos
        SET title = COALESCE($2, title),
            language = COALESCE($3, language),
            category = COALESCE($4, category),
            link = COALESCE($5, link)
        WHERE id = $1
        RETURNING id
        "#,
    )
    .bind(video_id.into_inner())
    .bind(&changes.title)
    .bind(&changes.language)
    .bind(&changes.category)
    .bind(changes.link.as_deref().map(str::trim))
    .fetch_optional(db_pool.get_ref())
    .await
    .map_err(|err| ContentError::DatabaseError("update video", err))?
    .ok_or(ContentError::NotFound("Video"))?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "success": true })))
}

#[tracing::instrument(name = "Deleting a video", skip(db_pool))]
pub async fn delete_video(
    video_id: web::Path<Uuid>,
    db_pool: web::Data<PgPool>,
) -> Result<HttpResponse, ContentError> {
    let result = sqlx::query("DELETE FROM videos WHERE id = $1")
        .bind(video_id.into_inner())
        .execute(db_pool.get_ref())
        .await
        .map_err(|err| ContentError::DatabaseError("delete video", err))?;

    if result.rows_affected() == 0 {
        return Err(ContentError::NotFound("Video"));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({ "success": true })))
}
