use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::app::accounts::{active_accounts, AccountActivity};
use crate::app::embed::{resolve_embed, EmbedOutcome};
use crate::app::export::{export_csv, export_filename};
use crate::app::posts::{DayMetrics, PostDraft, PostService};
use crate::app::reactivate::{extract_scripts, ScriptTag};
use crate::app::reports::{filter_by_range, Analytics, TimeRange};
use crate::domain::brands;
use crate::domain::post::{Platform, Post};
use crate::http::AppError;
use crate::AppState;

#[derive(Serialize)]
pub(crate) struct HealthResponse {
    status: &'static str,
    posts: usize,
}

pub(crate) async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        posts: state.store.len().await,
    })
}

// ---------------------------------------------------------------------------
// Posts
// ---------------------------------------------------------------------------

pub async fn create_post(
    State(state): State<AppState>,
    Json(draft): Json<PostDraft>,
) -> Result<Json<Post>, AppError> {
    draft
        .validate_content()
        .map_err(|err| AppError::bad_request(err.to_string()))?;

    let service = PostService::new(state.store.clone());
    let post = service.create(draft).await.map_err(|err| {
        tracing::error!(error = ?err, "failed to create post");
        AppError::internal("failed to create post")
    })?;

    Ok(Json(post))
}

pub async fn list_posts(State(state): State<AppState>) -> Json<Vec<Post>> {
    let service = PostService::new(state.store.clone());
    Json(service.list_recent().await)
}

pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Post>, AppError> {
    let service = PostService::new(state.store.clone());
    match service.get(id).await {
        Some(post) => Ok(Json(post)),
        None => Err(AppError::not_found("post not found")),
    }
}

pub async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(draft): Json<PostDraft>,
) -> Result<Json<Post>, AppError> {
    draft
        .validate_content()
        .map_err(|err| AppError::bad_request(err.to_string()))?;

    let service = PostService::new(state.store.clone());
    let updated = service.update(id, draft).await.map_err(|err| {
        tracing::error!(error = ?err, post_id = %id, "failed to update post");
        AppError::internal("failed to update post")
    })?;

    match updated {
        Some(post) => {
            // The next preview re-resolves against the edited content.
            state.panes.evict(id);
            Ok(Json(post))
        }
        None => Err(AppError::not_found("post not found")),
    }
}

pub async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let service = PostService::new(state.store.clone());
    let removed = service.delete(id).await.map_err(|err| {
        tracing::error!(error = ?err, post_id = %id, "failed to delete post");
        AppError::internal("failed to delete post")
    })?;

    if removed {
        state.panes.evict(id);
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("post not found"))
    }
}

// ---------------------------------------------------------------------------
// Calendar
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
pub struct CalendarQuery {
    pub brand: Option<String>,
    pub platform: Option<Platform>,
}

pub async fn calendar_month(
    State(state): State<AppState>,
    Path((year, month)): Path<(i32, u8)>,
    Query(query): Query<CalendarQuery>,
) -> Result<Json<Vec<DayMetrics>>, AppError> {
    if !(1..=12).contains(&month) {
        return Err(AppError::bad_request("month must be between 1 and 12"));
    }
    // `time` only supports four-digit years.
    if !(1..=9999).contains(&year) {
        return Err(AppError::bad_request("year must be between 1 and 9999"));
    }

    let service = PostService::new(state.store.clone());
    let days = service
        .month_days(year, month, query.brand.as_deref(), query.platform)
        .await
        .map_err(|err| {
            tracing::error!(error = ?err, "failed to build calendar");
            AppError::internal("failed to build calendar")
        })?;

    Ok(Json(days))
}

// ---------------------------------------------------------------------------
// Embed previews
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct PreviewResponse {
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<Platform>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<&'static str>,
    /// Script elements the client must re-create after injecting the markup.
    pub scripts: Vec<ScriptTag>,
}

impl From<EmbedOutcome> for PreviewResponse {
    fn from(outcome: EmbedOutcome) -> Self {
        match outcome {
            EmbedOutcome::Markup { html, origin } => {
                let scripts = extract_scripts(&html);
                PreviewResponse {
                    kind: "markup",
                    origin: Some(origin.as_str()),
                    html: Some(html),
                    platform: None,
                    url: None,
                    color: None,
                    scripts,
                }
            }
            EmbedOutcome::LinkOnly { platform, url } => PreviewResponse {
                kind: "link_only",
                html: None,
                origin: None,
                color: Some(platform.color()),
                platform: Some(platform),
                url: Some(url),
                scripts: Vec::new(),
            },
        }
    }
}

pub async fn preview_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PreviewResponse>, AppError> {
    let service = PostService::new(state.store.clone());
    let Some(post) = service.get(id).await else {
        return Err(AppError::not_found("post not found"));
    };

    if post.content.trim().is_empty() {
        return Err(AppError::bad_request("post has no embed content"));
    }

    let pane = state.panes.pane(id);
    let outcome = pane
        .resolve(&post.content, post.platform, state.remote.as_deref())
        .await;

    Ok(Json(outcome.into()))
}

#[derive(Deserialize)]
pub struct PreviewRequest {
    pub content: String,
    pub platform: Platform,
}

/// One-shot resolution for content that is not saved yet (the form's live
/// preview). No pane is involved; the caller owns staleness handling.
pub async fn preview_adhoc(
    State(state): State<AppState>,
    Json(request): Json<PreviewRequest>,
) -> Result<Json<PreviewResponse>, AppError> {
    if request.content.trim().is_empty() {
        return Err(AppError::bad_request("content is required"));
    }

    let outcome = resolve_embed(
        &request.content,
        request.platform,
        state.remote.as_deref(),
    )
    .await;

    Ok(Json(outcome.into()))
}

// ---------------------------------------------------------------------------
// Reports & export
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
pub struct RangeQuery {
    pub range: Option<TimeRange>,
}

pub async fn get_report(
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> Json<Analytics> {
    let range = query.range.unwrap_or(TimeRange::Days30);
    let today = OffsetDateTime::now_utc().date();
    let posts = filter_by_range(&state.store.all().await, range, today);
    Json(Analytics::compute(&posts))
}

pub async fn export_report(
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> impl IntoResponse {
    let range = query.range.unwrap_or(TimeRange::Days30);
    let today = OffsetDateTime::now_utc().date();
    let posts = filter_by_range(&state.store.all().await, range, today);

    let disposition = format!(
        "attachment; filename=\"{}\"",
        export_filename(range, today)
    );
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        export_csv(&posts),
    )
}

// ---------------------------------------------------------------------------
// Accounts & brands
// ---------------------------------------------------------------------------

pub async fn list_accounts(State(state): State<AppState>) -> Json<Vec<AccountActivity>> {
    Json(active_accounts(&state.store.all().await))
}

#[derive(Serialize)]
pub struct BrandInfo {
    pub name: &'static str,
    pub options: &'static [&'static str],
}

pub async fn list_brands() -> Json<Vec<BrandInfo>> {
    let catalog = brands::BRAND_OPTIONS
        .iter()
        .copied()
        .map(|(name, options)| BrandInfo { name, options })
        .collect();
    Json(catalog)
}
