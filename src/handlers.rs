use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::TypedHeader;
use axum_extra::headers::{Authorization, authorization::Bearer};
use serde::Serialize;
use tracing::info;
use utoipa::ToSchema;

use crate::{
    AppState,
    error::ApiError,
    import::{self, CSV_TEMPLATE, ImportSummary},
    models::{LessonSlot, ScheduleData, School, SchoolClass, SubjectsSection, Teacher},
    validation::extract_api_key,
};

#[derive(Debug, serde::Deserialize)]
pub struct GenerateQuery {
    pub key: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GeneratedTimetable {
    pub message: String,
    pub lessons: Vec<LessonSlot>,
    /// The upstream reply as received, for display next to the parsed grid.
    pub raw: String,
}

#[utoipa::path(get, path = "/", tag = "schedule")]
pub async fn root() -> impl IntoResponse {
    Json(serde_json::json!({
        "message": "School Scheduler API",
        "endpoints": {
            "/schedule-data": "Read or edit the school configuration aggregate",
            "/schedule-data/import": "Bulk import a CSV file",
            "/schedule-data/template": "Download the CSV import template",
            "/cloud/save": "Save the aggregate to the cloud store",
            "/cloud/load": "Load the aggregate from the cloud store",
            "/timetable/generate": "Generate a timetable via the AI endpoint"
        }
    }))
}

#[utoipa::path(get, path = "/healthz/live", tag = "schedule")]
pub async fn healthz_live() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok"}))
}

#[utoipa::path(get, path = "/healthz/ready", tag = "schedule")]
pub async fn healthz_ready() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok"}))
}

#[utoipa::path(
    get,
    path = "/schedule-data",
    responses((status = 200, description = "The current aggregate", body = ScheduleData)),
    tag = "schedule"
)]
pub async fn get_schedule_data(State(state): State<AppState>) -> Json<ScheduleData> {
    Json(state.data.read().await.clone())
}

#[utoipa::path(
    put,
    path = "/schedule-data/school",
    request_body = School,
    responses((status = 200, description = "School section replaced")),
    tag = "schedule"
)]
pub async fn put_school(
    State(state): State<AppState>,
    Json(school): Json<School>,
) -> impl IntoResponse {
    state.data.write().await.school = Some(school);
    Json(serde_json::json!({"message": "School settings saved"}))
}

#[utoipa::path(
    put,
    path = "/schedule-data/classes",
    request_body = Vec<SchoolClass>,
    responses((status = 200, description = "Classes section replaced")),
    tag = "schedule"
)]
pub async fn put_classes(
    State(state): State<AppState>,
    Json(classes): Json<Vec<SchoolClass>>,
) -> impl IntoResponse {
    state.data.write().await.classes = classes;
    Json(serde_json::json!({"message": "Classes saved"}))
}

#[utoipa::path(
    put,
    path = "/schedule-data/teachers",
    request_body = Vec<Teacher>,
    responses((status = 200, description = "Teachers section replaced")),
    tag = "schedule"
)]
pub async fn put_teachers(
    State(state): State<AppState>,
    Json(teachers): Json<Vec<Teacher>>,
) -> impl IntoResponse {
    state.data.write().await.teachers = teachers;
    Json(serde_json::json!({"message": "Teachers saved"}))
}

#[utoipa::path(
    put,
    path = "/schedule-data/subjects",
    request_body = SubjectsSection,
    responses((status = 200, description = "Subjects and rooms section replaced")),
    tag = "schedule"
)]
pub async fn put_subjects(
    State(state): State<AppState>,
    Json(subjects): Json<SubjectsSection>,
) -> impl IntoResponse {
    state.data.write().await.subjects = subjects;
    Json(serde_json::json!({"message": "Subjects and rooms saved"}))
}

#[utoipa::path(
    post,
    path = "/schedule-data/import",
    request_body(content = String, content_type = "text/csv"),
    responses(
        (status = 200, description = "Import applied", body = ImportSummary),
        (status = 400, description = "Empty or unreadable file")
    ),
    tag = "schedule"
)]
pub async fn import_csv(
    State(state): State<AppState>,
    body: String,
) -> Result<impl IntoResponse, ApiError> {
    let batch = import::parse_csv(&body)?;
    let summary = batch.apply(&mut *state.data.write().await);
    info!(
        classes = summary.classes,
        teachers = summary.teachers,
        skipped = summary.skipped,
        "bulk import applied"
    );
    Ok(Json(summary))
}

#[utoipa::path(
    get,
    path = "/schedule-data/template",
    responses((status = 200, description = "CSV import template", content_type = "text/csv")),
    tag = "schedule"
)]
pub async fn get_template() -> impl IntoResponse {
    (
        StatusCode::OK,
        [
            ("content-type", "text/csv; charset=utf-8"),
            (
                "content-disposition",
                "attachment; filename=modelo_importacao_gera_skills.csv",
            ),
        ],
        CSV_TEMPLATE,
    )
}

#[utoipa::path(
    post,
    path = "/cloud/save",
    responses(
        (status = 200, description = "Aggregate written to the cloud store"),
        (status = 503, description = "Cloud store not configured")
    ),
    tag = "schedule"
)]
pub async fn cloud_save(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let data = state.data.read().await.clone();
    let updated_at = state.store.save(&data).await?;
    Ok(Json(serde_json::json!({
        "message": "All data saved to the cloud",
        "updatedAt": updated_at,
    })))
}

#[utoipa::path(
    post,
    path = "/cloud/load",
    responses(
        (status = 200, description = "Aggregate loaded, or defaults kept if absent"),
        (status = 503, description = "Cloud store not configured")
    ),
    tag = "schedule"
)]
pub async fn cloud_load(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    match state.store.load().await? {
        Some(document) => {
            let updated_at = document.updated_at;
            document.apply(&mut *state.data.write().await);
            Ok(Json(serde_json::json!({
                "found": true,
                "message": "Data loaded from the cloud",
                "updatedAt": updated_at,
            })))
        }
        None => Ok(Json(serde_json::json!({
            "found": false,
            "message": "No saved data found, keeping current state",
        }))),
    }
}

#[utoipa::path(
    post,
    path = "/timetable/generate",
    params(
        ("key" = Option<String>, Query, description = "Generation API key (alternative to Bearer header)")
    ),
    responses(
        (status = 200, description = "Validated timetable", body = GeneratedTimetable),
        (status = 400, description = "Missing API key"),
        (status = 500, description = "Upstream failure or malformed timetable")
    ),
    tag = "schedule"
)]
pub async fn generate_timetable(
    State(state): State<AppState>,
    auth: Option<TypedHeader<Authorization<Bearer>>>,
    axum::extract::Query(query): axum::extract::Query<GenerateQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let auth_header = auth.map(|TypedHeader(a)| a);
    let api_key = extract_api_key(auth_header, query.key.as_deref())?;

    let data = state.data.read().await.clone();
    let raw = state.generator.generate(&data, &api_key).await?;
    let lessons = state.generator.parse_timetable(&raw)?;

    Ok(Json(GeneratedTimetable {
        message: "Timetable generated successfully".to_string(),
        lessons,
        raw,
    }))
}
