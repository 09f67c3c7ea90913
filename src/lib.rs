pub mod error;
pub mod generate;
pub mod handlers;
pub mod import;
pub mod models;
pub mod openapi;
pub mod settings;
pub mod store;
pub mod validation;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post, put},
};
use tokio::sync::RwLock;
use tower_http::LatencyUnit;
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::generate::ScheduleGenerator;
use crate::handlers::{
    cloud_load, cloud_save, generate_timetable, get_schedule_data, get_template, healthz_live,
    healthz_ready, import_csv, put_classes, put_school, put_subjects, put_teachers, root,
};
use crate::models::ScheduleData;
use crate::openapi::ApiDoc;
use crate::settings::Settings;
use crate::store::DocumentStore;

#[derive(Clone)]
pub struct AppState {
    pub settings: Settings,
    pub store: Arc<DocumentStore>,
    pub generator: Arc<ScheduleGenerator>,
    /// The one aggregate every handler reads and mutates. Guards are held
    /// only briefly; outbound calls work on a clone.
    pub data: Arc<RwLock<ScheduleData>>,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        let store = Arc::new(DocumentStore::new(settings.store_base_url.as_ref()));
        let generator = Arc::new(ScheduleGenerator::new(&settings.generator_base_url));
        Self {
            settings,
            store,
            generator,
            data: Arc::new(RwLock::new(ScheduleData::default())),
        }
    }
}

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::from_env()?;

    let env_filter = if settings.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .without_time()
        .init();

    let state = AppState::new(settings);

    let app = build_router(state.clone());

    let addr = SocketAddr::from(([0, 0, 0, 0], state.settings.port));
    info!("Starting School Scheduler API on {addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        );

    let mut router = Router::new()
        .route("/", get(root))
        .route("/healthz/live", get(healthz_live))
        .route("/healthz/ready", get(healthz_ready))
        .route("/schedule-data", get(get_schedule_data))
        .route("/schedule-data/school", put(put_school))
        .route("/schedule-data/classes", put(put_classes))
        .route("/schedule-data/teachers", put(put_teachers))
        .route("/schedule-data/subjects", put(put_subjects))
        .route("/schedule-data/import", post(import_csv))
        .route("/schedule-data/template", get(get_template))
        .route("/cloud/save", post(cloud_save))
        .route("/cloud/load", post(cloud_load))
        .route("/timetable/generate", post(generate_timetable))
        .with_state(state.clone());

    if state.settings.enable_swagger {
        let openapi = ApiDoc::openapi();
        let swagger = SwaggerUi::new("/docs").url("/openapi.json", openapi);
        router = router.merge(swagger);
    }

    // The console is a browser app served from a different origin.
    router.layer(CorsLayer::permissive()).layer(trace_layer)
}
