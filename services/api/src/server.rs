use crate::cli::ServeArgs;
use crate::infra::{load_catalog, AppState, JsonFileConfigStore};
use crate::routes::with_admission_routes;
use admission_review::config::AppConfig;
use admission_review::error::AppError;
use admission_review::telemetry;
use admission_review::workflows::admission::{AdmissionReviewService, IntakePolicy};
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = Arc::new(JsonFileConfigStore::from_storage(&config.storage));
    let catalog = load_catalog(&config.storage.catalog_path())?;
    let policy = IntakePolicy {
        reject_unrecognized_grades: config.review.strict_grades,
    };
    let review_service = Arc::new(AdmissionReviewService::with_policy(store, catalog, policy));

    let app = with_admission_routes(review_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        data_dir = %config.storage.data_dir.display(),
        "admission review service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
