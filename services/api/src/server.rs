use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryCustomerStore};
use crate::routes::with_lending_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use creditline::config::AppConfig;
use creditline::error::AppError;
use creditline::lending::{ingest, LendingPolicy, LendingService};
use creditline::telemetry;
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

    let customers_csv = args.customers_csv.take().or(config.seed.customers_csv.take());
    let loans_csv = args.loans_csv.take().or(config.seed.loans_csv.take());

    let policy = LendingPolicy::default();
    let store = Arc::new(InMemoryCustomerStore::default());
    seed_store_from_csv(customers_csv, loans_csv, store.as_ref(), &policy)?;

    let lending_service = Arc::new(LendingService::new(store, policy));

    let app = with_lending_routes(lending_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "credit approval service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

fn seed_store_from_csv(
    customers_csv: Option<std::path::PathBuf>,
    loans_csv: Option<std::path::PathBuf>,
    store: &InMemoryCustomerStore,
    policy: &LendingPolicy,
) -> Result<(), AppError> {
    if customers_csv.is_none() && loans_csv.is_none() {
        return Ok(());
    }

    let customers = match &customers_csv {
        Some(path) => ingest::customers_from_path(path, policy)?,
        None => Vec::new(),
    };
    let loans = match &loans_csv {
        Some(path) => ingest::loans_from_path(path)?,
        None => Vec::new(),
    };

    let summary = ingest::seed_store(store, customers, loans)?;
    info!(
        customers = summary.customers,
        loans = summary.loans,
        orphaned_loans = summary.orphaned_loans,
        "seeded store from CSV exports"
    );
    Ok(())
}
