use std::sync::Arc;

use anyhow::Context;
use codegrade_server::api::{self, AppState};
use codegrade_server::config::ServerConfig;
use codegrade_server::db;
use codegrade_server::executor::PistonExecutor;
use codegrade_server::repository::{
    SeaOrmAssessmentRepository, SeaOrmProblemRepository, SeaOrmSessionRepository,
    SeaOrmSubmissionRepository, SeaOrmTestCaseRepository, SeaOrmUserRepository,
};
use codegrade_server::service::{AssessmentService, Grader};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;

    info!("starting codegrade server");
    let config =
        ServerConfig::load("codegrade.toml").context("failed to load server config")?;

    let pool = db::init_pool_and_migrate()
        .await
        .context("failed to connect to database and run migrations")?;
    info!("database connected and migrated");

    let problems = Arc::new(SeaOrmProblemRepository::new(pool.clone()));
    let test_cases = Arc::new(SeaOrmTestCaseRepository::new(pool.clone()));
    let users = Arc::new(SeaOrmUserRepository::new(pool.clone()));
    let submissions = Arc::new(SeaOrmSubmissionRepository::new(pool.clone()));
    let assessments = Arc::new(SeaOrmAssessmentRepository::new(pool.clone()));
    let sessions = Arc::new(SeaOrmSessionRepository::new(pool));

    let executor = Arc::new(
        PistonExecutor::new(&config.executor)
            .context("failed to initialize execution backend client")?,
    );
    info!(url = %config.executor.execute_url, "execution backend configured");

    let grader = Arc::new(Grader::new(
        problems.clone(),
        test_cases,
        users,
        submissions,
        executor,
    ));
    let assessment_service = Arc::new(AssessmentService::new(assessments, sessions, problems));

    let state = AppState::new(grader, assessment_service);
    let app = api::create_api_router()
        .with_state(state)
        .layer(CorsLayer::permissive());

    let listener = TcpListener::bind(&config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    info!(addr = %config.listen_addr, "server is ready, press Ctrl+C to shut down");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "failed to listen for shutdown signal");
    } else {
        info!("shutdown signal received, stopping server");
    }
}

fn init_tracing() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;

    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    Ok(())
}
