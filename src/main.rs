//! Code Duel HTTP server.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;
use tracing_subscriber::EnvFilter;

use code_duel::adapters::ai::{AiOpponent, AnthropicConfig, AnthropicProvider, MockAIProvider};
use code_duel::adapters::http::{competition_routes, CompetitionHandlers};
use code_duel::adapters::memory::InMemoryCompetitionRepository;
use code_duel::adapters::postgres::PostgresCompetitionRepository;
use code_duel::adapters::SystemClock;
use code_duel::application::CompetitionService;
use code_duel::config::{AiConfig, AiProviderKind, AppConfig, DatabaseConfig};
use code_duel::ports::{AIProvider, CompetitionRepository};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Verdict the mock provider returns when nothing is queued.
const MOCK_VERDICT: &str =
    r#"{"winner":"draw","learner_score":0,"opponent_score":0,"feedback":"Mock evaluation"}"#;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = AppConfig::load()?;
    init_tracing(&config);
    config.validate()?;

    let repository = build_repository(&config.database).await?;
    let opponent = Arc::new(AiOpponent::new(build_provider(&config.ai)?));

    let service = CompetitionService::new(
        repository,
        opponent.clone(),
        opponent,
        Arc::new(SystemClock),
        config.competition.service_config(),
    );

    let app = Router::new()
        .nest(
            "/competitions",
            competition_routes(CompetitionHandlers::new(Arc::new(service))),
        )
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(TraceLayer::new_for_http());

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, environment = ?config.server.environment, "Code Duel listening");

    axum::serve(listener, app).await?;
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    if config.is_production() {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().compact())
            .init();
    }
}

async fn build_repository(
    config: &DatabaseConfig,
) -> Result<Arc<dyn CompetitionRepository>, BoxError> {
    let Some(url) = config.postgres_url() else {
        tracing::warn!("No database URL configured, competitions are kept in memory");
        return Ok(Arc::new(InMemoryCompetitionRepository::new()));
    };

    let pool = config.pool_options().connect(url).await?;
    if config.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");
    }
    Ok(Arc::new(PostgresCompetitionRepository::new(pool)))
}

fn build_provider(config: &AiConfig) -> Result<Arc<dyn AIProvider>, BoxError> {
    match config.provider {
        AiProviderKind::Mock => {
            tracing::warn!("Using mock AI provider");
            Ok(Arc::new(MockAIProvider::new().with_fallback(MOCK_VERDICT)))
        }
        AiProviderKind::Anthropic => {
            let api_key = config
                .anthropic_api_key
                .clone()
                .ok_or("AI anthropic_api_key is required")?;
            let provider_config = AnthropicConfig::new(api_key)
                .with_model(config.model.clone())
                .with_base_url(config.base_url.clone())
                .with_timeout(config.timeout())
                .with_max_retries(config.max_retries);
            Ok(Arc::new(AnthropicProvider::new(provider_config)?))
        }
    }
}
