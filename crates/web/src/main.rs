use std::sync::Arc;

use anyhow::Context;
use axum::{Router, http::HeaderValue, middleware as axum_middleware, routing::get};
use storage::{Database, services::lifecycle::FlightLifecycle, store::PgStore};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod error;
mod features;
mod middleware;
mod realtime;
mod state;

use config::Config;
use features::{flights, guesses, participants, scoring, tastings, wines};
use realtime::EventHub;
use state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        tastings::handlers::list_tastings,
        tastings::handlers::get_tasting,
        tastings::handlers::create_tasting,
        tastings::handlers::update_status,
        tastings::handlers::delete_tasting,
        participants::handlers::join_tasting,
        participants::handlers::list_participants,
        participants::handlers::get_leaderboard,
        scoring::handlers::get_scoring_rule,
        scoring::handlers::save_scoring_rule,
        flights::handlers::list_flights,
        flights::handlers::create_flight,
        flights::handlers::get_flight,
        flights::handlers::start_flight,
        flights::handlers::set_timer,
        flights::handlers::complete_flight,
        wines::handlers::list_wines,
        wines::handlers::add_wine,
        guesses::handlers::submit_guess,
        guesses::handlers::list_own_guesses,
        realtime::ws::join_tasting,
    ),
    components(
        schemas(
            storage::dto::tasting::CreateTastingRequest,
            storage::dto::tasting::UpdateTastingStatusRequest,
            storage::dto::tasting::JoinTastingRequest,
            storage::dto::tasting::TastingResponse,
            storage::dto::flight::CreateFlightRequest,
            storage::dto::flight::SetTimerRequest,
            storage::dto::flight::FlightResponse,
            storage::dto::wine::CreateWineRequest,
            storage::dto::wine::HiddenWine,
            storage::dto::wine::WineView,
            storage::dto::guess::SubmitGuessRequest,
            storage::dto::scoring::SaveScoringRuleRequest,
            storage::dto::participant::LeaderboardEntry,
            storage::dto::participant::LeaderboardResponse,
            storage::dto::common::PaginationMeta,
            storage::models::Tasting,
            storage::models::TastingStatus,
            storage::models::Visibility,
            storage::models::Flight,
            storage::models::FlightState,
            storage::models::Wine,
            storage::models::Guess,
            storage::models::Participant,
            storage::models::ParticipantWithUser,
            storage::models::ScoringRule,
        )
    ),
    tags(
        (name = "tastings", description = "Tasting events and their status"),
        (name = "participants", description = "Joining, participants and the leaderboard"),
        (name = "scoring", description = "Per-tasting scoring rule"),
        (name = "flights", description = "Flights and the flight timer"),
        (name = "wines", description = "Wines placed in a flight"),
        (name = "guesses", description = "Blind guesses"),
        (name = "realtime", description = "WebSocket notifications"),
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("Session token")
                        .build(),
                ),
            )
        }
    }
}

fn cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let origin = match config.cors_allowed_origin.as_deref() {
        Some(origin) => AllowOrigin::exact(
            HeaderValue::from_str(origin).context("CORS_ALLOWED_ORIGIN is not a valid origin")?,
        ),
        None => AllowOrigin::from(Any),
    };

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(std::time::Duration::from_secs(3600)))
}

fn router(state: AppState) -> Router {
    let api = Router::new()
        .merge(tastings::routes::routes())
        .merge(participants::routes::routes())
        .merge(scoring::routes::routes())
        .merge(flights::routes::routes())
        .merge(wines::routes::routes())
        .merge(guesses::routes::routes())
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_auth,
        ));

    Router::new()
        .merge(api)
        .route("/ws/join", get(realtime::ws::join_tasting))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Starting BlindSip API");

    let config = Config::from_env().context("Failed to load API configuration")?;
    tracing::info!("Configuration loaded successfully");

    tracing::info!(
        "Connecting to database at: {}",
        config
            .database_url
            .split('@')
            .next_back()
            .unwrap_or("unknown")
    );
    let db = Database::new(&config.database_url, config.database_max_connections)
        .await
        .context("Failed to initialize database")?;
    tracing::info!("Database connection established");

    tracing::info!("Running database migrations");
    db.run_migrations()
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Database migrations completed successfully");

    let hub = Arc::new(EventHub::new(config.event_channel_capacity));
    let lifecycle = FlightLifecycle::new(
        Arc::new(PgStore::new(db.pool().clone())),
        hub.clone(),
        config.max_varietals,
    );
    let state = AppState {
        db,
        lifecycle,
        hub,
        max_varietals: config.max_varietals,
    };

    let app = router(state)
        .layer(cors_layer(&config)?)
        .layer(TraceLayer::new_for_http());

    let bind_address = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;
    tracing::info!("Starting server at http://{}", bind_address);
    tracing::info!(
        "Swagger UI available at http://{}/swagger-ui/",
        bind_address
    );

    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use sqlx::postgres::PgPoolOptions;
    use storage::store::MemoryStore;
    use tower::ServiceExt;

    use super::*;

    fn test_state() -> AppState {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://blindsip@localhost/blindsip_test")
            .unwrap();
        let hub = Arc::new(EventHub::new(8));

        AppState {
            db: Database::from_pool(pool),
            lifecycle: FlightLifecycle::new(Arc::new(MemoryStore::new()), hub.clone(), 3),
            hub,
            max_varietals: 3,
        }
    }

    #[tokio::test]
    async fn test_api_requires_bearer_token() {
        let app = router(test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/flights/00000000-0000-0000-0000-000000000000/start")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_openapi_document_is_served() {
        let app = router(test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api-docs/openapi.json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
