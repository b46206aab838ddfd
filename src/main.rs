use anyhow::Context;
use axum::{
    http::Uri,
    middleware,
    routing::{get, post},
    Extension, Router,
};
use clap::Parser;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use movies_service::config;
use movies_service::error::ApiError;
use movies_service::handlers::{actors, actuator, genres, movies, security};
use movies_service::middleware::bearer_auth;
use movies_service::seed::DemoData;
use movies_service::store::GraphStore;

#[derive(Debug, Parser)]
#[command(name = "movies-service", version, about = "JWT-secured REST API over a movie/actor/genre graph")]
struct Cli {
    /// Port to listen on (overrides MOVIES_API_PORT / PORT)
    #[arg(long)]
    port: Option<u16>,

    /// Wipe the store and load the demo fixture set before serving.
    /// Destructive; also enabled by LAB_DEMO_DATA=true.
    #[arg(long)]
    demo_data: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up LAB_JWT_PUBLIC_KEY etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = config::config();

    let store = GraphStore::new();

    // One-shot fixture load, opt-in only, completed before the listener
    // binds so it never races live traffic. A failed load is logged and the
    // service still starts.
    if cli.demo_data || config.seed.demo_data {
        if let Err(error) = DemoData::new(store.clone()).run().await {
            tracing::error!("demo data load failed: {error:#}");
        }
    }

    let app = app(store);

    let port = cli.port.unwrap_or(config.server.port);
    let bind_addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;

    tracing::info!("movies service listening on http://{bind_addr}");

    axum::serve(listener, app).await.context("server")?;
    Ok(())
}

fn app(store: GraphStore) -> Router {
    // Everything except the actuator probes sits behind the bearer-token
    // middleware, including the not-found fallback.
    let protected = Router::new()
        .merge(movie_routes())
        .merge(actor_routes())
        .merge(genre_routes())
        .route("/whoami", get(security::whoami))
        .fallback(unknown_route)
        .layer(middleware::from_fn(bearer_auth));

    Router::new()
        .route("/actuator/health", get(actuator::health))
        .route("/actuator/info", get(actuator::info))
        .merge(protected)
        .layer(Extension(store))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn movie_routes() -> Router {
    Router::new()
        .route("/movies", get(movies::list).post(movies::create))
        .route(
            "/movies/:id",
            get(movies::get).put(movies::replace).delete(movies::delete),
        )
        .route("/movies/:id/genres", post(movies::add_genre))
        .route("/movies/search/by-title", get(movies::search_by_title))
        .route(
            "/movies/search/title-contains",
            get(movies::search_title_contains),
        )
}

fn actor_routes() -> Router {
    Router::new()
        .route("/actors", get(actors::list).post(actors::create))
        .route(
            "/actors/:id",
            get(actors::get).put(actors::replace).delete(actors::delete),
        )
        .route("/actors/:id/roles", post(actors::add_role))
}

fn genre_routes() -> Router {
    Router::new()
        .route("/genres", get(genres::list).post(genres::create))
        .route(
            "/genres/:id",
            get(genres::get).put(genres::replace).delete(genres::delete),
        )
        .route("/genres/search/by-name", get(genres::search_by_name))
}

async fn unknown_route(uri: Uri) -> ApiError {
    ApiError::not_found(format!("no resource at {}", uri.path()))
}
