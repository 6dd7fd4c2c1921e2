//! Ladle - a recipe catalog API server

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ladle::{
    api::{self, AppState},
    config::Config,
    db::{
        self,
        repositories::{SqlxChefRepository, SqlxIngredientRepository, SqlxRecipeRepository},
    },
    services::{
        auth::AuthService, chef::ChefService, ingredient::IngredientService,
        recipe::RecipeService, session::SessionAuthority,
    },
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ladle=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Ladle recipe catalog...");

    // Load configuration
    let config = Config::load_with_env(Path::new("config.yml"))?;
    tracing::info!("Configuration loaded");

    // Initialize database
    let pool = db::create_pool(&config.database.url).await?;
    tracing::info!("Database connected: {}", config.database.url);

    // Run migrations
    db::migrations::run_migrations(&pool).await?;
    tracing::info!("Database migrations completed");

    // Create repositories
    let chef_repo = SqlxChefRepository::boxed(pool.clone());
    let recipe_repo = SqlxRecipeRepository::boxed(pool.clone());
    let ingredient_repo = SqlxIngredientRepository::boxed(pool.clone());

    // Sessions live in process memory, so a restart logs everyone out.
    let sessions = Arc::new(SessionAuthority::from_minutes(
        config.auth.session_ttl_minutes,
    ));
    if config.auth.session_ttl_minutes == 0 {
        tracing::info!("Session expiry disabled");
    } else {
        tracing::info!(
            "Sessions expire after {} minutes",
            config.auth.session_ttl_minutes
        );
    }

    // Initialize services
    let auth_service = Arc::new(AuthService::new(chef_repo.clone(), sessions));
    let chef_service = Arc::new(ChefService::new(chef_repo.clone()));
    let recipe_service = Arc::new(RecipeService::new(
        recipe_repo,
        chef_repo,
        ingredient_repo.clone(),
    ));
    let ingredient_service = Arc::new(IngredientService::new(ingredient_repo));

    // Build application state
    let state = AppState {
        auth_service,
        chef_service,
        recipe_service,
        ingredient_service,
    };

    // Build router
    let app = api::build_router(state, &config.server.cors_origin);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
