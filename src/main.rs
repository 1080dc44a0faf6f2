//! Template CRUD API server.
//!
//! ```bash
//! DATABASE_URL=sqlite::memory: cargo run
//! ```
//!
//! Then visit:
//! - **API**: <http://localhost:3000/templates>
//! - **Documentation**: <http://localhost:3000/docs>

use sea_orm::{ConnectionTrait, Database, DatabaseConnection};
use std::env;
use template_api::{routes, TemplateService};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_scalar::{Scalar, Servable};

#[derive(OpenApi)]
#[openapi(info(
    title = "Template API",
    description = "Boilerplate CRUD resource service"
))]
struct ApiDoc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    let database_url = env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite::memory:".to_string());
    let db: DatabaseConnection = Database::connect(&database_url).await?;

    db.execute(sea_orm::Statement::from_string(
        db.get_database_backend(),
        r"CREATE TABLE IF NOT EXISTS templates (
            id TEXT PRIMARY KEY NOT NULL,
            name TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            birth_date TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );"
        .to_owned(),
    ))
    .await?;

    let service = TemplateService::new(db);
    let (router, api_docs) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .nest("/templates", routes::router(service))
        .split_for_parts();
    let app = router
        .merge(Scalar::with_url("/docs", api_docs))
        .layer(TraceLayer::new_for_http());

    let addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "template API listening");
    axum::serve(listener, app).await?;
    Ok(())
}
