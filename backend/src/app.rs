//! Application state and HTTP router construction.
//!
//! Used by `main` to serve the app and by the integration tests to drive it
//! in-process.

use std::sync::Arc;

use async_graphql::http::GraphiQLSource;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::Router;
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::http::header::{ACCEPT, AUTHORIZATION};
use axum::response::IntoResponse;
use axum::routing::get;
use serde::Deserialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api;
use crate::config::Config;
use crate::db::Database;
use crate::graphql::{BookshelfSchema, build_schema};
use crate::services::{AuthConfig, AuthService, UserService};

/// Shared state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db: Database,
    pub auth: AuthService,
    pub schema: BookshelfSchema,
}

impl AppState {
    /// Wire services and the GraphQL schema over an open database
    pub fn new(config: Arc<Config>, db: Database) -> Self {
        let auth = AuthService::new(AuthConfig::from_config(&config));
        let schema = build_schema(UserService::new(db.clone(), auth.clone()));
        Self {
            config,
            db,
            auth,
            schema,
        }
    }
}

/// Build the full Axum router: /graphql, health endpoints, and layers.
pub fn build_app(state: AppState) -> Router<()> {
    Router::new()
        .merge(api::health::router())
        .route("/graphql", get(graphiql).post(graphql_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Token passed as a query parameter, for clients that cannot set headers
#[derive(Debug, Default, Deserialize)]
pub struct TokenParams {
    pub token: Option<String>,
}

/// Extract bearer token from the Authorization header, falling back to `?token=`
fn extract_token(headers: &HeaderMap, params: &TokenParams) -> Option<String> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
        .or_else(|| params.token.clone())
        .filter(|t| !t.is_empty())
}

/// GraphQL query/mutation handler with auth context
async fn graphql_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<TokenParams>,
    req: GraphQLRequest,
) -> GraphQLResponse {
    let mut request = req.into_inner();

    if let Some(token) = extract_token(&headers, &params) {
        match state.auth.verify_token(&token) {
            Ok(user) => {
                tracing::debug!(user_id = %user.user_id, "Auth successful");
                request = request.data(user);
            }
            Err(e) => {
                // An unusable token leaves the request anonymous
                tracing::debug!(error = %e, "Token verification failed");
            }
        }
    }

    state.schema.execute(request).await.into()
}

/// GraphiQL interactive playground (only for browsers)
async fn graphiql(headers: HeaderMap) -> impl IntoResponse {
    let accepts_html = headers
        .get(ACCEPT)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.contains("text/html"))
        .unwrap_or(false);

    if accepts_html {
        axum::response::Html(GraphiQLSource::build().endpoint("/graphql").finish()).into_response()
    } else {
        (
            axum::http::StatusCode::METHOD_NOT_ALLOWED,
            axum::Json(serde_json::json!({
                "error": "GET requests are not supported for GraphQL queries. Use POST with Content-Type: application/json"
            })),
        )
            .into_response()
    }
}
