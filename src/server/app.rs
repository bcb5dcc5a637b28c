use anyhow::{anyhow, Result};
use async_graphql::{Request, Response as GraphQLResponse};
use async_graphql_axum::GraphQLSubscription;
use axum::{
    extract::{Json, State},
    http::HeaderMap,
    routing::get,
    Router,
};
use sea_orm::{DatabaseConnection, EntityTrait};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};

use crate::auth::{Actor, Role};
use crate::database::entities::users;
use crate::graphql::{build_schema, AppSchema};

use super::handlers::health;

/// Identity header checked on every GraphQL request. The value is a user id
/// issued by the auth collaborator sitting in front of this service.
pub const USER_ID_HEADER: &str = "x-user-id";

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub graphql_schema: AppSchema,
}

pub async fn create_app(db: DatabaseConnection, cors_origin: Option<&str>) -> Result<Router> {
    let graphql_schema = build_schema(db.clone());

    let state = AppState {
        db,
        graphql_schema: graphql_schema.clone(),
    };

    let cors = match cors_origin {
        Some(origin) => CorsLayer::new()
            .allow_origin(
                origin
                    .parse::<axum::http::HeaderValue>()
                    .map_err(|e| anyhow!("Invalid CORS origin: {}", e))?,
            )
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::OPTIONS,
            ])
            .allow_headers(Any)
            .allow_credentials(false),
        None => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::OPTIONS,
            ])
            .allow_headers(Any)
            .allow_credentials(false),
    };

    let app = Router::new()
        .route("/health", get(health::health_check))
        .route(
            "/graphql",
            get(graphql_playground)
                .post(graphql_handler)
                .options(|| async { axum::http::StatusCode::OK }),
        )
        .route_service("/graphql/ws", GraphQLSubscription::new(graphql_schema))
        .layer(ServiceBuilder::new().layer(cors))
        .with_state(state);

    Ok(app)
}

/// Resolve the identity header to an [`Actor`]. A missing, malformed or
/// unknown user id falls back to anonymous rather than failing the request;
/// anonymous callers can still read public data.
pub async fn resolve_actor(db: &DatabaseConnection, headers: &HeaderMap) -> Actor {
    let Some(raw) = headers.get(USER_ID_HEADER).and_then(|v| v.to_str().ok()) else {
        return Actor::anonymous();
    };

    let Ok(user_id) = raw.trim().parse::<i32>() else {
        tracing::debug!("Ignoring malformed {} header: {:?}", USER_ID_HEADER, raw);
        return Actor::anonymous();
    };

    let user = match users::Entity::find_by_id(user_id).one(db).await {
        Ok(user) => user,
        Err(e) => {
            tracing::error!("Identity lookup failed for user {}: {}", user_id, e);
            return Actor::anonymous();
        }
    };

    match user {
        Some(user) => match Role::parse(&user.role) {
            Some(role) => Actor::user(user.id, role),
            None => {
                tracing::warn!("User {} has unknown role {:?}", user.id, user.role);
                Actor::anonymous()
            }
        },
        None => Actor::anonymous(),
    }
}

async fn graphql_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<Request>,
) -> Json<GraphQLResponse> {
    let actor = resolve_actor(&state.db, &headers).await;
    let response = state.graphql_schema.execute(req.data(actor)).await;
    Json(response)
}

async fn graphql_playground() -> impl axum::response::IntoResponse {
    axum::response::Html(async_graphql::http::playground_source(
        async_graphql::http::GraphQLPlaygroundConfig::new("/graphql")
            .subscription_endpoint("/graphql/ws"),
    ))
}
