//! HTTP front end.
//!
//! One route, `GET /maps/{game_id}/{phase_id}`, which fetches the game's
//! state from upstream, composes the map and replies with it. A
//! `phase_id` of `latest` draws the game's newest phase. Adding
//! `?orders=true` overlays the phase's orders.

pub mod raster;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use serde::Deserialize;
use thiserror::Error;

use crate::compose::{compose, ComposeError};
use crate::upstream::{FetchError, UpstreamClient};
use raster::{RasterError, Rasterizer};

/// Shared, read-only server state.
pub struct AppState {
    pub client: UpstreamClient,
    pub rasterizer: Arc<dyn Rasterizer>,
}

/// Errors that end a map request.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Compose(#[from] ComposeError),

    #[error(transparent)]
    Raster(#[from] RasterError),

    #[error("render task failed: {0}")]
    Task(String),
}

impl ServerError {
    /// Upstream trouble is a bad gateway, a missing game, phase or
    /// variant is not found, and anything else is ours.
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::Fetch(e) if e.is_not_found() => StatusCode::NOT_FOUND,
            ServerError::Fetch(_) => StatusCode::BAD_GATEWAY,
            ServerError::Compose(_) | ServerError::Raster(_) | ServerError::Task(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn stage(&self) -> &'static str {
        match self {
            ServerError::Fetch(_) => "fetch",
            ServerError::Compose(e) => e.stage(),
            ServerError::Raster(_) => "rasterize",
            ServerError::Task(_) => "task",
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::warn!(
            target: "cartographer::server",
            status = status.as_u16(),
            stage = self.stage(),
            error = %self,
            "server.request.failed"
        );
        (status, format!("{}: {self}\n", self.stage())).into_response()
    }
}

#[derive(Debug, Default, Deserialize)]
struct MapQuery {
    #[serde(default)]
    orders: bool,
}

/// Builds the router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/maps/{game_id}/{phase_id}", get(render_map))
        .with_state(state)
}

/// Binds `addr` and serves until the process ends.
pub async fn serve(addr: SocketAddr, state: AppState) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(
        target: "cartographer::server",
        addr = %listener.local_addr()?,
        upstream = %state.client.config().base_url,
        content_type = state.rasterizer.content_type(),
        "server.listening"
    );
    axum::serve(listener, router(Arc::new(state))).await
}

async fn render_map(
    State(state): State<Arc<AppState>>,
    Path((game_id, phase_id)): Path<(String, String)>,
    Query(query): Query<MapQuery>,
) -> Result<Response, ServerError> {
    tracing::info!(
        target: "cartographer::server",
        game_id = %game_id,
        phase_id = %phase_id,
        orders = query.orders,
        "server.request"
    );

    let inputs = state
        .client
        .fetch_render_inputs(&game_id, &phase_id, query.orders)
        .await?;

    let rasterizer = Arc::clone(&state.rasterizer);
    let (content_type, body) = tokio::task::spawn_blocking(move || -> Result<(String, Vec<u8>), ServerError> {
        let svg = compose(
            &inputs.map_svg,
            &inputs.army_svg,
            &inputs.fleet_svg,
            &inputs.variant,
            &inputs.phase,
            inputs.orders.as_deref(),
        )?;
        let bytes = rasterizer.rasterize(&svg)?;
        Ok((rasterizer.content_type().to_string(), bytes))
    })
    .await
    .map_err(|e| ServerError::Task(e.to_string()))??;

    Ok(([(header::CONTENT_TYPE, content_type)], body).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::GraphError;
    use crate::svg::{TemplateError, TemplateKind};

    #[test]
    fn status_mapping() {
        let missing = ServerError::Fetch(FetchError::VariantNotFound("Hundred".into()));
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);

        let upstream = ServerError::Fetch(FetchError::Status {
            resource: "/Game/x".into(),
            status: 503,
        });
        assert_eq!(upstream.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(upstream.stage(), "fetch");

        let lookup = ServerError::Compose(ComposeError::VariantMismatch(GraphError::ProvinceNotFound("xyz".into())));
        assert_eq!(lookup.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(lookup.stage(), "province-lookup");

        let template = ServerError::Compose(ComposeError::MalformedTemplate(TemplateError::MissingRoot {
            template: TemplateKind::Fleet,
        }));
        assert_eq!(template.stage(), "template-parse");
    }

    #[test]
    fn error_response_carries_status_and_stage() {
        let response = ServerError::Fetch(FetchError::VariantNotFound("Hundred".into())).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let response = ServerError::Fetch(FetchError::NoPhases("g1".into())).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
