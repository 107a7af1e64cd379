//! Async client for the Diplicity API.
//!
//! Fetches everything one map render needs: the game (which names the
//! variant), the phase, the variant definitions, the three SVG assets and,
//! optionally, the phase's orders. The game comes first; everything else
//! is requested concurrently. The phase id `latest` names the game's
//! newest phase.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use thiserror::Error;

use super::adapter::{game_adapter, orders_adapter, phase_adapter, variant_adapter, AdaptError};
use super::types::{ApiGame, ApiList, ApiOrder, ApiPhase, ApiResponse, ApiVariant};
use crate::board::{Game, OrderAnnotation, Phase, Variant};

/// API level sent with every request.
pub const API_LEVEL: &str = "8";

/// Client name sent with every request.
pub const CLIENT_NAME: &str = "diplicity-map@";

// Header names are case-insensitive on the wire; `HeaderName` wants lowercase.
const API_LEVEL_HEADER: &str = "xdiplicityapilevel";
const CLIENT_NAME_HEADER: &str = "xdiplicityclientname";

/// Phase id that stands for the game's newest phase.
pub const LATEST_PHASE: &str = "latest";

/// Connection settings for the upstream API.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    /// Base URL of the API, e.g. `https://diplicity-engine.appspot.com`.
    pub base_url: String,
    /// Base URL for variant SVG assets; the API itself when `None`.
    pub asset_base_url: Option<String>,
    /// Bearer token, when the API requires one.
    pub token: Option<String>,
    pub timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "https://diplicity-engine.appspot.com".to_string(),
            asset_base_url: None,
            token: None,
            timeout_secs: 30,
        }
    }
}

/// Errors raised while fetching upstream resources.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid client configuration: {0}")]
    Config(String),

    #[error("request for {resource} failed: {reason}")]
    Transport { resource: String, reason: String },

    #[error("{resource} returned status {status}")]
    Status { resource: String, status: u16 },

    #[error("could not decode {resource}: {reason}")]
    Decode { resource: String, reason: String },

    #[error("variant {0:?} is not offered upstream")]
    VariantNotFound(String),

    #[error("game {0:?} has no phases yet")]
    NoPhases(String),

    #[error(transparent)]
    Adapt(#[from] AdaptError),
}

impl FetchError {
    /// Returns true if the error means the requested game, phase or
    /// variant does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            FetchError::VariantNotFound(_) | FetchError::NoPhases(_) | FetchError::Status { status: 404, .. }
        )
    }
}

/// Everything needed to compose one phase.
#[derive(Debug, Clone)]
pub struct RenderInputs {
    pub game: Game,
    pub variant: Variant,
    pub phase: Phase,
    pub orders: Option<Vec<OrderAnnotation>>,
    pub map_svg: String,
    pub army_svg: String,
    pub fleet_svg: String,
}

/// Diplicity API client.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    config: UpstreamConfig,
    client: Client,
}

impl UpstreamClient {
    pub fn new(config: UpstreamConfig) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(HeaderName::from_static(API_LEVEL_HEADER), HeaderValue::from_static(API_LEVEL));
        headers.insert(HeaderName::from_static(CLIENT_NAME_HEADER), HeaderValue::from_static(CLIENT_NAME));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(token) = &config.token {
            let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| FetchError::Config(format!("bad token: {e}")))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| FetchError::Config(e.to_string()))?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &UpstreamConfig {
        &self.config
    }

    /// Fetches a game.
    pub async fn game(&self, game_id: &str) -> Result<Game, FetchError> {
        let raw: ApiResponse<ApiGame> = self.json(&self.config.base_url, &["Game", game_id]).await?;
        Ok(game_adapter(&raw.properties))
    }

    /// Fetches one phase of a game.
    pub async fn phase(&self, game_id: &str, phase_id: &str) -> Result<Phase, FetchError> {
        let raw: ApiResponse<ApiPhase> = self.json(&self.config.base_url, &["Game", game_id, "Phase", phase_id]).await?;
        Ok(phase_adapter(&raw.properties)?)
    }

    /// Fetches the variant list and picks the named variant from it.
    pub async fn variant(&self, name: &str) -> Result<Variant, FetchError> {
        let list: ApiList<ApiVariant> = self.json(&self.config.base_url, &["Variants"]).await?;
        let raw = list
            .properties
            .iter()
            .find(|entry| entry.properties.name == name || entry.name.as_deref() == Some(name))
            .ok_or_else(|| FetchError::VariantNotFound(name.to_string()))?;
        Ok(variant_adapter(&raw.properties)?)
    }

    /// Fetches the raw orders of a phase.
    pub async fn orders(&self, game_id: &str, phase_id: &str) -> Result<Vec<ApiOrder>, FetchError> {
        let list: ApiList<ApiOrder> = self
            .json(&self.config.base_url, &["Game", game_id, "Phase", phase_id, "Orders"])
            .await?;
        Ok(list.properties.into_iter().map(|entry| entry.properties).collect())
    }

    /// Fetches one of a variant's SVG assets, e.g. `["Map.svg"]` or
    /// `["Units", "Army.svg"]`.
    pub async fn asset(&self, variant: &str, path: &[&str]) -> Result<String, FetchError> {
        let base = self.config.asset_base_url.as_deref().unwrap_or(&self.config.base_url);
        let mut segments = vec!["Variant", variant];
        segments.extend_from_slice(path);
        self.text(base, &segments).await
    }

    /// Fetches and normalizes everything needed to render one phase.
    pub async fn fetch_render_inputs(
        &self,
        game_id: &str,
        phase_id: &str,
        with_orders: bool,
    ) -> Result<RenderInputs, FetchError> {
        let game = self.game(game_id).await?;
        let variant_name = game.variant.clone();
        let phase_id = resolve_phase_id(&game, phase_id)?;
        let phase_id = phase_id.as_str();

        let orders = async {
            if with_orders {
                self.orders(game_id, phase_id).await.map(Some)
            } else {
                Ok(None)
            }
        };
        let (phase, variant, map_svg, army_svg, fleet_svg, raw_orders) = tokio::try_join!(
            self.phase(game_id, phase_id),
            self.variant(&variant_name),
            self.asset(&variant_name, &["Map.svg"]),
            self.asset(&variant_name, &["Units", "Army.svg"]),
            self.asset(&variant_name, &["Units", "Fleet.svg"]),
            orders,
        )?;

        let orders = raw_orders.map(|raw| orders_adapter(&raw, &phase)).transpose()?;
        tracing::debug!(
            target: "cartographer::upstream",
            game_id,
            phase_id,
            variant = %variant_name,
            map_bytes = map_svg.len(),
            orders = orders.as_ref().map_or(0, Vec::len),
            "upstream.fetch.done"
        );

        Ok(RenderInputs {
            game,
            variant,
            phase,
            orders,
            map_svg,
            army_svg,
            fleet_svg,
        })
    }

    async fn send(&self, base: &str, segments: &[&str]) -> Result<reqwest::Response, FetchError> {
        let url = endpoint(base, segments)?;
        let resource = url.path().to_string();
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Transport {
                resource: resource.clone(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(
                target: "cartographer::upstream",
                resource = %resource,
                status = status.as_u16(),
                "upstream.request.failed"
            );
            return Err(FetchError::Status {
                resource,
                status: status.as_u16(),
            });
        }
        Ok(response)
    }

    async fn json<T: DeserializeOwned>(&self, base: &str, segments: &[&str]) -> Result<T, FetchError> {
        let response = self.send(base, segments).await?;
        let resource = response.url().path().to_string();
        response.json().await.map_err(|e| FetchError::Decode {
            resource,
            reason: e.to_string(),
        })
    }

    async fn text(&self, base: &str, segments: &[&str]) -> Result<String, FetchError> {
        let response = self.send(base, segments).await?;
        let resource = response.url().path().to_string();
        response.text().await.map_err(|e| FetchError::Decode {
            resource,
            reason: e.to_string(),
        })
    }
}

/// Maps [`LATEST_PHASE`] to the ordinal of the game's newest phase; any
/// other id is passed through.
pub fn resolve_phase_id(game: &Game, phase_id: &str) -> Result<String, FetchError> {
    if phase_id != LATEST_PHASE {
        return Ok(phase_id.to_string());
    }
    game.newest_phase()
        .map(|meta| meta.ordinal.to_string())
        .ok_or_else(|| FetchError::NoPhases(game.id.clone()))
}

/// Appends path segments to a base URL, escaping each one.
fn endpoint(base: &str, segments: &[&str]) -> Result<Url, FetchError> {
    let mut url = Url::parse(base).map_err(|e| FetchError::Config(format!("bad base URL {base:?}: {e}")))?;
    url.path_segments_mut()
        .map_err(|()| FetchError::Config(format!("{base:?} cannot be a base URL")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}
