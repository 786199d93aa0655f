// App configuration: defaults, build-time tokens, localStorage overrides

use std::str::FromStr;

use tracing::Level;

use crate::error::PaneError;
use crate::logging;
use crate::model::{
    LineLayerSpec, LineLayout, LinePaint, LngLat, MapView, SequenceOverlay, VectorSourceSpec,
};

pub const MELBOURNE: LngLat = LngLat {
    lng: 144.962646,
    lat: -37.810272,
};
pub const INITIAL_ZOOM: f64 = 15.0;
pub const MAP_STYLE: &str = "mapbox://styles/mapbox/light-v11";

pub const SEQUENCE_TILE_URL: &str = "https://tiles.mapillary.com/maps/vtp/mly1_public/2/{z}/{x}/{y}";

pub const MAPBOX_TOKEN_KEY: &str = "smv_mapbox_token";
pub const MAPILLARY_TOKEN_KEY: &str = "smv_mapillary_token";
pub const LOG_LEVEL_KEY: &str = "smv_log_level";

/// Tokens baked in at build time.
#[derive(Clone, Copy, Debug, Default)]
pub struct BuildEnv {
    pub map_token: Option<&'static str>,
    pub viewer_token: Option<&'static str>,
}

impl BuildEnv {
    pub fn current() -> Self {
        Self {
            map_token: option_env!("MAPBOX_ACCESS_TOKEN"),
            viewer_token: option_env!("MAPILLARY_ACCESS_TOKEN"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SequenceLayerConfig {
    /// Tile URL template; the image-service token is appended as `access_token`.
    pub tile_url: String,
    pub source_id: String,
    pub layer_id: String,
    pub source_layer: String,
    pub min_zoom: u8,
    pub max_zoom: u8,
    pub before_layer: Option<String>,
    pub line_color: String,
    pub line_opacity: f64,
    pub line_width: f64,
}

impl Default for SequenceLayerConfig {
    fn default() -> Self {
        Self {
            tile_url: SEQUENCE_TILE_URL.to_string(),
            source_id: "mapillary".to_string(),
            layer_id: "mapillary".to_string(),
            source_layer: "sequence".to_string(),
            min_zoom: 6,
            max_zoom: 14,
            before_layer: Some("road-label-simple".to_string()),
            line_color: "rgb(53, 175, 140)".to_string(),
            line_opacity: 0.6,
            line_width: 2.0,
        }
    }
}

impl SequenceLayerConfig {
    pub fn overlay(&self, token: &str) -> SequenceOverlay {
        SequenceOverlay {
            source_id: self.source_id.clone(),
            source: VectorSourceSpec {
                kind: "vector",
                tiles: vec![format!("{}?access_token={}", self.tile_url, token)],
                minzoom: self.min_zoom,
                maxzoom: self.max_zoom,
            },
            layer: LineLayerSpec {
                id: self.layer_id.clone(),
                kind: "line",
                source: self.source_id.clone(),
                source_layer: self.source_layer.clone(),
                layout: LineLayout {
                    line_cap: "round",
                    line_join: "round",
                },
                paint: LinePaint {
                    line_opacity: self.line_opacity,
                    line_color: self.line_color.clone(),
                    line_width: self.line_width,
                },
            },
            before_layer: self.before_layer.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub map_token: Option<String>,
    pub viewer_token: Option<String>,
    pub view: MapView,
    pub sequence_layer: SequenceLayerConfig,
    pub log_level: Level,
}

impl AppConfig {
    /// Build-time values, overridden by whatever the browser has in localStorage.
    pub fn resolve() -> Self {
        let storage = web_sys::window().and_then(|win| win.local_storage().ok().flatten());
        Self::from_sources(BuildEnv::current(), |key| {
            storage
                .as_ref()
                .and_then(|store| store.get_item(key).ok().flatten())
        })
    }

    pub fn from_sources(build: BuildEnv, stored: impl Fn(&str) -> Option<String>) -> Self {
        let token = |key: &str, baked: Option<&'static str>| {
            non_blank(stored(key)).or_else(|| non_blank(baked.map(str::to_string)))
        };
        let log_level = stored(LOG_LEVEL_KEY)
            .and_then(|raw| Level::from_str(raw.trim()).ok())
            .unwrap_or_else(logging::default_level);
        Self {
            map_token: token(MAPBOX_TOKEN_KEY, build.map_token),
            viewer_token: token(MAPILLARY_TOKEN_KEY, build.viewer_token),
            view: MapView {
                center: MELBOURNE,
                zoom: INITIAL_ZOOM,
                style: MAP_STYLE.to_string(),
            },
            sequence_layer: SequenceLayerConfig::default(),
            log_level,
        }
    }

    pub fn map_credential(&self) -> Result<&str, PaneError> {
        self.map_token
            .as_deref()
            .ok_or(PaneError::MissingCredential { service: "Mapbox" })
    }

    pub fn viewer_credential(&self) -> Result<&str, PaneError> {
        self.viewer_token
            .as_deref()
            .ok_or(PaneError::MissingCredential { service: "Mapillary" })
    }

    /// Sequence tiles need the image-service token, so no token means no overlay.
    pub fn sequence_overlay(&self) -> Option<SequenceOverlay> {
        self.viewer_token
            .as_deref()
            .map(|token| self.sequence_layer.overlay(token))
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
