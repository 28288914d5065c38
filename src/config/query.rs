use crate::config::color::Rgb;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// GraphQL document requested from the application server.
pub const APP_CONFIG_QUERY: &str = "query AppConfig { colorscale config { colorPool colorscale gridZoom loopVideos notebookHeight showConfidence showIndex showLabel showTooltip timezone useFrameNumber } }";

pub const DEFAULT_COLOR_POOL: &[&str] = &[
    "#ee0000", "#ee6600", "#993300", "#996633", "#999900", "#009900", "#003300", "#009999",
    "#000099", "#0066ff", "#6600ff", "#cc33cc", "#777799",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    pub color_pool: Vec<String>,
    pub colorscale: String,
    pub grid_zoom: u8,
    pub loop_videos: bool,
    pub notebook_height: u32,
    pub show_confidence: bool,
    pub show_index: bool,
    pub show_label: bool,
    pub show_tooltip: bool,
    pub timezone: Option<String>,
    pub use_frame_number: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            color_pool: DEFAULT_COLOR_POOL.iter().map(|c| c.to_string()).collect(),
            colorscale: "viridis".to_string(),
            grid_zoom: 5,
            loop_videos: false,
            notebook_height: 800,
            show_confidence: true,
            show_index: true,
            show_label: true,
            show_tooltip: true,
            timezone: None,
            use_frame_number: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QueryResult {
    #[serde(default)]
    pub colorscale: Vec<Rgb>,
    #[serde(default)]
    pub config: AppConfig,
}

#[derive(Debug, Deserialize)]
struct Envelope {
    data: Option<QueryResult>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

/// Parses a `{ "data": ..., "errors": [...] }` response body.
pub fn parse_response(body: &str) -> Result<QueryResult> {
    let envelope: Envelope = serde_json::from_str(body)?;
    match envelope.data {
        Some(data) => Ok(data),
        None => {
            let messages: Vec<String> = envelope.errors.into_iter().map(|e| e.message).collect();
            if messages.is_empty() {
                Err(Error::EmptyResponse("response has no `data` field".to_string()))
            } else {
                Err(Error::EmptyResponse(messages.join("; ")))
            }
        }
    }
}
