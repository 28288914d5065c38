use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderLink {
    pub title: String,
    pub url: String,
}

impl HeaderLink {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
        }
    }
}

pub fn default_links() -> Vec<HeaderLink> {
    vec![
        HeaderLink::new("GitHub", "https://github.com/voxel51/fiftyone"),
        HeaderLink::new("Docs", "https://voxel51.com/docs/fiftyone"),
        HeaderLink::new("Slack", "https://slack.voxel51.com"),
    ]
}
