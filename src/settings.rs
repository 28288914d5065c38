use crate::backend::{Backend, LogBackend, WriterBackend};
use crate::config::{FileQuerySource, HttpQuerySource, QuerySource, StaticQuerySource};
use crate::error::{Error, Result};
use crate::header::{HeaderLink, HeaderOptions, default_links};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Contents of the YAML settings file. Every field is optional.
///
/// ```yaml
/// title: FiftyOne
/// datasets: [quickstart, cifar10]
/// dataset: quickstart
/// backend: 127.0.0.1:5151
/// config_url: http://127.0.0.1:5151/graphql
/// error_timeout_ms: 3000
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub title: String,
    pub datasets: Vec<String>,
    /// Active dataset, `""` for none.
    pub dataset: String,
    /// `host:port` receiving backend messages as JSON lines.
    pub backend: Option<String>,
    pub config_file: Option<PathBuf>,
    pub config_url: Option<String>,
    pub query_timeout_ms: u64,
    pub error_timeout_ms: u64,
    pub log_file: Option<PathBuf>,
    pub links: Vec<HeaderLink>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            title: "FiftyOne".to_string(),
            datasets: Vec::new(),
            dataset: String::new(),
            backend: None,
            config_file: None,
            config_url: None,
            query_timeout_ms: 5_000,
            error_timeout_ms: 3_000,
            log_file: None,
            links: default_links(),
        }
    }
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| Error::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Settings = serde_yaml::from_str(&text)?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.config_file.is_some() && self.config_url.is_some() {
            return Err(Error::Settings(
                "config_file and config_url are mutually exclusive".to_string(),
            ));
        }
        if self.error_timeout_ms == 0 {
            return Err(Error::Settings(
                "error_timeout_ms must be greater than zero".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        for name in &self.datasets {
            if name.is_empty() {
                return Err(Error::Settings("dataset names cannot be empty".to_string()));
            }
            if !seen.insert(name.as_str()) {
                return Err(Error::Settings(format!("dataset `{name}` is listed twice")));
            }
        }
        if !self.dataset.is_empty() && !seen.contains(self.dataset.as_str()) {
            return Err(Error::UnknownDataset(self.dataset.clone()));
        }
        Ok(())
    }

    pub fn error_timeout(&self) -> Duration {
        Duration::from_millis(self.error_timeout_ms)
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms)
    }

    pub fn header_options(&self) -> HeaderOptions {
        HeaderOptions {
            title: self.title.clone(),
            links: self.links.clone(),
        }
    }

    pub fn query_source(&self) -> Box<dyn QuerySource> {
        match (&self.config_file, &self.config_url) {
            (Some(path), _) => Box::new(FileQuerySource::new(path)),
            (None, Some(url)) => Box::new(HttpQuerySource::new(url, self.query_timeout())),
            (None, None) => Box::new(StaticQuerySource::default()),
        }
    }

    pub fn backend(&self) -> Result<Arc<dyn Backend>> {
        match &self.backend {
            Some(addr) => Ok(Arc::new(WriterBackend::connect(addr)?)),
            None => {
                info!("no backend address configured; messages will only be logged");
                Ok(Arc::new(LogBackend))
            }
        }
    }
}
