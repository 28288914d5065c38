use crate::config::query::{APP_CONFIG_QUERY, QueryResult, parse_response};
use crate::error::{Error, Result};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

/// Request/response access to the upstream configuration query.
pub trait QuerySource {
    fn fetch(&self) -> Result<QueryResult>;
}

/// Reads a saved response body from disk.
#[derive(Debug, Clone)]
pub struct FileQuerySource {
    path: PathBuf,
}

impl FileQuerySource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl QuerySource for FileQuerySource {
    fn fetch(&self) -> Result<QueryResult> {
        let body = fs::read_to_string(&self.path).map_err(|source| Error::ReadFile {
            path: self.path.clone(),
            source,
        })?;
        parse_response(&body)
    }
}

/// POSTs the configuration query to a GraphQL endpoint.
pub struct HttpQuerySource {
    url: String,
    agent: ureq::Agent,
}

impl HttpQuerySource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
        }
    }
}

impl QuerySource for HttpQuerySource {
    fn fetch(&self) -> Result<QueryResult> {
        let request = serde_json::json!({ "query": APP_CONFIG_QUERY });
        debug!(url = %self.url, "requesting app config");
        let response = self
            .agent
            .post(&self.url)
            .set("Content-Type", "application/json")
            .send_string(&request.to_string())
            .map_err(|source| Error::Http {
                url: self.url.clone(),
                source: Box::new(source),
            })?;
        let body = response.into_string()?;
        parse_response(&body)
    }
}

/// A fixed result, used when no upstream is configured.
#[derive(Debug, Clone, Default)]
pub struct StaticQuerySource(pub QueryResult);

impl QuerySource for StaticQuerySource {
    fn fetch(&self) -> Result<QueryResult> {
        Ok(self.0.clone())
    }
}
