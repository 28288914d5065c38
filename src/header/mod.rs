//! Header bar: branding, the dataset selector and external links.
//!
//! The header turns selector effects into backend messages and keeps the
//! display-only state that sits next to the machine: the refresh indicator
//! and the transient commit error.

pub mod links;
pub mod render;

pub use links::{HeaderLink, default_links};
pub use render::{HeaderLayout, HeaderView, Palette, render};

use crate::backend::{Backend, BackendMessage};
use crate::selector::{
    CommitCallback, CommitError, DatasetSelector, ErrorId, SelectorEffect, SelectorEvent,
};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct HeaderOptions {
    pub title: String,
    pub links: Vec<HeaderLink>,
}

impl Default for HeaderOptions {
    fn default() -> Self {
        Self {
            title: "FiftyOne".to_string(),
            links: default_links(),
        }
    }
}

pub struct Header {
    title: String,
    links: Vec<HeaderLink>,
    selector: DatasetSelector,
    backend: Arc<dyn Backend>,
    refreshing: bool,
    visible_error: Option<CommitError>,
}

impl Header {
    pub fn new(
        options: HeaderOptions,
        active: impl Into<String>,
        datasets: Vec<String>,
        backend: Arc<dyn Backend>,
    ) -> Self {
        let on_commit = commit_callback(Arc::clone(&backend));
        Self {
            title: options.title,
            links: options.links,
            selector: DatasetSelector::new(active, datasets, Some(on_commit)),
            backend,
            refreshing: false,
            visible_error: None,
        }
    }

    /// Replaces the dataset feed. Any edit in progress is dropped.
    pub fn set_datasets(&mut self, active: impl Into<String>, datasets: Vec<String>) {
        let on_commit = commit_callback(Arc::clone(&self.backend));
        self.dispatch(SelectorEvent::SetValues {
            value: active.into(),
            values: datasets,
            on_commit: Some(on_commit),
        });
    }

    /// Logo click: ask the server to refresh and flip the indicator.
    pub fn activate_logo(&mut self) {
        info!("refresh requested");
        deliver(self.backend.as_ref(), &BackendMessage::refresh());
        self.refreshing = !self.refreshing;
    }

    pub fn dispatch(&mut self, event: SelectorEvent) -> Vec<SelectorEffect> {
        self.apply(|selector| selector.send(event))
    }

    /// Runs a selector operation and records what the view needs from its
    /// effects.
    pub fn apply<F>(&mut self, op: F) -> Vec<SelectorEffect>
    where
        F: FnOnce(&mut DatasetSelector) -> Vec<SelectorEffect>,
    {
        let effects = op(&mut self.selector);
        for effect in &effects {
            if let SelectorEffect::Rejected(error) = effect {
                self.visible_error = Some(error.clone());
            }
        }
        if !self.selector.is_editing() {
            self.visible_error = None;
        }
        effects
    }

    /// Hides the error with `id` if it is still the one shown.
    pub fn expire_error(&mut self, id: ErrorId) -> bool {
        if self.visible_error.as_ref().is_some_and(|error| error.id == id) {
            self.visible_error = None;
            return true;
        }
        false
    }

    pub fn visible_error(&self) -> Option<&CommitError> {
        self.visible_error.as_ref()
    }

    pub fn selector(&self) -> &DatasetSelector {
        &self.selector
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn links(&self) -> &[HeaderLink] {
        &self.links
    }

    pub fn is_refreshing(&self) -> bool {
        self.refreshing
    }
}

fn commit_callback(backend: Arc<dyn Backend>) -> CommitCallback {
    Arc::new(move |name: &str| deliver(backend.as_ref(), &BackendMessage::set_dataset(name)))
}

fn deliver(backend: &dyn Backend, message: &BackendMessage) {
    if let Err(err) = backend.send(message) {
        warn!(kind = %message.kind, error = %err, "failed to send backend message");
    }
}
