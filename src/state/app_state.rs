use crate::config::{ConfigStore, QuerySource};
use crate::header::{Header, HeaderLayout, HeaderView, Palette, render};
use std::time::Duration;
use tracing::info;

pub struct AppState {
    header: Header,
    config: ConfigStore,
    config_source: Box<dyn QuerySource>,
    palette: Palette,
    layout: HeaderLayout,
    error_timeout: Duration,
    should_exit: bool,
}

impl AppState {
    pub fn new(
        header: Header,
        config: ConfigStore,
        config_source: Box<dyn QuerySource>,
        error_timeout: Duration,
    ) -> Self {
        let palette = Palette::from_store(&config);
        let mut state = Self {
            header,
            config,
            config_source,
            palette,
            layout: HeaderLayout::default(),
            error_timeout,
            should_exit: false,
        };
        state.view();
        state
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn header_mut(&mut self) -> &mut Header {
        &mut self.header
    }

    pub fn config(&self) -> &ConfigStore {
        &self.config
    }

    /// Re-runs the upstream query; the palette follows the new projections.
    pub fn reload_config(&mut self) -> bool {
        let changed = self.config.load_or_keep(self.config_source.as_ref());
        if changed {
            info!(revision = self.config.revision(), "app config reloaded");
            self.palette = Palette::from_store(&self.config);
        }
        changed
    }

    /// Renders the header and remembers its layout for pointer events.
    pub fn view(&mut self) -> HeaderView {
        let view = render(&self.header, &self.palette);
        self.layout = view.layout.clone();
        view
    }

    pub fn layout(&self) -> &HeaderLayout {
        &self.layout
    }

    pub fn error_timeout(&self) -> Duration {
        self.error_timeout
    }

    pub fn request_exit(&mut self) {
        self.should_exit = true;
    }

    pub fn should_exit(&self) -> bool {
        self.should_exit
    }
}
