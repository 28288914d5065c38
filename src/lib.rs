pub mod backend;
pub mod config;
pub mod error;
pub mod header;
pub mod logging;
pub mod runtime;
pub mod selector;
pub mod settings;
pub mod state;
pub mod terminal;
pub mod ui;

pub use error::{Error, Result};
pub use header::{Header, HeaderOptions};
pub use selector::{DatasetSelector, SelectorEffect, SelectorEvent, SelectorState};
pub use settings::Settings;
