use clap::Parser;
use dataset_header::config::ConfigStore;
use dataset_header::runtime::Runtime;
use dataset_header::state::AppState;
use dataset_header::terminal::Terminal;
use dataset_header::{Header, Result, Settings, logging};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "dataset-header", version, about = "Dataset selector header for the terminal")]
struct Cli {
    /// YAML settings file.
    #[arg(short, long, value_name = "PATH")]
    settings: Option<PathBuf>,

    /// Active dataset at start-up.
    #[arg(short, long, value_name = "NAME")]
    dataset: Option<String>,

    /// Known datasets, comma separated. Replaces the list from the settings file.
    #[arg(long, value_name = "NAMES", value_delimiter = ',')]
    datasets: Vec<String>,

    /// `host:port` that receives backend messages.
    #[arg(long, value_name = "ADDR")]
    backend: Option<String>,

    /// Saved app-config query response.
    #[arg(long, value_name = "PATH", conflicts_with = "config_url")]
    config_file: Option<PathBuf>,

    /// GraphQL endpoint serving the app config.
    #[arg(long, value_name = "URL")]
    config_url: Option<String>,

    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn settings(&self) -> Result<Settings> {
        let mut settings = match &self.settings {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };
        if !self.datasets.is_empty() {
            settings.datasets = self.datasets.clone();
        }
        if let Some(dataset) = &self.dataset {
            settings.dataset = dataset.clone();
        }
        if let Some(backend) = &self.backend {
            settings.backend = Some(backend.clone());
        }
        if let Some(path) = &self.config_file {
            settings.config_file = Some(path.clone());
            settings.config_url = None;
        }
        if let Some(url) = &self.config_url {
            settings.config_url = Some(url.clone());
            settings.config_file = None;
        }
        if let Some(path) = &self.log_file {
            settings.log_file = Some(path.clone());
        }
        settings.validate()?;
        Ok(settings)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let settings = cli.settings()?;
    let log_path = logging::init(settings.log_file.as_deref(), cli.verbose)?;
    info!(log = %log_path.display(), datasets = settings.datasets.len(), "starting");

    let backend = settings.backend()?;
    let source = settings.query_source();
    let mut config = ConfigStore::new();
    config.load_or_keep(source.as_ref());

    let header = Header::new(
        settings.header_options(),
        settings.dataset.clone(),
        settings.datasets.clone(),
        backend,
    );
    let state = AppState::new(header, config, source, settings.error_timeout());

    let terminal = Terminal::new()?;
    let state = Runtime::new(state, terminal).run()?;
    info!(dataset = %state.header().selector().committed(), "exiting");
    Ok(())
}
