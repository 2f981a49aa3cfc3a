use std::path::PathBuf;

use clap::Parser;
use log::info;

use inkwell::{App, Cli, CollectionStore, NoteRepository, Result, SettingsRepository};

pub fn initialize_logger(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp_secs()
        .format_module_path(true)
        .init();

    info!("Logger initialized");
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("inkwell")
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    initialize_logger(cli.verbose);

    let data_dir = cli.data_dir.clone().unwrap_or_else(default_data_dir);
    info!("Using data directory: {}", data_dir.display());

    let store = CollectionStore::new(data_dir.clone())?;
    let mut repository = NoteRepository::new(store);
    repository.hydrate()?;

    let settings = SettingsRepository::new(data_dir.join("settings.db"));

    let mut app = App::new(repository, settings);
    app.run(cli.command).await
}
