use anyhow::{Context, Result};
use log::LevelFilter;
use std::path::PathBuf;
use structopt::StructOpt;
use tile_prep::config::Config;

#[derive(Debug, Clone, StructOpt)]
/// Split annotated images into tiles and write YOLO labels
struct Args {
    #[structopt(long)]
    /// configuration file, the built-in defaults are used if omitted
    pub config_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    // log at info level unless RUST_LOG says otherwise
    let mut builder = pretty_env_logger::formatted_builder();
    match std::env::var("RUST_LOG") {
        Ok(filters) => builder.parse_filters(&filters),
        Err(_) => builder.filter_level(LevelFilter::Info),
    };
    builder.init();

    let Args { config_file } = Args::from_args();
    let config = match &config_file {
        Some(config_file) => Config::open(config_file)
            .with_context(|| format!("failed to load config file '{}'", config_file.display()))?,
        None => Config::default(),
    };

    tile_prep::run(&config)?;

    Ok(())
}
