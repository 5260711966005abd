use std::path::PathBuf;

use clap::Parser;
use isotropy_plugin_react::config::load_config;
use isotropy_plugin_react::observability::logging;
use isotropy_plugin_react::{ReactPlugin, Plugin};

#[derive(Parser)]
#[command(name = "plugin-config")]
#[command(about = "Validate a plugin settings file and print the normalized configuration", long_about = None)]
struct Cli {
    /// Settings file (TOML). Defaults are printed when omitted.
    file: Option<PathBuf>,

    /// Print JSON instead of key = value lines.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init(logging::DEFAULT_FILTER)?;

    let settings = match &cli.file {
        Some(path) => load_config(path)?,
        None => Default::default(),
    };
    let plugin = ReactPlugin;
    let config = plugin.get_defaults(settings);
    let settings = config.settings();

    tracing::info!(plugin = plugin.name(), "Configuration normalized");

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&settings)?);
    } else {
        println!("type = {:?}", settings.kind);
        println!("path = {:?}", settings.path);
        println!("render_to_static_markup = {}", settings.render_to_static_markup);
        println!("element_selector = {:?}", settings.element_selector);
    }
    Ok(())
}
