use std::path::PathBuf;

use clap::Parser;

use super::logging::LogDestination;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "xpath_forge",
    version,
    about = "Compose a scraping requirement and let a generative model write the XPath scraper"
)]
pub struct Args {
    /// Settings file (RON). Missing file means defaults.
    #[arg(long, default_value = "xpath_forge.ron")]
    pub config: PathBuf,

    /// Where recent tasks are remembered.
    #[arg(long)]
    pub history_file: Option<PathBuf>,

    /// Model name, e.g. gemini-2.5-pro.
    #[arg(long)]
    pub model: Option<String>,

    /// Do not let the model search the web for the site's markup.
    #[arg(long, default_value_t = false)]
    pub no_search: bool,

    /// Log destination.
    #[arg(long, value_enum)]
    pub log: Option<LogDestination>,

    /// Write the effective settings to the config file and exit.
    #[arg(long, default_value_t = false)]
    pub init_config: bool,
}
