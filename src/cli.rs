use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "cswitch",
    version,
    about = "Pick a settings file and launch claude with it"
)]
pub struct Cli {
    /// Launch this configuration directly instead of showing the menu
    #[arg(value_name = "NAME")]
    pub name: Option<String>,

    /// Directory holding settings.json and settings.<name>.json (default: ~/.claude)
    #[arg(short, long, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Program to launch with the chosen settings
    #[arg(short, long, value_name = "CMD", default_value = "claude")]
    pub program: String,

    /// Flag passed before the settings path
    #[arg(long, value_name = "FLAG", default_value = "--settings", allow_hyphen_values = true)]
    pub flag: String,

    /// Editor command to use instead of detecting one, e.g. "hx" or "code --wait"
    #[arg(long, value_name = "CMD")]
    pub editor: Option<String>,

    /// Print the configurations and exit
    #[arg(short, long)]
    pub list: bool,

    /// Skim color scheme, e.g. "dark", "light", "none", or a custom spec
    #[arg(long = "color", value_name = "SPEC")]
    pub color_spec: Option<String>,

    /// Log filter (trace, debug, info, warn, error)
    #[arg(long, value_name = "LEVEL", default_value = "warn")]
    pub log_level: String,
}

impl Cli {
    pub fn resolve_dir(&self) -> Result<PathBuf> {
        let dir = match &self.dir {
            Some(dir) => dir.clone(),
            None => default_dir()?,
        };
        std::path::absolute(&dir).with_context(|| format!("resolving {}", dir.display()))
    }
}

fn default_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("home directory not found; pass --dir")?;
    Ok(home.join(".claude"))
}
