//! The `scribe config` command for configuration management.

use clap::{Args, Subcommand};
use scribe_core::pipeline::{EXTRACTION_PROMPT_PATH, SYSTEM_PROMPT_PATH};
use scribe_core::Config;
use std::path::Path;

/// Arguments for the `config` command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Subcommands for configuration management.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Display current configuration
    Show,

    /// Show config file path
    Path,

    /// Initialize a new config file with defaults
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
}

/// Write the default configuration as TOML to `path`.
fn write_default(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, Config::default().to_toml()?)?;
    Ok(())
}

/// Effective configuration as TOML, headed by where it came from and the
/// resolved prompt files.
fn render_show(config: &Config, path: &Path) -> anyhow::Result<String> {
    let source = if path.exists() {
        format!("# Loaded from: {}", path.display())
    } else {
        format!("# No file at {} (defaults shown)", path.display())
    };
    let root = config.prompt_root();
    Ok(format!(
        "{source}\n# System prompt: {}\n# Extraction prompt: {}\n\n{}",
        root.join(SYSTEM_PROMPT_PATH).display(),
        root.join(EXTRACTION_PROMPT_PATH).display(),
        config.to_toml()?
    ))
}

/// Execute the config command.
pub async fn execute(args: ConfigArgs) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show => {
            let path = Config::default_path();
            let config = Config::load()?;
            print!("{}", render_show(&config, &path)?);
        }

        ConfigCommand::Path => {
            let path = Config::default_path();
            println!("{}", path.display());
        }

        ConfigCommand::Init { force } => {
            let path = Config::default_path();

            if path.exists() && !force {
                anyhow::bail!(
                    "Config file already exists at: {}\nUse --force to overwrite.",
                    path.display()
                );
            }

            write_default(&path)?;

            tracing::info!("Config file created at: {}", path.display());
            println!("Configuration initialized at: {}", path.display());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_written_default_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        write_default(&path).unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.limits.request_timeout_ms, 60_000);
    }

    #[test]
    fn test_show_lists_source_and_prompt_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut config = Config::default();
        config.general.prompt_root = dir.path().to_string_lossy().into_owned();

        let missing = render_show(&config, &path).unwrap();
        assert!(missing.starts_with("# No file at"));
        let system = dir.path().join("prompts").join("system.txt");
        assert!(missing.contains(&format!("# System prompt: {}", system.display())));
        assert!(missing.contains("[retry]"));

        write_default(&path).unwrap();
        let present = render_show(&config, &path).unwrap();
        assert!(present.starts_with(&format!("# Loaded from: {}", path.display())));
    }
}
