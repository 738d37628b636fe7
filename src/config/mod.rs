pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::RenderMode;
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "cardio-form")]
#[command(about = "Heart failure risk form: single prediction and batch CSV upload")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Override server.base_url
    #[arg(long)]
    pub base_url: Option<String>,

    /// Override ui.render_mode
    #[arg(long, value_enum)]
    pub render_mode: Option<RenderMode>,

    /// Override output.path
    #[arg(long)]
    pub output_path: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Fill the form and request a single prediction
    Predict {
        /// Preset chip to click first (low, medium, high)
        #[arg(long)]
        preset: Option<String>,

        /// Field value, e.g. --field Age=54 (repeatable)
        #[arg(long = "field", value_name = "NAME=VALUE")]
        fields: Vec<String>,

        /// Play the gauge counter in the terminal
        #[arg(long)]
        animate: bool,
    },
    /// Upload a CSV file for batch scoring
    Upload {
        /// CSV file to upload
        file: String,
    },
    /// List the preset chips and their values
    Presets,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 套用命令列覆蓋設定
    pub fn apply_overrides(&self, config: &mut toml_config::FormConfig) {
        if let Some(base_url) = &self.base_url {
            config.server.base_url = base_url.clone();
            tracing::info!("🔧 server.base_url overridden to: {}", base_url);
        }
        if let Some(mode) = self.render_mode {
            config.ui.render_mode = mode;
            tracing::info!("🔧 ui.render_mode overridden to: {:?}", mode);
        }
        if let Some(path) = &self.output_path {
            config.output.path = path.clone();
            tracing::info!("🔧 output.path overridden to: {}", path);
        }
    }
}

/// Splits a `NAME=VALUE` argument.
pub fn parse_field_assignment(arg: &str) -> Option<(&str, &str)> {
    let (name, value) = arg.split_once('=')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    Some((name, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_field_assignment() {
        assert_eq!(parse_field_assignment("Age=54"), Some(("Age", "54")));
        assert_eq!(parse_field_assignment("Oldpeak=1.5"), Some(("Oldpeak", "1.5")));
        assert_eq!(parse_field_assignment("Sex="), Some(("Sex", "")));
        assert_eq!(parse_field_assignment("=54"), None);
        assert_eq!(parse_field_assignment("Age"), None);
    }

    #[cfg(feature = "cli")]
    #[test]
    fn test_cli_overrides() {
        let cli = CliConfig::parse_from([
            "cardio-form",
            "--base-url",
            "http://10.1.1.1:8000",
            "--render-mode",
            "plain",
            "predict",
            "--preset",
            "high",
            "--field",
            "Age=70",
        ]);
        let mut config = toml_config::FormConfig::default();
        cli.apply_overrides(&mut config);

        assert_eq!(config.server.base_url, "http://10.1.1.1:8000");
        assert_eq!(config.ui.render_mode, RenderMode::Plain);
        match cli.command {
            Command::Predict { preset, fields, animate } => {
                assert_eq!(preset.as_deref(), Some("high"));
                assert_eq!(fields, vec!["Age=70".to_string()]);
                assert!(!animate);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
