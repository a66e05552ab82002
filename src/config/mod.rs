pub mod toml_config;

pub use toml_config::AssistConfig;

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "cliente-form")]
#[command(about = "Validate customer capture pages and request branch recommendations")]
pub struct CliConfig {
    #[arg(long, help = "TOML configuration file")]
    pub config: Option<String>,

    #[arg(long, help = "Override api.base_url")]
    pub api_base_url: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Fill a page and report whether submission would be blocked
    Check {
        #[arg(long)]
        page: String,

        /// Field values as id=value
        #[arg(long = "set", value_parser = parse_assignment)]
        values: Vec<(String, String)>,
    },
    /// Ask the recommendation service for the nearest branch
    Recommend {
        #[arg(long)]
        address: String,

        /// Run the request through the widget of this page
        #[arg(long)]
        page: Option<String>,
    },
}

#[cfg(feature = "cli")]
fn parse_assignment(raw: &str) -> std::result::Result<(String, String), String> {
    raw.split_once('=')
        .map(|(id, value)| (id.trim().to_string(), value.to_string()))
        .filter(|(id, _)| !id.is_empty())
        .ok_or_else(|| format!("expected id=value, got '{}'", raw))
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// File config (or defaults) with command-line overrides applied.
    pub fn load_assist_config(&self) -> crate::utils::error::Result<AssistConfig> {
        let mut config = match &self.config {
            Some(path) => AssistConfig::from_file(path)?,
            None => AssistConfig::default(),
        };
        if let Some(base_url) = &self.api_base_url {
            config.api.base_url = base_url.clone();
        }
        Ok(config)
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;

    #[test]
    fn test_parse_check_command() {
        let cli = CliConfig::try_parse_from([
            "cliente-form",
            "check",
            "--page",
            "form.html",
            "--set",
            "email=a@b.c",
            "--set",
            "domicilio=Calle 5 = Norte",
        ])
        .unwrap();
        match cli.command {
            Command::Check { page, values } => {
                assert_eq!(page, "form.html");
                assert_eq!(values[0], ("email".to_string(), "a@b.c".to_string()));
                assert_eq!(values[1].1, "Calle 5 = Norte");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_override_base_url() {
        let cli = CliConfig::try_parse_from([
            "cliente-form",
            "--api-base-url",
            "http://127.0.0.1:9000",
            "recommend",
            "--address",
            "Coyoacan",
        ])
        .unwrap();
        let config = cli.load_assist_config().unwrap();
        assert_eq!(config.api.base_url, "http://127.0.0.1:9000");
    }

    #[test]
    fn test_bad_assignment_rejected() {
        assert!(parse_assignment("no-equals").is_err());
        assert!(parse_assignment("=value").is_err());
    }
}
