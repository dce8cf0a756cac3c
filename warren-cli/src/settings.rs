use crate::args::Cli;
use config::{Config, ConfigError, Environment, File};
use std::path::PathBuf;
use url::Url;
use warren::WarrenError;

pub const DEFAULT_CONFIG_FILE: &str = "warren.toml";

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Settings {
    pub base_url: String,
    pub token: Option<String>,
    /// Default `page[limit]` for `list`; zero leaves it to the server.
    pub page_limit: usize,
    pub timeout_secs: u64,
}

impl Settings {
    /// Defaults, then the settings file, then `WARREN_*` variables, then flags.
    /// The default file may be missing; one named with `--config` may not.
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let file = cli.config.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        Config::builder()
            .set_default("base_url", "http://localhost:3000")?
            .set_default("page_limit", 0)?
            .set_default("timeout_secs", 30)?
            .add_source(File::from(file).required(cli.config.is_some()))
            .add_source(Environment::with_prefix("WARREN").try_parsing(true))
            .set_override_option("base_url", cli.base_url.clone())?
            .set_override_option("token", cli.token.clone())?
            .build()?
            .try_deserialize()
    }

    pub fn base_url(&self) -> Result<Url, WarrenError> {
        Url::parse(&self.base_url).map_err(|err| WarrenError::InvalidBaseUrl(self.base_url.clone(), err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;

    #[test]
    fn file_values_lose_to_flags() {
        let dir = std::env::temp_dir().join(format!("warren-settings-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("warren.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "base_url = \"https://file.example.com\"\npage_limit = 50\ntoken = \"t0\"").unwrap();

        let cli = Cli::try_parse_from([
            "warren",
            "--config",
            path.to_str().unwrap(),
            "--base-url",
            "https://flag.example.com",
            "delete",
            "projects",
            "1",
        ])
        .unwrap();
        let settings = Settings::load(&cli).unwrap();
        assert_eq!(settings.base_url, "https://flag.example.com");
        assert_eq!(settings.page_limit, 50);
        assert_eq!(settings.token.as_deref(), Some("t0"));
        assert_eq!(settings.timeout_secs, 30);
        assert!(settings.base_url().is_ok());
    }

    #[test]
    fn named_config_file_must_exist() {
        let cli =
            Cli::try_parse_from(["warren", "--config", "/nonexistent/warren.toml", "delete", "projects", "1"])
                .unwrap();
        assert!(Settings::load(&cli).is_err());
    }

    #[test]
    fn bad_base_url_is_reported() {
        let settings =
            Settings { base_url: "not a url".into(), token: None, page_limit: 0, timeout_secs: 30 };
        assert!(matches!(settings.base_url(), Err(WarrenError::InvalidBaseUrl(..))));
    }
}
