use crate::config::toml_config::TomlConfig;
use crate::config::CliConfig;
use crate::core::StoreSettings;
use crate::utils::error::{Result, SubbudError};
use crate::utils::validation::{
    validate_host, validate_non_empty_string, validate_path, validate_positive_number, Validate,
};

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 6379;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 2;
pub const DEFAULT_RESERVED_PREFIX: &str = "_";

/// Effective configuration after merging CLI/env, the TOML file and defaults.
#[derive(Debug, Clone)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub db: i64,
    pub tls: bool,
    pub username: Option<String>,
    pub password: Option<String>,
    pub connect_timeout_secs: u64,
    pub reserved_prefix: String,
    pub workers: usize,
    pub output_dir: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            db: 0,
            tls: false,
            username: None,
            password: None,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            reserved_prefix: DEFAULT_RESERVED_PREFIX.to_string(),
            workers: num_cpus::get(),
            output_dir: ".".to_string(),
        }
    }
}

impl Settings {
    pub fn resolve(cli: &CliConfig, file: Option<&TomlConfig>) -> Self {
        let defaults = Self::default();
        let store = file.and_then(|f| f.store.clone()).unwrap_or_default();
        let ingest = file.and_then(|f| f.ingest.clone()).unwrap_or_default();
        let export = file.and_then(|f| f.export.clone()).unwrap_or_default();

        Self {
            host: cli.host.clone().or(store.host).unwrap_or(defaults.host),
            port: cli.port.or(store.port).unwrap_or(defaults.port),
            db: cli.db.or(store.db).unwrap_or(defaults.db),
            tls: cli.tls || store.tls.unwrap_or(defaults.tls),
            username: cli.username.clone().or(store.username),
            password: cli.password.clone().or(store.password),
            connect_timeout_secs: store
                .connect_timeout_secs
                .unwrap_or(defaults.connect_timeout_secs),
            reserved_prefix: store.reserved_prefix.unwrap_or(defaults.reserved_prefix),
            workers: cli.workers.or(ingest.workers).unwrap_or(defaults.workers),
            output_dir: cli
                .output_dir
                .clone()
                .or(export.output_dir)
                .unwrap_or(defaults.output_dir),
        }
    }
}

impl StoreSettings for Settings {
    fn host(&self) -> &str {
        &self.host
    }

    fn port(&self) -> u16 {
        self.port
    }

    fn db(&self) -> i64 {
        self.db
    }

    fn tls(&self) -> bool {
        self.tls
    }

    fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    fn connect_timeout_secs(&self) -> u64 {
        self.connect_timeout_secs
    }

    fn reserved_prefix(&self) -> &str {
        &self.reserved_prefix
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validate_host("store.host", &self.host)?;
        validate_positive_number("store.port", u64::from(self.port), 1)?;
        validate_positive_number("store.connect_timeout_secs", self.connect_timeout_secs, 1)?;
        validate_non_empty_string("store.reserved_prefix", &self.reserved_prefix)?;
        validate_positive_number("ingest.workers", self.workers as u64, 1)?;
        validate_path("export.output_dir", &self.output_dir)?;

        if self.db < 0 {
            return Err(SubbudError::InvalidConfigValueError {
                field: "store.db".to_string(),
                value: self.db.to_string(),
                reason: "Database index cannot be negative".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn cli(args: &[&str]) -> CliConfig {
        let argv = ["subbud", "-o", "list"].into_iter().chain(args.iter().copied());
        CliConfig::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_defaults() {
        let mut config = cli(&[]);
        // 環境變數可能已設定，這裡只檢查純預設值
        config.host = None;
        config.port = None;
        config.db = None;
        config.username = None;
        config.password = None;

        let settings = Settings::resolve(&config, None);
        assert_eq!(settings.host, "localhost");
        assert_eq!(settings.port, 6379);
        assert_eq!(settings.db, 0);
        assert!(!settings.tls);
        assert_eq!(settings.connect_timeout_secs, 2);
        assert_eq!(settings.reserved_prefix, "_");
        assert!(settings.workers >= 1);
        assert_eq!(settings.output_dir, ".");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_cli_overrides_file() {
        let file = TomlConfig::from_toml_str(
            "[store]\nhost = \"from-file\"\nport = 7000\ntls = true\n[ingest]\nworkers = 3\n",
        )
        .unwrap();
        let mut config = cli(&["--host", "from-cli", "--workers", "9"]);
        config.port = None;

        let settings = Settings::resolve(&config, Some(&file));
        assert_eq!(settings.host, "from-cli");
        assert_eq!(settings.port, 7000);
        assert!(settings.tls);
        assert_eq!(settings.workers, 9);
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let mut settings = Settings::default();
        settings.workers = 0;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.port = 0;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.db = -1;
        assert!(settings.validate().is_err());
    }
}
