pub mod cli;

use crate::core::ConfigProvider;
use crate::utils::validation::{validate_path, validate_positive_number, validate_url, Validate};
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "passenger-etl")]
#[command(about = "Fetches a paged passenger API and flattens it into a CSV file")]
pub struct CliConfig {
    /// Source endpoint, queried with `page` and `size` parameters
    #[arg(long, default_value = "https://api.instantwebtools.net/v1/passenger")]
    pub base_url: String,

    /// Records requested per page
    #[arg(long, default_value = "10")]
    pub page_size: u32,

    /// Destination CSV file, truncated on every run
    #[arg(long, default_value = "passengers.csv")]
    pub output_path: String,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit JSON log lines (for scheduler-driven runs)")]
    pub log_json: bool,
}

impl ConfigProvider for CliConfig {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn page_size(&self) -> u32 {
        self.page_size
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> crate::utils::error::Result<()> {
        validate_url("base_url", &self.base_url)?;
        validate_positive_number("page_size", self.page_size as usize, 1)?;
        validate_path("output_path", &self.output_path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> CliConfig {
        CliConfig {
            base_url: "https://api.instantwebtools.net/v1/passenger".to_string(),
            page_size: 10,
            output_path: "passengers.csv".to_string(),
            verbose: false,
            log_json: false,
        }
    }

    #[test]
    fn default_shape_validates() {
        assert!(config().validate().is_ok());
    }

    #[test]
    fn zero_page_size_is_rejected() {
        let mut cfg = config();
        cfg.page_size = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn non_http_base_url_is_rejected() {
        let mut cfg = config();
        cfg.base_url = "file:///etc/passwd".to_string();
        assert!(cfg.validate().is_err());
    }
}
