//! Rendering configuration.
//!
//! A [`RenderConfig`] is built once (defaults, optionally a YAML file, then
//! command-line overrides) and passed by reference to every renderer.

use std::{fs::File, io::BufReader, path::Path};

use anyhow::{Context, Result, ensure};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
#[value(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// Aligned plain-text tables
    #[default]
    Table,
    /// One JSON document per section
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// Digits after the decimal point for means, percentages, and coefficients.
    pub precision: usize,
    /// Rows shown in the highest/lowest rankings.
    pub top_n: usize,
    /// Rows of the cleaned dataset shown by the preview.
    pub preview_rows: usize,
    pub histogram_bins: usize,
    /// Minimum |r| listed as a strong correlation.
    pub strong_correlation: f64,
    /// Width in characters of the longest ASCII bar.
    pub bar_width: usize,
    pub format: OutputFormat,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            precision: 2,
            top_n: 10,
            preview_rows: 10,
            histogram_bins: 10,
            strong_correlation: 0.7,
            bar_width: 40,
            format: OutputFormat::Table,
        }
    }
}

impl RenderConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("Opening config file {path:?}"))?;
        let reader = BufReader::new(file);
        let config: RenderConfig =
            serde_yaml::from_reader(reader).context("Parsing render config YAML")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            (0.0..=1.0).contains(&self.strong_correlation),
            "strong_correlation must be between 0 and 1, got {}",
            self.strong_correlation
        );
        ensure!(self.histogram_bins > 0, "histogram_bins must be at least 1");
        ensure!(self.precision <= 12, "precision must be 12 or less");
        Ok(())
    }

    pub fn with_format(mut self, format: Option<OutputFormat>) -> Self {
        if let Some(format) = format {
            self.format = format;
        }
        self
    }
}
