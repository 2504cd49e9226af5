use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::{config::OutputFormat, rank::Order, schema::NumericColumn};

pub const DEFAULT_INPUT: &str = "fastfood.csv";

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Clean and summarize the fast-food nutrition dataset",
    long_about = None
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Input CSV file (`-` reads stdin)
    #[arg(short = 'i', long = "input", default_value = DEFAULT_INPUT, global = true)]
    pub input: PathBuf,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter, global = true)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding", global = true)]
    pub input_encoding: Option<String>,
    /// YAML file with rendering options
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Output format (overrides the config file)
    #[arg(long, value_enum, global = true)]
    pub format: Option<OutputFormat>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Render every report section in order
    Report,
    /// Show the first rows of the cleaned dataset
    Preview(PreviewArgs),
    /// Count missing values per column
    Missing(MissingArgs),
    /// Count menu items per restaurant
    Counts,
    /// Count items by salad indicator
    Salad,
    /// Average nutrients per restaurant
    Means(MeansArgs),
    /// Items with the highest or lowest value of a nutrient
    Top(TopArgs),
    /// Pearson correlation between nutrients
    Correlation(CorrelationArgs),
    /// Summary statistics of a nutrient
    Describe(ColumnArgs),
    /// Box plot figures of a nutrient per restaurant
    Boxplot(ColumnArgs),
    /// Equal-width histogram of a nutrient
    Histogram(HistogramArgs),
    /// Least-squares fit of one nutrient against another
    Fit(FitArgs),
}

#[derive(Debug, Args)]
pub struct PreviewArgs {
    /// Number of rows to display (defaults to the config value)
    #[arg(long)]
    pub rows: Option<usize>,
}

#[derive(Debug, Args)]
pub struct MissingArgs {
    /// Report on the cleaned dataset instead of the raw input
    #[arg(long)]
    pub after: bool,
}

#[derive(Debug, Args)]
pub struct MeansArgs {
    /// Nutrients to include (defaults to all)
    #[arg(short = 'C', long = "columns", value_enum, value_delimiter = ',')]
    pub columns: Vec<NumericColumn>,
    /// Rank restaurants by a single nutrient instead
    #[arg(long, value_enum, conflicts_with = "columns")]
    pub rank: Option<NumericColumn>,
}

#[derive(Debug, Args)]
pub struct TopArgs {
    /// Nutrient to rank by
    #[arg(short = 'c', long, value_enum, default_value = "calories")]
    pub column: NumericColumn,
    /// Number of items (defaults to the config value)
    #[arg(short = 'n', long)]
    pub count: Option<usize>,
    /// Which end of the ranking to show
    #[arg(long, value_enum, default_value = "highest")]
    pub order: Order,
}

#[derive(Debug, Args)]
pub struct CorrelationArgs {
    /// List only strongly correlated pairs (threshold from the config)
    #[arg(long)]
    pub strong: bool,
}

#[derive(Debug, Args)]
pub struct ColumnArgs {
    /// Nutrient to summarize
    #[arg(short = 'c', long, value_enum, default_value = "calories")]
    pub column: NumericColumn,
}

#[derive(Debug, Args)]
pub struct HistogramArgs {
    /// Nutrient to bin
    #[arg(short = 'c', long, value_enum, default_value = "calories")]
    pub column: NumericColumn,
    /// Number of bins (defaults to the config value)
    #[arg(long)]
    pub bins: Option<usize>,
}

#[derive(Debug, Args)]
pub struct FitArgs {
    /// Predictor nutrient
    #[arg(short = 'x', long, value_enum)]
    pub x: NumericColumn,
    /// Response nutrient
    #[arg(short = 'y', long, value_enum, default_value = "calories")]
    pub y: NumericColumn,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}
