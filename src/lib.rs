pub mod cli;
pub mod config;
pub mod correlation;
pub mod data;
pub mod error;
pub mod frequency;
pub mod grouped;
pub mod impute;
pub mod io_utils;
pub mod loader;
pub mod memo;
pub mod missing;
pub mod rank;
pub mod render;
pub mod report;
pub mod schema;
pub mod session;
pub mod stats;
pub mod table;

use std::{env, io, sync::OnceLock};

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, debug, info};

use crate::{
    cli::{Cli, Commands},
    config::RenderConfig,
    loader::LoadOptions,
    render::Section,
    schema::NumericColumn,
    session::ReportSession,
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("fastfood_nutrition", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    let config = match &cli.global.config {
        Some(path) => RenderConfig::load(path)
            .with_context(|| format!("Loading render config from {path:?}"))?,
        None => RenderConfig::default(),
    }
    .with_format(cli.global.format);
    debug!("Render config: {config:?}");

    let input = &cli.global.input;
    let options = LoadOptions::for_path(
        input,
        cli.global.delimiter,
        cli.global.input_encoding.as_deref(),
    )?;
    let raw = loader::load_dataset(input, &options)
        .with_context(|| format!("Loading dataset from {input:?}"))?;

    // The raw missing report runs before cleaning, which may reject the input.
    if let Commands::Missing(args) = &cli.command
        && !args.after
    {
        let section = report::missing_values(&missing::missings(&raw), &config, false)?;
        return write_stdout(&[section], &config);
    }

    let session = ReportSession::open(raw).context("Cleaning dataset")?;
    let sections = build_sections(&cli.command, &session, &config)?;
    info!(
        "Rendering {} section(s) with {} cached aggregate(s)",
        sections.len(),
        session.cached_entries()
    );
    write_stdout(&sections, &config)
}

fn write_stdout(sections: &[Section], config: &RenderConfig) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    render::write_sections(&mut handle, sections, config)
}

fn build_sections(
    command: &Commands,
    session: &ReportSession,
    config: &RenderConfig,
) -> Result<Vec<Section>> {
    let section = match command {
        Commands::Report => return report::full_report(session, config),
        Commands::Preview(args) => {
            report::preview(session, args.rows.unwrap_or(config.preview_rows))?
        }
        Commands::Missing(args) if args.after => {
            report::missing_values(&session.imputed_missing(), config, true)?
        }
        Commands::Missing(_) => report::missing_values(session.raw_missing(), config, false)?,
        Commands::Counts => report::counts(session, config)?,
        Commands::Salad => report::salad(session)?,
        Commands::Means(args) => match args.rank {
            Some(column) => report::ranked_means(session, config, column)?,
            None if args.columns.is_empty() => {
                report::means(session, config, &NumericColumn::ALL)?
            }
            None => report::means(session, config, &args.columns)?,
        },
        Commands::Top(args) => report::top(
            session,
            config,
            args.column,
            args.count.unwrap_or(config.top_n),
            args.order,
        )?,
        Commands::Correlation(args) if args.strong => report::strong_pairs(session, config)?,
        Commands::Correlation(_) => report::correlation(session, config)?,
        Commands::Describe(args) => report::describe(session, config, args.column)?,
        Commands::Boxplot(args) => report::boxplot(session, config, args.column)?,
        Commands::Histogram(args) => report::histogram(
            session,
            config,
            args.column,
            args.bins.unwrap_or(config.histogram_bins),
        )?,
        Commands::Fit(args) => report::fit(session, config, args.x, args.y)?,
    };
    Ok(vec![section])
}

pub(crate) fn printable_delimiter(delimiter: u8) -> String {
    match delimiter {
        b',' => ",".to_string(),
        b'\t' => "\\t".to_string(),
        b'\n' => "\\n".to_string(),
        other => (other as char).to_string(),
    }
}
