//! Builds the report sections, in the order the dashboard walks through them.

use anyhow::Result;
use itertools::Itertools;
use serde::Serialize;

use crate::{
    config::RenderConfig,
    error::NutritionError,
    frequency,
    missing::{self, MissingEntry},
    rank::{self, Order},
    render::{self, Section},
    schema::{Column, NumericColumn},
    session::ReportSession,
    stats,
};

/// Nutrients shown as individual per-restaurant rankings in the full report.
const RANKED_NUTRIENTS: [NumericColumn; 6] = [
    NumericColumn::Protein,
    NumericColumn::Cholesterol,
    NumericColumn::Sodium,
    NumericColumn::Sugar,
    NumericColumn::Fiber,
    NumericColumn::Calcium,
];

/// Predictors plotted against calories.
const FIT_PREDICTORS: [NumericColumn; 3] = [
    NumericColumn::TotalFat,
    NumericColumn::TotalCarb,
    NumericColumn::Protein,
];

pub fn full_report(session: &ReportSession, config: &RenderConfig) -> Result<Vec<Section>> {
    let mut sections = vec![
        preview(session, config.preview_rows)?,
        missing_values(session.raw_missing(), config, false)?,
        imputation(session, config)?,
        counts(session, config)?,
        salad(session)?,
        correlation(session, config)?,
        strong_pairs(session, config)?,
    ];
    for predictor in FIT_PREDICTORS {
        sections.push(fit_or_unfitted(session, config, predictor, NumericColumn::Calories)?);
    }
    sections.push(means(session, config, &NumericColumn::ALL)?);
    for column in RANKED_NUTRIENTS {
        sections.push(ranked_means(session, config, column)?);
    }
    sections.push(boxplot(session, config, NumericColumn::Calories)?);
    sections.push(describe(session, config, NumericColumn::Calories)?);
    sections.push(histogram(
        session,
        config,
        NumericColumn::Calories,
        config.histogram_bins,
    )?);
    for order in [Order::Highest, Order::Lowest] {
        sections.push(top(session, config, NumericColumn::Calories, config.top_n, order)?);
    }
    Ok(sections)
}

pub fn preview(session: &ReportSession, rows: usize) -> Result<Section> {
    let records = &session.dataset().records()[..rows.min(session.dataset().len())];
    let headers = Column::all().map(|c| c.name().to_string()).collect::<Vec<_>>();
    let table = records
        .iter()
        .map(|record| Column::all().map(|c| record.display(c)).collect())
        .collect();
    let title = format!(
        "Dataset ({} of {} rows, after cleaning)",
        records.len(),
        session.dataset().len()
    );
    Ok(Section::new("preview", &title, records)?.with_headers(headers, table))
}

pub fn missing_values(
    entries: &[MissingEntry],
    config: &RenderConfig,
    after_cleaning: bool,
) -> Result<Section> {
    let (key, title) = if after_cleaning {
        ("missing_after", "Missing values after cleaning")
    } else {
        ("missing", "Missing values")
    };
    Ok(Section::new(key, title, entries)?.with_table(
        &["column", "na_count", "na_percent"],
        missing::render_rows(entries, config.precision),
    ))
}

pub fn imputation(session: &ReportSession, config: &RenderConfig) -> Result<Section> {
    let summary = session.imputation();
    Ok(
        Section::new("imputation", "Missing values filled with column mean", summary)?
            .with_table(
                &["column", "filled", "mean"],
                summary.render_rows(config.precision),
            ),
    )
}

pub fn counts(session: &ReportSession, config: &RenderConfig) -> Result<Section> {
    let counts = session.category_counts()?;
    Ok(
        Section::new("counts", "Item count by restaurant", counts.as_slice())?.with_table(
            &["restaurant", "count", "share", ""],
            frequency::render_rows(&counts, config.precision, config.bar_width),
        ),
    )
}

pub fn salad(session: &ReportSession) -> Result<Section> {
    let counts = session.salad_counts()?;
    let rows = counts
        .iter()
        .map(|c| vec![c.value.clone(), c.count.to_string()])
        .collect();
    Ok(Section::new("salad", "Salad item count", counts.as_slice())?
        .with_table(&["salad", "count"], rows))
}

pub fn correlation(session: &ReportSession, config: &RenderConfig) -> Result<Section> {
    let matrix = session.correlation()?;
    let headers = std::iter::once(String::new())
        .chain(matrix.columns.iter().map(|c| c.name().to_string()))
        .collect();
    Ok(
        Section::new("correlation", "Correlation between nutrients", &*matrix)?
            .with_headers(headers, matrix.render_rows(config.precision)),
    )
}

pub fn strong_pairs(session: &ReportSession, config: &RenderConfig) -> Result<Section> {
    let pairs = session.correlation()?.strong_pairs(config.strong_correlation);
    let rows = pairs
        .iter()
        .map(|pair| {
            vec![
                pair.left.label(),
                pair.right.label(),
                format!("{:.precision$}", pair.r, precision = config.precision),
            ]
        })
        .collect();
    let title = format!(
        "Strong correlations (|r| >= {})",
        config.strong_correlation
    );
    Ok(Section::new("strong_correlations", &title, &pairs)?
        .with_table(&["nutrient", "nutrient", "r"], rows))
}

pub fn fit(
    session: &ReportSession,
    config: &RenderConfig,
    x: NumericColumn,
    y: NumericColumn,
) -> Result<Section> {
    let fit = session.linear_fit(x, y)?;
    let key = format!("fit_{}_{}", x.name(), y.name());
    let title = format!("{} to {} relationship", x.label(), y.label());
    Ok(Section::new(&key, &title, &*fit)?.with_table(
        &["x", "y", "slope", "intercept", "r", "n"],
        vec![fit.render_row(config.precision)],
    ))
}

#[derive(Serialize)]
struct UnfittedLine {
    x: NumericColumn,
    y: NumericColumn,
    slope: Option<f64>,
    intercept: Option<f64>,
    r: Option<f64>,
    count: usize,
    reason: String,
}

/// Like [`fit`], but a predictor without spread yields an `n/a` row instead of
/// failing the whole report.
fn fit_or_unfitted(
    session: &ReportSession,
    config: &RenderConfig,
    x: NumericColumn,
    y: NumericColumn,
) -> Result<Section> {
    match session.linear_fit(x, y) {
        Ok(_) => fit(session, config, x, y),
        Err(NutritionError::InsufficientData { reason, .. }) => {
            let line = UnfittedLine {
                x,
                y,
                slope: None,
                intercept: None,
                r: None,
                count: session.dataset().len(),
                reason,
            };
            let key = format!("fit_{}_{}", x.name(), y.name());
            let title = format!("{} to {} relationship", x.label(), y.label());
            let row = vec![
                x.name().to_string(),
                y.name().to_string(),
                "n/a".to_string(),
                "n/a".to_string(),
                "n/a".to_string(),
                line.count.to_string(),
            ];
            Ok(Section::new(&key, &title, &line)?
                .with_table(&["x", "y", "slope", "intercept", "r", "n"], vec![row]))
        }
        Err(err) => Err(err.into()),
    }
}

pub fn means(
    session: &ReportSession,
    config: &RenderConfig,
    columns: &[NumericColumn],
) -> Result<Section> {
    let means = session.grouped_means()?;
    let headers = std::iter::once("restaurant".to_string())
        .chain(columns.iter().map(|c| c.name().to_string()))
        .collect();
    let title = format!(
        "Average nutrition by restaurant ({})",
        columns.iter().map(|c| c.label()).join(", ")
    );
    Ok(Section::new("means", &title, &*means)?
        .with_headers(headers, means.render_rows(columns, config.precision)))
}

#[derive(Serialize)]
struct RankedMean<'a> {
    restaurant: &'a str,
    mean: f64,
}

pub fn ranked_means(
    session: &ReportSession,
    config: &RenderConfig,
    column: NumericColumn,
) -> Result<Section> {
    let means = session.grouped_means()?;
    let ranked = means
        .ranked(column)
        .into_iter()
        .map(|(restaurant, mean)| RankedMean { restaurant, mean })
        .collect::<Vec<_>>();
    let max = ranked.iter().map(|r| r.mean).fold(0.0, f64::max);
    let rows = ranked
        .iter()
        .map(|r| {
            vec![
                r.restaurant.to_string(),
                format!("{:.precision$}", r.mean, precision = config.precision),
                render::bar(r.mean, max, config.bar_width),
            ]
        })
        .collect();
    let key = format!("mean_{}", column.name());
    let title = format!("Average {} by restaurant", column.label());
    Ok(Section::new(&key, &title, &ranked)?.with_table(&["restaurant", column.name(), ""], rows))
}

pub fn boxplot(
    session: &ReportSession,
    config: &RenderConfig,
    column: NumericColumn,
) -> Result<Section> {
    let boxes = session.box_summary(column)?;
    let title = format!("{} box plot by restaurant", column.label());
    Ok(Section::new("boxplot", &title, boxes.as_slice())?.with_table(
        &[
            "restaurant",
            "n",
            "lower",
            "q1",
            "median",
            "q3",
            "upper",
            "outliers",
        ],
        stats::render_box_rows(&boxes, config.precision),
    ))
}

pub fn describe(
    session: &ReportSession,
    config: &RenderConfig,
    column: NumericColumn,
) -> Result<Section> {
    let summary = session.describe(column)?;
    let title = format!("{} summary", column.label());
    Ok(Section::new("describe", &title, &*summary)?
        .with_table(&["statistic", column.name()], summary.render_rows(config.precision)))
}

pub fn histogram(
    session: &ReportSession,
    config: &RenderConfig,
    column: NumericColumn,
    bins: usize,
) -> Result<Section> {
    let histogram = session.histogram(column, bins)?;
    let title = format!("{} histogram", column.label());
    Ok(
        Section::new("histogram", &title, histogram.as_slice())?.with_table(
            &["from", "to", "count", ""],
            stats::render_histogram_rows(&histogram, config.precision, config.bar_width),
        ),
    )
}

pub fn top(
    session: &ReportSession,
    config: &RenderConfig,
    column: NumericColumn,
    n: usize,
    order: Order,
) -> Result<Section> {
    let ranked = session.top_n(column, n, order)?;
    let direction = match order {
        Order::Highest => "highest",
        Order::Lowest => "lowest",
    };
    let key = format!("top_{}_{direction}", column.name());
    let title = format!("Top {n} items with the {direction} {}", column.label());
    Ok(Section::new(&key, &title, ranked.as_slice())?.with_table(
        &["#", "restaurant", "item", column.name()],
        rank::render_rows(&ranked, config.precision),
    ))
}
