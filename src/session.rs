//! An imputed dataset plus memoized aggregates.
//!
//! The session is created once per run: it records the missing-value report of
//! the raw input, imputes, and from then on only reads. Every aggregate is
//! cached under the dataset fingerprint and the request parameters; the
//! fingerprint is the version of the snapshot a cached value was computed
//! from, so an entry can never answer for different data.

use std::rc::Rc;

use log::{debug, info};

use crate::{
    correlation::{self, CorrelationMatrix},
    data::{Dataset, Fingerprint},
    error::Result,
    frequency::{self, CategoryCount},
    grouped::{self, GroupedMeans},
    impute::{self, ImputationSummary},
    memo::Memo,
    missing::{self, MissingEntry},
    rank::{self, Order, RankedRecord},
    schema::NumericColumn,
    stats::{self, BoxSummary, HistogramBin, LinearFit, Summary},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum CountKind {
    Restaurant,
    Salad,
}

pub struct ReportSession {
    dataset: Dataset,
    fingerprint: Fingerprint,
    raw_missing: Vec<MissingEntry>,
    imputation: ImputationSummary,
    counts: Memo<(Fingerprint, CountKind), Vec<CategoryCount>>,
    means: Memo<Fingerprint, GroupedMeans>,
    rankings: Memo<(Fingerprint, NumericColumn, usize, Order), Vec<RankedRecord>>,
    correlation: Memo<Fingerprint, CorrelationMatrix>,
    summaries: Memo<(Fingerprint, NumericColumn), Summary>,
    boxes: Memo<(Fingerprint, NumericColumn), Vec<BoxSummary>>,
    histograms: Memo<(Fingerprint, NumericColumn, usize), Vec<HistogramBin>>,
    fits: Memo<(Fingerprint, NumericColumn, NumericColumn), LinearFit>,
}

impl ReportSession {
    pub fn open(raw: Dataset) -> Result<Self> {
        let raw_missing = missing::missings(&raw);
        let (dataset, imputation) = impute::impute_with_summary(&raw)?;
        let fingerprint = dataset.fingerprint();
        info!(
            "Imputed {} cell(s) across {} column(s); snapshot {}",
            imputation.cells_filled(),
            imputation.fills.len(),
            fingerprint
        );
        Ok(Self {
            dataset,
            fingerprint,
            raw_missing,
            imputation,
            counts: Memo::new(),
            means: Memo::new(),
            rankings: Memo::new(),
            correlation: Memo::new(),
            summaries: Memo::new(),
            boxes: Memo::new(),
            histograms: Memo::new(),
            fits: Memo::new(),
        })
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn fingerprint(&self) -> Fingerprint {
        self.fingerprint
    }

    /// Missing-value report of the input as loaded.
    pub fn raw_missing(&self) -> &[MissingEntry] {
        &self.raw_missing
    }

    /// Missing-value report of the imputed snapshot (all zero by construction).
    pub fn imputed_missing(&self) -> Vec<MissingEntry> {
        missing::missings(&self.dataset)
    }

    pub fn imputation(&self) -> &ImputationSummary {
        &self.imputation
    }

    pub fn category_counts(&self) -> Result<Rc<Vec<CategoryCount>>> {
        self.counts
            .get_or_try_insert_with((self.fingerprint, CountKind::Restaurant), || {
                debug!("Computing restaurant counts");
                frequency::category_counts(&self.dataset)
            })
    }

    pub fn salad_counts(&self) -> Result<Rc<Vec<CategoryCount>>> {
        self.counts
            .get_or_try_insert_with((self.fingerprint, CountKind::Salad), || {
                debug!("Computing salad counts");
                frequency::salad_counts(&self.dataset)
            })
    }

    pub fn grouped_means(&self) -> Result<Rc<GroupedMeans>> {
        self.means.get_or_try_insert_with(self.fingerprint, || {
            debug!("Computing grouped means");
            grouped::grouped_means(&self.dataset)
        })
    }

    pub fn top_n(&self, column: NumericColumn, n: usize, order: Order) -> Result<Rc<Vec<RankedRecord>>> {
        self.rankings
            .get_or_try_insert_with((self.fingerprint, column, n, order), || {
                debug!("Ranking {n} row(s) by {column} ({order:?})");
                rank::top_n(&self.dataset, column, n, order)
            })
    }

    pub fn correlation(&self) -> Result<Rc<CorrelationMatrix>> {
        self.correlation.get_or_try_insert_with(self.fingerprint, || {
            debug!("Computing correlation matrix");
            correlation::correlation_matrix(&self.dataset)
        })
    }

    pub fn describe(&self, column: NumericColumn) -> Result<Rc<Summary>> {
        self.summaries
            .get_or_try_insert_with((self.fingerprint, column), || {
                stats::describe(&self.dataset, column)
            })
    }

    pub fn box_summary(&self, column: NumericColumn) -> Result<Rc<Vec<BoxSummary>>> {
        self.boxes
            .get_or_try_insert_with((self.fingerprint, column), || {
                stats::box_summary(&self.dataset, column)
            })
    }

    pub fn histogram(&self, column: NumericColumn, bins: usize) -> Result<Rc<Vec<HistogramBin>>> {
        self.histograms
            .get_or_try_insert_with((self.fingerprint, column, bins), || {
                stats::histogram(&self.dataset, column, bins)
            })
    }

    pub fn linear_fit(&self, x: NumericColumn, y: NumericColumn) -> Result<Rc<LinearFit>> {
        self.fits
            .get_or_try_insert_with((self.fingerprint, x, y), || {
                stats::linear_fit(&self.dataset, x, y)
            })
    }

    /// Entries currently held across every cache.
    pub fn cached_entries(&self) -> usize {
        self.counts.len()
            + self.means.len()
            + self.rankings.len()
            + self.correlation.len()
            + self.summaries.len()
            + self.boxes.len()
            + self.histograms.len()
            + self.fits.len()
    }
}
