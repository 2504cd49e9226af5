//! The fixed column layout of the fast-food nutrition dataset.
//!
//! Every column the loader accepts is named here exactly once. Downstream code
//! addresses numeric fields through [`NumericColumn`] rather than header
//! strings, so a misspelt column is a compile error instead of a runtime
//! lookup failure.

use std::{fmt, str::FromStr};

use clap::ValueEnum;
use heck::ToTitleCase;
use serde::{Deserialize, Serialize};

use crate::error::NutritionError;

/// Semantic type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Free text identifying a group or an item. Never imputed.
    Categorical,
    /// Boolean-like text indicator. Never imputed.
    Indicator,
    /// Floating point measurement; may be missing before imputation.
    Numeric,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum NumericColumn {
    Calories,
    CalFat,
    TotalFat,
    SatFat,
    TransFat,
    Cholesterol,
    Sodium,
    TotalCarb,
    Fiber,
    Sugar,
    Protein,
    VitA,
    VitC,
    Calcium,
}

impl NumericColumn {
    pub const COUNT: usize = 14;

    pub const ALL: [NumericColumn; Self::COUNT] = [
        NumericColumn::Calories,
        NumericColumn::CalFat,
        NumericColumn::TotalFat,
        NumericColumn::SatFat,
        NumericColumn::TransFat,
        NumericColumn::Cholesterol,
        NumericColumn::Sodium,
        NumericColumn::TotalCarb,
        NumericColumn::Fiber,
        NumericColumn::Sugar,
        NumericColumn::Protein,
        NumericColumn::VitA,
        NumericColumn::VitC,
        NumericColumn::Calcium,
    ];

    /// Position of this column within [`NumericColumn::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            NumericColumn::Calories => "calories",
            NumericColumn::CalFat => "cal_fat",
            NumericColumn::TotalFat => "total_fat",
            NumericColumn::SatFat => "sat_fat",
            NumericColumn::TransFat => "trans_fat",
            NumericColumn::Cholesterol => "cholesterol",
            NumericColumn::Sodium => "sodium",
            NumericColumn::TotalCarb => "total_carb",
            NumericColumn::Fiber => "fiber",
            NumericColumn::Sugar => "sugar",
            NumericColumn::Protein => "protein",
            NumericColumn::VitA => "vit_a",
            NumericColumn::VitC => "vit_c",
            NumericColumn::Calcium => "calcium",
        }
    }

    /// Human-facing label, e.g. `Total Fat` for `total_fat`.
    pub fn label(self) -> String {
        self.name().to_title_case()
    }
}

impl fmt::Display for NumericColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for NumericColumn {
    type Err = NutritionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        NumericColumn::ALL
            .into_iter()
            .find(|column| column.name() == normalized)
            .ok_or_else(|| {
                let supported = NumericColumn::ALL
                    .iter()
                    .map(|column| column.name())
                    .collect::<Vec<_>>()
                    .join(", ");
                NutritionError::InvalidArgument(format!(
                    "Unknown numeric column '{value}'. Supported columns: {supported}"
                ))
            })
    }
}

/// Any column of the dataset, in the order the published file lays them out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Restaurant,
    Item,
    Numeric(NumericColumn),
    Salad,
}

impl Column {
    pub const COUNT: usize = NumericColumn::COUNT + 3;

    pub fn all() -> impl Iterator<Item = Column> {
        [Column::Restaurant, Column::Item]
            .into_iter()
            .chain(NumericColumn::ALL.into_iter().map(Column::Numeric))
            .chain(std::iter::once(Column::Salad))
    }

    pub fn name(self) -> &'static str {
        match self {
            Column::Restaurant => "restaurant",
            Column::Item => "item",
            Column::Numeric(column) => column.name(),
            Column::Salad => "salad",
        }
    }

    pub fn kind(self) -> ColumnKind {
        match self {
            Column::Restaurant | Column::Item => ColumnKind::Categorical,
            Column::Salad => ColumnKind::Indicator,
            Column::Numeric(_) => ColumnKind::Numeric,
        }
    }

    /// Resolves a header cell to a column. Matching ignores surrounding
    /// whitespace and ASCII case.
    pub fn from_header(header: &str) -> Option<Column> {
        let normalized = header.trim().to_ascii_lowercase();
        Column::all().find(|column| column.name() == normalized)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
