//! Reads the nutrition CSV into a [`Dataset`].
//!
//! The header must name every schema column exactly once, in any order. Blank
//! numeric cells load as missing; anything else that does not parse as a finite
//! number is rejected with the offending file line and column.

use std::{io::Read, path::Path};

use encoding_rs::{Encoding, UTF_8};
use log::{debug, info};

use crate::{
    data::{Dataset, Record},
    error::{NutritionError, Result},
    io_utils,
    schema::Column,
};

#[derive(Debug, Clone, Copy)]
pub struct LoadOptions {
    pub delimiter: u8,
    pub encoding: &'static Encoding,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            delimiter: io_utils::DEFAULT_CSV_DELIMITER,
            encoding: UTF_8,
        }
    }
}

impl LoadOptions {
    /// Resolves the delimiter from the file extension unless one is given.
    pub fn for_path(path: &Path, delimiter: Option<u8>, encoding: Option<&str>) -> Result<Self> {
        Ok(Self {
            delimiter: io_utils::resolve_input_delimiter(path, delimiter),
            encoding: io_utils::resolve_encoding(encoding)?,
        })
    }
}

pub fn load_dataset(path: &Path, options: &LoadOptions) -> Result<Dataset> {
    info!(
        "Loading '{}' with delimiter '{}'",
        path.display(),
        crate::printable_delimiter(options.delimiter)
    );
    let input = io_utils::open_input(path)?;
    let dataset = read_dataset(input, options)?;
    info!("Loaded {} row(s) from {:?}", dataset.len(), path);
    Ok(dataset)
}

pub fn read_dataset<R>(input: R, options: &LoadOptions) -> Result<Dataset>
where
    R: Read,
{
    let mut reader = io_utils::open_csv_reader(input, options.delimiter);
    let headers = io_utils::reader_headers(&mut reader, options.encoding)?;
    let layout = resolve_layout(&headers)?;
    debug!("Header layout: {:?}", layout);

    let mut records = Vec::new();
    for (row_idx, record) in reader.byte_records().enumerate() {
        let line = row_idx + 2;
        let record = record
            .map_err(|err| NutritionError::format(format!("Reading row {line}: {err}")))?;
        let decoded = io_utils::decode_record(&record, options.encoding).map_err(|err| {
            NutritionError::format(format!("Decoding row {line}: {err}"))
        })?;
        records.push(parse_record(&layout, &decoded, line)?);
    }
    Ok(Dataset::new(records))
}

/// Maps each field position to its schema column.
fn resolve_layout(headers: &[String]) -> Result<Vec<Column>> {
    let mut layout: Vec<Column> = Vec::with_capacity(headers.len());
    for header in headers {
        let column = Column::from_header(header)
            .ok_or_else(|| NutritionError::format(format!("Unknown column '{header}'")))?;
        if layout.contains(&column) {
            return Err(NutritionError::format(format!(
                "Column '{}' appears more than once in the header",
                column.name()
            )));
        }
        layout.push(column);
    }
    if let Some(absent) = Column::all().find(|column| !layout.contains(column)) {
        return Err(NutritionError::format(format!(
            "Missing required column '{}'",
            absent.name()
        )));
    }
    Ok(layout)
}

fn parse_record(layout: &[Column], fields: &[String], line: usize) -> Result<Record> {
    let mut record = Record::empty();
    for (column, raw) in layout.iter().zip(fields) {
        let trimmed = raw.trim();
        match column {
            Column::Numeric(numeric) => {
                let value = if trimmed.is_empty() {
                    None
                } else {
                    Some(parse_numeric(trimmed).ok_or_else(|| {
                        NutritionError::format(format!(
                            "Row {line} column '{}': '{raw}' is not a number",
                            numeric.name()
                        ))
                    })?)
                };
                record.set_value(*numeric, value);
            }
            other => {
                let value = (!trimmed.is_empty()).then(|| raw.clone());
                record.set_text(*other, value);
            }
        }
    }
    Ok(record)
}

fn parse_numeric(value: &str) -> Option<f64> {
    value.parse::<f64>().ok().filter(|parsed| parsed.is_finite())
}
