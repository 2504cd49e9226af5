//! Turns report sections into text tables or JSON.

use std::io::Write;

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::{
    config::{OutputFormat, RenderConfig},
    table,
};

/// One block of the report: a titled table plus the same content as JSON.
#[derive(Debug, Clone)]
pub struct Section {
    pub key: String,
    pub title: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub data: Value,
}

impl Section {
    pub fn new<T>(key: &str, title: &str, data: &T) -> Result<Self>
    where
        T: Serialize + ?Sized,
    {
        let data = serde_json::to_value(data)
            .with_context(|| format!("Serializing section '{key}'"))?;
        Ok(Self {
            key: key.to_string(),
            title: title.to_string(),
            headers: Vec::new(),
            rows: Vec::new(),
            data,
        })
    }

    pub fn with_table(mut self, headers: &[&str], rows: Vec<Vec<String>>) -> Self {
        self.headers = headers.iter().map(|h| h.to_string()).collect();
        self.rows = rows;
        self
    }

    pub fn with_headers(mut self, headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        self.headers = headers;
        self.rows = rows;
        self
    }
}

pub fn write_sections<W>(out: &mut W, sections: &[Section], config: &RenderConfig) -> Result<()>
where
    W: Write,
{
    match config.format {
        OutputFormat::Table => {
            for (idx, section) in sections.iter().enumerate() {
                if idx > 0 {
                    writeln!(out)?;
                }
                writeln!(out, "{}", section.title)?;
                writeln!(out, "{}", "=".repeat(section.title.chars().count()))?;
                if section.rows.is_empty() {
                    writeln!(out, "(no rows)")?;
                } else {
                    write!(out, "{}", table::render_table(&section.headers, &section.rows))?;
                }
            }
        }
        OutputFormat::Json => {
            let document = if let [single] = sections {
                single.data.clone()
            } else {
                let mut map = Map::new();
                for section in sections {
                    map.insert(section.key.clone(), section.data.clone());
                }
                Value::Object(map)
            };
            serde_json::to_writer_pretty(&mut *out, &document).context("Writing JSON report")?;
            writeln!(out)?;
        }
    }
    out.flush()?;
    Ok(())
}

/// Horizontal bar scaled so that `max` spans `width` characters.
pub fn bar(value: f64, max: f64, width: usize) -> String {
    if max <= 0.0 || value <= 0.0 || width == 0 {
        return String::new();
    }
    let filled = ((value / max) * width as f64).round() as usize;
    "#".repeat(filled.min(width))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Section {
        Section::new("counts", "Item count by restaurant", &vec![("Sonic", 53)])
            .unwrap()
            .with_table(&["restaurant", "count"], vec![vec!["Sonic".into(), "53".into()]])
    }

    #[test]
    fn bar_scales_to_width() {
        assert_eq!(bar(50.0, 100.0, 10), "#####");
        assert_eq!(bar(100.0, 100.0, 10), "##########");
        assert_eq!(bar(0.0, 100.0, 10), "");
        assert_eq!(bar(5.0, 0.0, 10), "");
    }

    #[test]
    fn table_output_has_title_and_underline() {
        let mut out = Vec::new();
        write_sections(&mut out, &[sample()], &RenderConfig::default()).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines = text.lines().collect::<Vec<_>>();
        assert_eq!(lines[0], "Item count by restaurant");
        assert_eq!(lines[1], "=".repeat(24));
        assert_eq!(lines[2], "restaurant  count");
        assert_eq!(lines[4], "Sonic          53");
    }

    #[test]
    fn json_output_keys_multiple_sections() {
        let config = RenderConfig {
            format: OutputFormat::Json,
            ..RenderConfig::default()
        };
        let mut other = sample();
        other.key = "salad".to_string();
        let mut out = Vec::new();
        write_sections(&mut out, &[sample(), other], &config).unwrap();
        let parsed: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed["counts"][0][1], 53);
        assert!(parsed.get("salad").is_some());
    }
}
