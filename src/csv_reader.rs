use crate::criteria::Column;
use anyhow::{anyhow, Context, Result};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::fs::File;
use std::io;
use std::path::Path;

/// A numeric cell. Stays as the raw CSV text until a render selects its column.
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    Raw(String),
    Number(f64),
}

/// One row of the dataset
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub state: String,
    pub abbr: String,
    fields: HashMap<Column, Field>,
}

impl Record {
    pub fn new(state: impl Into<String>, abbr: impl Into<String>) -> Self {
        Record {
            state: state.into(),
            abbr: abbr.into(),
            fields: HashMap::new(),
        }
    }

    /// Builder-style setter for a raw (unparsed) cell
    pub fn with_raw(mut self, column: Column, raw: impl Into<String>) -> Self {
        self.fields.insert(column, Field::Raw(raw.into()));
        self
    }

    pub fn field(&self, column: Column) -> Option<&Field> {
        self.fields.get(&column)
    }

    /// Parsed value, `None` while the column has not been coerced
    pub fn value(&self, column: Column) -> Option<f64> {
        match self.field(column) {
            Some(Field::Number(v)) => Some(*v),
            _ => None,
        }
    }

    /// Parse the cell for `column` in place. Already-parsed cells are left alone.
    fn coerce(&mut self, column: Column, row: usize) -> Result<f64> {
        let field = self.fields.get_mut(&column).ok_or_else(|| {
            anyhow!("Row {} ({}) has no value for column '{}'", row, self.abbr, column)
        })?;

        let value = match &*field {
            Field::Number(v) => return Ok(*v),
            Field::Raw(text) => {
                let trimmed = text.trim();
                let value = trimmed.parse::<f64>().with_context(|| {
                    format!(
                        "Failed to parse value '{}' as number in column '{}' at row {}",
                        text, column, row
                    )
                })?;
                if !value.is_finite() {
                    return Err(anyhow!(
                        "Non-finite value '{}' in column '{}' at row {}",
                        text,
                        column,
                        row
                    ));
                }
                value
            }
        };

        *field = Field::Number(value);
        Ok(value)
    }
}

/// Ordered records, loaded once
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    pub fn new(records: Vec<Record>) -> Self {
        Dataset { records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    /// Index of the first record whose abbreviation matches (case-insensitive)
    pub fn position_of_abbr(&self, abbr: &str) -> Option<usize> {
        self.records
            .iter()
            .position(|r| r.abbr.eq_ignore_ascii_case(abbr))
    }

    /// Parse `column` for every record. Idempotent; fails on the first bad cell.
    pub fn coerce(&mut self, column: Column) -> Result<()> {
        for (row_idx, record) in self.records.iter_mut().enumerate() {
            record.coerce(column, row_idx + 1)?;
        }
        Ok(())
    }

    /// Parsed values of `column`, in record order. The column must have been coerced.
    pub fn values(&self, column: Column) -> Result<Vec<f64>> {
        self.records
            .iter()
            .enumerate()
            .map(|(row_idx, record)| {
                record.value(column).ok_or_else(|| {
                    anyhow!(
                        "Column '{}' is not numeric at row {}; coerce it before use",
                        column,
                        row_idx + 1
                    )
                })
            })
            .collect()
    }
}

pub fn load_dataset(path: &Path) -> Result<Dataset> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open dataset '{}'", path.display()))?;
    read_dataset(file).with_context(|| format!("Failed to load dataset '{}'", path.display()))
}

/// Read a dataset from CSV. Requires `state`, `abbr` and all six numeric headers.
pub fn read_dataset<R: io::Read>(source: R) -> Result<Dataset> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(source);

    let headers: Vec<String> = reader
        .headers()
        .context("Failed to read CSV headers")?
        .iter()
        .map(|s| s.to_string())
        .collect();

    let find = |name: &str| -> Result<usize> {
        headers.iter().position(|h| h == name).ok_or_else(|| {
            anyhow!(
                "Column '{}' not found. Available columns: {}",
                name,
                headers.join(", ")
            )
        })
    };

    let state_idx = find("state")?;
    let abbr_idx = find("abbr")?;
    let mut numeric_idx = Vec::with_capacity(Column::ALL.len());
    for column in Column::ALL {
        numeric_idx.push((column, find(column.key())?));
    }

    let mut records = Vec::new();
    for result in reader.records() {
        let row = result.context("Failed to read CSV record")?;
        let cell = |idx: usize| row.get(idx).unwrap_or("").to_string();

        let mut record = Record::new(cell(state_idx), cell(abbr_idx));
        for &(column, idx) in &numeric_idx {
            record = record.with_raw(column, cell(idx));
        }
        records.push(record);
    }

    if records.is_empty() {
        return Err(anyhow!("CSV must contain at least one data row"));
    }

    Ok(Dataset { records })
}
