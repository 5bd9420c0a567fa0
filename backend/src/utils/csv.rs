use std::borrow::Cow;

use csv::{QuoteStyle, WriterBuilder};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

fn needs_formula_guard(value: &str) -> bool {
    matches!(value.chars().next(), Some('=' | '+' | '-' | '@'))
}

/// Prefixes text that a spreadsheet would evaluate as a formula.
pub fn guard_formula(value: &str) -> Cow<'_, str> {
    if needs_formula_guard(value) {
        Cow::Owned(format!("'{}", value))
    } else {
        Cow::Borrowed(value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CsvField {
    /// Free text; formula-guarded.
    Text(String),
    Number(f64),
}

impl CsvField {
    fn render(&self) -> Cow<'_, str> {
        match self {
            CsvField::Text(text) => guard_formula(text),
            CsvField::Number(value) => Cow::Owned(format_number(*value)),
        }
    }
}

impl From<&str> for CsvField {
    fn from(value: &str) -> Self {
        CsvField::Text(value.to_string())
    }
}

impl From<String> for CsvField {
    fn from(value: String) -> Self {
        CsvField::Text(value)
    }
}

impl From<f64> for CsvField {
    fn from(value: f64) -> Self {
        CsvField::Number(value)
    }
}

impl From<i64> for CsvField {
    fn from(value: i64) -> Self {
        CsvField::Number(value as f64)
    }
}

/// Integers print without a decimal point.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// UTF-8 CSV with a byte-order mark so spreadsheet apps pick the right
/// encoding. Cells are quoted only when needed.
pub struct CsvDocument {
    writer: csv::Writer<Vec<u8>>,
}

impl CsvDocument {
    pub fn new() -> Self {
        let writer = WriterBuilder::new()
            .quote_style(QuoteStyle::Necessary)
            .from_writer(UTF8_BOM.to_vec());
        Self { writer }
    }

    pub fn write_row(&mut self, fields: &[CsvField]) -> csv::Result<()> {
        self.writer
            .write_record(fields.iter().map(|field| field.render().into_owned()))
    }

    pub fn finish(mut self) -> std::io::Result<Vec<u8>> {
        self.writer.flush()?;
        self.writer.into_inner().map_err(|err| err.into_error())
    }
}

impl Default for CsvDocument {
    fn default() -> Self {
        Self::new()
    }
}
