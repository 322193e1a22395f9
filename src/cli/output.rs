//! Output formatting for report results
//!
//! Supports multiple output formats:
//! - Table: Pretty-printed ASCII table (default)
//! - CSV: Comma-separated values
//! - JSON: JSON array of objects
//! - Vertical: One column per line (useful for wide results)

use arrow::array::{Array, ArrayRef, BooleanArray, Float64Array, Int32Array, Int64Array};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use arrow::util::display::{ArrayFormatter, FormatOptions};
use serde_json::{Map, Number, Value};
use std::io::{self, Write};
use std::str::FromStr;

/// Output format for report results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed ASCII table
    #[default]
    Table,
    /// Comma-separated values
    Csv,
    /// JSON array of objects
    Json,
    /// Vertical format (one column per line)
    Vertical,
}

impl OutputFormat {
    /// Get format name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Table => "table",
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Vertical => "vertical",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" | "t" => Ok(Self::Table),
            "csv" | "c" => Ok(Self::Csv),
            "json" | "j" => Ok(Self::Json),
            "vertical" | "v" => Ok(Self::Vertical),
            other => Err(format!(
                "unknown format '{}', expected table, csv, json or vertical",
                other
            )),
        }
    }
}

fn to_io_error(e: impl std::fmt::Display) -> io::Error {
    io::Error::other(e.to_string())
}

/// Formatter for outputting report results in various formats
#[derive(Debug, Clone, Default)]
pub struct OutputFormatter {
    format: OutputFormat,
    max_rows: Option<usize>,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            max_rows: None,
        }
    }

    /// Set maximum rows to display
    pub fn with_max_rows(mut self, max: usize) -> Self {
        self.max_rows = Some(max);
        self
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format record batches and write to stdout
    pub fn print(&self, batches: &[RecordBatch]) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        self.write(&mut stdout, batches)
    }

    /// Format record batches and write to the given writer
    pub fn write<W: Write>(&self, writer: &mut W, batches: &[RecordBatch]) -> io::Result<()> {
        let (batches, hidden) = self.limit(batches);
        match self.format {
            OutputFormat::Table => self.write_table(writer, &batches, hidden),
            OutputFormat::Csv => self.write_csv(writer, &batches),
            OutputFormat::Json => self.write_json(writer, &batches),
            OutputFormat::Vertical => self.write_vertical(writer, &batches),
        }
    }

    /// Format as string
    pub fn format_to_string(&self, batches: &[RecordBatch]) -> String {
        let mut buffer = Vec::new();
        let _ = self.write(&mut buffer, batches);
        String::from_utf8_lossy(&buffer).into_owned()
    }

    /// Cut the batches down to `max_rows`; returns the kept batches and the
    /// number of rows left out
    fn limit(&self, batches: &[RecordBatch]) -> (Vec<RecordBatch>, usize) {
        let total: usize = batches.iter().map(|b| b.num_rows()).sum();
        let Some(max) = self.max_rows else {
            return (batches.to_vec(), 0);
        };

        let mut kept = Vec::new();
        let mut remaining = max;
        for batch in batches {
            if remaining == 0 {
                break;
            }
            let take = batch.num_rows().min(remaining);
            kept.push(batch.slice(0, take));
            remaining -= take;
        }
        (kept, total.saturating_sub(max))
    }

    /// Write as pretty-printed table
    fn write_table<W: Write>(
        &self,
        writer: &mut W,
        batches: &[RecordBatch],
        hidden: usize,
    ) -> io::Result<()> {
        if batches.is_empty() {
            return Ok(());
        }

        let display = arrow::util::pretty::pretty_format_batches(batches).map_err(to_io_error)?;
        writeln!(writer, "{}", display)?;
        if hidden > 0 {
            writeln!(writer, "... ({} more rows)", hidden)?;
        }
        Ok(())
    }

    /// Write as CSV
    fn write_csv<W: Write>(&self, writer: &mut W, batches: &[RecordBatch]) -> io::Result<()> {
        let Some(first) = batches.first() else {
            return Ok(());
        };

        let schema = first.schema();
        let headers: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();
        writeln!(writer, "{}", headers.join(","))?;

        let options = FormatOptions::default();
        for batch in batches {
            let formatters = batch
                .columns()
                .iter()
                .map(|c| ArrayFormatter::try_new(c.as_ref(), &options))
                .collect::<Result<Vec<_>, _>>()
                .map_err(to_io_error)?;

            for row in 0..batch.num_rows() {
                let values: Vec<String> = formatters
                    .iter()
                    .zip(batch.columns())
                    .map(|(f, col)| {
                        if col.is_null(row) {
                            String::new()
                        } else {
                            csv_escape(f.value(row).to_string())
                        }
                    })
                    .collect();
                writeln!(writer, "{}", values.join(","))?;
            }
        }
        Ok(())
    }

    /// Write as JSON array of objects
    fn write_json<W: Write>(&self, writer: &mut W, batches: &[RecordBatch]) -> io::Result<()> {
        let mut rows = Vec::new();
        let options = FormatOptions::default();

        for batch in batches {
            let schema = batch.schema();
            let formatters = batch
                .columns()
                .iter()
                .map(|c| ArrayFormatter::try_new(c.as_ref(), &options))
                .collect::<Result<Vec<_>, _>>()
                .map_err(to_io_error)?;

            for row in 0..batch.num_rows() {
                let mut object = Map::new();
                for (i, field) in schema.fields().iter().enumerate() {
                    let value = json_value(batch.column(i), &formatters[i], row);
                    object.insert(field.name().clone(), value);
                }
                rows.push(Value::Object(object));
            }
        }

        serde_json::to_writer_pretty(&mut *writer, &Value::Array(rows)).map_err(to_io_error)?;
        writeln!(writer)
    }

    /// Write in vertical format (one column per line)
    fn write_vertical<W: Write>(&self, writer: &mut W, batches: &[RecordBatch]) -> io::Result<()> {
        let Some(first) = batches.first() else {
            return Ok(());
        };

        let schema = first.schema();
        let field_names: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();
        let max_name_len = field_names.iter().map(|n| n.len()).max().unwrap_or(0);
        let options = FormatOptions::default().with_null("NULL");

        let mut row_count = 0;
        for batch in batches {
            let formatters = batch
                .columns()
                .iter()
                .map(|c| ArrayFormatter::try_new(c.as_ref(), &options))
                .collect::<Result<Vec<_>, _>>()
                .map_err(to_io_error)?;

            for row in 0..batch.num_rows() {
                row_count += 1;
                writeln!(writer, "*************************** {} ***************************", row_count)?;
                for (name, formatter) in field_names.iter().zip(&formatters) {
                    writeln!(writer, "{:>width$}: {}", name, formatter.value(row), width = max_name_len)?;
                }
            }
        }
        Ok(())
    }
}

/// Quote if the value contains a comma, quote or newline
fn csv_escape(value: String) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value
    }
}

/// Numbers and booleans stay typed; everything else becomes its display string
fn json_value(array: &ArrayRef, formatter: &ArrayFormatter<'_>, row: usize) -> Value {
    if array.is_null(row) {
        return Value::Null;
    }

    let any = array.as_any();
    match array.data_type() {
        DataType::Int64 => any
            .downcast_ref::<Int64Array>()
            .map(|a| Value::from(a.value(row))),
        DataType::Int32 => any
            .downcast_ref::<Int32Array>()
            .map(|a| Value::from(a.value(row))),
        DataType::Float64 => any
            .downcast_ref::<Float64Array>()
            .and_then(|a| Number::from_f64(a.value(row)))
            .map(Value::Number),
        DataType::Boolean => any
            .downcast_ref::<BooleanArray>()
            .map(|a| Value::Bool(a.value(row))),
        _ => None,
    }
    .unwrap_or_else(|| Value::String(formatter.value(row).to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Date32Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use std::sync::Arc;

    fn create_test_batch() -> RecordBatch {
        let schema = Arc::new(Schema::new(vec![
            Field::new("rider_id", DataType::Int64, false),
            Field::new("rider_name", DataType::Utf8, true),
            Field::new("avg_delivery_time_mins", DataType::Float64, true),
        ]));

        RecordBatch::try_new(
            schema,
            vec![
                Arc::new(Int64Array::from(vec![1, 2, 3])),
                Arc::new(StringArray::from(vec![Some("Ravi"), Some("Kabir"), None])),
                Arc::new(Float64Array::from(vec![Some(45.0), Some(31.25), None])),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("table".parse::<OutputFormat>(), Ok(OutputFormat::Table));
        assert_eq!("TABLE".parse::<OutputFormat>(), Ok(OutputFormat::Table));
        assert_eq!("c".parse::<OutputFormat>(), Ok(OutputFormat::Csv));
        assert_eq!("json".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert_eq!("v".parse::<OutputFormat>(), Ok(OutputFormat::Vertical));
        assert!("invalid".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::Vertical.name(), "vertical");
    }

    #[test]
    fn test_csv_output() {
        let formatter = OutputFormatter::new(OutputFormat::Csv);
        let output = formatter.format_to_string(&[create_test_batch()]);

        assert!(output.starts_with("rider_id,rider_name,avg_delivery_time_mins\n"));
        assert!(output.contains("1,Ravi,45.0"));
        assert!(output.contains("2,Kabir,31.25"));
        assert!(output.contains("3,,\n")); // NULL becomes empty
    }

    #[test]
    fn test_csv_quoting() {
        let schema = Arc::new(Schema::new(vec![Field::new("restaurant_name", DataType::Utf8, false)]));
        let names = StringArray::from(vec!["Dosa, Idli & Co", "The \"Royal\" Thali", "Curry Leaf"]);
        let batch = RecordBatch::try_new(schema, vec![Arc::new(names)]).unwrap();

        let output = OutputFormatter::new(OutputFormat::Csv).format_to_string(&[batch]);

        assert!(output.contains("\"Dosa, Idli & Co\""));
        assert!(output.contains("\"The \"\"Royal\"\" Thali\""));
        assert!(output.contains("\nCurry Leaf\n"));
    }

    #[test]
    fn test_json_output() {
        let formatter = OutputFormatter::new(OutputFormat::Json);
        let output = formatter.format_to_string(&[create_test_batch()]);

        let parsed: Value = serde_json::from_str(&output).unwrap();
        let rows = parsed.as_array().unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0]["rider_id"], 1);
        assert_eq!(rows[0]["rider_name"], "Ravi");
        assert_eq!(rows[1]["avg_delivery_time_mins"], 31.25);
        assert!(rows[2]["rider_name"].is_null());
    }

    #[test]
    fn test_json_dates_as_strings() {
        let schema = Arc::new(Schema::new(vec![Field::new("reg_date", DataType::Date32, false)]));
        let batch =
            RecordBatch::try_new(schema, vec![Arc::new(Date32Array::from(vec![19_723]))]).unwrap();

        let output = OutputFormatter::new(OutputFormat::Json).format_to_string(&[batch]);
        assert!(output.contains("\"reg_date\": \"2024-01-01\""));
    }

    #[test]
    fn test_vertical_output() {
        let formatter = OutputFormatter::new(OutputFormat::Vertical);
        let output = formatter.format_to_string(&[create_test_batch()]);

        assert!(output.contains("*** 1 ***"));
        assert!(output.contains("*** 3 ***"));
        assert!(output.contains("rider_name: Ravi"));
        assert!(output.contains("rider_name: NULL"));
    }

    #[test]
    fn test_table_output() {
        let formatter = OutputFormatter::new(OutputFormat::Table);
        let output = formatter.format_to_string(&[create_test_batch()]);

        assert!(output.contains("+"));
        assert!(output.contains("rider_name"));
        assert!(output.contains("Kabir"));
    }

    #[test]
    fn test_max_rows() {
        let batch = create_test_batch();
        let output = OutputFormatter::new(OutputFormat::Csv)
            .with_max_rows(2)
            .format_to_string(&[batch.clone()]);
        assert_eq!(output.lines().count(), 3); // header + 2 data rows

        let output = OutputFormatter::new(OutputFormat::Table)
            .with_max_rows(1)
            .format_to_string(&[batch]);
        assert!(output.contains("... (2 more rows)"));
        assert!(!output.contains("Kabir"));
    }

    #[test]
    fn test_empty_batches() {
        let output = OutputFormatter::new(OutputFormat::Csv).format_to_string(&[]);
        assert!(output.is_empty());

        let output = OutputFormatter::new(OutputFormat::Json).format_to_string(&[]);
        assert_eq!(output.trim(), "[]");
    }
}
