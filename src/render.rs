//! Turning extraction results into something a person (or a script) can read.

use clap::ValueEnum;

use crate::{
    extraction::{ExtractionResult, Field},
    prelude::*,
};

/// Heading shown above the extracted fields.
const PANEL_HEADING: &str = "Extracted Marks";

/// Output formats for a result.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[clap(rename_all = "lowercase")]
pub enum OutputFormat {
    /// A labeled panel, one field per line.
    #[default]
    Text,
    /// A single JSON object.
    Json,
    /// A CSV header followed by one row.
    Csv,
}

/// Render the results panel. Every recognized field gets a line, even if the
/// result doesn't contain it.
pub fn panel(result: &ExtractionResult) -> String {
    let mut out = format!("{PANEL_HEADING}\n");
    for field in Field::ALL {
        let value = result.field(field).unwrap_or_default();
        out.push_str(&format!("  {field}: {value}\n"));
    }
    out
}

/// Render a result in the requested format.
pub fn render(format: OutputFormat, result: &ExtractionResult) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(panel(result)),
        OutputFormat::Json => {
            let mut json = serde_json::to_string(&result.to_record())
                .context("Failed to serialize result as JSON")?;
            json.push('\n');
            Ok(json)
        }
        OutputFormat::Csv => csv_rows(result),
    }
}

fn csv_rows(result: &ExtractionResult) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(Field::ALL.map(Field::key))
        .context("Failed to write CSV header")?;
    wtr.write_record(result.to_record().values())
        .context("Failed to write CSV row")?;
    let bytes = wtr.into_inner().context("Failed to flush CSV output")?;
    String::from_utf8(bytes).context("CSV output was not UTF-8")
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn full_result() -> ExtractionResult {
        ExtractionResult::from_value(json!({
            "RRN": "123", "Name": "Jane", "Part-A": "40", "Part-B": "45", "Total": "85"
        }))
    }

    #[test]
    fn panel_lists_all_fields_in_order() {
        assert_eq!(
            panel(&full_result()),
            "Extracted Marks\n  RRN: 123\n  Name: Jane\n  Part-A: 40\n  Part-B: 45\n  Total: 85\n"
        );
    }

    #[test]
    fn panel_shows_missing_fields_as_empty() {
        let result = ExtractionResult::from_value(json!({ "RRN": "123" }));
        assert_eq!(
            panel(&result),
            "Extracted Marks\n  RRN: 123\n  Name: \n  Part-A: \n  Part-B: \n  Total: \n"
        );
    }

    #[test]
    fn json_output_is_one_line() {
        let out = render(OutputFormat::Json, &full_result()).unwrap();
        assert!(out.ends_with('\n'));
        assert_eq!(out.lines().count(), 1);
        let value: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["Part-B"], "45");
    }

    #[test]
    fn csv_output_has_header_and_row() {
        let result = ExtractionResult::from_value(json!({ "Name": "Doe, Jane", "Total": 85 }));
        let out = render(OutputFormat::Csv, &result).unwrap();
        assert_eq!(out, "RRN,Name,Part-A,Part-B,Total\n,\"Doe, Jane\",,,85\n");
    }
}
