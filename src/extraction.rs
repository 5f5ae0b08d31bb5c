//! Results returned by the OCR service.
//!
//! The service is free to return whatever JSON it likes. We keep the raw
//! [`Value`] around and only interpret it when rendering, so a result with
//! missing or oddly-typed fields never causes an error.

use std::fmt;

use schemars::JsonSchema;

use crate::prelude::*;

/// The fields we know how to display, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Rrn,
    Name,
    PartA,
    PartB,
    Total,
}

impl Field {
    /// All recognized fields, in display order.
    pub const ALL: [Field; 5] = [
        Field::Rrn,
        Field::Name,
        Field::PartA,
        Field::PartB,
        Field::Total,
    ];

    /// The JSON key used by the OCR service for this field.
    pub fn key(self) -> &'static str {
        match self {
            Field::Rrn => "RRN",
            Field::Name => "Name",
            Field::PartA => "Part-A",
            Field::PartB => "Part-B",
            Field::Total => "Total",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// The structured data extracted from one uploaded file.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionResult {
    /// The parsed response body, exactly as received.
    raw: Value,
}

impl ExtractionResult {
    /// Wrap a parsed response body. No validation is performed.
    pub fn from_value(raw: Value) -> Self {
        Self { raw }
    }

    /// Get the display text for a field. Missing fields, `null` values, and
    /// bodies which aren't JSON objects all produce `None`.
    pub fn field(&self, field: Field) -> Option<String> {
        match self.raw.get(field.key())? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(display_number(n)),
            // Booleans, arrays and objects: best effort.
            other => Some(other.to_string()),
        }
    }

    /// Flatten into a typed record.
    pub fn to_record(&self) -> MarksRecord {
        MarksRecord {
            rrn: self.field(Field::Rrn),
            name: self.field(Field::Name),
            part_a: self.field(Field::PartA),
            part_b: self.field(Field::PartB),
            total: self.field(Field::Total),
        }
    }
}

/// Format a number the way a browser would show it, so `40.0` is just `40`.
/// Floats too large for that, and floats with a fractional part, keep their
/// JSON form.
fn display_number(n: &serde_json::Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e21 => format!("{f:.0}"),
        _ => n.to_string(),
    }
}

/// The marks extracted from a single marksheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MarksRecord {
    /// Roll/registration reference number.
    #[serde(rename = "RRN")]
    pub rrn: Option<String>,

    /// The student's name.
    #[serde(rename = "Name")]
    pub name: Option<String>,

    /// Marks for Part A.
    #[serde(rename = "Part-A")]
    pub part_a: Option<String>,

    /// Marks for Part B.
    #[serde(rename = "Part-B")]
    pub part_b: Option<String>,

    /// Total marks.
    #[serde(rename = "Total")]
    pub total: Option<String>,
}

impl MarksRecord {
    /// The record's values in [`Field::ALL`] order, with missing values as
    /// empty strings.
    pub fn values(&self) -> [&str; 5] {
        [
            self.rrn.as_deref().unwrap_or_default(),
            self.name.as_deref().unwrap_or_default(),
            self.part_a.as_deref().unwrap_or_default(),
            self.part_b.as_deref().unwrap_or_default(),
            self.total.as_deref().unwrap_or_default(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn strings_and_numbers_are_displayed() {
        let result = ExtractionResult::from_value(json!({
            "RRN": "123",
            "Name": "Jane",
            "Part-A": 40,
            "Part-B": 45.5,
            "Total": "85",
        }));
        assert_eq!(result.field(Field::Rrn).as_deref(), Some("123"));
        assert_eq!(result.field(Field::PartA).as_deref(), Some("40"));
        assert_eq!(result.field(Field::PartB).as_deref(), Some("45.5"));
    }

    #[test]
    fn whole_floats_drop_trailing_zero() {
        let result = ExtractionResult::from_value(json!({
            "Part-A": 40.0,
            "Part-B": -3.0,
            "Total": 12345678901234567890u64,
        }));
        assert_eq!(result.field(Field::PartA).as_deref(), Some("40"));
        assert_eq!(result.field(Field::PartB).as_deref(), Some("-3"));
        assert_eq!(
            result.field(Field::Total).as_deref(),
            Some("12345678901234567890")
        );
    }

    #[test]
    fn missing_and_null_fields_are_empty() {
        let result = ExtractionResult::from_value(json!({ "RRN": "123", "Name": null }));
        assert_eq!(result.field(Field::Name), None);
        assert_eq!(result.field(Field::Total), None);
        assert_eq!(result.to_record().values(), ["123", "", "", "", ""]);
    }

    #[test]
    fn non_object_bodies_render_nothing() {
        for body in [json!([1, 2, 3]), json!("hello"), json!(null), json!(7)] {
            let result = ExtractionResult::from_value(body);
            assert_eq!(result.to_record(), MarksRecord::default());
        }
    }

    #[test]
    fn record_uses_service_field_names() {
        let record = ExtractionResult::from_value(json!({ "Part-A": "40" })).to_record();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["Part-A"], "40");
        assert_eq!(json["RRN"], Value::Null);
    }
}
