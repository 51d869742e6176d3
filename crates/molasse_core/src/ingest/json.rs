//! JSON document mode: one object or an array of objects.

use super::{IngestError, IngestFormat, IngestReport, SkipReason};
use crate::model::age::{
    parse_numeric_text, AgeField, AgeRecord, AgeValidationError, DatingMethod,
};
use serde_json::{Map, Value};

pub(super) fn parse(text: &str) -> Result<IngestReport, IngestError> {
    let document: Value = serde_json::from_str(text)
        .map_err(|err| IngestError::malformed(IngestFormat::Json, err.to_string()))?;

    let elements = match document {
        Value::Array(items) => items,
        object @ Value::Object(_) => vec![object],
        _ => {
            return Err(IngestError::malformed(
                IngestFormat::Json,
                "expected an object or an array of objects",
            ))
        }
    };

    let mut report = IngestReport::default();
    for (index, element) in elements.iter().enumerate() {
        let row = match element {
            Value::Object(fields) => record_from_object(fields),
            _ => Err(SkipReason::NotAnObject),
        };
        report.push_row(index + 1, row);
    }
    Ok(report)
}

fn record_from_object(fields: &Map<String, Value>) -> Result<AgeRecord, SkipReason> {
    let age = number_field(AgeField::Age, fields.get("age"))?;
    let error = number_field(AgeField::Error, fields.get("error"))?;
    let mineral = fields
        .get("mineral")
        .and_then(Value::as_str)
        .map(str::to_string);
    let method = fields
        .get("method")
        .and_then(Value::as_str)
        .and_then(DatingMethod::parse);
    Ok(AgeRecord::new(mineral, method, age, error)?)
}

/// Accepts JSON numbers and numeric strings; everything else fails the field.
/// Numbers outside the `f64` range arrive as raw text and fail as `NonFinite`.
fn number_field(field: AgeField, value: Option<&Value>) -> Result<f64, AgeValidationError> {
    match value {
        None | Some(Value::Null) => Err(AgeValidationError::Missing(field)),
        Some(Value::Number(number)) => number.as_f64().ok_or(AgeValidationError::NonFinite(field)),
        Some(Value::String(raw)) => parse_numeric_text(field, Some(raw.as_str())),
        Some(other) => Err(AgeValidationError::NotNumeric {
            field,
            value: other.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::parse;
    use crate::ingest::{IngestError, SkipReason};
    use crate::model::age::{AgeField, AgeValidationError, DatingMethod};

    #[test]
    fn single_object_is_one_element_collection() {
        let report = parse(r#"{"mineral":"Biotite","method":"Ar-Ar","age":310.5,"error":2}"#)
            .expect("object should parse");
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].method, Some(DatingMethod::ArAr));
        assert_eq!(report.records[0].age, 310.5);
    }

    #[test]
    fn source_ids_are_replaced() {
        let report = parse(r#"[{"id":"abc","age":1,"error":0.1}]"#).expect("array should parse");
        assert_ne!(report.records[0].id.to_string(), "abc");
    }

    #[test]
    fn non_object_elements_and_bool_fields_are_skipped() {
        let report = parse(r#"[42, {"age":true,"error":1}, {"age":"12","error":null}]"#)
            .expect("array should parse");
        assert!(report.records.is_empty());
        assert_eq!(report.skipped.len(), 3);
        assert_eq!(report.skipped[0].position, 1);
        assert_eq!(report.skipped[0].reason, SkipReason::NotAnObject);
        assert!(matches!(
            report.skipped[1].reason,
            SkipReason::Invalid(AgeValidationError::NotNumeric { field: AgeField::Age, .. })
        ));
        assert_eq!(
            report.skipped[2].reason,
            SkipReason::Invalid(AgeValidationError::Missing(AgeField::Error))
        );
    }

    #[test]
    fn top_level_scalar_is_malformed() {
        assert!(matches!(
            parse("12"),
            Err(IngestError::MalformedDocument { .. })
        ));
    }
}
