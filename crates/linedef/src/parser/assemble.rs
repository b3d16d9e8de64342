use tracing::debug;
use super::convert::convert;
use super::matcher::StructuralMatch;
use super::model::{FieldAnomaly, Request, Value};

/// Convert every token of a structural match into a typed request record.
///
/// A token that cannot be converted leaves its field absent and is
/// recorded in [`Request::anomalies`]; the remaining fields are still
/// converted.
pub fn assemble(format: &str, matched: &StructuralMatch<'_, '_>, line_number: usize) -> Request {
    let shape = matched.shape;
    let mut fields = Vec::with_capacity(shape.fields().len());
    let mut anomalies = Vec::new();

    for (spec, token) in shape.fields().iter().zip(&matched.tokens) {
        let value = match convert(*token, spec.field_type) {
            Ok(value) => value,
            Err(error) => {
                let token = token.unwrap_or_default();
                debug!(
                    line = line_number,
                    shape = shape.name(),
                    field = %spec.name,
                    token,
                    "Field conversion failed: {}", error
                );
                anomalies.push(FieldAnomaly {
                    field: spec.name.clone(),
                    token: token.to_string(),
                    error,
                });
                Value::Absent
            }
        };
        fields.push((spec.name.clone(), value));
    }

    Request {
        format: format.to_string(),
        shape: shape.name().to_string(),
        line_number,
        fields,
        anomalies,
    }
}
