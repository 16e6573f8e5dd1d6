use std::collections::BTreeMap;

use serde::Serialize;
use validator::{ValidationErrors, ValidationErrorsKind};

/// Field-path-addressed messages from one validation pass.
///
/// Paths mirror the draft's shape, with line items addressed by index:
/// `invoice_number`, `items[2].quantity`. The set is transient: it is
/// rebuilt on every pass and an empty set is what unblocks submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrorSet {
    errors: BTreeMap<String, String>,
}

impl ValidationErrorSet {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// The message for one field path, if that field failed.
    pub fn message(&self, path: &str) -> Option<&str> {
        self.errors.get(path).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.errors
            .iter()
            .map(|(path, message)| (path.as_str(), message.as_str()))
    }
}

impl From<ValidationErrors> for ValidationErrorSet {
    fn from(source: ValidationErrors) -> Self {
        let mut errors = BTreeMap::new();
        collect("", &source, &mut errors);
        Self { errors }
    }
}

/// Flattens validator's nested error tree into `path -> message` pairs,
/// keeping the first message per field.
fn collect(prefix: &str, source: &ValidationErrors, out: &mut BTreeMap<String, String>) {
    for (field, kind) in source.errors() {
        let path = if prefix.is_empty() {
            (*field).to_string()
        } else {
            format!("{}.{}", prefix, field)
        };
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                if let Some(error) = field_errors.first() {
                    let message = error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| error.code.to_string());
                    out.insert(path, message);
                }
            }
            ValidationErrorsKind::Struct(nested) => collect(&path, nested, out),
            ValidationErrorsKind::List(rows) => {
                for (index, nested) in rows {
                    collect(&format!("{}[{}]", path, index), nested, out);
                }
            }
        }
    }
}
