use validator::{ValidationErrors, ValidationErrorsKind};

/// Flattens validator errors into one human readable message.
///
/// Uses each rule's `message` when present and falls back to `"<field> is invalid"`.
/// Fields are visited in name order so the output is stable.
pub fn format_validation_errors(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.errors().iter().collect();
    fields.sort_by(|a, b| a.0.cmp(b.0));

    fields
        .into_iter()
        .flat_map(|(field, kind)| match kind {
            ValidationErrorsKind::Field(errs) => errs
                .iter()
                .map(|e| match &e.message {
                    Some(m) => m.to_string(),
                    None => format!("{field} is invalid"),
                })
                .collect::<Vec<_>>(),
            ValidationErrorsKind::Struct(inner) => vec![format_validation_errors(inner)],
            ValidationErrorsKind::List(items) => items
                .values()
                .map(|inner| format_validation_errors(inner))
                .collect(),
        })
        .collect::<Vec<_>>()
        .join("; ")
}
