//! Field-level validation helpers shared by request DTOs.
//!
//! DTOs derive [`validator::Validate`]; [`field_errors`] flattens the nested
//! `ValidationErrors` tree into a stable list that the HTTP layer renders as
//! `details`.

use serde::Serialize;
use validator::{ValidationError, ValidationErrors, ValidationErrorsKind};

use crate::roles::{validate_role, VALID_ROLES};

/// A single failed field rule, addressed by a dotted path (`favourite_genres[0].genre_name`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Flatten a `ValidationErrors` tree into a list sorted by field path.
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut out = Vec::new();
    collect(errors, "", &mut out);
    out.sort_by(|a, b| a.field.cmp(&b.field));
    out
}

fn collect(errors: &ValidationErrors, prefix: &str, out: &mut Vec<FieldError>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };
        match kind {
            ValidationErrorsKind::Field(errs) => {
                for err in errs {
                    out.push(FieldError {
                        field: path.clone(),
                        message: describe(err),
                    });
                }
            }
            ValidationErrorsKind::Struct(inner) => collect(inner, &path, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect(inner, &format!("{path}[{index}]"), out);
                }
            }
        }
    }
}

fn describe(err: &ValidationError) -> String {
    match &err.message {
        Some(message) => message.to_string(),
        None => format!("failed '{}' rule", err.code),
    }
}

/// `validator` custom rule: the role must be one of [`VALID_ROLES`].
pub fn role_rule(role: &str) -> Result<(), ValidationError> {
    validate_role(role).map_err(|_| {
        let mut err = ValidationError::new("role");
        err.message = Some(format!("must be one of: {}", VALID_ROLES.join(", ")).into());
        err
    })
}

/// `validator` custom rule: the string must contain a non-whitespace character.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("not_blank");
        err.message = Some("must not be blank".into());
        Err(err)
    } else {
        Ok(())
    }
}
