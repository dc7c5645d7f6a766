//! Submitted payloads and their validation.
//!
//! Forms are cleaned (surrounding whitespace stripped) before validation, so
//! a field holding only spaces counts as empty.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

const REQUIRED: &str = "This field is required.";

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required").with_message(REQUIRED.into()));
    }
    Ok(())
}

/// Anonymous comment submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct CommentForm {
    #[validate(
        custom(function = "not_blank"),
        length(max = 200, message = "Ensure this value has at most 200 characters.")
    )]
    pub author: String,
    #[validate(custom(function = "not_blank"))]
    pub text: String,
}

/// Post creation/edit submission, without the uploaded file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct PostForm {
    #[validate(
        custom(function = "not_blank"),
        length(max = 200, message = "Ensure this value has at most 200 characters.")
    )]
    pub title: String,
    #[validate(custom(function = "not_blank"))]
    pub content: String,
}

/// An uploaded file, not yet stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Everything a create/edit request carries.
#[derive(Debug, Clone, Default)]
pub struct PostSubmission {
    pub form: PostForm,
    pub upload: Option<Upload>,
}

/// Validation messages keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl From<ValidationErrors> for FieldErrors {
    fn from(errors: ValidationErrors) -> Self {
        let map = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let messages = errs
                    .iter()
                    .map(|e| match &e.message {
                        Some(message) => message.to_string(),
                        None => format!("Invalid value ({}).", e.code),
                    })
                    .collect();
                (field.to_string(), messages)
            })
            .collect();
        Self(map)
    }
}

/// Form cleaning: normalize, then validate.
pub trait Clean: Validate + Sized {
    fn normalize(self) -> Self;

    fn clean(self) -> Result<Self, FieldErrors> {
        let cleaned = self.normalize();
        cleaned.validate()?;
        Ok(cleaned)
    }
}

impl Clean for CommentForm {
    fn normalize(self) -> Self {
        Self {
            author: self.author.trim().to_string(),
            text: self.text.trim().to_string(),
        }
    }
}

impl Clean for PostForm {
    fn normalize(self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            content: self.content.trim().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_comment_is_trimmed() {
        let form = CommentForm {
            author: "  Bob ".into(),
            text: "Nice post\n".into(),
        };

        let cleaned = form.clean().unwrap();
        assert_eq!(cleaned.author, "Bob");
        assert_eq!(cleaned.text, "Nice post");
    }

    #[test]
    fn test_blank_comment_fields_are_reported() {
        let form = CommentForm {
            author: "   ".into(),
            text: String::new(),
        };

        let errors = form.clean().unwrap_err();
        assert_eq!(errors.get("author"), Some(&[REQUIRED.to_string()][..]));
        assert_eq!(errors.get("text"), Some(&[REQUIRED.to_string()][..]));
    }

    #[test]
    fn test_overlong_title_is_rejected() {
        let form = PostForm {
            title: "x".repeat(201),
            content: "body".into(),
        };

        let errors = form.clean().unwrap_err();
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["title"]);
    }

    #[test]
    fn test_field_errors_serialize_as_map() {
        let errors = PostForm::default().clean().unwrap_err();
        let json = serde_json::to_value(&errors).unwrap();

        assert!(json["title"].is_array());
        assert!(json["content"].is_array());
    }
}
