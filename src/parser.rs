use crate::model::Dataset;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("dataset is not valid JSON: {0}")]
    Syntax(String),
    #[error("dataset does not match the expected shape: {0}")]
    Shape(String),
    #[error("dataset must be a JSON object")]
    NotAnObject,
    #[error("dataset must include `{0}`")]
    MissingKey(&'static str),
}

/// Parses raw dataset text into a JSON document.
///
/// Strict JSON is tried first; hand-edited text with comments or trailing
/// commas is accepted through JSON5.
pub fn parse_document(input: &str) -> Result<serde_json::Value, DatasetError> {
    match serde_json::from_str::<serde_json::Value>(input) {
        Ok(value) => Ok(value),
        Err(strict_err) => match json5::from_str::<serde_json::Value>(input) {
            Ok(value) => {
                tracing::debug!("dataset accepted as JSON5 ({strict_err})");
                Ok(value)
            }
            Err(_) => Err(DatasetError::Syntax(strict_err.to_string())),
        },
    }
}

/// Parses dataset text for rendering. Missing top-level keys read as empty
/// lists and unknown keys are ignored.
pub fn parse_dataset(input: &str) -> Result<Dataset, DatasetError> {
    let document = parse_document(input)?;
    dataset_from_document(document)
}

pub fn dataset_from_document(document: serde_json::Value) -> Result<Dataset, DatasetError> {
    if !document.is_object() {
        return Err(DatasetError::NotAnObject);
    }
    serde_json::from_value(document).map_err(|err| DatasetError::Shape(err.to_string()))
}

/// Checks a document before it is persisted: both top-level lists must be
/// present, even when empty.
pub fn validate_for_save(document: &serde_json::Value) -> Result<(), DatasetError> {
    let Some(object) = document.as_object() else {
        return Err(DatasetError::NotAnObject);
    };
    for key in ["people", "relationships"] {
        if !object.contains_key(key) {
            return Err(DatasetError::MissingKey(key));
        }
    }
    Ok(())
}
