//! Interaction handlers over an explicit application state.
//!
//! Each handler takes the current state and returns the next one; a failed
//! action leaves the caller's state untouched.

use crate::FamilyTree;
use crate::config::LayoutConfig;
use crate::model::Dataset;
use crate::parser::parse_dataset;
use crate::store::{DatasetStore, StoreError};
use thiserror::Error;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppState {
    /// `None` until a dataset has been fetched.
    pub dataset: Option<Dataset>,
    /// Url of an uploaded photo waiting to be assigned to someone.
    pub pending_photo: Option<String>,
}

#[derive(Debug, Error)]
pub enum ActionError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Upload a photo first.")]
    NoPendingPhoto,
    #[error("No data loaded.")]
    NotLoaded,
    #[error("Selected person not found: {0}")]
    UnknownPerson(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonOption {
    pub id: String,
    pub name: String,
}

/// What the diagram area should show.
#[derive(Debug, Clone)]
pub enum RenderView {
    NotLoaded,
    Empty,
    Tree(Box<FamilyTree>),
}

pub fn reload(state: &AppState, store: &impl DatasetStore) -> Result<AppState, ActionError> {
    let dataset = store.load()?;
    Ok(AppState {
        dataset: Some(dataset),
        ..state.clone()
    })
}

pub fn save_edited(
    state: &AppState,
    store: &impl DatasetStore,
    text: &str,
) -> Result<AppState, ActionError> {
    let dataset = store.save_text(text)?;
    Ok(AppState {
        dataset: Some(dataset),
        ..state.clone()
    })
}

pub fn upload_photo(
    state: &AppState,
    store: &impl DatasetStore,
    file_name: &str,
    bytes: &[u8],
) -> Result<AppState, ActionError> {
    let url = store.upload_photo(file_name, bytes)?;
    Ok(photo_uploaded(state, url))
}

/// Records a photo url produced elsewhere as the pending photo.
pub fn photo_uploaded(state: &AppState, url: String) -> AppState {
    AppState {
        pending_photo: Some(url),
        ..state.clone()
    }
}

/// Assigns the pending photo to `person_id`. The edit stays local until the
/// dataset is saved.
pub fn assign_photo(state: &AppState, person_id: &str) -> Result<AppState, ActionError> {
    let url = state.pending_photo.clone().ok_or(ActionError::NoPendingPhoto)?;
    let mut dataset = state.dataset.clone().ok_or(ActionError::NotLoaded)?;
    let person = dataset
        .person_mut(person_id)
        .ok_or_else(|| ActionError::UnknownPerson(person_id.to_string()))?;
    person.photo = Some(url);
    Ok(AppState {
        dataset: Some(dataset),
        pending_photo: None,
    })
}

/// Applies edited text locally without saving it.
pub fn preview_edited(state: &AppState, text: &str) -> Result<AppState, ActionError> {
    let dataset = parse_dataset(text).map_err(StoreError::from)?;
    Ok(AppState {
        dataset: Some(dataset),
        ..state.clone()
    })
}

pub fn person_options(dataset: &Dataset) -> Vec<PersonOption> {
    dataset
        .people
        .iter()
        .map(|person| PersonOption {
            id: person.id.clone(),
            name: person.name.clone(),
        })
        .collect()
}

pub fn view(state: &AppState, config: &LayoutConfig) -> RenderView {
    let Some(dataset) = state.dataset.as_ref() else {
        return RenderView::NotLoaded;
    };
    let tree = FamilyTree::build(dataset, config);
    if tree.is_empty() {
        RenderView::Empty
    } else {
        RenderView::Tree(Box::new(tree))
    }
}

/// Dataset text as shown in the editor.
pub fn editor_text(dataset: &Dataset) -> Result<String, ActionError> {
    serde_json::to_string_pretty(dataset).map_err(|err| StoreError::from(err).into())
}
