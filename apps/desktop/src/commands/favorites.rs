//! Favorite word and phrase commands.

use super::{repository, CommandError};
use crate::state::AppState;
use study_core::{ContentItem, ContentKind, EngineError, Favorites};

/// Add or remove a favorite; returns whether it is now a favorite.
pub fn toggle_favorite(state: &AppState, kind: ContentKind, id: &str) -> Result<bool, CommandError> {
    let known = state
        .pool
        .find(id)
        .is_some_and(|item| item.kind == kind);
    if !known {
        return Err(EngineError::UnknownItem(id.to_string()).into());
    }

    let repo = repository(state)?;
    let mut favorites = Favorites::load(&*repo, kind)?;
    favorites.toggle(&*repo, id).map_err(Into::into)
}

/// List favorites of one kind in the order they were added.
pub fn list_favorites(state: &AppState, kind: ContentKind) -> Result<Vec<ContentItem>, CommandError> {
    let repo = repository(state)?;
    let favorites = Favorites::load(&*repo, kind)?;
    Ok(favorites
        .ids()
        .iter()
        .filter_map(|id| state.pool.find(id))
        .cloned()
        .collect())
}
