use super::models::CardStates;
use crate::storage::{keys, LocalStore, StorageError};

/// Card states for a deck, empty when nothing was saved yet
pub fn load_states(store: &LocalStore, deck_id: &str) -> Result<CardStates, StorageError> {
    Ok(store
        .get_json::<CardStates>(&keys::review_states(deck_id))?
        .unwrap_or_default())
}

pub fn save_states(store: &LocalStore, deck_id: &str, states: &CardStates) -> Result<(), StorageError> {
    log::debug!("Saving {} card state(s) for deck {}", states.len(), deck_id);
    store.set_json(&keys::review_states(deck_id), states)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use tempfile::TempDir;

    use super::*;
    use crate::review::CardState;

    #[test]
    fn test_states_round_trip_per_deck() {
        let dir = TempDir::new().unwrap();
        let store = LocalStore::new(dir.path());
        assert!(load_states(&store, "verbs").unwrap().is_empty());

        let mut states = CardStates::new();
        states.insert("go".into(), CardState::new("go", Utc::now()));
        save_states(&store, "verbs", &states).unwrap();

        assert_eq!(load_states(&store, "verbs").unwrap(), states);
        assert!(load_states(&store, "nouns").unwrap().is_empty());
        assert!(store.get("review:verbs:states").unwrap().is_some());
    }
}
