//! Pure state transitions for the people store.
//!
//! `reduce` never mutates its input; callers swap in the returned state.

use chrono::{DateTime, Utc};
use rapport_extract::{normalize, Category, ClassificationResult};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::model::{Message, Person, TrackedItem};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeopleState {
    pub people: Vec<Person>,
    pub messages: Vec<Message>,
    pub selected_person: Option<Uuid>,
}

/// Every change the store accepts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    AddPerson {
        id: Uuid,
        name: String,
        at: DateTime<Utc>,
    },
    RenamePerson {
        id: Uuid,
        name: String,
    },
    RemovePerson {
        id: Uuid,
    },
    SelectPerson {
        id: Uuid,
    },
    RecordMessage {
        message: Message,
        extraction: ClassificationResult,
    },
    DeleteMessage {
        id: Uuid,
    },
}

impl Action {
    /// An `AddPerson` with a fresh id, stamped now.
    pub fn add_person(name: impl Into<String>) -> Self {
        Action::AddPerson {
            id: Uuid::new_v4(),
            name: name.into(),
            at: Utc::now(),
        }
    }
}

/// Apply `action` to `state`, returning the next state.
pub fn reduce(state: &PeopleState, action: Action) -> PeopleState {
    let mut next = state.clone();
    match action {
        Action::AddPerson { id, name, at } => {
            let name = name.trim();
            if name.is_empty() || next.person(id).is_some() {
                return next;
            }
            next.people.push(Person::new(id, name, at));
            next.selected_person = Some(id);
        }
        Action::RenamePerson { id, name } => {
            let name = name.trim();
            if name.is_empty() {
                return next;
            }
            if let Some(person) = next.person_mut(id) {
                person.name = name.to_string();
            }
        }
        Action::RemovePerson { id } => {
            next.people.retain(|p| p.id != id);
            next.messages.retain(|m| m.person_id != id);
            if next.selected_person == Some(id) {
                next.selected_person = None;
            }
        }
        Action::SelectPerson { id } => {
            if next.person(id).is_some() {
                next.selected_person = Some(id);
            }
        }
        Action::RecordMessage { message, extraction } => {
            let message_id = message.id;
            let Some(person) = next.person_mut(message.person_id) else {
                debug!("Ignoring message for unknown person {}", message.person_id);
                return next;
            };
            merge_extraction(person, &extraction, message_id);
            next.messages.push(message);
        }
        Action::DeleteMessage { id } => {
            next.messages.retain(|m| m.id != id);
        }
    }
    next
}

/// Merge per category by normalized value: a repeat updates the existing
/// entry in place, anything new is appended.
fn merge_extraction(person: &mut Person, extraction: &ClassificationResult, message_id: Uuid) {
    for category in Category::ALL {
        let tracked = person.items_mut(category);
        for item in extraction.items(category) {
            let key = normalize(&item.value);
            if key.is_empty() {
                continue;
            }
            match tracked.iter_mut().find(|t| normalize(&t.value) == key) {
                Some(existing) => {
                    existing.value = item.value.clone();
                    existing.message_id = message_id;
                }
                None => tracked.push(TrackedItem {
                    value: item.value.clone(),
                    message_id,
                }),
            }
        }
    }
}

impl PeopleState {
    pub fn person(&self, id: Uuid) -> Option<&Person> {
        self.people.iter().find(|p| p.id == id)
    }

    fn person_mut(&mut self, id: Uuid) -> Option<&mut Person> {
        self.people.iter_mut().find(|p| p.id == id)
    }

    pub fn selected(&self) -> Option<&Person> {
        self.selected_person.and_then(|id| self.person(id))
    }

    /// Messages for one person, oldest first.
    pub fn messages_for(&self, person_id: Uuid) -> Vec<&Message> {
        self.messages
            .iter()
            .filter(|m| m.person_id == person_id)
            .collect()
    }

    /// The message an item was last seen in, if it still exists.
    pub fn source_of(&self, item: &TrackedItem) -> Option<&Message> {
        self.messages.iter().find(|m| m.id == item.message_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rapport_extract::ExtractedItem;

    fn extraction(interests: &[&str], places: &[&str]) -> ClassificationResult {
        ClassificationResult {
            interests: interests.iter().map(|v| ExtractedItem::new(*v)).collect(),
            places: places.iter().map(|v| ExtractedItem::new(*v)).collect(),
            ..Default::default()
        }
    }

    fn with_person(name: &str) -> (PeopleState, Uuid) {
        let action = Action::add_person(name);
        let Action::AddPerson { id, .. } = action else {
            unreachable!()
        };
        (reduce(&PeopleState::default(), action), id)
    }

    fn record(state: &PeopleState, person_id: Uuid, text: &str, result: ClassificationResult) -> (PeopleState, Uuid) {
        let message = Message::new(person_id, text);
        let id = message.id;
        let next = reduce(
            state,
            Action::RecordMessage {
                message,
                extraction: result,
            },
        );
        (next, id)
    }

    #[test]
    fn test_add_person_selects_them() {
        let (state, id) = with_person("  Ana ");
        assert_eq!(state.people.len(), 1);
        assert_eq!(state.selected().unwrap().name, "Ana");
        assert_eq!(state.selected_person, Some(id));
    }

    #[test]
    fn test_blank_name_is_ignored() {
        let state = reduce(&PeopleState::default(), Action::add_person("   "));
        assert!(state.people.is_empty());
        assert!(state.selected_person.is_none());
    }

    #[test]
    fn test_reduce_leaves_input_untouched() {
        let before = PeopleState::default();
        let after = reduce(&before, Action::add_person("Ana"));
        assert!(before.people.is_empty());
        assert_eq!(after.people.len(), 1);
    }

    #[test]
    fn test_repeat_fact_points_at_newer_message() {
        let (state, id) = with_person("Ana");
        let (state, _first) = record(&state, id, "She likes sushi", extraction(&["Sushi"], &[]));
        let (state, second) = record(&state, id, "she still likes sushi", extraction(&["sushi"], &[]));

        let person = state.person(id).unwrap();
        assert_eq!(person.interests.len(), 1);
        assert_eq!(person.interests[0].message_id, second);
        assert_eq!(person.interests[0].value, "sushi");
        assert_eq!(state.messages_for(id).len(), 2);
    }

    #[test]
    fn test_new_values_append_in_order() {
        let (state, id) = with_person("Ana");
        let (state, _) = record(&state, id, "a", extraction(&["Sushi"], &["Boston"]));
        let (state, _) = record(&state, id, "b", extraction(&["Chess"], &["Lisbon"]));
        let person = state.person(id).unwrap();
        let interests: Vec<&str> = person.interests.iter().map(|t| t.value.as_str()).collect();
        assert_eq!(interests, vec!["Sushi", "Chess"]);
        assert_eq!(person.items(Category::Place).len(), 2);
    }

    #[test]
    fn test_same_value_in_different_categories_is_kept_apart() {
        let (state, id) = with_person("Ana");
        let (state, _) = record(&state, id, "a", extraction(&["Boston"], &["Boston"]));
        let person = state.person(id).unwrap();
        assert_eq!(person.interests.len(), 1);
        assert_eq!(person.places.len(), 1);
    }

    #[test]
    fn test_message_for_unknown_person_is_ignored() {
        let state = PeopleState::default();
        let (next, _) = record(&state, Uuid::new_v4(), "hi", extraction(&["Sushi"], &[]));
        assert_eq!(next, state);
    }

    #[test]
    fn test_delete_message_orphans_items() {
        let (state, id) = with_person("Ana");
        let (state, message_id) = record(&state, id, "likes sushi", extraction(&["Sushi"], &[]));
        let item = state.person(id).unwrap().interests[0].clone();
        assert_eq!(state.source_of(&item).unwrap().text, "likes sushi");

        let state = reduce(&state, Action::DeleteMessage { id: message_id });
        assert!(state.messages.is_empty());
        assert_eq!(state.person(id).unwrap().interests.len(), 1);
        assert!(state.source_of(&item).is_none());
    }

    #[test]
    fn test_remove_person_drops_messages_and_selection() {
        let (state, ana) = with_person("Ana");
        let (state, _) = record(&state, ana, "likes sushi", extraction(&["Sushi"], &[]));
        let state = reduce(&state, Action::RemovePerson { id: ana });
        assert!(state.people.is_empty());
        assert!(state.messages.is_empty());
        assert!(state.selected_person.is_none());
    }

    #[test]
    fn test_select_and_rename() {
        let (state, ana) = with_person("Ana");
        let bo = Uuid::new_v4();
        let state = reduce(
            &state,
            Action::AddPerson {
                id: bo,
                name: "Bo".into(),
                at: Utc::now(),
            },
        );
        assert_eq!(state.selected_person, Some(bo));

        let state = reduce(&state, Action::SelectPerson { id: ana });
        assert_eq!(state.selected().unwrap().name, "Ana");

        let state = reduce(&state, Action::SelectPerson { id: Uuid::new_v4() });
        assert_eq!(state.selected_person, Some(ana));

        let state = reduce(
            &state,
            Action::RenamePerson {
                id: ana,
                name: "Ana Lima".into(),
            },
        );
        assert_eq!(state.person(ana).unwrap().name, "Ana Lima");
    }

    #[test]
    fn test_action_serde_tag() {
        let json = serde_json::to_value(Action::SelectPerson { id: Uuid::nil() }).unwrap();
        assert_eq!(json["type"], "select_person");
    }
}
