//! People, messages, and the facts tracked for each person.

use chrono::{DateTime, Utc};
use rapport_extract::Category;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A remembered fact plus the message it was last seen in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedItem {
    pub value: String,
    pub message_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub interests: Vec<TrackedItem>,
    #[serde(default)]
    pub important_dates: Vec<TrackedItem>,
    #[serde(default)]
    pub places: Vec<TrackedItem>,
    #[serde(default)]
    pub notes: Vec<TrackedItem>,
}

impl Person {
    pub fn new(id: Uuid, name: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: name.into(),
            created_at,
            interests: Vec::new(),
            important_dates: Vec::new(),
            places: Vec::new(),
            notes: Vec::new(),
        }
    }

    pub fn items(&self, category: Category) -> &[TrackedItem] {
        match category {
            Category::Interest => &self.interests,
            Category::ImportantDate => &self.important_dates,
            Category::Place => &self.places,
            Category::Note => &self.notes,
        }
    }

    pub fn items_mut(&mut self, category: Category) -> &mut Vec<TrackedItem> {
        match category {
            Category::Interest => &mut self.interests,
            Category::ImportantDate => &mut self.important_dates,
            Category::Place => &mut self.places,
            Category::Note => &mut self.notes,
        }
    }
}

/// One submitted piece of conversation text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: Uuid,
    pub person_id: Uuid,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// A fresh message for `person_id`, stamped now.
    pub fn new(person_id: Uuid, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            person_id,
            text: text.into(),
            created_at: Utc::now(),
        }
    }
}
