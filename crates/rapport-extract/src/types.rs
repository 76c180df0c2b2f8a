//! Data model shared by both extraction engines and the client store.

use serde::{Deserialize, Serialize};

/// Closed set of fact categories. `Note` is the catch-all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Interest,
    ImportantDate,
    Place,
    Note,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Interest,
        Category::ImportantDate,
        Category::Place,
        Category::Note,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Interest => "interest",
            Category::ImportantDate => "important_date",
            Category::Place => "place",
            Category::Note => "note",
        }
    }

    /// Map a free-form label to a category. Anything unrecognized is a note.
    pub fn from_label(label: &str) -> Self {
        let key: String = label
            .trim()
            .to_lowercase()
            .chars()
            .map(|c| if c == '-' || c == ' ' { '_' } else { c })
            .collect();
        match key.as_str() {
            "interest" | "interests" | "hobby" | "preference" => Category::Interest,
            "important_date" | "important_dates" | "importantdate" | "importantdates" | "date"
            | "dates" | "event" => Category::ImportantDate,
            "place" | "places" | "location" | "locations" => Category::Place,
            _ => Category::Note,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A surfaced fact, already formatted for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedItem {
    pub value: String,
}

impl ExtractedItem {
    pub fn new(value: impl Into<String>) -> Self {
        Self { value: value.into() }
    }

    /// Deduplication key: lowercased and trimmed.
    pub fn normalized(&self) -> String {
        normalize(&self.value)
    }
}

/// Lowercase and trim a display value.
pub fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Four ordered item sequences, one per category, in first-discovered order.
///
/// Serializes to the shape the client expects:
/// `{ interests, importantDates, places, notes }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    #[serde(default)]
    pub interests: Vec<ExtractedItem>,
    #[serde(default)]
    pub important_dates: Vec<ExtractedItem>,
    #[serde(default)]
    pub places: Vec<ExtractedItem>,
    #[serde(default)]
    pub notes: Vec<ExtractedItem>,
}

impl ClassificationResult {
    pub fn items(&self, category: Category) -> &[ExtractedItem] {
        match category {
            Category::Interest => &self.interests,
            Category::ImportantDate => &self.important_dates,
            Category::Place => &self.places,
            Category::Note => &self.notes,
        }
    }

    pub fn items_mut(&mut self, category: Category) -> &mut Vec<ExtractedItem> {
        match category {
            Category::Interest => &mut self.interests,
            Category::ImportantDate => &mut self.important_dates,
            Category::Place => &mut self.places,
            Category::Note => &mut self.notes,
        }
    }

    pub fn push(&mut self, category: Category, item: ExtractedItem) {
        self.items_mut(category).push(item);
    }

    pub fn total(&self) -> usize {
        Category::ALL.iter().map(|c| self.items(*c).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// One unit of extracted information tied to its source text span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fact {
    /// Categories this fact is shown under. Never empty.
    pub categories: Vec<Category>,
    pub value: String,
    /// Verbatim span of the input the fact was read from.
    pub source_text: String,
}

impl Fact {
    pub fn new(category: Category, value: impl Into<String>, source_text: impl Into<String>) -> Self {
        Self {
            categories: vec![category],
            value: value.into(),
            source_text: source_text.into(),
        }
    }

    /// Build a fact from raw labels; unknown labels become `Note`.
    pub fn from_labels<S: AsRef<str>>(
        labels: &[S],
        value: impl Into<String>,
        source_text: impl Into<String>,
    ) -> Self {
        let mut categories: Vec<Category> = Vec::new();
        for label in labels {
            let category = Category::from_label(label.as_ref());
            if !categories.contains(&category) {
                categories.push(category);
            }
        }
        if categories.is_empty() {
            categories.push(Category::Note);
        }
        Self {
            categories,
            value: value.into(),
            source_text: source_text.into(),
        }
    }

    /// The first category, used as the dedup key for atomic facts.
    pub fn primary_category(&self) -> Category {
        self.categories.first().copied().unwrap_or(Category::Note)
    }
}
