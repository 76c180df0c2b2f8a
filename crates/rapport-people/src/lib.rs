//! Client-side people store.
//!
//! Tracks people, the messages submitted about them, and the facts extracted
//! from those messages. State only changes through [`reduce`].

pub mod model;
pub mod reducer;

pub use model::{Message, Person, TrackedItem};
pub use reducer::{reduce, Action, PeopleState};
