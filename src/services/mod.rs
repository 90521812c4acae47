//! Services Layer
//!
//! The two concrete orderings: cards within lists and lists within boards.

mod card_service;
mod list_service;

pub use card_service::{CardService, CardUpdate};
pub use list_service::{ListCopy, ListService, ListUpdate};
