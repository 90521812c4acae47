//! Card Repository Module
//!
//! - card_repo: Core CRUD operations
//! - card_positioning: Sibling queries and atomic batch writes

mod card_positioning;
mod card_repo;

pub use card_repo::CardRepository;
pub(crate) use card_repo::insert_card;
