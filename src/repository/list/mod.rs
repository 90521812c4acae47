//! List Repository Module
//!
//! - list_repo: Core CRUD operations
//! - list_positioning: Sibling queries and atomic batch writes

mod list_positioning;
mod list_repo;

pub use list_repo::ListRepository;
pub(crate) use list_repo::find_list;
