//! Repository Layer
//!
//! Data access abstractions and implementations.

mod board_repo;
mod card;
mod db;
mod list;
mod memory;
mod traits;


pub use board_repo::{BoardRepository, WorkspaceRepository};
pub use card::CardRepository;
pub use db::{init_db, DbState, SharedConnection};
pub use list::ListRepository;
pub use memory::MemoryRepository;
pub use traits::{ListStore, Repository, SiblingRepository};
