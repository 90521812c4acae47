//! Domain Layer
//!
//! Contains all domain entities and core abstractions.

mod board;
mod card;
mod entity;
mod list;
mod ordered;
mod workspace;

pub use board::Board;
pub use card::Card;
pub use entity::{DomainError, DomainResult, Entity, ErrorKind};
pub use list::BoardList;
pub use ordered::{copy_title, Container, OrderedItem};
pub use workspace::Workspace;
