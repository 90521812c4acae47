//! Board Entity
//!
//! A board belongs to a workspace and contains ordered lists.

use serde::{Deserialize, Serialize};
use super::entity::Entity;
use super::ordered::Container;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub id: u32,
    pub workspace_id: u32,
    pub name: String,
    pub description: Option<String>,
    pub created_at: Option<i64>,
}

impl Board {
    pub fn new(id: u32, workspace_id: u32, name: String) -> Self {
        Self {
            id,
            workspace_id,
            name,
            description: None,
            created_at: None,
        }
    }
}

impl Entity for Board {
    type Id = u32;

    fn id(&self) -> Self::Id {
        self.id
    }
}

impl Container for Board {
    const KIND: &'static str = "board";
    const OWNER_KIND: &'static str = "workspace";

    fn owner_id(&self) -> u32 {
        self.workspace_id
    }
}
