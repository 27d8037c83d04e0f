//! Resource kinds shown on the board.
//!
//! Equipment, molds and tools are the three secondary assignments an
//! operator sees next to a task. The board only displays them; it does not
//! check availability or capacity.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of resource assignment carried by work orders and operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// Main machine (e.g., "CNC-1").
    Equipment,
    /// Mold or die.
    Mold,
    /// Hand or machine tool.
    Tool,
}

impl ResourceKind {
    /// All kinds, in label order.
    pub const ALL: [ResourceKind; 3] = [Self::Equipment, Self::Mold, Self::Tool];

    /// Caption used in the task label's resource line.
    pub fn caption(self) -> &'static str {
        match self {
            Self::Equipment => "Equipment",
            Self::Mold => "Mold",
            Self::Tool => "Tool",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.caption())
    }
}
