//! Immutable resolution settings
//!
//! A [`ResolveConfig`] is built once per run and passed by reference to everything that needs
//! it; there is no global state.

use crate::command_map::CommandMap;
use serde::{Deserialize, Serialize};

/// The strings bounding every marker, `<<` and `>>` by default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delimiters {
    pub left: String,
    pub right: String,
}

impl Delimiters {
    pub fn new(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self {
            left: left.into(),
            right: right.into(),
        }
    }
}

impl Default for Delimiters {
    fn default() -> Self {
        Self::new("<<", ">>")
    }
}

/// Where paste markers look for the chunks they name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Policy {
    /// Only chunks defined in the same document.
    InPage,
    /// Every chunk of the project, through a complete name → source location table.
    Mapped(CommandMap),
}

impl Policy {
    /// Whether the definitions pass has to fill the symbol table.
    pub fn collects_definitions(&self) -> bool {
        matches!(self, Policy::InPage)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Policy::InPage => "in-page",
            Policy::Mapped(_) => "mapped",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveConfig {
    pub delimiters: Delimiters,
    pub policy: Policy,
}

impl ResolveConfig {
    pub fn in_page(delimiters: Delimiters) -> Self {
        Self {
            delimiters,
            policy: Policy::InPage,
        }
    }

    pub fn mapped(delimiters: Delimiters, commands: CommandMap) -> Self {
        Self {
            delimiters,
            policy: Policy::Mapped(commands),
        }
    }
}

impl Default for ResolveConfig {
    fn default() -> Self {
        Self::in_page(Delimiters::default())
    }
}
