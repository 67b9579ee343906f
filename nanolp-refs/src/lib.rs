//! # nanolp-refs
//!
//! Resolution of chunk references in published literate programs.
//!
//! A rendered literate document still carries the chunk markers of its source: `<<name>>`
//! introduces a chunk, `<<=name>>` pastes one, and `<<=name.*>>` pastes every chunk whose name
//! matches a shell wildcard. This crate turns those markers into anchors and links.
//!
//! Architecture
//!
//!     - glob: shell wildcard → regex source translation
//!     - markers: definition / paste regexes built from the configured delimiters
//!     - symbols: the ordered table of chunk names defined during one run
//!     - resolver: link targets and link markup under the in-page or mapped policy
//!     - matcher: the two text transforms (definitions pass, pastes pass)
//!     - markup: the small element tree every replacement is expressed in
//!
//!     This is a pure lib: it knows nothing about files or HTML parsing. Text goes in, text (or
//!     markup segments) comes out. Walking a real document is the job of `nanolp-html`.
//!
//! Resolution Policies
//!
//!     In-page resolution only knows the chunks defined in the same document, so the whole
//!     document must go through the definitions pass before any paste is resolved. Mapped
//!     resolution gets a complete name → source location table up front and never looks at the
//!     symbol table.
//!
//! Errors
//!
//!     Nothing that happens at marker level is an error. Malformed markers stay as literal text,
//!     a broken wildcard matches nothing and dangling names still produce links. The only errors
//!     are configuration errors, see [`RefsError`].

pub mod chunk;
pub mod command_map;
pub mod config;
pub mod error;
pub mod glob;
pub mod markers;
pub mod markup;
pub mod matcher;
pub mod resolver;
pub mod symbols;

pub use command_map::CommandMap;
pub use config::{Delimiters, Policy, ResolveConfig};
pub use error::RefsError;
pub use markers::{DefinitionMarker, Markers, PasteMarker};
pub use markup::Markup;
pub use matcher::{ReferenceMatcher, Rewrite, Segment};
pub use resolver::{LinkResolver, LinkTarget};
pub use symbols::SymbolTable;
