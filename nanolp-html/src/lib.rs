//! Chunk reference linking for rendered HTML documents
//!
//!     This crate applies the nanolp-refs transforms to a whole HTML document. The document is
//!     parsed with html5ever into an rcdom tree, every text node goes through the definitions
//!     pass and then the pastes pass, and the tree is serialized back.
//!
//! Architecture
//!
//!     - dom: parsing, serialization and node construction on top of markup5ever_rcdom
//!     - walker: DocumentWalker, the depth-first text node rewrite
//!     - urls: SourceUrls, turns command map source locations into URLs
//!     - publish: the pipeline (guard, link, mark, serialize, write) and the default stylesheet
//!
//!     Like nanolp-refs this is a pure lib and shell agnostic: no printing, no env vars. Reading
//!     configuration and arguments is the job of nanolp-config and nanolp-cli.
//!
//!     The file structure :
//!     .
//!     ├── css
//!     │   └── nanolp-pub.css      # default stylesheet, embedded
//!     ├── src
//!     │   ├── dom.rs
//!     │   ├── error.rs
//!     │   ├── publish.rs
//!     │   ├── urls.rs
//!     │   ├── walker.rs
//!     │   └── lib.rs
//!     └── tests
//!         └── publish_documents.rs
//!
//! Text, not markup
//!
//!     Markers are matched in decoded text nodes, so `&lt;&lt;foo&gt;&gt;` in the HTML source is
//!     the marker `<<foo>>`. Replacements are grafted as element nodes, never re-parsed from a
//!     string, and attribute values and the content of script, style, textarea, title and
//!     template elements are never touched. A marker broken up by inline markup
//!     (`&lt;&lt;<b>foo</b>&gt;&gt;`) spans several text nodes and is left alone.
//!
//! Processed documents
//!
//!     Publishing adds `<meta name="generator" content="nanolp-pub">` to `<head>`. A document
//!     carrying it is refused with [`PublishError::AlreadyProcessed`] unless publishing is forced.

pub mod dom;
pub mod error;
pub mod publish;
pub mod urls;
pub mod walker;

pub use error::PublishError;
pub use publish::{
    publish, read_source, write_default_stylesheet, PublishArtifact, PublishResult, PublishSpec,
    GENERATOR, STYLESHEET_NAME,
};
pub use urls::SourceUrls;
pub use walker::{DocumentWalker, LinkReport};
