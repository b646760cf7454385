//! Bilingual liturgy documents: Latin and Slovenian text side by side.
//!
//! A request payload is validated ([`payload`]), composed into an abstract
//! document tree ([`compose`], [`model`]) and rendered to DOCX bytes
//! ([`render`]). Every typographic constant lives in [`style`].

pub mod compose;
pub mod model;
pub mod payload;
pub mod render;
pub mod style;

pub use compose::compose;
pub use model::Document;
pub use payload::{LiturgyRequest, LocalizedBlock, Section, ValidationError};
pub use render::{DocsError, generate_liturgy_docx, render_docx};
pub use style::DocumentStyle;

/// MIME type of the generated documents.
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
