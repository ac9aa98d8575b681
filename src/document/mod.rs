//! Layout documents: reading, attribute conventions, writing
//!
//! A document is either Android layout XML with a `RelativeLayout` root, or
//! a TOML file with a `container` kind and an array of `[[element]]` tables
//! holding the same attributes. This module turns it into
//! [`ElementRecord`](crate::layout::ElementRecord)s for the engine and writes
//! the engine's placements back onto it.

pub mod apply;
pub mod attributes;
pub mod lexer;
pub mod model;
mod reader;
mod writer;
mod xml;

pub use apply::{apply, apply_axis, ApplyReport, Warning};
pub use model::{DocumentFormat, LayoutDocument, Markup, RawElement, RELATIVE_LAYOUT};
pub use reader::describe;
pub use writer::derived_output_path;
pub use xml::ANDROID_NS;
