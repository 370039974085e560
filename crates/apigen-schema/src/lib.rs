//! OpenAPI document loading and schema model.
//!
//! Reads a YAML or JSON OpenAPI 3.x document from disk and turns it into a
//! [`SchemaDocument`]: an immutable, document-ordered tree of paths,
//! operations, parameters and request bodies. Loading fails fast on missing,
//! unsupported or unparsable files; everything past that point is tolerant,
//! so partially specified documents still load.

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

pub mod loader;
pub mod model;

pub use loader::{SchemaFormat, load, parse_str};
pub use model::{
    Info, MediaTypeSpec, Operation, ParameterSpec, PathItem, RequestBodySpec, SchemaDocument,
    Server,
};
