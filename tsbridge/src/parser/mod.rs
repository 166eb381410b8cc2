//! Parser module for raw field metadata.
//!
//! This module contains the struct tag grammar used by front-ends that hand
//! over raw `key:"value"` tags instead of pre-parsed [`TagValue`]s.
//!
//! [`TagValue`]: crate::ir::TagValue

pub mod tag_parser;

pub use tag_parser::{parse_struct_tag, ParsedTags};
