//! Reference-text intelligence: parsing, lookup, autocomplete, validation.
//!
//! Everything here is pure and synchronous, operating on book and version
//! lists the caller has already loaded from the store. The three public
//! surfaces are:
//!
//! - [`parse_reference`]: "1 John 1:9-10 NKJV" into a [`ParsedReference`],
//! - [`get_suggestions`] / [`smart_transform`]: ranked completions for a
//!   partially typed reference,
//! - [`validate_keystroke`]: per-edit gating of the input field.

mod consts;
mod parse;
mod resolve;
mod suggest;
mod validate;

pub use crate::parse::{ParsedReference, ReferenceError, parse_reference};
pub use crate::resolve::resolve_books;
pub use crate::suggest::{
    MAX_SUGGESTIONS, Suggestion, SuggestionKind, get_suggestions, get_suggestions_limited,
    smart_transform,
};
pub use crate::validate::{Decision, validate_keystroke};
