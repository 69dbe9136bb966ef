//! XML dialect decoding.
//!
//! [`tree`] builds a generic owned document tree from XML events; the
//! dialect modules are pure functions over that tree.

pub mod osis;
pub mod simple;
pub mod tree;
