//! Reflection driven relational mapping.
//!
//! Derive [`Record`] on a struct, then use a [`Mapper`] to turn it into parameterized statements
//! and to decode result rows back into it, through any [`Querier`].

pub use rowmap_core::*;
pub use rowmap_macros::*;
