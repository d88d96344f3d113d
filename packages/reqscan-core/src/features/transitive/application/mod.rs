//! Transitive resolver application layer

mod expander;

pub use expander::TransitiveResolver;
