//! Standard library filter application layer

mod filter;

pub use filter::filter_stdlib;
