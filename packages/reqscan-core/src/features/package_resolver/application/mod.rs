//! Package resolver application layer

mod resolver;

pub use resolver::PackageResolver;
