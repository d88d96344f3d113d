//! Inventory application layer

mod merge;

pub use merge::{merge_inventories, CompositeInventory};
