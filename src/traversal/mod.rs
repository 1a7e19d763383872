//! Breadth-first traversal engine
//!
//! ```text
//! TraversalDescription::new()
//!     .relationships("KNOWS", Direction::Outgoing)
//!     .at_depth(2)
//!     .exclude(...)
//!     .traverse(&store, [seed])?   -> Traverser (lazy Iterator<Item = Reached>)
//! ```

pub mod description;
pub mod traverser;

pub use description::{DepthMode, ExcludeFn, TraversalDescription, Uniqueness};
pub use traverser::{Reached, Traverser};
