//! Pure derivations from stream and inventory data
//!
//! Nothing here holds state or suspends: every function maps its inputs to a
//! fresh value and can be re-run on every snapshot.

mod activity;
mod agents;
mod connectors;
mod tasks;

pub use activity::*;
pub use agents::*;
pub use connectors::*;
pub use tasks::*;
