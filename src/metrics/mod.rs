pub mod aggregate;
pub mod collector;

pub use aggregate::{aggregate, RuntimeSummary};
pub use collector::EventCollector;
