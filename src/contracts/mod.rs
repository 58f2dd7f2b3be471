pub mod bridge;

pub use bridge::{DestinationBridge, SourceBridge};
