mod config_node;
#[cfg(test)]
mod tests;

pub use config_node::{ConfigNode, NodeValue, PersistenceFormatError};
