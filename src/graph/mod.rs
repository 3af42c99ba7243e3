mod build;
mod error;
mod load;
mod model;
mod parse;

#[cfg(test)]
pub use build::parse_graph;
pub use load::{GraphSource, load_graph};
pub use model::{Graph, Node, NodeRole, RootPolicy};
