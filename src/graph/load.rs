use std::fmt;
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use log::info;

use super::build::parse_graph;
use super::model::Graph;

const DEMO_GRAPH: &str = include_str!("../../demos/sample_graph.json");

/// Where the graph document comes from. Inline sources are read once up front so a
/// reload does not depend on stdin still being open.
#[derive(Clone, Debug)]
pub enum GraphSource {
    File(PathBuf),
    Inline { name: String, raw: Arc<str> },
}

impl GraphSource {
    pub fn demo() -> Self {
        Self::Inline {
            name: "built-in demo".to_owned(),
            raw: Arc::from(DEMO_GRAPH),
        }
    }

    pub fn stdin() -> Result<Self> {
        let mut raw = String::new();
        std::io::stdin()
            .read_to_string(&mut raw)
            .context("failed to read graph from stdin")?;
        Ok(Self::Inline {
            name: "stdin".to_owned(),
            raw: Arc::from(raw),
        })
    }

    /// `None` selects the demo graph and `-` selects stdin.
    pub fn from_arg(path: Option<PathBuf>) -> Result<Self> {
        match path {
            None => Ok(Self::demo()),
            Some(path) if path.as_os_str() == "-" => Self::stdin(),
            Some(path) => Ok(Self::File(path)),
        }
    }
}

impl fmt::Display for GraphSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Inline { name, .. } => f.write_str(name),
        }
    }
}

pub fn load_graph(source: &GraphSource) -> Result<Graph> {
    let graph = match source {
        GraphSource::File(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            parse_graph(&raw)
        }
        GraphSource::Inline { raw, .. } => parse_graph(raw),
    }
    .with_context(|| format!("failed to build graph from {source}"))?;

    info!(
        "loaded graph from {source}: {} nodes, {} edges",
        graph.node_count(),
        graph.edge_count()
    );
    Ok(graph)
}
