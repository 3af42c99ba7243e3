use serde::Deserialize;

use super::error::GraphError;

/// One adjacency-list entry as it appears in the input document.
///
/// Parent lists are tolerated but never read; edges come from `children` only.
#[derive(Clone, Debug, Default, Deserialize)]
pub(super) struct RawRecord {
    #[serde(default, alias = "uuid")]
    pub(super) id: Option<String>,
    #[serde(default)]
    pub(super) children: Vec<String>,
    #[serde(default)]
    pub(super) metadata: Option<RawMetadata>,
    #[serde(default)]
    pub(super) operation: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub(super) struct RawMetadata {
    #[serde(default)]
    pub(super) label: Option<String>,
}

impl RawRecord {
    pub(super) fn metadata_label(&self) -> Option<&str> {
        self.metadata
            .as_ref()
            .and_then(|metadata| metadata.label.as_deref())
            .or(self.operation.as_deref())
    }
}

pub(super) fn parse_records(raw: &str) -> Result<Vec<RawRecord>, GraphError> {
    Ok(serde_json::from_str(raw)?)
}
