//! Network model data structures.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use crate::error::{ModelError, ModelResult};
use crate::inp;

/// What a node is in the hydraulic model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Junction,
    Reservoir,
    Tank,
}

/// What a link is in the hydraulic model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    Pipe,
    Pump,
    Valve,
}

impl fmt::Display for LinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LinkKind::Pipe => "pipe",
            LinkKind::Pump => "pump",
            LinkKind::Valve => "valve",
        })
    }
}

/// Initial open/closed state of a link at simulation start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStatus {
    Open,
    Closed,
}

impl fmt::Display for LinkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LinkStatus::Open => "Open",
            LinkStatus::Closed => "Closed",
        })
    }
}

/// A point in the network with a modeled pressure.
#[derive(Debug, Clone)]
pub struct Node {
    pub id: String,
    pub kind: NodeKind,
    /// Map position, when the source document carries one.
    pub coordinates: Option<(f64, f64)>,
}

/// A connecting element between two nodes.
#[derive(Debug, Clone)]
pub struct Link {
    pub id: String,
    pub kind: LinkKind,
    pub from_node: String,
    pub to_node: String,
    pub initial_status: LinkStatus,
    /// Status as read from the source document, kept so re-emission only
    /// writes overrides that actually differ.
    pub(crate) source_status: LinkStatus,
}

/// A water-distribution network model backed by its original INP text.
///
/// Topology is read-only; the only mutation offered is a link's initial
/// open/closed status, which [`NetworkModel::to_inp`] merges back into the
/// document as a `[STATUS]` override.
#[derive(Debug, Clone)]
pub struct NetworkModel {
    pub(crate) source: String,
    pub(crate) nodes: Vec<Node>,
    pub(crate) links: Vec<Link>,
}

impl NetworkModel {
    /// Parse an INP document held in memory.
    pub fn parse(text: &str) -> ModelResult<Self> {
        inp::parse(text)
    }

    /// Read and parse an INP file.
    pub fn from_file(path: &Path) -> ModelResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let model = Self::parse(&text)?;
        tracing::debug!(
            path = %path.display(),
            nodes = model.nodes.len(),
            links = model.links.len(),
            "loaded network model"
        );
        Ok(model)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn node_ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.nodes.iter().map(|n| n.id.as_str())
    }

    pub fn link_ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.links.iter().map(|l| l.id.as_str())
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn link(&self, id: &str) -> Option<&Link> {
        self.links.iter().find(|l| l.id == id)
    }

    pub fn has_link(&self, id: &str) -> bool {
        self.link(id).is_some()
    }

    pub fn coordinates(&self, node_id: &str) -> Option<(f64, f64)> {
        self.node(node_id).and_then(|n| n.coordinates)
    }

    /// Coordinate lookup for the spatial join, node id → (x, y). Nodes
    /// without map data are simply absent.
    pub fn coordinate_map(&self) -> BTreeMap<String, (f64, f64)> {
        self.nodes
            .iter()
            .filter_map(|n| n.coordinates.map(|xy| (n.id.clone(), xy)))
            .collect()
    }

    /// Change a link's initial status. Fails with [`ModelError::LinkNotFound`]
    /// when the id is absent, so callers can validate before running any
    /// simulation.
    pub fn set_initial_status(&mut self, link_id: &str, status: LinkStatus) -> ModelResult<()> {
        let link = self
            .links
            .iter_mut()
            .find(|l| l.id == link_id)
            .ok_or_else(|| ModelError::LinkNotFound {
                id: link_id.to_string(),
            })?;
        link.initial_status = status;
        Ok(())
    }

    /// Re-emit the INP document with current link statuses merged in.
    pub fn to_inp(&self) -> String {
        inp::render(self)
    }
}
