// SPDX-FileCopyrightText: 2026 Rawgraph Authors
// SPDX-License-Identifier: LicenseRef-Rawgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Rawgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The canonical graph state.
//!
//! Every mutating method validates first and only then mutates, so a returned error means
//! nothing changed and no listener fired. The document knows nothing about undo; commands in
//! [`crate::commands`] build reversibility on top of these primitives.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use smallvec::SmallVec;
use smol_str::SmolStr;

use super::cache::DerivedCache;
use super::connection::Connection;
use super::events::{ChangeEvent, EventKind, Listeners, SubscriptionId};
use super::ids::NodeId;
use super::node::{Node, NodeKind, Position, SettingValue};
use super::socket::{Direction, SocketRef, SocketSpec, SocketType};
use crate::backend::{Metadata, ResourceBackend, ResourceError, ResourceHandle};

/// Version of the document structure, written into project files.
pub const DOCUMENT_VERSION: &str = "0.1.0";

/// Edges dropped from single-connection sockets by [`GraphDocument::add_connection`].
pub type Displaced = SmallVec<[Connection; 2]>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingRef {
    Node,
    Socket,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    DuplicateId {
        node_id: NodeId,
    },
    NotFound {
        node_id: NodeId,
    },
    ConnectionNotFound {
        connection: Connection,
    },
    InvalidReference {
        socket: SocketRef,
        missing: MissingRef,
    },
    TypeMismatch {
        connection: Connection,
        from_type: SocketType,
        to_type: SocketType,
    },
    DuplicateConnection {
        connection: Connection,
    },
    ReservedSetting {
        node_id: NodeId,
        key: SmolStr,
    },
}

impl fmt::Display for DocumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateId { node_id } => write!(f, "node id already exists (id={node_id})"),
            Self::NotFound { node_id } => write!(f, "node not found (id={node_id})"),
            Self::ConnectionNotFound { connection } => {
                write!(f, "connection not found ({connection})")
            }
            Self::InvalidReference { socket, missing } => match missing {
                MissingRef::Node => write!(f, "connection references missing node ({socket})"),
                MissingRef::Socket => {
                    write!(f, "connection references undeclared socket ({socket})")
                }
            },
            Self::TypeMismatch {
                connection,
                from_type,
                to_type,
            } => write!(
                f,
                "socket type mismatch ({connection}: {from_type} -> {to_type})"
            ),
            Self::DuplicateConnection { connection } => {
                write!(f, "connection already exists ({connection})")
            }
            Self::ReservedSetting { node_id, key } => {
                write!(f, "setting {key:?} on node {node_id} is managed by the document")
            }
        }
    }
}

impl std::error::Error for DocumentError {}

/// Handle-free view of the graph, used to compare document states.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentSnapshot {
    pub nodes: BTreeMap<NodeId, Node>,
    pub connections: BTreeSet<Connection>,
}

pub struct GraphDocument {
    version: String,
    nodes: BTreeMap<NodeId, Node>,
    connections: BTreeSet<Connection>,
    cache: DerivedCache,
    listeners: Listeners,
    backend: Box<dyn ResourceBackend>,
    issued_ids: HashSet<NodeId>,
    next_serial: u64,
}

impl fmt::Debug for GraphDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphDocument")
            .field("version", &self.version)
            .field("nodes", &self.nodes)
            .field("connections", &self.connections)
            .field("cache", &self.cache)
            .field("listeners", &self.listeners)
            .finish_non_exhaustive()
    }
}

impl GraphDocument {
    pub fn new(backend: impl ResourceBackend + 'static) -> Self {
        Self::with_boxed_backend(Box::new(backend))
    }

    pub fn with_boxed_backend(backend: Box<dyn ResourceBackend>) -> Self {
        Self {
            version: DOCUMENT_VERSION.to_owned(),
            nodes: BTreeMap::new(),
            connections: BTreeSet::new(),
            cache: DerivedCache::default(),
            listeners: Listeners::default(),
            backend,
            issued_ids: HashSet::new(),
            next_serial: 0,
        }
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub(crate) fn set_version(&mut self, version: impl Into<String>) {
        self.version = version.into();
    }

    pub fn nodes(&self) -> &BTreeMap<NodeId, Node> {
        &self.nodes
    }

    pub fn node(&self, node_id: &NodeId) -> Option<&Node> {
        self.nodes.get(node_id)
    }

    pub fn contains_node(&self, node_id: &NodeId) -> bool {
        self.nodes.contains_key(node_id)
    }

    pub fn connections(&self) -> &BTreeSet<Connection> {
        &self.connections
    }

    pub fn contains_connection(&self, connection: &Connection) -> bool {
        self.connections.contains(connection)
    }

    /// Active connections with `socket` as an endpoint.
    pub fn connections_at(&self, socket: &SocketRef) -> Vec<&Connection> {
        self.connections
            .iter()
            .filter(|conn| conn.has_endpoint(socket))
            .collect()
    }

    /// Every connection touching `node_id`, in either direction.
    pub fn incident_connections(&self, node_id: &NodeId) -> Vec<Connection> {
        self.connections
            .iter()
            .filter(|conn| conn.touches(node_id))
            .cloned()
            .collect()
    }

    /// Resolves a socket address to its declared spec.
    pub fn socket_spec(&self, socket: &SocketRef) -> Result<&'static SocketSpec, DocumentError> {
        let node = self
            .nodes
            .get(&socket.node_id)
            .ok_or_else(|| DocumentError::InvalidReference {
                socket: socket.clone(),
                missing: MissingRef::Node,
            })?;
        node.kind()
            .socket(&socket.socket_name, socket.direction)
            .ok_or_else(|| DocumentError::InvalidReference {
                socket: socket.clone(),
                missing: MissingRef::Socket,
            })
    }

    pub fn cache(&self) -> &DerivedCache {
        &self.cache
    }

    pub fn backend(&self) -> &dyn ResourceBackend {
        self.backend.as_ref()
    }

    pub fn snapshot(&self) -> DocumentSnapshot {
        DocumentSnapshot {
            nodes: self
                .nodes
                .iter()
                .map(|(id, node)| (id.clone(), node.without_handle()))
                .collect(),
            connections: self.connections.clone(),
        }
    }

    // Listeners.

    /// Registers `callback` for events of `kind`.
    pub fn subscribe(
        &mut self,
        kind: EventKind,
        callback: impl FnMut(&ChangeEvent) + 'static,
    ) -> SubscriptionId {
        self.listeners.subscribe(Some(kind), Box::new(callback))
    }

    pub fn subscribe_all(&mut self, callback: impl FnMut(&ChangeEvent) + 'static) -> SubscriptionId {
        self.listeners.subscribe(None, Box::new(callback))
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.unsubscribe(id)
    }

    fn emit(&mut self, event: ChangeEvent) {
        self.listeners.emit(&event);
    }

    // Nodes.

    /// Returns an id of the form `node_XXXXXXXX` that this document has never issued or seen.
    pub fn allocate_node_id(&mut self) -> NodeId {
        loop {
            self.next_serial = self.next_serial.wrapping_add(1);
            let candidate = format!("node_{:08x}", self.next_serial);
            if self.issued_ids.contains(candidate.as_str()) {
                continue;
            }
            if let Ok(node_id) = NodeId::new(candidate) {
                self.issued_ids.insert(node_id.clone());
                return node_id;
            }
        }
    }

    pub fn add_node(
        &mut self,
        node_id: NodeId,
        kind: NodeKind,
        position: Position,
    ) -> Result<(), DocumentError> {
        if self.nodes.contains_key(&node_id) {
            return Err(DocumentError::DuplicateId { node_id });
        }
        self.issued_ids.insert(node_id.clone());
        self.nodes.insert(node_id.clone(), Node::new(kind, position));
        self.emit(ChangeEvent::NodeAdded(node_id));
        Ok(())
    }

    /// Removes a node, its connections and its live handle (if any).
    ///
    /// Returns the removed node with its handle nulled out: the handle is gone once this
    /// returns and must not be reused.
    pub fn remove_node(&mut self, node_id: &NodeId) -> Result<Node, DocumentError> {
        if !self.nodes.contains_key(node_id) {
            return Err(DocumentError::NotFound {
                node_id: node_id.clone(),
            });
        }

        for connection in self.incident_connections(node_id) {
            self.connections.remove(&connection);
            self.emit(ChangeEvent::ConnectionRemoved(connection));
        }

        let handle = self.nodes.get(node_id).and_then(Node::resource_handle);
        if let Some(handle) = handle {
            self.release_resource(handle);
        }

        let node = self
            .nodes
            .remove(node_id)
            .map(|node| node.without_handle())
            .ok_or_else(|| DocumentError::NotFound {
                node_id: node_id.clone(),
            })?;
        self.emit(ChangeEvent::NodeRemoved(node_id.clone()));
        Ok(node)
    }

    pub fn update_setting(
        &mut self,
        node_id: &NodeId,
        key: impl Into<SmolStr>,
        value: SettingValue,
    ) -> Result<(), DocumentError> {
        let node = self.node_mut(node_id)?;
        let key = key.into();
        node.settings_mut().insert(key.clone(), value.clone());
        self.emit(ChangeEvent::SettingChanged {
            node_id: node_id.clone(),
            key,
            value: Some(value),
        });
        Ok(())
    }

    /// Deletes `key` from the node's settings, returning the previous value.
    ///
    /// Notifies only when the key was present.
    pub fn remove_setting(
        &mut self,
        node_id: &NodeId,
        key: &str,
    ) -> Result<Option<SettingValue>, DocumentError> {
        let node = self.node_mut(node_id)?;
        let previous = node.settings_mut().remove(key);
        if previous.is_some() {
            self.emit(ChangeEvent::SettingChanged {
                node_id: node_id.clone(),
                key: SmolStr::new(key),
                value: None,
            });
        }
        Ok(previous)
    }

    pub fn update_position(
        &mut self,
        node_id: &NodeId,
        position: Position,
    ) -> Result<(), DocumentError> {
        self.node_mut(node_id)?.set_position(position);
        self.emit(ChangeEvent::PositionChanged {
            node_id: node_id.clone(),
            position,
        });
        Ok(())
    }

    fn node_mut(&mut self, node_id: &NodeId) -> Result<&mut Node, DocumentError> {
        self.nodes
            .get_mut(node_id)
            .ok_or_else(|| DocumentError::NotFound {
                node_id: node_id.clone(),
            })
    }

    // Connections.

    /// Adds `connection`, first dropping any edge occupying one of its single-connection
    /// endpoints. The dropped edges are returned in removal order.
    pub fn add_connection(&mut self, connection: Connection) -> Result<Displaced, DocumentError> {
        let source = connection.source();
        let target = connection.target();
        for socket in [&source, &target] {
            if !self.nodes.contains_key(&socket.node_id) {
                return Err(DocumentError::InvalidReference {
                    socket: socket.clone(),
                    missing: MissingRef::Node,
                });
            }
        }
        let from_spec = self.socket_spec(&source)?;
        let to_spec = self.socket_spec(&target)?;
        debug_assert_eq!(from_spec.direction, Direction::Out);
        debug_assert_eq!(to_spec.direction, Direction::In);

        if from_spec.socket_type != to_spec.socket_type {
            return Err(DocumentError::TypeMismatch {
                connection,
                from_type: from_spec.socket_type,
                to_type: to_spec.socket_type,
            });
        }
        if self.connections.contains(&connection) {
            return Err(DocumentError::DuplicateConnection { connection });
        }

        let mut displaced = Displaced::new();
        for (spec, socket) in [(to_spec, &target), (from_spec, &source)] {
            if !spec.is_single() {
                continue;
            }
            for existing in self.connections.iter().filter(|c| c.has_endpoint(socket)) {
                if !displaced.contains(existing) {
                    displaced.push(existing.clone());
                }
            }
        }

        for old in &displaced {
            self.connections.remove(old);
            log::debug!("{old} displaced by {connection}");
            self.emit(ChangeEvent::ConnectionRemoved(old.clone()));
        }
        self.connections.insert(connection.clone());
        self.emit(ChangeEvent::ConnectionAdded(connection));
        Ok(displaced)
    }

    pub fn remove_connection(&mut self, connection: &Connection) -> Result<(), DocumentError> {
        if !self.connections.remove(connection) {
            return Err(DocumentError::ConnectionNotFound {
                connection: connection.clone(),
            });
        }
        self.emit(ChangeEvent::ConnectionRemoved(connection.clone()));
        Ok(())
    }

    // Resources.

    pub fn acquire_resource(&mut self, path: &Path) -> Result<ResourceHandle, ResourceError> {
        self.backend.load(path)
    }

    /// Releases `handle` through the backend and drops everything cached for it.
    pub fn release_resource(&mut self, handle: ResourceHandle) {
        self.backend.release(handle);
        if self.cache.purge(handle) {
            log::debug!("purged cached data for {handle}");
        }
    }

    /// Thumbnail for a live handle, fetched from the backend once and then cached.
    pub fn thumbnail(&mut self, handle: ResourceHandle) -> Result<Arc<[u8]>, ResourceError> {
        if let Some(thumb) = self.cache.get(handle).and_then(|data| data.thumbnail.clone()) {
            return Ok(thumb);
        }
        let thumb: Arc<[u8]> = self.backend.thumbnail(handle)?.into();
        self.cache.entry(handle).thumbnail = Some(Arc::clone(&thumb));
        Ok(thumb)
    }

    pub fn metadata(&mut self, handle: ResourceHandle) -> Result<Arc<Metadata>, ResourceError> {
        if let Some(meta) = self.cache.get(handle).and_then(|data| data.metadata.clone()) {
            return Ok(meta);
        }
        let meta = Arc::new(self.backend.metadata(handle)?);
        self.cache.entry(handle).metadata = Some(Arc::clone(&meta));
        Ok(meta)
    }
}
