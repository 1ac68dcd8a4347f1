// SPDX-FileCopyrightText: 2026 Rawgraph Authors
// SPDX-License-Identifier: LicenseRef-Rawgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Rawgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::ids::NodeId;
use super::socket::SocketRef;

/// A directed edge from an output socket to an input socket.
///
/// Serialized as the 4-tuple `[from_node, from_socket, to_node, to_socket]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "(NodeId, String, NodeId, String)", into = "(NodeId, String, NodeId, String)")]
pub struct Connection {
    pub from_node: NodeId,
    pub from_socket: String,
    pub to_node: NodeId,
    pub to_socket: String,
}

impl Connection {
    pub fn new(
        from_node: NodeId,
        from_socket: impl Into<String>,
        to_node: NodeId,
        to_socket: impl Into<String>,
    ) -> Self {
        Self {
            from_node,
            from_socket: from_socket.into(),
            to_node,
            to_socket: to_socket.into(),
        }
    }

    pub fn source(&self) -> SocketRef {
        SocketRef::output(self.from_node.clone(), self.from_socket.clone())
    }

    pub fn target(&self) -> SocketRef {
        SocketRef::input(self.to_node.clone(), self.to_socket.clone())
    }

    pub fn touches(&self, node_id: &NodeId) -> bool {
        &self.from_node == node_id || &self.to_node == node_id
    }

    /// Whether `socket` is one of this connection's endpoints.
    pub fn has_endpoint(&self, socket: &SocketRef) -> bool {
        match socket.direction {
            super::socket::Direction::Out => {
                self.from_node == socket.node_id && self.from_socket == socket.socket_name
            }
            super::socket::Direction::In => {
                self.to_node == socket.node_id && self.to_socket == socket.socket_name
            }
        }
    }
}

impl From<(NodeId, String, NodeId, String)> for Connection {
    fn from((from_node, from_socket, to_node, to_socket): (NodeId, String, NodeId, String)) -> Self {
        Self {
            from_node,
            from_socket,
            to_node,
            to_socket,
        }
    }
}

impl From<Connection> for (NodeId, String, NodeId, String) {
    fn from(connection: Connection) -> Self {
        (
            connection.from_node,
            connection.from_socket,
            connection.to_node,
            connection.to_socket,
        )
    }
}

impl fmt::Display for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{} -> {}.{}",
            self.from_node, self.from_socket, self.to_node, self.to_socket
        )
    }
}
