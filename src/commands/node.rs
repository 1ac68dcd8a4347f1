// SPDX-FileCopyrightText: 2026 Rawgraph Authors
// SPDX-License-Identifier: LicenseRef-Rawgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Rawgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::{Command, CommandError, ExecContext, ReloadPhase};
use crate::model::{
    Connection, DocumentError, GraphDocument, MissingRef, Node, NodeId, NodeKind, Position,
    SettingValue, RESOURCE_HANDLE_KEY,
};

/// Adds a node. The id is allocated at construction so every redo recreates the same id.
#[derive(Debug)]
pub struct AddNodeCommand {
    node_id: NodeId,
    kind: NodeKind,
    position: Position,
}

impl AddNodeCommand {
    pub fn new(doc: &mut GraphDocument, kind: NodeKind, position: Position) -> Self {
        Self {
            node_id: doc.allocate_node_id(),
            kind,
            position,
        }
    }

    pub fn node_id(&self) -> &NodeId {
        &self.node_id
    }
}

impl Command for AddNodeCommand {
    fn label(&self) -> String {
        format!("Add {} Node", self.kind)
    }

    fn apply(&mut self, ctx: &mut ExecContext<'_>) -> Result<(), CommandError> {
        ctx.doc
            .add_node(self.node_id.clone(), self.kind, self.position)?;
        Ok(())
    }

    fn revert(&mut self, ctx: &mut ExecContext<'_>) -> Result<(), CommandError> {
        ctx.doc.remove_node(&self.node_id)?;
        Ok(())
    }
}

/// Removes a node together with its connections.
///
/// The snapshot taken at construction never carries a handle: the document releases the
/// live handle on removal, and `revert` acquires a fresh one from the node's `filepath`.
#[derive(Debug)]
pub struct RemoveNodeCommand {
    node_id: NodeId,
    node: Node,
    connections: Vec<Connection>,
}

impl RemoveNodeCommand {
    pub fn new(doc: &GraphDocument, node_id: NodeId) -> Result<Self, CommandError> {
        let node = doc
            .node(&node_id)
            .ok_or_else(|| DocumentError::NotFound {
                node_id: node_id.clone(),
            })?
            .without_handle();
        let connections = doc.incident_connections(&node_id);
        Ok(Self {
            node_id,
            node,
            connections,
        })
    }

    pub fn node_id(&self) -> &NodeId {
        &self.node_id
    }

    fn check_restorable(&self, doc: &GraphDocument) -> Result<(), CommandError> {
        if doc.contains_node(&self.node_id) {
            return Err(DocumentError::DuplicateId {
                node_id: self.node_id.clone(),
            }
            .into());
        }
        for connection in &self.connections {
            for socket in [connection.source(), connection.target()] {
                if socket.node_id != self.node_id && !doc.contains_node(&socket.node_id) {
                    return Err(DocumentError::InvalidReference {
                        socket,
                        missing: MissingRef::Node,
                    }
                    .into());
                }
            }
        }
        Ok(())
    }
}

impl Command for RemoveNodeCommand {
    fn label(&self) -> String {
        "Remove Node".to_owned()
    }

    fn apply(&mut self, ctx: &mut ExecContext<'_>) -> Result<(), CommandError> {
        ctx.doc.remove_node(&self.node_id)?;
        Ok(())
    }

    fn revert(&mut self, ctx: &mut ExecContext<'_>) -> Result<(), CommandError> {
        self.check_restorable(ctx.doc)?;

        ctx.doc
            .add_node(self.node_id.clone(), self.node.kind(), self.node.position())?;
        for (key, value) in self.node.settings() {
            ctx.doc
                .update_setting(&self.node_id, key.clone(), value.clone())?;
        }

        if self.node.kind().owns_resource() {
            if let Some(path) = self.node.filepath() {
                let handle = ctx.reacquire(&self.node_id, path, ReloadPhase::Restore);
                let value = handle.map_or(SettingValue::Null, SettingValue::Handle);
                ctx.doc
                    .update_setting(&self.node_id, RESOURCE_HANDLE_KEY, value)?;
            }
        }

        for connection in &self.connections {
            let displaced = ctx.doc.add_connection(connection.clone())?;
            debug_assert!(displaced.is_empty(), "restored edge displaced {displaced:?}");
        }
        Ok(())
    }
}
