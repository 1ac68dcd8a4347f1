// SPDX-FileCopyrightText: 2026 Rawgraph Authors
// SPDX-License-Identifier: LicenseRef-Rawgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Rawgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::{require_node, Command, CommandError, ExecContext, ReloadPhase};
use crate::backend::ResourceHandle;
use crate::model::{
    DocumentError, GraphDocument, NodeId, SettingValue, FILEPATH_KEY, RESOURCE_HANDLE_KEY,
};

/// Points a resource-owning node at a new file.
///
/// The caller loads `new_path` before building the command, so the first apply cannot fail
/// on the backend. Every later apply or revert releases whatever handle the node holds at
/// that moment and acquires a fresh one; a failed reload leaves the node without a handle
/// and records a warning.
#[derive(Debug)]
pub struct LoadImageCommand {
    node_id: NodeId,
    new_path: String,
    pending: Option<ResourceHandle>,
    old_path: Option<String>,
}

impl LoadImageCommand {
    pub fn new(
        doc: &GraphDocument,
        node_id: NodeId,
        new_path: impl Into<String>,
        pre_validated: ResourceHandle,
    ) -> Result<Self, CommandError> {
        let node = doc.node(&node_id).ok_or_else(|| DocumentError::NotFound {
            node_id: node_id.clone(),
        })?;
        if !node.kind().owns_resource() {
            return Err(CommandError::NotResourceOwner {
                kind: node.kind(),
                node_id,
            });
        }
        let old_path = node.filepath().map(str::to_owned);
        Ok(Self {
            node_id,
            new_path: new_path.into(),
            pending: Some(pre_validated),
            old_path,
        })
    }

    pub fn node_id(&self) -> &NodeId {
        &self.node_id
    }

    pub fn new_path(&self) -> &str {
        &self.new_path
    }

    fn release_current(&self, ctx: &mut ExecContext<'_>) {
        let current = ctx.doc.node(&self.node_id).and_then(|node| node.resource_handle());
        if let Some(handle) = current {
            ctx.doc.release_resource(handle);
        }
    }

    fn write(
        &self,
        ctx: &mut ExecContext<'_>,
        path: Option<&str>,
        handle: Option<ResourceHandle>,
    ) -> Result<(), CommandError> {
        let path = path.map_or(SettingValue::Null, SettingValue::from);
        let handle = handle.map_or(SettingValue::Null, SettingValue::Handle);
        ctx.doc.update_setting(&self.node_id, FILEPATH_KEY, path)?;
        ctx.doc
            .update_setting(&self.node_id, RESOURCE_HANDLE_KEY, handle)?;
        Ok(())
    }
}

impl Command for LoadImageCommand {
    fn label(&self) -> String {
        "Load Image".to_owned()
    }

    fn apply(&mut self, ctx: &mut ExecContext<'_>) -> Result<(), CommandError> {
        if let Err(err) = require_node(ctx.doc, &self.node_id) {
            // A rejected first apply is never recorded, so nothing else will free this.
            if let Some(handle) = self.pending.take() {
                ctx.doc.release_resource(handle);
            }
            return Err(err);
        }
        self.release_current(ctx);

        let handle = match self.pending.take() {
            Some(handle) => Some(handle),
            None => ctx.reacquire(&self.node_id, &self.new_path, ReloadPhase::Redo),
        };
        self.write(ctx, Some(&self.new_path), handle)
    }

    fn revert(&mut self, ctx: &mut ExecContext<'_>) -> Result<(), CommandError> {
        require_node(ctx.doc, &self.node_id)?;
        self.release_current(ctx);

        let mut handle = None;
        if let Some(path) = self.old_path.clone() {
            handle = ctx.reacquire(&self.node_id, &path, ReloadPhase::Undo);
            if handle.is_none() {
                self.old_path = None;
            }
        }
        self.write(ctx, self.old_path.as_deref(), handle)
    }
}
