// SPDX-FileCopyrightText: 2026 Rawgraph Authors
// SPDX-License-Identifier: LicenseRef-Rawgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Rawgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use smol_str::SmolStr;

use super::{Command, CommandError, ExecContext};
use crate::model::{
    DocumentError, GraphDocument, NodeId, Position, SettingValue, FILEPATH_KEY,
    RESOURCE_HANDLE_KEY,
};

#[derive(Debug)]
pub struct MoveNodeCommand {
    node_id: NodeId,
    from: Position,
    to: Position,
}

impl MoveNodeCommand {
    pub fn new(doc: &GraphDocument, node_id: NodeId, to: Position) -> Result<Self, CommandError> {
        let from = doc
            .node(&node_id)
            .ok_or_else(|| DocumentError::NotFound {
                node_id: node_id.clone(),
            })?
            .position();
        Ok(Self { node_id, from, to })
    }
}

impl Command for MoveNodeCommand {
    fn label(&self) -> String {
        "Move Node".to_owned()
    }

    fn apply(&mut self, ctx: &mut ExecContext<'_>) -> Result<(), CommandError> {
        ctx.doc.update_position(&self.node_id, self.to)?;
        Ok(())
    }

    fn revert(&mut self, ctx: &mut ExecContext<'_>) -> Result<(), CommandError> {
        ctx.doc.update_position(&self.node_id, self.from)?;
        Ok(())
    }
}

/// Sets one plain setting.
///
/// The handle key is never writable this way, and neither is `filepath` on nodes that own a
/// resource: those two travel together through [`super::LoadImageCommand`].
#[derive(Debug)]
pub struct ChangeSettingCommand {
    node_id: NodeId,
    key: SmolStr,
    old: Option<SettingValue>,
    new: SettingValue,
}

impl ChangeSettingCommand {
    pub fn new(
        doc: &GraphDocument,
        node_id: NodeId,
        key: impl Into<SmolStr>,
        value: SettingValue,
    ) -> Result<Self, CommandError> {
        let key = key.into();
        let node = doc.node(&node_id).ok_or_else(|| DocumentError::NotFound {
            node_id: node_id.clone(),
        })?;

        let reserved = key == RESOURCE_HANDLE_KEY
            || matches!(value, SettingValue::Handle(_))
            || (key == FILEPATH_KEY && node.kind().owns_resource());
        if reserved {
            return Err(DocumentError::ReservedSetting { node_id, key }.into());
        }

        let old = node.setting(&key).cloned();
        Ok(Self {
            node_id,
            key,
            old,
            new: value,
        })
    }
}

impl Command for ChangeSettingCommand {
    fn label(&self) -> String {
        format!("Change {}", self.key)
    }

    fn apply(&mut self, ctx: &mut ExecContext<'_>) -> Result<(), CommandError> {
        ctx.doc
            .update_setting(&self.node_id, self.key.clone(), self.new.clone())?;
        Ok(())
    }

    fn revert(&mut self, ctx: &mut ExecContext<'_>) -> Result<(), CommandError> {
        match &self.old {
            Some(old) => ctx
                .doc
                .update_setting(&self.node_id, self.key.clone(), old.clone())?,
            None => {
                ctx.doc.remove_setting(&self.node_id, &self.key)?;
            }
        }
        Ok(())
    }
}
