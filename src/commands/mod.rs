// SPDX-FileCopyrightText: 2026 Rawgraph Authors
// SPDX-License-Identifier: LicenseRef-Rawgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Rawgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Reversible document mutations.
//!
//! A command captures, at construction, everything it needs to undo itself, then mutates the
//! document only through the document's public setters. `apply` and `revert` either commit
//! the whole step or fail before the first mutation.
//!
//! Resource failures during re-execution never fail a step: the affected node is degraded
//! to "no handle" and a [`ResourceWarning`] is recorded on the [`ExecContext`] instead.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::backend::{ResourceError, ResourceHandle};
use crate::model::{DocumentError, GraphDocument, NodeId, NodeKind};

mod connection;
mod node;
mod resource;
mod scalar;

pub use connection::{AddConnectionCommand, RemoveConnectionCommand};
pub use node::{AddNodeCommand, RemoveNodeCommand};
pub use resource::LoadImageCommand;
pub use scalar::{ChangeSettingCommand, MoveNodeCommand};

pub trait Command: fmt::Debug {
    /// Short user-facing description, e.g. for an "Undo Move Node" menu entry.
    fn label(&self) -> String;

    fn apply(&mut self, ctx: &mut ExecContext<'_>) -> Result<(), CommandError>;

    fn revert(&mut self, ctx: &mut ExecContext<'_>) -> Result<(), CommandError>;
}

/// Where a degraded reload happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadPhase {
    /// Re-loading the new file while redoing a load.
    Redo,
    /// Re-loading the previous file while undoing a load.
    Undo,
    /// Re-acquiring the file of a node brought back by undoing its removal.
    Restore,
}

impl fmt::Display for ReloadPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Redo => f.write_str("redo"),
            Self::Undo => f.write_str("undo"),
            Self::Restore => f.write_str("restore"),
        }
    }
}

/// Non-fatal resource failure surfaced by a step that still committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceWarning {
    pub node_id: NodeId,
    pub path: PathBuf,
    pub phase: ReloadPhase,
    pub error: ResourceError,
}

impl fmt::Display for ResourceWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "node {} left without a loaded file during {} ({:?}): {}",
            self.node_id, self.phase, self.path, self.error
        )
    }
}

/// Document access plus the warning sink for one apply/revert step.
#[derive(Debug)]
pub struct ExecContext<'a> {
    pub doc: &'a mut GraphDocument,
    warnings: Vec<ResourceWarning>,
}

impl<'a> ExecContext<'a> {
    pub fn new(doc: &'a mut GraphDocument) -> Self {
        Self {
            doc,
            warnings: Vec::new(),
        }
    }

    pub fn warn(&mut self, warning: ResourceWarning) {
        log::warn!("{warning}");
        self.warnings.push(warning);
    }

    pub fn warnings(&self) -> &[ResourceWarning] {
        &self.warnings
    }

    pub fn into_warnings(self) -> Vec<ResourceWarning> {
        self.warnings
    }

    /// Loads `path` for `node_id`, turning a failure into a warning and `None`.
    pub(crate) fn reacquire(
        &mut self,
        node_id: &NodeId,
        path: &str,
        phase: ReloadPhase,
    ) -> Option<ResourceHandle> {
        match self.doc.acquire_resource(Path::new(path)) {
            Ok(handle) => Some(handle),
            Err(error) => {
                self.warn(ResourceWarning {
                    node_id: node_id.clone(),
                    path: PathBuf::from(path),
                    phase,
                    error,
                });
                None
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    Document(DocumentError),
    Resource(ResourceError),
    NotResourceOwner { node_id: NodeId, kind: NodeKind },
    /// File paths are stored as text settings, so they must be valid UTF-8.
    NonUtf8Path { path: PathBuf },
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Document(err) => write!(f, "{err}"),
            Self::Resource(err) => write!(f, "{err}"),
            Self::NotResourceOwner { node_id, kind } => {
                write!(f, "node {node_id} ({kind}) does not load files")
            }
            Self::NonUtf8Path { path } => write!(f, "path {path:?} is not valid UTF-8"),
        }
    }
}

impl std::error::Error for CommandError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Document(err) => Some(err),
            Self::Resource(err) => Some(err),
            Self::NotResourceOwner { .. } | Self::NonUtf8Path { .. } => None,
        }
    }
}

impl From<DocumentError> for CommandError {
    fn from(err: DocumentError) -> Self {
        Self::Document(err)
    }
}

impl From<ResourceError> for CommandError {
    fn from(err: ResourceError) -> Self {
        Self::Resource(err)
    }
}

pub(crate) fn require_node(doc: &GraphDocument, node_id: &NodeId) -> Result<(), CommandError> {
    if doc.contains_node(node_id) {
        Ok(())
    } else {
        Err(DocumentError::NotFound {
            node_id: node_id.clone(),
        }
        .into())
    }
}

#[cfg(test)]
mod tests;
