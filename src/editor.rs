// SPDX-FileCopyrightText: 2026 Rawgraph Authors
// SPDX-License-Identifier: LicenseRef-Rawgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Rawgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Controller tying a document to its history.
//!
//! Every user-level edit goes through here as a command, so everything a UI does can be
//! undone. Reading goes straight to [`Editor::document`].

use std::path::Path;

use smol_str::SmolStr;

use crate::backend::file::DEFAULT_THUMBNAIL_EDGE;
use crate::backend::{FileBackend, ResourceBackend};
use crate::commands::{
    AddConnectionCommand, AddNodeCommand, ChangeSettingCommand, CommandError, LoadImageCommand,
    MoveNodeCommand, RemoveConnectionCommand, RemoveNodeCommand,
};
use crate::history::{CommandStack, StepOutcome};
use crate::model::{Connection, GraphDocument, NodeId, NodeKind, Position, SettingValue};
use crate::store::{self, LoadReport, StoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorConfig {
    /// Maximum number of undoable steps; `None` keeps everything.
    pub history_limit: Option<usize>,
    /// Longest edge of thumbnails produced by [`FileBackend`].
    pub thumbnail_edge: u32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_limit: None,
            thumbnail_edge: DEFAULT_THUMBNAIL_EDGE,
        }
    }
}

#[derive(Debug)]
pub struct Editor {
    document: GraphDocument,
    history: CommandStack,
    config: EditorConfig,
}

impl Editor {
    /// An empty document backed by image files on disk.
    pub fn new(config: EditorConfig) -> Self {
        let backend = FileBackend::new().with_thumbnail_edge(config.thumbnail_edge);
        Self::with_document(GraphDocument::new(backend), config)
    }

    pub fn with_backend(backend: impl ResourceBackend + 'static, config: EditorConfig) -> Self {
        Self::with_document(GraphDocument::new(backend), config)
    }

    pub fn with_document(document: GraphDocument, config: EditorConfig) -> Self {
        Self {
            document,
            history: CommandStack::with_limit(config.history_limit),
            config,
        }
    }

    /// Opens a project with a [`FileBackend`] configured from `config`.
    pub fn open(path: &Path, config: EditorConfig) -> Result<(Self, LoadReport), StoreError> {
        let backend = FileBackend::new().with_thumbnail_edge(config.thumbnail_edge);
        Self::open_with_backend(path, backend, config)
    }

    pub fn open_with_backend(
        path: &Path,
        backend: impl ResourceBackend + 'static,
        config: EditorConfig,
    ) -> Result<(Self, LoadReport), StoreError> {
        let (document, report) = store::load_project(path, backend)?;
        Ok((Self::with_document(document, config), report))
    }

    /// Writes the document and marks the current history position as saved.
    pub fn save(&mut self, path: &Path) -> Result<(), StoreError> {
        store::save_project(&self.document, path)?;
        self.history.mark_clean();
        Ok(())
    }

    pub fn document(&self) -> &GraphDocument {
        &self.document
    }

    /// Direct access for listener registration and derived-data queries. Mutations made
    /// through this bypass the history.
    pub fn document_mut(&mut self) -> &mut GraphDocument {
        &mut self.document
    }

    pub fn history(&self) -> &CommandStack {
        &self.history
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn has_unsaved_changes(&self) -> bool {
        !self.history.is_clean()
    }

    pub fn add_node(
        &mut self,
        kind: NodeKind,
        position: Position,
    ) -> Result<(NodeId, StepOutcome), CommandError> {
        let command = AddNodeCommand::new(&mut self.document, kind, position);
        let node_id = command.node_id().clone();
        let outcome = self.history.push(&mut self.document, Box::new(command))?;
        Ok((node_id, outcome))
    }

    pub fn remove_node(&mut self, node_id: &NodeId) -> Result<StepOutcome, CommandError> {
        let command = RemoveNodeCommand::new(&self.document, node_id.clone())?;
        self.history.push(&mut self.document, Box::new(command))
    }

    pub fn update_node_setting(
        &mut self,
        node_id: &NodeId,
        key: impl Into<SmolStr>,
        value: SettingValue,
    ) -> Result<StepOutcome, CommandError> {
        let command = ChangeSettingCommand::new(&self.document, node_id.clone(), key, value)?;
        self.history.push(&mut self.document, Box::new(command))
    }

    pub fn move_node(
        &mut self,
        node_id: &NodeId,
        position: Position,
    ) -> Result<StepOutcome, CommandError> {
        let command = MoveNodeCommand::new(&self.document, node_id.clone(), position)?;
        self.history.push(&mut self.document, Box::new(command))
    }

    pub fn add_connection(&mut self, connection: Connection) -> Result<StepOutcome, CommandError> {
        let command = AddConnectionCommand::new(connection);
        self.history.push(&mut self.document, Box::new(command))
    }

    pub fn remove_connection(
        &mut self,
        connection: &Connection,
    ) -> Result<StepOutcome, CommandError> {
        let command = RemoveConnectionCommand::new(&self.document, connection.clone())?;
        self.history.push(&mut self.document, Box::new(command))
    }

    /// Loads `path` into a resource-owning node.
    ///
    /// The file is loaded before anything is recorded: if it cannot be read, the error is
    /// returned and neither the document nor the history changes. Paths that are not valid
    /// UTF-8 are refused up front, since redo reloads from the stored text.
    pub fn load_image(
        &mut self,
        node_id: &NodeId,
        path: impl AsRef<Path>,
    ) -> Result<StepOutcome, CommandError> {
        let path = path.as_ref();
        let text = path.to_str().ok_or_else(|| CommandError::NonUtf8Path {
            path: path.to_path_buf(),
        })?;
        let handle = self.document.acquire_resource(path)?;
        log::debug!("node {node_id}: pre-loaded {handle} for {path:?}");

        let command = match LoadImageCommand::new(
            &self.document,
            node_id.clone(),
            text,
            handle,
        ) {
            Ok(command) => command,
            Err(err) => {
                self.document.release_resource(handle);
                return Err(err);
            }
        };
        self.history.push(&mut self.document, Box::new(command))
    }

    pub fn undo(&mut self) -> Result<Option<StepOutcome>, CommandError> {
        self.history.undo(&mut self.document)
    }

    pub fn redo(&mut self) -> Result<Option<StepOutcome>, CommandError> {
        self.history.redo(&mut self.document)
    }
}
