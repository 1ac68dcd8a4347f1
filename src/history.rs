// SPDX-FileCopyrightText: 2026 Rawgraph Authors
// SPDX-License-Identifier: LicenseRef-Rawgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Rawgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Linear undo/redo history.
//!
//! Commands before the cursor are applied; commands at or after it are redoable. Pushing
//! discards the redo tail. An optional limit drops the oldest applied commands.

use std::collections::VecDeque;
use std::fmt;

use crate::commands::{Command, CommandError, ExecContext, ResourceWarning};
use crate::model::GraphDocument;

/// What one committed push, undo or redo did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutcome {
    pub label: String,
    pub warnings: Vec<ResourceWarning>,
}

impl StepOutcome {
    pub fn is_degraded(&self) -> bool {
        !self.warnings.is_empty()
    }
}

#[derive(Default)]
pub struct CommandStack {
    commands: VecDeque<Box<dyn Command>>,
    cursor: usize,
    limit: Option<usize>,
    // Cursor value at which the document matched its saved state; `None` once unreachable.
    clean: Option<usize>,
}

impl fmt::Debug for CommandStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandStack")
            .field("len", &self.commands.len())
            .field("cursor", &self.cursor)
            .field("limit", &self.limit)
            .field("clean", &self.clean)
            .finish()
    }
}

impl CommandStack {
    pub fn new() -> Self {
        Self::with_limit(None)
    }

    pub fn with_limit(limit: Option<usize>) -> Self {
        Self {
            commands: VecDeque::new(),
            cursor: 0,
            limit,
            clean: Some(0),
        }
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor < self.commands.len()
    }

    pub fn undo_label(&self) -> Option<String> {
        self.cursor
            .checked_sub(1)
            .and_then(|index| self.commands.get(index))
            .map(|command| command.label())
    }

    pub fn redo_label(&self) -> Option<String> {
        self.commands.get(self.cursor).map(|command| command.label())
    }

    /// Applies `command` and records it. A failed apply records nothing.
    pub fn push(
        &mut self,
        doc: &mut GraphDocument,
        mut command: Box<dyn Command>,
    ) -> Result<StepOutcome, CommandError> {
        let mut ctx = ExecContext::new(doc);
        command.apply(&mut ctx)?;
        let outcome = StepOutcome {
            label: command.label(),
            warnings: ctx.into_warnings(),
        };

        if self.can_redo() {
            log::debug!(
                "discarding {} redoable command(s)",
                self.commands.len() - self.cursor
            );
            self.commands.truncate(self.cursor);
            if self.clean.is_some_and(|clean| clean > self.cursor) {
                self.clean = None;
            }
        }
        self.commands.push_back(command);
        self.cursor += 1;

        if let Some(limit) = self.limit {
            while self.commands.len() > limit {
                self.commands.pop_front();
                self.cursor -= 1;
                self.clean = self.clean.and_then(|clean| clean.checked_sub(1));
            }
        }
        Ok(outcome)
    }

    /// Reverts the last applied command. `Ok(None)` when there is nothing to undo.
    pub fn undo(&mut self, doc: &mut GraphDocument) -> Result<Option<StepOutcome>, CommandError> {
        let Some(index) = self.cursor.checked_sub(1) else {
            return Ok(None);
        };
        let Some(command) = self.commands.get_mut(index) else {
            return Ok(None);
        };
        let mut ctx = ExecContext::new(doc);
        command.revert(&mut ctx)?;
        self.cursor = index;
        Ok(Some(StepOutcome {
            label: command.label(),
            warnings: ctx.into_warnings(),
        }))
    }

    /// Re-applies the command at the cursor. `Ok(None)` when there is nothing to redo.
    pub fn redo(&mut self, doc: &mut GraphDocument) -> Result<Option<StepOutcome>, CommandError> {
        let Some(command) = self.commands.get_mut(self.cursor) else {
            return Ok(None);
        };
        let mut ctx = ExecContext::new(doc);
        command.apply(&mut ctx)?;
        self.cursor += 1;
        Ok(Some(StepOutcome {
            label: command.label(),
            warnings: ctx.into_warnings(),
        }))
    }

    /// Forgets every command. The document itself is left as it is.
    pub fn clear(&mut self) {
        self.clean = if self.is_clean() { Some(0) } else { None };
        self.commands.clear();
        self.cursor = 0;
    }

    pub fn mark_clean(&mut self) {
        self.clean = Some(self.cursor);
    }

    pub fn is_clean(&self) -> bool {
        self.clean == Some(self.cursor)
    }
}
