// SPDX-FileCopyrightText: 2026 Rawgraph Authors
// SPDX-License-Identifier: LicenseRef-Rawgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Rawgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::{Command, CommandError, ExecContext};
use crate::model::{Connection, Displaced, DocumentError, GraphDocument};

/// Adds a connection. Edges pushed out of single-connection sockets come back on revert.
#[derive(Debug)]
pub struct AddConnectionCommand {
    connection: Connection,
    displaced: Displaced,
}

impl AddConnectionCommand {
    pub fn new(connection: Connection) -> Self {
        Self {
            connection,
            displaced: Displaced::new(),
        }
    }

    pub fn connection(&self) -> &Connection {
        &self.connection
    }
}

impl Command for AddConnectionCommand {
    fn label(&self) -> String {
        "Add Connection".to_owned()
    }

    fn apply(&mut self, ctx: &mut ExecContext<'_>) -> Result<(), CommandError> {
        self.displaced = ctx.doc.add_connection(self.connection.clone())?;
        Ok(())
    }

    fn revert(&mut self, ctx: &mut ExecContext<'_>) -> Result<(), CommandError> {
        ctx.doc.remove_connection(&self.connection)?;
        for old in std::mem::take(&mut self.displaced) {
            ctx.doc.add_connection(old)?;
        }
        Ok(())
    }
}

#[derive(Debug)]
pub struct RemoveConnectionCommand {
    connection: Connection,
}

impl RemoveConnectionCommand {
    pub fn new(doc: &GraphDocument, connection: Connection) -> Result<Self, CommandError> {
        if !doc.contains_connection(&connection) {
            return Err(DocumentError::ConnectionNotFound { connection }.into());
        }
        Ok(Self { connection })
    }
}

impl Command for RemoveConnectionCommand {
    fn label(&self) -> String {
        "Remove Connection".to_owned()
    }

    fn apply(&mut self, ctx: &mut ExecContext<'_>) -> Result<(), CommandError> {
        ctx.doc.remove_connection(&self.connection)?;
        Ok(())
    }

    fn revert(&mut self, ctx: &mut ExecContext<'_>) -> Result<(), CommandError> {
        ctx.doc.add_connection(self.connection.clone())?;
        Ok(())
    }
}
