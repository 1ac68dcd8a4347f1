// SPDX-FileCopyrightText: 2026 Rawgraph Authors
// SPDX-License-Identifier: LicenseRef-Rawgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Rawgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Rawgraph: the transactional node-graph document behind a raw photo editor.
//!
//! [`model::GraphDocument`] owns nodes, typed socket connections and the runtime handles of
//! loaded files. Edits are [`commands::Command`]s recorded on a [`history::CommandStack`];
//! [`editor::Editor`] wires the two together and [`store`] persists projects as JSON.

pub mod backend;
pub mod commands;
pub mod editor;
pub mod history;
pub mod model;
pub mod store;

#[cfg(test)]
pub(crate) mod test_support;
