// SPDX-FileCopyrightText: 2026 Rawgraph Authors
// SPDX-License-Identifier: LicenseRef-Rawgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Rawgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Persistence for graph documents on disk.
//!
//! A project is a single JSON file. Resource handles are runtime state and never reach the
//! file; loading a project re-acquires them from each node's `filepath`.

pub mod project_file;

pub use project_file::{load_project, save_project, LoadFailure, LoadReport, StoreError};
