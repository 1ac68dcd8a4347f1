// SPDX-FileCopyrightText: 2026 Rawgraph Authors
// SPDX-License-Identifier: LicenseRef-Rawgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Rawgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Resource backend seam.
//!
//! The document never decodes files itself. It asks a [`ResourceBackend`] for an opaque
//! [`ResourceHandle`] and hands that handle back when the owning node lets go of it. Handles
//! are single-use: once released, the same value must never be released or queried again.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

pub mod file;
#[cfg(test)]
pub(crate) mod recording;

pub use file::FileBackend;

/// Opaque backend-issued identifier for a decoded resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceHandle(u64);

impl ResourceHandle {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for ResourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "h{}", self.0)
    }
}

pub type Metadata = BTreeMap<String, String>;

pub trait ResourceBackend {
    fn load(&mut self, path: &Path) -> Result<ResourceHandle, ResourceError>;

    /// Releases a live handle. Calling this twice for the same handle is a caller bug.
    fn release(&mut self, handle: ResourceHandle);

    fn thumbnail(&self, handle: ResourceHandle) -> Result<Vec<u8>, ResourceError>;

    fn metadata(&self, handle: ResourceHandle) -> Result<Metadata, ResourceError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceError {
    Load { path: PathBuf, reason: String },
    Decode { handle: ResourceHandle, reason: String },
    UnknownHandle { handle: ResourceHandle },
}

impl ResourceError {
    pub fn load(path: impl Into<PathBuf>, reason: impl fmt::Display) -> Self {
        Self::Load {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn decode(handle: ResourceHandle, reason: impl fmt::Display) -> Self {
        Self::Decode {
            handle,
            reason: reason.to_string(),
        }
    }
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Load { path, reason } => write!(f, "cannot load {path:?}: {reason}"),
            Self::Decode { handle, reason } => write!(f, "cannot decode {handle}: {reason}"),
            Self::UnknownHandle { handle } => write!(f, "unknown resource handle {handle}"),
        }
    }
}

impl std::error::Error for ResourceError {}
