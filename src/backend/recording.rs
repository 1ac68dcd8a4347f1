// SPDX-FileCopyrightText: 2026 Rawgraph Authors
// SPDX-License-Identifier: LicenseRef-Rawgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Rawgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! In-memory backend for tests: any path "loads" unless marked as failing, and every call is
//! recorded so tests can assert on handle lifecycles.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use super::{Metadata, ResourceBackend, ResourceError, ResourceHandle};

#[derive(Debug, Default)]
pub(crate) struct RecordingState {
    next_handle: u64,
    pub(crate) live: BTreeMap<ResourceHandle, PathBuf>,
    pub(crate) loads: Vec<PathBuf>,
    pub(crate) released: Vec<ResourceHandle>,
    pub(crate) bad_releases: Vec<ResourceHandle>,
    pub(crate) thumbnail_calls: usize,
    failing: BTreeSet<PathBuf>,
}

/// Cloning shares the underlying state, so a test can keep one clone while the document owns
/// the other.
#[derive(Debug, Clone, Default)]
pub(crate) struct RecordingBackend {
    state: Rc<RefCell<RecordingState>>,
}

impl RecordingBackend {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn fail_path(&self, path: impl AsRef<Path>) {
        self.state
            .borrow_mut()
            .failing
            .insert(path.as_ref().to_path_buf());
    }

    pub(crate) fn heal_path(&self, path: impl AsRef<Path>) {
        self.state.borrow_mut().failing.remove(path.as_ref());
    }

    pub(crate) fn live_handles(&self) -> Vec<ResourceHandle> {
        self.state.borrow().live.keys().copied().collect()
    }

    pub(crate) fn is_live(&self, handle: ResourceHandle) -> bool {
        self.state.borrow().live.contains_key(&handle)
    }

    pub(crate) fn path_of(&self, handle: ResourceHandle) -> Option<PathBuf> {
        self.state.borrow().live.get(&handle).cloned()
    }

    pub(crate) fn load_count(&self) -> usize {
        self.state.borrow().loads.len()
    }

    pub(crate) fn released(&self) -> Vec<ResourceHandle> {
        self.state.borrow().released.clone()
    }

    pub(crate) fn bad_releases(&self) -> Vec<ResourceHandle> {
        self.state.borrow().bad_releases.clone()
    }

    pub(crate) fn thumbnail_calls(&self) -> usize {
        self.state.borrow().thumbnail_calls
    }
}

impl ResourceBackend for RecordingBackend {
    fn load(&mut self, path: &Path) -> Result<ResourceHandle, ResourceError> {
        let mut state = self.state.borrow_mut();
        state.loads.push(path.to_path_buf());
        if state.failing.contains(path) {
            return Err(ResourceError::load(path, "injected failure"));
        }
        state.next_handle += 1;
        let handle = ResourceHandle::new(state.next_handle);
        state.live.insert(handle, path.to_path_buf());
        Ok(handle)
    }

    fn release(&mut self, handle: ResourceHandle) {
        let mut state = self.state.borrow_mut();
        if state.live.remove(&handle).is_some() {
            state.released.push(handle);
        } else {
            state.bad_releases.push(handle);
        }
    }

    fn thumbnail(&self, handle: ResourceHandle) -> Result<Vec<u8>, ResourceError> {
        let mut state = self.state.borrow_mut();
        state.thumbnail_calls += 1;
        let path = state
            .live
            .get(&handle)
            .ok_or(ResourceError::UnknownHandle { handle })?;
        Ok(path.to_string_lossy().into_owned().into_bytes())
    }

    fn metadata(&self, handle: ResourceHandle) -> Result<Metadata, ResourceError> {
        let state = self.state.borrow();
        let path = state
            .live
            .get(&handle)
            .ok_or(ResourceError::UnknownHandle { handle })?;
        let mut meta = Metadata::new();
        meta.insert("path".to_owned(), path.to_string_lossy().into_owned());
        Ok(meta)
    }
}
