// SPDX-FileCopyrightText: 2026 Rawgraph Authors
// SPDX-License-Identifier: LicenseRef-Rawgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Rawgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::HashMap;
use std::sync::Arc;

use crate::backend::{Metadata, ResourceHandle};

/// Data derived from a live handle. Never persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DerivedData {
    pub thumbnail: Option<Arc<[u8]>>,
    pub metadata: Option<Arc<Metadata>>,
}

/// Runtime cache keyed by handle. Entries must be purged when their handle is released.
#[derive(Debug, Default)]
pub struct DerivedCache {
    entries: HashMap<ResourceHandle, DerivedData>,
}

impl DerivedCache {
    pub fn get(&self, handle: ResourceHandle) -> Option<&DerivedData> {
        self.entries.get(&handle)
    }

    pub(crate) fn entry(&mut self, handle: ResourceHandle) -> &mut DerivedData {
        self.entries.entry(handle).or_default()
    }

    pub(crate) fn purge(&mut self, handle: ResourceHandle) -> bool {
        self.entries.remove(&handle).is_some()
    }

    pub fn contains(&self, handle: ResourceHandle) -> bool {
        self.entries.contains_key(&handle)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
