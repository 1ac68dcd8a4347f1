// SPDX-FileCopyrightText: 2026 Rawgraph Authors
// SPDX-License-Identifier: LicenseRef-Rawgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Rawgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Change notifications emitted by [`GraphDocument`](super::GraphDocument).
//!
//! Listeners run synchronously, in registration order, after each committed mutation. They
//! receive the event by reference and cannot reach the document, so a listener can never
//! observe or cause a half-applied edit.

use std::fmt;

use smol_str::SmolStr;

use super::connection::Connection;
use super::ids::NodeId;
use super::node::{Position, SettingValue};

#[derive(Debug, Clone, PartialEq)]
pub enum ChangeEvent {
    NodeAdded(NodeId),
    NodeRemoved(NodeId),
    /// `value` is `None` when the key was removed.
    SettingChanged {
        node_id: NodeId,
        key: SmolStr,
        value: Option<SettingValue>,
    },
    PositionChanged {
        node_id: NodeId,
        position: Position,
    },
    ConnectionAdded(Connection),
    ConnectionRemoved(Connection),
}

impl ChangeEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::NodeAdded(_) => EventKind::NodeAdded,
            Self::NodeRemoved(_) => EventKind::NodeRemoved,
            Self::SettingChanged { .. } => EventKind::SettingChanged,
            Self::PositionChanged { .. } => EventKind::PositionChanged,
            Self::ConnectionAdded(_) => EventKind::ConnectionAdded,
            Self::ConnectionRemoved(_) => EventKind::ConnectionRemoved,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    NodeAdded,
    NodeRemoved,
    SettingChanged,
    PositionChanged,
    ConnectionAdded,
    ConnectionRemoved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub#{}", self.0)
    }
}

type Callback = Box<dyn FnMut(&ChangeEvent)>;

struct Listener {
    id: SubscriptionId,
    filter: Option<EventKind>,
    callback: Callback,
}

#[derive(Default)]
pub(crate) struct Listeners {
    next_id: u64,
    entries: Vec<Listener>,
}

impl Listeners {
    pub(crate) fn subscribe(&mut self, filter: Option<EventKind>, callback: Callback) -> SubscriptionId {
        self.next_id = self.next_id.saturating_add(1);
        let id = SubscriptionId(self.next_id);
        self.entries.push(Listener {
            id,
            filter,
            callback,
        });
        id
    }

    pub(crate) fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|listener| listener.id != id);
        self.entries.len() != before
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn emit(&mut self, event: &ChangeEvent) {
        let kind = event.kind();
        for listener in &mut self.entries {
            if listener.filter.map_or(true, |filter| filter == kind) {
                (listener.callback)(event);
            }
        }
    }
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.entries.len())
            .finish()
    }
}
