// SPDX-FileCopyrightText: 2026 Rawgraph Authors
// SPDX-License-Identifier: LicenseRef-Rawgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Rawgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Graph document model.
//!
//! A document holds nodes keyed by id and a set of typed connections between their sockets,
//! plus a runtime cache of data derived from live resource handles.

pub mod cache;
pub mod connection;
pub mod document;
pub mod events;
#[cfg(test)]
pub(crate) mod fixtures;
pub mod ids;
pub mod node;
pub mod socket;

pub use cache::{DerivedCache, DerivedData};
pub use connection::Connection;
pub use document::{
    Displaced, DocumentError, DocumentSnapshot, GraphDocument, MissingRef, DOCUMENT_VERSION,
};
pub use events::{ChangeEvent, EventKind, SubscriptionId};
pub use ids::{Id, IdError, NodeId};
pub use node::{
    Node, NodeKind, ParseNodeKindError, Position, SettingValue, Settings, FILEPATH_KEY,
    RESOURCE_HANDLE_KEY,
};
pub use socket::{Direction, Multiplicity, SocketRef, SocketSpec, SocketType};
