// SPDX-FileCopyrightText: 2026 Rawgraph Authors
// SPDX-License-Identifier: LicenseRef-Rawgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Rawgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::connection::Connection;
use super::ids::NodeId;

pub(crate) fn nid(value: &str) -> NodeId {
    NodeId::new(value).expect("node id")
}

pub(crate) fn conn(from_node: &str, from_socket: &str, to_node: &str, to_socket: &str) -> Connection {
    Connection::new(nid(from_node), from_socket, nid(to_node), to_socket)
}
