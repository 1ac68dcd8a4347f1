// SPDX-FileCopyrightText: 2026 Rawgraph Authors
// SPDX-License-Identifier: LicenseRef-Rawgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Rawgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Socket catalog.
//!
//! Sockets are not stored anywhere: a socket is the identity `(node_id, socket_name,
//! direction)`, and its type tag and multiplicity come from the static catalog of the node's
//! kind.

use std::fmt;

use super::ids::NodeId;

/// Type tag carried by a socket. Only sockets with equal tags may be connected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SocketType {
    Raw,
    Cfa,
    Metadata,
    Image,
    Number,
}

impl SocketType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Raw => "Raw",
            Self::Cfa => "CFA",
            Self::Metadata => "Metadata",
            Self::Image => "Image",
            Self::Number => "Number",
        }
    }
}

impl fmt::Display for SocketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    In,
    Out,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::In => f.write_str("in"),
            Self::Out => f.write_str("out"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Multiplicity {
    /// At most one active edge; a new edge replaces the old one.
    Single,
    Multi,
}

/// Declared shape of one socket on a node kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SocketSpec {
    pub name: &'static str,
    pub direction: Direction,
    pub socket_type: SocketType,
    pub multiplicity: Multiplicity,
}

impl SocketSpec {
    const fn input(name: &'static str, socket_type: SocketType) -> Self {
        Self {
            name,
            direction: Direction::In,
            socket_type,
            multiplicity: Multiplicity::Single,
        }
    }

    const fn output(
        name: &'static str,
        socket_type: SocketType,
        multiplicity: Multiplicity,
    ) -> Self {
        Self {
            name,
            direction: Direction::Out,
            socket_type,
            multiplicity,
        }
    }

    pub fn is_single(&self) -> bool {
        self.multiplicity == Multiplicity::Single
    }
}

pub(crate) const IMAGE_LOADER_SOCKETS: &[SocketSpec] = &[
    SocketSpec::output("RAW_out", SocketType::Raw, Multiplicity::Single),
    SocketSpec::output("CFA_out", SocketType::Cfa, Multiplicity::Single),
    SocketSpec::output("Metadata_out", SocketType::Metadata, Multiplicity::Single),
];

pub(crate) const BLACK_LEVELS_SOCKETS: &[SocketSpec] = &[
    SocketSpec::input("RAW_in", SocketType::Raw),
    SocketSpec::input("CFA_in", SocketType::Cfa),
    SocketSpec::input("Metadata_in", SocketType::Metadata),
    SocketSpec::output("RAW_out", SocketType::Raw, Multiplicity::Multi),
    SocketSpec::output("CFA_out", SocketType::Cfa, Multiplicity::Multi),
    SocketSpec::output("Metadata_out", SocketType::Metadata, Multiplicity::Multi),
];

/// Address of a socket instance, resolved through the document's node map.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SocketRef {
    pub node_id: NodeId,
    pub socket_name: String,
    pub direction: Direction,
}

impl SocketRef {
    pub fn new(node_id: NodeId, socket_name: impl Into<String>, direction: Direction) -> Self {
        Self {
            node_id,
            socket_name: socket_name.into(),
            direction,
        }
    }

    pub fn input(node_id: NodeId, socket_name: impl Into<String>) -> Self {
        Self::new(node_id, socket_name, Direction::In)
    }

    pub fn output(node_id: NodeId, socket_name: impl Into<String>) -> Self {
        Self::new(node_id, socket_name, Direction::Out)
    }
}

impl fmt::Display for SocketRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{} ({})", self.node_id, self.socket_name, self.direction)
    }
}
