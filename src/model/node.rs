// SPDX-FileCopyrightText: 2026 Rawgraph Authors
// SPDX-License-Identifier: LicenseRef-Rawgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Rawgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use smol_str::SmolStr;

use super::socket::{Direction, SocketSpec, BLACK_LEVELS_SOCKETS, IMAGE_LOADER_SOCKETS};
use crate::backend::ResourceHandle;

/// Setting key holding the selected file of resource-owning nodes.
pub const FILEPATH_KEY: &str = "filepath";
/// Setting key holding the live backend handle. Runtime only; never persisted.
pub const RESOURCE_HANDLE_KEY: &str = "resource_handle";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    ImageLoader,
    BlackLevels,
}

impl NodeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ImageLoader => "ImageLoader",
            Self::BlackLevels => "BlackLevels",
        }
    }

    pub fn sockets(self) -> &'static [SocketSpec] {
        match self {
            Self::ImageLoader => IMAGE_LOADER_SOCKETS,
            Self::BlackLevels => BLACK_LEVELS_SOCKETS,
        }
    }

    pub fn socket(self, name: &str, direction: Direction) -> Option<&'static SocketSpec> {
        self.sockets()
            .iter()
            .find(|spec| spec.name == name && spec.direction == direction)
    }

    /// Whether nodes of this kind acquire a backend handle for their `filepath`.
    pub fn owns_resource(self) -> bool {
        matches!(self, Self::ImageLoader)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseNodeKindError {
    value: String,
}

impl fmt::Display for ParseNodeKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown node kind {:?}", self.value)
    }
}

impl std::error::Error for ParseNodeKindError {}

impl FromStr for NodeKind {
    type Err = ParseNodeKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ImageLoader" => Ok(Self::ImageLoader),
            "BlackLevels" => Ok(Self::BlackLevels),
            _ => Err(ParseNodeKindError {
                value: s.to_owned(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Position {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SettingValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Handle(ResourceHandle),
}

impl SettingValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_handle(&self) -> Option<ResourceHandle> {
        match self {
            Self::Handle(handle) => Some(*handle),
            _ => None,
        }
    }
}

impl From<&str> for SettingValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for SettingValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for SettingValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for SettingValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for SettingValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl<T: Into<SettingValue>> From<Option<T>> for SettingValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

pub type Settings = BTreeMap<SmolStr, SettingValue>;

/// A processing node. The id lives in the document's node map, not in the node itself.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    kind: NodeKind,
    position: Position,
    settings: Settings,
}

impl Node {
    pub fn new(kind: NodeKind, position: Position) -> Self {
        Self {
            kind,
            position,
            settings: Settings::new(),
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub(crate) fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub(crate) fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    pub fn setting(&self, key: &str) -> Option<&SettingValue> {
        self.settings.get(key)
    }

    /// The selected file, if any. A null or non-text `filepath` counts as no file.
    pub fn filepath(&self) -> Option<&str> {
        self.setting(FILEPATH_KEY)
            .and_then(SettingValue::as_text)
            .filter(|path| !path.is_empty())
    }

    pub fn resource_handle(&self) -> Option<ResourceHandle> {
        self.setting(RESOURCE_HANDLE_KEY)
            .and_then(SettingValue::as_handle)
    }

    /// Copy of this node with the live handle replaced by null.
    ///
    /// Used wherever node data outlives the handle it held (removal snapshots, persistence).
    pub fn without_handle(&self) -> Self {
        let mut node = self.clone();
        if let Some(value) = node.settings.get_mut(RESOURCE_HANDLE_KEY) {
            *value = SettingValue::Null;
        }
        node
    }
}
