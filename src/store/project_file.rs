// SPDX-FileCopyrightText: 2026 Rawgraph Authors
// SPDX-License-Identifier: LicenseRef-Rawgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Rawgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use crate::backend::{ResourceBackend, ResourceError};
use crate::model::{
    Connection, DocumentError, GraphDocument, IdError, NodeId, NodeKind, ParseNodeKindError,
    Position, SettingValue, DOCUMENT_VERSION, RESOURCE_HANDLE_KEY,
};

#[derive(Debug)]
pub enum StoreError {
    Io {
        path: PathBuf,
        source: io::Error,
    },
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    UnsupportedVersion {
        path: PathBuf,
        version: String,
    },
    InvalidId {
        field: &'static str,
        value: String,
        source: Box<IdError>,
    },
    UnknownKind {
        node_id: NodeId,
        source: ParseNodeKindError,
    },
    InvalidSetting {
        node_id: NodeId,
        key: String,
        reason: &'static str,
    },
    InvalidPosition {
        node_id: NodeId,
    },
    Document {
        path: PathBuf,
        source: DocumentError,
    },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "io error at {path:?}: {source}"),
            Self::Json { path, source } => write!(f, "json error at {path:?}: {source}"),
            Self::UnsupportedVersion { path, version } => write!(
                f,
                "unsupported project version {version:?} in {path:?} (expected {DOCUMENT_VERSION})"
            ),
            Self::InvalidId {
                field,
                value,
                source,
            } => write!(f, "invalid id for {field}: {value:?}: {source}"),
            Self::UnknownKind { node_id, source } => {
                write!(f, "node {node_id}: {source}")
            }
            Self::InvalidSetting {
                node_id,
                key,
                reason,
            } => write!(f, "node {node_id}: setting {key:?} {reason}"),
            Self::InvalidPosition { node_id } => {
                write!(f, "node {node_id}: position is not a finite number")
            }
            Self::Document { path, source } => {
                write!(f, "inconsistent project {path:?}: {source}")
            }
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            Self::InvalidId { source, .. } => Some(source.as_ref()),
            Self::UnknownKind { source, .. } => Some(source),
            Self::Document { source, .. } => Some(source),
            Self::UnsupportedVersion { .. }
            | Self::InvalidSetting { .. }
            | Self::InvalidPosition { .. } => None,
        }
    }
}

/// A node whose file could not be re-acquired while opening a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadFailure {
    pub node_id: NodeId,
    pub path: PathBuf,
    pub error: ResourceError,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub failures: Vec<LoadFailure>,
    /// Connections dropped because a later entry claimed the same single-connection socket.
    pub displaced: Vec<Connection>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.displaced.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ProjectJson {
    version: String,
    #[serde(default)]
    nodes: BTreeMap<String, NodeJson>,
    #[serde(default)]
    connections: Vec<(String, String, String, String)>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct NodeJson {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    position: [f64; 2],
    #[serde(default)]
    settings: BTreeMap<String, Value>,
}

fn major(version: &str) -> &str {
    version.split('.').next().unwrap_or(version)
}

fn setting_to_json(node_id: &NodeId, key: &str, value: &SettingValue) -> Result<Value, StoreError> {
    Ok(match value {
        SettingValue::Null | SettingValue::Handle(_) => Value::Null,
        SettingValue::Bool(value) => Value::Bool(*value),
        SettingValue::Int(value) => Value::Number((*value).into()),
        SettingValue::Float(value) => {
            Value::Number(Number::from_f64(*value).ok_or_else(|| StoreError::InvalidSetting {
                node_id: node_id.clone(),
                key: key.to_owned(),
                reason: "is not a finite number",
            })?)
        }
        SettingValue::Text(value) => Value::String(value.clone()),
    })
}

fn setting_from_json(node_id: &NodeId, key: &str, value: Value) -> Result<SettingValue, StoreError> {
    match value {
        Value::Null => Ok(SettingValue::Null),
        Value::Bool(value) => Ok(SettingValue::Bool(value)),
        Value::Number(number) => match (number.as_i64(), number.as_f64()) {
            (Some(int), _) => Ok(SettingValue::Int(int)),
            (None, Some(float)) => Ok(SettingValue::Float(float)),
            (None, None) => Err(StoreError::InvalidSetting {
                node_id: node_id.clone(),
                key: key.to_owned(),
                reason: "is not a representable number",
            }),
        },
        Value::String(text) => Ok(SettingValue::Text(text)),
        Value::Array(_) | Value::Object(_) => Err(StoreError::InvalidSetting {
            node_id: node_id.clone(),
            key: key.to_owned(),
            reason: "must be a scalar",
        }),
    }
}

fn project_to_json(doc: &GraphDocument) -> Result<ProjectJson, StoreError> {
    let mut nodes = BTreeMap::new();
    for (node_id, node) in doc.nodes() {
        let mut settings = BTreeMap::new();
        for (key, value) in node.settings() {
            if key == RESOURCE_HANDLE_KEY {
                continue;
            }
            settings.insert(key.to_string(), setting_to_json(node_id, key, value)?);
        }
        let position = node.position();
        // serde_json writes non-finite floats as null, which would not load back.
        if !position.x.is_finite() || !position.y.is_finite() {
            return Err(StoreError::InvalidPosition {
                node_id: node_id.clone(),
            });
        }
        nodes.insert(
            node_id.to_string(),
            NodeJson {
                kind: node.kind().as_str().to_owned(),
                position: [position.x, position.y],
                settings,
            },
        );
    }

    let connections = doc
        .connections()
        .iter()
        .map(|conn| {
            (
                conn.from_node.to_string(),
                conn.from_socket.clone(),
                conn.to_node.to_string(),
                conn.to_socket.clone(),
            )
        })
        .collect();

    Ok(ProjectJson {
        version: doc.version().to_owned(),
        nodes,
        connections,
    })
}

fn parse_node_id(field: &'static str, value: String) -> Result<NodeId, StoreError> {
    NodeId::new(value.clone()).map_err(|source| StoreError::InvalidId {
        field,
        value,
        source: Box::new(source),
    })
}

/// Writes `doc` to `path` via a temp file renamed into place.
pub fn save_project(doc: &GraphDocument, path: &Path) -> Result<(), StoreError> {
    let json = project_to_json(doc)?;
    let text = serde_json::to_string_pretty(&json).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    write_atomic(path, text.as_bytes())?;
    log::info!(
        "saved project {path:?} ({} nodes, {} connections)",
        doc.nodes().len(),
        doc.connections().len()
    );
    Ok(())
}

/// Reads a project into a fresh document owning `backend`.
///
/// Structural problems abort the load. A node whose file cannot be re-acquired keeps its
/// `filepath`, gets a null handle and is listed in the [`LoadReport`].
pub fn load_project(
    path: &Path,
    backend: impl ResourceBackend + 'static,
) -> Result<(GraphDocument, LoadReport), StoreError> {
    let text = fs::read_to_string(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let json: ProjectJson = serde_json::from_str(&text).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    if major(&json.version) != major(DOCUMENT_VERSION) {
        return Err(StoreError::UnsupportedVersion {
            path: path.to_path_buf(),
            version: json.version,
        });
    }

    let document_err = |source| StoreError::Document {
        path: path.to_path_buf(),
        source,
    };

    let mut doc = GraphDocument::new(backend);
    doc.set_version(json.version);

    for (raw_id, node_json) in json.nodes {
        let node_id = parse_node_id("nodes", raw_id)?;
        let kind = node_json
            .kind
            .parse::<NodeKind>()
            .map_err(|source| StoreError::UnknownKind {
                node_id: node_id.clone(),
                source,
            })?;
        let [x, y] = node_json.position;
        doc.add_node(node_id.clone(), kind, Position::new(x, y))
            .map_err(document_err)?;
        for (key, value) in node_json.settings {
            if key == RESOURCE_HANDLE_KEY {
                continue;
            }
            let value = setting_from_json(&node_id, &key, value)?;
            doc.update_setting(&node_id, key, value)
                .map_err(document_err)?;
        }
    }

    let mut report = LoadReport::default();
    for (from_node, from_socket, to_node, to_socket) in json.connections {
        let connection = Connection::new(
            parse_node_id("connections[].from_node", from_node)?,
            from_socket,
            parse_node_id("connections[].to_node", to_node)?,
            to_socket,
        );
        let displaced = doc.add_connection(connection).map_err(document_err)?;
        for old in displaced {
            log::warn!("project {path:?}: {old} dropped by a later connection");
            report.displaced.push(old);
        }
    }

    reacquire_resources(&mut doc, &mut report).map_err(document_err)?;
    log::info!(
        "loaded project {path:?} ({} nodes, {} connections, {} unloaded files)",
        doc.nodes().len(),
        doc.connections().len(),
        report.failures.len()
    );
    Ok((doc, report))
}

fn reacquire_resources(
    doc: &mut GraphDocument,
    report: &mut LoadReport,
) -> Result<(), DocumentError> {
    let wanted: Vec<(NodeId, PathBuf)> = doc
        .nodes()
        .iter()
        .filter(|(_, node)| node.kind().owns_resource())
        .filter_map(|(id, node)| node.filepath().map(|path| (id.clone(), PathBuf::from(path))))
        .collect();

    for (node_id, path) in wanted {
        let value = match doc.acquire_resource(&path) {
            Ok(handle) => {
                log::debug!("node {node_id}: acquired {handle} for {path:?}");
                SettingValue::Handle(handle)
            }
            Err(error) => {
                log::warn!("node {node_id}: {error}");
                report.failures.push(LoadFailure {
                    node_id: node_id.clone(),
                    path,
                    error,
                });
                SettingValue::Null
            }
        };
        doc.update_setting(&node_id, RESOURCE_HANDLE_KEY, value)?;
    }
    Ok(())
}

fn rename_overwrite(from: &Path, to: &Path) -> io::Result<()> {
    #[cfg(windows)]
    {
        match fs::rename(from, to) {
            Ok(()) => Ok(()),
            Err(err)
                if matches!(
                    err.kind(),
                    io::ErrorKind::AlreadyExists | io::ErrorKind::PermissionDenied
                ) =>
            {
                let _ = fs::remove_file(to);
                fs::rename(from, to)
            }
            Err(err) => Err(err),
        }
    }

    #[cfg(not(windows))]
    {
        fs::rename(from, to)
    }
}

fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), StoreError> {
    let io_err = |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file_name = path
        .file_name()
        .ok_or_else(|| io_err(io::Error::other("path has no file name")))?;
    let parent = path.parent().unwrap_or_else(|| Path::new(""));
    if !parent.as_os_str().is_empty() {
        fs::create_dir_all(parent).map_err(|source| StoreError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let tmp_path = parent.join(format!(
        ".rawgraph.tmp.{}.{}",
        file_name.to_string_lossy(),
        nanos
    ));

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&tmp_path)
        .map_err(|source| StoreError::Io {
            path: tmp_path.clone(),
            source,
        })?;
    // The temp file never outlives a failed save, whichever step failed.
    let finished = file.write_all(contents).and_then(|()| {
        drop(file);
        rename_overwrite(&tmp_path, path)
    });
    if let Err(source) = finished {
        let _ = fs::remove_file(&tmp_path);
        return Err(io_err(source));
    }
    Ok(())
}
