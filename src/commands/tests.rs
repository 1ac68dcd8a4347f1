// SPDX-FileCopyrightText: 2026 Rawgraph Authors
// SPDX-License-Identifier: LicenseRef-Rawgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Rawgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::path::Path;

use rstest::{fixture, rstest};

use super::{
    AddConnectionCommand, AddNodeCommand, ChangeSettingCommand, Command, CommandError,
    ExecContext, LoadImageCommand, MoveNodeCommand, ReloadPhase, RemoveConnectionCommand,
    RemoveNodeCommand, ResourceWarning,
};
use crate::backend::recording::RecordingBackend;
use crate::backend::{ResourceBackend, ResourceHandle};
use crate::model::fixtures::{conn, nid};
use crate::model::{
    DocumentError, GraphDocument, NodeId, NodeKind, Position, SettingValue, FILEPATH_KEY,
    RESOURCE_HANDLE_KEY,
};

struct Rig {
    backend: RecordingBackend,
    doc: GraphDocument,
}

impl Rig {
    fn new() -> Self {
        let backend = RecordingBackend::new();
        let doc = GraphDocument::new(backend.clone());
        Self { backend, doc }
    }

    fn add(&mut self, id: &str, kind: NodeKind) {
        self.doc
            .add_node(nid(id), kind, Position::default())
            .expect("add node");
    }

    fn apply(&mut self, command: &mut dyn Command) -> Vec<ResourceWarning> {
        let mut ctx = ExecContext::new(&mut self.doc);
        command.apply(&mut ctx).expect("apply");
        ctx.into_warnings()
    }

    fn revert(&mut self, command: &mut dyn Command) -> Vec<ResourceWarning> {
        let mut ctx = ExecContext::new(&mut self.doc);
        command.revert(&mut ctx).expect("revert");
        ctx.into_warnings()
    }

    /// Loads `path` up front, the way an editor validates a file before building the command.
    fn load_command(&mut self, id: &str, path: &str) -> LoadImageCommand {
        let handle = self.backend.clone().load(Path::new(path)).expect("pre-load");
        LoadImageCommand::new(&self.doc, nid(id), path, handle).expect("load command")
    }

    fn handle_of(&self, id: &str) -> Option<ResourceHandle> {
        self.doc.node(&nid(id)).and_then(|node| node.resource_handle())
    }

    fn setting(&self, id: &str, key: &str) -> Option<SettingValue> {
        self.doc
            .node(&nid(id))
            .and_then(|node| node.setting(key).cloned())
    }
}

#[fixture]
fn rig() -> Rig {
    Rig::new()
}

#[fixture]
fn abc() -> Rig {
    let mut rig = Rig::new();
    rig.add("A", NodeKind::ImageLoader);
    rig.add("B", NodeKind::BlackLevels);
    rig.add("C", NodeKind::BlackLevels);
    rig
}

#[rstest]
fn add_node_reuses_its_id_on_every_redo(mut rig: Rig) {
    let mut add = AddNodeCommand::new(&mut rig.doc, NodeKind::BlackLevels, Position::new(4.0, 2.0));
    let id = add.node_id().clone();

    rig.apply(&mut add);
    assert!(rig.doc.contains_node(&id));
    rig.revert(&mut add);
    assert!(!rig.doc.contains_node(&id));
    rig.apply(&mut add);
    assert_eq!(
        rig.doc.node(&id).map(|node| node.position()),
        Some(Position::new(4.0, 2.0))
    );
    assert_eq!(add.label(), "Add BlackLevels Node");
}

#[rstest]
fn remove_node_restores_node_and_both_connections(mut abc: Rig) {
    let raw = conn("A", "RAW_out", "B", "RAW_in");
    let cfa = conn("B", "CFA_out", "C", "CFA_in");
    abc.doc.add_connection(raw.clone()).expect("raw");
    abc.doc.add_connection(cfa.clone()).expect("cfa");
    abc.doc
        .update_setting(&nid("B"), "level", SettingValue::Int(64))
        .expect("setting");
    let before = abc.doc.snapshot();

    let mut remove = RemoveNodeCommand::new(&abc.doc, nid("B")).expect("command");
    abc.apply(&mut remove);
    assert!(!abc.doc.contains_node(&nid("B")));
    assert!(abc.doc.connections().is_empty());

    abc.revert(&mut remove);
    assert_eq!(abc.doc.snapshot(), before);

    abc.apply(&mut remove);
    assert!(!abc.doc.contains_connection(&raw));
    assert!(!abc.doc.contains_connection(&cfa));
}

#[rstest]
fn remove_node_releases_and_reacquires_the_file(mut abc: Rig) {
    let mut load = abc.load_command("A", "/x.cr2");
    abc.apply(&mut load);
    let first = abc.handle_of("A").expect("first handle");

    let mut remove = RemoveNodeCommand::new(&abc.doc, nid("A")).expect("command");
    abc.apply(&mut remove);
    assert!(!abc.backend.is_live(first));

    let warnings = abc.revert(&mut remove);
    assert!(warnings.is_empty());
    let second = abc.handle_of("A").expect("reacquired handle");
    assert_ne!(second, first);
    assert_eq!(abc.backend.path_of(second), Some("/x.cr2".into()));
    assert!(abc.backend.bad_releases().is_empty());
}

#[rstest]
fn remove_node_restore_degrades_when_file_is_gone(mut abc: Rig) {
    let mut load = abc.load_command("A", "/x.cr2");
    abc.apply(&mut load);
    let mut remove = RemoveNodeCommand::new(&abc.doc, nid("A")).expect("command");
    abc.apply(&mut remove);

    abc.backend.fail_path("/x.cr2");
    let warnings = abc.revert(&mut remove);

    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].phase, ReloadPhase::Restore);
    assert_eq!(abc.handle_of("A"), None);
    assert_eq!(
        abc.setting("A", FILEPATH_KEY),
        Some(SettingValue::from("/x.cr2"))
    );
}

#[rstest]
fn remove_node_on_missing_node_fails_at_construction(rig: Rig) {
    let err = RemoveNodeCommand::new(&rig.doc, nid("ghost")).expect_err("missing");
    assert_eq!(
        err,
        CommandError::Document(DocumentError::NotFound {
            node_id: nid("ghost")
        })
    );
}

#[rstest]
fn add_connection_revert_restores_displaced_edge(mut abc: Rig) {
    let first = conn("A", "RAW_out", "B", "RAW_in");
    abc.doc.add_connection(first.clone()).expect("first");

    let second = conn("C", "RAW_out", "B", "RAW_in");
    let mut add = AddConnectionCommand::new(second.clone());
    abc.apply(&mut add);
    assert!(abc.doc.contains_connection(&second));
    assert!(!abc.doc.contains_connection(&first));

    abc.revert(&mut add);
    assert!(abc.doc.contains_connection(&first));
    assert!(!abc.doc.contains_connection(&second));
}

#[rstest]
fn rejected_connection_leaves_graph_untouched(mut abc: Rig) {
    let existing = conn("A", "RAW_out", "B", "RAW_in");
    abc.doc.add_connection(existing.clone()).expect("existing");

    let mut add = AddConnectionCommand::new(conn("A", "CFA_out", "B", "RAW_in"));
    let mut ctx = ExecContext::new(&mut abc.doc);
    let err = add.apply(&mut ctx).expect_err("type mismatch");
    assert!(matches!(
        err,
        CommandError::Document(DocumentError::TypeMismatch { .. })
    ));
    assert_eq!(abc.doc.connections().len(), 1);
    assert!(abc.doc.contains_connection(&existing));
}

#[rstest]
fn remove_connection_requires_an_existing_edge(mut abc: Rig) {
    let edge = conn("A", "RAW_out", "B", "RAW_in");
    assert!(RemoveConnectionCommand::new(&abc.doc, edge.clone()).is_err());

    abc.doc.add_connection(edge.clone()).expect("edge");
    let mut remove = RemoveConnectionCommand::new(&abc.doc, edge.clone()).expect("command");
    abc.apply(&mut remove);
    assert!(!abc.doc.contains_connection(&edge));
    abc.revert(&mut remove);
    assert!(abc.doc.contains_connection(&edge));
}

#[rstest]
fn move_node_swaps_positions(mut abc: Rig) {
    let mut mv = MoveNodeCommand::new(&abc.doc, nid("B"), Position::new(30.0, -5.0)).expect("mv");
    abc.apply(&mut mv);
    assert_eq!(
        abc.doc.node(&nid("B")).map(|n| n.position()),
        Some(Position::new(30.0, -5.0))
    );
    abc.revert(&mut mv);
    assert_eq!(
        abc.doc.node(&nid("B")).map(|n| n.position()),
        Some(Position::default())
    );
}

#[rstest]
fn change_setting_removes_a_key_that_was_absent(mut abc: Rig) {
    let mut change =
        ChangeSettingCommand::new(&abc.doc, nid("B"), "level", SettingValue::Float(0.25))
            .expect("change");
    abc.apply(&mut change);
    assert_eq!(abc.setting("B", "level"), Some(SettingValue::Float(0.25)));

    abc.revert(&mut change);
    assert_eq!(abc.setting("B", "level"), None);
    assert_eq!(change.label(), "Change level");
}

#[rstest]
fn change_setting_restores_previous_value(mut abc: Rig) {
    abc.doc
        .update_setting(&nid("B"), "level", SettingValue::Int(1))
        .expect("seed");
    let mut change =
        ChangeSettingCommand::new(&abc.doc, nid("B"), "level", SettingValue::Int(2))
            .expect("change");
    abc.apply(&mut change);
    abc.revert(&mut change);
    assert_eq!(abc.setting("B", "level"), Some(SettingValue::Int(1)));
}

#[rstest]
#[case::handle_key("B", RESOURCE_HANDLE_KEY, SettingValue::Null)]
#[case::handle_value("B", "other", SettingValue::Handle(ResourceHandle::new(9)))]
#[case::loader_filepath("A", FILEPATH_KEY, SettingValue::from("/y.cr2"))]
fn change_setting_rejects_reserved_settings(
    abc: Rig,
    #[case] id: &str,
    #[case] key: &str,
    #[case] value: SettingValue,
) {
    let err = ChangeSettingCommand::new(&abc.doc, nid(id), key, value).expect_err("reserved");
    assert!(matches!(
        err,
        CommandError::Document(DocumentError::ReservedSetting { .. })
    ));
}

#[rstest]
fn load_image_without_previous_file_round_trips(mut abc: Rig) {
    let mut load = abc.load_command("A", "/x.cr2");
    abc.apply(&mut load);
    let h1 = abc.handle_of("A").expect("H1");
    assert_eq!(abc.setting("A", FILEPATH_KEY), Some(SettingValue::from("/x.cr2")));

    let warnings = abc.revert(&mut load);
    assert!(warnings.is_empty());
    assert!(!abc.backend.is_live(h1));
    assert_eq!(abc.setting("A", FILEPATH_KEY), Some(SettingValue::Null));
    assert_eq!(abc.handle_of("A"), None);

    abc.apply(&mut load);
    let h2 = abc.handle_of("A").expect("H2");
    assert_ne!(h2, h1);
    assert_eq!(abc.setting("A", FILEPATH_KEY), Some(SettingValue::from("/x.cr2")));
    assert_eq!(abc.backend.live_handles(), vec![h2]);
    assert!(abc.backend.bad_releases().is_empty());
}

#[rstest]
fn load_image_swaps_between_two_files(mut abc: Rig) {
    let mut first = abc.load_command("A", "/a.cr2");
    abc.apply(&mut first);
    let mut second = abc.load_command("A", "/b.cr2");
    abc.apply(&mut second);
    assert_eq!(abc.backend.live_handles().len(), 1);

    abc.revert(&mut second);
    let restored = abc.handle_of("A").expect("old file reloaded");
    assert_eq!(abc.backend.path_of(restored), Some("/a.cr2".into()));
    assert_eq!(abc.setting("A", FILEPATH_KEY), Some(SettingValue::from("/a.cr2")));
    assert_eq!(abc.backend.live_handles(), vec![restored]);
}

#[rstest]
fn load_image_redo_failure_leaves_file_selected_but_unloaded(mut abc: Rig) {
    let mut load = abc.load_command("A", "/x.cr2");
    abc.apply(&mut load);
    abc.revert(&mut load);

    abc.backend.fail_path("/x.cr2");
    let warnings = abc.apply(&mut load);

    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].phase, ReloadPhase::Redo);
    assert_eq!(abc.setting("A", FILEPATH_KEY), Some(SettingValue::from("/x.cr2")));
    assert_eq!(abc.setting("A", RESOURCE_HANDLE_KEY), Some(SettingValue::Null));
    assert!(abc.backend.live_handles().is_empty());
}

#[rstest]
fn load_image_undo_failure_clears_previous_file(mut abc: Rig) {
    let mut first = abc.load_command("A", "/a.cr2");
    abc.apply(&mut first);
    let mut second = abc.load_command("A", "/b.cr2");
    abc.apply(&mut second);

    abc.backend.fail_path("/a.cr2");
    let warnings = abc.revert(&mut second);
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].phase, ReloadPhase::Undo);
    assert_eq!(abc.setting("A", FILEPATH_KEY), Some(SettingValue::Null));
    assert!(abc.backend.live_handles().is_empty());

    // The previous path is gone for good: a later round trip does not bring it back.
    abc.backend.heal_path("/a.cr2");
    abc.apply(&mut second);
    let warnings = abc.revert(&mut second);
    assert!(warnings.is_empty());
    assert_eq!(abc.setting("A", FILEPATH_KEY), Some(SettingValue::Null));
    assert!(abc.backend.live_handles().is_empty());
    assert!(abc.backend.bad_releases().is_empty());
}

#[rstest]
fn load_image_requires_a_resource_owner(mut abc: Rig) {
    let handle = abc.backend.clone().load(Path::new("/x.cr2")).expect("load");
    let err = LoadImageCommand::new(&abc.doc, nid("B"), "/x.cr2", handle).expect_err("owner");
    assert_eq!(
        err,
        CommandError::NotResourceOwner {
            node_id: nid("B"),
            kind: NodeKind::BlackLevels,
        }
    );

    let missing: NodeId = nid("ghost");
    assert!(LoadImageCommand::new(&abc.doc, missing, "/x.cr2", handle).is_err());
}
