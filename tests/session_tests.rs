//! Integration tests for layout serialization, restore, and the session store.

mod common;

use common::{StubFactory, test_config};
use quickterm::{
    LayoutError, LayoutNode, PaneManager, SessionStore, SplitDirection,
};
use tempfile::tempdir;

fn two_pane_layout() -> LayoutNode {
    LayoutNode::Split {
        orientation: SplitDirection::Vertical,
        ratio: 0.5,
        first: Box::new(LayoutNode::Leaf {
            cwd: Some("/a".to_string()),
            shell: None,
        }),
        second: Box::new(LayoutNode::Leaf {
            cwd: Some("/b".to_string()),
            shell: None,
        }),
    }
}

#[test]
fn test_restore_two_leaves_in_traversal_order() {
    let json = r#"{"type":"split","orientation":"v","ratio":0.5,
        "first":{"type":"leaf","cwd":"/a"},
        "second":{"type":"leaf","cwd":"/b"}}"#;
    let layout = LayoutNode::from_json(json).unwrap();

    let config = test_config();
    let mut factory = StubFactory::new();
    let manager = PaneManager::restore(&layout, &config, &mut factory).unwrap();

    assert_eq!(manager.pane_count(), 2);
    let cwds: Vec<_> = manager
        .leaf_order()
        .into_iter()
        .map(|id| manager.get_pane(id).unwrap().get_cwd())
        .collect();
    assert_eq!(cwds, vec![Some("/a".to_string()), Some("/b".to_string())]);

    // Focus on the first reachable leaf.
    assert_eq!(manager.focused_pane_id(), Some(manager.leaf_order()[0]));
}

#[test]
fn test_restore_split_missing_child_fails_without_sessions() {
    let json = r#"{"type":"split","orientation":"v","ratio":0.5,
        "first":{"type":"leaf","cwd":"/a"}}"#;
    let err = LayoutNode::from_json(json).unwrap_err();
    assert!(matches!(err, LayoutError::MalformedLayout { .. }));
}

#[test]
fn test_restore_invalid_ratio_creates_no_sessions() {
    let layout = LayoutNode::Split {
        orientation: SplitDirection::Horizontal,
        ratio: 1.5,
        first: Box::new(LayoutNode::Leaf {
            cwd: Some("/a".to_string()),
            shell: None,
        }),
        second: Box::new(LayoutNode::Leaf {
            cwd: Some("/b".to_string()),
            shell: None,
        }),
    };

    let mut factory = StubFactory::new();
    let err = PaneManager::restore(&layout, &test_config(), &mut factory).unwrap_err();

    assert!(matches!(err, LayoutError::MalformedLayout { .. }));
    assert_eq!(factory.created_count(), 0);
}

#[test]
fn test_restore_rolls_back_created_sessions_on_failure() {
    let layout = LayoutNode::Split {
        orientation: SplitDirection::Vertical,
        ratio: 0.4,
        first: Box::new(two_pane_layout()),
        second: Box::new(LayoutNode::Leaf {
            cwd: Some("/c".to_string()),
            shell: None,
        }),
    };

    // Third session refuses to start; the two already created must be
    // terminated before the error surfaces.
    let mut factory = StubFactory::failing_after(2);
    let err = PaneManager::restore(&layout, &test_config(), &mut factory).unwrap_err();

    assert!(matches!(err, LayoutError::SessionCreationFailed { .. }));
    assert_eq!(factory.created_count(), 2);
    assert_eq!(factory.terminated_count(), 2);
}

#[test]
fn test_serialize_restore_roundtrip_fidelity() {
    let config = test_config();
    let mut factory = StubFactory::new();
    let mut manager = PaneManager::new(&config, &mut factory).unwrap();
    let a = manager.focused_pane_id().unwrap();

    let b = manager
        .split(a, SplitDirection::Horizontal, &config, &mut factory)
        .unwrap();
    manager
        .split(b, SplitDirection::Vertical, &config, &mut factory)
        .unwrap();
    manager.resize_split(a, -0.15).unwrap();

    let layout = manager.serialize(&config).unwrap();

    let mut factory2 = StubFactory::new();
    let restored = PaneManager::restore(&layout, &config, &mut factory2).unwrap();

    // Identical orientations, ratios, and leaf working directories.
    assert_eq!(restored.serialize(&config), Some(layout));
    assert_eq!(restored.pane_count(), manager.pane_count());
}

#[test]
fn test_shell_is_captured_only_when_not_the_default() {
    let config = test_config(); // default shell /bin/sh
    let layout = LayoutNode::Split {
        orientation: SplitDirection::Vertical,
        ratio: 0.5,
        first: Box::new(LayoutNode::Leaf {
            cwd: Some("/a".to_string()),
            shell: Some("/usr/bin/fish".to_string()),
        }),
        second: Box::new(LayoutNode::Leaf {
            cwd: Some("/b".to_string()),
            shell: None,
        }),
    };

    let mut factory = StubFactory::new();
    let manager = PaneManager::restore(&layout, &config, &mut factory).unwrap();

    // The override reached the factory, the default leaf got the config shell.
    {
        let log = factory.log.borrow();
        assert_eq!(log.created[0].shell, Some("/usr/bin/fish".to_string()));
        assert_eq!(log.created[1].shell, Some("/bin/sh".to_string()));
    }

    // Serializing keeps the override and drops the default.
    assert_eq!(manager.serialize(&config), Some(layout));
}

#[test]
fn test_serialized_json_matches_wire_format() {
    let config = test_config();
    let mut factory = StubFactory::new();
    let mut manager = PaneManager::new(&config, &mut factory).unwrap();
    let a = manager.focused_pane_id().unwrap();
    manager
        .split(a, SplitDirection::Horizontal, &config, &mut factory)
        .unwrap();

    let json = manager.serialize(&config).unwrap().to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["type"], "split");
    assert_eq!(value["orientation"], "h");
    assert_eq!(value["ratio"], 0.5);
    assert_eq!(value["first"]["type"], "leaf");
    assert_eq!(value["first"]["cwd"], "/home");
    assert_eq!(value["second"]["type"], "leaf");
    // Default shell is not persisted.
    assert!(value["first"].get("shell").is_none());
}

#[test]
fn test_named_layout_survives_store_roundtrip_end_to_end() {
    let config = test_config();
    let mut factory = StubFactory::new();
    let mut manager = PaneManager::new(&config, &mut factory).unwrap();
    let a = manager.focused_pane_id().unwrap();
    manager
        .split(a, SplitDirection::Vertical, &config, &mut factory)
        .unwrap();

    let temp = tempdir().unwrap();
    let store = SessionStore::with_path(temp.path().join("sessions.json"));
    let layout = manager.serialize(&config).unwrap();
    store.save("dev", &layout).unwrap();

    let loaded = store.load("dev").unwrap();
    let mut factory2 = StubFactory::new();
    let restored = PaneManager::restore(&loaded, &config, &mut factory2).unwrap();

    assert_eq!(restored.serialize(&config), Some(layout));
}

#[test]
fn test_restore_leaf_without_cwd_keeps_it_unset() {
    let layout = LayoutNode::from_json(r#"{"type":"leaf"}"#).unwrap();

    let config = test_config();
    let mut factory = StubFactory::new();
    let manager = PaneManager::restore(&layout, &config, &mut factory).unwrap();

    assert_eq!(factory.log.borrow().created[0].working_directory, None);
    assert_eq!(
        manager.serialize(&config),
        Some(LayoutNode::Leaf {
            cwd: None,
            shell: None,
        })
    );
}
