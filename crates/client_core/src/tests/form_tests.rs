use super::*;

fn seed(node_id: &str, management_ip: &str) -> NodeSeed {
    NodeSeed {
        node_id: Some(node_id.to_string()),
        management_ip: Some(management_ip.to_string()),
        ..NodeSeed::default()
    }
}

#[test]
fn new_form_starts_with_one_prefilled_node() {
    let form = NodeForm::new();
    assert_eq!(form.len(), 1);
    assert_eq!(form.nodes()[0].node_id, "1");
    assert_eq!(form.nodes()[0].management_ip, "");
    assert_eq!(form.next_node_number(), 2);
}

#[test]
fn adding_then_removing_keeps_earlier_boxes_intact() {
    let mut form = NodeForm::new();
    let first = form.nodes()[0].key();
    form.node_mut(first).expect("first").management_ip = "10.0.0.1".into();
    form.add_node_box(seed("alpha", "10.0.0.2"));
    form.add_node_box(seed("beta", "10.0.0.3"));
    form.add_node_box(NodeSeed::default());

    form.remove_last_node().expect("remove fourth");
    form.remove_last_node().expect("remove third");

    assert_eq!(form.len(), 2);
    assert_eq!(form.nodes()[0].node_id, "1");
    assert_eq!(form.nodes()[0].management_ip, "10.0.0.1");
    assert_eq!(form.nodes()[1].node_id, "alpha");
    assert_eq!(form.nodes()[1].management_ip, "10.0.0.2");
}

#[test]
fn last_node_cannot_be_removed() {
    let mut form = NodeForm::new();
    let err = form.remove_last_node().expect_err("must refuse");
    assert_eq!(err, FormError::LastNodeRequired);
    assert_eq!(form.len(), 1);
}

#[test]
fn counter_keeps_increasing_after_removal() {
    let mut form = NodeForm::new();
    form.add_node_box(NodeSeed::default());
    form.remove_last_node().expect("remove");
    let key = form.add_node_box(NodeSeed::default());

    assert_eq!(key, NodeKey(3));
    assert_eq!(form.node(key).expect("node").node_id, "3");
}

#[test]
fn empty_seed_values_fall_back_to_counter_and_blank_ip() {
    let mut form = NodeForm::new();
    let key = form.add_node_box(seed("", ""));
    let node = form.node(key).expect("node");
    assert_eq!(node.node_id, "2");
    assert_eq!(node.management_ip, "");
}

#[test]
fn duplicate_node_ids_are_accepted() {
    let mut form = NodeForm::new();
    form.add_node_box(seed("1", "10.0.0.9"));
    let payload = form.to_payload();
    assert_eq!(payload.nodes[0].node_id, "1");
    assert_eq!(payload.nodes[1].node_id, "1");
}

#[test]
fn removing_missing_controller_is_refused_without_changes() {
    let mut form = NodeForm::new();
    let key = form.nodes()[0].key();
    let before = form.nodes().to_vec();

    let err = form
        .remove_controller(key, ControllerKind::Storage)
        .expect_err("nothing to remove");

    assert_eq!(err.to_string(), "No Storage Controllers to remove.");
    assert_eq!(form.nodes(), before.as_slice());
}

#[test]
fn remove_controller_drops_most_recent_dropdown() {
    let mut form = NodeForm::new();
    let key = form.nodes()[0].key();
    form.add_controller(key, ControllerKind::Storage).expect("add");
    let second = form.add_controller(key, ControllerKind::Storage).expect("add");
    form.select_controller(key, ControllerKind::Storage, 0, Some("1af4:1048"))
        .expect("select");
    form.select_controller(key, ControllerKind::Storage, second, Some("1af4:1042"))
        .expect("select");

    let removed = form
        .remove_controller(key, ControllerKind::Storage)
        .expect("remove");

    assert_eq!(removed.selection(), Some("1af4:1042"));
    assert_eq!(
        form.node(key).expect("node").selected_controllers(ControllerKind::Storage),
        vec!["1af4:1048".to_string()]
    );
}

#[test]
fn controller_lists_follow_their_node_after_removals() {
    let mut form = NodeForm::new();
    let second = form.add_node_box(NodeSeed::default());
    let third = form.add_node_box(NodeSeed::default());
    form.remove_last_node().expect("remove third");
    let fourth = form.add_node_box(NodeSeed::default());

    form.add_controller(fourth, ControllerKind::Network).expect("add");
    form.select_controller(fourth, ControllerKind::Network, 0, Some("1af4:1041"))
        .expect("select");

    assert!(matches!(
        form.add_controller(third, ControllerKind::Network),
        Err(FormError::UnknownNode(key)) if key == third
    ));
    let payload = form.to_payload();
    assert_eq!(payload.node_count, 3);
    assert!(payload.nodes[1].network_controllers.is_empty());
    assert_eq!(payload.nodes[1].node_id, second.0.to_string());
    assert_eq!(payload.nodes[2].node_id, "4");
    assert_eq!(payload.nodes[2].network_controllers, vec!["1af4:1041".to_string()]);
}

#[test]
fn payload_skips_placeholder_selections() {
    let mut form = NodeForm::new();
    let first = form.nodes()[0].key();
    form.node_mut(first).expect("node").management_ip = "192.168.1.10".into();
    let second = form.add_node_box(seed("node-b", "192.168.1.11"));

    for key in [first, second] {
        form.add_controller(key, ControllerKind::Network).expect("add");
        form.add_controller(key, ControllerKind::Storage).expect("add");
        form.select_controller(key, ControllerKind::Network, 0, Some("1af4:1041"))
            .expect("select");
        form.select_controller(key, ControllerKind::Storage, 0, Some("1af4:1042"))
            .expect("select");
        form.add_controller(key, ControllerKind::Storage).expect("unselected");
    }

    let payload = form.to_payload();
    assert_eq!(payload.node_count, 2);
    for node in &payload.nodes {
        assert_eq!(node.network_controllers, vec!["1af4:1041".to_string()]);
        assert_eq!(node.storage_controllers, vec!["1af4:1042".to_string()]);
        assert_eq!(node.username, "adminuser");
        assert_eq!(node.password, "password");
    }
    assert_eq!(payload.nodes[1].node_id, "node-b");
}

#[test]
fn selecting_value_outside_catalog_is_rejected() {
    let mut form = NodeForm::new();
    let key = form.nodes()[0].key();
    form.add_controller(key, ControllerKind::Network).expect("add");

    let err = form
        .select_controller(key, ControllerKind::Network, 0, Some("1af4:1048"))
        .expect_err("storage id in network slot");
    assert!(matches!(err, FormError::UnknownControllerOption { .. }));

    let err = form
        .select_controller(key, ControllerKind::Network, 5, Some("1af4:1041"))
        .expect_err("no such slot");
    assert!(matches!(err, FormError::UnknownControllerSlot { index: 5, .. }));
}

#[test]
fn saved_payload_round_trips_through_form() {
    let mut form = NodeForm::with_credentials(NodeCredentials {
        username: "root".into(),
        password: "secret".into(),
    });
    let key = form.add_node_box(seed("node-2", "10.1.0.2"));
    form.add_controller(key, ControllerKind::Storage).expect("add");
    form.select_controller(key, ControllerKind::Storage, 0, Some("1af4:1048"))
        .expect("select");
    let saved = form.to_payload();

    let restored = NodeForm::from_payload(&saved, form.credentials().clone());

    assert_eq!(restored.to_payload(), saved);
    assert_eq!(restored.next_node_number(), 3);
}

#[test]
fn restoring_empty_payload_still_yields_one_node() {
    let restored =
        NodeForm::from_payload(&ConfigPayload::new(Vec::new()), NodeCredentials::default());
    assert_eq!(restored.len(), 1);
    assert_eq!(restored.nodes()[0].node_id, "1");
}

#[test]
fn restored_unknown_controller_values_are_kept() {
    let payload = ConfigPayload::new(vec![NodeEntry {
        node_id: "7".into(),
        management_ip: "10.0.0.7".into(),
        password: "password".into(),
        username: "adminuser".into(),
        network_controllers: vec!["8086:10d3".into()],
        storage_controllers: Vec::new(),
    }]);

    let restored = NodeForm::from_payload(&payload, NodeCredentials::default());

    assert_eq!(
        restored.to_payload().nodes[0].network_controllers,
        vec!["8086:10d3".to_string()]
    );
}
