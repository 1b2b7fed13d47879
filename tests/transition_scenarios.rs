use guido_motion::animation::effective_transition_timing;
use guido_motion::prelude::*;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

/// Screen with a header, a recycling list of cells and a floating button.
struct Screen {
    tree: Tree,
    root: NodeId,
    header: NodeId,
    list: NodeId,
    cells: Vec<NodeId>,
    button: NodeId,
}

fn build_screen() -> Screen {
    let mut tree = Tree::new();
    let root = tree.insert(Node::plain().with_size(360.0, 640.0));

    let header = tree.insert(
        Node::plain()
            .with_size(360.0, 56.0)
            .with_fill(Color::from_hex(0x3F51B5)),
    );
    tree.add_child(root, header);

    let list = tree.insert(
        Node::new(NodeKind::RecyclingList)
            .with_position(0.0, 56.0)
            .with_size(360.0, 584.0),
    );
    tree.add_child(root, list);

    let mut cells = Vec::new();
    for row in 0..4 {
        let mut cell = Node::new(NodeKind::ListCell)
            .with_position(0.0, row as f32 * 72.0)
            .with_size(360.0, 72.0);
        // the last cell is parked for reuse
        if row == 3 {
            cell = cell.hidden();
        }
        let id = tree.insert(cell);
        tree.add_child(list, id);
        cells.push(id);
    }

    let button = tree.insert(
        Node::plain()
            .with_position(284.0, 564.0)
            .with_size(56.0, 56.0)
            .hidden(),
    );
    tree.add_child(root, button);

    Screen {
        tree,
        root,
        header,
        list,
        cells,
        button,
    }
}

#[test]
fn participating_nodes_skip_recycled_cells() {
    init_logging();
    let screen = build_screen();

    let nodes = flatten_hierarchy(&screen.tree, screen.root);
    assert_eq!(
        nodes,
        vec![
            screen.root,
            screen.header,
            screen.list,
            screen.cells[0],
            screen.cells[1],
            screen.cells[2],
            // the hidden button is not in a managed container, so it may fade in
            screen.button,
        ]
    );
}

#[test]
fn disabling_a_branch_removes_it() {
    init_logging();
    let mut screen = build_screen();
    screen.tree.set_motion_enabled(screen.list, false);

    let nodes = flatten_hierarchy(&screen.tree, screen.root);
    assert_eq!(nodes, vec![screen.root, screen.header, screen.button]);

    screen.tree.set_motion_enabled(screen.root, false);
    assert!(flatten_hierarchy(&screen.tree, screen.root).is_empty());
}

#[test]
fn matched_nodes_get_a_duration_from_their_movement() {
    init_logging();
    let mut from_screen = build_screen();
    let mut to_screen = build_screen();

    from_screen
        .tree
        .set_motion_identifier(from_screen.cells[1], Some("avatar".into()));
    to_screen
        .tree
        .set_motion_identifier(to_screen.header, Some("avatar".into()));
    to_screen.tree.set_motion_transitions(
        to_screen.header,
        Some(vec![
            TransitionSpec::source("avatar"),
            TransitionSpec::timing_function_named("standard").unwrap(),
        ]),
    );

    let source = from_screen
        .tree
        .find_by_identifier(from_screen.root, "avatar")
        .unwrap();
    let target = to_screen
        .tree
        .find_by_identifier(to_screen.root, "avatar")
        .unwrap();

    let from = from_screen.tree.geometry_snapshot(source).unwrap();
    let to = to_screen.tree.geometry_snapshot(target).unwrap();
    let seconds = estimate_duration(&from, Some(&to));
    let config = DurationConfig::default();
    assert!(seconds > config.base_seconds && seconds <= config.max_seconds());

    let curve = effective_transition_timing(to_screen.tree.motion_transitions(target).unwrap())
        .unwrap();
    assert_eq!(curve.kind, TimingFunctionKind::Standard);
    assert_eq!(curve.control_points(), (0.4, 0.0, 0.2, 1.0));
}

#[test]
fn horizontal_move_takes_308_ms() {
    let from = GeometrySnapshot::new(Point::new(0.0, 0.0), Size::new(100.0, 50.0));
    let to = GeometrySnapshot::new(Point::new(300.0, 0.0), Size::new(100.0, 50.0));
    assert!(approx_eq(estimate_duration(&from, Some(&to)), 0.308));
    assert!(approx_eq(estimate_duration(&to, Some(&from)), 0.308));
}

#[test]
fn large_growth_saturates_at_the_cap() {
    let from = GeometrySnapshot::new(Point::new(10.0, 10.0), Size::new(0.0, 0.0));
    let to = GeometrySnapshot::new(Point::new(10.0, 10.0), Size::new(500.0, 500.0));
    let seconds = estimate_duration(&from, Some(&to));
    assert!((seconds - 0.375).abs() < 1e-3);

    let bigger = GeometrySnapshot::new(Point::new(10.0, 10.0), Size::new(1000.0, 1000.0));
    assert_eq!(estimate_duration(&from, Some(&bigger)), seconds);
}

#[test]
fn unknown_curve_names_fall_back() {
    let requested = ["sharp", "bouncy", "EaseIn"];
    let resolved: Vec<&TimingCurve> = requested
        .iter()
        .map(|name| {
            TimingCurve::from_name(name)
                .unwrap_or_else(|| TimingCurve::for_kind(TimingFunctionKind::EaseInOut))
        })
        .collect();

    assert_eq!(resolved[0].kind, TimingFunctionKind::Sharp);
    assert_eq!(resolved[1].kind, TimingFunctionKind::EaseInOut);
    assert_eq!(resolved[2].kind, TimingFunctionKind::EaseInOut);
}

#[test]
fn departing_node_is_replaced_by_a_snapshot() {
    init_logging();
    let mut screen = build_screen();
    let header = screen.header;

    let proxy = snapshot_node(&mut screen.tree, header, &SnapshotConfig::default()).unwrap();
    screen.tree.remove(header);
    screen.tree.add_child(screen.root, proxy);

    let snapshot = render_snapshot(&screen.tree, proxy, &SnapshotConfig::default()).unwrap();
    assert_eq!(snapshot.image.dimensions(), (360, 56));
    assert_eq!(snapshot.image.get_pixel(180, 28).0, [0x3F, 0x51, 0xB5, 0xFF]);

    let nodes = flatten_hierarchy(&screen.tree, screen.root);
    assert!(nodes.contains(&proxy));
    assert!(!nodes.contains(&header));
}

#[test]
fn snapshot_failure_keeps_live_node() {
    init_logging();
    let mut screen = build_screen();
    let empty = screen.tree.insert(Node::plain());
    screen.tree.add_child(screen.root, empty);
    let count = screen.tree.node_count();

    let result = snapshot_node(&mut screen.tree, empty, &SnapshotConfig::default());
    assert!(matches!(result, Err(SnapshotError::SurfaceAllocation { .. })));
    assert_eq!(screen.tree.node_count(), count);
    assert!(flatten_hierarchy(&screen.tree, screen.root).contains(&empty));
}

#[test]
fn removing_a_screen_releases_every_state() {
    let mut screen = build_screen();
    for &cell in &screen.cells {
        screen.tree.set_motion_alpha(cell, Some(0.0));
    }
    assert!(screen.tree.has_transition_state(screen.cells[0]));

    screen.tree.remove(screen.root);
    assert!(screen.tree.is_empty());
    for &cell in &screen.cells {
        assert!(screen.tree.peek_transition_state(cell).is_none());
    }
}
