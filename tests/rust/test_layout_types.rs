use super::*;

fn card(x: f64, y: f64) -> LayoutNode {
    LayoutNode {
        id: DocumentId(1),
        code: "M1".to_string(),
        kind: DocumentKind::Matricula,
        level: 0,
        x,
        y,
        width: 100.0,
        height: 40.0,
        recordings: 0,
        shared: false,
    }
}

// ── Anchors ───────────────────────────────────────────────────────────────

#[test]
fn test_vertical_anchors() {
    let c = card(10.0, 20.0);
    assert_eq!(c.center(), Point::new(60.0, 40.0));
    assert_eq!(c.outgoing_anchor(Orientation::Vertical), Point::new(60.0, 60.0));
    assert_eq!(c.incoming_anchor(Orientation::Vertical), Point::new(60.0, 20.0));
}

#[test]
fn test_horizontal_anchors() {
    let c = card(10.0, 20.0);
    assert_eq!(c.outgoing_anchor(Orientation::Horizontal), Point::new(110.0, 40.0));
    assert_eq!(c.incoming_anchor(Orientation::Horizontal), Point::new(10.0, 40.0));
}

// ── Connector ─────────────────────────────────────────────────────────────

#[test]
fn test_connector_length_and_angle() {
    let c = Connector::between(
        DocumentId(1),
        DocumentId(2),
        Point::new(0.0, 0.0),
        Point::new(30.0, 40.0),
        ConnectorStyle::Solid,
    );
    assert_eq!(c.length, 50.0);
    assert!((c.angle - 53.130_102_354).abs() < 1e-6);

    let down = Connector::between(
        DocumentId(1),
        DocumentId(2),
        Point::new(5.0, 0.0),
        Point::new(5.0, 10.0),
        ConnectorStyle::Dashed,
    );
    assert!((down.angle - 90.0).abs() < 1e-9);
}

#[test]
fn test_point_distance() {
    assert_eq!(Point::new(1.0, 1.0).distance_to(&Point::new(4.0, 5.0)), 5.0);
}

// ── Bounds ────────────────────────────────────────────────────────────────

#[test]
fn test_bounds_of_nodes() {
    assert_eq!(Bounds::of_nodes(&[]), None);
    let b = Bounds::of_nodes(&[card(10.0, 20.0), card(-50.0, 100.0)]).unwrap();
    assert_eq!((b.min_x, b.min_y, b.max_x, b.max_y), (-50.0, 20.0, 110.0, 140.0));
    assert_eq!(b.width(), 160.0);
    assert_eq!(b.height(), 120.0);
}

#[test]
fn test_result_lookup() {
    let mut r = LayoutResult::new(LayoutMode::Rows, Orientation::Vertical);
    assert!(r.node(DocumentId(1)).is_none());
    r.nodes.push(card(0.0, 0.0));
    assert_eq!(r.node(DocumentId(1)).unwrap().code, "M1");
}
