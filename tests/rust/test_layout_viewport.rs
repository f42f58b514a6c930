use super::*;

fn bounds(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Bounds {
    Bounds {
        min_x,
        min_y,
        max_x,
        max_y,
    }
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

// ── Transform ─────────────────────────────────────────────────────────────

#[test]
fn test_invert_undoes_apply() {
    let t = Transform {
        scale: 2.5,
        tx: -30.0,
        ty: 12.0,
    };
    let p = Point::new(17.0, -4.0);
    let back = t.invert(t.apply(p));
    assert!(close(back.x, p.x) && close(back.y, p.y));
}

#[test]
fn test_svg_attribute() {
    let t = Transform {
        scale: 0.5,
        tx: 10.0,
        ty: 20.25,
    };
    assert_eq!(t.to_svg(), "translate(10.00,20.25) scale(0.5000)");
    assert_eq!(Transform::default(), Transform::identity());
}

// ── fit_to_viewport ───────────────────────────────────────────────────────

#[test]
fn test_fit_centres_and_scales() {
    let t = fit_to_viewport(
        &bounds(0.0, 0.0, 400.0, 200.0),
        &Viewport::default(),
        40.0,
        &ZoomLimits::default(),
    );
    assert!(close(t.scale, 2.8));
    let centre = t.apply(Point::new(200.0, 100.0));
    assert!(close(centre.x, 600.0) && close(centre.y, 400.0));
}

#[test]
fn test_fit_scale_clamped_to_limits() {
    let zoom = ZoomLimits::default();
    let tiny = fit_to_viewport(&bounds(0.0, 0.0, 10.0, 10.0), &Viewport::default(), 40.0, &zoom);
    assert_eq!(tiny.scale, 3.0);
    let huge = fit_to_viewport(
        &bounds(0.0, 0.0, 24_000.0, 100.0),
        &Viewport::default(),
        40.0,
        &zoom,
    );
    assert_eq!(huge.scale, 0.1);
}

#[test]
fn test_fitted_content_stays_inside_margins() {
    let b = bounds(-300.0, 50.0, 900.0, 1400.0);
    let t = fit_to_viewport(&b, &Viewport::default(), 40.0, &ZoomLimits::default());
    let tl = t.apply(Point::new(b.min_x, b.min_y));
    let br = t.apply(Point::new(b.max_x, b.max_y));
    assert!(tl.x >= 40.0 - 1e-9 && tl.y >= 40.0 - 1e-9);
    assert!(br.x <= 1160.0 + 1e-9 && br.y <= 760.0 + 1e-9);
}

// ── RenderState ───────────────────────────────────────────────────────────

#[test]
fn test_zoom_at_keeps_focus_fixed() {
    let mut state = RenderState::new(&LayoutConfig::default());
    state.pan(25.0, -10.0);
    let focus = Point::new(300.0, 200.0);
    let before = state.transform.invert(focus);
    state.zoom_at(1.5, focus);
    let after = state.transform.invert(focus);
    assert!(close(before.x, after.x) && close(before.y, after.y));
    assert!(close(state.scale(), 1.5));
}

#[test]
fn test_zoom_by_clamps() {
    let mut state = RenderState::new(&LayoutConfig::default());
    for _ in 0..20 {
        state.zoom_by(2.0);
    }
    assert_eq!(state.scale(), 3.0);
    for _ in 0..40 {
        state.zoom_by(0.5);
    }
    assert_eq!(state.scale(), 0.1);
}

#[test]
fn test_pan_fit_and_reset() {
    let mut state = RenderState::new(&LayoutConfig::default());
    state.pan(10.0, 5.0);
    assert_eq!((state.transform.tx, state.transform.ty), (10.0, 5.0));

    let b = bounds(0.0, 0.0, 400.0, 200.0);
    state.fit(&b);
    assert_eq!(
        state.transform,
        fit_to_viewport(&b, &state.viewport, 40.0, &ZoomLimits::default())
    );

    state.reset();
    assert_eq!(state.transform, Transform::identity());
}
