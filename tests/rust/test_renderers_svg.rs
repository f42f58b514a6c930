use super::*;
use crate::build_view;
use crate::model::{Document, OriginLink, TreeData};

fn view(data: &TreeData) -> ChainView {
    build_view(data, &LayoutConfig::default()).unwrap()
}

fn ambiguous() -> TreeData {
    let mut shared = Document::from_code(4, "M4");
    shared.is_compartilhado = true;
    TreeData::new(
        vec![
            Document::from_code(1, "M1"),
            Document::from_code(3, "T3"),
            shared,
            Document::from_code(5, "M5"),
        ],
        vec![
            OriginLink::new(3, 1),
            OriginLink::new(4, 1),
            OriginLink::chosen(5, 3, true),
            OriginLink::chosen(5, 4, false),
        ],
    )
}

// ── Helpers ───────────────────────────────────────────────────────────────

#[test]
fn test_escape() {
    assert_eq!(escape(r#"<M&"1">"#), "&lt;M&amp;&quot;1&quot;&gt;");
}

// ── Document ──────────────────────────────────────────────────────────────

#[test]
fn test_one_card_per_document() {
    let svg = SvgRenderer::new().render(&view(&ambiguous()));
    assert!(svg.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\""));
    assert!(svg.ends_with("</svg>"));
    assert_eq!(svg.matches(r#"<g class="documento""#).count(), 4);
    for code in ["M1", "T3", "M4", "M5"] {
        assert!(svg.contains(&format!(">{code}</text>")), "missing {code}");
    }
}

#[test]
fn test_kinds_and_shared_styled_differently() {
    let svg = SvgRenderer::new().render(&view(&ambiguous()));
    assert!(svg.contains(MATRICULA_FILL));
    assert!(svg.contains(TRANSCRICAO_FILL));
    assert_eq!(svg.matches(SHARED_STROKE).count(), 1);
}

#[test]
fn test_auxiliary_link_dashed() {
    let svg = SvgRenderer::new().render(&view(&ambiguous()));
    assert_eq!(svg.matches("<line ").count(), 4);
    assert_eq!(svg.matches(r#"stroke-dasharray="6 4""#).count(), 1);
}

#[test]
fn test_recording_count_label() {
    let mut root = Document::from_code(1, "M1");
    root.total_lancamentos = 1;
    let mut child = Document::from_code(2, "M2");
    child.total_lancamentos = 7;
    let svg = SvgRenderer::new().render(&view(&TreeData::new(
        vec![root, child],
        vec![OriginLink::new(2, 1)],
    )));
    assert!(svg.contains(">1 lançamento</text>"));
    assert!(svg.contains(">7 lançamentos</text>"));
}

// ── Transform ─────────────────────────────────────────────────────────────

#[test]
fn test_plain_renderer_has_no_transform() {
    let svg = SvgRenderer::new().render(&view(&ambiguous()));
    assert!(!svg.contains("<g transform"));
}

#[test]
fn test_fitted_renderer_uses_viewport() {
    let config = LayoutConfig::default();
    let svg = SvgRenderer::fitted(&config).render(&view(&ambiguous()));
    assert!(svg.contains(r#"width="1200" height="800""#));
    assert!(svg.contains(r#"<g transform="translate("#));
}

#[test]
fn test_explicit_transform() {
    let t = Transform {
        scale: 0.5,
        tx: 10.0,
        ty: 0.0,
    };
    let svg = SvgRenderer::with_transform(640.0, 480.0, t).render(&view(&ambiguous()));
    assert!(svg.contains(r#"<g transform="translate(10.00,0.00) scale(0.5000)">"#));
}
