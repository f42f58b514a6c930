use super::*;
use crate::model::{Document, OriginLink, TreeData};

fn assign(docs: Vec<Document>, links: Vec<OriginLink>) -> LevelAssignment {
    let graph = ChainGraph::from_tree_data(&TreeData::new(docs, links)).unwrap();
    LevelAssignment::assign(&graph).unwrap()
}

fn lvl(a: &LevelAssignment, id: i64) -> u32 {
    a.level(DocumentId(id)).unwrap()
}

// ── Automatic levels ──────────────────────────────────────────────────────

#[test]
fn test_root_with_two_children() {
    let a = assign(
        vec![
            Document::from_code(1, "M1"),
            Document::from_code(2, "M2"),
            Document::from_code(3, "T1"),
        ],
        vec![OriginLink::new(2, 1), OriginLink::new(3, 1)],
    );
    assert_eq!(a.root, DocumentId(1));
    assert_eq!((lvl(&a, 1), lvl(&a, 2), lvl(&a, 3)), (0, 1, 1));
    assert_eq!(a.groups[&1], vec![DocumentId(2), DocumentId(3)]);
    assert_eq!(a.level_count(), 2);
    assert!(a.diagnostics.is_empty());
}

#[test]
fn test_level_follows_chosen_origin_only() {
    // M5 references M4 (level 2) and M3 (level 1); the chosen one decides.
    let docs = || {
        vec![
            Document::from_code(1, "M1"),
            Document::from_code(3, "M3"),
            Document::from_code(2, "M2"),
            Document::from_code(4, "M4"),
            Document::from_code(5, "M5"),
        ]
    };
    let a = assign(
        docs(),
        vec![
            OriginLink::new(3, 1),
            OriginLink::new(2, 1),
            OriginLink::new(4, 2),
            OriginLink::chosen(5, 3, true),
            OriginLink::chosen(5, 4, false),
        ],
    );
    assert_eq!(lvl(&a, 5), 2);

    let a = assign(
        docs(),
        vec![
            OriginLink::new(3, 1),
            OriginLink::new(2, 1),
            OriginLink::new(4, 2),
            OriginLink::chosen(5, 3, false),
            OriginLink::chosen(5, 4, true),
        ],
    );
    assert_eq!(lvl(&a, 5), 3);
}

#[test]
fn test_groups_keep_input_order() {
    let a = assign(
        vec![
            Document::from_code(1, "M1"),
            Document::from_code(9, "T9"),
            Document::from_code(2, "M2"),
        ],
        vec![OriginLink::new(9, 1), OriginLink::new(2, 1)],
    );
    assert_eq!(a.groups[&1], vec![DocumentId(9), DocumentId(2)]);
}

// ── Overrides ─────────────────────────────────────────────────────────────

#[test]
fn test_manual_override_is_authoritative() {
    let mut pinned = Document::from_code(2, "M2");
    pinned.nivel_manual = Some(4);
    let a = assign(
        vec![Document::from_code(1, "M1"), pinned, Document::from_code(3, "M3")],
        vec![OriginLink::new(2, 1), OriginLink::new(3, 2)],
    );
    assert_eq!(lvl(&a, 2), 4);
    assert_eq!(a.sources[&DocumentId(2)], LevelSource::Manual);
    // Not propagated: M3 keeps its automatic level.
    assert_eq!(lvl(&a, 3), 2);
    assert_eq!(a.sources[&DocumentId(3)], LevelSource::Automatic);
}

#[test]
fn test_declared_level_used_when_not_pinned() {
    let mut declared = Document::from_code(2, "M2");
    declared.nivel = Some(6);
    let a = assign(
        vec![Document::from_code(1, "M1"), declared],
        vec![OriginLink::new(2, 1)],
    );
    assert_eq!(lvl(&a, 2), 6);
    assert_eq!(a.sources[&DocumentId(2)], LevelSource::Declared);
}

#[test]
fn test_manual_beats_declared() {
    let mut doc = Document::from_code(2, "M2");
    doc.nivel = Some(6);
    doc.nivel_manual = Some(0);
    let a = assign(
        vec![Document::from_code(1, "M1"), doc],
        vec![OriginLink::new(2, 1)],
    );
    assert_eq!(lvl(&a, 2), 0);
}

#[test]
fn test_out_of_range_manual_level_is_rejected() {
    for bad in [-1, 11] {
        let mut doc = Document::from_code(2, "M2");
        doc.nivel_manual = Some(bad);
        let graph = ChainGraph::from_tree_data(&TreeData::new(
            vec![Document::from_code(1, "M1"), doc],
            vec![OriginLink::new(2, 1)],
        ))
        .unwrap();
        let err = LevelAssignment::assign(&graph).err().unwrap();
        assert!(
            matches!(err, ChainError::InvalidLevel { document, level } if document == DocumentId(2) && level == bad)
        );
    }
}

#[test]
fn test_validate_manual_level_bounds() {
    assert_eq!(validate_manual_level(DocumentId(1), 0).unwrap(), 0);
    assert_eq!(validate_manual_level(DocumentId(1), 10).unwrap(), 10);
    assert!(validate_manual_level(DocumentId(1), 11).is_err());
}

// ── Disconnected documents ────────────────────────────────────────────────

#[test]
fn test_orphan_placed_at_zero_and_reported() {
    let a = assign(
        vec![
            Document::from_code(1, "M1"),
            Document::from_code(2, "M2"),
            Document::from_code(7, "M7"),
        ],
        vec![OriginLink::new(2, 1)],
    );
    assert_eq!(lvl(&a, 7), 0);
    assert_eq!(
        a.diagnostics,
        vec![Diagnostic::Orphan {
            document: DocumentId(7)
        }]
    );
}

#[test]
fn test_separate_component_keeps_its_own_distance() {
    let a = assign(
        vec![
            Document::from_code(1, "M1"),
            Document::from_code(2, "M2"),
            Document::from_code(10, "T10"),
            Document::from_code(11, "T11"),
        ],
        vec![OriginLink::new(2, 1), OriginLink::new(11, 10)],
    );
    assert_eq!(a.root, DocumentId(1));
    assert_eq!(lvl(&a, 10), 0);
    assert_eq!(lvl(&a, 11), 1);
    assert!(a.diagnostics.is_empty());
}
