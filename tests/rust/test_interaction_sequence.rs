use super::*;
use crate::model::Document;

fn selection(ids: &[i64]) -> SequenceSelection {
    let mut s = SequenceSelection::new();
    for id in ids {
        s.add(DocumentId(*id));
    }
    s
}

fn order(s: &SequenceSelection) -> Vec<i64> {
    s.items().iter().map(|id| id.0).collect()
}

// ── Editing ───────────────────────────────────────────────────────────────

#[test]
fn test_add_ignores_duplicates() {
    let mut s = selection(&[3, 1]);
    assert!(!s.add(DocumentId(3)));
    assert_eq!(order(&s), vec![3, 1]);
    assert_eq!(s.len(), 2);
}

#[test]
fn test_move_up_and_down() {
    let mut s = selection(&[1, 2, 3]);
    assert!(s.move_up(2));
    assert_eq!(order(&s), vec![1, 3, 2]);
    assert!(s.move_down(0));
    assert_eq!(order(&s), vec![3, 1, 2]);
    assert!(!s.move_up(0));
    assert!(!s.move_down(2));
    assert!(!s.move_up(9));
    assert_eq!(order(&s), vec![3, 1, 2]);
}

#[test]
fn test_drag_and_drop() {
    let mut s = selection(&[1, 2, 3, 4]);
    assert!(s.move_to(0, 3));
    assert_eq!(order(&s), vec![2, 3, 4, 1]);
    assert!(s.move_to(3, 1));
    assert_eq!(order(&s), vec![2, 1, 3, 4]);
    assert!(!s.move_to(1, 1));
    assert!(!s.move_to(0, 4));
}

#[test]
fn test_remove_and_clear() {
    let mut s = selection(&[1, 2, 3]);
    assert!(s.remove(DocumentId(2)));
    assert!(!s.remove(DocumentId(2)));
    assert_eq!(order(&s), vec![1, 3]);
    s.clear();
    assert!(s.is_empty());
}

// ── Export ────────────────────────────────────────────────────────────────

#[test]
fn test_query_encodes_order() {
    let s = selection(&[3, 1, 2]);
    assert_eq!(s.query(), "documentos=3%2C1%2C2");
}

#[test]
fn test_export_consumes_selection() {
    let mut s = selection(&[5, 4]);
    let endpoint = Url::parse("https://cartorio.example/dominial/exportar-pdf/?imovel=9").unwrap();
    let url = s.export(&endpoint);
    assert!(s.is_empty());
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    assert_eq!(
        pairs,
        vec![
            ("imovel".to_string(), "9".to_string()),
            ("documentos".to_string(), "5,4".to_string()),
        ]
    );
}

#[test]
fn test_from_codes_resolves_in_order() {
    let data = TreeData::new(
        vec![
            Document::from_code(10, "M1"),
            Document::from_code(20, "T2"),
            Document::from_code(30, "M3"),
        ],
        vec![],
    );
    let s = SequenceSelection::from_codes(&data, &["M3", " M1 ", "M3"]).unwrap();
    assert_eq!(order(&s), vec![30, 10]);
    let err = SequenceSelection::from_codes(&data, &["M9"]).unwrap_err();
    assert!(matches!(err, ChainError::UnknownDocument(code) if code == "M9"));
}
