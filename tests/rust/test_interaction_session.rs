use super::*;
use crate::interaction::backend::MemoryBackend;
use crate::model::{Document, OriginCandidate, OriginLink};

fn ambiguous() -> TreeData {
    TreeData::new(
        vec![
            Document::from_code(1, "M1"),
            Document::from_code(2, "M2"),
            Document::from_code(3, "M3"),
            Document::from_code(4, "M4"),
            Document::from_code(5, "M5"),
        ],
        vec![
            OriginLink::new(3, 1),
            OriginLink::new(2, 1),
            OriginLink::new(4, 2),
            OriginLink::chosen(5, 4, true),
            OriginLink::chosen(5, 3, false),
        ],
    )
}

fn open(data: TreeData) -> GraphSession<MemoryBackend> {
    GraphSession::open(
        MemoryBackend::new(data),
        ChainScope::new(1, 1),
        LayoutConfig::default(),
    )
    .unwrap()
}

fn chosen_origin_code(session: &GraphSession<MemoryBackend>, code: &str) -> Option<String> {
    session
        .view()
        .table
        .row(code)
        .and_then(|row| row.chosen_origin.clone())
}

fn level_of(session: &GraphSession<MemoryBackend>, code: &str) -> u32 {
    session.view().table.row(code).unwrap().level
}

// ── Choose origin ─────────────────────────────────────────────────────────

#[test]
fn test_choose_origin_rebuilds_chain() {
    let mut session = open(ambiguous());
    assert_eq!(chosen_origin_code(&session, "M5").as_deref(), Some("M4"));
    assert_eq!(level_of(&session, "M5"), 3);

    session.choose_origin("M5", "M3").unwrap();
    assert_eq!(chosen_origin_code(&session, "M5").as_deref(), Some("M3"));
    assert_eq!(level_of(&session, "M5"), 2);

    // The other candidate is kept, not deleted.
    let row = session.view().table.row("M5").unwrap();
    assert_eq!(row.origins, vec!["M4", "M3"]);
    assert_eq!(session.snapshot().conexoes.len(), 5);

    let notices = session.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Info);
    assert!(session.notices().is_empty());
}

#[test]
fn test_choose_origin_validates_candidate() {
    let mut session = open(ambiguous());
    assert!(matches!(
        session.choose_origin("M5", "M2"),
        Err(ChainError::UnknownOrigin { .. })
    ));
    assert!(matches!(
        session.choose_origin("M99", "M3"),
        Err(ChainError::UnknownDocument(_))
    ));
    assert!(!session.is_saving());
}

#[test]
fn test_server_failure_keeps_previous_chain() {
    let mut session = open(ambiguous());
    let before = session.view().clone();
    session.backend().fail_next(BackendError::Status {
        status: 500,
        message: "Internal Server Error".to_string(),
    });

    let err = session.choose_origin("M5", "M3").unwrap_err();
    assert!(matches!(
        err,
        ChainError::Network {
            source: BackendError::Status { status: 500, .. }
        }
    ));
    assert_eq!(session.view(), &before);
    assert_eq!(chosen_origin_code(&session, "M5").as_deref(), Some("M4"));
    assert_eq!(
        session.state(&MutationTarget::Document(DocumentId(5))),
        SaveState::Idle
    );
    let notices = session.notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Error);
    assert!(notices[0].message.contains("500"));

    // The control is usable again.
    session.choose_origin("M5", "M3").unwrap();
    assert_eq!(chosen_origin_code(&session, "M5").as_deref(), Some("M3"));
}

#[test]
fn test_rejected_reply_surfaces_message() {
    let mut session = open(ambiguous());
    session
        .backend()
        .fail_next(BackendError::Rejected("documento bloqueado".to_string()));
    let err = session.choose_origin("M5", "M3").unwrap_err();
    assert!(err.to_string().contains("documento bloqueado"));
}

// ── Single flight ─────────────────────────────────────────────────────────

#[test]
fn test_concurrent_mutation_on_same_document_rejected() {
    let mut session = open(ambiguous());
    let ticket = session
        .begin(Mutation::ChooseOrigin {
            document: DocumentId(5),
            origin: "M3".to_string(),
        })
        .unwrap();
    assert_eq!(
        session.state(&MutationTarget::Document(DocumentId(5))),
        SaveState::Saving
    );

    let second = session.begin(Mutation::SetLevel {
        document: DocumentId(5),
        level: Some(1),
    });
    assert!(matches!(second, Err(ChainError::ConcurrentMutation { .. })));

    // A different document is not blocked.
    let other = session
        .begin(Mutation::SetLevel {
            document: DocumentId(2),
            level: Some(3),
        })
        .unwrap();

    let outcome = session.send(&ticket);
    session.finish(ticket, outcome).unwrap();
    let outcome = session.send(&other);
    session.finish(other, outcome).unwrap();
    assert!(!session.is_saving());
    assert_eq!(chosen_origin_code(&session, "M5").as_deref(), Some("M3"));
    assert_eq!(level_of(&session, "M2"), 3);
}

#[test]
fn test_failed_outcome_unlocks_target() {
    let mut session = open(ambiguous());
    let ticket = session
        .begin(Mutation::SetLevel {
            document: DocumentId(3),
            level: Some(6),
        })
        .unwrap();
    let result = session.finish(ticket, Err(BackendError::Transport("timeout".to_string())));
    assert!(result.is_err());
    assert_eq!(
        session.state(&MutationTarget::Document(DocumentId(3))),
        SaveState::Idle
    );
    assert_eq!(level_of(&session, "M3"), 1);
}

// ── Manual level ──────────────────────────────────────────────────────────

#[test]
fn test_manual_level_set_and_cleared() {
    let mut session = open(ambiguous());
    assert_eq!(level_of(&session, "M2"), 1);

    session.set_manual_level("M2", Some(4)).unwrap();
    assert_eq!(level_of(&session, "M2"), 4);
    assert_eq!(
        session.snapshot().document(DocumentId(2)).unwrap().nivel_manual,
        Some(4)
    );

    session.set_manual_level("M2", None).unwrap();
    assert_eq!(level_of(&session, "M2"), 1);
}

#[test]
fn test_manual_level_out_of_range_rejected_before_sending() {
    let mut session = open(ambiguous());
    for bad in [-1, 11] {
        assert!(matches!(
            session.set_manual_level("M2", Some(bad)),
            Err(ChainError::InvalidLevel { .. })
        ));
    }
    assert_eq!(
        session.backend().snapshot().document(DocumentId(2)).unwrap().nivel_manual,
        None
    );
    assert!(session.notices().is_empty());
}

// ── Origin documents ──────────────────────────────────────────────────────

#[test]
fn test_create_origin_document() {
    let mut data = ambiguous();
    data.origens_identificadas = vec![
        OriginCandidate {
            codigo: "T40".to_string(),
            ja_criado: false,
            documento_id: None,
            referenciado_por: Some(DocumentId(1)),
        },
        OriginCandidate {
            codigo: "M2".to_string(),
            ja_criado: true,
            documento_id: Some(DocumentId(2)),
            referenciado_por: Some(DocumentId(4)),
        },
    ];
    let mut session = open(data);

    session.create_origin_document("T40").unwrap();
    let created = session.snapshot().document_by_code("T40").unwrap().id;
    assert_eq!(chosen_origin_code(&session, "M1").as_deref(), Some("T40"));
    assert_eq!(session.view().levels.root, created);

    assert!(matches!(
        session.create_origin_document("T40"),
        Err(ChainError::DuplicateCode { .. })
    ));
    assert!(matches!(
        session.create_origin_document("M2"),
        Err(ChainError::DuplicateCode { .. })
    ));
    assert!(matches!(
        session.create_origin_document("T404"),
        Err(ChainError::UnknownDocument(_))
    ));
}

// ── View state ────────────────────────────────────────────────────────────

#[test]
fn test_open_fits_view() {
    let session = open(ambiguous());
    let bounds = session.view().layout.bounds.unwrap();
    let config = LayoutConfig::default();
    let expected = crate::layout::viewport::fit_to_viewport(
        &bounds,
        &config.viewport,
        config.fit_margin,
        &config.zoom,
    );
    assert_eq!(session.render_state().transform, expected);
}

#[test]
fn test_user_transform_survives_mutation() {
    let mut session = open(ambiguous());
    session.render_state_mut().pan(15.0, 0.0);
    let transform = session.render_state().transform;
    session.set_manual_level("M3", Some(2)).unwrap();
    assert_eq!(session.render_state().transform, transform);
}
