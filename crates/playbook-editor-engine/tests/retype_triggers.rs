//! Trigger-prefix retyping: `"- "`, `"1. "`, `"[] "`, `"() "` typed at the
//! head of a plain text block convert its kind one deferred tick later.

use playbook_editor_engine::editing::{Block, BlockKind, Document, DocumentId, EditorSession};
use playbook_editor_engine::persist::MemoryRepository;
use pretty_assertions::assert_eq;
use rstest::rstest;

fn single_block_session() -> EditorSession<MemoryRepository> {
    let blocks = vec![Block::new("plain")];
    let id = DocumentId::new();
    let storage = MemoryRepository::new().with_document(id, blocks.clone());
    EditorSession::new(Document::from_records(id, "Entries", blocks), storage)
}

#[rstest]
#[case("- milk", BlockKind::UnorderedListItem, "milk")]
#[case("1. size the position", BlockKind::OrderedListItem, "size the position")]
#[case("[] check the spread", BlockKind::Checkbox, "check the spread")]
#[case("() long bias", BlockKind::Radio, "long bias")]
fn trigger_prefixes_retype_after_the_deferred_tick(
    #[case] typed: &str,
    #[case] kind: BlockKind,
    #[case] stripped: &str,
) {
    let mut session = single_block_session();
    let block = session.document().order()[0];

    session.on_content_change(block, typed);

    // Nothing changes inside the triggering event.
    let record = session.document().block(block).unwrap();
    assert_eq!(record.kind, BlockKind::Text);
    assert_eq!(record.content, typed);

    session.flush_effects(None);
    let record = session.document().block(block).unwrap();
    assert_eq!(record.kind, kind);
    assert_eq!(record.content, stripped);
}

#[rstest]
#[case("-milk")]
#[case("2. numbered differently")]
#[case("1) parenthesis")]
#[case(" - indented dash")]
#[case("")]
fn non_trigger_content_keeps_the_block_plain(#[case] typed: &str) {
    let mut session = single_block_session();
    let block = session.document().order()[0];

    session.on_content_change(block, typed);
    assert!(!session.has_pending_effects());

    session.flush_effects(None);
    let record = session.document().block(block).unwrap();
    assert_eq!(record.kind, BlockKind::Text);
    assert_eq!(record.content, typed);
}

#[test]
fn the_prefix_is_stripped_exactly_once() {
    let mut session = single_block_session();
    let block = session.document().order()[0];

    session.on_content_change(block, "- - double dash");
    session.flush_effects(None);

    let record = session.document().block(block).unwrap();
    assert_eq!(record.kind, BlockKind::UnorderedListItem);
    assert_eq!(record.content, "- double dash");

    // A second flush has nothing left to apply.
    session.flush_effects(None);
    assert_eq!(
        session.document().block(block).unwrap().content,
        "- double dash"
    );
}

#[test]
fn checkbox_triggers_start_unchecked() {
    let mut session = single_block_session();
    let block = session.document().order()[0];
    session.on_content_change(block, "[] confirm the stop");
    session.flush_effects(None);
    assert_eq!(session.document().block(block).unwrap().checked, Some(false));
}

#[test]
fn editing_away_the_prefix_before_the_tick_cancels_the_retype() {
    let mut session = single_block_session();
    let block = session.document().order()[0];

    session.on_content_change(block, "- milk");
    session.on_content_change(block, "no longer a list");
    session.flush_effects(None);

    let record = session.document().block(block).unwrap();
    assert_eq!(record.kind, BlockKind::Text);
    assert_eq!(record.content, "no longer a list");
}

#[test]
fn typed_blocks_do_not_retrigger_on_their_own_content() {
    let mut session = single_block_session();
    let block = session.document().order()[0];

    session.on_content_change(block, "- milk");
    session.flush_effects(None);

    // The list item's content now legitimately starts with a dash.
    session.on_content_change(block, "- milk and eggs");
    assert!(!session.has_pending_effects());
    session.flush_effects(None);
    let record = session.document().block(block).unwrap();
    assert_eq!(record.kind, BlockKind::UnorderedListItem);
    assert_eq!(record.content, "- milk and eggs");
}

#[test]
fn the_stored_record_reflects_the_retype() {
    let mut session = single_block_session();
    let block = session.document().order()[0];
    session.on_content_change(block, "1. first entry");
    session.flush_effects(None);

    let stored = session.storage().blocks(session.document().id()).unwrap();
    assert_eq!(stored[0].kind, BlockKind::OrderedListItem);
    assert_eq!(stored[0].content, "first entry");
}
