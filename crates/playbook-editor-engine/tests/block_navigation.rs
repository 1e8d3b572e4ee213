//! Cross-block navigation: a sequence of blocks behaving like one document.

use playbook_editor_engine::editing::{
    Block, BlockId, BlockKind, Document, DocumentId, EditorSession, Key, KeyEvent,
};
use playbook_editor_engine::geometry::{
    CaretPosition, MonospaceLayout, TextLayout, position_from_selection, visual_line_rects,
};
use playbook_editor_engine::persist::MemoryRepository;
use pretty_assertions::assert_eq;

const WIDTH: usize = 10;

fn open_session(contents: &[&str]) -> EditorSession<MemoryRepository> {
    let blocks: Vec<Block> = contents.iter().map(|content| Block::new(*content)).collect();
    let id = DocumentId::new();
    let storage = MemoryRepository::new().with_document(id, blocks.clone());
    EditorSession::new(Document::from_records(id, "Entries", blocks), storage)
}

fn rendered(session: &EditorSession<MemoryRepository>, block: BlockId) -> MonospaceLayout {
    let content = session.document().block(block).unwrap().content.clone();
    MonospaceLayout::new(content, WIDTH)
}

fn outline(session: &EditorSession<MemoryRepository>) -> String {
    session
        .document()
        .blocks()
        .map(|block| format!("{} \"{}\"", block.kind.as_str(), block.content))
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn arrow_up_moves_focus_and_preserves_the_clamped_column() {
    // Three blocks, focus on the middle one, caret at column 3 of its only
    // visual line. The block above is shorter than 3 columns.
    let mut session = open_session(&["hi", "second one", "third"]);
    let ids: Vec<BlockId> = session.document().order().to_vec();
    session.on_focus(ids[1]);

    let mut middle = rendered(&session, ids[1]);
    middle.set_selection(3);
    let dispatch = session.on_key_down(&KeyEvent::plain(Key::ArrowUp), ids[1], &middle);
    assert!(dispatch.prevents_default());
    assert_eq!(session.focused_block(), Some(ids[0]));

    let mut above = rendered(&session, ids[0]);
    session.flush_effects(Some(&mut above));
    // min(3, line length of "hi") = 2
    assert_eq!(position_from_selection(&above), CaretPosition::new(0, 2));
    assert!(above.is_focused());
}

#[test]
fn arrow_down_lands_on_the_first_line_at_the_saved_column() {
    let mut session = open_session(&["alpha", "beta gamma"]);
    let ids: Vec<BlockId> = session.document().order().to_vec();

    let mut top = rendered(&session, ids[0]);
    top.set_selection(4);
    session.on_key_down(&KeyEvent::plain(Key::ArrowDown), ids[0], &top);
    assert_eq!(session.focused_block(), Some(ids[1]));

    let mut below = rendered(&session, ids[1]);
    session.flush_effects(Some(&mut below));
    assert_eq!(position_from_selection(&below), CaretPosition::new(0, 4));
}

#[test]
fn arrow_up_restores_onto_the_last_visual_line_of_a_wrapped_block() {
    let mut session = open_session(&["a long first block that wraps a lot", "x"]);
    let ids: Vec<BlockId> = session.document().order().to_vec();
    session.on_focus(ids[1]);

    let mut lower = rendered(&session, ids[1]);
    lower.set_selection(1);
    session.on_key_down(&KeyEvent::plain(Key::ArrowUp), ids[1], &lower);

    let mut upper = rendered(&session, ids[0]);
    let last_line = visual_line_rects(&upper).len() - 1;
    assert!(last_line > 0, "fixture should soft-wrap");
    session.flush_effects(Some(&mut upper));
    assert_eq!(
        position_from_selection(&upper),
        CaretPosition::new(last_line, 1)
    );
}

#[test]
fn vertical_navigation_does_not_wrap_around_document_edges() {
    let mut session = open_session(&["first", "last"]);
    let ids: Vec<BlockId> = session.document().order().to_vec();

    let mut first = rendered(&session, ids[0]);
    first.set_selection(0);
    let dispatch = session.on_key_down(&KeyEvent::plain(Key::ArrowUp), ids[0], &first);
    assert!(dispatch.prevents_default());
    assert_eq!(session.focused_block(), Some(ids[0]));
    assert!(!session.has_pending_effects());

    session.on_focus(ids[1]);
    let mut last = rendered(&session, ids[1]);
    last.set_selection(2);
    session.on_key_down(&KeyEvent::plain(Key::ArrowDown), ids[1], &last);
    assert_eq!(session.focused_block(), Some(ids[1]));
    assert!(!session.has_pending_effects());
}

#[test]
fn enter_mid_word_creates_an_empty_sibling_below() {
    // The reference behavior: no text split at the caret — the new block
    // starts empty no matter where the caret sat.
    let mut session = open_session(&["hi"]);
    let first = session.document().order()[0];

    let mut layout = rendered(&session, first);
    layout.set_selection(1);
    let dispatch = session.on_key_down(&KeyEvent::plain(Key::Enter), first, &layout);
    assert!(dispatch.prevents_default());

    assert_eq!(session.document().len(), 2);
    let ids: Vec<BlockId> = session.document().order().to_vec();
    assert_eq!(session.document().block(ids[0]).unwrap().content, "hi");
    let new_block = session.document().block(ids[1]).unwrap();
    assert!(new_block.is_empty());
    assert_eq!(new_block.kind, BlockKind::Text);
    assert_eq!(session.focused_block(), Some(ids[1]));

    let mut fresh = rendered(&session, ids[1]);
    session.flush_effects(Some(&mut fresh));
    assert_eq!(fresh.selection_offset(), Some(0));

    // Both blocks made it to storage, in order.
    let stored = session.storage().blocks(session.document().id()).unwrap();
    let stored_ids: Vec<BlockId> = stored.iter().map(|block| block.id).collect();
    assert_eq!(stored_ids, ids);
}

#[test]
fn backspace_on_the_sole_empty_block_is_a_noop() {
    let mut session = open_session(&[""]);
    let only = session.document().order()[0];

    let mut layout = rendered(&session, only);
    layout.set_selection(0);
    let dispatch = session.on_key_down(&KeyEvent::plain(Key::Backspace), only, &layout);
    assert!(dispatch.prevents_default());
    assert_eq!(session.document().len(), 1);
    assert_eq!(session.focused_block(), Some(only));
}

#[test]
fn backspace_on_an_empty_block_removes_it_and_focuses_the_previous() {
    let mut session = open_session(&["alpha", ""]);
    let ids: Vec<BlockId> = session.document().order().to_vec();
    session.on_focus(ids[1]);

    let mut layout = rendered(&session, ids[1]);
    layout.set_selection(0);
    session.on_key_down(&KeyEvent::plain(Key::Backspace), ids[1], &layout);

    assert_eq!(session.document().len(), 1);
    assert_eq!(session.focused_block(), Some(ids[0]));
    assert_eq!(
        session.storage().blocks(session.document().id()).unwrap().len(),
        1
    );
}

#[test]
fn backspace_at_column_zero_reverts_an_accidental_retype() {
    let mut session = open_session(&["plain"]);
    let block = session.document().order()[0];
    session.on_content_change(block, "- milk");
    session.flush_effects(None);
    assert_eq!(
        session.document().block(block).unwrap().kind,
        BlockKind::UnorderedListItem
    );

    let mut layout = rendered(&session, block);
    layout.set_selection(0);
    let dispatch = session.on_key_down(&KeyEvent::plain(Key::Backspace), block, &layout);
    assert!(dispatch.prevents_default());

    let record = session.document().block(block).unwrap();
    assert_eq!(record.kind, BlockKind::Text);
    assert_eq!(record.content, "milk");
    assert_eq!(session.document().len(), 1);
}

#[test]
fn a_short_editing_session_produces_the_expected_document() {
    let mut session = open_session(&["setups"]);
    let first = session.document().order()[0];

    let mut layout = rendered(&session, first);
    layout.set_selection(6);
    session.on_key_down(&KeyEvent::plain(Key::Enter), first, &layout);
    let second = session.focused_block().unwrap();
    session.on_content_change(second, "- breakout entry");
    session.flush_effects(None);

    session.on_key_down(&KeyEvent::plain(Key::Enter), second, &rendered(&session, second));
    let third = session.focused_block().unwrap();
    session.on_content_change(third, "[] screenshot the fill");
    session.flush_effects(None);

    insta::assert_snapshot!(outline(&session), @r#"
    text "setups"
    unordered-list-item "breakout entry"
    checkbox "screenshot the fill"
    "#);
}
