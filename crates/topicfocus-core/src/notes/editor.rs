//! In-memory block editing engine.
//!
//! Wraps a [`Document`] and tracks which block holds input focus. All
//! mutations keep the document invariants (at least one block, dense order).

use serde::{Deserialize, Serialize};

use super::block::{Block, BlockId, BlockType, Document};
use super::codec;
use crate::error::ValidationError;

/// Keys the editor reacts to. Everything else is plain text input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Key {
    Enter,
    Backspace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum KeyOutcome {
    /// A block was inserted and now has focus.
    Inserted { id: BlockId },
    /// The focused block was removed; focus moved to `focus`.
    Deleted { removed: BlockId, focus: BlockId },
    /// Not handled; the caller applies default text behaviour.
    Ignored,
}

#[derive(Debug, Clone)]
pub struct BlockEditor {
    doc: Document,
    focused: Option<BlockId>,
}

impl BlockEditor {
    pub fn new(doc: Document) -> Self {
        Self { doc, focused: None }
    }

    pub fn from_markdown(text: &str) -> Self {
        Self::new(codec::parse(text))
    }

    pub fn to_markdown(&self) -> String {
        codec::serialize(&self.doc)
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn blocks(&self) -> &[Block] {
        self.doc.blocks()
    }

    pub fn len(&self) -> usize {
        self.doc.len()
    }

    pub fn is_empty(&self) -> bool {
        self.doc.is_empty()
    }

    pub fn focused(&self) -> Option<BlockId> {
        self.focused
    }

    pub fn focus(&mut self, id: BlockId) -> Result<(), ValidationError> {
        if self.doc.get(id).is_none() {
            return Err(ValidationError::UnknownBlock(id.0));
        }
        self.focused = Some(id);
        Ok(())
    }

    /// Replace a block's content. Returns false if the id is unknown or the
    /// content is unchanged.
    pub fn update_content(&mut self, id: BlockId, text: impl Into<String>) -> bool {
        let text = text.into();
        match self.doc.get_mut(id) {
            Some(block) if block.content != text => {
                block.content = text;
                true
            }
            _ => false,
        }
    }

    /// Insert a new empty block right after `id` and focus it.
    pub fn insert_after(
        &mut self,
        id: BlockId,
        block_type: BlockType,
    ) -> Result<BlockId, ValidationError> {
        let index = self
            .doc
            .position(id)
            .ok_or(ValidationError::UnknownBlock(id.0))?;
        let new_id = self.doc.insert_at(index + 1, block_type);
        self.focused = Some(new_id);
        Ok(new_id)
    }

    /// Remove a block and move focus to its predecessor (or the first block).
    ///
    /// Returns the block that now has focus, or `None` when nothing was
    /// removed: either the id is unknown or it is the only block left.
    pub fn delete(&mut self, id: BlockId) -> Option<BlockId> {
        let index = self.doc.position(id)?;
        self.doc.remove_at(index)?;
        let focus = self.doc.blocks()[index.saturating_sub(1)].id;
        self.focused = Some(focus);
        Some(focus)
    }

    /// Change a block's type, leaving its content alone.
    pub fn change_type(&mut self, id: BlockId, block_type: BlockType) -> bool {
        match self.doc.get_mut(id) {
            Some(block) if block.block_type != block_type => {
                block.block_type = block_type;
                true
            }
            _ => false,
        }
    }

    /// Keyboard policy for the focused block.
    ///
    /// Enter inserts a paragraph after it. Backspace on an empty block
    /// deletes it when another block remains.
    pub fn handle_key(&mut self, key: Key) -> KeyOutcome {
        let Some(current) = self.focused.and_then(|id| self.doc.get(id)) else {
            return KeyOutcome::Ignored;
        };
        let id = current.id;
        let is_empty = current.content.is_empty();

        match key {
            Key::Enter => match self.insert_after(id, BlockType::Paragraph) {
                Ok(id) => KeyOutcome::Inserted { id },
                Err(_) => KeyOutcome::Ignored,
            },
            Key::Backspace if is_empty && self.doc.len() > 1 => {
                match self.delete(id) {
                    Some(focus) => KeyOutcome::Deleted { removed: id, focus },
                    None => KeyOutcome::Ignored,
                }
            }
            Key::Backspace => KeyOutcome::Ignored,
        }
    }
}

impl Default for BlockEditor {
    fn default() -> Self {
        Self::new(Document::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn orders_dense(editor: &BlockEditor) -> bool {
        editor
            .blocks()
            .iter()
            .enumerate()
            .all(|(i, b)| b.order == i)
    }

    #[test]
    fn update_content_ignores_unknown_ids() {
        let mut editor = BlockEditor::from_markdown("hello");
        assert!(!editor.update_content(BlockId(999), "nope"));
        assert_eq!(editor.to_markdown(), "hello");
    }

    #[test]
    fn insert_after_places_block_and_focuses_it() {
        let mut editor = BlockEditor::from_markdown("a\nc");
        let first = editor.blocks()[0].id;
        let new_id = editor.insert_after(first, BlockType::Bulleted).unwrap();
        editor.update_content(new_id, "b");

        assert_eq!(editor.len(), 3);
        assert_eq!(editor.focused(), Some(new_id));
        assert_eq!(editor.blocks()[1].id, new_id);
        assert!(orders_dense(&editor));
        assert_eq!(editor.to_markdown(), "a\n- b\nc");
    }

    #[test]
    fn insert_after_unknown_id_is_refused() {
        let mut editor = BlockEditor::default();
        assert_eq!(
            editor.insert_after(BlockId(42), BlockType::Paragraph),
            Err(ValidationError::UnknownBlock(42))
        );
        assert_eq!(editor.len(), 1);
    }

    #[test]
    fn deleting_sole_block_is_a_no_op() {
        let mut editor = BlockEditor::default();
        let only = editor.blocks()[0].id;
        assert_eq!(editor.delete(only), None);
        assert_eq!(editor.len(), 1);
    }

    #[test]
    fn delete_moves_focus_to_predecessor() {
        let mut editor = BlockEditor::from_markdown("a\nb\nc");
        let ids: Vec<_> = editor.blocks().iter().map(|b| b.id).collect();
        assert_eq!(editor.delete(ids[2]), Some(ids[1]));
        assert_eq!(editor.focused(), Some(ids[1]));
        // Removing the first block falls back to index 0.
        assert_eq!(editor.delete(ids[0]), Some(ids[1]));
        assert!(orders_dense(&editor));
    }

    #[test]
    fn change_type_keeps_content() {
        let mut editor = BlockEditor::from_markdown("title");
        let id = editor.blocks()[0].id;
        assert!(editor.change_type(id, BlockType::Heading2));
        assert_eq!(editor.to_markdown(), "## title");
        assert!(!editor.change_type(id, BlockType::Heading2));
    }

    #[test]
    fn enter_inserts_paragraph_after_focused_block() {
        let mut editor = BlockEditor::from_markdown("# head\ntail");
        let head = editor.blocks()[0].id;
        editor.focus(head).unwrap();
        let KeyOutcome::Inserted { id } = editor.handle_key(Key::Enter) else {
            panic!("expected insert");
        };
        assert_eq!(editor.blocks()[1].id, id);
        assert_eq!(editor.blocks()[1].block_type, BlockType::Paragraph);
    }

    #[test]
    fn backspace_only_deletes_empty_blocks() {
        let mut editor = BlockEditor::from_markdown("keep\n");
        let ids: Vec<_> = editor.blocks().iter().map(|b| b.id).collect();

        editor.focus(ids[0]).unwrap();
        assert_eq!(editor.handle_key(Key::Backspace), KeyOutcome::Ignored);

        editor.focus(ids[1]).unwrap();
        assert_eq!(
            editor.handle_key(Key::Backspace),
            KeyOutcome::Deleted {
                removed: ids[1],
                focus: ids[0]
            }
        );

        // One empty block left: backspace does nothing.
        editor.update_content(ids[0], "");
        assert_eq!(editor.handle_key(Key::Backspace), KeyOutcome::Ignored);
        assert_eq!(editor.len(), 1);
    }

    #[test]
    fn keys_without_focus_are_ignored() {
        let mut editor = BlockEditor::default();
        assert_eq!(editor.handle_key(Key::Enter), KeyOutcome::Ignored);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Insert(usize),
        Delete(usize),
        Retype(usize, usize),
        Write(usize, String),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0..8usize).prop_map(Op::Insert),
            (0..8usize).prop_map(Op::Delete),
            (0..8usize, 0..7usize).prop_map(|(i, t)| Op::Retype(i, t)),
            (0..8usize, "[a-z]{0,5}").prop_map(|(i, s)| Op::Write(i, s)),
        ]
    }

    proptest! {
        #[test]
        fn invariants_hold_for_any_edit_sequence(ops in prop::collection::vec(op(), 0..40)) {
            let mut editor = BlockEditor::default();
            let mut seen = std::collections::HashSet::new();
            seen.insert(editor.blocks()[0].id);

            for op in ops {
                let pick = |i: usize, e: &BlockEditor| e.blocks()[i % e.len()].id;
                match op {
                    Op::Insert(i) => {
                        let before = editor.len();
                        let id = editor.insert_after(pick(i, &editor), BlockType::Paragraph).unwrap();
                        prop_assert_eq!(editor.len(), before + 1);
                        prop_assert!(seen.insert(id), "id reused");
                    }
                    Op::Delete(i) => {
                        let before = editor.len();
                        let removed = editor.delete(pick(i, &editor)).is_some();
                        prop_assert_eq!(removed, before > 1);
                    }
                    Op::Retype(i, t) => {
                        let id = pick(i, &editor);
                        editor.change_type(id, BlockType::ALL[t]);
                    }
                    Op::Write(i, s) => {
                        let id = pick(i, &editor);
                        editor.update_content(id, s);
                    }
                }
                prop_assert!(editor.len() >= 1);
                prop_assert!(orders_dense(&editor));
            }
        }
    }
}
