use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Editing handle for a block.
///
/// Ids are issued by the owning [`Document`] and are never reused while that
/// document lives. They are not persisted: parsing the same text twice yields
/// different ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(pub u64);

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BlockType {
    #[default]
    Paragraph,
    Heading1,
    Heading2,
    Heading3,
    Bulleted,
    Numbered,
    Code,
}

impl BlockType {
    pub const ALL: [BlockType; 7] = [
        BlockType::Paragraph,
        BlockType::Heading1,
        BlockType::Heading2,
        BlockType::Heading3,
        BlockType::Bulleted,
        BlockType::Numbered,
        BlockType::Code,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BlockType::Paragraph => "paragraph",
            BlockType::Heading1 => "heading1",
            BlockType::Heading2 => "heading2",
            BlockType::Heading3 => "heading3",
            BlockType::Bulleted => "bulleted",
            BlockType::Numbered => "numbered",
            BlockType::Code => "code",
        }
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlockType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BlockType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ValidationError::InvalidValue {
                field: "block_type".into(),
                message: format!("unknown block type '{s}'"),
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,
    #[serde(rename = "type")]
    pub block_type: BlockType,
    pub content: String,
    pub order: usize,
}

/// Ordered collection of blocks for one topic's notes.
///
/// Invariants held after every mutation:
/// - at least one block exists
/// - `blocks[i].order == i`
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    blocks: Vec<Block>,
    #[serde(skip)]
    next_id: u64,
}

impl Document {
    /// Single empty paragraph.
    pub fn new() -> Self {
        let mut doc = Self {
            blocks: Vec::new(),
            next_id: 0,
        };
        doc.push(BlockType::Paragraph, String::new());
        doc
    }

    /// Build from `(type, content)` pairs in order. An empty iterator still
    /// produces one empty paragraph.
    pub fn from_parts<I>(parts: I) -> Self
    where
        I: IntoIterator<Item = (BlockType, String)>,
    {
        let mut doc = Self {
            blocks: Vec::new(),
            next_id: 0,
        };
        for (block_type, content) in parts {
            doc.push(block_type, content);
        }
        if doc.blocks.is_empty() {
            doc.push(BlockType::Paragraph, String::new());
        }
        doc
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Never true while the document invariants hold.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn get(&self, id: BlockId) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id == id)
    }

    pub fn position(&self, id: BlockId) -> Option<usize> {
        self.blocks.iter().position(|b| b.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: BlockId) -> Option<&mut Block> {
        self.blocks.iter_mut().find(|b| b.id == id)
    }

    /// `(type, content)` sequence, ignoring ids.
    pub fn parts(&self) -> Vec<(BlockType, &str)> {
        self.blocks
            .iter()
            .map(|b| (b.block_type, b.content.as_str()))
            .collect()
    }

    pub(crate) fn insert_at(&mut self, index: usize, block_type: BlockType) -> BlockId {
        let id = self.alloc_id();
        let index = index.min(self.blocks.len());
        self.blocks.insert(
            index,
            Block {
                id,
                block_type,
                content: String::new(),
                order: index,
            },
        );
        self.reorder();
        id
    }

    /// Removes the block at `index`. Refuses to remove the last block.
    pub(crate) fn remove_at(&mut self, index: usize) -> Option<Block> {
        if self.blocks.len() <= 1 || index >= self.blocks.len() {
            return None;
        }
        let removed = self.blocks.remove(index);
        self.reorder();
        Some(removed)
    }

    fn push(&mut self, block_type: BlockType, content: String) {
        let id = self.alloc_id();
        let order = self.blocks.len();
        self.blocks.push(Block {
            id,
            block_type,
            content,
            order,
        });
    }

    fn alloc_id(&mut self) -> BlockId {
        let id = BlockId(self.next_id);
        self.next_id += 1;
        id
    }

    fn reorder(&mut self) {
        for (i, block) in self.blocks.iter_mut().enumerate() {
            block.order = i;
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_document_has_one_empty_paragraph() {
        let doc = Document::new();
        assert_eq!(doc.len(), 1);
        assert_eq!(doc.blocks()[0].block_type, BlockType::Paragraph);
        assert!(doc.blocks()[0].content.is_empty());
        assert_eq!(doc.blocks()[0].order, 0);
    }

    #[test]
    fn ids_are_not_reused_after_removal() {
        let mut doc = Document::from_parts([
            (BlockType::Paragraph, "a".to_string()),
            (BlockType::Paragraph, "b".to_string()),
        ]);
        let removed = doc.remove_at(1).unwrap();
        let fresh = doc.insert_at(1, BlockType::Code);
        assert_ne!(removed.id, fresh);
        assert!(fresh > removed.id);
    }

    #[test]
    fn remove_refuses_last_block() {
        let mut doc = Document::new();
        assert!(doc.remove_at(0).is_none());
        assert_eq!(doc.len(), 1);
    }

    #[test]
    fn block_type_parses_wire_names() {
        assert_eq!("heading2".parse::<BlockType>().unwrap(), BlockType::Heading2);
        assert_eq!("Code".parse::<BlockType>().unwrap(), BlockType::Code);
        assert!("quote".parse::<BlockType>().is_err());
    }

    #[test]
    fn block_serializes_type_field() {
        let doc = Document::new();
        let json = serde_json::to_value(&doc.blocks()[0]).unwrap();
        assert_eq!(json["type"], "paragraph");
        assert_eq!(json["order"], 0);
    }
}
