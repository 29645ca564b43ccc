//! Block-structured notes: model, markdown codec and editing engine.

pub mod block;
pub mod codec;
pub mod editor;

pub use block::{Block, BlockId, BlockType, Document};
pub use codec::{parse, serialize};
pub use editor::{BlockEditor, Key, KeyOutcome};
