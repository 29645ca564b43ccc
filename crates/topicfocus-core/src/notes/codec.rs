//! Flat markdown text <-> block document conversion.
//!
//! The persisted `notes` field is a newline-joined list of lines, one per
//! block. Each line's leading marker decides the block type:
//!
//! ~~~text
//! # h1        -> heading1
//! ## h2       -> heading2
//! ### h3      -> heading3
//! - item      -> bulleted
//! 7. item     -> numbered   (written back as "1. item")
//! ```lang     -> code       (content is everything after the fence)
//! anything    -> paragraph
//! ~~~
//!
//! Leading and trailing whitespace on a line is not preserved.
//!
//! A paragraph whose text would itself read as a marker (`- not a bullet`)
//! is written with one extra leading backslash, and parsing drops it again:
//!
//! ~~~text
//! \- not a bullet  -> paragraph "- not a bullet"
//! \\- escaped     -> paragraph "\- escaped"
//! \plain          -> paragraph "\plain" (no marker follows, kept as is)
//! ~~~

use super::block::{BlockType, Document};

pub const FENCE: &str = "```";
const ESCAPE: char = '\\';

/// Parse flat text into a document. Ids are freshly allocated.
pub fn parse(text: &str) -> Document {
    Document::from_parts(text.split('\n').map(parse_line))
}

/// Serialize a document back to flat text, one line per block.
pub fn serialize(doc: &Document) -> String {
    let mut blocks: Vec<_> = doc.blocks().iter().collect();
    blocks.sort_by_key(|b| b.order);
    blocks
        .iter()
        .map(|b| render_line(b.block_type, &b.content))
        .collect::<Vec<_>>()
        .join("\n")
}

fn parse_line(raw: &str) -> (BlockType, String) {
    let line = raw.strip_suffix('\r').unwrap_or(raw).trim_start();

    if let Some(escaped) = line.strip_prefix(ESCAPE) {
        if is_marked(escaped) {
            return (BlockType::Paragraph, escaped.trim().to_string());
        }
    }
    let (block_type, rest) = classify(line);
    (block_type, rest.trim().to_string())
}

fn classify(line: &str) -> (BlockType, &str) {
    if let Some(rest) = line.strip_prefix("### ") {
        (BlockType::Heading3, rest)
    } else if let Some(rest) = line.strip_prefix("## ") {
        (BlockType::Heading2, rest)
    } else if let Some(rest) = line.strip_prefix("# ") {
        (BlockType::Heading1, rest)
    } else if let Some(rest) = line.strip_prefix("- ") {
        (BlockType::Bulleted, rest)
    } else if let Some(rest) = strip_ordinal(line) {
        (BlockType::Numbered, rest)
    } else if let Some(rest) = line.strip_prefix(FENCE) {
        (BlockType::Code, rest)
    } else {
        (BlockType::Paragraph, line)
    }
}

/// Paragraph text that needs an escape to stay a paragraph.
fn is_marked(text: &str) -> bool {
    let bare = text.trim_start().trim_start_matches(ESCAPE).trim_start();
    classify(bare).0 != BlockType::Paragraph
}

/// `<digits>. rest` -> `rest`
fn strip_ordinal(line: &str) -> Option<&str> {
    let digits = line.bytes().take_while(|b| b.is_ascii_digit()).count();
    if digits == 0 {
        return None;
    }
    line[digits..].strip_prefix(". ")
}

fn render_line(block_type: BlockType, content: &str) -> String {
    match block_type {
        BlockType::Paragraph if is_marked(content) => format!("{ESCAPE}{content}"),
        BlockType::Paragraph => content.to_string(),
        BlockType::Heading1 => format!("# {content}"),
        BlockType::Heading2 => format!("## {content}"),
        BlockType::Heading3 => format!("### {content}"),
        BlockType::Bulleted => format!("- {content}"),
        // Ordinals are not reconstructed.
        BlockType::Numbered => format!("1. {content}"),
        BlockType::Code => format!("{FENCE}{content}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use proptest::prelude::*;

    fn parts(doc: &Document) -> Vec<(BlockType, String)> {
        doc.parts()
            .into_iter()
            .map(|(t, c)| (t, c.to_string()))
            .collect()
    }

    #[test]
    fn empty_input_is_one_empty_paragraph() {
        let doc = parse("");
        assert_eq!(parts(&doc), vec![(BlockType::Paragraph, String::new())]);
        assert_eq!(doc.blocks()[0].order, 0);
    }

    #[test]
    fn title_and_bullets() {
        let text = "# Title\n- point one\n- point two";
        let doc = parse(text);
        assert_eq!(
            parts(&doc),
            vec![
                (BlockType::Heading1, "Title".into()),
                (BlockType::Bulleted, "point one".into()),
                (BlockType::Bulleted, "point two".into()),
            ]
        );
        let orders: Vec<_> = doc.blocks().iter().map(|b| b.order).collect();
        assert_eq!(orders, vec![0, 1, 2]);
        assert_eq!(serialize(&doc), text);
    }

    #[test]
    fn every_marker_is_recognized() {
        let doc = parse(indoc! {"
            # One
            ## Two
            ### Three
            - bullet
            12. numbered
            ```rust
            plain text"});
        let types: Vec<_> = doc.blocks().iter().map(|b| b.block_type).collect();
        assert_eq!(
            types,
            vec![
                BlockType::Heading1,
                BlockType::Heading2,
                BlockType::Heading3,
                BlockType::Bulleted,
                BlockType::Numbered,
                BlockType::Code,
                BlockType::Paragraph,
            ]
        );
        assert_eq!(doc.blocks()[4].content, "numbered");
        assert_eq!(doc.blocks()[5].content, "rust");
    }

    #[test]
    fn numbered_items_serialize_with_literal_one() {
        let doc = parse("1. first\n2. second\n3. third");
        assert_eq!(serialize(&doc), "1. first\n1. second\n1. third");
    }

    #[test]
    fn markers_need_a_trailing_space() {
        let doc = parse("#hashtag\n-dash\n3.14");
        assert!(doc
            .blocks()
            .iter()
            .all(|b| b.block_type == BlockType::Paragraph));
        assert_eq!(doc.blocks()[2].content, "3.14");
    }

    #[test]
    fn surrounding_whitespace_is_normalized() {
        let doc = parse("   ## spaced out   \r\n\tplain\t");
        assert_eq!(
            parts(&doc),
            vec![
                (BlockType::Heading2, "spaced out".into()),
                (BlockType::Paragraph, "plain".into()),
            ]
        );
    }

    #[test]
    fn empty_marked_blocks_survive_round_trip() {
        let doc = Document::from_parts([
            (BlockType::Heading1, String::new()),
            (BlockType::Bulleted, String::new()),
            (BlockType::Code, String::new()),
        ]);
        assert_eq!(parts(&parse(&serialize(&doc))), parts(&doc));
    }

    #[test]
    fn paragraphs_that_look_like_markers_stay_paragraphs() {
        let doc = Document::from_parts([
            (BlockType::Paragraph, "- not a bullet".to_string()),
            (BlockType::Paragraph, "# not a heading".to_string()),
            (BlockType::Paragraph, "```not code".to_string()),
            (BlockType::Paragraph, "2. not numbered".to_string()),
            (BlockType::Paragraph, "\\- already escaped".to_string()),
            (BlockType::Paragraph, "\\plain".to_string()),
        ]);
        let text = serialize(&doc);
        assert_eq!(
            text,
            indoc! {r"
                \- not a bullet
                \# not a heading
                \```not code
                \2. not numbered
                \\- already escaped
                \plain"}
        );
        assert_eq!(parts(&parse(&text)), parts(&doc));
    }

    #[test]
    fn marked_blocks_are_not_escaped() {
        let doc = Document::from_parts([
            (BlockType::Bulleted, "- nested look".to_string()),
            (BlockType::Heading1, "# twice".to_string()),
        ]);
        assert_eq!(serialize(&doc), "- - nested look\n# # twice");
        assert_eq!(parts(&parse(&serialize(&doc))), parts(&doc));
    }

    #[test]
    fn parsed_ids_are_unique() {
        let doc = parse("a\nb\nc\nd");
        let mut ids: Vec<_> = doc.blocks().iter().map(|b| b.id).collect();
        ids.dedup();
        assert_eq!(ids.len(), 4);
    }

    proptest! {
        #[test]
        fn serialize_after_parse_preserves_types_and_content(
            lines in prop::collection::vec(
                prop_oneof![
                    "[a-z ]{0,12}",
                    "# [a-z ]{0,10}",
                    "## [a-z]{0,10}",
                    "### [a-z]{0,10}",
                    "- [a-z ]{0,10}",
                    "[0-9]{1,3}\\. [a-z]{0,10}",
                    "```[a-z]{0,6}",
                ],
                0..12,
            )
        ) {
            let text = lines.join("\n");
            let first = parse(&text);
            let second = parse(&serialize(&first));
            prop_assert_eq!(parts(&first), parts(&second));
            prop_assert!(first.len() >= 1);
        }

        #[test]
        fn marker_like_paragraphs_round_trip(
            contents in prop::collection::vec(
                "\\\\{0,2}(# |## |- |[0-9]\\. |```)?[a-z]{1,6}",
                1..8,
            )
        ) {
            let doc = Document::from_parts(
                contents.iter().map(|c| (BlockType::Paragraph, c.clone())),
            );
            prop_assert_eq!(parts(&parse(&serialize(&doc))), parts(&doc));
        }
    }
}
