//! Lightweight rich-text formatting for incident descriptions.
//!
//! Descriptions are prose with blank-line paragraph breaks, simple bullet or
//! numbered lists and `**bold**` emphasis. Anything else is shown verbatim.

/// A run of text inside a block
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text(String),
    Bold(String),
}

/// A top-level piece of a formatted description
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Paragraph(Vec<Inline>),
    /// `marker` is `•` for bullets or the original label (`1.`, `2)`) for numbered items
    ListItem { marker: String, content: Vec<Inline> },
}

/// Split a description into paragraphs and list items with inline emphasis
pub fn format_description(text: &str) -> Vec<Block> {
    let normalized = text.replace("\r\n", "\n");
    let mut blocks = Vec::new();
    let mut paragraph: Vec<&str> = Vec::new();

    for line in normalized.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            flush_paragraph(&mut paragraph, &mut blocks);
            continue;
        }
        match split_list_marker(trimmed) {
            Some((marker, rest)) => {
                flush_paragraph(&mut paragraph, &mut blocks);
                blocks.push(Block::ListItem {
                    marker,
                    content: parse_inline(rest),
                });
            }
            None => paragraph.push(trimmed),
        }
    }
    flush_paragraph(&mut paragraph, &mut blocks);
    blocks
}

fn flush_paragraph(lines: &mut Vec<&str>, blocks: &mut Vec<Block>) {
    if lines.is_empty() {
        return;
    }
    blocks.push(Block::Paragraph(parse_inline(&lines.join(" "))));
    lines.clear();
}

fn split_list_marker(line: &str) -> Option<(String, &str)> {
    for bullet in ["- ", "* ", "• "] {
        if let Some(rest) = line.strip_prefix(bullet) {
            return Some(("•".to_string(), rest.trim_start()));
        }
    }

    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits == 0 || digits > 3 {
        return None;
    }
    let after = &line[digits..];
    for terminator in [". ", ") "] {
        if let Some(rest) = after.strip_prefix(terminator) {
            let label = format!("{}{}", &line[..digits], terminator.trim_end());
            return Some((label, rest.trim_start()));
        }
    }
    None
}

/// Parse `**bold**` spans; an unmatched `**` is kept as literal text
pub fn parse_inline(text: &str) -> Vec<Inline> {
    let mut runs = Vec::new();
    let mut plain = String::new();
    let mut rest = text;

    while let Some(open) = rest.find("**") {
        let after_open = &rest[open + 2..];
        let Some(close) = after_open.find("**") else {
            break;
        };
        plain.push_str(&rest[..open]);
        let bold = &after_open[..close];
        if bold.is_empty() {
            plain.push_str("****");
        } else {
            if !plain.is_empty() {
                runs.push(Inline::Text(std::mem::take(&mut plain)));
            }
            runs.push(Inline::Bold(bold.to_string()));
        }
        rest = &after_open[close + 2..];
    }

    plain.push_str(rest);
    if !plain.is_empty() {
        runs.push(Inline::Text(plain));
    }
    runs
}
