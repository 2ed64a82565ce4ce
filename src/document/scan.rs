//! Byte-range scanning over WordprocessingML
//!
//! The filter edits `word/document.xml` by splicing byte ranges, so the
//! scanner's job is to find where table parts live in the original markup
//! without ever re-serializing the parts we keep. Ranges always cover the
//! whole element, opening tag through closing tag.
//!
//! Tables can nest: a `<w:tr>` inside a nested `<w:tbl>` is not a row of
//! the outer table. Every scan here therefore treats `w:tbl` as a barrier
//! and ignores anything below one, except for the outermost table scan
//! itself which yields the top-level tables.

use std::ops::Range;

use quick_xml::Reader;
use quick_xml::events::Event;

use super::error::DocError;

const TABLE_TAG: &str = "w:tbl";

/// Ranges of `target` elements that are children of the fragment root
/// (direct or through non-table wrappers), skipping nested tables.
///
/// Works on whole `document.xml` (root `w:document`) as well as on a
/// single `w:tbl`/`w:tr`/`w:tcPr` fragment; the fragment's own root
/// element never counts as a barrier.
pub(crate) fn child_ranges(xml: &str, target: &str) -> Result<Vec<Range<usize>>, DocError> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<String> = Vec::new();
    let mut ranges = Vec::new();
    // (start offset, stack depth when the capture opened)
    let mut open: Option<(usize, usize)> = None;

    loop {
        let pos = reader.buffer_position() as usize;
        match reader.read_event()? {
            Event::Start(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                if open.is_none() && name == target && !barred(&stack) {
                    open = Some((pos, stack.len()));
                }
                stack.push(name);
            }
            Event::End(_) => {
                stack.pop();
                if let Some((start, depth)) = open
                    && stack.len() == depth
                {
                    ranges.push(start..reader.buffer_position() as usize);
                    open = None;
                }
            }
            Event::Empty(e) => {
                let name = e.name();
                if open.is_none()
                    && name.as_ref() == target.as_bytes()
                    && !barred(&stack)
                {
                    ranges.push(pos..reader.buffer_position() as usize);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(ranges)
}

/// True when the current position sits inside a nested table. The first
/// stack entry is the fragment root and never bars anything.
fn barred(stack: &[String]) -> bool {
    stack.iter().skip(1).any(|name| name == TABLE_TAG)
}

/// Plain text of a cell: direct paragraphs joined with newlines, runs
/// concatenated, breaks and tabs folded to `\n`/`\t`. Content of nested
/// tables is excluded, matching how the rest of the scanner sees the cell.
pub(crate) fn cell_text(cell_xml: &str) -> Result<String, DocError> {
    let mut reader = Reader::from_str(cell_xml);
    let mut stack: Vec<String> = Vec::new();
    let mut paragraphs: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                if name == "w:t" && !barred(&stack) {
                    in_text = true;
                }
                stack.push(name);
            }
            Event::End(e) => {
                stack.pop();
                match e.name().as_ref() {
                    b"w:t" => in_text = false,
                    b"w:p" if !barred(&stack) => paragraphs.push(std::mem::take(&mut current)),
                    _ => {}
                }
            }
            Event::Empty(e) => {
                if !barred(&stack) {
                    match e.name().as_ref() {
                        b"w:br" | b"w:cr" => current.push('\n'),
                        b"w:tab" => current.push('\t'),
                        _ => {}
                    }
                }
            }
            Event::Text(e) => {
                if in_text {
                    current.push_str(&e.unescape().unwrap_or_default());
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs.join("\n"))
}
