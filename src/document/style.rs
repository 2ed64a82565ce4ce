//! Cell style capture and re-rendering
//!
//! A `StyleSnapshot` is a value-copy of the visual attributes of one cell:
//! the raw `w:tcBorders`, `w:shd`, `w:tcW` and `w:vAlign` fragments of its
//! `w:tcPr`. Snapshots are taken before the old rows are dropped and
//! replayed into the rewritten cells at the same column position, so the
//! filter never has to understand the markup it preserves.
//!
//! Rendering also owns the font normalization: every paragraph it emits is
//! compacted (`atLeast` line rule, zero spacing before/after) and every run
//! gets the configured face for both the Latin and East Asian attributes,
//! plus the configured half-point size.

use quick_xml::escape::escape;

use super::error::DocError;
use super::merge::MergeState;
use super::scan::child_ranges;
use crate::config::FilterConfig;

/// The tcPr children a snapshot preserves, in CT_TcPr schema order.
const WIDTH_TAG: &str = "w:tcW";
const BORDERS_TAG: &str = "w:tcBorders";
const SHADING_TAG: &str = "w:shd";
const VALIGN_TAG: &str = "w:vAlign";

/// Single thin border on all four edges, used when a cell carried no
/// explicit style markup at all. sz is in eighth-points: 4 = 0.5 pt.
const DEFAULT_BORDERS: &str = concat!(
    "<w:tcBorders>",
    "<w:top w:val=\"single\" w:sz=\"4\" w:space=\"0\" w:color=\"000000\"/>",
    "<w:left w:val=\"single\" w:sz=\"4\" w:space=\"0\" w:color=\"000000\"/>",
    "<w:bottom w:val=\"single\" w:sz=\"4\" w:space=\"0\" w:color=\"000000\"/>",
    "<w:right w:val=\"single\" w:sz=\"4\" w:space=\"0\" w:color=\"000000\"/>",
    "</w:tcBorders>",
);

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleSnapshot {
    width: Option<String>,
    borders: Option<String>,
    shading: Option<String>,
    vertical_align: Option<String>,
}

impl StyleSnapshot {
    /// Capture the style fragments of one cell. A cell without a `w:tcPr`
    /// (or with none of the preserved children) yields an empty snapshot.
    pub(crate) fn capture(cell_xml: &str) -> Result<StyleSnapshot, DocError> {
        let Some(tcpr) = child_ranges(cell_xml, "w:tcPr")?.into_iter().next() else {
            return Ok(StyleSnapshot::default());
        };
        let tcpr_xml = &cell_xml[tcpr];

        Ok(StyleSnapshot {
            width: first_fragment(tcpr_xml, WIDTH_TAG)?,
            borders: first_fragment(tcpr_xml, BORDERS_TAG)?,
            shading: first_fragment(tcpr_xml, SHADING_TAG)?,
            vertical_align: first_fragment(tcpr_xml, VALIGN_TAG)?,
        })
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.width.is_none()
            && self.borders.is_none()
            && self.shading.is_none()
            && self.vertical_align.is_none()
    }

    /// Render the `w:tcPr` of a rewritten cell. An empty snapshot falls
    /// back to the default border policy so every surviving cell stays
    /// visibly bounded. Children are emitted in CT_TcPr schema order.
    pub(crate) fn render_tc_pr(&self, merge: Option<MergeState>) -> String {
        let mut pr = String::from("<w:tcPr>");
        if let Some(width) = &self.width {
            pr.push_str(width);
        }
        if let Some(state) = merge {
            pr.push_str(&format!("<w:vMerge w:val=\"{}\"/>", state.as_str()));
        }
        if self.is_empty() {
            pr.push_str(DEFAULT_BORDERS);
        } else {
            if let Some(borders) = &self.borders {
                pr.push_str(borders);
            }
            if let Some(shading) = &self.shading {
                pr.push_str(shading);
            }
        }
        if let Some(valign) = &self.vertical_align {
            pr.push_str(valign);
        }
        pr.push_str("</w:tcPr>");
        pr
    }
}

fn first_fragment(tcpr_xml: &str, tag: &str) -> Result<Option<String>, DocError> {
    Ok(child_ranges(tcpr_xml, tag)?
        .into_iter()
        .next()
        .map(|range| tcpr_xml[range].to_string()))
}

/// Render one normalized cell paragraph. Saved text was flattened with
/// `\n` for paragraph and line breaks, so newlines come back as `w:br`
/// within the single run; empty text yields a paragraph without a run.
pub(crate) fn render_cell_paragraph(text: &str, config: &FilterConfig) -> String {
    let rpr = run_properties(config);
    let mut p = String::from("<w:p><w:pPr>");
    p.push_str("<w:spacing w:before=\"0\" w:after=\"0\" w:line=\"0\" w:lineRule=\"atLeast\"/>");
    p.push_str(&rpr);
    p.push_str("</w:pPr>");
    if !text.is_empty() {
        p.push_str("<w:r>");
        p.push_str(&rpr);
        for (i, line) in text.split('\n').enumerate() {
            if i > 0 {
                p.push_str("<w:br/>");
            }
            p.push_str("<w:t xml:space=\"preserve\">");
            p.push_str(&escape(line));
            p.push_str("</w:t>");
        }
        p.push_str("</w:r>");
    }
    p.push_str("</w:p>");
    p
}

fn run_properties(config: &FilterConfig) -> String {
    let font = escape(&config.font_name);
    format!(
        "<w:rPr><w:rFonts w:ascii=\"{font}\" w:hAnsi=\"{font}\" w:eastAsia=\"{font}\"/>\
         <w:sz w:val=\"{size}\"/><w:szCs w:val=\"{size}\"/></w:rPr>",
        size = config.font_size_half_points,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const STYLED_CELL: &str = concat!(
        "<w:tc><w:tcPr>",
        "<w:tcW w:w=\"2310\" w:type=\"dxa\"/>",
        "<w:tcBorders><w:top w:val=\"double\" w:sz=\"8\" w:color=\"FF0000\"/></w:tcBorders>",
        "<w:shd w:val=\"clear\" w:color=\"auto\" w:fill=\"D9D9D9\"/>",
        "<w:vAlign w:val=\"center\"/>",
        "</w:tcPr><w:p><w:r><w:t>text</w:t></w:r></w:p></w:tc>",
    );

    #[test]
    fn capture_preserves_the_four_fragments_verbatim() {
        let snapshot = StyleSnapshot::capture(STYLED_CELL).unwrap();
        assert_eq!(
            snapshot.width.as_deref(),
            Some("<w:tcW w:w=\"2310\" w:type=\"dxa\"/>")
        );
        assert_eq!(
            snapshot.borders.as_deref(),
            Some("<w:tcBorders><w:top w:val=\"double\" w:sz=\"8\" w:color=\"FF0000\"/></w:tcBorders>")
        );
        assert_eq!(
            snapshot.shading.as_deref(),
            Some("<w:shd w:val=\"clear\" w:color=\"auto\" w:fill=\"D9D9D9\"/>")
        );
        assert_eq!(
            snapshot.vertical_align.as_deref(),
            Some("<w:vAlign w:val=\"center\"/>")
        );
    }

    #[test]
    fn captured_style_round_trips_into_tc_pr() {
        let snapshot = StyleSnapshot::capture(STYLED_CELL).unwrap();
        let pr = snapshot.render_tc_pr(None);
        assert!(pr.contains("<w:tcW w:w=\"2310\""));
        assert!(pr.contains("w:val=\"double\""));
        assert!(pr.contains("w:fill=\"D9D9D9\""));
        assert!(pr.contains("<w:vAlign w:val=\"center\"/>"));
        assert!(!pr.contains("w:sz=\"4\""), "no default border when styled");
    }

    #[test]
    fn bare_cell_gets_default_borders() {
        let snapshot = StyleSnapshot::capture("<w:tc><w:p/></w:tc>").unwrap();
        assert!(snapshot.is_empty());
        let pr = snapshot.render_tc_pr(None);
        for edge in ["w:top", "w:left", "w:bottom", "w:right"] {
            assert!(
                pr.contains(&format!(
                    "<{edge} w:val=\"single\" w:sz=\"4\" w:space=\"0\" w:color=\"000000\"/>"
                )),
                "missing default {edge} border"
            );
        }
    }

    #[test]
    fn nested_table_cell_styles_are_not_captured() {
        let xml = concat!(
            "<w:tc><w:tbl><w:tr><w:tc><w:tcPr><w:vAlign w:val=\"bottom\"/></w:tcPr>",
            "<w:p/></w:tc></w:tr></w:tbl><w:p/></w:tc>",
        );
        let snapshot = StyleSnapshot::capture(xml).unwrap();
        assert!(snapshot.is_empty());
    }

    #[test]
    fn merge_marker_is_rendered_into_tc_pr() {
        let snapshot = StyleSnapshot::default();
        let pr = snapshot.render_tc_pr(Some(MergeState::Restart));
        assert!(pr.contains("<w:vMerge w:val=\"restart\"/>"));
        let pr = snapshot.render_tc_pr(Some(MergeState::Continue));
        assert!(pr.contains("<w:vMerge w:val=\"continue\"/>"));
    }

    #[test]
    fn paragraph_rendering_normalizes_spacing_and_fonts() {
        let config = FilterConfig::default();
        let p = render_cell_paragraph("整改中", &config);
        assert!(p.contains(
            "<w:spacing w:before=\"0\" w:after=\"0\" w:line=\"0\" w:lineRule=\"atLeast\"/>"
        ));
        assert!(p.contains("w:ascii=\"宋体\""));
        assert!(p.contains("w:eastAsia=\"宋体\""));
        assert!(p.contains("<w:sz w:val=\"21\"/>"));
        assert!(p.contains("<w:szCs w:val=\"21\"/>"));
        assert!(p.contains("<w:t xml:space=\"preserve\">整改中</w:t>"));
    }

    #[test]
    fn newlines_become_breaks_and_markup_is_escaped() {
        let config = FilterConfig::default();
        let p = render_cell_paragraph("a<b\n&c", &config);
        assert!(p.contains("<w:t xml:space=\"preserve\">a&lt;b</w:t><w:br/>"));
        assert!(p.contains("<w:t xml:space=\"preserve\">&amp;c</w:t>"));
    }

    #[test]
    fn empty_text_renders_paragraph_without_run() {
        let config = FilterConfig::default();
        let p = render_cell_paragraph("", &config);
        assert!(!p.contains("<w:r>"));
        assert!(p.ends_with("</w:pPr></w:p>"));
    }
}
