use unicode_segmentation::UnicodeSegmentation;

use crate::{
    foundation::core::Breakpoint,
    page::model::{Node, NodeId, Page, Prop},
};

/// Sentinel a manual break is normalized to before re-splitting. Layout
/// wraps never survive normalization, so splitting on the sentinel alone
/// can never cut a word in half.
const BREAK_SENTINEL: char = '\u{2028}';

/// Pre-reveal offset for every emitted character (translate-Y percent).
const HIDDEN_Y_PERCENT: f64 = 100.0;

#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct SegmenterConfig {
    /// Case-insensitive vocabulary of words tagged with the accent flag.
    #[serde(default)]
    pub accent_words: Vec<String>,
    /// Designated-heading rule: on the mobile breakpoint, content with no
    /// manual break and >= 2 words is forced to break after the first word.
    #[serde(default)]
    pub force_first_word_break: bool,
}

impl SegmenterConfig {
    fn is_accent(&self, word: &str) -> bool {
        let lower = word.to_lowercase();
        self.accent_words.iter().any(|w| w.to_lowercase() == lower)
    }
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct CharUnit {
    pub id: NodeId,
    pub glyph: String,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct WordUnit {
    pub id: NodeId,
    pub text: String,
    pub accent: bool,
    pub chars: Vec<CharUnit>,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct LineUnit {
    pub words: Vec<WordUnit>,
}

/// Line -> Word -> Character breakdown of one source node.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct SegmentedText {
    pub source: NodeId,
    pub lines: Vec<LineUnit>,
}

impl SegmentedText {
    /// Reveal-ordered character node ids.
    pub fn char_ids(&self) -> Vec<NodeId> {
        self.lines
            .iter()
            .flat_map(|l| l.words.iter())
            .flat_map(|w| w.chars.iter())
            .map(|c| c.id.clone())
            .collect()
    }

    /// The source text, recoverable for accessibility/reflow: words joined by
    /// spaces, lines by newlines.
    pub fn original_text(&self) -> String {
        self.lines
            .iter()
            .map(|l| {
                l.words
                    .iter()
                    .map(|w| w.text.as_str())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Normalize manual `<br>`-style markers to the sentinel and erase
/// layout-induced newlines. A wrap at a word boundary (whitespace on
/// either side) keeps a space; a wrap inside a word rejoins the halves.
pub fn normalize_breaks(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let bytes = raw.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if let Some(len) = manual_break_len(&raw[i..]) {
            out.push(BREAK_SENTINEL);
            i += len;
            continue;
        }
        let ch = raw[i..].chars().next().unwrap_or('\0');
        match ch {
            // Layout wraps: never hard boundaries. Source text only keeps a
            // space around a wrap at a real word boundary.
            '\n' => {
                let prev_ws = out.chars().last().map_or(true, char::is_whitespace);
                let next_ws = raw[i + 1..].chars().next().map_or(true, char::is_whitespace);
                if prev_ws || next_ws {
                    out.push(' ');
                }
            }
            '\r' => {}
            c => out.push(c),
        }
        i += ch.len_utf8();
    }
    out
}

/// Length of a manual break marker (`<br>`, `<br/>`, `<br />`, any case) at
/// the start of `s`, if present.
fn manual_break_len(s: &str) -> Option<usize> {
    let b = s.as_bytes();
    if b.len() < 4 || !b[..3].eq_ignore_ascii_case(b"<br") {
        return None;
    }
    if b[3] == b'>' {
        Some(4)
    } else if b.len() >= 5 && &b[3..5] == b"/>" {
        Some(5)
    } else if b.len() >= 6 && b[3] == b' ' && &b[4..6] == b"/>" {
        Some(6)
    } else {
        None
    }
}

/// Split one marked node into per-character units and materialize them as
/// page nodes, each seeded in the pre-reveal state.
///
/// Returns `Ok(None)` when the node is absent (missing collaborator) or was
/// already segmented (idempotence guard).
pub fn segment(
    page: &mut Page,
    source: &NodeId,
    breakpoint: Breakpoint,
    config: &SegmenterConfig,
) -> Option<SegmentedText> {
    let node = match page.node(source) {
        Some(n) => n,
        None => {
            tracing::debug!(node = %source, "segmenter: source node absent, skipping");
            return None;
        }
    };
    if node.segmented {
        tracing::debug!(node = %source, "segmenter: already segmented, skipping");
        return None;
    }
    let raw = node.text.clone()?;

    let normalized = normalize_breaks(&raw);
    let mut line_texts: Vec<String> = normalized
        .split(BREAK_SENTINEL)
        .map(str::to_owned)
        .collect();

    // Designated-heading rule: presentation-only forced break on narrow
    // viewports when the author supplied no manual break.
    if breakpoint == Breakpoint::Mobile && config.force_first_word_break && line_texts.len() <= 1 {
        let words: Vec<&str> = normalized.split_whitespace().collect();
        if words.len() >= 2 {
            line_texts = vec![words[0].to_owned(), words[1..].join(" ")];
        }
    }

    let mut lines = Vec::new();
    for (li, line_text) in line_texts.iter().enumerate() {
        let mut words = Vec::new();
        for (wi, word_text) in line_text.split_whitespace().enumerate() {
            let word_id = NodeId(format!("{source}::l{li}w{wi}"));
            let mut chars = Vec::new();
            for (ci, glyph) in word_text.graphemes(true).enumerate() {
                chars.push(CharUnit {
                    id: NodeId(format!("{source}::l{li}w{wi}c{ci}")),
                    glyph: glyph.to_owned(),
                });
            }
            words.push(WordUnit {
                id: word_id,
                text: word_text.to_owned(),
                accent: config.is_accent(word_text),
                chars,
            });
        }
        if !words.is_empty() {
            lines.push(LineUnit { words });
        }
    }

    let segmented = SegmentedText {
        source: source.clone(),
        lines,
    };

    // Materialize: one node per character, hidden until the owning section's
    // timeline reveals it.
    for id in segmented.char_ids() {
        let mut char_node = Node::new(id.clone());
        char_node.props.insert(Prop::YPercent, HIDDEN_Y_PERCENT);
        page.insert(char_node);
    }
    if let Some(n) = page.node_mut(source) {
        n.segmented = true;
    }

    tracing::debug!(
        node = %source,
        lines = segmented.lines.len(),
        chars = segmented.char_ids().len(),
        "segmented text block"
    );
    Some(segmented)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_rejoins_mid_word_wraps_and_keeps_manual_breaks() {
        let s = normalize_breaks("Fatur\ne Alto<br>Agora");
        assert_eq!(s, format!("Fature Alto{BREAK_SENTINEL}Agora"));
    }

    #[test]
    fn normalize_keeps_a_space_for_boundary_wraps() {
        assert_eq!(normalize_breaks("Fature \nAlto"), "Fature  Alto");
        assert_eq!(normalize_breaks("Fature\n Alto"), "Fature  Alto");
        assert_eq!(normalize_breaks("\nAlto"), " Alto");
    }

    #[test]
    fn manual_break_variants() {
        for marker in ["<br>", "<BR>", "<br/>", "<br />", "<Br />"] {
            let s = normalize_breaks(&format!("a{marker}b"));
            assert_eq!(s, format!("a{BREAK_SENTINEL}b"), "marker {marker}");
        }
        assert_eq!(normalize_breaks("a<brand>b"), "a<brand>b");
    }

    #[test]
    fn crlf_inside_a_word_rejoins_the_halves() {
        assert_eq!(normalize_breaks("Fatu\r\nre"), "Fature");
    }
}
