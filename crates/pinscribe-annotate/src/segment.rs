use crate::lookup::PhoneticLookup;

/// One maximal run of the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Non-Chinese text, passed through unchanged.
    Plain(String),
    /// A run of Chinese characters with one reading per code point.
    /// `readings.len() == base.chars().count()` always holds.
    Annotated {
        base: String,
        readings: Vec<String>,
    },
}

impl Segment {
    pub fn base_text(&self) -> &str {
        match self {
            Segment::Plain(text) => text,
            Segment::Annotated { base, .. } => base,
        }
    }

    pub fn is_annotated(&self) -> bool {
        matches!(self, Segment::Annotated { .. })
    }
}

/// Annotated view of a piece of text: an ordered partition into plain and
/// annotated segments, no gaps, no overlaps, no empty segments, and never
/// two adjacent segments of the same kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotatedText {
    pub segments: Vec<Segment>,
}

impl AnnotatedText {
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Reconstructs the exact source text (the partition invariant).
    pub fn source_text(&self) -> String {
        self.segments.iter().map(Segment::base_text).collect()
    }

    /// Rendered form with readings inlined after each Chinese run,
    /// e.g. `你好（nǐ hǎo） world`.
    pub fn display_string(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Plain(text) => out.push_str(text),
                Segment::Annotated { base, readings } => {
                    out.push_str(base);
                    out.push('（');
                    out.push_str(&readings.join(" "));
                    out.push('）');
                }
            }
        }
        out
    }
}

/// Chinese character for annotation purposes: the CJK Unified Ideographs
/// block, U+4E00–U+9FFF.
pub fn is_han(ch: char) -> bool {
    ('\u{4e00}'..='\u{9fff}').contains(&ch)
}

/// Annotate `text`: every maximal run of Chinese characters becomes one
/// annotated segment with per-character readings from `lookup`; everything
/// else passes through in plain segments. Pure and total — unknown
/// characters get empty-string readings.
pub fn annotate<L: PhoneticLookup + ?Sized>(text: &str, lookup: &L) -> AnnotatedText {
    let mut segments = Vec::new();
    let mut plain = String::new();
    let mut base = String::new();
    let mut readings = Vec::new();

    // Iterate by code point so alignment survives multi-byte characters.
    for ch in text.chars() {
        if is_han(ch) {
            if !plain.is_empty() {
                segments.push(Segment::Plain(std::mem::take(&mut plain)));
            }
            base.push(ch);
            readings.push(lookup.reading_of(ch));
        } else {
            if !base.is_empty() {
                segments.push(Segment::Annotated {
                    base: std::mem::take(&mut base),
                    readings: std::mem::take(&mut readings),
                });
            }
            plain.push(ch);
        }
    }

    if !plain.is_empty() {
        segments.push(Segment::Plain(plain));
    }
    if !base.is_empty() {
        segments.push(Segment::Annotated { base, readings });
    }

    AnnotatedText { segments }
}
