use pinyin::ToPinyin;

/// Per-character phonetic lookup. Total and side-effect-free: characters
/// with no known reading yield an empty string, never an error.
pub trait PhoneticLookup {
    /// Tone-marked reading (diacritic form, e.g. "nǐ") for one character.
    fn reading_of(&self, ch: char) -> String;
}

/// Production lookup backed by the `pinyin` crate's bundled dictionary.
#[derive(Debug, Clone, Copy, Default)]
pub struct PinyinLookup;

impl PinyinLookup {
    pub fn new() -> Self {
        Self
    }
}

impl PhoneticLookup for PinyinLookup {
    fn reading_of(&self, ch: char) -> String {
        ch.to_pinyin()
            .map(|p| p.with_tone().to_string())
            .unwrap_or_default()
    }
}

// Lets tests inject stub lookups as plain closures.
impl<F> PhoneticLookup for F
where
    F: Fn(char) -> String,
{
    fn reading_of(&self, ch: char) -> String {
        self(ch)
    }
}
