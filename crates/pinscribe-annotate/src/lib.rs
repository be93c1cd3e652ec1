pub mod lookup;
pub mod segment;

pub use lookup::{PhoneticLookup, PinyinLookup};
pub use segment::{annotate, is_han, AnnotatedText, Segment};
