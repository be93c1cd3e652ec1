pub mod aggregator;
pub mod entry;

pub use aggregator::TranscriptAggregator;
pub use entry::TranscriptEntry;
