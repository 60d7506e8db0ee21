//! RateViet Report
//!
//! The batch artifact chain: rating-distribution tally, word-frequency
//! visualization, report assembly, and the tabular export. Everything
//! here consumes inference output; nothing mutates persisted state.

pub mod distribution;
pub mod export;
pub mod report;
pub mod wordcloud;

pub use distribution::tally;
pub use export::results_csv;
pub use report::{ReportAssembler, ReportMeta};
pub use wordcloud::{wordcloud_file_name, WordCloudRenderer};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::distribution::tally;
    pub use crate::export::results_csv;
    pub use crate::report::{ReportAssembler, ReportMeta};
    pub use crate::wordcloud::{wordcloud_file_name, WordCloudRenderer};
}
