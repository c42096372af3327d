pub mod researcher;
pub mod work;

pub use researcher::{Researcher, ResearcherMetrics, ResearcherSummary};
pub use work::{MAX_CONCEPTS, RecordSource, Work};
