pub mod file_grouper;
pub mod pipeline;
pub mod series_merger;
pub mod time_offset;
pub mod title_resolver;

pub use file_grouper::{is_metadata_file, logger_id_from_path, FileGroups, FileGrouper};
pub use pipeline::{LoggerPipeline, MapReport, PlotReport};
pub use series_merger::SeriesMerger;
pub use time_offset::{parse_offset, OffsetRewriter};
pub use title_resolver::resolve_title;
