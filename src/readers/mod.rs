pub mod discovery;
pub mod fanmountains_reader;
pub mod format;
pub mod metadata_reader;
pub mod plot_index;
pub mod sangvor_reader;
pub mod text;

pub use discovery::find_csv_files;
pub use fanmountains_reader::FanMountainsReader;
pub use format::{format_timestamp, parse_timestamp, LogFormat};
pub use metadata_reader::{discover_tables, MetadataMap, MetadataReader};
pub use plot_index::find_plot_files;
pub use sangvor_reader::SangvorReader;
pub use text::read_lossy;
