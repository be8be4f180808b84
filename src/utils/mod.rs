pub mod constants;
pub mod coordinates;
pub mod filename;
pub mod progress;

pub use constants::*;
pub use coordinates::{bounding_box, centroid, parse_decimal_coordinate, validate_coordinates};
pub use filename::{is_offset_output, offset_output_path, plot_file_name};
pub use progress::ProgressReporter;
