pub mod map_writer;
pub mod plot_writer;

pub use map_writer::{marker_color, MapMarker, MapWriter};
pub use plot_writer::PlotWriter;
