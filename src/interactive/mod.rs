//! Interactive heatmap viewer for editing emitters in real time

mod viewer;

pub use viewer::{InteractiveViewer, ViewerConfig};
