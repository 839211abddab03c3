//! Runtime execution of drawing programs

mod analyzer;
mod color;

pub use analyzer::{
    AnalyzerConfig, DrawSink, Pen, Point, PointRecorder, SemanticAnalyzer, Transform,
};
pub use color::{ColorTable, Rgb};
