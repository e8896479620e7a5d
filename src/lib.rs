// Library exports for statescatter

pub mod csv_reader;
pub mod criteria;
pub mod graph;
pub mod interaction;
pub mod parser;
pub mod runtime;
pub mod tooltip;

// Render pipeline
pub mod ir;
pub mod scale;
pub mod compiler;
