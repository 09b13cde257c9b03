//! Diagram emitter
//!
//! Turns the flow and lane assignment into a `DiagramDescription`, renders it
//! to the text DSL and hands it to a `DiagramRenderer`.

pub mod description;
pub mod labels;
pub mod renderer;

pub use description::{describe_flow, DiagramDescription, Lane};
pub use renderer::{DiagramRenderer, SyntaxFileRenderer};
