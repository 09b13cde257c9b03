//! Flow construction
//!
//! Groups sentence containers into exclusive blocks, parallel blocks and
//! plain activities, then resolves lanes and end activities.

pub mod actors;
pub mod builder;
pub mod end_activity;
pub mod lanes;
pub mod structure;

pub use builder::{FlowBuilder, FlowItem};
pub use end_activity::EndActivityDetector;
pub use lanes::Lanes;
pub use structure::{
    Activity, AndBlock, Branch, ConditionBlock, ConditionType, Structure, StructureId,
    StructureIdAllocator,
};
