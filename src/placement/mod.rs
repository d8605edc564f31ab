//! Comment placement: line resolution and annotation scheduling.

pub mod resolver;
pub mod scheduler;

pub use resolver::{resolve, Resolution};
pub use scheduler::{AnnotationScheduler, CapConfig, PlacementOutcome, SessionCounters};
