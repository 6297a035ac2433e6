//! Event-log data model
//!
//! Events arrive already validated and attribute-mapped; everything in this
//! module is immutable once constructed.

pub mod event;
pub mod instance;

pub use event::{ActivityClass, CaseId, Event, EventRecord, Originator};
pub use instance::{ProcessInstance, TimeFrame};
