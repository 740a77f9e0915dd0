#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Fire-and-forget UDP telemetry: perf records per tool call and
//! periodic discovery records, sent over a bounded channel that drops
//! rather than blocks when the collector can't keep up.
//!
//! # Modules
//!
//! - [`emitter`] — [`emitter::TelemetryEmitter`], the bounded sender handle
//! - [`record`] — [`record::PerfRecord`] and [`record::DiscoveryRecord`] wire shapes

pub mod emitter;
pub mod record;

pub use emitter::TelemetryEmitter;
pub use record::{AuthInfo, Connector, DiscoveryRecord, PerfContext, PerfRecord, RailInfo};
