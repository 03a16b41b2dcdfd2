//! Animation-parameter generator for multi-segment loading indicators.
//!
//! # Architecture
//!
//! A [`indicator::StyleGenerator`] turns an [`indicator::IndicatorConfig`]
//! into a [`indicator::SegmentSet`]: per-segment geometry plus declarative
//! [`timeline::KeyframeTimeline`]s for every animated property. Nothing here
//! paints or ticks frames. The [`controller::IndicatorController`] hands the
//! generated set to a host [`compositor::Compositor`], which runs the
//! timelines on its own clock, and drives the start/stop/hide lifecycle
//! against the live handles.
//!
//! # Guidelines
//!
//! The code should be formatted with Rustfmt using the project-level
//! `rustfmt.toml`. E.g. run from the command line: `cargo fmt`.
//!
//! The code should pass clippy lints in pedantic mode. E.g. run from the
//! command line: `cargo clippy`. It's fine to suppress some lint locally with
//! `#[allow(clippy:<lint>)]` attribute.
//!
//! The code should be properly documented and should pass the
//! `#[warn(missing_docs)]` lint.

#![warn(missing_docs, unsafe_op_in_unsafe_fn)]
#![warn(clippy::pedantic)]
#![allow(clippy::doc_markdown, clippy::missing_errors_doc, clippy::missing_panics_doc)]

pub mod cli;
pub mod color;
pub mod compositor;
pub mod config;
pub mod consts;
pub mod controller;
pub mod geometry;
pub mod indicator;
pub mod logger;
pub mod timeline;
