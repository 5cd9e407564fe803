//! `choreo-engine` – gesture interpretation and session lifecycle.
//!
//! The engine replaces per-gesture imperative procedures with one generic
//! interpreter over declarative step tables.
//!
//! # Modules
//!
//! - [`choreographer`] – [`Choreographer`][choreographer::Choreographer]:
//!   walks a [`GestureDefinition`][choreo_types::GestureDefinition], issuing
//!   fire-and-forget dispatches for non-blocking steps and suspending only
//!   at barrier steps and pacing delays. Step failures never abort a run.
//! - [`supervisor`] – [`ConnectionSupervisor`][supervisor::ConnectionSupervisor]:
//!   owns the driver, session, registry, and
//!   [`ConnectionState`][choreo_types::ConnectionState]; every shutdown path
//!   reaches Disconnected via Compliant.
//! - [`library`] – the built-in gesture tables (nod, shrug, pointing,
//!   emotions, goodbye wave, …).

pub mod choreographer;
pub mod library;
pub mod supervisor;

pub use choreographer::{abort_channel, Choreographer};
pub use supervisor::ConnectionSupervisor;
