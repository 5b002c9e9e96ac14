//! Business functions behind each route.
//!
//! Each one takes exactly one bound command (or none) and talks to a single
//! collaborator. None of them knows how its result is rendered.

pub mod call;
pub mod cdr;
pub mod diagnostics;
pub mod portal;
pub mod queue;
