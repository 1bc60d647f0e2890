//! Replay prevention for one-time codes.

mod guard;

pub use guard::{MarkUsed, ReplayGuard};
