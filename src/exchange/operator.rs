//! Synchronous operator decisions needed mid-command
//!
//! A real exchange would wait on signaling for these. Here they are blocking
//! questions put to whoever drives the console.

use super::CallSummary;
use crate::directory::PhoneEntry;

pub trait Operator {
    /// Ask `target` whether it takes the call `transferer` is handing over
    fn accept_transfer(&mut self, target: &PhoneEntry, transferer: &PhoneEntry) -> bool;

    /// Pick which call a conference joins. Returns a 1-based index.
    fn choose_call(&mut self, calls: &[CallSummary]) -> Option<usize>;
}
