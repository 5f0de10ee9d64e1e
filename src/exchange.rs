//! Call state machine
//!
//! Tracks every phone's state and the calls bridging them, and applies
//! operator commands one at a time. Phone states and call membership are
//! kept consistent: members of a two-party call are `TALKING_2WAY`, members
//! of a three-party call are `TALKING_3WAY`, and no one else is talking.

mod command;
mod machine;
mod operator;
mod outcome;
mod state;

#[cfg(test)]
mod proptests;
#[cfg(test)]
pub mod testing;

pub use command::Command;
pub use machine::{Exchange, ExchangeLimits, DEFAULT_MAX_ACTIVE_CALLS};
pub use operator::Operator;
pub use outcome::{Notice, Outcome, Rejection};
pub use state::CallSummary;
#[cfg(test)]
pub use state::PhoneState;
