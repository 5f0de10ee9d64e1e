//! Results reported back to the operator

use std::fmt;
use thiserror::Error;

/// Every exchange operation resolves to exactly one of these
pub type Outcome = Result<Notice, Rejection>;

/// Successful or informational result of a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Offhook {
        name: String,
    },
    AlreadyOffhook {
        name: String,
    },
    Onhook {
        name: String,
    },
    AlreadyOnhook {
        name: String,
    },
    /// A call member went onhook; `silenced` is left alone when the call
    /// collapses
    HungUp {
        name: String,
        silenced: Option<String>,
    },
    Connected {
        caller: String,
        target: String,
    },
    ConferenceEstablished {
        names: Vec<String>,
    },
    AlreadyInCall {
        name: String,
    },
    Transferred {
        transferer: String,
        other: String,
        target: String,
    },
}

impl Notice {
    /// True when the command asked for a state the phone already had
    pub fn is_noop(&self) -> bool {
        matches!(
            self,
            Notice::AlreadyOffhook { .. } | Notice::AlreadyOnhook { .. } | Notice::AlreadyInCall { .. }
        )
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Offhook { name } => write!(f, "{name} is now offhook (dialtone)."),
            Notice::AlreadyOffhook { name } => write!(f, "{name} is already offhook."),
            Notice::Onhook { name } => write!(f, "{name} is now onhook."),
            Notice::AlreadyOnhook { name } => write!(f, "{name} is already onhook."),
            Notice::HungUp { name, silenced } => {
                write!(f, "{name} hung up.")?;
                if let Some(other) = silenced {
                    write!(f, " {other} hears silence.")?;
                }
                Ok(())
            }
            Notice::Connected { caller, target } => {
                write!(f, "{caller} is calling {target}. Call connected.")
            }
            Notice::ConferenceEstablished { names } => {
                write!(f, "Conference established: {}", names.join(", "))
            }
            Notice::AlreadyInCall { name } => write!(f, "{name} is already part of that call."),
            Notice::Transferred {
                transferer,
                other,
                target,
            } => write!(
                f,
                "Transfer completed: {other} is now talking to {target}. {transferer} hears silence."
            ),
        }
    }
}

/// Rejected command. The display form is the token the operator hears.
///
/// A rejection never leaves partial state behind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    /// Unknown identifier, or a request that can never succeed
    #[error("denial")]
    Denial,
    /// The phone is not in a state to accept the command
    #[error("silence")]
    Silence,
    /// Target unavailable or the exchange is at capacity
    #[error("busy")]
    Busy,
    #[error("conference full")]
    ConferenceFull,
    #[error("{name} declined the transfer.")]
    Declined { name: String },
}
