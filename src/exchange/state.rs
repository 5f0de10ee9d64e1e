//! Phone and call state types

use std::fmt;

/// Largest call the exchange will bridge
pub const MAX_CALL_MEMBERS: usize = 3;

/// Per-phone call state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PhoneState {
    #[default]
    Onhook,
    OffhookDialtone,
    /// Caller side of a call being set up
    Calling,
    /// Being offered a call, transfer or conference
    Ringing,
    Talking2Way,
    Talking3Way,
    /// Handing its slot in a call to someone else
    Transferring,
    /// Pulling a third party into its call
    Conferencing,
}

impl PhoneState {
    pub fn as_str(self) -> &'static str {
        match self {
            PhoneState::Onhook => "ONHOOK",
            PhoneState::OffhookDialtone => "OFFHOOK_DIALTONE",
            PhoneState::Calling => "CALLING",
            PhoneState::Ringing => "RINGING",
            PhoneState::Talking2Way => "TALKING_2WAY",
            PhoneState::Talking3Way => "TALKING_3WAY",
            PhoneState::Transferring => "TRANSFERRING",
            PhoneState::Conferencing => "CONFERENCING",
        }
    }

    /// State every member of a call of `size` must hold
    pub fn talking(size: usize) -> Option<Self> {
        match size {
            2 => Some(PhoneState::Talking2Way),
            3 => Some(PhoneState::Talking3Way),
            _ => None,
        }
    }

    /// Mid-protocol labels; never visible once a command has returned
    pub fn is_transient(self) -> bool {
        matches!(
            self,
            PhoneState::Calling
                | PhoneState::Ringing
                | PhoneState::Transferring
                | PhoneState::Conferencing
        )
    }
}

impl fmt::Display for PhoneState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier assigned to each call when it is bridged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CallId(pub u32);

impl fmt::Display for CallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "call-{}", self.0)
    }
}

/// A bridge of two or three distinct phones.
///
/// Members are kept in join order for display; membership itself is
/// unordered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    id: CallId,
    members: Vec<String>,
}

impl Call {
    pub(super) fn new(id: CallId, first: String, second: String) -> Self {
        Self {
            id,
            members: vec![first, second],
        }
    }

    pub fn id(&self) -> CallId {
        self.id
    }

    pub fn members(&self) -> &[String] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn contains(&self, number: &str) -> bool {
        self.members.iter().any(|m| m == number)
    }

    pub fn is_full(&self) -> bool {
        self.members.len() >= MAX_CALL_MEMBERS
    }

    pub(super) fn add(&mut self, number: String) {
        debug_assert!(!self.is_full() && !self.contains(&number));
        self.members.push(number);
    }

    /// Remove a member, returning whether it was present
    pub(super) fn remove(&mut self, number: &str) -> bool {
        let before = self.members.len();
        self.members.retain(|m| m != number);
        self.members.len() != before
    }

    /// Hand `old`'s slot to `new`, keeping its position
    pub(super) fn replace(&mut self, old: &str, new: String) -> bool {
        match self.members.iter_mut().find(|m| m.as_str() == old) {
            Some(slot) => {
                *slot = new;
                true
            }
            None => false,
        }
    }
}

/// Operator-facing view of an active call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSummary {
    /// 1-based position in the active call list
    pub index: usize,
    pub names: Vec<String>,
}

impl fmt::Display for CallSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Call {}: {}", self.index, self.names.join(" <-> "))
    }
}
