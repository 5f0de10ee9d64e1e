//! The exchange: phone states, active calls, and the commands that move them
//!
//! Every operation validates completely before touching any state, so a
//! rejected command leaves the exchange exactly as it found it.

use super::operator::Operator;
use super::state::{Call, CallId, CallSummary, PhoneState, MAX_CALL_MEMBERS};
use super::{Command, Notice, Outcome, Rejection};
use crate::directory::{Directory, PhoneEntry};
use std::collections::HashMap;

pub const DEFAULT_MAX_ACTIVE_CALLS: usize = 10;

/// Capacity limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExchangeLimits {
    pub max_active_calls: usize,
}

impl Default for ExchangeLimits {
    fn default() -> Self {
        Self {
            max_active_calls: DEFAULT_MAX_ACTIVE_CALLS,
        }
    }
}

/// Owner of all mutable call state
#[derive(Debug, Clone)]
pub struct Exchange {
    directory: Directory,
    states: HashMap<String, PhoneState>,
    calls: Vec<Call>,
    next_call_id: u32,
    limits: ExchangeLimits,
}

impl Exchange {
    pub fn with_limits(directory: Directory, limits: ExchangeLimits) -> Self {
        let states = directory
            .entries()
            .iter()
            .map(|e| (e.number.clone(), PhoneState::Onhook))
            .collect();
        Self {
            directory,
            states,
            calls: Vec::new(),
            next_call_id: 1,
            limits,
        }
    }

    // ------------------------------------------------------------------
    // Read-only views
    // ------------------------------------------------------------------

    /// Unknown numbers read as onhook
    pub fn state_of(&self, number: &str) -> PhoneState {
        self.states.get(number).copied().unwrap_or_default()
    }

    /// Every phone in directory order with its current state
    pub fn phones(&self) -> impl Iterator<Item = (&PhoneEntry, PhoneState)> + '_ {
        self.directory
            .entries()
            .iter()
            .map(|e| (e, self.state_of(&e.number)))
    }

    pub fn active_calls(&self) -> &[Call] {
        &self.calls
    }

    pub fn call_of(&self, number: &str) -> Option<&Call> {
        self.calls.iter().find(|c| c.contains(number))
    }

    /// The other members of `number`'s call, if any
    pub fn partners_of(&self, number: &str) -> Vec<&PhoneEntry> {
        self.call_of(number)
            .map(|call| {
                call.members()
                    .iter()
                    .filter(|m| m.as_str() != number)
                    .filter_map(|m| self.directory.get(m))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// The phone an implicit `call` is placed from: the first one, in
    /// directory order, that has dial tone
    pub fn dialing_phone(&self) -> Option<&PhoneEntry> {
        self.phones()
            .find(|(_, state)| *state == PhoneState::OffhookDialtone)
            .map(|(entry, _)| entry)
    }

    pub fn call_summaries(&self) -> Vec<CallSummary> {
        self.calls
            .iter()
            .enumerate()
            .map(|(i, call)| CallSummary {
                index: i + 1,
                names: call.members().iter().map(|m| self.name_of(m)).collect(),
            })
            .collect()
    }

    // ------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------

    /// Run one operator command to completion
    pub fn apply(&mut self, command: Command, operator: &mut dyn Operator) -> Outcome {
        let name = command.name();
        let outcome = match command {
            Command::Offhook { phone } => self.go_offhook(&phone),
            Command::Onhook { phone } => self.go_onhook(&phone),
            Command::Call { target } => self.call_from_dialing_phone(&target),
            Command::Transfer { from, target } => self.transfer_call(&from, &target, operator),
            Command::Conference { target, selection } => {
                self.conference(&target, selection, operator)
            }
        };
        match &outcome {
            Ok(notice) => {
                tracing::debug!(
                    command = name,
                    %notice,
                    noop = notice.is_noop(),
                    "Command completed"
                );
            }
            Err(rejection) => tracing::debug!(command = name, %rejection, "Command rejected"),
        }
        outcome
    }

    pub fn go_offhook(&mut self, identifier: &str) -> Outcome {
        let phone = self.lookup(identifier)?;
        if self.state_of(&phone.number) != PhoneState::Onhook {
            return Ok(Notice::AlreadyOffhook { name: phone.name });
        }
        self.set_state(&phone.number, PhoneState::OffhookDialtone);
        Ok(Notice::Offhook { name: phone.name })
    }

    /// Hang up. A call member always leaves its call, whatever its state.
    pub fn go_onhook(&mut self, identifier: &str) -> Outcome {
        let phone = self.lookup(identifier)?;
        if let Some(index) = self.call_index_of(&phone.number) {
            let silenced = self
                .leave_call(index, &phone.number)
                .map(|number| self.name_of(&number));
            return Ok(Notice::HungUp {
                name: phone.name,
                silenced,
            });
        }
        if self.state_of(&phone.number) == PhoneState::Onhook {
            return Ok(Notice::AlreadyOnhook { name: phone.name });
        }
        self.set_state(&phone.number, PhoneState::Onhook);
        Ok(Notice::Onhook { name: phone.name })
    }

    /// Bridge `caller`, which must have dial tone, to an idle `target`.
    /// The target rings and answers straight away.
    pub fn place_call(&mut self, caller: &str, target: &str) -> Outcome {
        let target = self.lookup(target)?;
        let caller = self.lookup(caller)?;
        if self.state_of(&caller.number) != PhoneState::OffhookDialtone {
            return Err(Rejection::Silence);
        }
        if caller.number == target.number {
            return Err(Rejection::Denial);
        }
        if self.call_of(&caller.number).is_some() || self.call_of(&target.number).is_some() {
            return Err(Rejection::Busy);
        }
        if self.state_of(&target.number) != PhoneState::Onhook {
            return Err(Rejection::Busy);
        }
        if self.calls.len() >= self.limits.max_active_calls {
            tracing::warn!(
                limit = self.limits.max_active_calls,
                "Active call limit reached"
            );
            return Err(Rejection::Busy);
        }

        self.set_state(&caller.number, PhoneState::Calling);
        self.set_state(&target.number, PhoneState::Ringing);

        let id = self.allocate_call_id();
        self.calls
            .push(Call::new(id, caller.number.clone(), target.number.clone()));
        self.set_state(&caller.number, PhoneState::Talking2Way);
        self.set_state(&target.number, PhoneState::Talking2Way);
        tracing::info!(call_id = %id, caller = %caller.number, target = %target.number, "Call connected");

        Ok(Notice::Connected {
            caller: caller.name,
            target: target.name,
        })
    }

    /// Add a third party to an active call.
    ///
    /// `selection` (1-based) picks the call. Without it the only call with
    /// room is used, and the operator is asked when there are several.
    pub fn conference(
        &mut self,
        identifier: &str,
        selection: Option<usize>,
        operator: &mut dyn Operator,
    ) -> Outcome {
        let participant = self.lookup(identifier)?;
        if self.calls.is_empty() {
            return Err(Rejection::Silence);
        }
        let index = self.select_call(selection, operator)?;

        let call = &self.calls[index];
        if call.contains(&participant.number) {
            return Ok(Notice::AlreadyInCall {
                name: participant.name,
            });
        }
        if call.is_full() {
            return Err(Rejection::ConferenceFull);
        }
        if self.call_of(&participant.number).is_some()
            || self.state_of(&participant.number) != PhoneState::Onhook
        {
            return Err(Rejection::Busy);
        }

        let existing = call.members().to_vec();
        for member in &existing {
            self.set_state(member, PhoneState::Conferencing);
        }
        self.set_state(&participant.number, PhoneState::Ringing);

        self.calls[index].add(participant.number.clone());
        let call = self.calls[index].clone();
        self.settle(&call);
        tracing::info!(call_id = %call.id(), joined = %participant.number, "Conference established");

        Ok(Notice::ConferenceEstablished {
            names: call.members().iter().map(|m| self.name_of(m)).collect(),
        })
    }

    /// Hand `transferer`'s place in a two-way call to `target`.
    ///
    /// The target is offered the call through `operator`. On decline the
    /// previous pairing is restored and the command reports failure.
    pub fn transfer_call(
        &mut self,
        transferer: &str,
        target: &str,
        operator: &mut dyn Operator,
    ) -> Outcome {
        let transferer = self.lookup(transferer)?;
        let target = self.lookup(target)?;
        let Some(index) = self.call_index_of(&transferer.number) else {
            return Err(Rejection::Silence);
        };

        let call = &self.calls[index];
        if call.len() != 2 {
            return Err(Rejection::Denial);
        }
        if target.number == transferer.number || call.contains(&target.number) {
            return Err(Rejection::Denial);
        }
        if self.call_of(&target.number).is_some()
            || self.state_of(&target.number) != PhoneState::Onhook
        {
            return Err(Rejection::Busy);
        }
        let other = call
            .members()
            .iter()
            .find(|m| **m != transferer.number)
            .cloned()
            .ok_or(Rejection::Denial)?;

        self.set_state(&transferer.number, PhoneState::Transferring);
        self.set_state(&target.number, PhoneState::Ringing);

        if operator.accept_transfer(&target, &transferer) {
            self.calls[index].replace(&transferer.number, target.number.clone());
            self.set_state(&transferer.number, PhoneState::Onhook);
            let call = self.calls[index].clone();
            self.settle(&call);
            tracing::info!(
                call_id = %call.id(),
                from = %transferer.number,
                to = %target.number,
                "Call transferred"
            );
            Ok(Notice::Transferred {
                transferer: transferer.name,
                other: self.name_of(&other),
                target: target.name,
            })
        } else {
            self.set_state(&target.number, PhoneState::Onhook);
            self.set_state(&transferer.number, PhoneState::Talking2Way);
            tracing::info!(from = %transferer.number, to = %target.number, "Transfer declined");
            Err(Rejection::Declined { name: target.name })
        }
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn call_from_dialing_phone(&mut self, target: &str) -> Outcome {
        self.lookup(target)?;
        let caller = self
            .dialing_phone()
            .map(|e| e.number.clone())
            .ok_or(Rejection::Silence)?;
        self.place_call(&caller, target)
    }

    fn lookup(&self, identifier: &str) -> Result<PhoneEntry, Rejection> {
        self.directory
            .resolve(identifier)
            .cloned()
            .ok_or(Rejection::Denial)
    }

    fn name_of(&self, number: &str) -> String {
        self.directory
            .get(number)
            .map_or_else(|| number.to_string(), |e| e.name.clone())
    }

    fn call_index_of(&self, number: &str) -> Option<usize> {
        self.calls.iter().position(|c| c.contains(number))
    }

    fn select_call(
        &self,
        selection: Option<usize>,
        operator: &mut dyn Operator,
    ) -> Result<usize, Rejection> {
        if let Some(n) = selection {
            return n
                .checked_sub(1)
                .filter(|i| *i < self.calls.len())
                .ok_or(Rejection::Denial);
        }

        // Only calls with room are candidates. When every call is full they
        // all are, so the choice still ends in "conference full".
        let mut candidates = self.call_summaries();
        if candidates.iter().any(|c| c.names.len() < MAX_CALL_MEMBERS) {
            candidates.retain(|c| c.names.len() < MAX_CALL_MEMBERS);
        }
        if let [only] = candidates.as_slice() {
            return Ok(only.index - 1);
        }
        let chosen = operator.choose_call(&candidates).ok_or(Rejection::Denial)?;
        candidates
            .iter()
            .find(|c| c.index == chosen)
            .map(|c| c.index - 1)
            .ok_or(Rejection::Denial)
    }

    fn allocate_call_id(&mut self) -> CallId {
        let id = CallId(self.next_call_id);
        self.next_call_id = self.next_call_id.wrapping_add(1);
        id
    }

    /// Put every member of `call` into the talking state its size calls for
    fn settle(&mut self, call: &Call) {
        if let Some(talking) = PhoneState::talking(call.len()) {
            for member in call.members() {
                self.set_state(member, talking);
            }
        }
    }

    /// Remove `number` from the call at `index`, which goes onhook.
    ///
    /// Returns the number left hearing silence when the call collapses.
    fn leave_call(&mut self, index: usize, number: &str) -> Option<String> {
        self.calls[index].remove(number);
        self.set_state(number, PhoneState::Onhook);

        let call = self.calls[index].clone();
        match call.members() {
            [] => {
                self.calls.remove(index);
                tracing::info!(call_id = %call.id(), "Call ended");
                None
            }
            [remaining] => {
                self.calls.remove(index);
                self.set_state(remaining, PhoneState::OffhookDialtone);
                tracing::info!(call_id = %call.id(), left = %number, "Call ended");
                Some(remaining.clone())
            }
            _ => {
                self.settle(&call);
                tracing::info!(call_id = %call.id(), left = %number, "Member left call");
                None
            }
        }
    }

    fn set_state(&mut self, number: &str, state: PhoneState) {
        if let Some(current) = self.states.get_mut(number) {
            if *current != state {
                tracing::debug!(
                    number,
                    from = %current,
                    to = %state,
                    transient = state.is_transient(),
                    "Phone state changed"
                );
                *current = state;
            }
        }
    }
}
