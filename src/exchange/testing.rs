//! Test doubles for the exchange

use super::{CallSummary, Exchange, ExchangeLimits, Operator, PhoneState};
use crate::directory::{Directory, PhoneEntry};
use std::collections::VecDeque;

/// Operator that replays queued answers.
///
/// Transfers are accepted and no call is chosen once the queues run dry.
#[derive(Debug, Default)]
pub struct ScriptedOperator {
    transfer_answers: VecDeque<bool>,
    call_choices: VecDeque<Option<usize>>,
    /// `(target, transferer)` numbers for every transfer offered
    pub offers: Vec<(String, String)>,
    /// How many times a call choice was requested
    pub choice_requests: usize,
}

impl ScriptedOperator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answering(answers: impl IntoIterator<Item = bool>) -> Self {
        Self {
            transfer_answers: answers.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn choosing(choices: impl IntoIterator<Item = Option<usize>>) -> Self {
        Self {
            call_choices: choices.into_iter().collect(),
            ..Self::default()
        }
    }
}

impl Operator for ScriptedOperator {
    fn accept_transfer(&mut self, target: &PhoneEntry, transferer: &PhoneEntry) -> bool {
        self.offers
            .push((target.number.clone(), transferer.number.clone()));
        self.transfer_answers.pop_front().unwrap_or(true)
    }

    fn choose_call(&mut self, _calls: &[CallSummary]) -> Option<usize> {
        self.choice_requests += 1;
        self.call_choices.pop_front().flatten()
    }
}

/// Alice, Bob, Carol, Dave and Eve on 12345..56789
pub fn sample_directory() -> Directory {
    Directory::new(vec![
        PhoneEntry::new("12345", "Alice"),
        PhoneEntry::new("23456", "Bob"),
        PhoneEntry::new("34567", "Carol"),
        PhoneEntry::new("45678", "Dave"),
        PhoneEntry::new("56789", "Eve"),
    ])
    .unwrap()
}

pub fn sample_exchange() -> Exchange {
    Exchange::with_limits(sample_directory(), ExchangeLimits::default())
}

/// Every phone's state plus every call's members, for before/after checks
pub fn snapshot(exchange: &Exchange) -> (Vec<(String, PhoneState)>, Vec<Vec<String>>) {
    let phones = exchange
        .phones()
        .map(|(entry, state)| (entry.number.clone(), state))
        .collect();
    let calls = exchange
        .active_calls()
        .iter()
        .map(|call| call.members().to_vec())
        .collect();
    (phones, calls)
}

/// Check the phone/call consistency rules, returning the first violation
pub fn check_invariants(exchange: &Exchange) -> Result<(), String> {
    let calls = exchange.active_calls();

    for (i, call) in calls.iter().enumerate() {
        if !(2..=3).contains(&call.len()) {
            return Err(format!("call {} has {} members", call.id(), call.len()));
        }
        for other in &calls[i + 1..] {
            if let Some(shared) = call.members().iter().find(|m| other.contains(m)) {
                return Err(format!("{shared} is in {} and {}", call.id(), other.id()));
            }
        }
    }

    for (entry, state) in exchange.phones() {
        if state.is_transient() {
            return Err(format!("{} left in transient state {state}", entry.number));
        }
        let expected = exchange
            .call_of(&entry.number)
            .and_then(|call| PhoneState::talking(call.len()));
        match expected {
            Some(talking) if state != talking => {
                return Err(format!("{} is {state} but should be {talking}", entry.number));
            }
            None if !matches!(state, PhoneState::Onhook | PhoneState::OffhookDialtone) => {
                return Err(format!("{} is {state} outside any call", entry.number));
            }
            _ => {}
        }
    }

    Ok(())
}
