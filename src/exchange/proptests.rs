//! Property-based tests for the exchange
//!
//! Random command sequences against a five-phone directory must never break
//! the phone/call consistency rules.

use super::testing::{check_invariants, sample_exchange, snapshot, ScriptedOperator};
use super::*;
use proptest::prelude::*;

// ============================================================================
// Arbitrary Generators
// ============================================================================

/// Known numbers, names in any case, and a few strangers
fn arb_identifier() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => prop::sample::select(vec!["12345", "23456", "34567", "45678", "56789"])
            .prop_map(String::from),
        4 => prop::sample::select(vec!["Alice", "bob", "CAROL", "Dave", "eve"])
            .prop_map(String::from),
        1 => prop::sample::select(vec!["99999", "Zed", "", "1234"]).prop_map(String::from),
    ]
}

fn arb_command() -> impl Strategy<Value = Command> {
    prop_oneof![
        3 => arb_identifier().prop_map(|phone| Command::Offhook { phone }),
        2 => arb_identifier().prop_map(|phone| Command::Onhook { phone }),
        3 => arb_identifier().prop_map(|target| Command::Call { target }),
        2 => (arb_identifier(), arb_identifier())
            .prop_map(|(from, target)| Command::Transfer { from, target }),
        2 => (arb_identifier(), proptest::option::of(0usize..4))
            .prop_map(|(target, selection)| Command::Conference { target, selection }),
    ]
}

fn arb_operator() -> impl Strategy<Value = ScriptedOperator> {
    proptest::collection::vec(any::<bool>(), 0..10).prop_map(ScriptedOperator::answering)
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    // Invariant 1: states match call membership after every command
    #[test]
    fn prop_commands_preserve_invariants(
        commands in proptest::collection::vec(arb_command(), 0..40),
        mut operator in arb_operator()
    ) {
        let mut ex = sample_exchange();
        for command in commands {
            let _ = ex.apply(command, &mut operator);
            if let Err(violation) = check_invariants(&ex) {
                prop_assert!(false, "Invariant broken: {}", violation);
            }
        }
    }

    // Invariant 2: a rejected command changes nothing
    #[test]
    fn prop_rejections_leave_state_unchanged(
        setup in proptest::collection::vec(arb_command(), 0..20),
        command in arb_command(),
        mut operator in arb_operator()
    ) {
        let mut ex = sample_exchange();
        for step in setup {
            let _ = ex.apply(step, &mut operator);
        }

        let before = snapshot(&ex);
        let outcome = ex.apply(command.clone(), &mut operator);
        if outcome.is_err() {
            prop_assert_eq!(snapshot(&ex), before, "{:?} rejected but mutated", command);
        }
    }

    // Invariant 3: informational no-ops change nothing either
    #[test]
    fn prop_noops_leave_state_unchanged(
        setup in proptest::collection::vec(arb_command(), 0..20),
        command in arb_command()
    ) {
        let mut ex = sample_exchange();
        let mut operator = ScriptedOperator::new();
        for step in setup {
            let _ = ex.apply(step, &mut operator);
        }

        let before = snapshot(&ex);
        if let Ok(notice) = ex.apply(command, &mut operator) {
            if notice.is_noop() {
                prop_assert_eq!(snapshot(&ex), before);
            }
        }
    }

    // Invariant 4: unknown identifiers are always denied
    #[test]
    fn prop_unknown_identifiers_denied(
        setup in proptest::collection::vec(arb_command(), 0..20),
        stranger in prop::sample::select(vec!["99999", "Zed", "Mallory"])
    ) {
        let mut ex = sample_exchange();
        let mut operator = ScriptedOperator::new();
        for step in setup {
            let _ = ex.apply(step, &mut operator);
        }

        let stranger = stranger.to_string();
        for command in [
            Command::Offhook { phone: stranger.clone() },
            Command::Onhook { phone: stranger.clone() },
            Command::Call { target: stranger.clone() },
            Command::Conference { target: stranger.clone(), selection: None },
            Command::Transfer { from: "Alice".to_string(), target: stranger.clone() },
        ] {
            prop_assert_eq!(ex.apply(command, &mut operator), Err(Rejection::Denial));
        }
    }

    // Invariant 5: onhook always leaves the phone onhook and out of any call
    #[test]
    fn prop_onhook_always_disconnects(
        setup in proptest::collection::vec(arb_command(), 0..30),
        phone in prop::sample::select(vec!["12345", "23456", "34567", "45678", "56789"])
    ) {
        let mut ex = sample_exchange();
        let mut operator = ScriptedOperator::new();
        for step in setup {
            let _ = ex.apply(step, &mut operator);
        }

        prop_assert!(ex.go_onhook(phone).is_ok());
        prop_assert_eq!(ex.state_of(phone), PhoneState::Onhook);
        prop_assert!(ex.call_of(phone).is_none());
    }

    // Invariant 6: the call cap is never exceeded
    #[test]
    fn prop_call_limit_respected(
        limit in 1usize..3,
        commands in proptest::collection::vec(arb_command(), 0..40)
    ) {
        let mut ex = Exchange::with_limits(
            super::testing::sample_directory(),
            ExchangeLimits { max_active_calls: limit },
        );
        let mut operator = ScriptedOperator::new();
        for command in commands {
            let _ = ex.apply(command, &mut operator);
            prop_assert!(ex.active_calls().len() <= limit);
        }
    }
}
