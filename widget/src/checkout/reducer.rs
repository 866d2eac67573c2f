//! Checkout reducer: the two-phase form as a state machine.
//!
//! ```text
//! Empty ─start→ AddressEntry ─advance→ ContactEntry ⇄ Ready ─submit→ Submitting
//!                                                                      │
//!                              Empty ←──── success ───────────────────┤
//!                              Failed ←─── failure ───────────────────┘
//! ```
//!
//! `close` returns to `Empty` from anywhere. Submission results are matched
//! against the current attempt token; anything else is dropped.

use super::types::{
    AttemptToken, CheckoutAction, CheckoutEnvironment, CheckoutPhase, CheckoutState,
};
use crate::api::TransportError;
use crate::cart::CartSnapshot;
use crate::event::{ContactField, Payload, topics};
use crate::order::{OrderConfirmation, PaymentSelection};
use crate::validation::ValidationErrors;
use std::rc::Rc;
use storefront_core::effect::Effect;
use storefront_core::reducer::Reducer;
use storefront_core::{SmallVec, async_effect, emit, smallvec};

type Effects = SmallVec<[Effect<CheckoutAction, Payload>; 4]>;

/// Checkout reducer
#[derive(Debug, Clone, Copy, Default)]
pub struct CheckoutReducer;

impl CheckoutReducer {
    fn start(state: &mut CheckoutState, snapshot: CartSnapshot) -> Effects {
        if state.phase == CheckoutPhase::Submitting {
            tracing::debug!("Checkout start ignored while a submission is in flight");
            return smallvec![Effect::None];
        }
        state.reset();
        state.snapshot = snapshot;
        state.phase = CheckoutPhase::AddressEntry;
        tracing::debug!(
            items = state.snapshot.product_ids.len(),
            total = state.snapshot.total.units(),
            "Checkout started"
        );
        smallvec![phase_changed(state.phase)]
    }

    fn edit_address_phase(
        state: &mut CheckoutState,
        env: &CheckoutEnvironment,
        edit: impl FnOnce(&mut CheckoutState),
    ) -> Effects {
        if state.phase != CheckoutPhase::AddressEntry {
            tracing::debug!(phase = %state.phase, "Address phase edit ignored");
            return smallvec![Effect::None];
        }
        edit(state);
        state.address_errors = state.validate_address_phase(env.config.address_min_chars);
        smallvec![address_validated(state)]
    }

    fn advance(state: &mut CheckoutState, env: &CheckoutEnvironment) -> Effects {
        if state.phase != CheckoutPhase::AddressEntry {
            tracing::debug!(phase = %state.phase, "Advance ignored");
            return smallvec![Effect::None];
        }
        state.address_errors = state.validate_address_phase(env.config.address_min_chars);
        if !state.address_errors.is_empty() {
            return smallvec![address_validated(state)];
        }

        state.email.clear();
        state.phone.clear();
        state.contact_errors = ValidationErrors::new();
        state.phase = CheckoutPhase::ContactEntry;
        smallvec![address_validated(state), phase_changed(state.phase)]
    }

    fn edit_contact(
        state: &mut CheckoutState,
        env: &CheckoutEnvironment,
        field: ContactField,
        value: String,
    ) -> Effects {
        if !state.phase.accepts_contact_edits() {
            tracing::debug!(phase = %state.phase, %field, "Contact edit ignored");
            return smallvec![Effect::None];
        }
        match field {
            ContactField::Email => state.email = value,
            ContactField::Phone => state.phone = value,
        }
        state.failure = None;
        state.contact_errors = state.validate_contact_phase();

        let mut effects: Effects = smallvec![contact_validated(state)];
        let ready = state.contact_errors.is_empty()
            && state
                .validate_address_phase(env.config.address_min_chars)
                .is_empty();
        let next = if ready {
            CheckoutPhase::Ready
        } else {
            CheckoutPhase::ContactEntry
        };
        if next != state.phase {
            state.phase = next;
            effects.push(phase_changed(next));
        }
        effects
    }

    fn submit(state: &mut CheckoutState, env: &CheckoutEnvironment) -> Effects {
        if !state.phase.can_submit() {
            tracing::debug!(phase = %state.phase, "Submit ignored");
            return smallvec![Effect::None];
        }

        state.address_errors = state.validate_address_phase(env.config.address_min_chars);
        state.contact_errors = state.validate_contact_phase();
        let mut effects: Effects =
            smallvec![address_validated(state), contact_validated(state)];

        if !state.address_errors.is_empty() || !state.contact_errors.is_empty() {
            state.phase = CheckoutPhase::ContactEntry;
            effects.push(phase_changed(state.phase));
            return effects;
        }

        let record = match state.draft().finalize() {
            Ok(record) => record,
            Err(errors) => {
                tracing::debug!(%errors, "Order not submitted");
                effects.push(emit!(topics::VALIDATION_ORDER, Payload::Errors(errors)));
                return effects;
            },
        };

        let token = state.issue_token();
        state.failure = None;
        state.phase = CheckoutPhase::Submitting;
        tracing::info!(
            %token,
            items = record.items.len(),
            total = record.total.units(),
            "Submitting order"
        );
        effects.push(phase_changed(state.phase));

        let api = Rc::clone(&env.api);
        effects.push(async_effect!(async move {
            let outcome = api.submit_order(record).await;
            Some(CheckoutAction::SubmissionResolved { token, outcome })
        }));
        effects
    }

    fn resolve(
        state: &mut CheckoutState,
        env: &CheckoutEnvironment,
        token: AttemptToken,
        outcome: Result<OrderConfirmation, TransportError>,
    ) -> Effects {
        if state.phase != CheckoutPhase::Submitting || state.attempt != Some(token) {
            tracing::warn!(
                %token,
                current = ?state.attempt,
                phase = %state.phase,
                "Discarding stale submission result"
            );
            return smallvec![Effect::None];
        }

        match outcome {
            Ok(confirmation) => {
                tracing::info!(
                    %token,
                    order_id = %confirmation.order_id,
                    total = %confirmation.total,
                    "Order placed"
                );
                state.reset();
                smallvec![
                    phase_changed(state.phase),
                    emit!(
                        topics::ORDER_SUCCEEDED,
                        Payload::OrderSucceeded {
                            order_id: confirmation.order_id,
                            total: confirmation.total,
                        }
                    ),
                ]
            },
            Err(error) => {
                let reason = error.user_message(&env.config.fallback_failure_message);
                tracing::warn!(%token, %error, "Order rejected");
                state.attempt = None;
                state.failure = Some(reason.clone());
                state.phase = CheckoutPhase::Failed;
                smallvec![
                    phase_changed(state.phase),
                    emit!(topics::ORDER_FAILED, Payload::OrderFailed { reason }),
                ]
            },
        }
    }

    fn close(state: &mut CheckoutState) -> Effects {
        if state.phase == CheckoutPhase::Empty {
            return smallvec![Effect::None];
        }
        if let Some(token) = state.attempt {
            tracing::debug!(%token, "Abandoning in-flight submission");
        }
        state.reset();
        smallvec![phase_changed(state.phase)]
    }
}

impl Reducer for CheckoutReducer {
    type State = CheckoutState;
    type Action = CheckoutAction;
    type Environment = CheckoutEnvironment;
    type Payload = Payload;

    fn reduce(
        &self,
        state: &mut CheckoutState,
        action: CheckoutAction,
        env: &CheckoutEnvironment,
    ) -> Effects {
        match action {
            CheckoutAction::Start { snapshot } => Self::start(state, snapshot),
            CheckoutAction::EditAddress(address) => {
                Self::edit_address_phase(state, env, |s| s.address = address)
            },
            CheckoutAction::SelectPayment(method) => {
                Self::edit_address_phase(state, env, |s| {
                    s.payment = PaymentSelection::parse(&method);
                })
            },
            CheckoutAction::Advance => Self::advance(state, env),
            CheckoutAction::EditContact { field, value } => {
                Self::edit_contact(state, env, field, value)
            },
            CheckoutAction::Submit => Self::submit(state, env),
            CheckoutAction::SubmissionResolved { token, outcome } => {
                Self::resolve(state, env, token, outcome)
            },
            CheckoutAction::Close => Self::close(state),
        }
    }
}

fn phase_changed(phase: CheckoutPhase) -> Effect<CheckoutAction, Payload> {
    emit!(topics::CHECKOUT_PHASE_CHANGED, Payload::Phase(phase))
}

fn address_validated(state: &CheckoutState) -> Effect<CheckoutAction, Payload> {
    emit!(
        topics::VALIDATION_ADDRESS,
        Payload::Errors(state.address_errors.clone())
    )
}

fn contact_validated(state: &CheckoutState) -> Effect<CheckoutAction, Payload> {
    emit!(
        topics::VALIDATION_CONTACT,
        Payload::Errors(state.contact_errors.clone())
    )
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::config::WidgetConfig;
    use crate::mocks::MockStorefrontApi;
    use crate::order::PaymentMethod;
    use crate::product::{Money, ProductId};
    use crate::validation::{Field, FieldError};
    use storefront_testing::{ReducerTest, assertions};

    fn env() -> CheckoutEnvironment {
        CheckoutEnvironment::new(Rc::new(MockStorefrontApi::new()), WidgetConfig::default())
    }

    fn snapshot() -> CartSnapshot {
        CartSnapshot {
            product_ids: vec![ProductId::new("1")],
            total: Money::new(100),
        }
    }

    fn ready_state() -> CheckoutState {
        CheckoutState {
            phase: CheckoutPhase::Ready,
            address: "ул. Ленина 5".to_string(),
            payment: PaymentSelection::Chosen(PaymentMethod::Cash),
            email: "a@b.co".to_string(),
            phone: "89991234567".to_string(),
            snapshot: snapshot(),
            ..CheckoutState::default()
        }
    }

    fn submitting_state(token: u64) -> CheckoutState {
        CheckoutState {
            phase: CheckoutPhase::Submitting,
            attempt: Some(AttemptToken(token)),
            issued: token,
            ..ready_state()
        }
    }

    fn confirmation() -> OrderConfirmation {
        OrderConfirmation {
            order_id: "o-1".to_string(),
            total: Money::new(100),
        }
    }

    #[test]
    fn test_start_resets_and_enters_address_phase() {
        ReducerTest::new(CheckoutReducer)
            .with_env(env())
            .given_state(CheckoutState {
                failure: Some("old".to_string()),
                phase: CheckoutPhase::Failed,
                ..ready_state()
            })
            .when_action(CheckoutAction::Start {
                snapshot: CartSnapshot::default(),
            })
            .then_state(|state| {
                assert_eq!(state.phase, CheckoutPhase::AddressEntry);
                assert!(state.address.is_empty());
                assert_eq!(state.payment, PaymentSelection::Unset);
                assert_eq!(state.failure, None);
                assert!(state.errors().is_empty());
            })
            .then_effects(|effects| {
                assertions::assert_emitted(effects, &[topics::CHECKOUT_PHASE_CHANGED]);
            })
            .run();
    }

    #[test]
    fn test_start_is_ignored_while_submitting() {
        ReducerTest::new(CheckoutReducer)
            .with_env(env())
            .given_state(submitting_state(1))
            .when_action(CheckoutAction::Start {
                snapshot: CartSnapshot::default(),
            })
            .then_state(|state| assert_eq!(state.phase, CheckoutPhase::Submitting))
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_address_edit_reports_full_phase_map() {
        ReducerTest::new(CheckoutReducer)
            .with_env(env())
            .given_state(CheckoutState::default())
            .when_action(CheckoutAction::Start {
                snapshot: snapshot(),
            })
            .when_action(CheckoutAction::EditAddress("###".to_string()))
            .then_effects(|effects| {
                let Some(Payload::Errors(errors)) =
                    assertions::emitted_payload(effects, topics::VALIDATION_ADDRESS)
                else {
                    panic!("expected address validation");
                };
                assert_eq!(
                    errors.get(Field::Address),
                    Some(&FieldError::AddressDisallowedCharacters)
                );
                assert_eq!(errors.get(Field::Payment), Some(&FieldError::PaymentRequired));
            })
            .run();
    }

    #[test]
    fn test_address_errors_are_replaced_not_merged() {
        ReducerTest::new(CheckoutReducer)
            .with_env(env())
            .given_state(CheckoutState::default())
            .when_action(CheckoutAction::Start {
                snapshot: snapshot(),
            })
            .when_action(CheckoutAction::EditAddress("###".to_string()))
            .when_action(CheckoutAction::EditAddress("ул. Ленина 5".to_string()))
            .when_action(CheckoutAction::SelectPayment("card".to_string()))
            .then_state(|state| {
                assert!(state.address_errors.is_empty());
                assert_eq!(state.payment, PaymentSelection::Chosen(PaymentMethod::Card));
            })
            .then_effects(|effects| {
                assert_eq!(
                    assertions::emitted_payload(effects, topics::VALIDATION_ADDRESS),
                    Some(&Payload::Errors(ValidationErrors::new()))
                );
            })
            .run();
    }

    #[test]
    fn test_address_edit_outside_address_phase_is_ignored() {
        ReducerTest::new(CheckoutReducer)
            .with_env(env())
            .given_state(ready_state())
            .when_action(CheckoutAction::EditAddress(String::new()))
            .then_state(|state| assert_eq!(state.address, "ул. Ленина 5"))
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_advance_requires_valid_address_phase() {
        ReducerTest::new(CheckoutReducer)
            .with_env(env())
            .given_state(CheckoutState::default())
            .when_action(CheckoutAction::Start {
                snapshot: snapshot(),
            })
            .when_action(CheckoutAction::EditAddress("ул. Ленина 5".to_string()))
            .when_action(CheckoutAction::Advance)
            .then_state(|state| {
                assert_eq!(state.phase, CheckoutPhase::AddressEntry);
                assert!(state.address_errors.contains(Field::Payment));
            })
            .then_effects(|effects| {
                assertions::assert_emitted(effects, &[topics::VALIDATION_ADDRESS]);
            })
            .run();
    }

    #[test]
    fn test_advance_enters_contact_phase() {
        ReducerTest::new(CheckoutReducer)
            .with_env(env())
            .given_state(CheckoutState::default())
            .when_action(CheckoutAction::Start {
                snapshot: snapshot(),
            })
            .when_action(CheckoutAction::EditAddress("ул. Ленина 5".to_string()))
            .when_action(CheckoutAction::SelectPayment("cash".to_string()))
            .when_action(CheckoutAction::Advance)
            .then_state(|state| {
                assert_eq!(state.phase, CheckoutPhase::ContactEntry);
                assert!(state.email.is_empty());
            })
            .then_effects(|effects| {
                assertions::assert_emitted(
                    effects,
                    &[topics::VALIDATION_ADDRESS, topics::CHECKOUT_PHASE_CHANGED],
                );
            })
            .run();
    }

    #[test]
    fn test_contact_edits_reach_ready() {
        ReducerTest::new(CheckoutReducer)
            .with_env(env())
            .given_state(CheckoutState {
                phase: CheckoutPhase::ContactEntry,
                email: String::new(),
                phone: String::new(),
                ..ready_state()
            })
            .when_action(CheckoutAction::EditContact {
                field: ContactField::Email,
                value: "a@b.co".to_string(),
            })
            .when_action(CheckoutAction::EditContact {
                field: ContactField::Phone,
                value: "+7 (999) 123-45-67".to_string(),
            })
            .then_state(|state| {
                assert_eq!(state.phase, CheckoutPhase::Ready);
                assert!(state.contact_errors.is_empty());
            })
            .then_effects(|effects| {
                assertions::assert_emitted(
                    effects,
                    &[topics::VALIDATION_CONTACT, topics::CHECKOUT_PHASE_CHANGED],
                );
                assert_eq!(
                    assertions::emitted_payload(effects, topics::CHECKOUT_PHASE_CHANGED),
                    Some(&Payload::Phase(CheckoutPhase::Ready))
                );
            })
            .run();
    }

    #[test]
    fn test_invalid_contact_edit_leaves_ready() {
        ReducerTest::new(CheckoutReducer)
            .with_env(env())
            .given_state(ready_state())
            .when_action(CheckoutAction::EditContact {
                field: ContactField::Phone,
                value: "123".to_string(),
            })
            .then_state(|state| {
                assert_eq!(state.phase, CheckoutPhase::ContactEntry);
                assert_eq!(
                    state.contact_errors.get(Field::Phone),
                    Some(&FieldError::PhoneInvalid)
                );
                assert!(state.address_errors.is_empty());
            })
            .run();
    }

    #[test]
    fn test_contact_edit_clears_failure() {
        ReducerTest::new(CheckoutReducer)
            .with_env(env())
            .given_state(CheckoutState {
                phase: CheckoutPhase::Failed,
                failure: Some("rejected".to_string()),
                ..ready_state()
            })
            .when_action(CheckoutAction::EditContact {
                field: ContactField::Email,
                value: "b@c.org".to_string(),
            })
            .then_state(|state| {
                assert_eq!(state.failure, None);
                assert_eq!(state.phase, CheckoutPhase::Ready);
            })
            .run();
    }

    #[test]
    fn test_submit_from_ready_starts_attempt() {
        ReducerTest::new(CheckoutReducer)
            .with_env(env())
            .given_state(ready_state())
            .when_action(CheckoutAction::Submit)
            .then_state(|state| {
                assert_eq!(state.phase, CheckoutPhase::Submitting);
                assert_eq!(state.attempt, Some(AttemptToken(1)));
            })
            .then_effects(|effects| {
                assertions::assert_emitted(
                    effects,
                    &[
                        topics::VALIDATION_ADDRESS,
                        topics::VALIDATION_CONTACT,
                        topics::CHECKOUT_PHASE_CHANGED,
                    ],
                );
                assertions::assert_has_future_effect(effects);
            })
            .run();
    }

    #[test]
    fn test_submit_with_empty_snapshot_reports_order_errors() {
        ReducerTest::new(CheckoutReducer)
            .with_env(env())
            .given_state(CheckoutState {
                snapshot: CartSnapshot::default(),
                ..ready_state()
            })
            .when_action(CheckoutAction::Submit)
            .then_state(|state| {
                assert_eq!(state.phase, CheckoutPhase::Ready);
                assert_eq!(state.attempt, None);
            })
            .then_effects(|effects| {
                assertions::assert_no_future_effect(effects);
                let Some(Payload::Errors(errors)) =
                    assertions::emitted_payload(effects, topics::VALIDATION_ORDER)
                else {
                    panic!("expected order validation");
                };
                assert_eq!(errors.get(Field::Items), Some(&FieldError::NoItems));
            })
            .run();
    }

    #[test]
    fn test_submit_with_unset_payment_never_submits() {
        ReducerTest::new(CheckoutReducer)
            .with_env(env())
            .given_state(CheckoutState {
                payment: PaymentSelection::Unset,
                ..ready_state()
            })
            .when_action(CheckoutAction::Submit)
            .then_state(|state| {
                assert_eq!(state.phase, CheckoutPhase::ContactEntry);
                assert!(state.address_errors.contains(Field::Payment));
            })
            .then_effects(assertions::assert_no_future_effect)
            .run();
    }

    #[test]
    fn test_repeat_submit_is_ignored() {
        ReducerTest::new(CheckoutReducer)
            .with_env(env())
            .given_state(submitting_state(3))
            .when_action(CheckoutAction::Submit)
            .then_state(|state| assert_eq!(state.attempt, Some(AttemptToken(3))))
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_submit_from_contact_entry_is_ignored() {
        ReducerTest::new(CheckoutReducer)
            .with_env(env())
            .given_state(CheckoutState {
                phase: CheckoutPhase::ContactEntry,
                ..ready_state()
            })
            .when_action(CheckoutAction::Submit)
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_success_resets_and_announces() {
        ReducerTest::new(CheckoutReducer)
            .with_env(env())
            .given_state(submitting_state(2))
            .when_action(CheckoutAction::SubmissionResolved {
                token: AttemptToken(2),
                outcome: Ok(confirmation()),
            })
            .then_state(|state| {
                assert_eq!(state.phase, CheckoutPhase::Empty);
                assert!(state.address.is_empty());
                assert_eq!(state.attempt, None);
                assert_eq!(state.issued, 2);
            })
            .then_effects(|effects| {
                assertions::assert_emitted(
                    effects,
                    &[topics::CHECKOUT_PHASE_CHANGED, topics::ORDER_SUCCEEDED],
                );
                assert_eq!(
                    assertions::emitted_payload(effects, topics::ORDER_SUCCEEDED),
                    Some(&Payload::OrderSucceeded {
                        order_id: "o-1".to_string(),
                        total: Money::new(100),
                    })
                );
            })
            .run();
    }

    #[test]
    fn test_failure_keeps_fields_and_uses_reason() {
        ReducerTest::new(CheckoutReducer)
            .with_env(env())
            .given_state(submitting_state(2))
            .when_action(CheckoutAction::SubmissionResolved {
                token: AttemptToken(2),
                outcome: Err(TransportError::Rejected {
                    reason: "Неверная сумма заказа".to_string(),
                }),
            })
            .then_state(|state| {
                assert_eq!(state.phase, CheckoutPhase::Failed);
                assert_eq!(state.address, "ул. Ленина 5");
                assert_eq!(state.failure.as_deref(), Some("Неверная сумма заказа"));
            })
            .then_effects(|effects| {
                assert_eq!(
                    assertions::emitted_payload(effects, topics::ORDER_FAILED),
                    Some(&Payload::OrderFailed {
                        reason: "Неверная сумма заказа".to_string()
                    })
                );
            })
            .run();
    }

    #[test]
    fn test_blank_failure_text_uses_configured_fallback() {
        let env = CheckoutEnvironment::new(
            Rc::new(MockStorefrontApi::new()),
            WidgetConfig::default().with_fallback_failure_message("Try again later"),
        );

        ReducerTest::new(CheckoutReducer)
            .with_env(env)
            .given_state(submitting_state(1))
            .when_action(CheckoutAction::SubmissionResolved {
                token: AttemptToken(1),
                outcome: Err(TransportError::Network(String::new())),
            })
            .then_state(|state| {
                assert_eq!(state.failure.as_deref(), Some("Try again later"));
            })
            .run();
    }

    #[test]
    fn test_error_page_body_is_not_shown_to_the_user() {
        let env = CheckoutEnvironment::new(
            Rc::new(MockStorefrontApi::new()),
            WidgetConfig::default().with_fallback_failure_message("Try again later"),
        );

        ReducerTest::new(CheckoutReducer)
            .with_env(env)
            .given_state(submitting_state(1))
            .when_action(CheckoutAction::SubmissionResolved {
                token: AttemptToken(1),
                outcome: Err(TransportError::Status {
                    status: 502,
                    body: "<html><body>502 Bad Gateway</body></html>".to_string(),
                }),
            })
            .then_state(|state| {
                assert_eq!(state.phase, CheckoutPhase::Failed);
                assert_eq!(state.failure.as_deref(), Some("Try again later"));
            })
            .then_effects(|effects| {
                assert_eq!(
                    assertions::emitted_payload(effects, topics::ORDER_FAILED),
                    Some(&Payload::OrderFailed {
                        reason: "Try again later".to_string()
                    })
                );
            })
            .run();
    }

    #[test]
    fn test_stale_result_is_discarded() {
        ReducerTest::new(CheckoutReducer)
            .with_env(env())
            .given_state(submitting_state(5))
            .when_action(CheckoutAction::SubmissionResolved {
                token: AttemptToken(4),
                outcome: Ok(confirmation()),
            })
            .then_state(|state| {
                assert_eq!(state.phase, CheckoutPhase::Submitting);
                assert_eq!(state.attempt, Some(AttemptToken(5)));
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_result_after_close_and_restart_is_discarded() {
        ReducerTest::new(CheckoutReducer)
            .with_env(env())
            .given_state(submitting_state(1))
            .when_action(CheckoutAction::Close)
            .when_action(CheckoutAction::Start {
                snapshot: snapshot(),
            })
            .when_action(CheckoutAction::SubmissionResolved {
                token: AttemptToken(1),
                outcome: Ok(confirmation()),
            })
            .then_state(|state| {
                assert_eq!(state.phase, CheckoutPhase::AddressEntry);
                assert_eq!(state.snapshot, snapshot());
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_close_from_empty_is_silent() {
        ReducerTest::new(CheckoutReducer)
            .with_env(env())
            .given_state(CheckoutState::default())
            .when_action(CheckoutAction::Close)
            .then_effects(assertions::assert_no_effects)
            .run();
    }
}
