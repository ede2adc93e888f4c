//! Integration tests for subscriber validation
//!
//! Handlers described at runtime are checked when their subscriber is
//! subscribed. Non-public and static declarations are skipped silently.

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use algostorm_event::{
    ErrorKind, Event, EventBus, HandlerRule, HandlerSet, HandlerSignature, MessageKind,
    MessageType, ParameterType, Receiver, Subscriber, Visibility,
};

#[derive(Debug)]
struct Spawned(u32);

impl Event for Spawned {}

/// A subscriber whose handlers are described at runtime, like those of a
/// scripted object.
struct Scripted {
    signatures: Vec<HandlerSignature>,
    calls: Vec<String>,
}

impl Scripted {
    fn new(signatures: Vec<HandlerSignature>) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self {
            signatures,
            calls: Vec::new(),
        }))
    }
}

impl Subscriber for Scripted {
    fn declare(&self, handlers: &mut HandlerSet<Self>) {
        for signature in &self.signatures {
            let name = signature.name.clone();
            handlers.declare(signature.clone(), move |this: &mut Self, message: &mut dyn Any| {
                if let Some(event) = message.downcast_ref::<Spawned>() {
                    this.calls.push(format!("{name}:{}", event.0));
                }
            });
        }
    }
}

fn spawned(name: &str) -> HandlerSignature {
    HandlerSignature::new(name, MessageType::event::<Spawned>())
}

fn rejected_rule(signature: HandlerSignature) -> HandlerRule {
    let mut bus = EventBus::new();
    let subscriber = Scripted::new(vec![signature]);
    match bus.subscribe(&subscriber).unwrap_err().kind {
        ErrorKind::InvalidHandler { rule, .. } => rule,
        other => panic!("unexpected error kind: {other:?}"),
    }
}

// =============================================================================
// Accepted Declarations
// =============================================================================

#[test]
fn valid_declarations_are_called_in_order() {
    let subscriber = Scripted::new(vec![spawned("first"), spawned("second")]);
    let mut bus = EventBus::new();
    bus.subscribe(&subscriber).unwrap();

    bus.post(Spawned(4));
    bus.publish_posts().unwrap();
    assert_eq!(subscriber.borrow().calls, vec!["first:4", "second:4"]);
}

#[test]
fn private_and_static_declarations_are_ignored() {
    let subscriber = Scripted::new(vec![
        spawned("helper").with_visibility(Visibility::Private),
        spawned("hook").with_visibility(Visibility::Protected).overridable(),
        spawned("factory")
            .with_receiver(Receiver::Static)
            .returning("Spawned"),
        spawned("handler"),
    ]);
    let mut bus = EventBus::new();
    bus.subscribe(&subscriber).unwrap();

    bus.post(Spawned(1));
    bus.publish_posts().unwrap();
    assert_eq!(subscriber.borrow().calls, vec!["handler:1"]);
}

#[test]
fn subscriber_without_handlers_is_accepted() {
    let subscriber = Scripted::new(Vec::new());
    let mut bus = EventBus::new();
    bus.subscribe(&subscriber).unwrap();
    assert!(bus.is_subscribed(&subscriber));
}

// =============================================================================
// Rejected Declarations
// =============================================================================

#[test]
fn overridable_handler_is_rejected() {
    assert_eq!(
        rejected_rule(spawned("open").overridable()),
        HandlerRule::NotOverridable
    );
}

#[test]
fn value_returning_handler_is_rejected() {
    assert_eq!(
        rejected_rule(spawned("answer").returning("bool")),
        HandlerRule::ReturnsUnit
    );
}

#[test]
fn handler_with_two_parameters_is_rejected() {
    let message = ParameterType::Message(MessageType::event::<Spawned>());
    let signature = spawned("pair").with_parameters(vec![message.clone(), message]);
    assert_eq!(rejected_rule(signature), HandlerRule::SingleParameter);
}

#[test]
fn handler_of_non_message_is_rejected() {
    let signature = spawned("count").with_parameters(vec![ParameterType::Other("u32".into())]);
    assert_eq!(rejected_rule(signature), HandlerRule::MessageParameter);
}

#[test]
fn generic_handler_is_rejected() {
    let signature = spawned("any")
        .with_type_parameters(1)
        .with_parameters(vec![ParameterType::TypeVariable {
            name: "E".into(),
            bound: Some(MessageKind::Event),
        }]);
    assert_eq!(rejected_rule(signature), HandlerRule::NotGeneric);
}

#[test]
fn handler_of_open_request_is_rejected() {
    let signature =
        spawned("any_request").with_parameters(vec![ParameterType::OpenMessage(MessageKind::Request)]);
    assert_eq!(rejected_rule(signature), HandlerRule::ConcreteParameter);
}

#[test]
fn rejected_subscriber_is_not_partially_registered() {
    let subscriber = Scripted::new(vec![spawned("fine"), spawned("broken").overridable()]);
    let mut bus = EventBus::new();
    assert!(bus.subscribe(&subscriber).is_err());

    bus.post(Spawned(1));
    bus.publish_posts().unwrap();
    assert!(subscriber.borrow().calls.is_empty());
    assert!(!bus.is_subscribed(&subscriber));
}
