//! The event bus.
//!
//! Subscribers register the handlers they declare. Events posted to the bus
//! wait in a FIFO queue until [`EventBus::publish_posts`] delivers them, and
//! requests are dispatched on the spot.
//!
//! ```text
//! post(e1) ─┐
//! post(e2) ─┼─► [ e1 | e2 | e3 ] ──publish_posts──► handlers of e1, then e2, ...
//! post(e3) ─┘          ▲                                 │
//!                      └──────── post(e4) ◄──────────────┘
//!
//! request(q) ───────────────────────────────► handlers of q ──► q.request().get()
//! ```
//!
//! Handlers of one message type run in subscription order and, within a
//! subscriber, in declaration order.

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::rc::Rc;

use algostorm_foundation::{Error, Result, SemanticLimit};
use tracing::{debug, trace, warn};

use crate::config::BusConfig;
use crate::message::{Event, Query};
use crate::subscriber::{HandlerSet, Subscriber};
use crate::validate::{Verdict, validate};

type SharedQueue = Rc<RefCell<VecDeque<Box<dyn Event>>>>;

// =============================================================================
// Poster
// =============================================================================

/// A handle that posts events to the queue of an [`EventBus`].
///
/// Handlers capture a poster to publish follow-up events while a flush is in
/// progress. Those events are delivered by the same flush.
#[derive(Clone)]
pub struct Poster {
    queue: SharedQueue,
}

impl Poster {
    /// Queues an event.
    pub fn post<E: Event>(&self, event: E) {
        self.post_boxed(Box::new(event));
    }

    /// Queues a type-erased event.
    pub fn post_boxed(&self, event: Box<dyn Event>) {
        trace!(event = ?event, "posted event");
        self.queue.borrow_mut().push_back(event);
    }

    /// Queues events in iteration order.
    pub fn post_all<I>(&self, events: I)
    where
        I: IntoIterator<Item = Box<dyn Event>>,
    {
        for event in events {
            self.post_boxed(event);
        }
    }

    /// Returns the number of queued events.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    fn new() -> Self {
        Self {
            queue: Rc::new(RefCell::new(VecDeque::new())),
        }
    }

    fn pop(&self) -> Option<Box<dyn Event>> {
        self.queue.borrow_mut().pop_front()
    }

    fn push_front(&self, event: Box<dyn Event>) {
        self.queue.borrow_mut().push_front(event);
    }
}

impl fmt::Debug for Poster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Poster")
            .field("pending", &self.pending())
            .finish()
    }
}

// =============================================================================
// Registrations
// =============================================================================

/// Identity of a subscribed instance: the address of its shared cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct SubscriberKey(usize);

impl SubscriberKey {
    fn of<S>(subscriber: &Rc<RefCell<S>>) -> Self {
        Self(Rc::as_ptr(subscriber).cast::<()>() as usize)
    }
}

struct BoundHandler {
    name: String,
    message: TypeId,
    call: Box<dyn FnMut(&mut dyn Any)>,
}

struct Registration {
    key: SubscriberKey,
    /// Keeps the subscriber allocated, so its key cannot be reused by another
    /// instance while registered.
    _pin: Rc<dyn Any>,
    subscriber: &'static str,
    handlers: Vec<BoundHandler>,
}

// =============================================================================
// Event Bus
// =============================================================================

/// Routes events and requests to subscribed handlers.
///
/// # Examples
///
/// ```rust
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// use algostorm_event::{Event, EventBus, HandlerSet, Subscriber};
///
/// #[derive(Debug)]
/// struct Damaged(u32);
///
/// impl Event for Damaged {}
///
/// #[derive(Default)]
/// struct Log(Vec<u32>);
///
/// impl Subscriber for Log {
///     fn declare(&self, handlers: &mut HandlerSet<Self>) {
///         handlers.on_event("on_damaged", |log: &mut Log, event: &Damaged| log.0.push(event.0));
///     }
/// }
///
/// let log = Rc::new(RefCell::new(Log::default()));
/// let mut bus = EventBus::new();
/// bus.subscribe(&log).unwrap();
///
/// bus.post(Damaged(3));
/// bus.post(Damaged(5));
/// assert!(log.borrow().0.is_empty());
///
/// assert_eq!(bus.publish_posts().unwrap(), 2);
/// assert_eq!(log.borrow().0, vec![3, 5]);
/// ```
pub struct EventBus {
    config: BusConfig,
    queue: Poster,
    registrations: Vec<Registration>,
    /// Message type to `(registration, handler)` indices, in delivery order.
    routes: HashMap<TypeId, Vec<(usize, usize)>>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    /// Creates a bus with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(BusConfig::default())
    }

    /// Creates a bus with the given configuration.
    #[must_use]
    pub fn with_config(config: BusConfig) -> Self {
        Self {
            config,
            queue: Poster::new(),
            registrations: Vec::new(),
            routes: HashMap::new(),
        }
    }

    /// Returns the bus configuration.
    #[must_use]
    pub fn config(&self) -> &BusConfig {
        &self.config
    }

    /// Returns a handle posting to this bus's queue.
    #[must_use]
    pub fn poster(&self) -> Poster {
        self.queue.clone()
    }

    /// Returns the number of subscribed instances.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.registrations.len()
    }

    /// Returns true if `subscriber` is subscribed.
    #[must_use]
    pub fn is_subscribed<S>(&self, subscriber: &Rc<RefCell<S>>) -> bool {
        let key = SubscriberKey::of(subscriber);
        self.registrations.iter().any(|r| r.key == key)
    }

    /// Subscribes the handlers `subscriber` declares.
    ///
    /// Subscribing an instance again replaces its handlers but keeps its
    /// position in the delivery order. Declarations that are not public
    /// instance handlers are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidHandler`](algostorm_foundation::ErrorKind::InvalidHandler)
    /// if a considered handler is malformed. Nothing is registered in that
    /// case.
    pub fn subscribe<S: Subscriber>(&mut self, subscriber: &Rc<RefCell<S>>) -> Result<()> {
        let type_name = std::any::type_name::<S>();
        let mut set = HandlerSet::new();
        subscriber.borrow().declare(&mut set);

        let mut handlers = Vec::with_capacity(set.len());
        for declaration in set.into_declarations() {
            let verdict = validate(&declaration.signature)
                .map_err(|err| err.with_context(format!("subscribing {type_name}")))?;
            let message = match verdict {
                Verdict::Accept(message) => message,
                Verdict::Skip => {
                    debug!(
                        subscriber = type_name,
                        handler = %declaration.signature.name,
                        "ignoring non-handler declaration"
                    );
                    continue;
                }
            };

            let target = Rc::clone(subscriber);
            let mut callback = declaration.callback;
            handlers.push(BoundHandler {
                name: declaration.signature.name,
                message: message.type_id(),
                call: Box::new(move |payload: &mut dyn Any| {
                    callback(&mut *target.borrow_mut(), payload);
                }),
            });
        }

        let key = SubscriberKey::of(subscriber);
        let handler_count = handlers.len();
        let pin: Rc<dyn Any> = Rc::clone(subscriber) as Rc<dyn Any>;
        let registration = Registration {
            key,
            _pin: pin,
            subscriber: type_name,
            handlers,
        };
        match self.registrations.iter_mut().find(|r| r.key == key) {
            Some(existing) => *existing = registration,
            None => self.registrations.push(registration),
        }
        self.rebuild_routes();

        debug!(subscriber = type_name, handlers = handler_count, "subscribed");
        Ok(())
    }

    /// Removes every handler of `subscriber`.
    ///
    /// Returns false if it was not subscribed.
    pub fn unsubscribe<S>(&mut self, subscriber: &Rc<RefCell<S>>) -> bool {
        let key = SubscriberKey::of(subscriber);
        let Some(position) = self.registrations.iter().position(|r| r.key == key) else {
            return false;
        };
        let registration = self.registrations.remove(position);
        self.rebuild_routes();

        debug!(subscriber = registration.subscriber, "unsubscribed");
        true
    }

    fn rebuild_routes(&mut self) {
        self.routes.clear();
        for (index, registration) in self.registrations.iter().enumerate() {
            for (slot, handler) in registration.handlers.iter().enumerate() {
                self.routes
                    .entry(handler.message)
                    .or_default()
                    .push((index, slot));
            }
        }
    }

    /// Queues an event for the next flush.
    pub fn post<E: Event>(&mut self, event: E) {
        self.queue.post(event);
    }

    /// Queues events for the next flush, in iteration order.
    pub fn post_all<I>(&mut self, events: I)
    where
        I: IntoIterator<Item = Box<dyn Event>>,
    {
        self.queue.post_all(events);
    }

    /// Returns the number of queued events.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.pending()
    }

    /// Delivers queued events in FIFO order until the queue is empty,
    /// including events posted by handlers during the flush.
    ///
    /// Returns the number of delivered events. Events no handler listens to
    /// are consumed and count as delivered.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::LimitExceeded`](algostorm_foundation::ErrorKind::LimitExceeded)
    /// when the configured flush cap is reached. Undelivered events stay
    /// queued.
    ///
    /// # Panics
    ///
    /// Panics if a subscriber is borrowed elsewhere while one of its handlers
    /// runs.
    pub fn publish_posts(&mut self) -> Result<usize> {
        let mut delivered = 0;
        while let Some(mut event) = self.queue.pop() {
            if let Some(limit) = self.config.max_events_per_flush {
                if delivered >= limit {
                    self.queue.push_front(event);
                    let pending = self.queue.pending();
                    warn!(limit, pending, "flush stopped at event cap");
                    return Err(Error::limit_exceeded(SemanticLimit::MaxFlushEvents {
                        limit,
                        pending,
                    }));
                }
            }

            let handled = self.dispatch((*event).as_any_mut());
            trace!(event = ?event, handlers = handled, "delivered event");
            delivered += 1;
        }
        Ok(delivered)
    }

    /// Dispatches `query` to its handlers and returns the completed result.
    ///
    /// Handlers must not send requests through this bus themselves.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::RequestNotCompleted`](algostorm_foundation::ErrorKind::RequestNotCompleted)
    /// if no handler completed the request, or
    /// [`ErrorKind::RequestAlreadyCompleted`](algostorm_foundation::ErrorKind::RequestAlreadyCompleted)
    /// if more than one did.
    ///
    /// # Panics
    ///
    /// Panics if a subscriber is borrowed elsewhere while one of its handlers
    /// runs.
    pub fn request<'q, Q: Query>(&mut self, query: &'q mut Q) -> Result<&'q Q::Output> {
        let handled = self.dispatch(&mut *query);
        trace!(request = ?query, handlers = handled, "dispatched request");
        query
            .request()
            .get()
            .map_err(|err| err.with_context(format!("requesting {}", std::any::type_name::<Q>())))
    }

    /// Runs every handler routed to the message's type. Returns the number of
    /// handlers run.
    fn dispatch(&mut self, message: &mut dyn Any) -> usize {
        let type_id = Any::type_id(&*message);
        let Some(routes) = self.routes.get(&type_id) else {
            return 0;
        };
        for &(registration, slot) in routes {
            let handler = &mut self.registrations[registration].handlers[slot];
            trace!(handler = %handler.name, "running handler");
            (handler.call)(&mut *message);
        }
        routes.len()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let subscribers: Vec<_> = self.registrations.iter().map(|r| r.subscriber).collect();
        f.debug_struct("EventBus")
            .field("config", &self.config)
            .field("subscribers", &subscribers)
            .field("pending", &self.pending())
            .finish_non_exhaustive()
    }
}
