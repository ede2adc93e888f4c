//! Ordered event bus with synchronous requests for Algostorm.
//!
//! This crate provides:
//! - [`Event`] / [`Query`] - Posted and requested message kinds
//! - [`Request`] - Single-completion result slot of a query
//! - [`Subscriber`] / [`HandlerSet`] - Handler declaration and validation
//! - [`EventBus`] - FIFO event queue and synchronous request dispatch
//!
//! # Example
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use algostorm_event::{EventBus, HandlerSet, Query, Request, Subscriber};
//!
//! #[derive(Debug, Default)]
//! struct Distance {
//!     from: (i32, i32),
//!     to: (i32, i32),
//!     result: Request<i32>,
//! }
//!
//! impl Query for Distance {
//!     type Output = i32;
//!
//!     fn request(&self) -> &Request<i32> {
//!         &self.result
//!     }
//!
//!     fn request_mut(&mut self) -> &mut Request<i32> {
//!         &mut self.result
//!     }
//! }
//!
//! struct Manhattan;
//!
//! impl Subscriber for Manhattan {
//!     fn declare(&self, handlers: &mut HandlerSet<Self>) {
//!         handlers.on_request("on_distance", |_: &mut Self, query: &mut Distance| {
//!             let d = (query.from.0 - query.to.0).abs() + (query.from.1 - query.to.1).abs();
//!             query.request_mut().complete(d).unwrap();
//!         });
//!     }
//! }
//!
//! let mut bus = EventBus::new();
//! bus.subscribe(&Rc::new(RefCell::new(Manhattan))).unwrap();
//!
//! let mut query = Distance { from: (0, 0), to: (3, -4), ..Distance::default() };
//! assert_eq!(*bus.request(&mut query).unwrap(), 7);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod bus;
pub mod config;
pub mod message;
pub mod request;
pub mod subscriber;
pub mod validate;

pub use bus::{EventBus, Poster};
pub use config::BusConfig;
pub use message::{Event, MessageKind, MessageType, Query};
pub use request::Request;
pub use subscriber::{
    Callback, HandlerDeclaration, HandlerSet, HandlerSignature, ParameterType, Receiver,
    ReturnType, Subscriber, Visibility,
};
pub use validate::{Verdict, validate};

pub use algostorm_foundation::{Error, ErrorKind, HandlerRule, Result, SemanticLimit};
