// core/src/lib.rs

//! Boxoffice: the cart, checkout and reporting core of the TicketsPro cinema
//! ticketing service.
//!
//!  - [`Cart`] collects movies and ticket counts for one session.
//!  - [`OrderFinalizer`] snapshots live prices and persists an [`Order`].
//!  - [`report::ReportBuilder`] lays records out as a PDF table, fetching
//!    per-row images serially and collecting non-fatal diagnostics.
//!  - [`Pipeline`] runs named async steps over a shared [`ContextData`], which
//!    is how the application sequences checkout (persist, then clear) and
//!    report generation.
//!
//! Persistence sits behind the [`store::TicketStore`] traits and is always
//! passed in explicitly.

pub mod cart;
pub mod checkout;
pub mod core;
pub mod error;
pub mod models;
pub mod money;
pub mod pipeline;
pub mod report;
pub mod store;

pub use crate::cart::{Cart, CartItem};
pub use crate::checkout::OrderFinalizer;
pub use crate::core::{ContextData, Handler, PipelineControl, PipelineResult, StepDef};
pub use crate::error::{BoxOfficeError, FetchError, ImageFetchError, PipelineError, Result};
pub use crate::models::{Actor, Cinema, Entity, Movie, MovieCategory, NewOrder, Order, OrderLine, Producer, UserRole};
pub use crate::money::{format_currency, parse_currency};
pub use crate::pipeline::Pipeline;
pub use crate::store::{EntityStore, InMemoryStore, OrderStore, TicketStore};
