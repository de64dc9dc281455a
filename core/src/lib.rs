//! Client core for the todo service.
//!
//! # Overview
//! - `TodoClient` builds `HttpRequest` values and parses `HttpResponse`
//!   values without touching the network.
//! - `ApiClient` executes them through a `Transport` and routes every outcome
//!   through the `ResponseInterceptor`, which reports server errors to a
//!   `Notifier` before returning them.
//! - `format_date_time` renders timestamps for display.
//! - `Debouncer` and `TodoBoard` hold the small amount of stateful logic a
//!   todo view needs: debounced search and the list/draft/busy state.
//!
//! # Design
//! - `TodoClient` and the formatter are stateless; `ApiClient` holds only its
//!   fixed base URL, transport and notifier.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod api;
pub mod board;
pub mod client;
pub mod config;
pub mod datetime;
pub mod debounce;
pub mod error;
pub mod http;
pub mod interceptor;
pub mod transport;
pub mod types;

pub use api::ApiClient;
pub use board::{BoardState, PendingAction, TodoBoard};
pub use client::TodoClient;
pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use datetime::{format_date_time, DateTimeFormatter, FormatSpec};
pub use debounce::Debouncer;
pub use error::{ApiError, ConfigError, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use interceptor::{Notifier, ResponseInterceptor, TracingNotifier};
pub use transport::{Transport, UreqTransport};
pub use types::{Todo, TodoList};
