//! Web handlers and the registry that resolves URLs to them.
//!
//! ## Key Components
//!
//! - [`WebHandler`] - Trait every URL handler implements
//! - [`HandlerRegistry`] - Priority-ordered handler set
//! - [`RequestContext`] / [`WebResponse`] - What a handler reads and writes
//!
//! ## Example
//!
//! ```rust,ignore
//! use webconsole::handlers::HandlerRegistry;
//!
//! let registry = HandlerRegistry::with_builtins(engine, status, process);
//! let handler = registry.resolve("/_status").unwrap();
//! handler.handle(&ctx, &mut response).await?;
//! ```

mod builtin;
mod home;
mod registry;
mod traits;
pub(crate) mod types;

pub use builtin::{CommandListHandler, CommandsHandler, FavIconHandler, StatusHandler};
pub use home::HomeHandler;
pub use registry::HandlerRegistry;
pub use traits::{HandlerError, WebHandler};
pub use types::{APPLICATION_JSON, Params, RequestContext, TEXT_HTML, TEXT_PLAIN, WebResponse};
