mod bootstrap;
pub mod dispatcher;
mod error;
mod server;
pub mod state;
pub(crate) mod utils;

pub use bootstrap::BOOTSTRAP_HTML;
pub use dispatcher::{Dispatcher, IncomingRequest, WebPolicy};
pub use error::WebError;
pub use server::{router, run};
pub use state::AppState;
