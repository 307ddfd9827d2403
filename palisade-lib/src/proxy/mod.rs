pub mod context;
pub mod forwarding;
pub mod handler;
pub mod http_result;
pub mod server;
pub mod synthetic;

pub use context::{EngineContext, RequestContext};
pub use http_result::HttpError;
pub use server::run;
