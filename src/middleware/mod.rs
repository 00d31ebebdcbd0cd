pub mod runtime_headers;

pub use runtime_headers::{runtime_headers_middleware, RuntimeHeaders};
