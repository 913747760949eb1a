pub mod config;
pub mod error;
pub mod fetch;
pub mod loader;
pub mod register;
pub mod result;

pub use config::{ConfigOverrides, LoaderConfig, RenderContext};
pub use error::RegviewError;
pub use fetch::{Fetch, FetchResponse};
#[cfg(feature = "network")]
pub use fetch::ReqwestFetch;
pub use loader::{classify, load, LoadContext, RegisterLoader, RouteParams};
pub use register::Register;
pub use result::{LoadError, LoadResult};
