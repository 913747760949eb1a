use async_trait::async_trait;

use crate::error::Result;

/// Status and raw body of one HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl FetchResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The HTTP GET the loader performs. Swapped for a fake in tests.
#[async_trait]
pub trait Fetch: Send + Sync {
    /// Issue one GET. `Err` means no response was received at all
    /// (connection refused, DNS, broken body stream); HTTP error statuses
    /// come back as `Ok`.
    async fn get(&self, url: &str) -> Result<FetchResponse>;
}

#[async_trait]
impl<F: Fetch + ?Sized> Fetch for &F {
    async fn get(&self, url: &str) -> Result<FetchResponse> {
        (**self).get(url).await
    }
}

#[async_trait]
impl<F: Fetch + ?Sized> Fetch for std::sync::Arc<F> {
    async fn get(&self, url: &str) -> Result<FetchResponse> {
        (**self).get(url).await
    }
}

#[cfg(feature = "network")]
pub use self::reqwest_fetch::ReqwestFetch;

#[cfg(feature = "network")]
mod reqwest_fetch {
    use async_trait::async_trait;
    use reqwest::Client;

    use super::{Fetch, FetchResponse};
    use crate::error::Result;

    /// [`Fetch`] over a pooled `reqwest::Client`. No timeout is set.
    #[derive(Debug, Clone)]
    pub struct ReqwestFetch {
        http: Client,
    }

    impl ReqwestFetch {
        pub fn new() -> Result<Self> {
            let user_agent = format!("regview/{}", env!("CARGO_PKG_VERSION"));
            let http = Client::builder().user_agent(user_agent).build()?;
            Ok(Self { http })
        }

        pub fn with_client(http: Client) -> Self {
            Self { http }
        }
    }

    #[async_trait]
    impl Fetch for ReqwestFetch {
        async fn get(&self, url: &str) -> Result<FetchResponse> {
            let resp = self.http.get(url).send().await?;
            let status = resp.status().as_u16();
            let body = resp.bytes().await?;
            Ok(FetchResponse {
                status,
                body: body.to_vec(),
            })
        }
    }
}
