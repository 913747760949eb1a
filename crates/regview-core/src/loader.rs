use std::collections::BTreeMap;

use crate::config::LoaderConfig;
use crate::fetch::{Fetch, FetchResponse};
use crate::result::LoadResult;

/// Route parameters handed to a page loader.
pub type RouteParams = BTreeMap<String, String>;

/// What the rendering layer passes to [`load`].
pub struct LoadContext<'a, F: ?Sized> {
    pub fetch: &'a F,
    /// Accepted for the page-loader signature; never used to build the URL.
    pub params: &'a RouteParams,
}

impl<'a, F: ?Sized> LoadContext<'a, F> {
    pub fn new(fetch: &'a F, params: &'a RouteParams) -> Self {
        Self { fetch, params }
    }
}

/// Fetch the register listing once and turn the response into a [`LoadResult`].
pub async fn load<F: Fetch + ?Sized>(ctx: LoadContext<'_, F>, config: &LoaderConfig) -> LoadResult {
    let url = config.endpoint();
    tracing::debug!(%url, params = ctx.params.len(), "loading registers");

    match ctx.fetch.get(&url).await {
        Ok(resp) => classify(&url, resp, config.verbose),
        Err(e) => {
            tracing::error!(%url, error = %e, "failed to fetch data from register API");
            LoadResult::transport_failure(e.to_string())
        }
    }
}

/// Branch on an already received response. No I/O.
pub fn classify(url: &str, resp: FetchResponse, verbose: bool) -> LoadResult {
    if !resp.is_success() {
        tracing::error!(%url, status = resp.status, "failed to fetch data from register API");
        return LoadResult::http_failure(resp.status);
    }
    match serde_json::from_slice(&resp.body) {
        Ok(data) => {
            if verbose {
                tracing::info!(%url, %data, "loaded registers");
            }
            LoadResult::success(data)
        }
        Err(e) => {
            tracing::error!(%url, status = resp.status, error = %e, "register API returned invalid JSON");
            LoadResult::decode_failure(resp.status, e.to_string())
        }
    }
}

/// A page loader bound to one fetch capability and one config.
pub struct RegisterLoader<F> {
    fetch: F,
    config: LoaderConfig,
}

impl<F: Fetch> RegisterLoader<F> {
    pub fn new(fetch: F, config: LoaderConfig) -> Self {
        Self { fetch, config }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    pub fn endpoint(&self) -> String {
        self.config.endpoint()
    }

    pub async fn load(&self) -> LoadResult {
        self.load_with_params(&RouteParams::new()).await
    }

    pub async fn load_with_params(&self, params: &RouteParams) -> LoadResult {
        load(LoadContext::new(&self.fetch, params), &self.config).await
    }
}
