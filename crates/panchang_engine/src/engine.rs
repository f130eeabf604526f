use std::io;

use panchang_core::DateSpec;
use tokio::runtime::{Builder, Runtime};

use crate::fetch::{FetchSettings, Fetcher, ReqwestFetcher};
use crate::{build_result, FetchResult};

/// Blocking front door: each call runs one request to completion on the
/// calling thread.
pub struct PanchangEngine {
    runtime: Runtime,
    fetcher: Box<dyn Fetcher>,
}

impl PanchangEngine {
    pub fn new(settings: FetchSettings) -> io::Result<Self> {
        Self::with_fetcher(Box::new(ReqwestFetcher::new(settings)))
    }

    pub fn with_fetcher(fetcher: Box<dyn Fetcher>) -> io::Result<Self> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        Ok(Self { runtime, fetcher })
    }

    pub fn fetch(&self, date: DateSpec) -> FetchResult {
        self.runtime.block_on(build_result(self.fetcher.as_ref(), date))
    }
}
