mod client;
mod error;

use async_trait::async_trait;
use serde_json::Value;

pub use client::StravaClient;
pub use error::FetchError;

/// Where raw meal payloads come from.
#[async_trait]
pub trait MealSource: Send + Sync {
    async fn fetch_meals(&self) -> Result<Value, FetchError>;
}

#[cfg(test)]
pub(crate) use fake::StaticSource;

#[cfg(test)]
mod fake {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    /// Serves a fixed payload, or a fixed error status.
    pub(crate) struct StaticSource {
        payload: Result<Value, u16>,
        calls: AtomicUsize,
    }

    impl StaticSource {
        pub(crate) fn ok(payload: Value) -> Self {
            Self {
                payload: Ok(payload),
                calls: AtomicUsize::new(0),
            }
        }

        pub(crate) fn failing(status: u16) -> Self {
            Self {
                payload: Err(status),
                calls: AtomicUsize::new(0),
            }
        }

        pub(crate) fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl MealSource for StaticSource {
        async fn fetch_meals(&self) -> Result<Value, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.payload {
                Ok(payload) => Ok(payload.clone()),
                Err(status) => Err(FetchError::UpstreamStatus {
                    status: *status,
                    body_excerpt: "maintenance".into(),
                }),
            }
        }
    }
}
