use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

pub const DEFAULT_UPSTREAM_URL: &str = "https://app.strava.cz/api/objednavky";

/// Session credentials and endpoint of the canteen ordering service.
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamConfig {
    pub url: String,
    pub canteen_number: String,
    pub user_name: String,
    pub sid: String,
    pub timeout_secs: u64,
}

impl UpstreamConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// How a sync that stored nothing is reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmptyRunPolicy {
    #[default]
    Success,
    Failure,
}

impl FromStr for EmptyRunPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "success" | "ok" => Ok(Self::Success),
            "failure" | "error" => Ok(Self::Failure),
            other => anyhow::bail!("unknown empty run policy: {other}"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SyncConfig {
    /// 0 disables the scheduled trigger.
    pub interval_minutes: u64,
    pub empty_run: EmptyRunPolicy,
}

impl SyncConfig {
    pub fn interval(&self) -> Option<Duration> {
        (self.interval_minutes > 0).then(|| Duration::from_secs(self.interval_minutes * 60))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub upstream: UpstreamConfig,
    pub sync: SyncConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let upstream = UpstreamConfig {
            url: std::env::var("UPSTREAM_URL").unwrap_or_else(|_| DEFAULT_UPSTREAM_URL.into()),
            canteen_number: std::env::var("CANTEEN_NUMBER").context("CANTEEN_NUMBER must be set")?,
            user_name: std::env::var("USER_NAME").context("USER_NAME must be set")?,
            sid: std::env::var("SID").context("SID must be set")?,
            timeout_secs: std::env::var("UPSTREAM_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(30),
        };
        let sync = SyncConfig {
            interval_minutes: std::env::var("SYNC_INTERVAL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(180),
            empty_run: match std::env::var("SYNC_EMPTY_RUN") {
                Ok(v) => v.parse().context("SYNC_EMPTY_RUN")?,
                Err(_) => EmptyRunPolicy::default(),
            },
        };
        Ok(Self {
            database_url,
            upstream,
            sync,
        })
    }
}
