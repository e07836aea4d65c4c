use std::sync::Arc;

use thiserror::Error;

use crate::api::server::AppState;
use crate::db::prelude::*;
use crate::total::TotalResolver;
use crate::util::env::{Env, EnvErr};
use crate::util::telemetry::Telemetry;
use crate::util::youtube::YouTube;

mod api;
mod constants;
mod db;
mod total;
mod util;

#[derive(Debug, Error)]
enum RunnerErr {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Env(#[from] EnvErr),

    #[error(transparent)]
    Cache(#[from] CacheErr),

    #[error(transparent)]
    Std(#[from] Box<dyn std::error::Error>),
}

type Result<T> = core::result::Result<T, RunnerErr>;

#[tokio::main]
async fn main() -> Result<()> {
    let env = Env::new()?;
    let telemetry = Telemetry::new(&env)?.register();

    tracing::info!(env = ?env, "starting goal page");

    let store: Arc<dyn CacheStore> = match env.redis_url.as_deref() {
        Some(url) => Arc::new(RedisStore::connect(url).await?),
        None => {
            tracing::warn!("REDIS_URL not set, caching subscriber totals in memory");
            Arc::new(MemoryStore::new())
        }
    };

    let source = Arc::new(YouTube::new(env.youtube_api_key.clone()));
    let resolver = TotalResolver::new(source, TtlCache::new(store));
    let state = Arc::new(AppState::new(resolver));

    let served = api::server::serve(state, env.server_api_port).await;

    telemetry.shutdown();
    Ok(served?)
}
