mod config;
mod main_lib;

use std::sync::Arc;

use config::Config;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use main_lib::{build_relay, handle_invocation, init_tracing};
use serde_json::Value;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;
    init_tracing(config.log_format);
    let relay = Arc::new(build_relay(&config).await);

    tracing::info!("Waiting for SNS invocations");
    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| {
        let relay = relay.clone();
        async move {
            let (payload, context) = event.into_parts();
            handle_invocation(&relay, &payload, &context.request_id)
                .await
                .map_err(Error::from)
        }
    }))
    .await
    .map_err(|e| anyhow::anyhow!(e))?;
    Ok(())
}
