use anyhow::{bail, Result};
use discovery_cache::SubscriberFactory;
use discovery_consul::{ConsulClient, ConsulConfig, ConsulSourceFactory};
use discovery_core::MemoryStore;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::fmt::init as tracing_init;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_init();

    let mut args = std::env::args().skip(1);
    let Some(service) = args.next() else {
        bail!("usage: endpoint-watch <service> [tag ...]");
    };
    let tags: Vec<String> = args.collect();

    let address = std::env::var("CONSUL_HTTP_ADDR")
        .unwrap_or_else(|_| "http://127.0.0.1:8500".to_string());
    info!("Watching endpoints for {} via {}", service, address);

    let client = Arc::new(ConsulClient::new(ConsulConfig {
        address,
        ..ConsulConfig::default()
    })?);
    let sources = Arc::new(ConsulSourceFactory::new(client).with_tags(tags));
    let store = Arc::new(MemoryStore::new());
    let factory = SubscriberFactory::new(sources, store, Duration::from_secs(30));

    let subscriber = Arc::new(factory.subscriber(&service));
    {
        let service = service.clone();
        subscriber.on_change(move || {
            info!("Endpoint set for {} changed", service);
        });
    }

    loop {
        match subscriber.endpoints().await {
            Ok(endpoints) => {
                let joined: Vec<String> =
                    endpoints.iter().map(ToString::to_string).collect();
                info!("{}: [{}]", service, joined.join(", "));
            }
            Err(e) => {
                error!("Error fetching endpoints for {}: {}", service, e);
            }
        }

        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = tokio::time::sleep(Duration::from_secs(30)) => {}
        }
    }

    info!("Shutting down subscription for {}", service);
    subscriber.shutdown().await;
    Ok(())
}
