//! Demo replica wired to a local directory
//!
//! Run with: cargo run --example replica [DATA_DIR]
//!
//! Examples:
//!   cargo run --example replica             # persists under ./presence-data
//!   cargo run --example replica /tmp/pd     # persists under /tmp/pd
//!
//! Spawns one directory and two simulated front-end replicas. Each replica
//! registers itself as an observer and relays every push it receives (in a
//! real deployment: to its websocket clients; here: to stdout). The demo
//! then walks through the full lifecycle — clients connecting, items
//! arriving from the ingestion side, clients disconnecting — and shuts the
//! replicas down gracefully.
//!
//! Because the counter and feed are persisted, a second run of this demo
//! starts from the state the first run left behind.

use std::time::Duration;

use presence_rs::{
    Directory, DirectoryConfig, JsonFileStore, ObserverRegistration, PushEvent, SubmitMessage,
};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Relay pushes to this replica's "clients" until the channel closes
fn spawn_relay(name: &'static str, mut pushes: mpsc::Receiver<PushEvent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = pushes.recv().await {
            match event {
                PushEvent::ClientsUpdated(count) => {
                    println!("[{name}] -> clients online: {count}");
                }
                PushEvent::FeedUpdated(items) => {
                    let keys: Vec<&str> = items.iter().map(|i| i.key.as_str()).collect();
                    println!("[{name}] -> recent items: {keys:?}");
                }
            }
        }
        println!("[{name}] push channel closed");
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("presence_rs=debug".parse()?),
        )
        .init();

    let data_dir = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "presence-data".to_string());

    println!("Starting directory, persisting under {data_dir}/");
    let directory = Directory::spawn(
        DirectoryConfig::default(),
        JsonFileStore::new(&data_dir),
    )
    .await?;

    println!(
        "Restored state: {} clients, {} recent items",
        directory.active_count().await,
        directory.recent_feed().await.len()
    );

    // Two replicas come online and register as observers
    let (reg_a, pushes_a) = ObserverRegistration::channel("replica-a");
    let (reg_b, pushes_b) = ObserverRegistration::channel("replica-b");
    directory.register_observer(reg_a).await;
    directory.register_observer(reg_b).await;
    let relay_a = spawn_relay("replica-a", pushes_a);
    let relay_b = spawn_relay("replica-b", pushes_b);

    // End users connect on different replicas; each connect is reported to
    // the directory, which broadcasts the new count to both replicas
    directory.client_connected("replica-a/conn-1").await?;
    directory.client_connected("replica-b/conn-1").await?;
    directory.client_connected("replica-b/conn-2").await?;

    // A newly connected user gets the current feed directly, not broadcast
    let snapshot = directory.recent_feed().await;
    println!("initial snapshot for the new user: {} items", snapshot.len());

    // Items arrive from the ingestion side as wire messages; the
    // redelivered duplicate is a no-op
    for payload in [
        r#"{"key": "images/sunrise.jpg"}"#,
        r#"{"key": "images/harbor.jpg"}"#,
        r#"{"key": "images/sunrise.jpg"}"#,
        r#"{"key": "images/market.jpg"}"#,
    ] {
        let message: SubmitMessage = serde_json::from_str(payload)?;
        directory.submit_item(message.key).await?;
    }

    directory.client_disconnected("replica-b/conn-2").await?;

    // Let the relays drain their channels before shutting down
    tokio::time::sleep(Duration::from_millis(100)).await;

    // Graceful replica shutdown: unregister, then stop relaying
    directory.unregister_observer("replica-a").await;
    directory.unregister_observer("replica-b").await;

    let stats = directory.stats();
    println!(
        "directory stats: {} broadcasts, {} deliveries, {} failures",
        stats.broadcasts, stats.deliveries, stats.delivery_failures
    );

    drop(directory);
    relay_a.await?;
    relay_b.await?;

    Ok(())
}
