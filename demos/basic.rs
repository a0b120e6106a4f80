//! Basic example demonstrating the Vibrato sync client.
//!
//! Run with:
//! ```
//! VIBRATO_API_URL=http://localhost:8000 VIBRATO_PASSWORD=vibratonotes \
//!     cargo run --example basic -- test-user
//! ```

use serde_json::json;
use vibrato_sync::{VibratoClient, VibratoError};

#[tokio::main]
async fn main() -> vibrato_sync::Result<()> {
    // Initialize tracing for debugging (optional)
    tracing_subscriber::fmt::init();

    let identifier = std::env::args().nth(1).unwrap_or_else(|| "test-user".to_string());
    let password = std::env::var("VIBRATO_PASSWORD").map_err(|_| {
        VibratoError::ConfigMissing("VIBRATO_PASSWORD environment variable not set".to_string())
    })?;

    // Create client from environment variables and check the server answers
    println!("Creating Vibrato client...");
    let client = VibratoClient::from_env()?;
    match client.check_endpoint().await {
        Ok(status) => println!("Sync server {} status: {}", client.base_endpoint(), status),
        Err(e) => println!("Sync server {} unreachable: {}", client.base_endpoint(), e),
    }

    println!("\n--- Logging in ---");
    let status = client.login(&identifier, &password).await;
    if !status.success {
        println!("Login failed: {}", status.error_message);
        return Ok(());
    }
    println!("Logged in as {identifier}");

    println!("\n--- Creating a note ---");
    let note = client.notes().create(json!({"title": "Hello Rust"})).await?;
    println!("{note:#}");

    println!("\n--- Listing notes ---");
    let notes = client.notes().list().await?;
    for note in notes.as_array().into_iter().flatten() {
        println!(
            "  - {} ({})",
            note["title"].as_str().unwrap_or_default(),
            note["sync_hash"].as_str().unwrap_or_default()
        );
    }

    Ok(())
}
