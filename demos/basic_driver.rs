//! Open a driver against a local server and print the negotiated version
//!
//! Run with: cargo run --example basic_driver
//!
//! Environment: BOLT_HOST, BOLT_PORT, BOLT_USER, BOLT_PASSWORD, BOLT_VERSION

use bolt_client::{
    with_basic_auth, with_host_port, with_pooling, with_version, AccessMode, Client, Opt,
};
use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("bolt_client=debug")),
        )
        .init();

    let host = env::var("BOLT_HOST").unwrap_or_else(|_| "localhost".to_string());
    let port: i32 = env::var("BOLT_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(7687);
    let user = env::var("BOLT_USER").unwrap_or_else(|_| "neo4j".to_string());
    let password = env::var("BOLT_PASSWORD").unwrap_or_else(|_| "neo4j".to_string());

    let mut opts: Vec<Opt> = vec![
        with_basic_auth(user, password),
        with_host_port(host, port),
        with_pooling(4),
    ];
    if let Ok(version) = env::var("BOLT_VERSION") {
        opts.push(with_version(version));
    }

    let client = Client::new(opts)?;
    println!("descriptor: {}", client.descriptor().redacted());

    if client.supports_v4() {
        let pool = client.new_driver_pool_v4(4)?;
        let conn = pool.open_database(AccessMode::Read, "neo4j").await?;
        println!("v4 connection, agreed version {}", conn.agreed_version());
        pool.reclaim(conn)?;
        pool.close().await?;
    } else {
        let driver = client.new_driver()?;
        let mut conn = driver.open(AccessMode::Read).await?;
        println!("v3 connection, agreed version {}", conn.agreed_version());
        conn.close().await?;
        driver.close().await?;
    }

    Ok(())
}
