//! # HTTP Lab - Entry Point
//! src/main.rs
//!
//! Punto de entrada del servidor de usuarios.

use clap::Parser;
use http_lab::config::ServerConfig;
use http_lab::server::Server;
use http_lab::telemetry::init_tracing;

fn main() {
    init_tracing("http_lab=info");

    println!("=================================");
    println!("  HTTP Lab - User API (HTTP/1.0)");
    println!("=================================\n");

    let config = ServerConfig::parse();
    if let Err(e) = config.validate() {
        tracing::error!(error = %e, "invalid configuration");
        std::process::exit(2);
    }
    config.print_summary();

    let server = match Server::bind(config) {
        Ok(server) => server,
        Err(e) => {
            tracing::error!(error = %e, "bind failed");
            std::process::exit(1);
        }
    };

    // Bloquea el thread principal
    if let Err(e) = server.run() {
        tracing::error!(error = %e, "server stopped");
        std::process::exit(1);
    }
}
