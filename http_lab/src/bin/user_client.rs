//! # user_client
//! src/bin/user_client.rs
//!
//! Ejecuta cada operación del cliente contra un servidor `http_lab` en
//! marcha e imprime el resultado de cada una.

use clap::Parser;
use http_lab::client::{ApiClient, RetryPolicy};
use http_lab::config::ClientArgs;
use http_lab::telemetry::init_tracing;
use http_lab::users::NewUser;
use std::fmt::Debug;
use std::time::Duration;

fn report<T: Debug, E: std::fmt::Display>(operation: &str, result: Result<T, E>) {
    match result {
        Ok(value) => println!("✅ {:<28} {:?}", operation, value),
        Err(e) => println!("❌ {:<28} {}", operation, e),
    }
}

fn main() {
    init_tracing("user_client=info,http_lab=info");
    let args = ClientArgs::parse();
    if let Err(e) = args.validate() {
        tracing::error!(error = %e, "invalid configuration");
        std::process::exit(2);
    }

    let client = match ApiClient::new(&args.base_url, &args.api_key) {
        Ok(client) => client.with_retry_policy(RetryPolicy {
            base_delay: Duration::from_millis(args.retry_delay_ms),
        }),
        Err(e) => {
            tracing::error!(error = %e, "invalid base url");
            std::process::exit(2);
        }
    };

    println!("HTTP Lab client → {}\n", args.base_url);

    report("get_user(1)", client.get_user(1));
    report(
        "create_user",
        client.create_user(&NewUser::new("赵六", "zhaoliu@example.com")),
    );
    report(
        "login_with_form",
        client.login_with_form("zhangsan@example.com", "password123"),
    );
    report(
        "upload_file",
        client.upload_file("hello.txt", b"hello from user_client"),
    );
    report(
        "create_user_with_encryption",
        client.create_user_with_encryption(
            &NewUser::new("加密用户", "encrypted@example.com"),
            args.encryption_key.as_bytes(),
        ),
    );
    report(
        "get_user_with_custom_token(2)",
        client.get_user_with_custom_token(2, &args.token_secret),
    );
    report("get_user_with_retry(3)", client.get_user_with_retry(3, args.retries));

    let batch = client.get_users_batch(&[1, 2, 3, 999]);
    println!("\nBatch: {} users, {} failures", batch.users.len(), batch.failures.len());
    for user in &batch.users {
        println!("   {} {} <{}>", user.id, user.name, user.email);
    }
    for (id, e) in &batch.failures {
        println!("   {} → {}", id, e);
    }
}
