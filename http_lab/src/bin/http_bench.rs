//! # http_bench
//! src/bin/http_bench.rs
//!
//! Benchmark concurrente contra una URL o contra el store en memoria.
//!
//! ```bash
//! http_bench -n 1000 -c 10 http://127.0.0.1:8080/health
//! http_bench -n 100000 -c 8 --target kv
//! ```

use clap::Parser;
use http_lab::bench::{BenchmarkConfig, BenchmarkResult, Benchmarker, HttpProbe, KvProbe};
use http_lab::config::{BenchArgs, BenchTarget};
use http_lab::error::ConfigError;
use http_lab::telemetry::init_tracing;

fn run(args: &BenchArgs) -> Result<BenchmarkResult, ConfigError> {
    args.validate()?;
    let config = BenchmarkConfig {
        requests: args.requests,
        concurrency: args.concurrency,
        warmup: args.warmup,
    };

    match args.target {
        BenchTarget::Http => {
            let probe = args.parsed_headers()?.iter().fold(
                HttpProbe::new(&args.url, &args.method, args.timeout())?,
                |probe, (name, value)| probe.with_header(name, value),
            );
            Benchmarker::run(&config, &probe)
        }
        BenchTarget::Kv => Benchmarker::run(&config, &KvProbe::new()),
    }
}

fn main() {
    init_tracing("http_bench=info,http_lab=warn");
    let args = BenchArgs::parse();

    println!("🚀 HTTP benchmark");
    println!("================");
    match args.target {
        BenchTarget::Http => {
            println!("Target URL:   {}", args.url);
            println!("Method:       {}", args.method);
        }
        BenchTarget::Kv => println!("Target:       in-memory kv store"),
    }
    println!("Requests:     {}", args.requests);
    println!("Concurrency:  {}", args.concurrency);
    println!("Timeout:      {:?}", args.timeout());
    println!();

    match run(&args) {
        Ok(result) => println!("{}", result),
        Err(e) => {
            tracing::error!(error = %e, "invalid benchmark configuration");
            std::process::exit(2);
        }
    }
}
