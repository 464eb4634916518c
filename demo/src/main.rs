#![deny(clippy::all)]
#![deny(unused_must_use)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

use anyhow::Context;
use containers::HashTable;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_LOG_FILTER: &str = "containers=debug,demo=info";
const LINES: [(&str, &str); 3] = [
    ("line_1", "Tiny hash table"),
    ("line_2", "Filled beyond capacity"),
    ("line_3", "Linked list saves the day!"),
];

struct Config {
    buckets: usize,
    resizes: usize,
    log_filter: String,
}

impl Config {
    fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();

        Ok(Self {
            buckets: parse_var("DEMO_BUCKETS", 2)?,
            resizes: parse_var("DEMO_RESIZES", 1)?,
            log_filter: dotenv::var("LOG_FILTER").unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        })
    }
}

fn parse_var(name: &str, default: usize) -> anyhow::Result<usize> {
    match dotenv::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("invalid {name}: {raw:?}")),
        Err(_) => Ok(default),
    }
}

fn print_lines(ht: &HashTable<String>) {
    for (key, _) in LINES {
        match ht.retrieve(key) {
            Some(value) => println!("{value}"),
            None => println!("<{key} missing>"),
        }
    }
}

fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("failed to load env vars")?;

    tracing_subscriber::registry()
        .with(EnvFilter::new(&config.log_filter))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut ht = HashTable::new(config.buckets).context("failed to create table")?;
    for (key, value) in LINES {
        ht.insert(key, value.to_string());
    }
    info!("inserted {} lines into {} buckets", LINES.len(), ht.capacity());

    println!();
    print_lines(&ht);

    let old_capacity = ht.capacity();
    for _ in 0..config.resizes {
        ht.resize();
    }
    println!("\nResized from {old_capacity} to {}.\n", ht.capacity());

    print_lines(&ht);
    println!();

    let stats = serde_json::to_string_pretty(&ht.stats()).context("failed to encode stats")?;
    println!("{stats}");

    Ok(())
}
