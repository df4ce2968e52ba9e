//! has-cache - command line companion for the has_cache library
//!
//! Scaffolds template registries, previews keys built from a JSON registry,
//! and purges keys from Redis in chunks.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use has_cache::invalidation::{AsyncCache, ChunkedDeleter};
use has_cache::keys::{CacheKeyBuilder, Templates};
use has_cache::scaffold::write_registry_stub;
use has_cache::{Config, RedisStore};

#[derive(Debug, Parser)]
#[command(name = "has-cache", version, about = "Template-keyed cache helpers")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Write a new template registry source stub
    MakeRegistry {
        /// Registry name, e.g. `User` or `UserCacheKeys`
        name: String,
        /// Directory the stub is written to
        #[arg(long, default_value = "src/cache")]
        dir: PathBuf,
    },
    /// Build a key from a JSON template file and print it with its expiry
    Key {
        /// JSON file mapping template names to templates
        #[arg(long)]
        templates: PathBuf,
        /// Template name
        template: String,
        /// Parameters as NAME=VALUE
        #[arg(value_parser = parse_param)]
        params: Vec<(String, String)>,
    },
    /// Delete keys from the Redis store at REDIS_URL
    Purge {
        /// Keys per UNLINK call (defaults to HAS_CACHE_DELETE_CHUNK_SIZE)
        #[arg(long)]
        chunk_size: Option<usize>,
        /// Keys to delete
        #[arg(required = true)]
        keys: Vec<String>,
    },
}

fn parse_param(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .filter(|(name, _)| !name.is_empty())
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected NAME=VALUE, got '{}'", raw))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "has_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();

    match cli.command {
        Command::MakeRegistry { name, dir } => {
            let path = write_registry_stub(&dir, &name)?;
            println!("Registry created: {}", path.display());
        }
        Command::Key {
            templates,
            template,
            params,
        } => {
            let json = std::fs::read_to_string(&templates)
                .with_context(|| format!("reading {}", templates.display()))?;
            let registry = Templates::from_json_str(&json)?;
            let builder = CacheKeyBuilder::new(registry, config.active_hours()?);

            let key = builder.build(&template, params)?;
            println!("{}", key);
            println!("expires at {}", key.expiry().to_rfc3339());
        }
        Command::Purge { chunk_size, keys } => {
            let url = config
                .redis_url
                .as_deref()
                .context("REDIS_URL is not set")?;
            let store = RedisStore::connect(url, config.key_prefix.clone()).await?;
            let deleter = ChunkedDeleter::new(Arc::new(store));
            let chunk_size = chunk_size.unwrap_or(config.delete_chunk_size);

            info!("Purging {} keys in chunks of {}", keys.len(), chunk_size);
            if !deleter.delete_multiple_async(&keys, chunk_size).await {
                bail!("store rejected the deletion of {} keys", keys.len());
            }
            println!("Purged {} keys", keys.len());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_param() {
        assert_eq!(
            parse_param("id=42"),
            Ok(("id".to_string(), "42".to_string()))
        );
        assert_eq!(
            parse_param("q=a=b"),
            Ok(("q".to_string(), "a=b".to_string()))
        );
        assert!(parse_param("id").is_err());
        assert!(parse_param("=42").is_err());
    }

    #[test]
    fn test_cli_parses_purge() {
        let cli = Cli::try_parse_from(["has-cache", "purge", "--chunk-size", "10", "a", "b"])
            .unwrap();
        match cli.command {
            Command::Purge { chunk_size, keys } => {
                assert_eq!(chunk_size, Some(10));
                assert_eq!(keys, vec!["a", "b"]);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_purge_requires_keys() {
        assert!(Cli::try_parse_from(["has-cache", "purge"]).is_err());
    }
}
