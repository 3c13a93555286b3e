use anyhow::{bail, Context, Result};
use chrono::Utc;
use match_tracker::{JsonFileStore, MatchStore, SqliteStore};

fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let backend = std::env::var("CACHE_BACKEND").unwrap_or_else(|_| "json".to_string());
    let store: Box<dyn MatchStore> = match backend.to_ascii_lowercase().as_str() {
        "json" => {
            let path = std::env::var("CACHE_PATH").unwrap_or_else(|_| "./cache.json".to_string());
            Box::new(JsonFileStore::new(path))
        }
        "sqlite" => {
            let path = std::env::var("CACHE_PATH").unwrap_or_else(|_| "./cache.db".to_string());
            Box::new(SqliteStore::open(&path).with_context(|| format!("open db at {path}"))?)
        }
        other => bail!("unknown CACHE_BACKEND '{other}'"),
    };

    let cache = store.load().with_context(|| format!("load {}", store.describe()))?;
    let now = Utc::now();

    println!("cache={}", store.describe());
    println!("matches: {}", cache.len());
    for r in cache.iter() {
        let idle = (now - r.watermark).num_minutes();
        println!(
            "{id}: {fixture} | stage={stage} status={status} score=\"{score}\" watermark={wm} ({idle} min ago)",
            id      = r.id,
            fixture = r.fixture(),
            stage   = r.stage_id.as_deref().unwrap_or("<none>"),
            status  = r.status.map(|s| s.to_string()).unwrap_or_else(|| "?".to_string()),
            score   = r.score,
            wm      = r.watermark.to_rfc3339(),
        );
    }

    if let Some(newest) = cache.iter().map(|r| r.watermark).max() {
        println!("newest_watermark: {}", newest.to_rfc3339());
    } else {
        println!("newest_watermark: <none>");
    }

    Ok(())
}
