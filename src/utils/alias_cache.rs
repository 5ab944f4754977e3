use anyhow::Result;
use futures_util::StreamExt;
use moka::future::Cache;
use once_cell::sync::Lazy;
use sqlx::MySqlPool;
use std::time::Duration;

use crate::utils::alias_filter;

/// Normalized clock name -> employee id.
pub static ALIAS_CACHE: Lazy<Cache<String, u64>> = Lazy::new(|| {
    Cache::builder()
        .max_capacity(100_000) // tune based on memory
        .time_to_live(Duration::from_secs(86400)) // 24h TTL
        .build()
});

/// Bind a clock name to an employee id
pub async fn remember(name: &str, employee_id: u64) {
    ALIAS_CACHE
        .insert(name.trim().to_lowercase(), employee_id)
        .await;
}

pub async fn lookup(name: &str) -> Option<u64> {
    ALIAS_CACHE.get(&name.trim().to_lowercase()).await
}

pub async fn forget(name: &str) {
    ALIAS_CACHE.invalidate(&name.trim().to_lowercase()).await;
}

/// Batch bind clock names
async fn batch_remember(entries: &[(String, u64)]) {
    let futures: Vec<_> = entries
        .iter()
        .map(|(name, id)| ALIAS_CACHE.insert(name.trim().to_lowercase(), *id))
        .collect();

    // Await all insertions concurrently
    futures::future::join_all(futures).await;
}

/// Load active employees' clock names into the in-memory cache (batched)
pub async fn warmup_alias_cache(pool: &MySqlPool, batch_size: usize) -> Result<()> {
    let mut stream = sqlx::query_as::<_, (String, u64)>(
        r#"
        SELECT COALESCE(clock_alias, CONCAT(first_name, ' ', last_name)), id
        FROM employees
        WHERE status = 'active'
        "#,
    )
    .fetch(pool);

    let mut batch = Vec::with_capacity(batch_size);
    let mut total_count = 0usize;

    while let Some(row) = stream.next().await {
        let (name, id) = row?;
        batch.push((name, id));
        total_count += 1;

        if batch.len() >= batch_size {
            batch_remember(&batch).await;
            batch.clear();
        }
    }

    if !batch.is_empty() {
        batch_remember(&batch).await;
    }

    log::info!(
        "Alias cache warmup complete: {} active employees",
        total_count
    );

    Ok(())
}

/// Resolve an exported clock name to an employee id: filter first (fast
/// negative), then cache, then DB, remembering hits.
pub async fn resolve_employee(pool: &MySqlPool, name: &str) -> Result<Option<u64>> {
    if !alias_filter::might_exist(name) {
        return Ok(None);
    }
    if let Some(id) = lookup(name).await {
        return Ok(Some(id));
    }

    let normalized = name.trim().to_lowercase();
    let id = sqlx::query_scalar::<_, u64>(
        r#"
        SELECT id FROM employees
        WHERE LOWER(clock_alias) = ?
           OR LOWER(CONCAT(first_name, ' ', last_name)) = ?
        LIMIT 1
        "#,
    )
    .bind(&normalized)
    .bind(&normalized)
    .fetch_optional(pool)
    .await?;

    if let Some(id) = id {
        remember(name, id).await;
    }
    Ok(id)
}
