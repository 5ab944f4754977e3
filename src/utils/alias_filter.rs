use anyhow::{Result, anyhow};
use autoscale_cuckoo_filter::CuckooFilter;
use futures::StreamExt;
use once_cell::sync::Lazy;
use sqlx::MySqlPool;
use std::sync::RwLock;

/// Expected capacity and false-positive rate.
/// Tune these based on real headcount.
const FILTER_CAPACITY: usize = 50_000;
const FALSE_POSITIVE_RATE: f64 = 0.001;

static ALIAS_FILTER: Lazy<RwLock<CuckooFilter<String>>> =
    Lazy::new(|| RwLock::new(CuckooFilter::new(FILTER_CAPACITY, FALSE_POSITIVE_RATE)));

#[inline]
fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Check if a clock name might belong to a known employee (false positives
/// possible). Unknown names in an upload short-circuit here without a DB hit.
pub fn might_exist(name: &str) -> bool {
    let name = normalize(name);
    ALIAS_FILTER
        .read()
        .expect("alias filter poisoned")
        .contains(&name)
}

/// Insert a single clock name into the filter
pub fn insert(name: &str) {
    let name = normalize(name);
    ALIAS_FILTER
        .write()
        .expect("alias filter poisoned")
        .add(&name);
}

/// Remove a clock name from the filter
pub fn remove(name: &str) {
    let name = normalize(name);
    ALIAS_FILTER
        .write()
        .expect("alias filter poisoned")
        .remove(&name);
}

/// Warm up the alias filter using streaming + batching
pub async fn warmup_alias_filter(pool: &MySqlPool, batch_size: usize) -> Result<()> {
    let mut stream = sqlx::query_as::<_, (String,)>(
        r#"
        SELECT COALESCE(clock_alias, CONCAT(first_name, ' ', last_name))
        FROM employees
        WHERE status = 'active'
        "#,
    )
    .fetch(pool);

    let mut batch = Vec::with_capacity(batch_size);
    let mut total = 0usize;

    while let Some(row) = stream.next().await {
        let (name,) = row.map_err(|e| anyhow!("DB row fetch failed: {}", e))?;

        batch.push(normalize(&name));
        total += 1;

        if batch.len() == batch_size {
            insert_batch(&batch);
            batch.clear();
        }
    }

    if !batch.is_empty() {
        insert_batch(&batch);
    }

    log::info!("Alias filter warmup complete: {} employees", total);
    Ok(())
}

/// Insert a batch of normalized clock names
fn insert_batch(names: &[String]) {
    let mut filter = ALIAS_FILTER.write().expect("alias filter poisoned");

    for name in names {
        filter.add(name);
    }
}
