use anyhow::Result;
use moka::future::Cache;
use serde::Serialize;
use sqlx::SqlitePool;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DirectoryEntry {
    #[schema(example = "Jane Doe")]
    pub name: String,
    #[schema(example = "jane.doe@example.com")]
    pub email: String,
}

/// team -> position -> members, the shape the request form consumes.
pub type StaffDirectory = BTreeMap<String, BTreeMap<String, Vec<DirectoryEntry>>>;

const DIRECTORY_KEY: &str = "staff";

/// Read-through cache over the active staff directory. Entries expire after a
/// short TTL; member writes invalidate eagerly so the form never shows a
/// departed member for long.
#[derive(Clone)]
pub struct StaffCache {
    cache: Cache<&'static str, Arc<StaffDirectory>>,
}

impl StaffCache {
    pub fn new() -> Self {
        StaffCache {
            cache: Cache::builder()
                .max_capacity(1)
                .time_to_live(Duration::from_secs(300)) // 5 min TTL
                .build(),
        }
    }

    /// Cached directory, loading from the database on a miss.
    pub async fn get(&self, pool: &SqlitePool) -> Result<Arc<StaffDirectory>, sqlx::Error> {
        if let Some(directory) = self.cache.get(DIRECTORY_KEY).await {
            return Ok(directory);
        }
        self.refresh(pool).await
    }

    /// Reload from the database unconditionally.
    pub async fn refresh(&self, pool: &SqlitePool) -> Result<Arc<StaffDirectory>, sqlx::Error> {
        let directory = Arc::new(load_directory(pool).await?);
        self.cache.insert(DIRECTORY_KEY, directory.clone()).await;
        Ok(directory)
    }

    pub async fn invalidate(&self) {
        self.cache.invalidate(DIRECTORY_KEY).await;
    }
}

impl Default for StaffCache {
    fn default() -> Self {
        Self::new()
    }
}

async fn load_directory(pool: &SqlitePool) -> Result<StaffDirectory, sqlx::Error> {
    let rows = sqlx::query_as::<_, (String, String, String, String)>(
        "SELECT team, position, name, email FROM members WHERE status = 'active' ORDER BY name",
    )
    .fetch_all(pool)
    .await?;

    let mut directory = StaffDirectory::new();
    for (team, position, name, email) in rows {
        directory
            .entry(team)
            .or_default()
            .entry(position)
            .or_default()
            .push(DirectoryEntry { name, email });
    }
    Ok(directory)
}

pub async fn warmup_staff_directory(cache: &StaffCache, pool: &SqlitePool) -> Result<()> {
    let directory = cache.refresh(pool).await?;
    log::info!("Staff directory warmup complete: {} teams", directory.len());
    Ok(())
}
