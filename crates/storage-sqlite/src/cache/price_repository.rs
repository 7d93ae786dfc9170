use std::sync::Arc;

use diesel::prelude::*;
use log::{debug, warn};

use qfinance_core::quotes::{CacheKey, CacheStore, PriceRecord};
use qfinance_core::Result;

use super::memory::MemoryIndex;
use super::model::PriceCacheDB;
use crate::db::{get_connection, DbPool};
use crate::errors::IntoCore;
use crate::schema::price_cache::dsl as price_dsl;

/// SQLite-backed price cache.
///
/// The whole table is read into memory when the repository is opened.
/// Each `put` is written through to SQLite before the memory copy is updated.
pub struct PriceCacheRepository {
    pool: Arc<DbPool>,
    index: MemoryIndex<PriceRecord>,
}

impl PriceCacheRepository {
    pub fn open(pool: Arc<DbPool>) -> Result<Self> {
        let mut conn = get_connection(&pool)?;
        let rows = price_dsl::price_cache
            .select(PriceCacheDB::as_select())
            .load::<PriceCacheDB>(&mut conn)
            .into_core()?;

        let total = rows.len();
        let records: Vec<PriceRecord> = rows
            .into_iter()
            .filter_map(|row| {
                let key = format!("{}:{}", row.symbol, row.date);
                PriceRecord::try_from(row)
                    .map_err(|e| warn!("Skipping price cache row {}: {}", key, e))
                    .ok()
            })
            .collect();
        debug!("Loaded {} of {} price cache rows", records.len(), total);

        Ok(Self {
            pool,
            index: MemoryIndex::load(records),
        })
    }

    /// Write many records in one transaction. Later records win on key clashes.
    pub fn put_many(&self, records: Vec<PriceRecord>) -> Result<usize> {
        let rows: Vec<PriceCacheDB> = records.iter().map(PriceCacheDB::from).collect();
        let mut conn = get_connection(&self.pool)?;
        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            for row in &rows {
                diesel::replace_into(price_dsl::price_cache)
                    .values(row)
                    .execute(conn)?;
            }
            Ok(())
        })
        .into_core()?;

        let count = records.len();
        for record in records {
            self.index.insert(record);
        }
        Ok(count)
    }
}

impl CacheStore<PriceRecord> for PriceCacheRepository {
    fn get(&self, key: &CacheKey) -> Result<Option<PriceRecord>> {
        Ok(self.index.get(key))
    }

    fn put(&self, record: PriceRecord) -> Result<()> {
        let row = PriceCacheDB::from(&record);
        let mut conn = get_connection(&self.pool)?;
        diesel::replace_into(price_dsl::price_cache)
            .values(&row)
            .execute(&mut conn)
            .into_core()?;
        self.index.insert(record);
        Ok(())
    }

    fn len(&self) -> Result<usize> {
        Ok(self.index.len())
    }

    fn records(&self) -> Result<Vec<PriceRecord>> {
        Ok(self.index.sorted())
    }
}
