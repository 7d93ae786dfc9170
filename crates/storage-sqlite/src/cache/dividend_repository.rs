use std::sync::Arc;

use diesel::prelude::*;
use log::{debug, warn};

use qfinance_core::quotes::{CacheKey, CacheStore, DividendRecord};
use qfinance_core::Result;

use super::memory::MemoryIndex;
use super::model::DividendCacheDB;
use crate::db::{get_connection, DbPool};
use crate::errors::IntoCore;
use crate::schema::ttm_dividend_cache::dsl as dividend_dsl;

/// SQLite-backed dividend cache.
///
/// The whole table is read into memory when the repository is opened.
/// Each `put` is written through to SQLite before the memory copy is updated.
pub struct DividendCacheRepository {
    pool: Arc<DbPool>,
    index: MemoryIndex<DividendRecord>,
}

impl DividendCacheRepository {
    pub fn open(pool: Arc<DbPool>) -> Result<Self> {
        let mut conn = get_connection(&pool)?;
        let rows = dividend_dsl::ttm_dividend_cache
            .select(DividendCacheDB::as_select())
            .load::<DividendCacheDB>(&mut conn)
            .into_core()?;

        let total = rows.len();
        let records: Vec<DividendRecord> = rows
            .into_iter()
            .filter_map(|row| {
                let key = format!("{}:{}", row.symbol, row.calc_date);
                DividendRecord::try_from(row)
                    .map_err(|e| warn!("Skipping dividend cache row {}: {}", key, e))
                    .ok()
            })
            .collect();
        debug!("Loaded {} of {} dividend cache rows", records.len(), total);

        Ok(Self {
            pool,
            index: MemoryIndex::load(records),
        })
    }

    /// Write many records in one transaction. Later records win on key clashes.
    pub fn put_many(&self, records: Vec<DividendRecord>) -> Result<usize> {
        let rows: Vec<DividendCacheDB> = records.iter().map(DividendCacheDB::from).collect();
        let mut conn = get_connection(&self.pool)?;
        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            for row in &rows {
                diesel::replace_into(dividend_dsl::ttm_dividend_cache)
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

impl CacheStore<DividendRecord> for DividendCacheRepository {
    fn get(&self, key: &CacheKey) -> Result<Option<DividendRecord>> {
        Ok(self.index.get(key))
    }

    fn put(&self, record: DividendRecord) -> Result<()> {
        let row = DividendCacheDB::from(&record);
        let mut conn = get_connection(&self.pool)?;
        diesel::replace_into(dividend_dsl::ttm_dividend_cache)
            .values(&row)
            .execute(&mut conn)
            .into_core()?;
        self.index.insert(record);
        Ok(())
    }

    fn len(&self) -> Result<usize> {
        Ok(self.index.len())
    }

    fn records(&self) -> Result<Vec<DividendRecord>> {
        Ok(self.index.sorted())
    }
}
