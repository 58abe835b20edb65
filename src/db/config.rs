//! Key/value configuration store backed by the `config` table.
//! Holds singleton entries such as the admin password hash.

use rusqlite::{params, OptionalExtension};

use crate::error::AppResult;
use crate::state::DbPool;

pub fn get(pool: &DbPool, key: &str) -> AppResult<Option<String>> {
    let conn = pool.get()?;
    let value = conn
        .query_row(
            "SELECT value FROM config WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()?;
    Ok(value)
}

pub fn set(pool: &DbPool, key: &str, value: &str) -> AppResult<()> {
    let conn = pool.get()?;
    conn.execute(
        "INSERT INTO config (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        params![key, value],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use r2d2::Pool;
    use r2d2_sqlite::SqliteConnectionManager;

    fn test_pool() -> DbPool {
        let manager = SqliteConnectionManager::memory();
        let pool = Pool::builder().max_size(1).build(manager).unwrap();
        crate::db::run_migrations(&pool).unwrap();
        pool
    }

    #[test]
    fn get_missing_key_returns_none() {
        let pool = test_pool();
        assert_eq!(get(&pool, "nope").unwrap(), None);
    }

    #[test]
    fn set_then_get_round_trips() {
        let pool = test_pool();
        set(&pool, "greeting", "hello").unwrap();
        assert_eq!(get(&pool, "greeting").unwrap().as_deref(), Some("hello"));
    }

    #[test]
    fn set_overwrites_existing_value() {
        let pool = test_pool();
        set(&pool, "greeting", "hello").unwrap();
        set(&pool, "greeting", "hola").unwrap();
        assert_eq!(get(&pool, "greeting").unwrap().as_deref(), Some("hola"));
    }
}
