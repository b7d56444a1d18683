use crate::error::{GhcardError, Result};
use crate::model::{ContributionDay, SCHEMA_VERSION};
use chrono::{NaiveDate, Utc};
use rusqlite::{params, Connection};
use std::path::Path;

/// Persistent store for contribution calendars. Completed calendar years are
/// immutable upstream, so they are fetched once and replayed from here.
pub struct Cache {
    conn: Connection,
}

impl Cache {
    pub fn new<P: AsRef<Path>>(cache_path: Option<P>) -> Result<Self> {
        let cache_dir = match cache_path {
            Some(path) => path.as_ref().to_path_buf(),
            None => Path::new(".ghcard").to_path_buf(),
        };
        std::fs::create_dir_all(&cache_dir)?;
        let db_path = cache_dir.join("cache.db");
        let conn = Connection::open(&db_path)?;
        let mut cache = Self { conn };
        cache.initialize()?;
        Ok(cache)
    }

    fn initialize(&mut self) -> Result<()> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS contribution_days (
                username TEXT NOT NULL,
                date TEXT NOT NULL,
                contribution_count INTEGER NOT NULL,
                PRIMARY KEY (username, date)
            );
            CREATE TABLE IF NOT EXISTS fetched_years (
                username TEXT NOT NULL,
                year INTEGER NOT NULL,
                fetched_at INTEGER NOT NULL,
                PRIMARY KEY (username, year)
            );
            ",
        )?;
        self.check_schema_version()?;
        Ok(())
    }

    fn check_schema_version(&mut self) -> Result<()> {
        let user_version: i64 = self
            .conn
            .query_row("PRAGMA user_version;", [], |row| row.get(0))?;

        if user_version == 0 {
            let set_stmt = format!("PRAGMA user_version = {SCHEMA_VERSION};");
            self.conn.execute_batch(&set_stmt)?;
        } else if user_version != SCHEMA_VERSION as i64 {
            return Err(GhcardError::Cache(format!(
                "Schema version mismatch: expected {}, found {}",
                SCHEMA_VERSION, user_version
            )));
        }

        Ok(())
    }

    /// Days of `year` for `username`, or `None` if that year was never
    /// recorded as completely fetched.
    pub fn get_year(&self, username: &str, year: i32) -> Result<Option<Vec<ContributionDay>>> {
        let fetched: Option<i64> = self
            .conn
            .query_row(
                "SELECT fetched_at FROM fetched_years WHERE username = ? AND year = ?",
                params![username, year],
                |row| row.get(0),
            )
            .map(Some)
            .or_else(|err| match err {
                rusqlite::Error::QueryReturnedNoRows => Ok(None),
                other => Err(other),
            })?;
        if fetched.is_none() {
            return Ok(None);
        }

        let mut stmt = self.conn.prepare(
            "SELECT date, contribution_count FROM contribution_days
             WHERE username = ? AND date >= ? AND date <= ?
             ORDER BY date",
        )?;
        let first = year_bound(year, 1, 1)?;
        let last = year_bound(year, 12, 31)?;
        let rows = stmt.query_map(params![username, first, last], |row| {
            let date: NaiveDate = row.get(0)?;
            let contribution_count: u32 = row.get(1)?;
            Ok(ContributionDay {
                date,
                contribution_count,
            })
        })?;

        let mut days = Vec::new();
        for row in rows {
            days.push(row?);
        }
        Ok(Some(days))
    }

    /// Record `year` as completely fetched, replacing any partial rows.
    pub fn store_year(
        &mut self,
        username: &str,
        year: i32,
        days: &[ContributionDay],
    ) -> Result<()> {
        let tx = self.conn.transaction()?;

        tx.execute(
            "DELETE FROM contribution_days WHERE username = ? AND date >= ? AND date <= ?",
            params![username, year_bound(year, 1, 1)?, year_bound(year, 12, 31)?],
        )?;

        {
            let mut insert = tx.prepare(
                "INSERT OR REPLACE INTO contribution_days (username, date, contribution_count)
                 VALUES (?, ?, ?)",
            )?;
            for day in days {
                insert.execute(params![username, day.date, day.contribution_count])?;
            }
        }

        tx.execute(
            "INSERT OR REPLACE INTO fetched_years (username, year, fetched_at) VALUES (?, ?, ?)",
            params![username, year, Utc::now().timestamp()],
        )?;

        tx.commit()?;
        Ok(())
    }
}

fn year_bound(year: i32, month: u32, day: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| GhcardError::InvalidDate(format!("{year}-{month:02}-{day:02}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn day(y: i32, m: u32, d: u32, count: u32) -> ContributionDay {
        ContributionDay {
            date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            contribution_count: count,
        }
    }

    #[test]
    fn year_roundtrip() {
        let dir = tempdir().unwrap();
        let mut cache = Cache::new(Some(dir.path())).unwrap();

        assert!(cache.get_year("octocat", 2023).unwrap().is_none());

        let days = vec![day(2023, 1, 1, 2), day(2023, 6, 15, 0), day(2023, 12, 31, 4)];
        cache.store_year("octocat", 2023, &days).unwrap();

        let loaded = cache.get_year("octocat", 2023).unwrap().unwrap();
        assert_eq!(loaded, days);

        // other users and other years stay invisible
        assert!(cache.get_year("octocat", 2022).unwrap().is_none());
        assert!(cache.get_year("hubot", 2023).unwrap().is_none());
    }

    #[test]
    fn store_replaces_previous_rows() {
        let dir = tempdir().unwrap();
        let mut cache = Cache::new(Some(dir.path())).unwrap();

        cache
            .store_year("octocat", 2023, &[day(2023, 3, 1, 1), day(2023, 3, 2, 1)])
            .unwrap();
        cache.store_year("octocat", 2023, &[day(2023, 3, 2, 5)]).unwrap();

        let loaded = cache.get_year("octocat", 2023).unwrap().unwrap();
        assert_eq!(loaded, vec![day(2023, 3, 2, 5)]);
    }
}
