//! OAuth token storage.

use rusqlite::OptionalExtension;

use crate::{Database, DbError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub scope: String,
    pub expires_at: i64,
}

impl Database {
    /// Store `token` as the current credential. Older rows are kept for
    /// history; the newest row wins.
    pub fn save_token(&self, token: &Token) -> Result<(), DbError> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO tokens (access_token, refresh_token, scope, expires_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, CURRENT_TIMESTAMP)",
                rusqlite::params![token.access_token, token.refresh_token, token.scope, token.expires_at],
            )?;
            Ok(())
        })
    }

    pub fn get_latest_token(&self) -> Result<Option<Token>, DbError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT access_token, refresh_token, scope, expires_at FROM tokens ORDER BY id DESC LIMIT 1",
            )?;
            let token = stmt
                .query_row([], |row| {
                    Ok(Token {
                        access_token: row.get::<_, Option<String>>(0)?.unwrap_or_default(),
                        refresh_token: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                        scope: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                        expires_at: row.get::<_, Option<i64>>(3)?.unwrap_or_default(),
                    })
                })
                .optional()?;
            Ok(token)
        })
    }

    /// Remove every stored credential. Returns the number of rows deleted.
    pub fn delete_all_tokens(&self) -> Result<usize, DbError> {
        self.with_conn(|conn| {
            let n = conn.execute("DELETE FROM tokens", [])?;
            tracing::debug!(deleted = n, "Cleared stored tokens");
            Ok(n)
        })
    }

    /// Keep only the newest `keep` rows.
    pub fn prune_tokens(&self, keep: usize) -> Result<usize, DbError> {
        self.with_conn(|conn| {
            let n = conn.execute(
                "DELETE FROM tokens WHERE id NOT IN (SELECT id FROM tokens ORDER BY id DESC LIMIT ?1)",
                [keep as i64],
            )?;
            if n > 0 {
                tracing::debug!(pruned = n, keep, "Pruned old token rows");
            }
            Ok(n)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_db() -> Database {
        Database::open_in_memory().expect("Failed to create test DB")
    }

    fn token(access: &str, expires_at: i64) -> Token {
        Token {
            access_token: access.into(),
            refresh_token: "refresh".into(),
            scope: "https://www.googleapis.com/auth/drive.file".into(),
            expires_at,
        }
    }

    #[test]
    fn test_tokens() {
        let db = test_db();
        assert!(db.get_latest_token().unwrap().is_none());

        db.save_token(&token("abc", 9999999)).unwrap();
        let got = db.get_latest_token().unwrap().unwrap();
        assert_eq!(got, token("abc", 9999999));

        assert_eq!(db.delete_all_tokens().unwrap(), 1);
        assert!(db.get_latest_token().unwrap().is_none());
    }

    #[test]
    fn newest_token_wins() {
        let db = test_db();
        db.save_token(&token("old", 1)).unwrap();
        db.save_token(&token("new", 2)).unwrap();
        assert_eq!(db.get_latest_token().unwrap().unwrap().access_token, "new");
    }

    #[test]
    fn prune_keeps_newest_rows() {
        let db = test_db();
        for i in 0..5 {
            db.save_token(&token(&format!("t{i}"), i)).unwrap();
        }
        assert_eq!(db.prune_tokens(2).unwrap(), 3);
        assert_eq!(db.get_latest_token().unwrap().unwrap().access_token, "t4");
        assert_eq!(db.delete_all_tokens().unwrap(), 2);
    }
}
