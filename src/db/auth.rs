// src/db/auth.rs
use rusqlite::{params, Connection, OptionalExtension};

use crate::errors::ServerError;

/// Insert an agent if they don't exist, then return the agent id.
/// Email should already be normalized by caller (trim/lowercase).
pub fn get_or_create_agent(conn: &Connection, email: &str, now: i64) -> Result<i64, ServerError> {
    conn.execute(
        "insert or ignore into agents (email, created_at) values (?, ?)",
        params![email, now],
    )
    .map_err(|e| ServerError::DbError(format!("insert agent failed: {e}")))?;

    conn.query_row(
        "select id from agents where email = ?",
        params![email],
        |row| row.get(0),
    )
    .map_err(|e| ServerError::DbError(format!("select agent id failed: {e}")))
}

pub fn agent_email(conn: &Connection, agent_id: i64) -> Result<String, ServerError> {
    conn.query_row(
        "select email from agents where id = ?",
        params![agent_id],
        |r| r.get(0),
    )
    .map_err(|e| ServerError::DbError(format!("select agent email failed: {e}")))
}

pub fn touch_last_login(conn: &Connection, agent_id: i64, now: i64) -> Result<(), ServerError> {
    conn.execute(
        "update agents set last_login_at = ? where id = ?",
        params![now, agent_id],
    )
    .map_err(|e| ServerError::DbError(format!("update last_login_at failed: {e}")))?;
    Ok(())
}

/// Insert a magic link row (token_hash should be SHA-256 bytes).
pub fn insert_magic_link(
    conn: &Connection,
    agent_id: i64,
    token_hash: &[u8],
    created_at: i64,
    expires_at: i64,
) -> Result<(), ServerError> {
    conn.execute(
        "insert into magic_links (agent_id, token_hash, created_at, expires_at) values (?, ?, ?, ?)",
        params![agent_id, token_hash, created_at, expires_at],
    )
    .map_err(|e| ServerError::DbError(format!("insert magic link failed: {e}")))?;
    Ok(())
}

/// Marks an unexpired, unused link as used and returns its agent.
/// `Ok(None)` for unknown, expired or already used links.
///
/// The `used_at is null` guard on the update means only one of two racing
/// redeemers gets the agent back.
pub fn consume_magic_link(
    conn: &mut Connection,
    token_hash: &[u8],
    now: i64,
) -> Result<Option<i64>, ServerError> {
    let tx = conn
        .transaction()
        .map_err(|e| ServerError::DbError(format!("begin tx failed: {e}")))?;

    let found: Option<(i64, i64)> = tx
        .query_row(
            "select id, agent_id from magic_links
             where token_hash = ? and used_at is null and expires_at > ?",
            params![token_hash, now],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .optional()
        .map_err(|e| ServerError::DbError(format!("select magic link failed: {e}")))?;

    let Some((link_id, agent_id)) = found else {
        return Ok(None);
    };

    let updated = tx
        .execute(
            "update magic_links set used_at = ? where id = ? and used_at is null",
            params![now, link_id],
        )
        .map_err(|e| ServerError::DbError(format!("update magic link used_at failed: {e}")))?;

    if updated != 1 {
        return Ok(None);
    }

    tx.commit()
        .map_err(|e| ServerError::DbError(format!("commit tx failed: {e}")))?;

    Ok(Some(agent_id))
}
