// src/db/deals.rs
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::db::connection::Database;
use crate::domain::deal::{Deal, DealDraft, DealPatch, DealStatus};
use crate::errors::ServerError;

/// Where deals live. The dashboard only ever talks to this trait, so the
/// SQLite table and the JSON file are interchangeable.
///
/// Every call is scoped to one owner; other owners' deals are invisible.
pub trait DealStore: Send + Sync {
    /// Newest first.
    fn list(&self, owner_id: i64) -> Result<Vec<Deal>, ServerError>;

    fn get(&self, owner_id: i64, id: &str) -> Result<Option<Deal>, ServerError>;

    fn insert(&self, owner_id: i64, draft: DealDraft, now: DateTime<Utc>)
        -> Result<Deal, ServerError>;

    /// `Ok(None)` when no such deal exists.
    fn update(
        &self,
        owner_id: i64,
        id: &str,
        patch: DealPatch,
        now: DateTime<Utc>,
    ) -> Result<Option<Deal>, ServerError>;

    /// `Ok(false)` when no such deal exists.
    fn delete(&self, owner_id: i64, id: &str) -> Result<bool, ServerError>;
}

const SELECT_DEAL: &str = r#"
    select
        id, owner_id, address, listing_price, commission_rate, my_share,
        status, estimated_close_date, actual_close_date, paid_date, notes,
        created_at, updated_at
    from deals
"#;

fn deal_from_row(row: &Row<'_>) -> rusqlite::Result<Deal> {
    let status: String = row.get(6)?;
    Ok(Deal {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        address: row.get(2)?,
        listing_price: row.get(3)?,
        commission_rate: row.get(4)?,
        my_share: row.get(5)?,
        status: DealStatus::from_parts(&status, row.get(8)?, row.get(9)?),
        estimated_close_date: row.get(7)?,
        notes: row.get(10)?,
        created_at: row.get(11)?,
        updated_at: row.get(12)?,
    })
}

pub fn list_deals(conn: &Connection, owner_id: i64) -> Result<Vec<Deal>, ServerError> {
    let mut stmt = conn
        .prepare(&format!(
            "{SELECT_DEAL} where owner_id = ?1 order by created_at desc, rowid desc"
        ))
        .map_err(|e| ServerError::DbError(format!("prepare list deals failed: {e}")))?;

    let rows = stmt
        .query_map(params![owner_id], deal_from_row)
        .map_err(|e| ServerError::DbError(format!("list deals failed: {e}")))?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r.map_err(|e| ServerError::DbError(format!("read deal row failed: {e}")))?);
    }
    Ok(out)
}

pub fn find_deal(conn: &Connection, owner_id: i64, id: &str) -> Result<Option<Deal>, ServerError> {
    conn.query_row(
        &format!("{SELECT_DEAL} where owner_id = ?1 and id = ?2"),
        params![owner_id, id],
        deal_from_row,
    )
    .optional()
    .map_err(|e| ServerError::DbError(format!("find deal failed: {e}")))
}

pub fn insert_deal(conn: &Connection, deal: &Deal) -> Result<(), ServerError> {
    conn.execute(
        r#"
        insert into deals (
            id, owner_id, address, listing_price, commission_rate, my_share,
            status, estimated_close_date, actual_close_date, paid_date, notes,
            created_at, updated_at
        ) values (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
        "#,
        params![
            deal.id,
            deal.owner_id,
            deal.address,
            deal.listing_price,
            deal.commission_rate,
            deal.my_share,
            deal.status.as_str(),
            deal.estimated_close_date,
            deal.status.actual_close_date(),
            deal.status.paid_date(),
            deal.notes,
            deal.created_at,
            deal.updated_at,
        ],
    )
    .map_err(|e| ServerError::DbError(format!("insert deal failed: {e}")))?;
    Ok(())
}

/// Writes every mutable column back. `id`, `owner_id` and `created_at` never change.
pub fn save_deal(conn: &Connection, deal: &Deal) -> Result<(), ServerError> {
    conn.execute(
        r#"
        update deals set
            address = ?3,
            listing_price = ?4,
            commission_rate = ?5,
            my_share = ?6,
            status = ?7,
            estimated_close_date = ?8,
            actual_close_date = ?9,
            paid_date = ?10,
            notes = ?11,
            updated_at = ?12
        where owner_id = ?1 and id = ?2
        "#,
        params![
            deal.owner_id,
            deal.id,
            deal.address,
            deal.listing_price,
            deal.commission_rate,
            deal.my_share,
            deal.status.as_str(),
            deal.estimated_close_date,
            deal.status.actual_close_date(),
            deal.status.paid_date(),
            deal.notes,
            deal.updated_at,
        ],
    )
    .map_err(|e| ServerError::DbError(format!("update deal failed: {e}")))?;
    Ok(())
}

pub fn delete_deal(conn: &Connection, owner_id: i64, id: &str) -> Result<bool, ServerError> {
    let n = conn
        .execute(
            "delete from deals where owner_id = ?1 and id = ?2",
            params![owner_id, id],
        )
        .map_err(|e| ServerError::DbError(format!("delete deal failed: {e}")))?;
    Ok(n > 0)
}

/// Deals in the application's SQLite database.
#[derive(Clone)]
pub struct SqliteDealStore {
    db: Database,
}

impl SqliteDealStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

impl DealStore for SqliteDealStore {
    fn list(&self, owner_id: i64) -> Result<Vec<Deal>, ServerError> {
        self.db.with_conn(|conn| list_deals(conn, owner_id))
    }

    fn get(&self, owner_id: i64, id: &str) -> Result<Option<Deal>, ServerError> {
        self.db.with_conn(|conn| find_deal(conn, owner_id, id))
    }

    fn insert(
        &self,
        owner_id: i64,
        draft: DealDraft,
        now: DateTime<Utc>,
    ) -> Result<Deal, ServerError> {
        let deal = draft.into_deal(owner_id, now);
        self.db.with_conn(|conn| insert_deal(conn, &deal))?;
        Ok(deal)
    }

    fn update(
        &self,
        owner_id: i64,
        id: &str,
        patch: DealPatch,
        now: DateTime<Utc>,
    ) -> Result<Option<Deal>, ServerError> {
        self.db.with_conn(|conn| {
            let tx = conn
                .transaction()
                .map_err(|e| ServerError::DbError(format!("begin tx failed: {e}")))?;

            let Some(mut deal) = find_deal(&tx, owner_id, id)? else {
                return Ok(None);
            };
            deal.apply(patch, now);
            save_deal(&tx, &deal)?;

            tx.commit()
                .map_err(|e| ServerError::DbError(format!("commit tx failed: {e}")))?;
            Ok(Some(deal))
        })
    }

    fn delete(&self, owner_id: i64, id: &str) -> Result<bool, ServerError> {
        self.db.with_conn(|conn| delete_deal(conn, owner_id, id))
    }
}
