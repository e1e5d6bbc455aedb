// SPDX-FileCopyrightText: 2026 Leadgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Delivery event logging. Rows are append-only: one per send attempt the
//! orchestrator decides to record, never updated after creation.

use leadgate_core::LeadgateError;
use rusqlite::params;

use crate::database::Database;
use crate::models::DeliveryEvent;
use crate::queries::parse_col;

const EVENT_COLUMNS: &str =
    "id, kind, category, recipient, description, product_id, sent_at, created_at, updated_at";

fn event_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<DeliveryEvent> {
    Ok(DeliveryEvent {
        id: row.get(0)?,
        kind: parse_col(1, row.get::<_, String>(1)?)?,
        category: parse_col(2, row.get::<_, String>(2)?)?,
        recipient: row.get(3)?,
        description: row.get(4)?,
        product_id: row.get(5)?,
        sent_at: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

/// Record one delivery event.
pub async fn insert_event(db: &Database, event: &DeliveryEvent) -> Result<(), LeadgateError> {
    let event = event.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO delivery_events (id, kind, category, recipient, description,
                                              product_id, sent_at, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    event.id,
                    event.kind.to_string(),
                    event.category.to_string(),
                    event.recipient,
                    event.description,
                    event.product_id,
                    event.sent_at,
                    event.created_at,
                    event.updated_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Most recent delivery events, newest first.
pub async fn list_recent_events(
    db: &Database,
    limit: i64,
) -> Result<Vec<DeliveryEvent>, LeadgateError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {EVENT_COLUMNS} FROM delivery_events
                 ORDER BY created_at DESC LIMIT ?1"
            ))?;
            let rows = stmt.query_map(params![limit], event_from_row)?;
            let mut events = Vec::new();
            for row in rows {
                events.push(row?);
            }
            Ok(events)
        })
        .await
        .map_err(crate::database::map_tr_err)
}
