// SPDX-FileCopyrightText: 2026 Leadgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lead repository operations: find-by-contact, insert, in-place update,
//! and the upsert used by qualifying purchase events.

use leadgate_core::contact::ContactInfo;
use leadgate_core::types::{ContactType, ConversionStatus, now_rfc3339};
use leadgate_core::LeadgateError;
use rusqlite::params;

use crate::database::Database;
use crate::models::Lead;
use crate::queries::parse_col;

const LEAD_COLUMNS: &str = "id, source, name, email, phone, contact_type, user_type, \
     marketing_consent, conversion_status, product_id, created_at";

fn lead_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Lead> {
    Ok(Lead {
        id: row.get(0)?,
        source: row.get(1)?,
        name: row.get(2)?,
        email: row.get(3)?,
        phone: row.get(4)?,
        contact_type: parse_col(5, row.get::<_, String>(5)?)?,
        user_type: row.get(6)?,
        marketing_consent: row.get(7)?,
        conversion_status: parse_col(8, row.get::<_, String>(8)?)?,
        product_id: row.get(9)?,
        created_at: row.get(10)?,
    })
}

/// Insert a new lead.
pub async fn insert_lead(db: &Database, lead: &Lead) -> Result<(), LeadgateError> {
    let lead = lead.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO leads (id, source, name, email, phone, contact_type, user_type,
                                    marketing_consent, conversion_status, product_id, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                params![
                    lead.id,
                    lead.source,
                    lead.name,
                    lead.email,
                    lead.phone,
                    lead.contact_type.to_string(),
                    lead.user_type,
                    lead.marketing_consent,
                    lead.conversion_status.to_string(),
                    lead.product_id,
                    lead.created_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a lead by ID.
pub async fn get_lead(db: &Database, id: &str) -> Result<Option<Lead>, LeadgateError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {LEAD_COLUMNS} FROM leads WHERE id = ?1"
            ))?;
            let result = stmt.query_row(params![id], lead_from_row);
            match result {
                Ok(lead) => Ok(Some(lead)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Find the first lead whose email or phone matches a non-null input.
///
/// Uniqueness is per field, so at most one lead can match each input; when
/// both inputs match different leads the explicit ordering makes the email
/// match win.
pub async fn find_by_email_or_phone(
    db: &Database,
    email: Option<&str>,
    phone: Option<&str>,
) -> Result<Option<Lead>, LeadgateError> {
    let email = email.map(|s| s.to_string());
    let phone = phone.map(|s| s.to_string());
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {LEAD_COLUMNS} FROM leads
                 WHERE (?1 IS NOT NULL AND email = ?1)
                    OR (?2 IS NOT NULL AND phone = ?2)
                 ORDER BY (?1 IS NOT NULL AND email = ?1) DESC
                 LIMIT 1"
            ))?;
            let result = stmt.query_row(params![email, phone], lead_from_row);
            match result {
                Ok(lead) => Ok(Some(lead)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Refresh a matched lead's contact fields in place and advance its
/// conversion status to `converted` (one-way).
///
/// The product association is only overwritten when a new one is supplied.
pub async fn update_converted_contact(
    db: &Database,
    id: &str,
    name: &str,
    contact: &ContactInfo,
    contact_type: ContactType,
    product_id: Option<&str>,
) -> Result<(), LeadgateError> {
    let id = id.to_string();
    let name = name.to_string();
    let contact = contact.clone();
    let product_id = product_id.map(|s| s.to_string());
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE leads
                 SET name = ?2,
                     email = COALESCE(?3, email),
                     phone = COALESCE(?4, phone),
                     contact_type = ?5,
                     product_id = COALESCE(?6, product_id),
                     conversion_status = 'converted'
                 WHERE id = ?1",
                params![
                    id,
                    name,
                    contact.email,
                    contact.phone,
                    contact_type.to_string(),
                    product_id,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Update only the classification tag of a lead. Returns false when no row
/// matched.
pub async fn update_user_type(
    db: &Database,
    id: &str,
    user_type: &str,
) -> Result<bool, LeadgateError> {
    let id = id.to_string();
    let user_type = user_type.to_string();
    db.connection()
        .call(move |conn| {
            let changed = conn.execute(
                "UPDATE leads SET user_type = ?2 WHERE id = ?1",
                params![id, user_type],
            )?;
            Ok(changed > 0)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Fields for a qualifying-event upsert.
#[derive(Debug, Clone)]
pub struct LeadUpsert {
    pub source: String,
    pub name: String,
    pub contact: ContactInfo,
    pub user_type: String,
    pub marketing_consent: bool,
    pub product_id: Option<String>,
}

/// Upsert a lead on a qualifying purchase event.
///
/// A lead matching either contact field is updated in place and re-read;
/// otherwise a new row is inserted with `conversion_status = converted`.
/// Fails with a storage error if the write yields no row.
pub async fn upsert_converted_lead(db: &Database, up: LeadUpsert) -> Result<Lead, LeadgateError> {
    let contact_type = up.contact.contact_type();

    let id = match find_by_email_or_phone(
        db,
        up.contact.email.as_deref(),
        up.contact.phone.as_deref(),
    )
    .await?
    {
        Some(existing) => {
            update_converted_contact(
                db,
                &existing.id,
                &up.name,
                &up.contact,
                contact_type,
                up.product_id.as_deref(),
            )
            .await?;
            existing.id
        }
        None => {
            let lead = Lead {
                id: uuid::Uuid::new_v4().to_string(),
                source: up.source,
                name: up.name,
                email: up.contact.email,
                phone: up.contact.phone,
                contact_type,
                user_type: up.user_type,
                marketing_consent: up.marketing_consent,
                conversion_status: ConversionStatus::Converted,
                product_id: up.product_id,
                created_at: now_rfc3339(),
            };
            insert_lead(db, &lead).await?;
            lead.id
        }
    };

    get_lead(db, &id).await?.ok_or_else(|| LeadgateError::Storage {
        source: "lead upsert yielded no row".into(),
    })
}
