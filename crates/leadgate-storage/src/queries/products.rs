// SPDX-FileCopyrightText: 2026 Leadgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Product lookup and administrative CRUD.
//!
//! Absence is a first-class result (`Ok(None)`), never an error; callers
//! map it to their own not-found condition.

use leadgate_core::LeadgateError;
use rusqlite::params;

use crate::database::Database;
use crate::models::Product;

const PRODUCT_COLUMNS: &str = "id, external_id, name, product_type, version, \
     storage_provider, storage_path, created_at, updated_at";

fn product_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Product> {
    Ok(Product {
        id: row.get(0)?,
        external_id: row.get(1)?,
        name: row.get(2)?,
        product_type: row.get(3)?,
        version: row.get(4)?,
        storage_provider: row.get(5)?,
        storage_path: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

/// Insert a new product.
pub async fn insert_product(db: &Database, product: &Product) -> Result<(), LeadgateError> {
    let product = product.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO products (id, external_id, name, product_type, version,
                                       storage_provider, storage_path, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    product.id,
                    product.external_id,
                    product.name,
                    product.product_type,
                    product.version,
                    product.storage_provider,
                    product.storage_path,
                    product.created_at,
                    product.updated_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a product by internal UUID.
pub async fn get_product(db: &Database, id: &str) -> Result<Option<Product>, LeadgateError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"
            ))?;
            let result = stmt.query_row(params![id], product_from_row);
            match result {
                Ok(product) => Ok(Some(product)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a product by the identifier the external payment gateway assigned.
pub async fn get_product_by_external_id(
    db: &Database,
    external_id: &str,
) -> Result<Option<Product>, LeadgateError> {
    let external_id = external_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {PRODUCT_COLUMNS} FROM products WHERE external_id = ?1"
            ))?;
            let result = stmt.query_row(params![external_id], product_from_row);
            match result {
                Ok(product) => Ok(Some(product)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// List all products, newest first.
pub async fn list_products(db: &Database) -> Result<Vec<Product>, LeadgateError> {
    db.connection()
        .call(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY created_at DESC"
            ))?;
            let rows = stmt.query_map([], product_from_row)?;
            let mut products = Vec::new();
            for row in rows {
                products.push(row?);
            }
            Ok(products)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use leadgate_core::types::now_rfc3339;
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.db");
        let db = Database::open(path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }

    fn make_product(id: &str, external_id: Option<&str>) -> Product {
        let now = now_rfc3339();
        Product {
            id: id.to_string(),
            external_id: external_id.map(|s| s.to_string()),
            name: "Pricing Guide".into(),
            product_type: "ebook".into(),
            version: "1.0".into(),
            storage_provider: "cdn".into(),
            storage_path: "cdn.example.com/files/guide.pdf".into(),
            created_at: now.clone(),
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn insert_and_lookup_by_both_keys() {
        let (db, _dir) = setup_db().await;
        let product = make_product("p-1", Some("hx-900"));
        insert_product(&db, &product).await.unwrap();

        let by_id = get_product(&db, "p-1").await.unwrap().unwrap();
        assert_eq!(by_id.name, "Pricing Guide");

        let by_ext = get_product_by_external_id(&db, "hx-900")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_ext.id, "p-1");
    }

    #[tokio::test]
    async fn absence_is_none_not_error() {
        let (db, _dir) = setup_db().await;
        assert!(get_product(&db, "missing").await.unwrap().is_none());
        assert!(
            get_product_by_external_id(&db, "missing")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn list_returns_all_products() {
        let (db, _dir) = setup_db().await;
        insert_product(&db, &make_product("p-1", None)).await.unwrap();
        insert_product(&db, &make_product("p-2", Some("hx-2")))
            .await
            .unwrap();
        let products = list_products(&db).await.unwrap();
        assert_eq!(products.len(), 2);
    }
}
