// SPDX-FileCopyrightText: 2026 Leadgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `leadgate product` subcommands: register and list deliverable products.

use clap::Args;
use leadgate_config::LeadgateConfig;
use leadgate_core::types::{now_rfc3339, Product};
use leadgate_core::LeadgateError;
use leadgate_storage::queries::products;
use leadgate_storage::Database;

/// Arguments for `leadgate product add`.
#[derive(Args, Debug)]
pub struct AddArgs {
    /// Display name, used in delivery messages.
    #[arg(long)]
    pub name: String,

    /// Identifier assigned by the payment gateway.
    #[arg(long)]
    pub external_id: Option<String>,

    #[arg(long, default_value = "ebook")]
    pub product_type: String,

    #[arg(long, default_value = "1.0")]
    pub version: String,

    /// Name of the blob store the file lives in.
    #[arg(long, default_value = "cdn")]
    pub storage_provider: String,

    /// URL or bare host/path of the product file.
    #[arg(long)]
    pub storage_path: String,
}

pub async fn run_add(config: &LeadgateConfig, args: AddArgs) -> Result<(), LeadgateError> {
    let db = Database::open(&config.storage.database_path).await?;

    let now = now_rfc3339();
    let product = Product {
        id: uuid::Uuid::new_v4().to_string(),
        external_id: args.external_id,
        name: args.name,
        product_type: args.product_type,
        version: args.version,
        storage_provider: args.storage_provider,
        storage_path: args.storage_path,
        created_at: now.clone(),
        updated_at: now,
    };
    products::insert_product(&db, &product).await?;
    db.close().await?;

    println!("added product \"{}\" ({})", product.name, product.id);
    Ok(())
}

pub async fn run_list(config: &LeadgateConfig) -> Result<(), LeadgateError> {
    let db = Database::open(&config.storage.database_path).await?;
    let products = products::list_products(&db).await?;
    db.close().await?;

    if products.is_empty() {
        println!("no products registered");
        return Ok(());
    }

    println!(
        "{:<38} {:<12} {:<24} {:<8} storage_path",
        "id", "external_id", "name", "version"
    );
    for p in products {
        println!(
            "{:<38} {:<12} {:<24} {:<8} {}",
            p.id,
            p.external_id.as_deref().unwrap_or("-"),
            p.name,
            p.version,
            p.storage_path
        );
    }
    Ok(())
}
