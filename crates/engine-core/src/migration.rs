//! Migration Engine: orchestrates insert ordering (parent before child),
//! opens/closes one transaction per application, delegates to the
//! destination's duplicate detector and bulk insert strategy.

use crate::error::MigrationError;
use connectors::{bulk_insert, duplicate, BulkInsertOptions};
use model::contract::{Contract, TableCategory};
use model::core::identifiers::AppId;
use model::records::row::RowSet;
use std::collections::HashMap;
use tokio_postgres::Client;
use tracing::{error, info};

/// Per-table outcome of one migration run, keyed by table name.
#[derive(Debug, Clone, Default)]
pub struct TableCounts {
    pub inserted: HashMap<String, usize>,
    pub skipped_duplicate: HashMap<String, usize>,
}

impl TableCounts {
    pub fn total_inserted(&self) -> usize {
        self.inserted.values().sum()
    }

    pub fn total_skipped(&self) -> usize {
        self.skipped_duplicate.values().sum()
    }
}

/// The duplicate-detector key columns for a table, derived from its
/// contract category. `ContactScoped` is the primary contact table (single
/// surrogate key); `ContactChild` covers both address and employment
/// subtype tables, disambiguated by name the same way the mapping engine
/// picks a child's source element. `ApplicationRoot` and `Auxiliary` tables
/// have no natural dedup key: the former is guarded by its destination
/// primary key alone, the latter is purely additive.
fn key_columns_for(category: Option<TableCategory>, table: &str) -> Vec<String> {
    match category {
        Some(TableCategory::ContactScoped) => vec!["con_id".to_string()],
        Some(TableCategory::ContactChild) => {
            let type_col = if table.to_ascii_lowercase().contains("employ") {
                "employment_type_enum"
            } else {
                "address_type_enum"
            };
            vec!["con_id".to_string(), type_col.to_string()]
        }
        _ => Vec::new(),
    }
}

/// Bulk insert options for a table: `ApplicationRoot` carries an
/// externally-supplied primary key (`app_id` from the source document), so
/// it needs `OVERRIDING SYSTEM VALUE`. `ContactScoped` tolerates a
/// primary-key violation during the per-row fallback, since re-running a
/// crashed application may re-attempt an insert that already landed.
fn insert_options_for(category: Option<TableCategory>) -> BulkInsertOptions {
    match category {
        Some(TableCategory::ApplicationRoot) => BulkInsertOptions {
            enable_identity_insert: true,
            tolerate_duplicate_key: false,
        },
        Some(TableCategory::ContactScoped) => BulkInsertOptions {
            enable_identity_insert: false,
            tolerate_duplicate_key: true,
        },
        _ => BulkInsertOptions::default(),
    }
}

/// Runs the full per-application migration: opens a transaction, inserts
/// every table in `contract.table_insertion_order` (skipping tables absent
/// from `rows`), commits on success. On any failure the transaction is
/// rolled back and the original error re-raised; if the rollback itself
/// fails, a [`connectors::TransactionAtomicityError`] takes its place to
/// signal the destination may be left inconsistent.
pub async fn migrate_application(
    client: &mut Client,
    contract: &Contract,
    app_id: AppId,
    mut rows: RowSet,
) -> Result<TableCounts, MigrationError> {
    let txn = client
        .transaction()
        .await
        .map_err(MigrationError::BeginTransaction)?;

    let mut counts = TableCounts::default();
    let mut failure: Option<MigrationError> = None;

    for table in &contract.table_insertion_order {
        let Some(table_rows) = rows.remove(table) else {
            continue;
        };
        if table_rows.is_empty() {
            continue;
        }

        let category = contract.table(table).map(|t| t.category);
        let key_columns = key_columns_for(category, table);

        let table_rows = if key_columns.is_empty() {
            table_rows
        } else {
            match duplicate::filter_new_rows(&txn, table, &key_columns, table_rows).await {
                Ok(result) => {
                    if result.skipped > 0 {
                        counts
                            .skipped_duplicate
                            .insert(table.clone(), result.skipped);
                    }
                    result.rows
                }
                Err(e) => {
                    failure = Some(MigrationError::Db(e));
                    break;
                }
            }
        };

        if table_rows.is_empty() {
            continue;
        }

        let options = insert_options_for(category);
        match bulk_insert::insert(&txn, table, &table_rows, &options).await {
            Ok(inserted) => {
                counts.inserted.insert(table.clone(), inserted);
            }
            Err(e) => {
                failure = Some(MigrationError::BulkInsert(e));
                break;
            }
        }
    }

    match failure {
        None => {
            txn.commit().await.map_err(|source| {
                MigrationError::Atomicity(connectors::TransactionAtomicityError {
                    app_id: app_id.get(),
                    source,
                })
            })?;
            info!(app_id = %app_id, rows = counts.total_inserted(), "application committed");
            Ok(counts)
        }
        Some(err) => {
            if let Err(rollback_err) = txn.rollback().await {
                error!(app_id = %app_id, error = %rollback_err, "rollback failed after migration error");
                return Err(MigrationError::Atomicity(connectors::TransactionAtomicityError {
                    app_id: app_id.get(),
                    source: rollback_err,
                }));
            }
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contact_scoped_uses_single_column_key() {
        let cols = key_columns_for(Some(TableCategory::ContactScoped), "contacts");
        assert_eq!(cols, vec!["con_id".to_string()]);
    }

    #[test]
    fn employment_child_table_gets_employment_type_column() {
        let cols = key_columns_for(Some(TableCategory::ContactChild), "contact_employment");
        assert_eq!(
            cols,
            vec!["con_id".to_string(), "employment_type_enum".to_string()]
        );
    }

    #[test]
    fn address_child_table_gets_address_type_column() {
        let cols = key_columns_for(Some(TableCategory::ContactChild), "contact_address");
        assert_eq!(
            cols,
            vec!["con_id".to_string(), "address_type_enum".to_string()]
        );
    }

    #[test]
    fn application_root_has_no_dedup_key_but_gets_identity_insert() {
        assert!(key_columns_for(Some(TableCategory::ApplicationRoot), "applications").is_empty());
        let opts = insert_options_for(Some(TableCategory::ApplicationRoot));
        assert!(opts.enable_identity_insert);
        assert!(!opts.tolerate_duplicate_key);
    }

    #[test]
    fn contact_scoped_tolerates_duplicate_key_on_fallback() {
        let opts = insert_options_for(Some(TableCategory::ContactScoped));
        assert!(opts.tolerate_duplicate_key);
        assert!(!opts.enable_identity_insert);
    }

    #[test]
    fn auxiliary_table_has_no_dedup_key() {
        assert!(key_columns_for(Some(TableCategory::Auxiliary), "contact_score_history").is_empty());
    }
}
