use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;
use std::fmt;
use uuid::Uuid;

use super::{TransactionRecord, TransactionRepository};

pub struct PostgresTransactionRepository {
    pool: PgPool,
}

impl fmt::Debug for PostgresTransactionRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresTransactionRepository").finish()
    }
}

impl PostgresTransactionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TransactionRepository for PostgresTransactionRepository {
    async fn insert_ignoring_duplicates(&self, records: &[TransactionRecord]) -> Result<u64> {
        let mut tx = self.pool.begin().await?;
        let mut inserted = 0;

        // The (owner_id, provider_transaction_id) unique index makes re-syncs
        // of overlapping ranges a no-op for rows already present.
        for record in records {
            let result = sqlx::query(
                r#"
                INSERT INTO transactions
                    (id, owner_id, provider_transaction_id, name, amount, date)
                VALUES ($1, $2, $3, $4, $5, $6)
                ON CONFLICT (owner_id, provider_transaction_id) DO NOTHING
                "#,
            )
            .bind(record.id)
            .bind(record.owner_id)
            .bind(&record.provider_transaction_id)
            .bind(&record.name)
            .bind(record.amount)
            .bind(record.date)
            .execute(&mut *tx)
            .await?;

            inserted += result.rows_affected();
        }

        tx.commit().await?;
        Ok(inserted)
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<TransactionRecord>> {
        let records = sqlx::query_as::<_, TransactionRecord>(
            r#"
            SELECT id, owner_id, provider_transaction_id, name, amount, date
            FROM transactions
            WHERE owner_id = $1
            ORDER BY date DESC, provider_transaction_id
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }
}
