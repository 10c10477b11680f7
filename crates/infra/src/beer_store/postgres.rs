//! Postgres-backed beer store.
//!
//! ## Schema
//!
//! One `beers` table, created by [`PostgresBeerStore::migrate`]:
//!
//! | Column | Type | Constraint |
//! |---|---|---|
//! | `id` | `BIGSERIAL` | primary key, assigned on insert |
//! | `name` | `VARCHAR(200)` | `UNIQUE`, not null |
//! | `brand` | `VARCHAR(200)` | not null |
//! | `beer_type` | `VARCHAR(16)` | not null |
//! | `quantity` | `BIGINT` | `CHECK (quantity >= 0 AND quantity <= max)` |
//! | `max` | `BIGINT` | `CHECK (max >= 0)` |
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Error Code | StoreError |
//! |------------|----------------------|------------|
//! | Database (unique violation) | `23505` | `Conflict` |
//! | Database (other) | Any other | `Backend` |
//! | Anything else | N/A | `Backend` |

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{FromRow, PgPool, Row};
use tracing::{Span, instrument};

use beerstock_core::BeerId;
use beerstock_inventory::{Beer, BeerType, NewBeer};

use super::r#trait::{BeerStore, StoreError};

const CREATE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS beers (
    id         BIGSERIAL PRIMARY KEY,
    name       VARCHAR(200) NOT NULL UNIQUE,
    brand      VARCHAR(200) NOT NULL,
    beer_type  VARCHAR(16)  NOT NULL,
    quantity   BIGINT       NOT NULL,
    max        BIGINT       NOT NULL,
    CONSTRAINT beers_max_non_negative CHECK (max >= 0),
    CONSTRAINT beers_quantity_in_bounds CHECK (quantity >= 0 AND quantity <= max)
)
"#;

/// Postgres-backed beer store.
///
/// Uses the SQLx connection pool, which is `Send + Sync`; each method is a
/// single statement so no explicit transactions are needed.
#[derive(Debug, Clone)]
pub struct PostgresBeerStore {
    pool: Arc<PgPool>,
}

impl PostgresBeerStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Connect to `database_url` and return a store (schema not touched).
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPool::connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        Ok(Self::new(pool))
    }

    /// Create the `beers` table if it does not exist yet.
    #[instrument(skip(self), err)]
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::query(CREATE_TABLE)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("migrate", e))?;
        Ok(())
    }
}

#[async_trait]
impl BeerStore for PostgresBeerStore {
    #[instrument(skip(self), err)]
    async fn find_by_name(&self, name: &str) -> Result<Option<Beer>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, brand, beer_type, quantity, max
            FROM beers
            WHERE name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_by_name", e))?;

        row.map(|r| decode_row(&r)).transpose()
    }

    #[instrument(skip(self), err)]
    async fn find_by_id(&self, id: BeerId) -> Result<Option<Beer>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, brand, beer_type, quantity, max
            FROM beers
            WHERE id = $1
            "#,
        )
        .bind(id.get())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_by_id", e))?;

        row.map(|r| decode_row(&r)).transpose()
    }

    #[instrument(skip(self), fields(beer_count = tracing::field::Empty), err)]
    async fn find_all(&self) -> Result<Vec<Beer>, StoreError> {
        let span = Span::current();

        let rows = sqlx::query(
            r#"
            SELECT id, name, brand, beer_type, quantity, max
            FROM beers
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_all", e))?;

        let beers = rows
            .iter()
            .map(decode_row)
            .collect::<Result<Vec<_>, _>>()?;

        span.record("beer_count", beers.len());
        Ok(beers)
    }

    #[instrument(skip(self, beer), fields(name = %beer.name), err)]
    async fn insert(&self, beer: NewBeer) -> Result<Beer, StoreError> {
        let row = sqlx::query(
            r#"
            INSERT INTO beers (name, brand, beer_type, quantity, max)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, brand, beer_type, quantity, max
            "#,
        )
        .bind(&beer.name)
        .bind(&beer.brand)
        .bind(beer.beer_type.as_str())
        .bind(i64::from(beer.quantity))
        .bind(i64::from(beer.max))
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert", e))?;

        decode_row(&row)
    }

    #[instrument(skip(self, beer), fields(id = %beer.id), err)]
    async fn save(&self, beer: Beer) -> Result<Beer, StoreError> {
        let row = sqlx::query(
            r#"
            INSERT INTO beers (id, name, brand, beer_type, quantity, max)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (id)
            DO UPDATE SET
                name = EXCLUDED.name,
                brand = EXCLUDED.brand,
                beer_type = EXCLUDED.beer_type,
                quantity = EXCLUDED.quantity,
                max = EXCLUDED.max
            RETURNING id, name, brand, beer_type, quantity, max
            "#,
        )
        .bind(beer.id.get())
        .bind(&beer.name)
        .bind(&beer.brand)
        .bind(beer.beer_type.as_str())
        .bind(i64::from(beer.quantity))
        .bind(i64::from(beer.max))
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("save", e))?;

        decode_row(&row)
    }

    #[instrument(skip(self), err)]
    async fn delete_by_id(&self, id: BeerId) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM beers WHERE id = $1")
            .bind(id.get())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_by_id", e))?;
        Ok(())
    }
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {}: {}", operation, db_err.message());
            match db_err.code() {
                Some(code) if code.as_ref() == "23505" => StoreError::Conflict(msg),
                _ => StoreError::Backend(msg),
            }
        }
        other => StoreError::Backend(format!("{operation}: {other}")),
    }
}

// SQLx row types

#[derive(Debug)]
struct BeerRow {
    id: i64,
    name: String,
    brand: String,
    beer_type: String,
    quantity: i64,
    max: i64,
}

impl<'r> FromRow<'r, sqlx::postgres::PgRow> for BeerRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(BeerRow {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            brand: row.try_get("brand")?,
            beer_type: row.try_get("beer_type")?,
            quantity: row.try_get("quantity")?,
            max: row.try_get("max")?,
        })
    }
}

impl TryFrom<BeerRow> for Beer {
    type Error = StoreError;

    fn try_from(row: BeerRow) -> Result<Self, Self::Error> {
        let malformed = |what: &str| StoreError::Backend(format!("malformed beer row {}: {what}", row.id));

        Ok(Beer {
            id: BeerId::new(row.id).map_err(|e| malformed(&e.to_string()))?,
            beer_type: row
                .beer_type
                .parse::<BeerType>()
                .map_err(|e| malformed(&e.to_string()))?,
            quantity: u32::try_from(row.quantity).map_err(|_| malformed("quantity out of range"))?,
            max: u32::try_from(row.max).map_err(|_| malformed("max out of range"))?,
            name: row.name,
            brand: row.brand,
        })
    }
}

fn decode_row(row: &sqlx::postgres::PgRow) -> Result<Beer, StoreError> {
    let row = BeerRow::from_row(row)
        .map_err(|e| StoreError::Backend(format!("failed to decode beer row: {e}")))?;
    Beer::try_from(row)
}
