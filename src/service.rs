//! Persistence for registered collectors.
//!
//! Controllers only see the [`PersonService`] trait; [`SqlitePersonService`]
//! is the implementation wired in at startup.

use async_trait::async_trait;
use sqlx::{Pool, QueryBuilder, Sqlite};

use crate::{error::Result, models::Person};

/// Rows per multi-row INSERT, kept well under SQLite's bind parameter limit.
pub const BATCH_SIZE: usize = 1_000;

/// CRUD operations over [`Person`] records.
#[async_trait]
pub trait PersonService: Send + Sync {
    /// All people, ordered by id.
    async fn get_all(&self) -> Result<Vec<Person>>;

    async fn get(&self, id: i64) -> Result<Option<Person>>;

    /// Stores a new person and returns the id assigned by the database. The
    /// incoming `id` is ignored.
    async fn insert(&self, person: Person) -> Result<i64>;

    /// Overwrites every column of the row with `person.id`.
    async fn edit(&self, person: Person) -> Result<()>;

    async fn remove(&self, id: i64) -> Result<()>;

    /// Stores many people with as few statements as possible. Returns the
    /// number of rows written.
    async fn insert_many(&self, people: Vec<Person>) -> Result<u64>;
}

#[derive(Clone)]
pub struct SqlitePersonService {
    pool: Pool<Sqlite>,
}

impl SqlitePersonService {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PersonService for SqlitePersonService {
    async fn get_all(&self) -> Result<Vec<Person>> {
        let people = sqlx::query_as::<_, Person>("SELECT * FROM people ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(people)
    }

    async fn get(&self, id: i64) -> Result<Option<Person>> {
        let person = sqlx::query_as::<_, Person>("SELECT * FROM people WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(person)
    }

    async fn insert(&self, person: Person) -> Result<i64> {
        let result = sqlx::query(
            r#"
        INSERT INTO people
            (tax_id, name, email, street, postal_code, number, complement, city, neighborhood, state)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(person.tax_id)
        .bind(person.name)
        .bind(person.email)
        .bind(person.street)
        .bind(person.postal_code)
        .bind(person.number)
        .bind(person.complement)
        .bind(person.city)
        .bind(person.neighborhood)
        .bind(person.state)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        tracing::info!("Registered person {id}");
        Ok(id)
    }

    async fn edit(&self, person: Person) -> Result<()> {
        let result = sqlx::query(
            r#"
        UPDATE people SET
            tax_id = ?, name = ?, email = ?, street = ?, postal_code = ?,
            number = ?, complement = ?, city = ?, neighborhood = ?, state = ?
        WHERE id = ?"#,
        )
        .bind(person.tax_id)
        .bind(person.name)
        .bind(person.email)
        .bind(person.street)
        .bind(person.postal_code)
        .bind(person.number)
        .bind(person.complement)
        .bind(person.city)
        .bind(person.neighborhood)
        .bind(person.state)
        .bind(person.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            tracing::warn!("Edit of person {} matched no rows", person.id);
        }
        Ok(())
    }

    async fn remove(&self, id: i64) -> Result<()> {
        sqlx::query("DELETE FROM people WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        tracing::info!("Removed person {id}");
        Ok(())
    }

    async fn insert_many(&self, people: Vec<Person>) -> Result<u64> {
        let mut written = 0;

        for chunk in people.chunks(BATCH_SIZE) {
            let mut query = QueryBuilder::<Sqlite>::new(
                "INSERT INTO people (tax_id, name, email, street, postal_code, number, complement, city, neighborhood, state) ",
            );
            query.push_values(chunk, |mut row, person| {
                row.push_bind(person.tax_id.clone())
                    .push_bind(person.name.clone())
                    .push_bind(person.email.clone())
                    .push_bind(person.street.clone())
                    .push_bind(person.postal_code)
                    .push_bind(person.number)
                    .push_bind(person.complement.clone())
                    .push_bind(person.city.clone())
                    .push_bind(person.neighborhood.clone())
                    .push_bind(person.state.clone());
            });

            let result = query.build().execute(&self.pool).await?;
            written += result.rows_affected();
            tracing::info!("Batch of {} records stored in database", chunk.len());
        }

        Ok(written)
    }
}
