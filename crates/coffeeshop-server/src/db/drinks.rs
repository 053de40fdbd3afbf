//! Drink storage.

use crate::models::{default_menu, Drink, DrinkChanges, Ingredient};
use sqlx::{FromRow, SqlitePool};
use tracing::{debug, info};

/// Raw `drinks` row. The recipe is stored as JSON text.
#[derive(Debug, FromRow)]
struct DrinkRow {
    id: i64,
    title: String,
    recipe: String,
}

impl TryFrom<DrinkRow> for Drink {
    type Error = sqlx::Error;

    fn try_from(row: DrinkRow) -> Result<Self, Self::Error> {
        let recipe = serde_json::from_str(&row.recipe)
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
        Ok(Drink {
            id: row.id,
            title: row.title,
            recipe,
        })
    }
}

fn encode_recipe(recipe: &[Ingredient]) -> Result<String, sqlx::Error> {
    serde_json::to_string(recipe)
        .map_err(|e| sqlx::Error::Protocol(format!("failed to encode recipe: {e}")))
}

/// Drink persistence backed by SQLite.
#[derive(Debug, Clone)]
pub struct DrinkRepository {
    pool: SqlitePool,
}

impl DrinkRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// All drinks, ordered by id.
    pub async fn list(&self) -> Result<Vec<Drink>, sqlx::Error> {
        sqlx::query_as::<_, DrinkRow>("SELECT id, title, recipe FROM drinks ORDER BY id")
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(Drink::try_from)
            .collect()
    }

    pub async fn get(&self, id: i64) -> Result<Option<Drink>, sqlx::Error> {
        sqlx::query_as::<_, DrinkRow>("SELECT id, title, recipe FROM drinks WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Drink::try_from)
            .transpose()
    }

    /// Insert a drink. Fails with a unique violation if the title is taken.
    pub async fn create(&self, title: &str, recipe: &[Ingredient]) -> Result<Drink, sqlx::Error> {
        let row = sqlx::query_as::<_, DrinkRow>(
            "INSERT INTO drinks (title, recipe) VALUES (?, ?) RETURNING id, title, recipe",
        )
        .bind(title)
        .bind(encode_recipe(recipe)?)
        .fetch_one(&self.pool)
        .await?;

        debug!(id = row.id, title = %row.title, "Drink created");
        Drink::try_from(row)
    }

    /// Apply `changes` to drink `id`. Returns `None` if there is no such drink.
    pub async fn update(
        &self,
        id: i64,
        changes: DrinkChanges,
    ) -> Result<Option<Drink>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let existing = sqlx::query_as::<_, DrinkRow>(
            "SELECT id, title, recipe FROM drinks WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(existing) = existing else {
            return Ok(None);
        };
        if changes.is_empty() {
            tx.commit().await?;
            return Drink::try_from(existing).map(Some);
        }

        let title = changes.title.unwrap_or(existing.title);
        let recipe = match changes.recipe {
            Some(recipe) => encode_recipe(&recipe.into_vec())?,
            None => existing.recipe,
        };

        let row = sqlx::query_as::<_, DrinkRow>(
            "UPDATE drinks SET title = ?, recipe = ? WHERE id = ? RETURNING id, title, recipe",
        )
        .bind(title)
        .bind(recipe)
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        debug!(id, "Drink updated");
        Drink::try_from(row).map(Some)
    }

    /// Delete drink `id`. Returns whether a drink was removed.
    pub async fn delete(&self, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM drinks WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Remove every drink and seed the default menu.
    pub async fn reset(&self) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM drinks").execute(&mut *tx).await?;
        for (title, recipe) in default_menu() {
            sqlx::query("INSERT INTO drinks (title, recipe) VALUES (?, ?)")
                .bind(title)
                .bind(encode_recipe(&recipe)?)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        info!("Drink menu reset to defaults");
        Ok(())
    }
}
