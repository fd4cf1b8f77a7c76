use std::path::Path;

use anyhow::{Context, Result};
use foodgram_recipe::NewIngredient;

/// Imports the ingredient catalogue from a JSON array of
/// `{"name": ..., "measurement_unit": ...}` objects.
pub async fn load_ingredients(config: crate::config::Config, file: &Path) -> Result<()> {
    let content = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("failed to read {}", file.display()))?;

    let items: Vec<NewIngredient> = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse {}", file.display()))?;
    let total = items.len();

    let pool = crate::db::create_pool(&config.database.url, 1).await?;
    let command = foodgram_recipe::Command::new(foodgram_shared::State::single(pool.clone()));
    let imported = command.import_ingredients(items).await?;
    pool.close().await;

    tracing::info!(total, imported, "ingredients loaded");

    Ok(())
}
