use meallist::config::AppConfig;
use meallist::meals::{MealListManager, MealTable};
use meallist::state::AppState;
use std::sync::Arc;

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Arc::new(AppConfig::from_env()?);

    if config.log.json {
        tracing_subscriber::fmt()
            .with_env_filter(config.log.filter.as_str())
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(config.log.filter.as_str())
            .init();
    }

    let state = AppState::from_config(config);
    tracing::info!(store = %state.config.store_path.display(), "opening meal store");

    let manager = MealListManager::from_state(&state);
    for row in 0..manager.row_count() {
        let meal = manager.row_at(row);
        tracing::info!(row, name = %meal.name(), rating = meal.rating(), "meal");
    }

    Ok(())
}
