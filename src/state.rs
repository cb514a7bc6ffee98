use crate::config::{AppConfig, LogConfig};
use crate::storage::{FileStore, MealStore, MemoryStore};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn MealStore>,
}

impl AppState {
    pub fn from_config(config: Arc<AppConfig>) -> Self {
        let store = Arc::new(FileStore::new(&config.store_path)) as Arc<dyn MealStore>;
        Self { config, store }
    }

    pub fn from_parts(config: Arc<AppConfig>, store: Arc<dyn MealStore>) -> Self {
        Self { config, store }
    }

    pub fn fake() -> Self {
        let config = Arc::new(AppConfig {
            store_path: "fake/meals.json".into(),
            log: LogConfig {
                filter: "meallist=debug".into(),
                json: false,
            },
        });
        let store = Arc::new(MemoryStore::new()) as Arc<dyn MealStore>;
        Self { config, store }
    }
}
