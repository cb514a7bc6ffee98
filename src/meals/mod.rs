pub mod detail;
pub mod dto;
pub mod manager;
pub mod model;
pub mod search;

pub use detail::DetailMode;
pub use manager::{load_meals, ListChange, MealListManager, MealTable, TableDisplay};
pub use model::{sample_meals, Meal, MealError};
pub use search::{filter, SearchScope, SearchState};
