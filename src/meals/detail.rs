use crate::meals::manager::{ListChange, MealListManager, MealTable};
use crate::meals::model::Meal;
use tracing::warn;

/// What the detail screen is opened for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailMode {
    Adding,
    Editing { row: usize, meal: Meal },
}

impl DetailMode {
    pub fn is_new(&self) -> bool {
        matches!(self, DetailMode::Adding)
    }

    pub fn title(&self) -> &str {
        match self {
            DetailMode::Adding => "New Meal",
            DetailMode::Editing { meal, .. } => meal.name(),
        }
    }

    pub fn meal(&self) -> Option<&Meal> {
        match self {
            DetailMode::Adding => None,
            DetailMode::Editing { meal, .. } => Some(meal),
        }
    }
}

impl MealListManager {
    /// Detail context for a visible row, or for a new meal when `row` is `None`.
    pub fn open_detail(&self, row: Option<usize>) -> DetailMode {
        match row {
            Some(row) => DetailMode::Editing {
                row,
                meal: self.row_at(row).clone(),
            },
            None => DetailMode::Adding,
        }
    }

    /// Hand the meal produced by the detail screen back to the list.
    ///
    /// An edit whose row no longer shows the meal it was opened for is
    /// re-resolved by id; if that meal is gone the edit is dropped.
    pub fn complete_detail(&mut self, mode: DetailMode, meal: Meal) -> ListChange {
        let row = match mode {
            DetailMode::Adding => None,
            DetailMode::Editing { row, meal: opened } => {
                let current = self.visible().get(row).map(Meal::id);
                if current == Some(opened.id()) {
                    Some(row)
                } else {
                    match self.visible().iter().position(|m| m.id() == opened.id()) {
                        Some(moved) => {
                            warn!(row, moved, "edited meal moved since detail opened");
                            Some(moved)
                        }
                        None => {
                            warn!(row, id = %opened.id(), "edited meal no longer visible; edit dropped");
                            return ListChange::Unchanged;
                        }
                    }
                }
            }
        };
        self.upsert(meal, row)
    }
}
