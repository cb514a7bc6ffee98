use std::sync::Arc;

use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::meals::model::{sample_meals, Meal};
use crate::meals::search::{filter, SearchScope, SearchState};
use crate::state::AppState;
use crate::storage::MealStore;

/// Row-level change to the visible list, reported after each mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListChange {
    Inserted(usize),
    Deleted(usize),
    Reloaded(usize),
    ReloadAll,
    Unchanged,
}

/// Read side of the list as a display sees it.
pub trait MealTable {
    fn row_count(&self) -> usize;
    fn row_at(&self, row: usize) -> &Meal;
}

/// Implemented by whatever draws the list.
pub trait TableDisplay {
    fn apply(&mut self, change: ListChange);
}

/// Read the stored list, falling back to the sample meals when the store is
/// empty or unreadable.
pub fn load_meals(store: &dyn MealStore) -> Vec<Meal> {
    match store.read_all() {
        Ok(Some(meals)) => {
            info!(count = meals.len(), "meals loaded");
            meals
        }
        Ok(None) => {
            info!("no saved meals, using samples");
            sample_meals()
        }
        Err(e) => {
            warn!(error = %e, "saved meals unreadable, using samples");
            sample_meals()
        }
    }
}

pub struct MealListManager {
    store: Arc<dyn MealStore>,
    meals: Vec<Meal>,
    filtered: Vec<Meal>,
    search: SearchState,
}

impl MealListManager {
    pub fn load(store: Arc<dyn MealStore>) -> Self {
        let meals = load_meals(store.as_ref());
        let mut manager = Self {
            store,
            meals,
            filtered: Vec::new(),
            search: SearchState::default(),
        };
        manager.refilter();
        manager
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::load(Arc::clone(&state.store))
    }

    /// Full list, regardless of search state.
    pub fn meals(&self) -> &[Meal] {
        &self.meals
    }

    pub fn filtered(&self) -> &[Meal] {
        &self.filtered
    }

    pub fn search(&self) -> &SearchState {
        &self.search
    }

    pub fn is_filtering(&self) -> bool {
        self.search.is_filtering()
    }

    /// The list rows refer to: filtered while filtering, full otherwise.
    pub fn visible(&self) -> &[Meal] {
        if self.is_filtering() {
            &self.filtered
        } else {
            &self.meals
        }
    }

    pub fn set_search_active(&mut self, active: bool) -> ListChange {
        self.search.active = active;
        if !active {
            self.search.text.clear();
        }
        self.refilter();
        ListChange::ReloadAll
    }

    pub fn update_search(&mut self, text: impl Into<String>, scope: SearchScope) -> ListChange {
        self.search.text = text.into();
        self.search.scope = scope;
        self.refilter();
        debug!(
            text = %self.search.text,
            scope = %scope,
            matches = self.filtered.len(),
            "search updated"
        );
        ListChange::ReloadAll
    }

    #[instrument(skip(self), fields(filtering = self.is_filtering()))]
    pub fn delete(&mut self, row: usize) -> ListChange {
        let change = match self.main_position(row) {
            Some(pos) => {
                let removed = self.meals.remove(pos);
                debug!(name = %removed.name(), "meal deleted");
                self.refilter();
                ListChange::Deleted(row)
            }
            None => ListChange::Unchanged,
        };
        self.save();
        change
    }

    /// Replace the meal at visible `row`, or append when `row` is `None`.
    #[instrument(skip(self, meal), fields(name = %meal.name(), filtering = self.is_filtering()))]
    pub fn upsert(&mut self, meal: Meal, row: Option<usize>) -> ListChange {
        let change = match row {
            Some(row) => self.replace(row, meal),
            None => self.append(meal),
        };
        self.save();
        change
    }

    pub fn save(&self) {
        match self.store.write_all(&self.meals) {
            Ok(()) => info!(count = self.meals.len(), "meals saved"),
            Err(e) => error!(error = %e, "failed to save meals"),
        }
    }

    fn replace(&mut self, row: usize, meal: Meal) -> ListChange {
        let Some(pos) = self.main_position(row) else {
            return ListChange::Unchanged;
        };
        // the replacement takes over the identity of the meal it replaces
        let meal = meal.with_id(self.meals[pos].id());
        let still_visible = !self.is_filtering() || self.search.matches(&meal);
        self.meals[pos] = meal;
        self.refilter();
        if still_visible {
            ListChange::Reloaded(row)
        } else {
            ListChange::Deleted(row)
        }
    }

    fn append(&mut self, meal: Meal) -> ListChange {
        let meal = if self.position_of(meal.id()).is_some() {
            debug!(id = %meal.id(), "added meal reuses an id in the list; assigning a new one");
            meal.with_id(Uuid::new_v4())
        } else {
            meal
        };
        let shown = !self.is_filtering() || self.search.matches(&meal);
        self.meals.push(meal);
        self.refilter();
        match (shown, self.is_filtering()) {
            (false, _) => ListChange::Unchanged,
            (true, true) => ListChange::Inserted(self.filtered.len() - 1),
            (true, false) => ListChange::Inserted(self.meals.len() - 1),
        }
    }

    /// Index into the full list for a visible row.
    ///
    /// Unfiltered rows are positions in the full list; filtered rows are
    /// resolved through the meal id. Panics when `row` is not visible.
    fn main_position(&self, row: usize) -> Option<usize> {
        let id = self.row_at(row).id();
        if !self.is_filtering() {
            return Some(row);
        }
        let pos = self.position_of(id);
        if pos.is_none() {
            warn!(%id, "visible meal missing from list");
        }
        pos
    }

    fn position_of(&self, id: Uuid) -> Option<usize> {
        self.meals.iter().position(|m| m.id() == id)
    }

    fn refilter(&mut self) {
        self.filtered = filter(&self.meals, &self.search.text, self.search.scope);
    }
}

impl MealTable for MealListManager {
    fn row_count(&self) -> usize {
        self.visible().len()
    }

    fn row_at(&self, row: usize) -> &Meal {
        let visible = self.visible();
        visible
            .get(row)
            .unwrap_or_else(|| panic!("row {row} out of range for {} meals", visible.len()))
    }
}
