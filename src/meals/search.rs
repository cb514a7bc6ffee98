use std::fmt;
use std::str::FromStr;

use crate::meals::model::Meal;

/// Field a search term is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchScope {
    #[default]
    Name,
    Rating,
}

impl SearchScope {
    pub const ALL: [SearchScope; 2] = [SearchScope::Name, SearchScope::Rating];

    /// Scope for a segment index of the scope selector.
    ///
    /// Panics on any other index: the selector only ever offers `ALL`.
    pub fn from_index(index: usize) -> Self {
        match index {
            0 => SearchScope::Name,
            1 => SearchScope::Rating,
            _ => panic!("unknown search scope index {index}"),
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            SearchScope::Name => "Name",
            SearchScope::Rating => "Rating",
        }
    }

    /// Whether `meal` matches `text` in this scope.
    ///
    /// Name: case-insensitive substring. Rating: exact match against the
    /// decimal rating, so "1" never matches a rating of 10.
    pub fn matches(self, meal: &Meal, text: &str) -> bool {
        match self {
            SearchScope::Name => name_matches(meal.name(), text),
            SearchScope::Rating => rating_matches(meal.rating(), text),
        }
    }
}

impl fmt::Display for SearchScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

impl FromStr for SearchScope {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SearchScope::ALL
            .into_iter()
            .find(|scope| scope.title() == s)
            .ok_or_else(|| anyhow::anyhow!("unknown search scope {s:?}"))
    }
}

fn name_matches(name: &str, text: &str) -> bool {
    name.to_lowercase().contains(&text.to_lowercase())
}

fn rating_matches(rating: u8, text: &str) -> bool {
    rating.to_string() == text
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
    pub active: bool,
    pub text: String,
    pub scope: SearchScope,
}

impl SearchState {
    pub fn is_filtering(&self) -> bool {
        self.active && !self.text.is_empty()
    }

    pub fn matches(&self, meal: &Meal) -> bool {
        self.scope.matches(meal, &self.text)
    }
}

/// Meals matching `text` in `scope`, in list order. Empty text keeps everything.
pub fn filter(meals: &[Meal], text: &str, scope: SearchScope) -> Vec<Meal> {
    if text.is_empty() {
        return meals.to_vec();
    }
    meals
        .iter()
        .filter(|meal| scope.matches(meal, text))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meals::model::sample_meals;

    fn names(meals: &[Meal]) -> Vec<&str> {
        meals.iter().map(Meal::name).collect()
    }

    #[test]
    fn empty_text_returns_full_list() {
        let meals = sample_meals();
        for scope in SearchScope::ALL {
            assert_eq!(filter(&meals, "", scope), meals);
        }
    }

    #[test]
    fn name_scope_is_case_insensitive_substring() {
        let meals = sample_meals();
        assert_eq!(
            names(&filter(&meals, "pasta", SearchScope::Name)),
            vec!["Pasta with Meatballs"]
        );
        assert_eq!(
            names(&filter(&meals, "AND", SearchScope::Name)),
            vec!["Chicken and Potatoes"]
        );
        assert!(filter(&meals, "sushi", SearchScope::Name).is_empty());
    }

    #[test]
    fn rating_scope_is_exact_match() {
        let meals = sample_meals();
        assert_eq!(
            names(&filter(&meals, "5", SearchScope::Rating)),
            vec!["Chicken and Potatoes"]
        );
        assert!(filter(&meals, "45", SearchScope::Rating).is_empty());
        assert!(filter(&meals, " 5", SearchScope::Rating).is_empty());
    }

    #[test]
    fn rating_match_does_not_fall_back_to_substring() {
        assert!(rating_matches(1, "1"));
        assert!(!rating_matches(10, "1"));
        assert!(!rating_matches(15, "5"));
        assert!(rating_matches(15, "15"));
    }

    #[test]
    fn filter_preserves_list_order() {
        let meals = vec![
            Meal::new("Beef Stew", None, 2).unwrap(),
            Meal::new("Apple Pie", None, 5).unwrap(),
            Meal::new("Beet Salad", None, 1).unwrap(),
        ];
        assert_eq!(
            names(&filter(&meals, "be", SearchScope::Name)),
            vec!["Beef Stew", "Beet Salad"]
        );
    }

    #[test]
    fn is_filtering_requires_active_and_text() {
        let mut state = SearchState::default();
        assert!(!state.is_filtering());
        state.text = "pie".into();
        assert!(!state.is_filtering());
        state.active = true;
        assert!(state.is_filtering());
        state.text.clear();
        assert!(!state.is_filtering());
    }

    #[test]
    fn scope_titles_parse_back() {
        for scope in SearchScope::ALL {
            assert_eq!(scope.title().parse::<SearchScope>().unwrap(), scope);
        }
        assert!("Calories".parse::<SearchScope>().is_err());
    }

    #[test]
    fn scope_from_index_matches_selector_order() {
        assert_eq!(SearchScope::from_index(0), SearchScope::Name);
        assert_eq!(SearchScope::from_index(1), SearchScope::Rating);
    }

    #[test]
    #[should_panic(expected = "unknown search scope index 2")]
    fn scope_from_unknown_index_panics() {
        SearchScope::from_index(2);
    }
}
