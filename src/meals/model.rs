use bytes::Bytes;
use thiserror::Error;
use uuid::Uuid;

pub const MAX_RATING: u8 = 5;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MealError {
    #[error("meal name must not be empty")]
    EmptyName,
    #[error("meal rating {0} is outside 0..=5")]
    RatingOutOfRange(i32),
    #[error("meal photo is not valid base64")]
    PhotoEncoding,
}

/// A named, rated, optionally illustrated meal.
///
/// Fields are fixed at construction; an edit produces a replacement via
/// [`Meal::revise`], which keeps the identity of the original.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Meal {
    id: Uuid,
    name: String,
    photo: Option<Bytes>,
    rating: u8,
}

impl Meal {
    pub fn new(
        name: impl Into<String>,
        photo: Option<Bytes>,
        rating: i32,
    ) -> Result<Self, MealError> {
        Self::restore(Uuid::new_v4(), name, photo, rating)
    }

    /// Rebuild a meal with a known id, running the same checks as [`Meal::new`].
    pub(crate) fn restore(
        id: Uuid,
        name: impl Into<String>,
        photo: Option<Bytes>,
        rating: i32,
    ) -> Result<Self, MealError> {
        let name = name.into();
        if name.is_empty() {
            return Err(MealError::EmptyName);
        }
        let rating = u8::try_from(rating)
            .ok()
            .filter(|r| *r <= MAX_RATING)
            .ok_or(MealError::RatingOutOfRange(rating))?;
        Ok(Self {
            id,
            name,
            photo,
            rating,
        })
    }

    pub fn revise(
        &self,
        name: impl Into<String>,
        photo: Option<Bytes>,
        rating: i32,
    ) -> Result<Self, MealError> {
        Self::restore(self.id, name, photo, rating)
    }

    pub(crate) fn with_id(self, id: Uuid) -> Self {
        Self { id, ..self }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn photo(&self) -> Option<&Bytes> {
        self.photo.as_ref()
    }

    pub fn rating(&self) -> u8 {
        self.rating
    }
}

/// Meals shown when nothing has been saved yet.
pub fn sample_meals() -> Vec<Meal> {
    [
        ("Caprese Salad", 4),
        ("Chicken and Potatoes", 5),
        ("Pasta with Meatballs", 3),
    ]
    .into_iter()
    .filter_map(|(name, rating)| Meal::new(name, None, rating).ok())
    .collect()
}
