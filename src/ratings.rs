use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::matcher::{clean_item, display_name};

pub const POPULAR_DISHES: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RatingKey {
    pub dish: String,
    pub mess: String,
    pub day: String,
    pub meal: String,
}

impl RatingKey {
    pub fn new(dish: &str, mess: &str, day: &str, meal: &str) -> Self {
        Self {
            dish: clean_item(dish),
            mess: mess.to_lowercase(),
            day: day.to_lowercase(),
            meal: meal.to_lowercase(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DishRating {
    pub average: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PopularDish {
    pub dish: String,
    pub rating: DishRating,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RatingStats {
    pub total_ratings: usize,
    pub rated_dishes: usize,
    pub popular: Vec<PopularDish>,
}

#[async_trait]
pub trait RatingService: Send + Sync {
    async fn add_rating(&self, key: RatingKey, stars: u8) -> anyhow::Result<DishRating>;
    async fn get_rating(&self, key: &RatingKey) -> Option<DishRating>;
    async fn get_stats(&self) -> RatingStats;
}

#[derive(Debug, Default)]
pub struct InMemoryRatingService {
    ratings: RwLock<HashMap<RatingKey, Vec<u8>>>,
    display_names: RwLock<HashMap<String, String>>,
}

impl InMemoryRatingService {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RatingService for InMemoryRatingService {
    async fn add_rating(&self, key: RatingKey, stars: u8) -> anyhow::Result<DishRating> {
        anyhow::ensure!(
            (1..=5).contains(&stars),
            "Rating must be between 1 and 5 stars. [stars = {stars}]"
        );

        self.display_names
            .write()
            .await
            .entry(key.dish.clone())
            .or_insert_with(|| title_case(&display_name(&key.dish)));

        let mut ratings = self.ratings.write().await;
        let entry = ratings.entry(key).or_default();
        entry.push(stars);

        Ok(summarize(entry))
    }

    async fn get_rating(&self, key: &RatingKey) -> Option<DishRating> {
        let ratings = self.ratings.read().await;
        ratings
            .get(key)
            .filter(|stars| !stars.is_empty())
            .map(|stars| summarize(stars))
    }

    async fn get_stats(&self) -> RatingStats {
        let ratings = self.ratings.read().await;
        let display_names = self.display_names.read().await;

        let mut per_dish = HashMap::<&str, Vec<u8>>::new();
        for (key, stars) in ratings.iter() {
            per_dish
                .entry(key.dish.as_str())
                .or_default()
                .extend(stars);
        }

        let mut popular: Vec<PopularDish> = per_dish
            .iter()
            .map(|(dish, stars)| PopularDish {
                dish: display_names
                    .get(*dish)
                    .cloned()
                    .unwrap_or_else(|| dish.to_string()),
                rating: summarize(stars),
            })
            .collect();

        popular.sort_by(|a, b| {
            b.rating
                .average
                .total_cmp(&a.rating.average)
                .then(b.rating.count.cmp(&a.rating.count))
                .then(a.dish.cmp(&b.dish))
        });
        popular.truncate(POPULAR_DISHES);

        RatingStats {
            total_ratings: ratings.values().map(Vec::len).sum(),
            rated_dishes: per_dish.len(),
            popular,
        }
    }
}

fn summarize(stars: &[u8]) -> DishRating {
    let count = stars.len();
    let total: u32 = stars.iter().map(|s| *s as u32).sum();
    let average = if count == 0 {
        0.0
    } else {
        (total as f64 / count as f64 * 10.0).round() / 10.0
    };

    DishRating { average, count }
}

fn title_case(name: &str) -> String {
    name.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
