use std::{collections::BTreeMap, path::Path};

use anyhow::Context;
use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::{
    matcher::{self, DietaryTag, FavoriteSet},
    schedule::day_key,
};

pub const MAX_SEARCH_RESULTS: usize = 10;

type MealMenu = BTreeMap<String, Vec<String>>;
type DayMenu = BTreeMap<String, MealMenu>;

/// `mess -> day -> meal -> items`, as published in the menu JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MenuData(BTreeMap<String, DayMenu>);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuStats {
    pub total_items: usize,
    pub veg_items: usize,
    pub non_veg_items: usize,
    pub favorites_count: usize,
    pub most_common_item: Option<String>,
    pub most_common_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub item: String,
    pub day: String,
    pub meal: String,
    pub emoji: &'static str,
}

impl MenuData {
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let menu = serde_json::from_str(json)?;
        Ok(menu)
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read menu file {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("Invalid menu file {}", path.display()))
    }

    pub fn messes(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Items of one meal; empty when the mess, day or meal is unknown.
    pub fn items_for(&self, mess: &str, weekday: Weekday, meal_key: &str) -> &[String] {
        self.0
            .get(mess)
            .and_then(|days| days.get(day_key(weekday)))
            .and_then(|meals| meals.get(&meal_key.to_lowercase()))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn stats(&self, mess: &str, favorites: &FavoriteSet) -> MenuStats {
        let mut stats = MenuStats {
            total_items: 0,
            veg_items: 0,
            non_veg_items: 0,
            favorites_count: favorites.len(),
            most_common_item: None,
            most_common_count: 0,
        };
        let mut frequency = BTreeMap::<String, usize>::new();

        for item in self.all_items(mess).map(|(_, _, item)| item) {
            stats.total_items += 1;
            match matcher::classify_diet(item) {
                DietaryTag::Veg => stats.veg_items += 1,
                DietaryTag::NonVeg => stats.non_veg_items += 1,
            }
            *frequency.entry(matcher::clean_item(item)).or_default() += 1;
        }

        // BTreeMap iterates in name order, so ties go to the smallest name.
        let mut best: Option<(String, usize)> = None;
        for (name, count) in frequency {
            if best.as_ref().is_none_or(|(_, best_count)| count > *best_count) {
                best = Some((name, count));
            }
        }
        if let Some((name, count)) = best {
            stats.most_common_item = Some(name);
            stats.most_common_count = count;
        }

        stats
    }

    /// Case-insensitive substring search over every meal of a mess.
    pub fn search(&self, mess: &str, term: &str) -> Vec<SearchHit> {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return vec![];
        }

        self.all_items(mess)
            .filter(|(_, _, item)| item.to_lowercase().contains(&term))
            .take(MAX_SEARCH_RESULTS)
            .map(|(day, meal, item)| SearchHit {
                item: item.to_string(),
                day: capitalize(day),
                meal: capitalize(meal),
                emoji: matcher::food_emoji(item),
            })
            .collect()
    }

    fn all_items<'a>(&'a self, mess: &str) -> impl Iterator<Item = (&'a str, &'a str, &'a str)> {
        self.0.get(mess).into_iter().flat_map(|days| {
            days.iter().flat_map(|(day, meals)| {
                meals.iter().flat_map(move |(meal, items)| {
                    items
                        .iter()
                        .map(move |item| (day.as_str(), meal.as_str(), item.as_str()))
                })
            })
        })
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MENU: &str = r#"{
        "mess1": {
            "monday": {
                "breakfast": ["Idli", "Sambar", "Tea"],
                "lunch": ["Rice", "**Chicken Curry**", "Dal"],
                "dinner": ["Chapathi", "Paneer Butter Masala", "Rice"]
            },
            "tuesday": {
                "breakfast": ["Masala Dosa", "Tea"],
                "lunch": ["Rice", "Egg Curry", "Dal"]
            }
        },
        "mess2": {
            "monday": { "lunch": ["Veg Pulao"] }
        }
    }"#;

    fn menu() -> MenuData {
        MenuData::from_json(MENU).unwrap()
    }

    #[test]
    fn items_are_looked_up_by_weekday_and_meal() {
        let menu = menu();

        assert_eq!(
            menu.items_for("mess1", Weekday::Mon, "Lunch"),
            ["Rice", "**Chicken Curry**", "Dal"]
        );
        assert!(menu.items_for("mess1", Weekday::Sun, "lunch").is_empty());
        assert!(menu.items_for("mess3", Weekday::Mon, "lunch").is_empty());
        assert!(menu.items_for("mess1", Weekday::Mon, "snacks").is_empty());
    }

    #[test]
    fn messes_are_listed() {
        assert_eq!(menu().messes().collect::<Vec<_>>(), ["mess1", "mess2"]);
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(MenuData::from_json("{\"mess1\": []}").is_err());
        assert!(MenuData::load("does/not/exist.json").is_err());
    }

    #[test]
    fn stats_count_diet_and_frequency() {
        let favorites = FavoriteSet::new(vec!["Idli".to_string()]);

        let stats = menu().stats("mess1", &favorites);

        assert_eq!(stats.total_items, 14);
        assert_eq!(stats.non_veg_items, 2);
        assert_eq!(stats.veg_items, 12);
        assert_eq!(stats.favorites_count, 1);
        assert_eq!(stats.most_common_item.as_deref(), Some("rice"));
        assert_eq!(stats.most_common_count, 3);
    }

    #[test]
    fn stats_for_unknown_mess_are_empty() {
        let stats = menu().stats("nowhere", &FavoriteSet::default());

        assert_eq!(stats.total_items, 0);
        assert_eq!(stats.most_common_item, None);
    }

    #[test]
    fn search_is_case_insensitive_and_capitalizes() {
        let hits = menu().search("mess1", "CURRY");

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].item, "**Chicken Curry**");
        assert_eq!(hits[0].day, "Monday");
        assert_eq!(hits[0].meal, "Lunch");
        assert_eq!(hits[0].emoji, "🍗");
        assert_eq!(hits[1].day, "Tuesday");
    }

    #[test]
    fn search_caps_results_and_ignores_blank_terms() {
        let items: Vec<String> = (0..12).map(|i| format!("Rice {i}")).collect();
        let json = serde_json::json!({ "mess1": { "monday": { "lunch": items } } }).to_string();
        let menu = MenuData::from_json(&json).unwrap();

        assert!(menu.search("mess1", "   ").is_empty());
        assert_eq!(menu.search("mess1", "rice").len(), MAX_SEARCH_RESULTS);
    }
}
