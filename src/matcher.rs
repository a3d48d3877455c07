/// Emphasis marker the menu uses for featured items, e.g. `**Paneer Tikka**`.
pub const FEATURED_MARKER: &str = "**";

/// Substring match on purpose: "eggplant" counts as non-veg.
pub const NON_VEG_KEYWORDS: [&str; 13] = [
    "chicken", "mutton", "fish", "egg", "meat", "prawn", "crab", "beef", "pork", "lamb", "turkey",
    "duck", "seafood",
];

pub const DEFAULT_EMOJI: &str = "🍽️";

const FOOD_EMOJIS: &[(&str, &str)] = &[
    ("biryani", "🍛"),
    ("pulao", "🍛"),
    ("chicken", "🍗"),
    ("mutton", "🍖"),
    ("fish", "🐟"),
    ("prawn", "🦐"),
    ("egg", "🥚"),
    ("omelette", "🍳"),
    ("paneer", "🧀"),
    ("dosa", "🥞"),
    ("idli", "🍚"),
    ("poori", "🫓"),
    ("chapathi", "🫓"),
    ("roti", "🫓"),
    ("paratha", "🫓"),
    ("naan", "🫓"),
    ("noodles", "🍜"),
    ("pasta", "🍝"),
    ("sambar", "🥣"),
    ("rasam", "🥣"),
    ("soup", "🥣"),
    ("dal", "🥘"),
    ("curry", "🍲"),
    ("curd", "🥛"),
    ("milk", "🥛"),
    ("coffee", "☕"),
    ("tea", "🍵"),
    ("banana", "🍌"),
    ("fruit", "🍎"),
    ("salad", "🥗"),
    ("ice cream", "🍨"),
    ("sweet", "🍮"),
    ("bread", "🍞"),
    ("rice", "🍚"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DietaryTag {
    Veg,
    NonVeg,
}

/// Removes featured markers, turns `/` into a space, collapses whitespace
/// and lowercases.
pub fn clean_item(item: &str) -> String {
    item.replace(FEATURED_MARKER, "")
        .replace('/', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Display form of an item: markers removed, casing kept.
pub fn display_name(item: &str) -> String {
    item.replace(FEATURED_MARKER, "").trim().to_string()
}

pub fn is_featured(item: &str) -> bool {
    item.contains(FEATURED_MARKER)
}

pub fn classify_diet(item: &str) -> DietaryTag {
    let cleaned = clean_item(item);
    if NON_VEG_KEYWORDS
        .iter()
        .any(|keyword| cleaned.contains(keyword))
    {
        DietaryTag::NonVeg
    } else {
        DietaryTag::Veg
    }
}

pub fn is_favorite<S: AsRef<str>>(item: &str, favorites: &[S]) -> bool {
    find_favorite(item, favorites).is_some()
}

/// Returns the stored favorite that matches `item`, or `item` itself when
/// there is none. Toggling with the stored variant avoids near-duplicates.
pub fn matching_favorite_for<'a, S: AsRef<str>>(item: &'a str, favorites: &'a [S]) -> &'a str {
    find_favorite(item, favorites).unwrap_or(item)
}

fn find_favorite<'a, S: AsRef<str>>(item: &str, favorites: &'a [S]) -> Option<&'a str> {
    if let Some(exact) = favorites.iter().find(|f| f.as_ref() == item) {
        return Some(exact.as_ref());
    }

    let cleaned = clean_item(item);
    if cleaned.is_empty() {
        return None;
    }

    favorites
        .iter()
        .map(|favorite| favorite.as_ref())
        .find(|favorite| fuzzy_eq(&cleaned, &clean_item(favorite)))
}

fn fuzzy_eq(left: &str, right: &str) -> bool {
    !right.is_empty() && (left.contains(right) || right.contains(left))
}

pub fn food_emoji(item: &str) -> &'static str {
    let cleaned = clean_item(item);
    if cleaned.is_empty() {
        return DEFAULT_EMOJI;
    }

    FOOD_EMOJIS
        .iter()
        .find(|(key, _)| cleaned.contains(key) || key.contains(cleaned.as_str()))
        .map(|(_, emoji)| *emoji)
        .unwrap_or(DEFAULT_EMOJI)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FavoriteSet {
    items: Vec<String>,
}

impl FavoriteSet {
    pub fn new(items: Vec<String>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, item: &str) -> bool {
        is_favorite(item, &self.items)
    }

    /// Returns `true` if the item is a favorite after the call.
    pub fn toggle(&mut self, item: &str) -> bool {
        let target = matching_favorite_for(item, &self.items).to_string();
        if let Some(position) = self.items.iter().position(|f| *f == target) {
            self.items.remove(position);
            false
        } else {
            self.items.push(target);
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_item_strips_noise() {
        assert_eq!(clean_item("  **Paneer   Butter Masala** "), "paneer butter masala");
        assert_eq!(clean_item("Idli/Vada"), "idli vada");
        assert_eq!(display_name("**Veg Pulao**"), "Veg Pulao");
        assert!(is_featured("**Veg Pulao**"));
        assert!(!is_featured("Veg Pulao"));
    }

    #[test]
    fn non_veg_keywords_mark_items() {
        assert_eq!(classify_diet("Chicken Biryani"), DietaryTag::NonVeg);
        assert_eq!(classify_diet("Egg Curry"), DietaryTag::NonVeg);
        assert_eq!(classify_diet("**FISH FRY**"), DietaryTag::NonVeg);
        assert_eq!(classify_diet("Veg Pulao"), DietaryTag::Veg);
        assert_eq!(classify_diet(""), DietaryTag::Veg);
    }

    #[test]
    fn substring_matching_is_permissive() {
        assert_eq!(classify_diet("Eggplant Fry"), DietaryTag::NonVeg);
    }

    #[test]
    fn favorite_matches_through_markers_and_case() {
        assert!(is_favorite("**Paneer Butter Masala**", &["paneer butter masala"]));
        assert!(is_favorite("Paneer Butter Masala", &["Paneer Butter Masala"]));
        assert!(!is_favorite("Aloo Gobi", &["paneer butter masala"]));
    }

    #[test]
    fn favorite_matches_by_containment_either_way() {
        assert!(is_favorite("Paneer Butter Masala (Spicy)", &["paneer butter masala"]));
        assert!(is_favorite("Paneer", &["Paneer Butter Masala"]));
    }

    #[test]
    fn blank_items_never_match() {
        assert!(!is_favorite("  ", &["Paneer"]));
        assert!(!is_favorite("Paneer", &["****"]));
    }

    #[test]
    fn matching_favorite_returns_stored_variant() {
        let favorites = vec!["**paneer butter masala**".to_string()];

        assert_eq!(
            matching_favorite_for("Paneer Butter Masala", &favorites),
            "**paneer butter masala**"
        );
        assert_eq!(matching_favorite_for("Rasam", &favorites), "Rasam");
    }

    #[test]
    fn toggle_removes_stored_variant_instead_of_adding_duplicate() {
        let mut favorites = FavoriteSet::new(vec!["**Paneer Butter Masala**".to_string()]);

        let now_favorite = favorites.toggle("paneer butter masala");

        assert!(!now_favorite);
        assert!(favorites.is_empty());

        assert!(favorites.toggle("Veg Pulao"));
        assert!(favorites.contains("**VEG PULAO**"));
        assert_eq!(favorites.items(), ["Veg Pulao"]);
    }

    #[test]
    fn emoji_lookup_uses_keywords() {
        assert_eq!(food_emoji("**Chicken Biryani**"), "🍛");
        assert_eq!(food_emoji("Masala Dosa"), "🥞");
        assert_eq!(food_emoji("Gulab Jamun"), DEFAULT_EMOJI);
        assert_eq!(food_emoji(""), DEFAULT_EMOJI);
    }
}
