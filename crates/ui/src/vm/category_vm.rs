use trivia_core::model::{Category, CategoryId};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryCardVm {
    pub id: CategoryId,
    pub title: String,
    pub subtitle: String,
}

#[must_use]
pub fn map_category_cards(categories: &[Category]) -> Vec<CategoryCardVm> {
    categories
        .iter()
        .map(|category| CategoryCardVm {
            id: category.id(),
            title: category.display_name().to_string(),
            subtitle: category.name().to_string(),
        })
        .collect()
}

/// Case-insensitive substring match on the display name. A blank query keeps everything.
#[must_use]
pub fn filter_categories(cards: &[CategoryCardVm], query: &str) -> Vec<CategoryCardVm> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return cards.to_vec();
    }
    cards
        .iter()
        .filter(|card| card.title.to_lowercase().contains(&query))
        .cloned()
        .collect()
}
