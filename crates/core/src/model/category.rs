use serde::{Deserialize, Serialize};

use crate::model::ids::CategoryId;

/// Category ids shown in the category browser, in display order.
pub const FEATURED_CATEGORY_IDS: [u32; 12] = [9, 10, 11, 12, 14, 15, 17, 18, 21, 22, 23, 27];

const BUILTIN_NAMES: [(u32, &str); 12] = [
    (9, "General Knowledge"),
    (10, "Entertainment: Books"),
    (11, "Entertainment: Film"),
    (12, "Entertainment: Music"),
    (14, "Entertainment: Television"),
    (15, "Entertainment: Video Games"),
    (17, "Science & Nature"),
    (18, "Science: Computers"),
    (21, "Sports"),
    (22, "Geography"),
    (23, "History"),
    (27, "Animals"),
];

const DISPLAY_PREFIXES: [&str; 2] = ["Entertainment: ", "Science: "];

/// A trivia category as listed by the question provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    id: CategoryId,
    name: String,
    display_name: String,
}

impl Category {
    #[must_use]
    pub fn new(id: CategoryId, name: impl Into<String>) -> Self {
        let name = name.into();
        let display_name = display_name_for(&name);
        Self {
            id,
            name,
            display_name,
        }
    }

    #[must_use]
    pub fn id(&self) -> CategoryId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Provider name with the grouping prefix removed ("Entertainment: Film" -> "Film").
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    #[must_use]
    pub fn is_featured(&self) -> bool {
        is_featured(self.id)
    }
}

#[must_use]
pub fn is_featured(id: CategoryId) -> bool {
    FEATURED_CATEGORY_IDS.contains(&id.value())
}

/// Keep featured categories only and order them by provider id.
#[must_use]
pub fn featured_categories(categories: impl IntoIterator<Item = Category>) -> Vec<Category> {
    let mut featured: Vec<Category> = categories
        .into_iter()
        .filter(Category::is_featured)
        .collect();
    featured.sort_by_key(Category::id);
    featured.dedup_by_key(|category| category.id());
    featured
}

/// Featured categories with their provider names, for use without the network.
#[must_use]
pub fn builtin_categories() -> Vec<Category> {
    BUILTIN_NAMES
        .iter()
        .map(|(id, name)| Category::new(CategoryId::new(*id), *name))
        .collect()
}

fn display_name_for(name: &str) -> String {
    let trimmed = name.trim();
    DISPLAY_PREFIXES
        .iter()
        .find_map(|prefix| trimmed.strip_prefix(prefix))
        .unwrap_or(trimmed)
        .to_string()
}
