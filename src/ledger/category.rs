use std::{collections::HashMap, fmt};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Closed set of categories used to classify ledger activity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Food,
    Housing,
    Transport,
    Leisure,
    Health,
    FixedBills,
    Investments,
    Income,
    Other,
}

static NAME_LOOKUP: Lazy<HashMap<String, Category>> = Lazy::new(|| {
    let mut map = HashMap::new();
    for category in Category::ALL {
        map.insert(category.name().to_lowercase(), category);
    }
    // Names written by earlier versions of the data files.
    for (legacy, category) in [
        ("alimentação", Category::Food),
        ("moradia", Category::Housing),
        ("transporte", Category::Transport),
        ("lazer", Category::Leisure),
        ("saúde", Category::Health),
        ("contas fixas", Category::FixedBills),
        ("investimentos", Category::Investments),
        ("renda", Category::Income),
        ("outros", Category::Other),
    ] {
        map.insert(legacy.to_string(), category);
    }
    map
});

impl Category {
    /// Every category in display order.
    pub const ALL: [Category; 9] = [
        Category::Food,
        Category::Housing,
        Category::Transport,
        Category::Leisure,
        Category::Health,
        Category::FixedBills,
        Category::Investments,
        Category::Income,
        Category::Other,
    ];

    /// Display name, also the persisted representation.
    pub fn name(self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Housing => "Housing",
            Category::Transport => "Transport",
            Category::Leisure => "Leisure",
            Category::Health => "Health",
            Category::FixedBills => "Fixed Bills",
            Category::Investments => "Investments",
            Category::Income => "Income",
            Category::Other => "Other",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Category::Food => "🍔",
            Category::Housing => "🏠",
            Category::Transport => "🚗",
            Category::Leisure => "🎮",
            Category::Health => "💊",
            Category::FixedBills => "📄",
            Category::Investments => "📈",
            Category::Income => "💼",
            Category::Other => "🛍️",
        }
    }

    /// Resolves a display name (case-insensitive) or a legacy name.
    pub fn from_name(name: &str) -> Option<Category> {
        let key = name.trim().to_lowercase();
        if let Some(category) = NAME_LOOKUP.get(&key) {
            return Some(*category);
        }
        // Accept identifiers typed without the space, e.g. `fixedbills`.
        Category::ALL
            .into_iter()
            .find(|category| category.name().replace(' ', "").to_lowercase() == key)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
