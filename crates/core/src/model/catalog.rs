use serde::{Deserialize, Serialize};

use crate::model::ids::{CategoryId, TopicId, UserId};

/// Node of the navigation menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    #[serde(default)]
    pub parent_id: Option<CategoryId>,
    #[serde(default)]
    pub level: u32,
    pub name: String,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Category>>,
}

/// A learnable topic at the leaf of the menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    pub id: TopicId,
    pub category_id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub is_game_supported: bool,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub user_id: UserId,
    pub user_name: String,
    pub score: i64,
    pub time_ms: u64,
    pub accuracy: f64,
}

/// The signed-in learner's standing on a topic leaderboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MyRank {
    #[serde(default)]
    pub rank: Option<u32>,
    #[serde(default)]
    pub best_score: i64,
    #[serde(default)]
    pub best_time: u64,
}

/// Sort menu items the way the server intends them to be shown.
pub fn sort_categories(categories: &mut [Category]) {
    categories.sort_by(|left, right| {
        left.sort_order
            .cmp(&right.sort_order)
            .then_with(|| left.name.cmp(&right.name))
    });
}

pub fn sort_topics(topics: &mut [Topic]) {
    topics.sort_by(|left, right| {
        left.sort_order
            .cmp(&right.sort_order)
            .then_with(|| left.name.cmp(&right.name))
    });
}

const fn default_active() -> bool {
    true
}
