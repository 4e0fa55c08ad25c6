use std::sync::Arc;

use storage::{Storage, StorageKey};
use tutor_core::model::{
    Category, CategoryId, LeaderboardEntry, MyRank, Topic, TopicId, sort_categories, sort_topics,
};

use crate::api::CatalogApi;
use crate::error::MenuError;

/// Id of the category the menu starts from.
pub const ROOT_CATEGORY: &str = "game";
pub const ROOT_TITLE: &str = "Trò chơi";

/// What a menu level lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuEntries {
    Categories(Vec<Category>),
    Topics(Vec<Topic>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuLevel {
    pub category_id: CategoryId,
    pub title: String,
    pub entries: Option<MenuEntries>,
}

impl MenuLevel {
    fn new(category_id: CategoryId, title: impl Into<String>) -> Self {
        Self {
            category_id,
            title: title.into(),
            entries: None,
        }
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.entries.is_some()
    }

    #[must_use]
    pub fn categories(&self) -> &[Category] {
        match &self.entries {
            Some(MenuEntries::Categories(categories)) => categories,
            _ => &[],
        }
    }

    #[must_use]
    pub fn topics(&self) -> &[Topic] {
        match &self.entries {
            Some(MenuEntries::Topics(topics)) => topics,
            _ => &[],
        }
    }
}

/// Drill-down through categories to a playable topic.
pub struct MenuNavigator {
    api: Arc<dyn CatalogApi>,
    storage: Storage,
    stack: Vec<MenuLevel>,
}

impl MenuNavigator {
    #[must_use]
    pub fn new(api: Arc<dyn CatalogApi>, storage: Storage) -> Self {
        Self {
            api,
            storage,
            stack: vec![MenuLevel::new(CategoryId::new(ROOT_CATEGORY), ROOT_TITLE)],
        }
    }

    #[must_use]
    pub fn current(&self) -> &MenuLevel {
        // The root level is never popped.
        &self.stack[self.stack.len() - 1]
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.stack.len() == 1
    }

    #[must_use]
    pub fn breadcrumb(&self) -> String {
        self.stack
            .iter()
            .map(|level| level.title.as_str())
            .collect::<Vec<_>>()
            .join(" > ")
    }

    /// Fetch the current level's children, or its topics when it has none.
    ///
    /// # Errors
    ///
    /// Returns `MenuError::Api` if either request fails.
    pub async fn load_current(&mut self) -> Result<(), MenuError> {
        let id = self.current().category_id.clone();
        let mut children: Vec<Category> = self
            .api
            .category_children(&id)
            .await?
            .into_iter()
            .filter(|category| category.is_active)
            .collect();

        let entries = if children.is_empty() {
            let mut topics: Vec<Topic> = self
                .api
                .category_topics(&id)
                .await?
                .into_iter()
                .filter(|topic| topic.is_active)
                .collect();
            sort_topics(&mut topics);
            MenuEntries::Topics(topics)
        } else {
            sort_categories(&mut children);
            MenuEntries::Categories(children)
        };

        if let Some(level) = self.stack.last_mut() {
            level.entries = Some(entries);
        }
        Ok(())
    }

    /// Descend into a category and load it.
    ///
    /// # Errors
    ///
    /// Returns `MenuError::Api` if loading fails; the navigator stays where it was.
    pub async fn enter(&mut self, category: &Category) -> Result<(), MenuError> {
        self.stack
            .push(MenuLevel::new(category.id.clone(), category.name.clone()));
        if let Err(err) = self.load_current().await {
            self.stack.pop();
            return Err(err);
        }
        Ok(())
    }

    /// Go up one level; returns false at the root.
    pub fn back(&mut self) -> bool {
        if self.is_root() {
            return false;
        }
        self.stack.pop();
        true
    }

    /// Remember a playable topic for the learning flow.
    ///
    /// # Errors
    ///
    /// Returns `MenuError::TopicNotSupported` for topics without a game, or a
    /// storage error.
    pub async fn select_topic(&self, topic: &Topic) -> Result<(), MenuError> {
        if !topic.is_game_supported {
            return Err(MenuError::TopicNotSupported(topic.id.clone()));
        }
        self.storage
            .set_string(StorageKey::SelectedTopicId, topic.id.as_str())
            .await?;
        self.storage
            .set_string(StorageKey::SelectedTopicName, &topic.name)
            .await?;
        tracing::info!(topic = %topic.id, "topic selected");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `MenuError::Storage` if the selection cannot be read.
    pub async fn selected_topic(&self) -> Result<Option<(TopicId, String)>, MenuError> {
        selected_topic(&self.storage).await
    }
}

/// The topic last chosen in the menu, if any.
///
/// # Errors
///
/// Returns `MenuError::Storage` if the selection cannot be read.
pub async fn selected_topic(storage: &Storage) -> Result<Option<(TopicId, String)>, MenuError> {
    let Some(id) = storage.get_string(StorageKey::SelectedTopicId).await? else {
        return Ok(None);
    };
    let name = storage
        .get_string(StorageKey::SelectedTopicName)
        .await?
        .unwrap_or_default();
    Ok(Some((TopicId::new(id), name)))
}

/// Per-topic rankings.
#[derive(Clone)]
pub struct LeaderboardService {
    api: Arc<dyn CatalogApi>,
}

impl LeaderboardService {
    #[must_use]
    pub fn new(api: Arc<dyn CatalogApi>) -> Self {
        Self { api }
    }

    /// # Errors
    ///
    /// Returns `MenuError::Api` if the leaderboard cannot be fetched.
    pub async fn top(&self, topic: &TopicId) -> Result<Vec<LeaderboardEntry>, MenuError> {
        let mut entries = self.api.leaderboard(topic).await?;
        entries.sort_by_key(|entry| entry.rank);
        Ok(entries)
    }

    /// # Errors
    ///
    /// Returns `MenuError::Api` if the rank cannot be fetched.
    pub async fn my_rank(&self, topic: &TopicId) -> Result<MyRank, MenuError> {
        Ok(self.api.my_rank(topic).await?)
    }
}
