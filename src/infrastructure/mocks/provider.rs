//! Mock providers for aggregation tests.

use crate::application::provider::UserProvider;
use crate::domain::page::Page;
use crate::domain::user::User;

/// Provider returning a fixed set of users on every fetch.
#[derive(Debug, Clone)]
pub struct StaticProvider {
    name: String,
    users: Vec<User>,
    total: u64,
    total_pages: u32,
    query_total: Option<u64>,
    query_total_pages: Option<u32>,
}

impl StaticProvider {
    /// Create a provider serving `users`, with totals defaulting to the
    /// record count and a single page.
    pub fn new(name: impl Into<String>, users: Vec<User>) -> Self {
        let total = users.len() as u64;
        let total_pages = u32::from(!users.is_empty());
        Self {
            name: name.into(),
            users,
            total,
            total_pages,
            query_total: None,
            query_total_pages: None,
        }
    }

    /// Shorthand: one placeholder user per id.
    pub fn with_ids(name: impl Into<String>, ids: &[i64]) -> Self {
        let users = ids
            .iter()
            .map(|&id| {
                User::new(
                    id,
                    format!("user{}@example.com", id),
                    format!("User{}", id),
                    "Test",
                    format!("https://example.com/avatars/{}.png", id),
                )
            })
            .collect();
        Self::new(name, users)
    }

    /// Override the totals reported in the fetched page envelope.
    pub fn totals(mut self, total: u64, total_pages: u32) -> Self {
        self.total = total;
        self.total_pages = total_pages;
        self
    }

    /// Override the totals reported by the standalone total queries,
    /// independently of the envelope.
    pub fn query_totals(mut self, total: u64, total_pages: u32) -> Self {
        self.query_total = Some(total);
        self.query_total_pages = Some(total_pages);
        self
    }
}

impl UserProvider for StaticProvider {
    fn fetch_users(&self, page: u32, per_page: u32) -> Page<User> {
        Page::new(self.users.clone(), page, per_page, self.total, self.total_pages)
    }

    fn total_pages(&self, _per_page: u32) -> u32 {
        self.query_total_pages.unwrap_or(self.total_pages)
    }

    fn total_users(&self) -> u64 {
        self.query_total.unwrap_or(self.total)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Provider that panics on every call, for partial-failure tests.
#[derive(Debug, Clone)]
pub struct PanickingProvider {
    name: String,
}

impl PanickingProvider {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl UserProvider for PanickingProvider {
    fn fetch_users(&self, _page: u32, _per_page: u32) -> Page<User> {
        panic!("PanickingProvider::fetch_users called")
    }

    fn total_pages(&self, _per_page: u32) -> u32 {
        panic!("PanickingProvider::total_pages called")
    }

    fn total_users(&self) -> u64 {
        panic!("PanickingProvider::total_users called")
    }

    fn name(&self) -> &str {
        &self.name
    }
}
