//! List filtering for the request table.
//!
//! The handler view filters by free text, category, status, and priority.
//! Values arrive already validated as typed enums; this module only turns
//! them into WHERE fragments with positional binds, appended after the
//! policy scope by the store.

use crate::types::{Category, Priority, Status};

#[derive(Debug, Clone, Default)]
pub struct RequestFilter {
    /// case-insensitive match over title and description
    pub q: Option<String>,
    pub category: Option<Category>,
    pub status: Option<Status>,
    pub priority: Option<Priority>,
}

impl RequestFilter {
    pub fn is_empty(&self) -> bool {
        self.q.is_none() && self.category.is_none() && self.status.is_none() && self.priority.is_none()
    }

    /// Render " AND ..." fragments starting at placeholder `$first_param`,
    /// returning the owned bind values in order. The free-text bind reuses
    /// one placeholder for both columns.
    pub fn where_sql(&self, first_param: usize) -> (String, Vec<String>) {
        let mut sql = String::new();
        let mut binds = Vec::new();
        let mut n = first_param;

        if let Some(q) = &self.q {
            sql.push_str(&format!(" AND (title ILIKE ${} OR description ILIKE ${})", n, n));
            binds.push(format!("%{}%", q));
            n += 1;
        }
        if let Some(category) = self.category {
            sql.push_str(&format!(" AND category = ${}", n));
            binds.push(category.as_str().to_string());
            n += 1;
        }
        if let Some(status) = self.status {
            sql.push_str(&format!(" AND status = ${}", n));
            binds.push(status.as_str().to_string());
            n += 1;
        }
        if let Some(priority) = self.priority {
            sql.push_str(&format!(" AND priority = ${}", n));
            binds.push(priority.as_str().to_string());
        }

        (sql, binds)
    }
}
