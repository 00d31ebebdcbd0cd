use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::notifications::{Category, Notifier, Payload, SCHEMA_QUERY_NAME};

// ─── Constants ───────────────────────────────────────────────────

const NUM_USERS: usize = 1_000;
const NUM_PRODUCTS: usize = 200;

static FIRST: &[&str] = &["Emma", "Liam", "Olivia", "Noah", "Ava", "Ethan", "Sophia", "Mason"];
static LAST: &[&str] = &["Smith", "Johnson", "Brown", "Garcia", "Miller", "Davis", "Lopez"];
static ROLES: &[&str] = &["admin", "editor", "viewer"];
static ADJ: &[&str] = &["Premium", "Wireless", "Compact", "Ergonomic", "Portable", "Modern"];
static NOUN: &[&str] = &["Keyboard", "Mouse", "Monitor", "Headphones", "Webcam", "Dock"];
static CAT: &[&str] = &["electronics", "accessories", "audio", "computing", "office"];

// ─── Domain types ────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub title: String,
    /// Price in cents (e.g. 12999 = $129.99)
    pub price: u64,
    pub stock: u32,
    pub category: String,
}

#[derive(Debug, Clone, Copy)]
enum Table {
    Users,
    Products,
}

impl Table {
    fn name(self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Products => "products",
        }
    }
}

// ─── Store ───────────────────────────────────────────────────────

/// In-memory tables that report every query as a `sql.active_record`
/// notification, the way an ORM would.
///
/// The first touch of a table also reports a `SCHEMA` query for the column
/// lookup, which the runtime headers exclude from the query count.
pub struct Store {
    notifier: Notifier,
    users: RwLock<HashMap<String, User>>,
    products: RwLock<HashMap<String, Product>>,
    users_schema: AtomicBool,
    products_schema: AtomicBool,
}

impl Store {
    pub fn new(notifier: Notifier) -> Self {
        Self {
            notifier,
            users: RwLock::new(HashMap::new()),
            products: RwLock::new(HashMap::new()),
            users_schema: AtomicBool::new(false),
            products_schema: AtomicBool::new(false),
        }
    }

    /// Fill both tables with deterministic mock rows. Emits nothing.
    pub fn seed(&self) {
        let mut users = self.users.write();
        for i in 0..NUM_USERS {
            let id = format!("usr_{:08}", i + 1);
            let first = FIRST[i % FIRST.len()];
            let last = LAST[(i / FIRST.len()) % LAST.len()];
            users.insert(
                id.clone(),
                User {
                    id,
                    name: format!("{first} {last}"),
                    email: format!(
                        "{}.{}{}@example.com",
                        first.to_lowercase(),
                        last.to_lowercase(),
                        i + 1
                    ),
                    role: ROLES[i % ROLES.len()].into(),
                    created_at: "2025-01-15T09:23:11Z".into(),
                },
            );
        }

        let mut products = self.products.write();
        for i in 0..NUM_PRODUCTS {
            let id = format!("prod_{:04}", i + 1);
            let adj = ADJ[i % ADJ.len()];
            let noun = NOUN[(i / ADJ.len()) % NOUN.len()];
            products.insert(
                id.clone(),
                Product {
                    id,
                    title: format!("{adj} {noun}"),
                    price: 999 + (i as u64 * 731) % 99_000,
                    stock: (i as u32 * 37) % 1_000,
                    category: CAT[i % CAT.len()].into(),
                },
            );
        }

        tracing::info!(users = users.len(), products = products.len(), "store seeded");
    }

    pub fn find_user(&self, id: &str) -> Option<User> {
        self.query(
            Table::Users,
            "User Load",
            format!("SELECT * FROM users WHERE id = '{id}' LIMIT 1"),
            || self.users.read().get(id).cloned(),
        )
    }

    pub fn insert_user(&self, user: User) {
        let sql = format!("INSERT INTO users (id, name, email) VALUES ('{}', ...)", user.id);
        self.query(Table::Users, "User Create", sql, || {
            self.users.write().insert(user.id.clone(), user);
        });
    }

    pub fn find_product(&self, id: &str) -> Option<Product> {
        self.query(
            Table::Products,
            "Product Load",
            format!("SELECT * FROM products WHERE id = '{id}' LIMIT 1"),
            || self.products.read().get(id).cloned(),
        )
    }

    pub fn count_users(&self) -> usize {
        self.query(
            Table::Users,
            "User Count",
            "SELECT COUNT(*) FROM users".into(),
            || self.users.read().len(),
        )
    }

    fn query<R>(&self, table: Table, name: &str, sql: String, run: impl FnOnce() -> R) -> R {
        self.load_schema(table);
        let out = run();
        self.notifier
            .instrument(Category::SqlQuery.name(), Payload::query(name, sql));
        out
    }

    fn load_schema(&self, table: Table) {
        let flag = match table {
            Table::Users => &self.users_schema,
            Table::Products => &self.products_schema,
        };
        if !flag.swap(true, Ordering::AcqRel) {
            self.notifier.instrument(
                Category::SqlQuery.name(),
                Payload::query(SCHEMA_QUERY_NAME, format!("PRAGMA table_info({})", table.name())),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::EventCollector;

    fn seeded() -> (Notifier, Store) {
        let n = Notifier::new();
        let s = Store::new(n.clone());
        s.seed();
        (n, s)
    }

    #[test]
    fn seed_is_silent() {
        let n = Notifier::new();
        let c = EventCollector::begin(&n, None);
        Store::new(n.clone()).seed();
        assert!(c.finish().is_empty());
    }

    #[test]
    fn first_query_reports_schema_lookup() {
        let (n, s) = seeded();
        let c = EventCollector::begin(&n, None);
        assert!(s.find_user("usr_00000001").is_some());
        assert!(s.find_user("usr_00000002").is_some());

        let names: Vec<_> = c
            .finish()
            .into_iter()
            .map(|e| e.payload.name.unwrap_or_default())
            .collect();
        assert_eq!(names, ["SCHEMA", "User Load", "User Load"]);
    }

    #[test]
    fn missing_rows_still_count_as_queries() {
        let (n, s) = seeded();
        let c = EventCollector::begin(&n, None);
        assert!(s.find_product("prod_9999").is_none());
        assert_eq!(c.finish().len(), 2);
    }

    #[test]
    fn insert_then_count() {
        let (_n, s) = seeded();
        let before = s.count_users();
        s.insert_user(User {
            id: "usr_new".into(),
            name: "Ada Lopez".into(),
            email: "ada@example.com".into(),
            role: "admin".into(),
            created_at: "2025-01-15T09:23:11Z".into(),
        });
        assert_eq!(s.count_users(), before + 1);
        assert_eq!(s.find_user("usr_new").map(|u| u.role), Some("admin".into()));
    }
}
