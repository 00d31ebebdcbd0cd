pub mod notifier;

pub use notifier::{Notifier, SubscriptionId};

/// Query name the database layer gives to schema-introspection queries.
pub const SCHEMA_QUERY_NAME: &str = "SCHEMA";

// ─── Categories ──────────────────────────────────────────────────

/// The notification categories this crate knows how to aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// A controller action finished dispatching.
    ProcessAction,
    /// A database query was executed.
    SqlQuery,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::ProcessAction, Category::SqlQuery];

    /// Wire name used by the producing framework.
    pub fn name(self) -> &'static str {
        match self {
            Self::ProcessAction => "process_action.action_controller",
            Self::SqlQuery => "sql.active_record",
        }
    }

    /// Map a raw notification name onto a category, if it is one of ours.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }

    fn bit(self) -> u8 {
        match self {
            Self::ProcessAction => 1 << 0,
            Self::SqlQuery => 1 << 1,
        }
    }
}

/// A fixed set of categories a subscription listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CategorySet(u8);

impl CategorySet {
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Every category the aggregator consumes.
    pub fn all() -> Self {
        Self::of(&Category::ALL)
    }

    pub fn of(categories: &[Category]) -> Self {
        Self(categories.iter().fold(0, |acc, c| acc | c.bit()))
    }

    pub fn contains(self, category: Category) -> bool {
        self.0 & category.bit() != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

// ─── Payload & event ─────────────────────────────────────────────

/// The payload fields consumed from a notification. Everything else the
/// producer attaches is dropped on the floor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Payload {
    /// Milliseconds spent rendering views (controller events).
    pub view_runtime: Option<f64>,
    /// Milliseconds spent in the database (controller events).
    pub db_runtime: Option<f64>,
    /// Query name (SQL events), e.g. `"User Load"` or `"SCHEMA"`.
    pub name: Option<String>,
    /// Statement text (SQL events).
    pub sql: Option<String>,
}

impl Payload {
    pub fn controller(view_runtime: Option<f64>, db_runtime: Option<f64>) -> Self {
        Self {
            view_runtime,
            db_runtime,
            ..Self::default()
        }
    }

    pub fn query(name: impl Into<String>, sql: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            sql: Some(sql.into()),
            ..Self::default()
        }
    }

    pub fn is_schema_query(&self) -> bool {
        self.name.as_deref() == Some(SCHEMA_QUERY_NAME)
    }
}

/// One notification that made it through the category filter.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub category: Category,
    pub payload: Payload,
}

impl Event {
    pub fn new(category: Category, payload: Payload) -> Self {
        Self { category, payload }
    }
}
