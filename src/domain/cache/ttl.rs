//! TTL classes and resolution

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::pipeline::Purpose;

/// Cache lifetime category of a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TtlClass {
    Dashboard,
    ListQuery,
    SingleItemQuery,
    Default,
}

impl TtlClass {
    /// Classifies a request purpose, checking dashboard, collection, then single item
    pub fn classify(purpose: &Purpose) -> Self {
        match purpose {
            Purpose::Read(shape) if shape.dashboard => Self::Dashboard,
            Purpose::Read(shape) if shape.collection => Self::ListQuery,
            Purpose::Read(shape) if shape.single_item => Self::SingleItemQuery,
            _ => Self::Default,
        }
    }
}

/// Maps TTL classes to cache lifetimes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtlPolicy {
    pub dashboard: Duration,
    pub list_query: Duration,
    pub single_item_query: Duration,
    pub default: Duration,
}

impl Default for TtlPolicy {
    fn default() -> Self {
        Self {
            dashboard: Duration::from_secs(60),
            list_query: Duration::from_secs(120),
            single_item_query: Duration::from_secs(300),
            default: Duration::from_secs(180),
        }
    }
}

impl TtlPolicy {
    /// Lifetime for a TTL class
    pub fn ttl_for(&self, class: TtlClass) -> Duration {
        match class {
            TtlClass::Dashboard => self.dashboard,
            TtlClass::ListQuery => self.list_query,
            TtlClass::SingleItemQuery => self.single_item_query,
            TtlClass::Default => self.default,
        }
    }

    /// Resolves the cache lifetime for a request purpose
    pub fn resolve(&self, purpose: &Purpose) -> Duration {
        self.ttl_for(TtlClass::classify(purpose))
    }
}
