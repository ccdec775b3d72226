//! Request contract and read/write classification

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

/// Entity kind a write request changes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Subject {
    Product,
    Category,
}

impl Subject {
    /// Every subject a write request can declare
    pub const ALL: [Subject; 2] = [Subject::Product, Subject::Category];

    /// Stable name used to look up invalidation rules
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Product => "Product",
            Self::Category => "Category",
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a read request fetches
///
/// More than one flag may be set; TTL resolution checks them in priority
/// order (dashboard, collection, single item).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReadShape {
    pub dashboard: bool,
    pub collection: bool,
    pub single_item: bool,
}

impl ReadShape {
    /// Aggregated dashboard data
    pub const fn dashboard() -> Self {
        Self {
            dashboard: true,
            collection: false,
            single_item: false,
        }
    }

    /// A page or filtered list of items
    pub const fn collection() -> Self {
        Self {
            dashboard: false,
            collection: true,
            single_item: false,
        }
    }

    /// One item looked up by identifier
    pub const fn single_item() -> Self {
        Self {
            dashboard: false,
            collection: false,
            single_item: true,
        }
    }

    /// A read that fits none of the known shapes
    pub const fn unclassified() -> Self {
        Self {
            dashboard: false,
            collection: false,
            single_item: false,
        }
    }
}

/// Declared purpose of a request: exactly one of read or write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Purpose {
    Read(ReadShape),
    Write(Subject),
}

impl Purpose {
    pub fn is_read(&self) -> bool {
        matches!(self, Self::Read(_))
    }

    pub fn is_write(&self) -> bool {
        matches!(self, Self::Write(_))
    }

    /// Subject of a write, `None` for reads
    pub fn subject(&self) -> Option<Subject> {
        match self {
            Self::Write(subject) => Some(*subject),
            Self::Read(_) => None,
        }
    }
}

/// A request dispatched through the pipeline
///
/// `NAME` and `PURPOSE` are fixed where the request type is defined. The
/// serialized fields, in declaration order, form the cache key of reads.
pub trait Request: Validate + Serialize + Send + Sync + 'static {
    /// Response produced by the request's handler
    type Response: Serialize + DeserializeOwned + Send + Sync + 'static;

    /// Stable request name, first segment of every cache key
    const NAME: &'static str;

    /// Read or write classification
    const PURPOSE: Purpose;
}

/// Object-safe view of a request used by pipeline behaviors
pub trait DynRequest: Send + Sync {
    fn name(&self) -> &'static str;

    fn purpose(&self) -> Purpose;

    fn check(&self) -> Result<(), ValidationErrors>;

    /// Serialized fields used for key derivation
    fn fields(&self) -> Result<serde_json::Value, serde_json::Error>;
}

impl<R: Request> DynRequest for R {
    fn name(&self) -> &'static str {
        R::NAME
    }

    fn purpose(&self) -> Purpose {
        R::PURPOSE
    }

    fn check(&self) -> Result<(), ValidationErrors> {
        Validate::validate(self)
    }

    fn fields(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize, Validate)]
    struct FindWidget {
        #[validate(length(min = 1))]
        id: String,
    }

    impl Request for FindWidget {
        type Response = String;
        const NAME: &'static str = "FindWidget";
        const PURPOSE: Purpose = Purpose::Read(ReadShape::single_item());
    }

    #[test]
    fn test_purpose_is_exclusive() {
        let read = Purpose::Read(ReadShape::collection());
        let write = Purpose::Write(Subject::Category);

        assert!(read.is_read() && !read.is_write());
        assert!(write.is_write() && !write.is_read());
        assert_eq!(read.subject(), None);
        assert_eq!(write.subject(), Some(Subject::Category));
    }

    #[test]
    fn test_dyn_request_exposes_declared_metadata() {
        let request = FindWidget {
            id: "w-1".to_string(),
        };
        let erased: &dyn DynRequest = &request;

        assert_eq!(erased.name(), "FindWidget");
        assert_eq!(erased.purpose(), Purpose::Read(ReadShape::single_item()));
        assert!(erased.check().is_ok());
        assert_eq!(erased.fields().unwrap(), serde_json::json!({ "id": "w-1" }));
    }

    #[test]
    fn test_dyn_request_runs_field_validation() {
        let request = FindWidget { id: String::new() };
        let erased: &dyn DynRequest = &request;

        assert!(erased.check().is_err());
    }

    #[test]
    fn test_subject_names_are_stable() {
        assert_eq!(Subject::Product.as_str(), "Product");
        assert_eq!(Subject::Category.to_string(), "Category");
    }
}
