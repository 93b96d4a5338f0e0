//! Typed ID wrappers for Northwind entities.
//!
//! Identifiers are store-assigned integers. A freshly built transfer object
//! that has not been inserted yet carries the id `0`.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i32);

        impl $name {
            /// Wraps a raw store identifier.
            #[must_use]
            pub const fn new(id: i32) -> Self {
                Self(id)
            }

            /// Returns the raw store identifier.
            #[must_use]
            pub const fn get(self) -> i32 {
                self.0
            }

            /// Whether the identifier can address a stored row.
            #[must_use]
            pub const fn is_positive(self) -> bool {
                self.0 > 0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i32> for $name {
            fn from(id: i32) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

entity_id!(
    /// Identifier of a row in `Products`.
    ProductId
);

entity_id!(
    /// Identifier of a row in `Categories`.
    CategoryId
);

entity_id!(
    /// Identifier of a row in `Employees`.
    EmployeeId
);

entity_id!(
    /// Identifier of a row in `Suppliers`.
    SupplierId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_ids() {
        assert!(ProductId::new(1).is_positive());
        assert!(!ProductId::new(0).is_positive());
        assert!(!CategoryId::new(-5).is_positive());
    }

    #[test]
    fn test_conversions_and_display() {
        let id = EmployeeId::from(9);
        assert_eq!(i32::from(id), 9);
        assert_eq!(id.to_string(), "9");
        assert_eq!(SupplierId::default().get(), 0);
    }

    #[test]
    fn test_serde_transparent() {
        let json = serde_json::to_string(&ProductId::new(17)).unwrap();
        assert_eq!(json, "17");
        let back: ProductId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ProductId::new(17));
    }
}
