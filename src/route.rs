//! Audio output route metadata.

use serde::{Deserialize, Serialize};

/// Category of the active output route.
///
/// Discriminants match the integer codes reported by the native module.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum RouteCategory {
    BuiltIn = 0,
    Headphones = 1,
    Bluetooth = 2,
    #[default]
    Unknown = 3,
}

impl From<i32> for RouteCategory {
    fn from(code: i32) -> Self {
        match code {
            0 => RouteCategory::BuiltIn,
            1 => RouteCategory::Headphones,
            2 => RouteCategory::Bluetooth,
            _ => RouteCategory::Unknown,
        }
    }
}

/// Currently active physical output, recomputed on every query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioRoute {
    pub name: String,
    pub uid: String,
    pub category: RouteCategory,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_native_code() {
        assert_eq!(RouteCategory::from(0), RouteCategory::BuiltIn);
        assert_eq!(RouteCategory::from(1), RouteCategory::Headphones);
        assert_eq!(RouteCategory::from(2), RouteCategory::Bluetooth);
        assert_eq!(RouteCategory::from(3), RouteCategory::Unknown);
    }

    #[test]
    fn test_out_of_range_code_is_unknown() {
        assert_eq!(RouteCategory::from(-1), RouteCategory::Unknown);
        assert_eq!(RouteCategory::from(42), RouteCategory::Unknown);
    }

    #[test]
    fn test_default_route_is_empty_unknown() {
        let route = AudioRoute::default();
        assert!(route.name.is_empty());
        assert!(route.uid.is_empty());
        assert_eq!(route.category, RouteCategory::Unknown);
    }
}
