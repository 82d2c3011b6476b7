//! Queue type definitions

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// Backend strategy for an event queue
///
/// `Single` delivers in strict enqueue order on one dedicated thread. `Pooled` shares a
/// named thread pool with other queues and makes no ordering promise.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum QueueType {
    #[default]
    Single,
    Pooled,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_queue_type_names() {
        assert_eq!(QueueType::Single.to_string(), "SINGLE");
        assert_eq!(QueueType::Pooled.to_string(), "POOLED");
        assert_eq!(QueueType::from_str("pooled").unwrap(), QueueType::Pooled);
        assert_eq!(QueueType::from_str("Single").unwrap(), QueueType::Single);
        assert!(QueueType::from_str("cluster").is_err());
        assert_eq!(QueueType::iter().count(), 2);
        assert_eq!(QueueType::default(), QueueType::Single);
    }
}
