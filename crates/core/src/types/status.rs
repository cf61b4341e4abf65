//! Customer query workflow status.

use serde::{Deserialize, Serialize};

/// Where a customer query stands in the follow-up process.
///
/// Any status may be set from any other; there is no enforced workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "customer_query_status", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum QueryStatus {
    /// Newly submitted, not yet answered.
    #[default]
    Pending,
    /// Staff have replied to the customer.
    Responded,
    /// No further action needed.
    Closed,
}

impl QueryStatus {
    pub const ALL: [Self; 3] = [Self::Pending, Self::Responded, Self::Closed];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Responded => "responded",
            Self::Closed => "closed",
        }
    }

    /// Human-readable label for UI badges.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Responded => "Responded",
            Self::Closed => "Closed",
        }
    }
}

impl std::fmt::Display for QueryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for QueryStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "responded" => Ok(Self::Responded),
            "closed" => Ok(Self::Closed),
            _ => Err(format!("invalid query status: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_pending() {
        assert_eq!(QueryStatus::default(), QueryStatus::Pending);
    }

    #[test]
    fn test_from_str_round_trips_display() {
        for status in QueryStatus::ALL {
            assert_eq!(status.to_string().parse::<QueryStatus>().unwrap(), status);
        }
        assert!("archived".parse::<QueryStatus>().is_err());
    }

    #[test]
    fn test_serde_lowercase() {
        let status: QueryStatus = serde_json::from_str("\"responded\"").unwrap();
        assert_eq!(status, QueryStatus::Responded);
        assert!(serde_json::from_str::<QueryStatus>("\"Responded\"").is_err());
    }
}
