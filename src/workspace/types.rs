//! Workspace record types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A tenant (company) addressed by a unique subdomain label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workspace {
    /// Stable workspace id assigned by the data store.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Subdomain label the workspace is reachable under.
    pub subdomain: String,

    #[serde(default)]
    pub description: Option<String>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Body of `GET /companies/subdomain/{identifier}`.
#[derive(Debug, Clone, Deserialize)]
pub struct CompanyEnvelope {
    pub company: Workspace,
}

/// Body of `GET /companies/mine`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompanyListEnvelope {
    #[serde(default)]
    pub companies: Vec<Workspace>,

    #[serde(default)]
    pub current_company_id: Option<String>,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use chrono::TimeZone;

    pub fn workspace(id: &str, subdomain: &str) -> Workspace {
        let ts = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        Workspace {
            id: id.to_string(),
            name: format!("{} Inc", subdomain),
            subdomain: subdomain.to_string(),
            description: None,
            created_at: ts,
            updated_at: ts,
        }
    }
}
