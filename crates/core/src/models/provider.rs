use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{EngineError, EngineResult};

/// Profile the resolver needs for a provider: tenant scope and local timezone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provider {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub display_name: Option<String>,
    pub timezone: String,
    pub updated_at: DateTime<Utc>,
}

impl Provider {
    pub fn tz(&self) -> EngineResult<Tz> {
        parse_timezone(&self.timezone)
    }
}

pub fn parse_timezone(name: &str) -> EngineResult<Tz> {
    name.parse::<Tz>()
        .map_err(|_| EngineError::Validation(format!("Unknown timezone '{}'", name)))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpsertProviderRequest {
    pub display_name: Option<String>,
    pub timezone: String,
}
