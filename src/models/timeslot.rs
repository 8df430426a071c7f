use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppResult};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Timeslot {
    pub id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub is_available: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTimeslot {
    pub id: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl NewTimeslot {
    /// A slot must end strictly after it starts. Times are kept at whole
    /// seconds, the precision they are stored at. A missing or blank id gets
    /// a generated one.
    pub fn validate(self) -> AppResult<Timeslot> {
        let start_time = self.start_time.trunc_subsecs(0);
        let end_time = self.end_time.trunc_subsecs(0);
        if end_time <= start_time {
            return Err(AppError::Validation(
                "end time must be after start time".into(),
            ));
        }

        let id = match self.id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => uuid::Uuid::new_v4().to_string(),
        };

        Ok(Timeslot {
            id,
            start_time,
            end_time,
            is_available: true,
        })
    }
}
