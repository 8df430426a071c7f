use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppResult};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Bike {
    pub id: String,
    pub name: String,
    pub is_available: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewBike {
    pub id: String,
    pub name: String,
}

impl NewBike {
    /// Checks the input and produces an available bike ready to persist.
    pub fn validate(self) -> AppResult<Bike> {
        let id = self.id.trim();
        if id.is_empty() {
            return Err(AppError::Validation("bike id is required".into()));
        }
        let name = self.name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("bike name is required".into()));
        }

        Ok(Bike {
            id: id.to_string(),
            name: name.to_string(),
            is_available: true,
        })
    }
}
