//! Maintenance history records.

use super::validation::{validate_cost, validate_service_type, ValidationError};
use super::{Entity, RecordId};
use crate::store::CollectionKey;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceRecord {
    pub id: RecordId,
    pub user_id: RecordId,
    pub date: DateTime<Utc>,
    pub service: String,
    pub parts_replaced: Vec<String>,
    /// Non-negative amount in the user's currency.
    pub cost: f64,
    pub mechanic_notes: String,
    pub created_at: DateTime<Utc>,
}

impl Entity for MaintenanceRecord {
    const COLLECTION: CollectionKey = CollectionKey::MaintenanceRecords;
    const NAME: &'static str = "maintenance record";

    fn id(&self) -> RecordId {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewMaintenanceRecord {
    pub user_id: RecordId,
    /// Defaults to now.
    pub date: Option<DateTime<Utc>>,
    pub service: String,
    pub parts_replaced: Vec<String>,
    pub cost: f64,
    pub mechanic_notes: String,
}

impl NewMaintenanceRecord {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_service_type(&self.service)?;
        validate_cost(self.cost)
    }
}

/// Editable record fields. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaintenanceChanges {
    pub date: Option<DateTime<Utc>>,
    pub service: Option<String>,
    pub parts_replaced: Option<Vec<String>>,
    pub cost: Option<f64>,
    pub mechanic_notes: Option<String>,
}

impl MaintenanceChanges {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(service) = self.service.as_deref() {
            validate_service_type(service)?;
        }
        if let Some(cost) = self.cost {
            validate_cost(cost)?;
        }
        Ok(())
    }

    pub(crate) fn apply_to(self, record: &mut MaintenanceRecord) {
        if let Some(date) = self.date {
            record.date = date;
        }
        if let Some(service) = self.service {
            record.service = service;
        }
        if let Some(parts_replaced) = self.parts_replaced {
            record.parts_replaced = parts_replaced;
        }
        if let Some(cost) = self.cost {
            record.cost = cost;
        }
        if let Some(mechanic_notes) = self.mechanic_notes {
            record.mechanic_notes = mechanic_notes;
        }
    }
}
