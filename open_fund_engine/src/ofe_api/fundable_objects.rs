use ofg_common::Amount;
use serde::{Deserialize, Serialize};

/// A partial update to a funding target. Unset fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TargetUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub full_amount: Option<Amount>,
}

impl TargetUpdate {
    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_description<S: Into<String>>(mut self, description: S) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_full_amount(mut self, full_amount: Amount) -> Self {
        self.full_amount = Some(full_amount);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.full_amount.is_none()
    }
}
