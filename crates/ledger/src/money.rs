use serde::{Deserialize, Serialize};

use crate::expense::Amount;

/// Money contributed by the named family members, tracked apart from payments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoneyReceived {
    #[serde(default)]
    pub ranjana: Amount,
    #[serde(default)]
    pub mummy: Amount,
    #[serde(default)]
    pub choti: Amount,
}

impl MoneyReceived {
    pub fn total(&self) -> Amount {
        self.ranjana + self.mummy + self.choti
    }
}
