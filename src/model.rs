use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Name and contact number of the person asking.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SenderIdentity {
    pub name: String,
    pub phone: String,
}

impl SenderIdentity {
    /// Both fields are required; surrounding whitespace is dropped.
    pub fn new(name: &str, phone: &str) -> Result<Self> {
        let name = name.trim();
        let phone = phone.trim();
        if name.is_empty() {
            anyhow::bail!("name is required");
        }
        if phone.is_empty() {
            anyhow::bail!("phone is required");
        }
        Ok(SenderIdentity {
            name: name.to_string(),
            phone: phone.to_string(),
        })
    }
}

/// What the recipient's page knows after reading its URL.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipientContext {
    pub sender_name: String,
    pub sender_phone: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_name: Option<String>,
}

impl RecipientContext {
    pub fn sender(&self) -> SenderIdentity {
        SenderIdentity {
            name: self.sender_name.clone(),
            phone: self.sender_phone.clone(),
        }
    }

    pub fn with_recipient(mut self, name: &str) -> Self {
        self.recipient_name = Some(name.to_string());
        self
    }
}
