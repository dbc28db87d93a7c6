//! Clients: the people who hire the planner.

use serde::{Deserialize, Serialize};

use crate::record::{Entity, EntityKind, contains_folded};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
  pub name:     String,
  pub email:    String,
  pub phone:    String,
  /// Saved contract text; `None` until the planner edits one.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub contract: Option<String>,
}

impl Client {
  pub fn new(name: impl Into<String>, email: impl Into<String>, phone: impl Into<String>) -> Self {
    Self { name: name.into(), email: email.into(), phone: phone.into(), contract: None }
  }
}

#[derive(Debug, Clone, Default)]
pub struct ClientPatch {
  pub name:     Option<String>,
  pub email:    Option<String>,
  pub phone:    Option<String>,
  pub contract: Option<String>,
}

impl Entity for Client {
  type Patch = ClientPatch;

  const KIND: EntityKind = EntityKind::Clients;

  fn apply(&mut self, patch: ClientPatch) {
    if let Some(name) = patch.name {
      self.name = name;
    }
    if let Some(email) = patch.email {
      self.email = email;
    }
    if let Some(phone) = patch.phone {
      self.phone = phone;
    }
    if let Some(contract) = patch.contract {
      self.contract = Some(contract);
    }
  }

  fn matches(&self, needle: &str) -> bool {
    contains_folded(&self.name, needle) || contains_folded(&self.email, needle)
  }
}
