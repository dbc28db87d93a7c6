//! Vendors (buffet, decoration, music…) and their product catalogs.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Money,
  record::{Entity, EntityKind, contains_folded},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
  pub id:       Uuid,
  pub name:     String,
  pub quantity: f64,
  pub price:    Money,
  /// `quantity × price`, fixed when the product is added.
  pub total:    Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vendor {
  pub name:     String,
  pub category: String,
  pub contact:  String,
  #[serde(default)]
  pub products: Vec<Product>,
}

impl Vendor {
  pub fn new(
    name: impl Into<String>,
    category: impl Into<String>,
    contact: impl Into<String>,
  ) -> Self {
    Self {
      name:     name.into(),
      category: category.into(),
      contact:  contact.into(),
      products: Vec::new(),
    }
  }

  /// Append a product to the catalog. A missing or non-positive quantity
  /// counts as one unit.
  pub fn add_product(
    &mut self,
    name: impl Into<String>,
    quantity: Option<f64>,
    price: Money,
  ) -> &Product {
    let quantity = quantity.filter(|q| q.is_finite() && *q > 0.0).unwrap_or(1.0);
    self.products.push(Product {
      id: Uuid::new_v4(),
      name: name.into(),
      quantity,
      price,
      total: price.scale(quantity),
    });
    &self.products[self.products.len() - 1]
  }

  pub fn remove_product(&mut self, product_id: Uuid) -> bool {
    let before = self.products.len();
    self.products.retain(|p| p.id != product_id);
    self.products.len() != before
  }

  pub fn catalog_total(&self) -> Money { self.products.iter().map(|p| p.total).sum() }
}

#[derive(Debug, Clone, Default)]
pub struct VendorPatch {
  pub name:     Option<String>,
  pub category: Option<String>,
  pub contact:  Option<String>,
  pub products: Option<Vec<Product>>,
}

impl Entity for Vendor {
  type Patch = VendorPatch;

  const KIND: EntityKind = EntityKind::Vendors;

  fn apply(&mut self, patch: VendorPatch) {
    if let Some(name) = patch.name {
      self.name = name;
    }
    if let Some(category) = patch.category {
      self.category = category;
    }
    if let Some(contact) = patch.contact {
      self.contact = contact;
    }
    if let Some(products) = patch.products {
      self.products = products;
    }
  }

  fn matches(&self, needle: &str) -> bool {
    contains_folded(&self.name, needle) || contains_folded(&self.category, needle)
  }
}
