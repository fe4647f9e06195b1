use thiserror::Error;

/// A description of a catalog product.
///
/// Products are owned by an external catalog and are immutable once defined;
/// the promotional machinery only reads them. Prices are display prices in
/// the merchant's currency, not ledger amounts.
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct ProductData {
    /// Display name of the product
    pub name: String,
    /// Undiscounted price; must be non-negative
    pub base_price: f64,
    /// Optional catalog category
    #[cfg_attr(feature = "serde", serde(default))]
    pub category: Option<String>,
    /// Optional image URL for the admin panel
    #[cfg_attr(feature = "serde", serde(default))]
    pub image: Option<String>,
}

impl ProductData {
    /// Check the catalog invariants for a product definition.
    pub fn validate(&self) -> Result<(), InvalidProduct> {
        if self.base_price < 0.0 {
            Err(InvalidProduct::NegativeBasePrice)
        } else {
            Ok(())
        }
    }
}

/// A product record combines a product ID with its catalog data.
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct ProductRecord<ProductId> {
    /// Unique identifier for the product
    pub id: ProductId,
    /// The catalog data
    pub data: ProductData,
}

/// The ways in which a product definition may be invalid.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum InvalidProduct {
    /// The base price was negative
    #[error("product base price must be non-negative")]
    NegativeBasePrice,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_price_rejected() {
        let data = ProductData {
            name: "widget".into(),
            base_price: -0.01,
            category: None,
            image: None,
        };
        assert_eq!(data.validate(), Err(InvalidProduct::NegativeBasePrice));
    }

    #[test]
    fn test_zero_price_allowed() {
        let data = ProductData {
            name: "freebie".into(),
            base_price: 0.0,
            category: None,
            image: None,
        };
        assert!(data.validate().is_ok());
    }
}
