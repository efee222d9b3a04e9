//! # Catalog
//!
//! Immutable lookup tables the editor prices and seeds from: products and
//! their list prices, customers with contacts, usage metrics and default
//! current assets, payment terms, and the subscription term years.
//!
//! ## Sources
//! ```text
//! ┌──────────────────────┐       ┌──────────────────────┐
//! │  Catalog::builtin()  │       │  Catalog::from_json  │
//! │  (shipped defaults)  │       │  (QUICKQUOTE_CATALOG)│
//! └──────────┬───────────┘       └──────────┬───────────┘
//!            │                              │ validate()
//!            └──────────────┬───────────────┘
//!                           ▼
//!                 Arc<Catalog> shared by editor + wizard
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{Discount, Section, Term};
use crate::validation::{validate_add_list_price, validate_quantity, MAX_LIST_PRICE};
use crate::DEFAULT_ENVELOPES_PURCHASED;

// =============================================================================
// Catalog Entries
// =============================================================================

/// A sellable product and its default unit list price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CatalogProduct {
    pub name: String,
    #[ts(type = "number")]
    pub list_price: Money,
}

/// One row of a customer's default current-asset template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AssetTemplate {
    pub name: String,
    pub quantity: i64,
    #[serde(default)]
    #[ts(type = "number")]
    pub discount_percent: Discount,
}

/// A known customer with its contact and usage metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CustomerProfile {
    pub name: String,
    pub contact: String,
    #[serde(default)]
    pub consumption_performance: u32,
    #[serde(default = "default_envelopes_purchased")]
    pub envelopes_purchased: u64,
    #[serde(default)]
    pub envelopes_sent: u64,
    #[serde(default)]
    pub default_assets: Vec<AssetTemplate>,
}

fn default_envelopes_purchased() -> u64 {
    DEFAULT_ENVELOPES_PURCHASED
}

fn default_term_year() -> i32 {
    2024
}

// =============================================================================
// Catalog
// =============================================================================

/// All lookup tables, read-only after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    pub products: Vec<CatalogProduct>,
    pub customers: Vec<CustomerProfile>,
    pub payment_terms: Vec<String>,
    /// Calendar year of current assets; products run the year after.
    #[serde(default = "default_term_year")]
    pub term_year: i32,
}

impl Catalog {
    /// The catalog shipped with the application.
    pub fn builtin() -> Self {
        fn product(name: &str, cents: i64) -> CatalogProduct {
            CatalogProduct {
                name: name.to_string(),
                list_price: Money::from_cents(cents),
            }
        }

        fn asset(name: &str, quantity: i64, pct: u32) -> AssetTemplate {
            AssetTemplate {
                name: name.to_string(),
                quantity,
                discount_percent: Discount::from_whole_percent(pct),
            }
        }

        fn customer(
            name: &str,
            contact: &str,
            consumption: u32,
            sent: u64,
            default_assets: Vec<AssetTemplate>,
        ) -> CustomerProfile {
            CustomerProfile {
                name: name.to_string(),
                contact: contact.to_string(),
                consumption_performance: consumption,
                envelopes_purchased: DEFAULT_ENVELOPES_PURCHASED,
                envelopes_sent: sent,
                default_assets,
            }
        }

        Catalog {
            products: vec![
                product("eSignature Envelope Subs", 500),
                product("DocuSign Monitor", 300),
                product("ID Verification", 350),
                product("DocuSign Retrieve", 200),
                product("IAM for CX", 153_000),
                product("IAM for Sales", 90_000),
            ],
            customers: vec![
                customer(
                    "Bank of America",
                    "Mike Trout",
                    85,
                    8500,
                    vec![
                        asset("eSignature Envelope Subs", 20, 5),
                        asset("DocuSign Monitor", 10, 7),
                    ],
                ),
                customer(
                    "Wells Fargo",
                    "Trea Turner",
                    90,
                    9000,
                    vec![
                        asset("eSignature Envelope Subs", 20, 10),
                        asset("ID Verification", 20, 10),
                    ],
                ),
                customer("T-Mobile", "Pete Alonso", 82, 8200, Vec::new()),
                customer("Chase", "Austin Riley", 60, 6000, Vec::new()),
                customer("Papa John's", "Matt Olson", 55, 5000, Vec::new()),
            ],
            payment_terms: vec![
                "Net 30".to_string(),
                "Net 45".to_string(),
                "Net 60".to_string(),
            ],
            term_year: default_term_year(),
        }
    }

    /// Parses and validates a catalog document.
    pub fn from_json(json: &str) -> CoreResult<Self> {
        let catalog: Catalog =
            serde_json::from_str(json).map_err(|e| CoreError::InvalidCatalog(e.to_string()))?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Checks internal consistency.
    ///
    /// ## Rules
    /// - At least one product and one payment term
    /// - No duplicate product or customer names
    /// - Every list price is positive and at most [`MAX_LIST_PRICE`], so any
    ///   product can be added to a quote
    /// - Every default asset names a catalog product, with a quantity the
    ///   editor would accept
    pub fn validate(&self) -> CoreResult<()> {
        if self.products.is_empty() {
            return Err(CoreError::InvalidCatalog("no products".to_string()));
        }
        if self.payment_terms.is_empty() {
            return Err(CoreError::InvalidCatalog("no payment terms".to_string()));
        }

        for (i, product) in self.products.iter().enumerate() {
            if self.products[..i].iter().any(|p| p.name == product.name) {
                return Err(CoreError::InvalidCatalog(format!(
                    "duplicate product: {}",
                    product.name
                )));
            }
            if validate_add_list_price(product.list_price).is_err() {
                return Err(CoreError::InvalidCatalog(format!(
                    "list price for {} must be above 0 and at most {}",
                    product.name, MAX_LIST_PRICE
                )));
            }
        }

        for (i, customer) in self.customers.iter().enumerate() {
            if self.customers[..i].iter().any(|c| c.name == customer.name) {
                return Err(CoreError::InvalidCatalog(format!(
                    "duplicate customer: {}",
                    customer.name
                )));
            }
            for asset in &customer.default_assets {
                if self.product(&asset.name).is_none() {
                    return Err(CoreError::InvalidCatalog(format!(
                        "{} has default asset {} which is not a product",
                        customer.name, asset.name
                    )));
                }
                if validate_quantity(asset.quantity).is_err()
                    || asset.discount_percent.bps() > Discount::MAX_BPS
                {
                    return Err(CoreError::InvalidCatalog(format!(
                        "{} has an invalid default asset row for {}",
                        customer.name, asset.name
                    )));
                }
            }
        }

        Ok(())
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    pub fn product(&self, name: &str) -> Option<&CatalogProduct> {
        self.products.iter().find(|p| p.name == name)
    }

    /// Default list price of a product, if it is in the catalog.
    pub fn list_price(&self, name: &str) -> Option<Money> {
        self.product(name).map(|p| p.list_price)
    }

    pub fn product_names(&self) -> Vec<String> {
        self.products.iter().map(|p| p.name.clone()).collect()
    }

    pub fn customer(&self, name: &str) -> Option<&CustomerProfile> {
        self.customers.iter().find(|c| c.name == name)
    }

    pub fn has_payment_terms(&self, terms: &str) -> bool {
        self.payment_terms.iter().any(|t| t == terms)
    }

    /// The first listed payment terms (`Net 30` in the built-in catalog).
    pub fn default_payment_terms(&self) -> &str {
        self.payment_terms.first().map(String::as_str).unwrap_or_default()
    }

    /// Term of existing subscriptions.
    pub fn current_term(&self) -> Term {
        Term::calendar_year(self.term_year)
    }

    /// Term of newly quoted products: the following calendar year.
    pub fn renewal_term(&self) -> Term {
        Term::calendar_year(self.term_year + 1)
    }

    /// Default dates for rows of `section`.
    pub fn term_for(&self, section: Section) -> Term {
        match section {
            Section::CurrentAssets => self.current_term(),
            Section::Products => self.renewal_term(),
        }
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Catalog::builtin()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_is_valid() {
        let catalog = Catalog::builtin();
        assert!(catalog.validate().is_ok());
        assert_eq!(catalog.products.len(), 6);
        assert_eq!(catalog.customers.len(), 5);
        assert_eq!(catalog.default_payment_terms(), "Net 30");
    }

    #[test]
    fn test_lookups() {
        let catalog = Catalog::builtin();
        assert_eq!(
            catalog.list_price("IAM for CX"),
            Some(Money::from_cents(153_000))
        );
        assert_eq!(catalog.list_price("Nope"), None);

        let boa = catalog.customer("Bank of America").unwrap();
        assert_eq!(boa.contact, "Mike Trout");
        assert_eq!(boa.consumption_performance, 85);
        assert_eq!(boa.envelopes_purchased, 10_000);
        assert_eq!(boa.default_assets.len(), 2);

        assert!(catalog.customer("Chase").unwrap().default_assets.is_empty());
        assert!(catalog.has_payment_terms("Net 45"));
        assert!(!catalog.has_payment_terms("Net 90"));
    }

    #[test]
    fn test_terms() {
        let catalog = Catalog::builtin();
        let current = catalog.term_for(Section::CurrentAssets);
        let renewal = catalog.term_for(Section::Products);
        assert_eq!(current.start.to_string(), "2024-01-01");
        assert_eq!(current.end.to_string(), "2024-12-31");
        assert_eq!(renewal.start.to_string(), "2025-01-01");
        assert_eq!(renewal.end.to_string(), "2025-12-31");
    }

    #[test]
    fn test_from_json() {
        let json = r#"{
            "products": [{"name": "Widget", "listPrice": 12.5}],
            "customers": [{
                "name": "Acme",
                "contact": "Wile E.",
                "consumptionPerformance": 91,
                "defaultAssets": [{"name": "Widget", "quantity": 4, "discountPercent": 2.5}]
            }],
            "paymentTerms": ["Net 15"]
        }"#;
        let catalog = Catalog::from_json(json).unwrap();
        assert_eq!(catalog.term_year, 2024);
        assert_eq!(catalog.list_price("Widget"), Some(Money::from_cents(1250)));

        let acme = catalog.customer("Acme").unwrap();
        assert_eq!(acme.envelopes_purchased, 10_000);
        assert_eq!(acme.default_assets[0].discount_percent.bps(), 250);
    }

    #[test]
    fn test_from_json_rejects_unknown_default_asset() {
        let json = r#"{
            "products": [{"name": "Widget", "listPrice": 1}],
            "customers": [{"name": "Acme", "contact": "X",
                "defaultAssets": [{"name": "Gadget", "quantity": 1}]}],
            "paymentTerms": ["Net 30"]
        }"#;
        assert!(matches!(
            Catalog::from_json(json),
            Err(CoreError::InvalidCatalog(_))
        ));
        assert!(Catalog::from_json("not json").is_err());
    }

    #[test]
    fn test_from_json_rejects_unsellable_products() {
        let catalog = |price: &str, quantity: &str| {
            format!(
                r#"{{
                    "products": [{{"name": "Widget", "listPrice": {price}}}],
                    "customers": [{{"name": "Acme", "contact": "X",
                        "defaultAssets": [{{"name": "Widget", "quantity": {quantity}}}]}}],
                    "paymentTerms": ["Net 30"]
                }}"#
            )
        };

        assert!(Catalog::from_json(&catalog("1", "1")).is_ok());
        for (price, quantity) in [("0", "1"), ("-2", "1"), ("2000000000", "1"), ("1", "1000001")] {
            assert!(
                matches!(
                    Catalog::from_json(&catalog(price, quantity)),
                    Err(CoreError::InvalidCatalog(_))
                ),
                "price {price} quantity {quantity}"
            );
        }
    }
}
