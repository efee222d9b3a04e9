//! # Domain Types
//!
//! Core domain types used throughout QuickQuote.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────────┐        ┌─────────────────────┐                │
//! │  │       Quote         │ 1    * │      LineItem       │                │
//! │  │  ─────────────────  │───────►│  ─────────────────  │                │
//! │  │  estimate_id (key)  │        │  id (UUID)          │                │
//! │  │  customer_name      │        │  name (catalog)     │                │
//! │  │  current_assets     │        │  quantity           │                │
//! │  │  products           │        │  list_price         │                │
//! │  │  gross_new_value    │        │  discount_percent   │                │
//! │  │  created_at         │        │  net_price    (der.)│                │
//! │  │  last_modified      │        │  line_total   (der.)│                │
//! │  └─────────────────────┘        └─────────────────────┘                │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Discount     │   │     Section     │   │      Term       │       │
//! │  │  bps (u32)      │   │  CurrentAssets  │   │  start..=end    │       │
//! │  │  500 = 5%       │   │  Products       │   │  (NaiveDate)    │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Document Compatibility
//! Field names serialize in camelCase. Legacy documents written by the
//! browser tool used `assets`, `assetName`, `discount`, `totalNetPrice` and
//! `gnacv`; those names are accepted as aliases when reading.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use ts_rs::TS;
use uuid::Uuid;

use crate::money::Money;
use crate::pricing;
use crate::validation::ValidationResult;

// =============================================================================
// Discount
// =============================================================================

/// Discount percentage represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01%, so 750 bps = 7.5%. Integer math keeps every entry
/// point (add form, table edit, wizard) pricing identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Discount(u32);

impl Discount {
    /// Upper bound: 100%.
    pub const MAX_BPS: u32 = 10_000;

    /// Creates a discount from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        Discount(bps)
    }

    /// Creates a discount from a whole percentage (5 → 5%).
    #[inline]
    pub const fn from_whole_percent(pct: u32) -> Self {
        Discount(pct * 100)
    }

    /// Converts a percentage, rejecting non-finite or out-of-range values.
    pub fn try_from_percentage(pct: f64) -> Option<Self> {
        if !pct.is_finite() || !(0.0..=100.0).contains(&pct) {
            return None;
        }
        Some(Discount((pct * 100.0).round() as u32))
    }

    /// Converts a percentage, clamping it into [0, 100].
    pub fn clamped_from_percentage(pct: f64) -> Self {
        if pct.is_nan() {
            return Discount(0);
        }
        Discount((pct.clamp(0.0, 100.0) * 100.0).round() as u32)
    }

    /// Returns the discount in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the discount as a percentage (for display and documents).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Discount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 % 100 == 0 {
            write!(f, "{}%", self.0 / 100)
        } else {
            write!(f, "{}.{:02}%", self.0 / 100, self.0 % 100)
        }
    }
}

/// Serialized as a JSON percentage number (`7.5`).
impl Serialize for Discount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.percentage())
    }
}

/// Out-of-range percentages in stored documents are clamped into [0, 100].
impl<'de> Deserialize<'de> for Discount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let pct = f64::deserialize(deserializer)?;
        match Discount::try_from_percentage(pct) {
            Some(discount) => Ok(discount),
            None => {
                tracing::warn!(discount = pct, "Clamping out-of-range discount from document");
                Ok(Discount::clamped_from_percentage(pct))
            }
        }
    }
}

// =============================================================================
// Line Item Identity
// =============================================================================

/// Identifier of a line item, unique within its quote.
///
/// New ids are UUID v4 strings. Legacy documents used numeric ids; those are
/// read back as their decimal text so they keep matching on update/remove.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, TS)]
#[ts(export)]
pub struct LineItemId(String);

impl LineItemId {
    /// Generates a fresh, never-before-used id.
    pub fn generate() -> Self {
        LineItemId(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LineItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LineItemId {
    fn from(value: &str) -> Self {
        LineItemId(value.to_string())
    }
}

impl From<String> for LineItemId {
    fn from(value: String) -> Self {
        LineItemId(value)
    }
}

impl<'de> Deserialize<'de> for LineItemId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct IdVisitor;

        impl serde::de::Visitor<'_> for IdVisitor {
            type Value = LineItemId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a string or numeric line item id")
            }

            fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<LineItemId, E> {
                Ok(LineItemId(v.to_string()))
            }

            fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<LineItemId, E> {
                Ok(LineItemId(v.to_string()))
            }

            fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<LineItemId, E> {
                Ok(LineItemId(v.to_string()))
            }

            fn visit_f64<E: serde::de::Error>(self, v: f64) -> Result<LineItemId, E> {
                Ok(LineItemId(v.to_string()))
            }
        }

        deserializer.deserialize_any(IdVisitor)
    }
}

// =============================================================================
// Section & Term
// =============================================================================

/// The two line item sections of a quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub enum Section {
    /// Existing subscriptions the customer already pays for.
    CurrentAssets,
    /// Newly quoted products (manual and auto-copied rows).
    Products,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Section::CurrentAssets => f.write_str("current assets"),
            Section::Products => f.write_str("products"),
        }
    }
}

/// A subscription term (inclusive date range).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Term {
    #[ts(as = "String")]
    pub start: NaiveDate,
    #[ts(as = "String")]
    pub end: NaiveDate,
}

impl Term {
    /// The calendar year `year`, January 1st through December 31st.
    ///
    /// Falls back to chrono's minimum date for years outside its range.
    pub fn calendar_year(year: i32) -> Self {
        Term {
            start: NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or(NaiveDate::MIN),
            end: NaiveDate::from_ymd_opt(year, 12, 31).unwrap_or(NaiveDate::MIN),
        }
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// One row of quantity/price/discount data in either section.
///
/// `net_price` and `line_total` are caches of [`pricing::net_price`] and
/// [`pricing::line_total`]; every mutation of their inputs goes through
/// [`LineItem::reprice`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub id: LineItemId,

    /// Catalog product name; empty while a placeholder row is unfilled.
    #[serde(alias = "assetName", default)]
    pub name: String,

    pub quantity: i64,

    #[ts(type = "number")]
    pub list_price: Money,

    #[serde(alias = "discount", default)]
    #[ts(type = "number")]
    pub discount_percent: Discount,

    #[serde(default)]
    #[ts(type = "number")]
    pub net_price: Money,

    #[serde(alias = "totalNetPrice", default)]
    #[ts(type = "number")]
    pub line_total: Money,

    #[ts(as = "String")]
    pub start_date: NaiveDate,

    #[ts(as = "String")]
    pub end_date: NaiveDate,

    /// Set on product rows generated by the auto-copy rule.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub auto_copied: Option<bool>,
}

impl LineItem {
    /// Builds a fully priced row with a fresh id.
    ///
    /// Fails when the line total does not fit in `i64` cents.
    pub fn priced(
        name: impl Into<String>,
        quantity: i64,
        list_price: Money,
        discount: Discount,
        term: Term,
    ) -> ValidationResult<Self> {
        let mut item = LineItem {
            id: LineItemId::generate(),
            name: name.into(),
            quantity,
            list_price,
            discount_percent: discount,
            net_price: Money::zero(),
            line_total: Money::zero(),
            start_date: term.start,
            end_date: term.end,
            auto_copied: None,
        };
        item.reprice()?;
        Ok(item)
    }

    /// Recomputes the derived `net_price` and `line_total`.
    ///
    /// On error the row is left as it was.
    pub fn reprice(&mut self) -> ValidationResult<()> {
        let net_price = pricing::net_price(self.list_price, self.discount_percent);
        self.line_total = pricing::line_total(net_price, self.quantity)?;
        self.net_price = net_price;
        Ok(())
    }

    /// True when the row was produced by the auto-copy rule.
    #[inline]
    pub fn is_auto_copied(&self) -> bool {
        self.auto_copied == Some(true)
    }
}

/// Input for adding a line item through a form, the wizard, or any other
/// external submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineItemDraft {
    pub name: String,
    pub quantity: i64,
    /// Overrides the catalog list price when set.
    #[serde(default)]
    #[ts(type = "number | null")]
    pub list_price: Option<Money>,
    #[serde(default)]
    #[ts(type = "number")]
    pub discount_percent: Discount,
}

impl LineItemDraft {
    pub fn new(name: impl Into<String>, quantity: i64, discount: Discount) -> Self {
        LineItemDraft {
            name: name.into(),
            quantity,
            list_price: None,
            discount_percent: discount,
        }
    }

    pub fn with_list_price(mut self, list_price: Money) -> Self {
        self.list_price = Some(list_price);
        self
    }
}

/// A single-field edit of an existing row (table cell edit).
///
/// Wire form: `{"field": "quantity", "value": 12}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum LineItemUpdate {
    /// Also resets the list price to the catalog default.
    Name(String),
    Quantity(i64),
    Discount(Discount),
    ListPrice(Money),
    StartDate(NaiveDate),
    EndDate(NaiveDate),
}

// =============================================================================
// Quote
// =============================================================================

/// A saved (or about to be saved) quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    /// Store key, `QQ<n>`.
    pub estimate_id: String,
    pub estimate_name: String,
    pub customer_name: String,
    pub customer_contact: String,
    pub payment_terms: String,

    #[ts(as = "String")]
    pub start_date: NaiveDate,
    #[ts(as = "String")]
    pub end_date: NaiveDate,

    #[serde(alias = "assets", default)]
    pub current_assets: Vec<LineItem>,
    #[serde(default)]
    pub products: Vec<LineItem>,

    #[serde(default)]
    pub consumption_performance: u32,
    #[serde(default)]
    pub envelopes_purchased: u64,
    #[serde(default)]
    pub envelopes_sent: u64,

    /// Products total minus current assets total.
    #[serde(alias = "gnacv", default)]
    #[ts(type = "number")]
    pub gross_new_value: Money,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub last_modified: DateTime<Utc>,
}

impl Quote {
    /// Items of one section.
    pub fn section(&self, section: Section) -> &[LineItem] {
        match section {
            Section::CurrentAssets => &self.current_assets,
            Section::Products => &self.products,
        }
    }

    pub fn section_mut(&mut self, section: Section) -> &mut Vec<LineItem> {
        match section {
            Section::CurrentAssets => &mut self.current_assets,
            Section::Products => &mut self.products,
        }
    }

    /// Sum of product line totals ("Total Net Price" on the list view).
    pub fn products_total(&self) -> Money {
        pricing::section_total(&self.products)
    }

    pub fn current_assets_total(&self) -> Money {
        pricing::section_total(&self.current_assets)
    }

    /// Re-derives every cached field from its inputs.
    ///
    /// Used when a document is loaded, so stale or hand-edited caches never
    /// leak into totals. Fails when a line total or the gross new value does
    /// not fit; the quote should then be discarded.
    pub fn rederive(&mut self) -> ValidationResult<()> {
        for item in self.current_assets.iter_mut().chain(self.products.iter_mut()) {
            item.reprice()?;
        }
        self.gross_new_value = pricing::gross_new_value(&self.products, &self.current_assets)?;
        Ok(())
    }
}

/// One row of the quote list view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct QuoteSummary {
    pub estimate_id: String,
    pub estimate_name: String,
    pub customer_name: String,
    pub customer_contact: String,
    #[ts(type = "number")]
    pub products_total: Money,
    #[ts(type = "number")]
    pub gross_new_value: Money,
    #[ts(as = "String")]
    pub last_modified: DateTime<Utc>,
}

impl From<&Quote> for QuoteSummary {
    fn from(quote: &Quote) -> Self {
        QuoteSummary {
            estimate_id: quote.estimate_id.clone(),
            estimate_name: quote.estimate_name.clone(),
            customer_name: quote.customer_name.clone(),
            customer_contact: quote.customer_contact.clone(),
            products_total: quote.products_total(),
            gross_new_value: quote.gross_new_value,
            last_modified: quote.last_modified,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
