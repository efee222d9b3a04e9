//! # Quote Editor
//!
//! Working state of one quote and the derivation engine that keeps it
//! consistent.
//!
//! ## Editing Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Quote Editor                                    │
//! │                                                                         │
//! │  new(n) / open(quote)                                                  │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  ┌──────────────┐   select_customer    ┌──────────────────────────┐    │
//! │  │ customer info│ ───────────────────► │ seed contact + metrics   │    │
//! │  └──────────────┘                      │ seed current assets      │    │
//! │                                        └────────────┬─────────────┘    │
//! │  add / update / remove rows                         │                  │
//! │        │                                            ▼                  │
//! │        └──────────────► reprice row ──► auto-copy ──► gross new value  │
//! │                                                                         │
//! │  save() ──► validated Quote snapshot ──► QuoteStore                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every mutation either succeeds completely or returns an error and leaves
//! the editor untouched.
//!
//! ## Auto-copy
//! When the selected customer's consumption performance is above
//! [`AUTO_COPY_THRESHOLD`] and current assets exist, every current asset is
//! mirrored into products with its quantity grown by 30%. Rows produced this
//! way carry `autoCopied = true`; each regeneration drops the previous
//! auto-copied rows and appends fresh ones after the manual rows.

use chrono::{DateTime, NaiveDate, Utc};
use std::sync::Arc;
use tracing::debug;

use crate::catalog::Catalog;
use crate::collection::{estimate_id, parse_estimate_number};
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::pricing;
use crate::types::{
    LineItem, LineItemDraft, LineItemId, LineItemUpdate, Quote, Section, Term,
};
use crate::validation::{
    validate_add_list_price, validate_discount, validate_estimate_name, validate_list_price,
    validate_quantity,
};
use crate::AUTO_COPY_THRESHOLD;

/// Suggested estimate name for a customer and session counter.
pub fn suggested_estimate_name(customer: &str, number: u64) -> String {
    format!("{} - Estimate {}", customer, number)
}

/// Editor for a single quote.
#[derive(Debug, Clone)]
pub struct QuoteEditor {
    catalog: Arc<Catalog>,
    quote: Quote,
    estimate_number: u64,
    /// `createdAt` of the stored quote this editor was opened from.
    existing_created_at: Option<DateTime<Utc>>,
}

impl QuoteEditor {
    // =========================================================================
    // Construction
    // =========================================================================

    /// Starts a blank quote keyed `QQ<estimate_number>`.
    pub fn new(catalog: Arc<Catalog>, estimate_number: u64) -> Self {
        let now = Utc::now();
        let term = catalog.current_term();

        let quote = Quote {
            estimate_id: estimate_id(estimate_number),
            estimate_name: String::new(),
            customer_name: String::new(),
            customer_contact: String::new(),
            payment_terms: catalog.default_payment_terms().to_string(),
            start_date: term.start,
            end_date: term.end,
            current_assets: Vec::new(),
            products: Vec::new(),
            consumption_performance: 0,
            envelopes_purchased: crate::DEFAULT_ENVELOPES_PURCHASED,
            envelopes_sent: 0,
            gross_new_value: Money::zero(),
            created_at: now,
            last_modified: now,
        };

        debug!(estimate_id = %quote.estimate_id, "New quote");

        QuoteEditor {
            catalog,
            quote,
            estimate_number,
            existing_created_at: None,
        }
    }

    /// Loads a stored quote for editing.
    ///
    /// Cached fields are re-derived, usage metrics missing from older
    /// documents fall back to the customer lookup, and the auto-copy rule is
    /// applied. `lastModified` is kept until the first real edit. Fails when
    /// the stored rows do not price within `i64` cents.
    pub fn open(catalog: Arc<Catalog>, mut quote: Quote) -> CoreResult<Self> {
        let estimate_number = parse_estimate_number(&quote.estimate_id).unwrap_or(0);
        let existing_created_at = Some(quote.created_at);

        if quote.consumption_performance == 0 && quote.envelopes_sent == 0 {
            if let Some(profile) = catalog.customer(&quote.customer_name) {
                quote.consumption_performance = profile.consumption_performance;
                quote.envelopes_purchased = profile.envelopes_purchased;
                quote.envelopes_sent = profile.envelopes_sent;
            }
        }
        quote.rederive()?;

        let mut editor = QuoteEditor {
            catalog,
            quote,
            estimate_number,
            existing_created_at,
        };
        editor.apply_auto_copy()?;

        debug!(estimate_id = %editor.quote.estimate_id, "Opened quote");
        Ok(editor)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn quote(&self) -> &Quote {
        &self.quote
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn estimate_number(&self) -> u64 {
        self.estimate_number
    }

    /// True when editing a quote that was loaded from the store.
    pub fn is_existing(&self) -> bool {
        self.existing_created_at.is_some()
    }

    pub fn current_assets_total(&self) -> Money {
        self.quote.current_assets_total()
    }

    pub fn products_total(&self) -> Money {
        self.quote.products_total()
    }

    pub fn gross_new_value(&self) -> Money {
        self.quote.gross_new_value
    }

    // =========================================================================
    // Quote Fields
    // =========================================================================

    /// Selects a customer and seeds everything that depends on it.
    ///
    /// ## Effects
    /// - contact and usage metrics from the customer lookup
    /// - current assets replaced by the customer's default template (or cleared)
    /// - estimate name suggested from customer and counter
    /// - auto-copy re-evaluated
    pub fn select_customer(&mut self, name: &str) -> CoreResult<()> {
        let catalog = Arc::clone(&self.catalog);
        let profile = catalog
            .customer(name)
            .ok_or_else(|| CoreError::UnknownCustomer(name.to_string()))?;

        let term = catalog.current_term();
        let mut seeded = Vec::with_capacity(profile.default_assets.len());
        for template in &profile.default_assets {
            let list_price = catalog
                .list_price(&template.name)
                .ok_or_else(|| CoreError::UnknownProduct(template.name.clone()))?;
            seeded.push(LineItem::priced(
                template.name.clone(),
                template.quantity,
                list_price,
                template.discount_percent,
                term,
            )?);
        }

        let mut next = self.quote.clone();
        next.customer_name = profile.name.clone();
        next.customer_contact = profile.contact.clone();
        next.consumption_performance = profile.consumption_performance;
        next.envelopes_purchased = profile.envelopes_purchased;
        next.envelopes_sent = profile.envelopes_sent;
        next.current_assets = seeded;
        next.estimate_name = suggested_estimate_name(&profile.name, self.estimate_number);
        self.commit(next)?;

        debug!(
            customer = %profile.name,
            seeded_assets = self.quote.current_assets.len(),
            "Customer selected"
        );
        Ok(())
    }

    /// Sets the estimate name. Blank is allowed while editing; [`save`]
    /// rejects it.
    ///
    /// [`save`]: QuoteEditor::save
    pub fn set_estimate_name(&mut self, name: impl Into<String>) -> CoreResult<()> {
        let name = name.into();
        if !name.trim().is_empty() {
            validate_estimate_name(&name)?;
        }
        self.quote.estimate_name = name;
        self.touch();
        Ok(())
    }

    pub fn set_payment_terms(&mut self, terms: &str) -> CoreResult<()> {
        if !self.catalog.has_payment_terms(terms) {
            return Err(CoreError::UnknownPaymentTerms(terms.to_string()));
        }
        self.quote.payment_terms = terms.to_string();
        self.touch();
        Ok(())
    }

    /// Sets the quote's start and end date; `end` may not precede `start`.
    pub fn set_quote_dates(&mut self, start: NaiveDate, end: NaiveDate) -> CoreResult<()> {
        check_date_order(start, end)?;
        self.quote.start_date = start;
        self.quote.end_date = end;
        self.touch();
        Ok(())
    }

    /// Re-keys the quote as a new estimate.
    ///
    /// The new number is one past the current one, or `at_least` when that is
    /// larger, so callers can skip numbers already taken in the store. The
    /// re-keyed quote is new, so `createdAt` restarts. Returns the new
    /// estimate number.
    pub fn advance_estimate_number(&mut self, at_least: u64) -> u64 {
        self.estimate_number = (self.estimate_number + 1).max(at_least);
        self.quote.estimate_id = estimate_id(self.estimate_number);
        if !self.quote.customer_name.is_empty() {
            self.quote.estimate_name =
                suggested_estimate_name(&self.quote.customer_name, self.estimate_number);
        }
        self.existing_created_at = None;

        let now = Utc::now();
        self.quote.created_at = now;
        self.quote.last_modified = now;
        self.estimate_number
    }

    // =========================================================================
    // Line Items
    // =========================================================================

    /// Validates and appends a priced row; returns its id.
    ///
    /// The list price defaults from the catalog; dates default per section.
    pub fn add_line_item(&mut self, section: Section, draft: LineItemDraft) -> CoreResult<LineItemId> {
        if draft.name.trim().is_empty() {
            return Err(ValidationError::required("name").into());
        }
        let catalog_price = self
            .catalog
            .list_price(&draft.name)
            .ok_or_else(|| CoreError::UnknownProduct(draft.name.clone()))?;
        let list_price = draft.list_price.unwrap_or(catalog_price);

        validate_add_list_price(list_price)?;
        validate_quantity(draft.quantity)?;
        validate_discount(draft.discount_percent)?;

        let item = LineItem::priced(
            draft.name,
            draft.quantity,
            list_price,
            draft.discount_percent,
            self.catalog.term_for(section),
        )?;
        let id = item.id.clone();

        debug!(%section, name = %item.name, quantity = item.quantity, "Adding line item");
        let mut next = self.quote.clone();
        next.section_mut(section).push(item);
        self.commit(next)?;
        Ok(id)
    }

    /// Appends an unfilled placeholder row (no product, quantity 1, price 0).
    pub fn add_blank_row(&mut self, section: Section) -> CoreResult<LineItemId> {
        let item = LineItem::priced(
            String::new(),
            1,
            Money::zero(),
            Default::default(),
            self.catalog.term_for(section),
        )?;
        let id = item.id.clone();

        let mut next = self.quote.clone();
        next.section_mut(section).push(item);
        self.commit(next)?;
        Ok(id)
    }

    /// Applies a single-field edit to the row with `id`.
    ///
    /// Returns `Ok(false)` when no such row exists. Setting the name resets
    /// the list price from the catalog, and an empty name means price 0.
    pub fn update_line_item(
        &mut self,
        section: Section,
        id: &LineItemId,
        update: LineItemUpdate,
    ) -> CoreResult<bool> {
        let Some(index) = self.quote.section(section).iter().position(|i| &i.id == id) else {
            return Ok(false);
        };

        let mut next = self.quote.clone();
        let row = &mut next.section_mut(section)[index];
        match update {
            LineItemUpdate::Name(name) => {
                let list_price = if name.is_empty() {
                    Money::zero()
                } else {
                    self.catalog.list_price(&name).ok_or_else(|| {
                        ValidationError::NotAllowed {
                            field: "name".to_string(),
                            allowed: self.catalog.product_names(),
                        }
                    })?
                };
                row.name = name;
                row.list_price = list_price;
            }
            LineItemUpdate::Quantity(quantity) => {
                validate_quantity(quantity)?;
                row.quantity = quantity;
            }
            LineItemUpdate::Discount(discount) => {
                validate_discount(discount)?;
                row.discount_percent = discount;
            }
            LineItemUpdate::ListPrice(price) => {
                validate_list_price(price)?;
                row.list_price = price;
            }
            LineItemUpdate::StartDate(start) => {
                check_date_order(start, row.end_date)?;
                row.start_date = start;
            }
            LineItemUpdate::EndDate(end) => {
                check_date_order(row.start_date, end)?;
                row.end_date = end;
            }
        }
        row.reprice()?;

        self.commit(next)?;
        Ok(true)
    }

    /// Removes the row with `id`; returns whether a row was removed.
    pub fn remove_line_item(&mut self, section: Section, id: &LineItemId) -> CoreResult<bool> {
        if !self.quote.section(section).iter().any(|item| &item.id == id) {
            return Ok(false);
        }

        let mut next = self.quote.clone();
        next.section_mut(section).retain(|item| &item.id != id);
        self.commit(next)?;

        debug!(%section, %id, "Removed line item");
        Ok(true)
    }

    // =========================================================================
    // Derivation
    // =========================================================================

    /// Recomputes the gross new value from both sections.
    pub fn recompute_gross_new_value(&mut self) -> CoreResult<Money> {
        self.quote.gross_new_value =
            pricing::gross_new_value(&self.quote.products, &self.quote.current_assets)?;
        Ok(self.quote.gross_new_value)
    }

    /// Regenerates the auto-copied product rows if the rule applies.
    ///
    /// Returns `Ok(false)` (and changes nothing) when the customer is unset,
    /// consumption is at or below the threshold, or there are no current
    /// assets.
    pub fn apply_auto_copy(&mut self) -> CoreResult<bool> {
        let mut next = self.quote.clone();
        if !auto_copy(&self.catalog, &mut next)? {
            return Ok(false);
        }
        next.gross_new_value = pricing::gross_new_value(&next.products, &next.current_assets)?;
        self.quote = next;
        Ok(true)
    }

    /// Re-runs auto-copy and the gross new value on `next`, then makes it
    /// the working quote. On error the editor keeps its previous quote.
    fn commit(&mut self, mut next: Quote) -> CoreResult<()> {
        auto_copy(&self.catalog, &mut next)?;
        next.gross_new_value = pricing::gross_new_value(&next.products, &next.current_assets)?;
        next.last_modified = Utc::now();
        self.quote = next;
        Ok(())
    }

    fn touch(&mut self) {
        self.quote.last_modified = Utc::now();
    }

    // =========================================================================
    // Save
    // =========================================================================

    /// Builds the validated snapshot handed to the store.
    ///
    /// Customer name, contact and estimate name are required, and the
    /// estimate name is at most [`MAX_ESTIMATE_NAME_LEN`] characters. An
    /// opened quote keeps its original `createdAt`.
    ///
    /// [`MAX_ESTIMATE_NAME_LEN`]: crate::validation::MAX_ESTIMATE_NAME_LEN
    pub fn save(&self) -> CoreResult<Quote> {
        let required = [
            ("Customer Name", &self.quote.customer_name),
            ("Customer Contact", &self.quote.customer_contact),
            ("Estimate Name", &self.quote.estimate_name),
        ];
        let missing: Vec<String> = required
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(field, _)| field.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(ValidationError::MissingFields { fields: missing }.into());
        }
        validate_estimate_name(&self.quote.estimate_name)?;

        let mut snapshot = self.quote.clone();
        snapshot.gross_new_value =
            pricing::gross_new_value(&snapshot.products, &snapshot.current_assets)?;
        if let Some(created_at) = self.existing_created_at {
            snapshot.created_at = created_at;
        }
        Ok(snapshot)
    }
}

/// Replaces the auto-copied product rows of `quote` when the rule applies.
fn auto_copy(catalog: &Catalog, quote: &mut Quote) -> CoreResult<bool> {
    let applies = !quote.customer_name.is_empty()
        && quote.consumption_performance > AUTO_COPY_THRESHOLD
        && !quote.current_assets.is_empty();
    if !applies {
        return Ok(false);
    }

    let term: Term = catalog.renewal_term();
    let mut copies = Vec::with_capacity(quote.current_assets.len());
    for asset in &quote.current_assets {
        let mut copy = LineItem::priced(
            asset.name.clone(),
            pricing::grown_quantity(asset.quantity)?,
            asset.list_price,
            asset.discount_percent,
            term,
        )?;
        copy.auto_copied = Some(true);
        copies.push(copy);
    }

    quote.products.retain(|item| !item.is_auto_copied());
    quote.products.extend(copies);

    debug!(
        estimate_id = %quote.estimate_id,
        rows = quote.current_assets.len(),
        "Auto-copied current assets into products"
    );
    Ok(true)
}

fn check_date_order(start: NaiveDate, end: NaiveDate) -> CoreResult<()> {
    if end < start {
        return Err(ValidationError::InvalidFormat {
            field: "endDate".to_string(),
            reason: "must not be before startDate".to_string(),
        }
        .into());
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Discount;
    use crate::validation::{MAX_ESTIMATE_NAME_LEN, MAX_LIST_PRICE, MAX_QUANTITY};

    fn editor() -> QuoteEditor {
        QuoteEditor::new(Arc::new(Catalog::builtin()), 1)
    }

    fn assert_row_consistent(item: &LineItem) {
        assert_eq!(
            item.net_price,
            pricing::net_price(item.list_price, item.discount_percent)
        );
        assert_eq!(item.line_total, item.net_price * item.quantity);
    }

    fn assert_quote_consistent(quote: &Quote) {
        for item in quote.current_assets.iter().chain(&quote.products) {
            assert_row_consistent(item);
        }
        assert_eq!(
            quote.gross_new_value,
            quote.products_total() - quote.current_assets_total()
        );
    }

    #[test]
    fn test_new_quote_defaults() {
        let editor = editor();
        let quote = editor.quote();
        assert_eq!(quote.estimate_id, "QQ1");
        assert_eq!(quote.payment_terms, "Net 30");
        assert_eq!(quote.start_date.to_string(), "2024-01-01");
        assert_eq!(quote.envelopes_purchased, 10_000);
        assert!(!editor.is_existing());
    }

    #[test]
    fn test_select_bank_of_america_seeds_assets() {
        let mut editor = editor();
        editor.select_customer("Bank of America").unwrap();
        let quote = editor.quote();

        assert_eq!(quote.customer_contact, "Mike Trout");
        assert_eq!(quote.consumption_performance, 85);
        assert_eq!(quote.envelopes_sent, 8500);
        assert_eq!(quote.estimate_name, "Bank of America - Estimate 1");

        assert_eq!(quote.current_assets.len(), 2);
        let esig = &quote.current_assets[0];
        assert_eq!(esig.name, "eSignature Envelope Subs");
        assert_eq!(esig.quantity, 20);
        assert_eq!(esig.discount_percent, Discount::from_whole_percent(5));
        assert_eq!(esig.net_price.cents(), 475);
        assert_eq!(esig.line_total.cents(), 9500);
        let monitor = &quote.current_assets[1];
        assert_eq!(monitor.name, "DocuSign Monitor");
        assert_eq!(monitor.quantity, 10);
        assert_eq!(monitor.discount_percent, Discount::from_whole_percent(7));

        assert_quote_consistent(quote);
    }

    #[test]
    fn test_select_customer_without_template_clears_assets() {
        let mut editor = editor();
        editor.select_customer("Wells Fargo").unwrap();
        assert_eq!(editor.quote().current_assets.len(), 2);

        editor.select_customer("Chase").unwrap();
        assert!(editor.quote().current_assets.is_empty());
        assert_eq!(editor.quote().customer_contact, "Austin Riley");
    }

    #[test]
    fn test_unknown_customer_leaves_state() {
        let mut editor = editor();
        editor.select_customer("Chase").unwrap();
        let before = editor.quote().clone();

        let result = editor.select_customer("Acme");
        assert!(matches!(result, Err(CoreError::UnknownCustomer(_))));
        assert_eq!(editor.quote(), &before);
    }

    #[test]
    fn test_auto_copy_grows_quantities() {
        let mut editor = editor();
        editor.select_customer("Bank of America").unwrap();
        let products = &editor.quote().products;

        assert_eq!(products.len(), 2);
        assert!(products.iter().all(LineItem::is_auto_copied));
        assert_eq!(products[0].quantity, 26);
        assert_eq!(products[0].line_total.cents(), 475 * 26);
        assert_eq!(products[1].quantity, 13);
        assert_eq!(products[0].start_date.to_string(), "2025-01-01");
        assert_quote_consistent(editor.quote());
    }

    #[test]
    fn test_auto_copy_is_idempotent_and_keeps_manual_rows() {
        let mut editor = editor();
        editor.select_customer("Bank of America").unwrap();
        let manual = editor
            .add_line_item(
                Section::Products,
                LineItemDraft::new("IAM for Sales", 2, Discount::from_whole_percent(10)),
            )
            .unwrap();

        let values = |e: &QuoteEditor| -> Vec<(String, i64, i64)> {
            e.quote()
                .products
                .iter()
                .map(|p| (p.name.clone(), p.quantity, p.line_total.cents()))
                .collect()
        };

        let first = values(&editor);
        assert!(editor.apply_auto_copy().unwrap());
        assert!(editor.apply_auto_copy().unwrap());
        assert_eq!(values(&editor), first);

        let products = &editor.quote().products;
        assert_eq!(products.len(), 3);
        assert_eq!(products.iter().filter(|p| p.is_auto_copied()).count(), 2);
        assert!(products.iter().any(|p| p.id == manual && !p.is_auto_copied()));
    }

    #[test]
    fn test_auto_copy_skipped_below_threshold() {
        let mut editor = editor();
        editor.select_customer("Chase").unwrap(); // 60
        editor
            .add_line_item(
                Section::CurrentAssets,
                LineItemDraft::new("DocuSign Retrieve", 5, Discount::default()),
            )
            .unwrap();
        assert!(!editor.apply_auto_copy().unwrap());
        assert!(editor.quote().products.is_empty());
        assert_eq!(editor.gross_new_value().cents(), -1000);
    }

    #[test]
    fn test_asset_edits_regenerate_copies() {
        let mut editor = editor();
        editor.select_customer("Bank of America").unwrap();
        let id = editor.quote().current_assets[0].id.clone();

        let found = editor
            .update_line_item(Section::CurrentAssets, &id, LineItemUpdate::Quantity(10))
            .unwrap();
        assert!(found);
        assert_eq!(editor.quote().products[0].quantity, 13);

        assert!(editor.remove_line_item(Section::CurrentAssets, &id).unwrap());
        assert_eq!(editor.quote().products.len(), 1);
        assert_eq!(editor.quote().products[0].name, "DocuSign Monitor");
        assert_quote_consistent(editor.quote());
    }

    #[test]
    fn test_add_line_item_validation() {
        let mut editor = editor();

        let empty = editor.add_line_item(Section::Products, LineItemDraft::new("", 1, Discount::default()));
        assert!(matches!(
            empty,
            Err(CoreError::Validation(ValidationError::Required { .. }))
        ));

        let unknown =
            editor.add_line_item(Section::Products, LineItemDraft::new("Gizmo", 1, Discount::default()));
        assert!(matches!(unknown, Err(CoreError::UnknownProduct(_))));

        let zero_qty = editor.add_line_item(
            Section::Products,
            LineItemDraft::new("DocuSign Monitor", 0, Discount::default()),
        );
        assert!(zero_qty.is_err());

        let free = editor.add_line_item(
            Section::Products,
            LineItemDraft::new("DocuSign Monitor", 1, Discount::default())
                .with_list_price(Money::zero()),
        );
        assert!(free.is_err());

        let too_much = editor.add_line_item(
            Section::Products,
            LineItemDraft::new("DocuSign Monitor", 1, Discount::from_bps(10_001)),
        );
        assert!(too_much.is_err());

        assert!(editor.quote().products.is_empty());
    }

    #[test]
    fn test_add_line_item_prices_and_dates() {
        let mut editor = editor();
        let id = editor
            .add_line_item(
                Section::Products,
                LineItemDraft::new("eSignature Envelope Subs", 20, Discount::from_whole_percent(5)),
            )
            .unwrap();
        let item = &editor.quote().products[0];
        assert_eq!(item.id, id);
        assert_eq!(item.net_price.cents(), 475);
        assert_eq!(item.line_total.cents(), 9500);
        assert_eq!(item.end_date.to_string(), "2025-12-31");
        assert_eq!(editor.products_total().cents(), 9500);
        assert_eq!(editor.gross_new_value().cents(), 9500);
    }

    #[test]
    fn test_update_name_resets_price() {
        let mut editor = editor();
        let id = editor.add_blank_row(Section::Products).unwrap();
        assert!(editor.quote().products[0].list_price.is_zero());

        editor
            .update_line_item(
                Section::Products,
                &id,
                LineItemUpdate::Name("ID Verification".to_string()),
            )
            .unwrap();
        assert_eq!(editor.quote().products[0].list_price.cents(), 350);
        assert_eq!(editor.quote().products[0].line_total.cents(), 350);

        editor
            .update_line_item(Section::Products, &id, LineItemUpdate::Name(String::new()))
            .unwrap();
        assert!(editor.quote().products[0].list_price.is_zero());
        assert!(editor.quote().products[0].line_total.is_zero());

        let bad = editor.update_line_item(
            Section::Products,
            &id,
            LineItemUpdate::Name("Gizmo".to_string()),
        );
        assert!(bad.is_err());
    }

    #[test]
    fn test_update_rejects_invalid_values_without_change() {
        let mut editor = editor();
        let id = editor
            .add_line_item(
                Section::Products,
                LineItemDraft::new("DocuSign Monitor", 4, Discount::default()),
            )
            .unwrap();
        let before = editor.quote().products.clone();

        assert!(editor
            .update_line_item(Section::Products, &id, LineItemUpdate::Quantity(0))
            .is_err());
        assert!(editor
            .update_line_item(
                Section::Products,
                &id,
                LineItemUpdate::Discount(Discount::from_bps(20_000))
            )
            .is_err());
        assert!(editor
            .update_line_item(
                Section::Products,
                &id,
                LineItemUpdate::ListPrice(Money::from_cents(-5))
            )
            .is_err());
        assert_eq!(editor.quote().products, before);
    }

    #[test]
    fn test_update_and_remove_unknown_id_is_noop() {
        let mut editor = editor();
        let ghost = LineItemId::from("ghost");
        assert!(!editor
            .update_line_item(Section::Products, &ghost, LineItemUpdate::Quantity(3))
            .unwrap());
        assert!(!editor.remove_line_item(Section::Products, &ghost).unwrap());
    }

    #[test]
    fn test_update_list_price_and_discount_reprice() {
        let mut editor = editor();
        let id = editor
            .add_line_item(
                Section::CurrentAssets,
                LineItemDraft::new("DocuSign Retrieve", 10, Discount::default()),
            )
            .unwrap();
        editor
            .update_line_item(
                Section::CurrentAssets,
                &id,
                LineItemUpdate::ListPrice(Money::from_cents(400)),
            )
            .unwrap();
        editor
            .update_line_item(
                Section::CurrentAssets,
                &id,
                LineItemUpdate::Discount(Discount::from_whole_percent(25)),
            )
            .unwrap();

        let item = &editor.quote().current_assets[0];
        assert_eq!(item.net_price.cents(), 300);
        assert_eq!(item.line_total.cents(), 3000);
        assert_eq!(editor.gross_new_value().cents(), -3000);
    }

    #[test]
    fn test_row_dates_must_stay_ordered() {
        let mut editor = editor();
        let id = editor.add_blank_row(Section::Products).unwrap();
        let early = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        assert!(editor
            .update_line_item(Section::Products, &id, LineItemUpdate::EndDate(early))
            .is_err());
        let later = NaiveDate::from_ymd_opt(2026, 6, 30).unwrap();
        assert!(editor
            .update_line_item(Section::Products, &id, LineItemUpdate::EndDate(later))
            .unwrap());
    }

    #[test]
    fn test_payment_terms_and_dates() {
        let mut editor = editor();
        assert!(editor.set_payment_terms("Net 60").is_ok());
        assert!(matches!(
            editor.set_payment_terms("Net 90"),
            Err(CoreError::UnknownPaymentTerms(_))
        ));
        assert_eq!(editor.quote().payment_terms, "Net 60");

        let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert!(editor.set_quote_dates(start, end).is_err());
        assert!(editor.set_quote_dates(end, start).is_ok());
    }

    #[test]
    fn test_save_requires_fields() {
        let editor = editor();
        match editor.save() {
            Err(CoreError::Validation(ValidationError::MissingFields { fields })) => {
                assert_eq!(fields.len(), 3);
            }
            other => panic!("expected missing fields, got {:?}", other),
        }
    }

    #[test]
    fn test_save_snapshot() {
        let mut editor = editor();
        editor.select_customer("T-Mobile").unwrap();
        let quote = editor.save().unwrap();
        assert_eq!(quote.estimate_id, "QQ1");
        assert_eq!(quote.estimate_name, "T-Mobile - Estimate 1");
        assert_eq!(quote.customer_contact, "Pete Alonso");

        editor.set_estimate_name("").unwrap();
        assert!(editor.save().is_err());
    }

    #[test]
    fn test_open_preserves_created_at_and_rederives() {
        let mut source = editor();
        source.select_customer("Bank of America").unwrap();
        let mut stored = source.save().unwrap();
        let created = stored.created_at - chrono::Duration::days(3);
        stored.created_at = created;
        stored.current_assets[0].line_total = Money::from_cents(1);
        stored.gross_new_value = Money::zero();

        let mut editor = QuoteEditor::open(Arc::new(Catalog::builtin()), stored.clone()).unwrap();
        assert!(editor.is_existing());
        assert_eq!(editor.estimate_number(), 1);
        assert_eq!(editor.quote().last_modified, stored.last_modified);
        assert_quote_consistent(editor.quote());

        editor.set_estimate_name("Renewal").unwrap();
        let saved = editor.save().unwrap();
        assert_eq!(saved.created_at, created);
        assert!(saved.last_modified >= stored.last_modified);
    }

    #[test]
    fn test_open_fills_missing_metrics() {
        let mut source = editor();
        source.select_customer("Wells Fargo").unwrap();
        let mut stored = source.save().unwrap();
        stored.consumption_performance = 0;
        stored.envelopes_sent = 0;
        stored.products.clear();

        let editor = QuoteEditor::open(Arc::new(Catalog::builtin()), stored).unwrap();
        assert_eq!(editor.quote().consumption_performance, 90);
        assert_eq!(editor.quote().envelopes_sent, 9000);
        assert_eq!(editor.quote().products.len(), 2);
    }

    #[test]
    fn test_advance_estimate_number() {
        let mut editor = editor();
        editor.select_customer("Papa John's").unwrap();
        assert_eq!(editor.advance_estimate_number(0), 2);
        assert_eq!(editor.quote().estimate_id, "QQ2");
        assert_eq!(editor.quote().estimate_name, "Papa John's - Estimate 2");

        assert_eq!(editor.advance_estimate_number(7), 7);
        assert_eq!(editor.quote().estimate_id, "QQ7");
        assert_eq!(editor.quote().estimate_name, "Papa John's - Estimate 7");
    }

    #[test]
    fn test_advancing_opened_quote_starts_a_new_estimate() {
        let mut source = editor();
        source.select_customer("Chase").unwrap();
        let mut stored = source.save().unwrap();
        stored.created_at -= chrono::Duration::days(30);

        let mut editor = QuoteEditor::open(Arc::new(Catalog::builtin()), stored.clone()).unwrap();
        assert_eq!(editor.advance_estimate_number(3), 3);
        assert!(!editor.is_existing());

        let saved = editor.save().unwrap();
        assert_eq!(saved.estimate_id, "QQ3");
        assert!(saved.created_at > stored.created_at);
    }

    #[test]
    fn test_quantity_limit_on_add_and_update() {
        let mut editor = editor();
        let huge = editor.add_line_item(
            Section::Products,
            LineItemDraft::new("IAM for CX", i64::MAX, Discount::default()),
        );
        assert!(matches!(
            huge,
            Err(CoreError::Validation(ValidationError::OutOfRange { .. }))
        ));

        let id = editor
            .add_line_item(
                Section::Products,
                LineItemDraft::new("IAM for CX", MAX_QUANTITY, Discount::default()),
            )
            .unwrap();
        assert_eq!(
            editor.products_total().cents(),
            153_000 * MAX_QUANTITY
        );

        let before = editor.quote().clone();
        assert!(editor
            .update_line_item(Section::Products, &id, LineItemUpdate::Quantity(MAX_QUANTITY + 1))
            .is_err());
        assert!(editor
            .update_line_item(
                Section::Products,
                &id,
                LineItemUpdate::ListPrice(MAX_LIST_PRICE + Money::from_cents(1))
            )
            .is_err());
        assert_eq!(editor.quote(), &before);
    }

    #[test]
    fn test_asset_quantity_limit_with_auto_copy() {
        let mut editor = editor();
        editor.select_customer("Bank of America").unwrap();
        let id = editor.quote().current_assets[0].id.clone();
        let before = editor.quote().clone();

        assert!(editor
            .update_line_item(
                Section::CurrentAssets,
                &id,
                LineItemUpdate::Quantity(i64::MAX / 100)
            )
            .is_err());
        assert_eq!(editor.quote(), &before);

        editor
            .update_line_item(Section::CurrentAssets, &id, LineItemUpdate::Quantity(MAX_QUANTITY))
            .unwrap();
        assert_eq!(editor.quote().products[0].quantity, 1_300_000);
        assert_quote_consistent(editor.quote());
    }

    #[test]
    fn test_open_rejects_unpriceable_quote() {
        let mut source = editor();
        source.select_customer("Chase").unwrap();
        let mut stored = source.save().unwrap();
        let mut row = LineItem::priced(
            "IAM for CX",
            1,
            Money::from_cents(153_000),
            Discount::default(),
            Term::calendar_year(2025),
        )
        .unwrap();
        row.quantity = 9_000_000_000_000_000_000;
        stored.products.push(row);

        assert!(matches!(
            QuoteEditor::open(Arc::new(Catalog::builtin()), stored),
            Err(CoreError::Validation(ValidationError::OutOfRange { .. }))
        ));
    }

    #[test]
    fn test_estimate_name_length() {
        let mut editor = editor();
        editor.select_customer("Chase").unwrap();

        let long = "A".repeat(MAX_ESTIMATE_NAME_LEN + 1);
        assert!(matches!(
            editor.set_estimate_name(long.clone()),
            Err(CoreError::Validation(ValidationError::TooLong { .. }))
        ));
        assert_eq!(editor.quote().estimate_name, "Chase - Estimate 1");

        editor.quote.estimate_name = long;
        assert!(matches!(
            editor.save(),
            Err(CoreError::Validation(ValidationError::TooLong { .. }))
        ));
    }
}
