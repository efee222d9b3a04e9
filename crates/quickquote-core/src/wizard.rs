//! # Guided Entry
//!
//! Conversational wizard that adds one product at a time.
//!
//! ```text
//!   ChoosingProduct ──select──► EnteringQuantity ──n > 0──► EnteringDiscount
//!         ▲                          │  ▲                        │  ▲
//!         │                          └──┘ retry                  └──┘ retry
//!         │                                                      │ 0..=100
//!         └─────────────── restart (after reset delay) ◄──── Done ◄┘
//! ```
//!
//! The wizard owns no quote state. A successful run yields a
//! [`GuidedSelection`] that the caller feeds to
//! [`QuoteEditor::add_line_item`](crate::editor::QuoteEditor::add_line_item)
//! for the products section; timing of the restart is the caller's concern.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;
use ts_rs::TS;

use crate::catalog::Catalog;
use crate::types::{Discount, LineItemDraft};
use crate::validation::{parse_discount, parse_quantity};

pub const GREETING: &str = "Hi! I'm here to help you add products to your quick quote.";
pub const QUANTITY_RETRY: &str = "I need a valid number greater than 0. Could you please try again?";
pub const DISCOUNT_RETRY: &str =
    "I need a valid discount percentage between 0 and 100. Could you please try again?";
pub const NEXT_PRODUCT: &str = "What other product can I help you add to your quote?";
pub const PRODUCT_RETRY: &str = "Please pick one of the products listed.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub enum WizardStep {
    ChoosingProduct,
    EnteringQuantity,
    EnteringDiscount,
    Done,
}

/// What the user picked in one complete run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct GuidedSelection {
    pub name: String,
    pub quantity: i64,
    #[ts(type = "number")]
    pub discount_percent: Discount,
}

impl GuidedSelection {
    /// Draft for the products section; the editor fills in the list price.
    pub fn into_draft(self) -> LineItemDraft {
        LineItemDraft::new(self.name, self.quantity, self.discount_percent)
    }
}

/// The assistant's answer to one user action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct WizardReply {
    pub message: String,
    /// Clickable choices (product names) offered with the message.
    pub options: Vec<String>,
    pub step: WizardStep,
    /// Set on the reply that finishes a run.
    #[ts(optional)]
    pub completed: Option<GuidedSelection>,
}

#[derive(Debug, Clone)]
pub struct GuidedEntry {
    catalog: Arc<Catalog>,
    step: WizardStep,
    product: Option<String>,
    quantity: Option<i64>,
}

impl GuidedEntry {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        GuidedEntry {
            catalog,
            step: WizardStep::ChoosingProduct,
            product: None,
            quantity: None,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    /// Opening message with the product list.
    pub fn greeting(&self) -> WizardReply {
        self.reply(GREETING, self.catalog.product_names())
    }

    /// Picks a product. Only valid names from the catalog advance the flow.
    pub fn select_product(&mut self, name: &str) -> WizardReply {
        if self.step == WizardStep::Done {
            self.reset();
        }
        if self.step != WizardStep::ChoosingProduct || self.catalog.product(name).is_none() {
            return self.retry_for_step();
        }

        self.product = Some(name.to_string());
        self.step = WizardStep::EnteringQuantity;
        debug!(product = name, "Wizard product selected");

        let message = format!(
            "I would love to help you with {}! How many would you like? (Enter a number)",
            name
        );
        self.reply(message, Vec::new())
    }

    /// Feeds typed text to the current step.
    pub fn submit(&mut self, input: &str) -> WizardReply {
        match self.step {
            WizardStep::ChoosingProduct | WizardStep::Done => self.select_product(input.trim()),
            WizardStep::EnteringQuantity => match parse_quantity(input) {
                Ok(quantity) => {
                    self.quantity = Some(quantity);
                    self.step = WizardStep::EnteringDiscount;
                    self.reply(
                        "Great choice! What discount would you like me to apply? \
                         (Enter a percentage between 0-100)",
                        Vec::new(),
                    )
                }
                Err(_) => self.reply(QUANTITY_RETRY, Vec::new()),
            },
            WizardStep::EnteringDiscount => match parse_discount(input) {
                Ok(discount) => self.complete(discount),
                Err(_) => self.reply(DISCOUNT_RETRY, Vec::new()),
            },
        }
    }

    /// Returns to product choice; called once the reset delay has passed.
    pub fn restart(&mut self) -> WizardReply {
        self.reset();
        self.reply(NEXT_PRODUCT, self.catalog.product_names())
    }

    fn complete(&mut self, discount: Discount) -> WizardReply {
        let (Some(name), Some(quantity)) = (self.product.clone(), self.quantity) else {
            self.reset();
            return self.retry_for_step();
        };

        let list_price = self.catalog.list_price(&name).unwrap_or_default();
        self.step = WizardStep::Done;

        let message = format!(
            "Wonderful! I've added {} {} with a {} discount. The list price is {}. \
             Would you like me to help you add another product?",
            quantity, name, discount, list_price
        );
        debug!(product = %name, quantity, %discount, "Wizard run complete");

        let mut reply = self.reply(message, Vec::new());
        reply.completed = Some(GuidedSelection {
            name,
            quantity,
            discount_percent: discount,
        });
        reply
    }

    fn retry_for_step(&self) -> WizardReply {
        match self.step {
            WizardStep::EnteringQuantity => self.reply(QUANTITY_RETRY, Vec::new()),
            WizardStep::EnteringDiscount => self.reply(DISCOUNT_RETRY, Vec::new()),
            WizardStep::ChoosingProduct | WizardStep::Done => {
                self.reply(PRODUCT_RETRY, self.catalog.product_names())
            }
        }
    }

    fn reset(&mut self) {
        self.step = WizardStep::ChoosingProduct;
        self.product = None;
        self.quantity = None;
    }

    fn reply(&self, message: impl Into<String>, options: Vec<String>) -> WizardReply {
        WizardReply {
            message: message.into(),
            options,
            step: self.step,
            completed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wizard() -> GuidedEntry {
        GuidedEntry::new(Arc::new(Catalog::builtin()))
    }

    #[test]
    fn test_greeting_offers_products() {
        let reply = wizard().greeting();
        assert_eq!(reply.message, GREETING);
        assert_eq!(reply.options.len(), 6);
        assert_eq!(reply.step, WizardStep::ChoosingProduct);
    }

    #[test]
    fn test_full_run() {
        let mut w = wizard();
        let reply = w.select_product("ID Verification");
        assert!(reply.message.contains("ID Verification"));
        assert_eq!(w.step(), WizardStep::EnteringQuantity);

        w.submit("15");
        assert_eq!(w.step(), WizardStep::EnteringDiscount);

        let reply = w.submit("10");
        assert_eq!(w.step(), WizardStep::Done);
        assert!(reply.message.contains("$3.50"));
        let selection = reply.completed.unwrap();
        assert_eq!(selection.name, "ID Verification");
        assert_eq!(selection.quantity, 15);
        assert_eq!(selection.discount_percent, Discount::from_whole_percent(10));

        let draft = selection.into_draft();
        assert_eq!(draft.list_price, None);

        let reply = w.restart();
        assert_eq!(reply.message, NEXT_PRODUCT);
        assert_eq!(w.step(), WizardStep::ChoosingProduct);
    }

    #[test]
    fn test_invalid_quantity_stays() {
        let mut w = wizard();
        w.select_product("DocuSign Monitor");
        for input in ["0", "-3", "abc", ""] {
            let reply = w.submit(input);
            assert_eq!(reply.message, QUANTITY_RETRY);
            assert_eq!(w.step(), WizardStep::EnteringQuantity);
        }
    }

    #[test]
    fn test_invalid_discount_stays() {
        let mut w = wizard();
        w.select_product("DocuSign Monitor");
        w.submit("3");
        for input in ["101", "-1", "half"] {
            let reply = w.submit(input);
            assert_eq!(reply.message, DISCOUNT_RETRY);
            assert!(reply.completed.is_none());
            assert_eq!(w.step(), WizardStep::EnteringDiscount);
        }
        assert!(w.submit("100").completed.is_some());
    }

    #[test]
    fn test_unknown_product_is_retried() {
        let mut w = wizard();
        let reply = w.select_product("Gizmo");
        assert_eq!(reply.message, PRODUCT_RETRY);
        assert_eq!(w.step(), WizardStep::ChoosingProduct);
    }

    #[test]
    fn test_selecting_during_done_starts_new_run() {
        let mut w = wizard();
        w.select_product("DocuSign Retrieve");
        w.submit("1");
        w.submit("0");
        assert_eq!(w.step(), WizardStep::Done);

        w.submit("IAM for CX");
        assert_eq!(w.step(), WizardStep::EnteringQuantity);
    }
}
