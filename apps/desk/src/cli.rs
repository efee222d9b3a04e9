//! CLI argument definitions for the `quickquote` binary.

use std::str::FromStr;

use clap::{Parser, Subcommand};

use quickquote_core::validation::{parse_discount, parse_quantity};
use quickquote_core::{Discount, LineItemDraft};

#[derive(Parser)]
#[command(
    name = "quickquote",
    version,
    about = "QuickQuote - Build, save and review customer quotes",
    long_about = "Build customer quotes from current assets and new products.\n\n\
                  Quotes are stored in a local SQLite file; set QUICKQUOTE_DB_PATH\n\
                  to choose where."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Keep quotes in memory only (nothing is written to disk).
    #[arg(long, global = true)]
    pub ephemeral: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// List saved quotes, most recently modified first.
    List,

    /// Show one saved quote with its line items.
    Show {
        /// Estimate id, e.g. QQ3.
        #[arg(value_name = "ESTIMATE_ID")]
        id: String,
    },

    /// Delete a saved quote.
    Delete {
        #[arg(value_name = "ESTIMATE_ID")]
        id: String,
    },

    /// Create and save a quote in one step.
    New(NewArgs),

    /// Add products interactively, one question at a time.
    Wizard(WizardArgs),
}

#[derive(Parser)]
pub struct NewArgs {
    /// Customer to quote (seeds contact and current assets).
    #[arg(long)]
    pub customer: String,

    /// Estimate name (default: "<customer> - Estimate <n>").
    #[arg(long)]
    pub name: Option<String>,

    /// Payment terms, e.g. "Net 30".
    #[arg(long)]
    pub terms: Option<String>,

    /// Product to add as NAME=QTY[@DISCOUNT]; repeatable.
    #[arg(long = "product", value_name = "NAME=QTY[@DISCOUNT]")]
    pub products: Vec<ProductArg>,
}

#[derive(Parser)]
pub struct WizardArgs {
    /// Customer for a new quote.
    #[arg(long, conflicts_with = "open")]
    pub customer: Option<String>,

    /// Estimate id of a saved quote to add products to.
    #[arg(long, value_name = "ESTIMATE_ID")]
    pub open: Option<String>,
}

/// `--product "DocuSign Retrieve=5@10"`
#[derive(Debug, Clone, PartialEq)]
pub struct ProductArg {
    pub name: String,
    pub quantity: i64,
    pub discount: Discount,
}

impl ProductArg {
    pub fn into_draft(self) -> LineItemDraft {
        LineItemDraft::new(self.name, self.quantity, self.discount)
    }
}

impl FromStr for ProductArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, rest) = s
            .rsplit_once('=')
            .ok_or_else(|| format!("expected NAME=QTY[@DISCOUNT], got '{}'", s))?;
        let name = name.trim();
        if name.is_empty() {
            return Err("product name is empty".to_string());
        }

        let (quantity, discount) = match rest.split_once('@') {
            Some((qty, disc)) => (qty, Some(disc)),
            None => (rest, None),
        };
        let quantity = parse_quantity(quantity).map_err(|e| e.to_string())?;
        let discount = match discount {
            Some(disc) => parse_discount(disc).map_err(|e| e.to_string())?,
            None => Discount::default(),
        };

        Ok(ProductArg {
            name: name.to_string(),
            quantity,
            discount,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_product_arg_parsing() {
        let arg: ProductArg = "DocuSign Retrieve=5@10".parse().unwrap();
        assert_eq!(arg.name, "DocuSign Retrieve");
        assert_eq!(arg.quantity, 5);
        assert_eq!(arg.discount, Discount::from_whole_percent(10));

        let arg: ProductArg = "ID Verification=2".parse().unwrap();
        assert_eq!(arg.discount, Discount::default());

        let arg: ProductArg = "ID Verification = 3 @ 12.5%".parse().unwrap();
        assert_eq!(arg.quantity, 3);
        assert_eq!(arg.discount, Discount::from_bps(1_250));
    }

    #[test]
    fn test_product_arg_rejects_bad_input() {
        assert!("ID Verification".parse::<ProductArg>().is_err());
        assert!("=5".parse::<ProductArg>().is_err());
        assert!("ID Verification=0".parse::<ProductArg>().is_err());
        assert!("ID Verification=2@150".parse::<ProductArg>().is_err());
    }

    #[test]
    fn test_wizard_flags_conflict() {
        let parsed = Cli::try_parse_from([
            "quickquote",
            "wizard",
            "--customer",
            "Chase",
            "--open",
            "QQ1",
        ]);
        assert!(parsed.is_err());

        let parsed = Cli::try_parse_from(["quickquote", "--ephemeral", "list"]).unwrap();
        assert!(parsed.ephemeral);
        assert!(matches!(parsed.command, Command::List));
    }
}
