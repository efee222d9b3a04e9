//! # Config Commands
//!
//! Read-only configuration and catalog data for the front end.

use tracing::debug;

use quickquote_core::Catalog;

use crate::state::{ConfigState, SessionState};

/// Gets the current application configuration.
///
/// ## When Used
/// - Startup (currency display, storage key)
/// - Diagnostics
pub fn get_config(config: &ConfigState) -> ConfigState {
    debug!("get_config command");
    config.clone()
}

/// Customers, products and payment terms for pickers and dropdowns.
pub fn get_catalog(session: &SessionState) -> Catalog {
    debug!("get_catalog command");
    (**session.catalog()).clone()
}
