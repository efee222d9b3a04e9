//! Terminal rendering of the quote list and a single quote.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use quickquote_core::{LineItem, Money, Quote, QuoteSummary};

use crate::state::ConfigState;

/// One row per saved quote, most recent first.
pub fn render_quote_list(quotes: &[QuoteSummary], config: &ConfigState) -> String {
    if quotes.is_empty() {
        return "No saved quotes.".to_string();
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Estimate ID"),
        header_cell("Estimate Name"),
        header_cell("Customer"),
        header_cell("Contact"),
        header_cell("Total Net Price"),
        header_cell("Gross New Value"),
        header_cell("Last Modified"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 4, CellAlignment::Right);
    align_column(&mut table, 5, CellAlignment::Right);

    for quote in quotes {
        table.add_row(vec![
            Cell::new(&quote.estimate_id).add_attribute(Attribute::Bold),
            Cell::new(&quote.estimate_name),
            Cell::new(&quote.customer_name),
            Cell::new(&quote.customer_contact),
            Cell::new(config.format_money(quote.products_total)),
            money_cell(quote.gross_new_value, config),
            dim_cell(quote.last_modified.format("%Y-%m-%d %H:%M")),
        ]);
    }

    table.to_string()
}

/// Header fields followed by both line item sections and their totals.
pub fn render_quote(quote: &Quote, config: &ConfigState) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}  {}\n", quote.estimate_id, quote.estimate_name));
    out.push_str(&format!(
        "Customer: {} ({})\n",
        quote.customer_name, quote.customer_contact
    ));
    out.push_str(&format!(
        "Terms: {}   {} to {}\n",
        quote.payment_terms, quote.start_date, quote.end_date
    ));
    out.push_str(&format!(
        "Consumption: {}%   Envelopes: {} sent of {} purchased\n\n",
        quote.consumption_performance, quote.envelopes_sent, quote.envelopes_purchased
    ));

    out.push_str("Current Assets\n");
    out.push_str(&render_items(&quote.current_assets, config));
    out.push_str(&format!(
        "\nCurrent assets total: {}\n\n",
        config.format_money(quote.current_assets_total())
    ));

    out.push_str("Products\n");
    out.push_str(&render_items(&quote.products, config));
    out.push_str(&format!(
        "\nProducts total: {}\n",
        config.format_money(quote.products_total())
    ));
    out.push_str(&format!(
        "Gross new value: {}\n",
        config.format_money(quote.gross_new_value)
    ));
    out
}

fn render_items(items: &[LineItem], config: &ConfigState) -> String {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Product"),
        header_cell("Qty"),
        header_cell("List Price"),
        header_cell("Discount"),
        header_cell("Net Price"),
        header_cell("Total"),
        header_cell("Start"),
        header_cell("End"),
    ]);
    apply_table_style(&mut table);
    for column in 1..=5 {
        align_column(&mut table, column, CellAlignment::Right);
    }

    for item in items {
        let name = if item.name.is_empty() {
            dim_cell("(no product)")
        } else if item.is_auto_copied() {
            Cell::new(format!("{} (auto)", item.name)).fg(Color::DarkGrey)
        } else {
            Cell::new(&item.name)
        };
        table.add_row(vec![
            name,
            Cell::new(item.quantity),
            Cell::new(config.format_money(item.list_price)),
            Cell::new(item.discount_percent),
            Cell::new(config.format_money(item.net_price)),
            Cell::new(config.format_money(item.line_total)),
            dim_cell(item.start_date),
            dim_cell(item.end_date),
        ]);
    }

    table.to_string()
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn money_cell(value: Money, config: &ConfigState) -> Cell {
    let cell = Cell::new(config.format_money(value));
    if value.is_negative() {
        cell.fg(Color::Red)
    } else {
        cell.fg(Color::Green)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
