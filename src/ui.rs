use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::core::feed::FeedSnapshot;
use crate::core::price::{Karat, derive_prices};

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    Estimated,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::Estimated => style(text).red().bold(),
        StyleType::Subtle => style(text).dim(),
    };
    styled.to_string()
}

/// Creates a new `comfy_table::Table` with standard styling.
pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Creates a styled header cell for a table.
pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn price_cell(value: f64) -> Cell {
    Cell::new(format!("{value:.2}")).set_alignment(CellAlignment::Right)
}

/// Renders a snapshot as a price table with per-ounce, per-gram and
/// per-karat rows in both currencies.
pub fn render_snapshot(snapshot: &FeedSnapshot, base_currency: &str, local_currency: &str) -> String {
    let base = derive_prices(snapshot.spot.price_base);
    let local = derive_prices(snapshot.spot.price_local);

    let mut table = new_styled_table();
    table.set_header(vec![
        header_cell("Unit"),
        header_cell(base_currency),
        header_cell(local_currency),
    ]);

    table.add_row(vec![
        Cell::new("Troy ounce"),
        price_cell(base.per_ounce),
        price_cell(local.per_ounce),
    ]);
    table.add_row(vec![
        Cell::new("Gram"),
        price_cell(base.per_gram),
        price_cell(local.per_gram),
    ]);
    for karat in Karat::ALL {
        table.add_row(vec![
            Cell::new(format!("Gram {karat}")),
            price_cell(base.per_karat[&karat]),
            price_cell(local.per_karat[&karat]),
        ]);
    }

    let mut output = format!("{}\n\n", style_text("Gold Spot Price", StyleType::Title));
    output.push_str(&table.to_string());

    if snapshot.spot.synthetic {
        output.push_str(&format!(
            "\n\n{}",
            style_text(
                "Estimated prices: all sources were unavailable",
                StyleType::Estimated
            )
        ));
    }

    output.push_str(&format!(
        "\n\n{}",
        style_text(
            &format!(
                "1 {} = {:.4} {} (rate as of {}, quote as of {})",
                local_currency,
                snapshot.rate.rate,
                base_currency,
                snapshot.rate.fetched_at.format("%Y-%m-%d %H:%M UTC"),
                snapshot.spot.fetched_at.format("%Y-%m-%d %H:%M UTC"),
            ),
            StyleType::Subtle
        )
    ));

    output
}

/// Creates a new `indicatif` spinner with standard styling.
pub fn new_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

/// Prints a separator line matching the terminal width.
pub fn print_separator() {
    let term_width = console::Term::stdout()
        .size_checked()
        .map(|(_, w)| w as usize)
        .unwrap_or(80);
    println!("\n{}", "─".repeat(term_width));
}
