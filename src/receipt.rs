//! Receipt

use std::{fmt::Write, io};

use jiff::Timestamp;
use smallvec::SmallVec;
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    menu::Menu,
    money::Money,
    orders::{Order, items::OrderItem},
};

/// Errors that can occur when writing a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// IO error
    #[error("IO error")]
    IO,
}

/// Printable summary of a placed order.
#[derive(Debug, Clone, Copy)]
pub struct Receipt<'a> {
    order: &'a Order,
}

impl<'a> Receipt<'a> {
    /// Receipt for `order`.
    pub fn new(order: &'a Order) -> Self {
        Self { order }
    }

    /// The order being described
    pub fn order(&self) -> &'a Order {
        self.order
    }

    /// Writes the receipt, using `menu` for display names.
    ///
    /// # Errors
    ///
    /// Returns an error if the receipt cannot be written.
    pub fn write_to(&self, mut out: impl io::Write, menu: &Menu) -> Result<(), ReceiptError> {
        let mut builder = Builder::default();

        builder.push_record([
            "", "Pizza", "Size", "Crust", "Extras", "Qty", "Unit Price", "Total",
        ]);

        let mut item_boundary_rows: SmallVec<[usize; 16]> = SmallVec::new();

        for (idx, item) in self.order.items().iter().enumerate() {
            // header is row 0
            item_boundary_rows.push(idx + 1);
            builder.push_record(item_cells(idx, item, menu));
        }

        write_receipt_table(&mut out, builder, &item_boundary_rows)?;
        write_receipt_summary(&mut out, self.order)
    }
}

fn item_cells(idx: usize, item: &OrderItem, menu: &Menu) -> [String; 8] {
    let name = menu
        .recipe(item.pizza_recipe_id())
        .map_or_else(|_err| item.pizza_recipe_id().to_string(), |recipe| recipe.name.clone());

    let extras = item
        .custom_ingredients()
        .iter()
        .map(|(id, portions)| {
            let name = menu
                .ingredient(id)
                .map_or_else(|_err| id.to_string(), |ingredient| ingredient.name.clone());

            format!("{name} ×{portions}")
        })
        .collect::<Vec<_>>()
        .join("\n");

    [
        format!("#{:<3}", idx + 1),
        name,
        item.size().to_string(),
        item.crust().to_string(),
        extras,
        item.quantity().to_string(),
        format!("{}", item.unit_price()),
        format!("{}", item.total_price()),
    ]
}

fn write_receipt_table(
    out: &mut impl io::Write,
    builder: Builder,
    item_boundary_rows: &[usize],
) -> Result<(), ReceiptError> {
    let mut table = builder.build();
    let mut theme = Theme::from(Style::modern_rounded());
    let separator = HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤'));

    theme.remove_horizontal_lines();

    for &row in item_boundary_rows {
        theme.insert_horizontal_line(row, separator);
    }

    table.with(theme);
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(5..8), Alignment::right());
    table.modify(Columns::new(2..5), color_dark_grey());

    let table_str = colorize_borders(&table.to_string());

    writeln!(out, "\n{table_str}").map_err(|_err| ReceiptError::IO)
}

fn write_receipt_summary(out: &mut impl io::Write, order: &Order) -> Result<(), ReceiptError> {
    let lines = [
        (" Subtotal:".to_string(), money_cell(order.subtotal())),
        (" Tax:".to_string(), money_cell(order.tax())),
        (" Delivery:".to_string(), money_cell(order.delivery_fee())),
        (
            " \x1b[1mTotal:\x1b[0m".to_string(),
            format!("\x1b[1m{}\x1b[0m  ", order.total_amount()),
        ),
        (" Status:".to_string(), format!("{}  ", order.status())),
        (" Payment:".to_string(), format!("{}  ", order.payment_status())),
        (
            " Ready by:".to_string(),
            order
                .estimated_delivery_time()
                .map_or_else(|| "-  ".to_string(), eta_cell),
        ),
    ];

    let label_width = lines
        .iter()
        .map(|(label, _)| visible_width(label))
        .max()
        .unwrap_or_default();

    let value_width = lines
        .iter()
        .map(|(_, value)| visible_width(value))
        .max()
        .unwrap_or_default();

    for (label, value) in &lines {
        write_summary_line(out, label, value, label_width, value_width)?;
    }

    writeln!(out).map_err(|_err| ReceiptError::IO)
}

fn money_cell(money: Money) -> String {
    format!("{money}  ")
}

fn eta_cell(at: Timestamp) -> String {
    format!("{}  ", at.strftime("%Y-%m-%d %H:%M UTC"))
}

/// Wraps runs of UTF-8 box-drawing characters in ANSI dark-grey escape codes.
///
/// Box-drawing characters occupy the Unicode range U+2500..U+257F.
fn colorize_borders(table: &str) -> String {
    let mut out = String::with_capacity(table.len() + 256);
    let mut in_run = false;

    for ch in table.chars() {
        let box_char = ('\u{2500}'..='\u{257F}').contains(&ch);

        if box_char && !in_run {
            _ = out.write_str("\x1b[90m");
            in_run = true;
        } else if !box_char && in_run {
            _ = out.write_str("\x1b[0m");
            in_run = false;
        }

        out.push(ch);
    }

    if in_run {
        _ = out.write_str("\x1b[0m");
    }

    out
}

/// Returns the visible (non-ANSI) width of a string.
fn visible_width(s: &str) -> usize {
    let mut width = 0usize;
    let mut in_escape = false;

    for ch in s.chars() {
        if in_escape {
            if ch.is_ascii_alphabetic() {
                in_escape = false;
            }
        } else if ch == '\x1b' {
            in_escape = true;
        } else {
            width += 1;
        }
    }

    width
}

/// Writes a summary line with a right-aligned label and a fixed-width value column.
fn write_summary_line(
    out: &mut impl io::Write,
    label: &str,
    value: &str,
    label_col_width: usize,
    value_col_width: usize,
) -> Result<(), ReceiptError> {
    let label_pad = label_col_width.saturating_sub(visible_width(label));
    let value_pad = value_col_width.saturating_sub(visible_width(value));

    writeln!(
        out,
        "{:>label_pad$}{label}  {value_pad}{value}",
        "",
        value_pad = " ".repeat(value_pad)
    )
    .map_err(|_err| ReceiptError::IO)
}

/// ANSI dark grey foreground.
fn color_dark_grey() -> Color {
    Color::new("\x1b[90m", "\x1b[0m")
}
