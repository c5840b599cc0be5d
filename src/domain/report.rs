//! Sales report model
//!
//! Publisher identifier resolution and the aligned text rendering of the
//! "sales by publisher" report. Nothing here touches the store.

use std::fmt;

use chrono::NaiveDateTime;

/// Separator placed between the rendered columns of a row
pub const COLUMN_SEPARATOR: &str = " | ";

/// Printed instead of a table when no sale matches the identifier
pub const NO_RECORDS_MESSAGE: &str = "No sales found for the given publisher.";

const COLUMN_COUNT: usize = 4;

/// Case handling for publisher name matching
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatchCase {
    #[default]
    Sensitive,
    Insensitive,
}

/// How a user-supplied identifier selects publishers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublisherSelector {
    /// Exact primary key match
    Id(i64),
    /// Substring of the publisher name
    NameContains { fragment: String, case: MatchCase },
}

impl PublisherSelector {
    /// Digits only means an id, anything else (including an empty string) a
    /// name fragment.
    pub fn parse(input: &str, case: MatchCase) -> Self {
        if !input.is_empty() && input.bytes().all(|b| b.is_ascii_digit()) {
            // Too many digits for any key: saturate so it matches nothing
            let id = input.parse::<i64>().unwrap_or(i64::MAX);
            return PublisherSelector::Id(id);
        }

        PublisherSelector::NameContains {
            fragment: input.to_string(),
            case,
        }
    }

    pub fn matches(&self, id: i32, name: &str) -> bool {
        match self {
            PublisherSelector::Id(wanted) => i64::from(id) == *wanted,
            PublisherSelector::NameContains {
                fragment,
                case: MatchCase::Sensitive,
            } => name.contains(fragment.as_str()),
            PublisherSelector::NameContains {
                fragment,
                case: MatchCase::Insensitive,
            } => name.to_lowercase().contains(&fragment.to_lowercase()),
        }
    }
}

impl fmt::Display for PublisherSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublisherSelector::Id(id) => write!(f, "id = {}", id),
            PublisherSelector::NameContains { fragment, case } => {
                let suffix = match case {
                    MatchCase::Sensitive => "",
                    MatchCase::Insensitive => " (ignoring case)",
                };
                write!(f, "name contains {:?}{}", fragment, suffix)
            }
        }
    }
}

/// Publisher matched by a selector
#[derive(Debug, Clone, PartialEq)]
pub struct PublisherRef {
    pub id: i32,
    pub name: String,
}

/// One sale reached through publisher -> book -> stock -> sale, with its shop
#[derive(Debug, Clone, PartialEq)]
pub struct SaleLine {
    pub sale_id: i32,
    pub title: String,
    pub shop: String,
    pub price: f64,
    pub count: i32,
    pub date_sale: NaiveDateTime,
}

impl SaleLine {
    /// Line-item total: unit price times copies sold
    pub fn amount(&self) -> f64 {
        self.price * f64::from(self.count)
    }

    fn cells(&self) -> [String; COLUMN_COUNT] {
        [
            self.title.clone(),
            self.shop.clone(),
            format_amount(self.amount()),
            self.date_sale.to_string(),
        ]
    }
}

// Shortest round-trip text, always with a fractional part ("30.0", "800.8")
fn format_amount(amount: f64) -> String {
    format!("{:?}", amount)
}

/// Result of one "sales by publisher" query
#[derive(Debug, Clone, PartialEq)]
pub struct SalesReport {
    pub selector: PublisherSelector,
    pub publishers: Vec<PublisherRef>,
    /// Ordered by sale date, then sale id
    pub lines: Vec<SaleLine>,
}

impl SalesReport {
    pub fn new(
        selector: PublisherSelector,
        publishers: Vec<PublisherRef>,
        lines: Vec<SaleLine>,
    ) -> Self {
        Self {
            selector,
            publishers,
            lines,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Rendered cells of every row, in report order
    pub fn rows(&self) -> Vec<[String; COLUMN_COUNT]> {
        self.lines.iter().map(SaleLine::cells).collect()
    }

    /// Width of each column: the longest rendered cell in it, in characters
    pub fn column_widths(&self) -> [usize; COLUMN_COUNT] {
        column_widths(&self.rows())
    }

    /// Aligned table, one line per sale, or the no-records message.
    pub fn render(&self) -> String {
        if self.is_empty() {
            return format!("{}\n", NO_RECORDS_MESSAGE);
        }

        let rows = self.rows();
        let widths = column_widths(&rows);

        let mut out = String::new();
        for row in &rows {
            let cells: Vec<String> = row
                .iter()
                .zip(widths)
                .map(|(cell, width)| format!("{:<width$}", cell, width = width))
                .collect();
            out.push_str(&cells.join(COLUMN_SEPARATOR));
            out.push('\n');
        }
        out
    }
}

impl fmt::Display for SalesReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

fn column_widths(rows: &[[String; COLUMN_COUNT]]) -> [usize; COLUMN_COUNT] {
    let mut widths = [0; COLUMN_COUNT];
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }
    widths
}
