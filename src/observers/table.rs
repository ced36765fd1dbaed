//! Table observer for pretty-printing counters.
//!
//! This module provides [`TableObserver`], which renders a collection of
//! [`Observable`] counters as a formatted ASCII table using the `tabled`
//! crate. Estimated values keep their `~` prefix so a reader can tell a
//! projection from an exact count at a glance.
//!
//! # Feature Flag
//!
//! This module requires the `table` feature:
//!
//! ```toml
//! [dependencies]
//! stocastico = { version = "0.3", features = ["table"] }
//! ```
//!
//! # Examples
//!
//! ## Standard format (vertical list)
//!
//! ```rust,ignore
//! use stocastico::counters::exact::Exact;
//! use stocastico::counters::scalable::Scalable;
//! use stocastico::counters::Observable;
//! use stocastico::observers::table::{TableObserver, TableStyle};
//!
//! let requests = Scalable::new(0.01).with_name("requests");
//! let errors = Exact::new().with_name("errors");
//!
//! let counters: Vec<&dyn Observable> = vec![&requests, &errors];
//!
//! let observer = TableObserver::new().with_style(TableStyle::Rounded);
//! println!("{}", observer.render(counters.into_iter()));
//! // ╭──────────┬────────┬──────────┬─────────╮
//! // │ Name     │ Labels │ Kind     │ Value   │
//! // ├──────────┼────────┼──────────┼─────────┤
//! // │ requests │        │ estimate │ ~998234 │
//! // │ errors   │        │ exact    │ 5       │
//! // ╰──────────┴────────┴──────────┴─────────╯
//! ```
//!
//! ## Compact format (multiple columns)
//!
//! ```rust,ignore
//! let observer = TableObserver::new().compact(true).columns(3);
//! println!("{}", observer.render(counters.into_iter()));
//! // ╭───────────────────┬───────────┬──────────────╮
//! // │ requests: ~998234 │ errors: 5 │ bytes: 2048  │
//! // ╰───────────────────┴───────────┴──────────────╯
//! ```

use crate::counters::Observable;
use tabled::{builder::Builder, settings::Style, Table, Tabled};

/// Available table styles for rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TableStyle {
    /// ASCII table with simple characters: +, -, |
    Ascii,
    /// Modern rounded corners (default)
    #[default]
    Rounded,
    /// Sharp corners with box-drawing characters
    Sharp,
    /// Modern style with clean lines
    Modern,
    /// GitHub-flavored Markdown table
    Markdown,
    /// Dots for borders
    Dots,
    /// No borders, just spacing
    Blank,
}

/// Separator style between name and value in compact mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CompactSeparator {
    /// Colon separator: "name: value"
    #[default]
    Colon,
    /// Equals separator: "name = value"
    Equals,
    /// Pipe separator: "name | value"
    Pipe,
    /// No separator, just space: "name value"
    Space,
}

impl CompactSeparator {
    /// Returns the separator string.
    pub fn as_str(&self) -> &'static str {
        match self {
            CompactSeparator::Colon => ": ",
            CompactSeparator::Equals => " = ",
            CompactSeparator::Pipe => " | ",
            CompactSeparator::Space => " ",
        }
    }
}

/// Configuration for the table observer.
#[derive(Debug, Clone)]
pub struct TableConfig {
    /// The style to use for rendering.
    pub style: TableStyle,
    /// Whether to show the header row (only in non-compact mode).
    pub show_header: bool,
    /// Custom title for the table (optional).
    pub title: Option<String>,
    /// Whether to use compact format (name: value in cells).
    pub compact: bool,
    /// Number of columns in compact mode (default: 1).
    pub columns: usize,
    /// Separator between name and value in compact mode.
    pub separator: CompactSeparator,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            style: TableStyle::default(),
            show_header: true,
            title: None,
            compact: false,
            columns: 1,
            separator: CompactSeparator::default(),
        }
    }
}

/// Internal row representation for tabled (standard mode).
#[derive(Tabled)]
struct CounterRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Labels")]
    labels: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Value")]
    value: String,
}

/// An observer that renders counters as a formatted ASCII table.
///
/// Supports two rendering modes:
///
/// 1. **Standard mode**: Name / Labels / Kind / Value columns, where Kind
///    distinguishes exact counts from projections
/// 2. **Compact mode**: Multi-column grid with "name: value" cells
#[derive(Debug, Clone, Default)]
pub struct TableObserver {
    config: TableConfig,
}

impl TableObserver {
    /// Creates a new table observer with default settings.
    ///
    /// Default style is [`TableStyle::Rounded`] in standard (non-compact) mode.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new table observer with the specified configuration.
    pub fn with_config(config: TableConfig) -> Self {
        Self { config }
    }

    /// Sets the table style.
    pub fn with_style(mut self, style: TableStyle) -> Self {
        self.config.style = style;
        self
    }

    /// Sets whether to show the header row.
    ///
    /// Only applies in standard (non-compact) mode.
    pub fn with_header(mut self, show: bool) -> Self {
        self.config.show_header = show;
        self
    }

    /// Sets an optional title printed above the table.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.config.title = Some(title.into());
        self
    }

    /// Enables or disables compact mode.
    ///
    /// In compact mode, counters are displayed as "name: value" cells
    /// arranged in a grid with the specified number of columns.
    pub fn compact(mut self, enabled: bool) -> Self {
        self.config.compact = enabled;
        self
    }

    /// Sets the number of columns in compact mode.
    ///
    /// Default is 1. Values less than 1 are treated as 1.
    pub fn columns(mut self, count: usize) -> Self {
        self.config.columns = count.max(1);
        self
    }

    /// Sets the separator between name and value in compact mode.
    pub fn separator(mut self, sep: CompactSeparator) -> Self {
        self.config.separator = sep;
        self
    }

    /// Applies the configured style to a table.
    fn apply_style(&self, table: &mut Table) {
        match self.config.style {
            TableStyle::Ascii => {
                table.with(Style::ascii());
            }
            TableStyle::Rounded => {
                table.with(Style::rounded());
            }
            TableStyle::Sharp => {
                table.with(Style::sharp());
            }
            TableStyle::Modern => {
                table.with(Style::modern());
            }
            TableStyle::Markdown => {
                table.with(Style::markdown());
            }
            TableStyle::Dots => {
                table.with(Style::dots());
            }
            TableStyle::Blank => {
                table.with(Style::blank());
            }
        }
    }

    /// Renders a counter name, falling back for unnamed counters.
    fn display_name(counter: &dyn Observable) -> String {
        if counter.name().is_empty() {
            "(unnamed)".to_string()
        } else {
            counter.name().to_string()
        }
    }

    /// Renders counters in compact mode (grid layout).
    fn render_compact<'a>(&self, counters: impl Iterator<Item = &'a dyn Observable>) -> String {
        let cells: Vec<String> = counters
            .map(|c| {
                format!(
                    "{}{}{}",
                    Self::display_name(c),
                    self.config.separator.as_str(),
                    c.value()
                )
            })
            .collect();

        if cells.is_empty() {
            return String::new();
        }

        let cols = self.config.columns;
        let mut builder = Builder::default();

        for chunk in cells.chunks(cols) {
            let mut row: Vec<String> = chunk.to_vec();
            // Pad the last row with empty cells
            while row.len() < cols {
                row.push(String::new());
            }
            builder.push_record(row);
        }

        let mut table = builder.build();
        self.apply_style(&mut table);

        match &self.config.title {
            Some(title) => format!("{}\n{}", title, table),
            None => table.to_string(),
        }
    }

    /// Renders counters in standard mode (four-column table).
    fn render_standard<'a>(&self, counters: impl Iterator<Item = &'a dyn Observable>) -> String {
        let rows: Vec<CounterRow> = counters
            .map(|c| {
                let value = c.value();
                let labels = c
                    .labels()
                    .iter()
                    .map(|(k, v)| format!("{}={}", k, v))
                    .collect::<Vec<_>>()
                    .join(",");
                CounterRow {
                    name: Self::display_name(c),
                    labels,
                    kind: if value.is_estimate() {
                        "estimate".to_string()
                    } else {
                        "exact".to_string()
                    },
                    value: value.to_string(),
                }
            })
            .collect();

        let mut table = Table::new(&rows);
        self.apply_style(&mut table);

        if !self.config.show_header {
            table.with(tabled::settings::Remove::row(
                tabled::settings::object::Rows::first(),
            ));
        }

        match &self.config.title {
            Some(title) => format!("{}\n{}", title, table),
            None => table.to_string(),
        }
    }

    /// Renders the counters as a formatted table string.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// use stocastico::counters::exact::Exact;
    /// use stocastico::counters::Observable;
    /// use stocastico::observers::table::TableObserver;
    ///
    /// let requests = Exact::new().with_name("requests");
    /// requests.add(100);
    ///
    /// let counters: Vec<&dyn Observable> = vec![&requests];
    ///
    /// // Standard mode
    /// let table = TableObserver::new().render(counters.iter().copied());
    ///
    /// // Compact mode with 2 columns
    /// let table = TableObserver::new()
    ///     .compact(true)
    ///     .columns(2)
    ///     .render(counters.iter().copied());
    /// ```
    pub fn render<'a>(&self, counters: impl Iterator<Item = &'a dyn Observable>) -> String {
        if self.config.compact {
            self.render_compact(counters)
        } else {
            self.render_standard(counters)
        }
    }
}
