//! Generic sortable table used by the Users, Roles and Permissions tabs.
//!
//! A [`Column`] either reads one of the record's typed fields or derives its
//! text from the whole record. Only sortable field columns can drive a sort.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};

use crate::app::Theme;
use crate::model::Record;
use crate::sort::SortConfig;

pub const EMPTY_TEXT: &str = "No data available";

#[derive(Clone)]
pub enum Accessor<R: Record> {
    Field(R::Field),
    Derived(fn(&R) -> String),
}

#[derive(Clone)]
pub struct Column<R: Record> {
    pub header: &'static str,
    pub accessor: Accessor<R>,
    pub sortable: bool,
    pub width: Constraint,
}

impl<R: Record> Column<R> {
    /// Sortable column showing `field`.
    pub fn field(header: &'static str, field: R::Field, width: Constraint) -> Self {
        Self {
            header,
            accessor: Accessor::Field(field),
            sortable: true,
            width,
        }
    }

    /// Computed column; never sortable.
    pub fn derived(header: &'static str, render: fn(&R) -> String, width: Constraint) -> Self {
        Self {
            header,
            accessor: Accessor::Derived(render),
            sortable: false,
            width,
        }
    }

    pub fn unsortable(mut self) -> Self {
        self.sortable = false;
        self
    }

    /// The field a click on this header would sort by.
    pub fn sort_key(&self) -> Option<R::Field> {
        match (&self.accessor, self.sortable) {
            (Accessor::Field(field), true) => Some(*field),
            (Accessor::Field(_), false) | (Accessor::Derived(_), _) => None,
        }
    }

    pub fn cell(&self, record: &R) -> String {
        match &self.accessor {
            Accessor::Field(field) => record.value(*field).to_string(),
            Accessor::Derived(render) => render(record),
        }
    }

    /// Header text, with the direction arrow when this column is the active
    /// sort key.
    pub fn title(&self, sort: Option<SortConfig<R::Field>>) -> String {
        match (self.sort_key(), sort) {
            (Some(key), Some(cfg)) if cfg.key == key => {
                format!("{} {}", self.header, cfg.direction.arrow())
            }
            _ => self.header.to_string(),
        }
    }
}

/// Sort key of the column at `index`, if it is sortable.
pub fn sort_key_at<R: Record>(columns: &[Column<R>], index: usize) -> Option<R::Field> {
    columns.get(index).and_then(Column::sort_key)
}

pub fn first_sort_key<R: Record>(columns: &[Column<R>]) -> Option<R::Field> {
    columns.iter().find_map(Column::sort_key)
}

pub struct TableView<'a, R: Record> {
    pub title: String,
    pub columns: &'a [Column<R>],
    pub items: &'a [R],
    pub selected: usize,
    pub sort: Option<SortConfig<R::Field>>,
    pub loading: bool,
}

/// Render one page of `view.items` around the selection. Returns the
/// number of body rows that fit, for paging.
pub fn render_table<R: Record>(f: &mut Frame, area: Rect, view: TableView<'_, R>, theme: &Theme) -> usize {
    let title = if view.loading {
        format!("{} (loading...)", view.title)
    } else {
        view.title
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border));

    if view.items.is_empty() {
        let p = Paragraph::new(EMPTY_TEXT)
            .alignment(Alignment::Center)
            .style(Style::default().fg(theme.muted))
            .block(block);
        f.render_widget(p, area);
        return area.height.saturating_sub(3).max(1) as usize;
    }

    let rows_per_page = (area.height.saturating_sub(3) as usize).max(1);
    let start = (view.selected / rows_per_page) * rows_per_page;
    let end = (start + rows_per_page).min(view.items.len());

    let rows = view.items[start..end].iter().enumerate().map(|(i, item)| {
        let style = if start + i == view.selected {
            Style::default()
                .fg(theme.highlight_fg)
                .bg(theme.highlight_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.text)
        };
        Row::new(view.columns.iter().map(|c| Cell::from(c.cell(item)))).style(style)
    });

    let header = Row::new(view.columns.iter().map(|c| Cell::from(c.title(view.sort))))
        .style(Style::default().fg(theme.title).add_modifier(Modifier::BOLD));
    let widths: Vec<Constraint> = view.columns.iter().map(|c| c.width).collect();

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .column_spacing(1);
    f.render_widget(table, area);
    rows_per_page
}
