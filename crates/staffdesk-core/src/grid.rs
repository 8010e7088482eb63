//! Paged, sortable, searchable table state.
//!
//! The grid owns its rows and its view state. Every mutation recomputes the
//! visible index list, so the renderer only reads.

use staffdesk_store::{Employee, LoginStatus};
use std::cmp::Ordering;

pub const DEFAULT_PAGE_LENGTH: usize = 8;

/// A row the grid can display.
pub trait GridRow {
    fn headers() -> &'static [&'static str];

    /// Display text of column `index`.
    fn cell(&self, index: usize) -> String;

    /// Ordering used when sorting by column `index`. Defaults to a
    /// case-insensitive comparison of the cell text.
    fn compare(&self, other: &Self, index: usize) -> Ordering {
        self.cell(index)
            .to_lowercase()
            .cmp(&other.cell(index).to_lowercase())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub column: usize,
    pub direction: SortDirection,
}

#[derive(Debug, Clone)]
pub struct DataGrid<R> {
    rows: Vec<R>,
    visible: Vec<usize>,
    search: String,
    sort: Option<SortState>,
    page: usize,
    page_length: usize,
    selected: usize,
}

impl<R: GridRow> DataGrid<R> {
    pub fn new(page_length: usize) -> Self {
        Self {
            rows: Vec::new(),
            visible: Vec::new(),
            search: String::new(),
            sort: None,
            page: 0,
            page_length: page_length.max(1),
            selected: 0,
        }
    }

    /// Replaces the row set, keeping search and sort.
    pub fn set_rows(&mut self, rows: Vec<R>) {
        self.rows = rows;
        self.refresh();
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
        self.page = 0;
        self.selected = 0;
        self.refresh();
    }

    pub fn push_search(&mut self, c: char) {
        let mut search = std::mem::take(&mut self.search);
        search.push(c);
        self.set_search(search);
    }

    pub fn pop_search(&mut self) {
        let mut search = std::mem::take(&mut self.search);
        search.pop();
        self.set_search(search);
    }

    pub fn sort(&self) -> Option<SortState> {
        self.sort
    }

    /// First call on a column sorts ascending, the next descending, and so on.
    pub fn sort_by(&mut self, column: usize) {
        if column >= R::headers().len() {
            return;
        }
        let direction = match self.sort {
            Some(SortState {
                column: current,
                direction: SortDirection::Ascending,
            }) if current == column => SortDirection::Descending,
            _ => SortDirection::Ascending,
        };
        self.sort = Some(SortState { column, direction });
        self.refresh();
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_length(&self) -> usize {
        self.page_length
    }

    pub fn page_count(&self) -> usize {
        self.visible.len().div_ceil(self.page_length).max(1)
    }

    pub fn next_page(&mut self) {
        if self.page + 1 < self.page_count() {
            self.page += 1;
            self.selected = 0;
        }
    }

    pub fn prev_page(&mut self) {
        if self.page > 0 {
            self.page -= 1;
            self.selected = 0;
        }
    }

    /// Rows of the current page, in display order.
    pub fn page_rows(&self) -> Vec<&R> {
        self.page_indices().iter().map(|&i| &self.rows[i]).collect()
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected_row(&self) -> Option<&R> {
        self.page_indices()
            .get(self.selected)
            .map(|&i| &self.rows[i])
    }

    /// Moves the selection down, continuing on the next page.
    pub fn select_next(&mut self) {
        let on_page = self.page_indices().len();
        if self.selected + 1 < on_page {
            self.selected += 1;
        } else if self.page + 1 < self.page_count() {
            self.page += 1;
            self.selected = 0;
        }
    }

    pub fn select_prev(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        } else if self.page > 0 {
            self.page -= 1;
            self.selected = self.page_indices().len().saturating_sub(1);
        }
    }

    pub fn filtered_len(&self) -> usize {
        self.visible.len()
    }

    pub fn total_len(&self) -> usize {
        self.rows.len()
    }

    /// `Showing 1 to 8 of 20 entries`, with a `(filtered from N total
    /// entries)` suffix while a search narrows the set.
    pub fn info(&self) -> String {
        let filtered = self.visible.len();
        let (from, to) = if filtered == 0 {
            (0, 0)
        } else {
            let from = self.page * self.page_length + 1;
            (from, (from + self.page_length - 1).min(filtered))
        };
        let mut info = format!("Showing {from} to {to} of {filtered} entries");
        if filtered != self.rows.len() {
            info.push_str(&format!(" (filtered from {} total entries)", self.rows.len()));
        }
        info
    }

    fn page_indices(&self) -> &[usize] {
        let start = (self.page * self.page_length).min(self.visible.len());
        let end = (start + self.page_length).min(self.visible.len());
        &self.visible[start..end]
    }

    fn refresh(&mut self) {
        let needle = self.search.trim().to_lowercase();
        let columns = R::headers().len();

        let mut visible: Vec<usize> = self
            .rows
            .iter()
            .enumerate()
            .filter(|(_, row)| {
                needle.is_empty()
                    || (0..columns).any(|c| row.cell(c).to_lowercase().contains(&needle))
            })
            .map(|(i, _)| i)
            .collect();

        if let Some(sort) = self.sort {
            let rows = &self.rows;
            visible.sort_by(|&a, &b| {
                let ord = rows[a].compare(&rows[b], sort.column);
                match sort.direction {
                    SortDirection::Ascending => ord,
                    SortDirection::Descending => ord.reverse(),
                }
            });
        }

        self.visible = visible;
        self.page = self.page.min(self.page_count() - 1);
        self.selected = self
            .selected
            .min(self.page_indices().len().saturating_sub(1));
    }
}

impl GridRow for Employee {
    fn headers() -> &'static [&'static str] {
        &["Code", "Name", "Email", "Department", "Role", "Login Status"]
    }

    fn cell(&self, index: usize) -> String {
        match index {
            0 => self.code().to_string(),
            1 => self.name.clone(),
            2 => self.email.clone(),
            3 => self.department.clone().unwrap_or_default(),
            4 => self.role.clone().unwrap_or_default(),
            5 => self
                .login_status
                .unwrap_or(LoginStatus::LoggedOut)
                .as_str()
                .to_string(),
            _ => String::new(),
        }
    }
}
