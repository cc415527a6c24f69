//! Paginated button grids.
//!
//! Discord allows at most five buttons per row and five rows per message, so a
//! soundboard with many sounds is spread over several messages. [`layout`] does the
//! arithmetic and nothing else: it never looks at the filesystem or at Discord types.

/// Buttons per action row.
pub const BUTTONS_PER_ROW: usize = 5;

/// Action rows per message.
pub const ROWS_PER_GRID: usize = 5;

/// One actionable button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    /// Text shown on the button
    pub label: String,
    /// Opaque token handed back when the button is pressed
    pub token: String,
}

/// One message worth of buttons, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    /// Rows of buttons; no row is empty
    pub rows: Vec<Vec<Button>>,
}

impl Grid {
    /// Number of buttons in the grid.
    #[must_use]
    pub fn button_count(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    /// Buttons in display order.
    pub fn buttons(&self) -> impl Iterator<Item = &Button> {
        self.rows.iter().flatten()
    }
}

/// A grid plus the text sent alongside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// 1-based position of this page
    pub number: usize,
    /// Total number of pages in the layout
    pub total: usize,
    /// Page indicator and scope label, if there is anything to say
    pub header: Option<String>,
    /// The buttons
    pub grid: Grid,
}

/// Result of laying out a list of buttons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Layout {
    /// Nothing to show; callers reply with a plain message instead of components.
    Empty,
    /// One or more pages, in order.
    Pages(Vec<Page>),
}

impl Layout {
    /// Number of pages (zero for [`Layout::Empty`]).
    #[must_use]
    pub fn page_count(&self) -> usize {
        match self {
            Self::Empty => 0,
            Self::Pages(pages) => pages.len(),
        }
    }
}

fn chunk<T>(items: Vec<T>, size: usize) -> Vec<Vec<T>> {
    let mut chunks = Vec::with_capacity(items.len().div_ceil(size));
    let mut iter = items.into_iter().peekable();
    while iter.peek().is_some() {
        chunks.push(iter.by_ref().take(size).collect());
    }
    chunks
}

/// Builds the header for page `number` of `total`.
///
/// The `i/N` indicator appears only when there is more than one page; the scope
/// label (a group name) is shown in brackets.
#[must_use]
pub fn page_header(number: usize, total: usize, scope: Option<&str>) -> Option<String> {
    let mut parts = Vec::new();
    if total > 1 {
        parts.push(format!("{number}/{total}"));
    }
    if let Some(scope) = scope {
        parts.push(format!("[{scope}]"));
    }
    (!parts.is_empty()).then(|| parts.join(" "))
}

/// Arranges `buttons` row-major into grids of at most `rows_per_grid` rows of at most
/// `buttons_per_row` buttons.
///
/// Input order is preserved and every grid but the last is full. Zero-sized dimensions
/// are treated as one. Each page carries a header from [`page_header`].
///
/// # Arguments
/// * `buttons` - Buttons in display order
/// * `buttons_per_row` - Width of an action row
/// * `rows_per_grid` - Action rows per message
/// * `scope` - Group name shown in every header, if the buttons belong to a group
///
/// # Returns
/// [`Layout::Empty`] for no buttons, otherwise the pages in order
pub fn layout<I>(
    buttons: I,
    buttons_per_row: usize,
    rows_per_grid: usize,
    scope: Option<&str>,
) -> Layout
where
    I: IntoIterator<Item = Button>,
{
    let buttons: Vec<Button> = buttons.into_iter().collect();
    if buttons.is_empty() {
        return Layout::Empty;
    }

    let rows = chunk(buttons, buttons_per_row.max(1));
    let grids = chunk(rows, rows_per_grid.max(1));
    let total = grids.len();

    Layout::Pages(
        grids
            .into_iter()
            .enumerate()
            .map(|(index, rows)| Page {
                number: index + 1,
                total,
                header: page_header(index + 1, total, scope),
                grid: Grid { rows },
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    fn buttons(n: usize) -> Vec<Button> {
        (0..n)
            .map(|i| Button {
                label: format!("s{i}"),
                token: format!("sound:s{i}"),
            })
            .collect()
    }

    fn pages(layout: Layout) -> Vec<Page> {
        match layout {
            Layout::Pages(pages) => pages,
            Layout::Empty => Vec::new(),
        }
    }

    #[test]
    fn test_zero_items_is_empty_marker() {
        let result = layout(buttons(0), BUTTONS_PER_ROW, ROWS_PER_GRID, None);
        assert_eq!(result, Layout::Empty);
        assert_eq!(result.page_count(), 0);
    }

    #[test]
    fn test_page_counts_and_packing() {
        for n in [1, 5, 6, 24, 25, 26, 49, 50, 51, 137] {
            let result = pages(layout(buttons(n), 5, 5, None));
            assert_eq!(result.len(), n.div_ceil(25), "n = {n}");

            for (i, page) in result.iter().enumerate() {
                assert!(page.grid.rows.len() <= 5);
                assert!(page.grid.rows.iter().all(|row| !row.is_empty() && row.len() <= 5));
                if i + 1 < result.len() {
                    assert_eq!(page.grid.button_count(), 25, "n = {n}, page {i}");
                }
            }

            let labels: Vec<&str> = result
                .iter()
                .flat_map(|page| page.grid.buttons())
                .map(|b| b.label.as_str())
                .collect();
            let expected: Vec<String> = (0..n).map(|i| format!("s{i}")).collect();
            assert_eq!(labels, expected.iter().map(String::as_str).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_rows_fill_before_grids() {
        let result = pages(layout(buttons(7), 3, 2, None));
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].grid.rows.len(), 2);
        assert_eq!(result[0].grid.rows[0].len(), 3);
        assert_eq!(result[0].grid.rows[1].len(), 3);
        assert_eq!(result[1].grid.rows.len(), 1);
        assert_eq!(result[1].grid.rows[0][0].label, "s6");
    }

    #[test]
    fn test_headers() {
        let single = pages(layout(buttons(3), 5, 5, None));
        assert_eq!(single[0].header, None);

        let single_scoped = pages(layout(buttons(3), 5, 5, Some("dj")));
        assert_eq!(single_scoped[0].header.as_deref(), Some("[dj]"));

        let multi = pages(layout(buttons(60), 5, 5, Some("dj")));
        let headers: Vec<&str> = multi.iter().filter_map(|p| p.header.as_deref()).collect();
        assert_eq!(headers, vec!["1/3 [dj]", "2/3 [dj]", "3/3 [dj]"]);
        assert_eq!(multi[2].number, 3);
        assert_eq!(multi[2].total, 3);

        let unscoped = pages(layout(buttons(26), 5, 5, None));
        assert_eq!(unscoped[1].header.as_deref(), Some("2/2"));
    }

    #[test]
    fn test_zero_dimensions_do_not_loop() {
        let result = pages(layout(buttons(3), 0, 0, None));
        assert_eq!(result.len(), 3);
        assert!(result.iter().all(|p| p.grid.button_count() == 1));
    }
}
