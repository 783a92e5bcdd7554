//! Shared utilities for CLI commands

use tabled::{Table, builder::Builder, settings::Style};

use crate::cli::error::{CliError, CliResult};
use crate::table::TableView;

const MAX_CELL_WIDTH: usize = 30;

/// Truncate a string with ellipsis if it exceeds max length
pub fn truncate_with_ellipsis(s: &str, max: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}

/// Apply consistent table styling
pub fn apply_table_style(table: &mut Table) {
    table.with(Style::rounded());
}

/// Destructive commands need `--force`.
pub fn require_force(force: bool, action: &str) -> CliResult<()> {
    if force {
        Ok(())
    } else {
        Err(CliError::ConfirmationRequired {
            action: action.to_string(),
        })
    }
}

/// `1-5 of 12`, or `0 of 0` for an empty result.
pub fn format_range(range: Option<(u64, u64)>, total: u64) -> String {
    match range {
        Some((first, last)) => format!("{}-{} of {}", first, last, total),
        None => format!("0 of {}", total),
    }
}

/// Render a projected table: title, header row with the active sort arrow,
/// the rows, and a pagination footer.
pub fn render_table_view(view: &TableView<String>, empty_message: &str) -> String {
    let mut lines = vec![view.title.to_string()];

    if view.rows.is_empty() {
        lines.push(empty_message.to_string());
    } else {
        let mut builder = Builder::default();
        builder.push_record(view.headers.iter().map(|header| match header.direction {
            Some(direction) => format!("{} {}", header.title, direction.arrow()),
            None => header.title.clone(),
        }));
        for row in &view.rows {
            builder.push_record(
                row.cells
                    .iter()
                    .map(|cell| truncate_with_ellipsis(cell, MAX_CELL_WIDTH)),
            );
        }
        let mut table = builder.build();
        apply_table_style(&mut table);
        lines.push(table.to_string());
    }

    let pagination = &view.pagination;
    let sizes = pagination
        .page_sizes
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("/");
    lines.push(format!(
        "Rows per page: {} ({})  {}  Page {} of {}",
        pagination.page_size,
        sizes,
        format_range(pagination.item_range, pagination.total_items),
        pagination.display_page + 1,
        pagination.page_count.max(1),
    ));

    lines.join("\n")
}

#[cfg(test)]
#[path = "utils_test.rs"]
mod utils_test;
