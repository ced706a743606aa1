/// First row to draw so that `selected_index` stays visible.
pub const fn scroll_offset(
    total_rows: usize,
    max_visible_rows: usize,
    selected_index: usize,
) -> usize {
    if total_rows <= max_visible_rows || selected_index < max_visible_rows {
        return 0;
    }

    selected_index + 1 - max_visible_rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_tables_never_scroll() {
        assert_eq!(scroll_offset(5, 10, 4), 0);
    }

    #[test]
    fn selection_stays_on_the_last_visible_row() {
        assert_eq!(scroll_offset(200, 10, 3), 0);
        assert_eq!(scroll_offset(200, 10, 10), 1);
        assert_eq!(scroll_offset(200, 10, 150), 141);
    }
}
