//! Derived display state for the checklist screen.
//!
//! Everything here is a pure function of the full item list; counts are
//! recomputed on every call and never cached.

use crate::model::item::Item;
use serde::Serialize;

/// Header label used when the caller does not configure one.
pub const DEFAULT_HEADER_LABEL: &str = "Grocery";
/// Message shown in place of rows while the store holds no items.
pub const EMPTY_STATE_MESSAGE: &str = "No items yet. Add one above.";

/// Number of items not yet completed.
pub fn uncompleted_count(items: &[Item]) -> usize {
    items.iter().filter(|item| item.is_pending()).count()
}

/// Number of items in the store, independent of any filter.
pub fn total_count(items: &[Item]) -> usize {
    items.len()
}

/// Items to render, preserving input order.
pub fn visible_items(items: &[Item], show_completed: bool) -> Vec<Item> {
    items
        .iter()
        .filter(|item| show_completed || item.is_pending())
        .cloned()
        .collect()
}

/// Aggregate header text, e.g. `Grocery: 2: 5`.
pub fn header_text(label: &str, uncompleted: usize, total: usize) -> String {
    format!("{label}: {uncompleted}: {total}")
}

/// Which delete gestures a row offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RowAffordances {
    pub inline_delete: bool,
    pub swipe_delete: bool,
}

impl RowAffordances {
    pub fn for_swipe_mode(swipe_to_delete_is_on: bool) -> Self {
        Self {
            inline_delete: !swipe_to_delete_is_on,
            swipe_delete: swipe_to_delete_is_on,
        }
    }
}

/// Everything the presentation layer needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChecklistView {
    /// Rendered sequence: filtered by `show_completed`, newest first.
    pub rows: Vec<Item>,
    pub uncompleted_count: usize,
    pub total_count: usize,
    pub header: String,
    pub affordances: RowAffordances,
    pub show_completed: bool,
    pub swipe_to_delete_is_on: bool,
    /// A "Delete All" request is waiting for confirmation.
    pub pending_delete_all: bool,
    /// Set only when the store itself is empty.
    pub empty_message: Option<String>,
}

/// Inputs to [`ChecklistView::build`] besides the items themselves.
#[derive(Debug, Clone, Copy)]
pub struct ViewOptions<'a> {
    pub header_label: &'a str,
    pub show_completed: bool,
    pub swipe_to_delete_is_on: bool,
    pub pending_delete_all: bool,
}

impl ChecklistView {
    pub fn build(items: &[Item], options: ViewOptions<'_>) -> Self {
        let uncompleted = uncompleted_count(items);
        let total = total_count(items);

        Self {
            rows: visible_items(items, options.show_completed),
            uncompleted_count: uncompleted,
            total_count: total,
            header: header_text(options.header_label, uncompleted, total),
            affordances: RowAffordances::for_swipe_mode(options.swipe_to_delete_is_on),
            show_completed: options.show_completed,
            swipe_to_delete_is_on: options.swipe_to_delete_is_on,
            pending_delete_all: options.pending_delete_all,
            empty_message: items
                .is_empty()
                .then(|| EMPTY_STATE_MESSAGE.to_string()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total_count == 0
    }
}

#[cfg(test)]
mod tests {
    use super::{
        header_text, total_count, uncompleted_count, visible_items, ChecklistView,
        RowAffordances, ViewOptions, DEFAULT_HEADER_LABEL,
    };
    use crate::model::item::Item;

    fn sample() -> Vec<Item> {
        let mut done = Item::new("Bread");
        done.complete = true;
        vec![Item::new("Milk"), done, Item::new("Eggs")]
    }

    fn options(show_completed: bool) -> ViewOptions<'static> {
        ViewOptions {
            header_label: DEFAULT_HEADER_LABEL,
            show_completed,
            swipe_to_delete_is_on: false,
            pending_delete_all: false,
        }
    }

    #[test]
    fn counts_ignore_the_visibility_filter() {
        let items = sample();
        assert_eq!(uncompleted_count(&items), 2);
        assert_eq!(total_count(&items), 3);
        assert_eq!(visible_items(&items, false).len(), 2);
        assert_eq!(visible_items(&items, true).len(), 3);
    }

    #[test]
    fn hidden_rows_are_exactly_the_non_pending_ones() {
        let items = sample();
        let pending = items.iter().filter(|item| item.is_pending()).count();
        assert_eq!(uncompleted_count(&items), pending);
        assert!(visible_items(&items, false)
            .iter()
            .all(Item::is_pending));
    }

    #[test]
    fn hiding_completed_keeps_order() {
        let items = sample();
        let names = visible_items(&items, false)
            .into_iter()
            .map(|item| item.name)
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["Milk", "Eggs"]);
    }

    #[test]
    fn header_has_label_then_uncompleted_then_total() {
        assert_eq!(header_text("Grocery", 2, 5), "Grocery: 2: 5");
        let view = ChecklistView::build(&sample(), options(false));
        assert_eq!(view.header, "Grocery: 2: 3");
    }

    #[test]
    fn empty_message_depends_on_store_not_filter() {
        let mut done = Item::new("Bread");
        done.complete = true;
        let only_completed = vec![done];

        let filtered = ChecklistView::build(&only_completed, options(false));
        assert!(filtered.rows.is_empty());
        assert!(filtered.empty_message.is_none());

        let empty = ChecklistView::build(&[], options(true));
        assert!(empty.is_empty());
        assert!(empty.empty_message.is_some());
    }

    #[test]
    fn affordances_follow_swipe_mode() {
        assert_eq!(
            RowAffordances::for_swipe_mode(true),
            RowAffordances {
                inline_delete: false,
                swipe_delete: true
            }
        );
        assert_eq!(
            RowAffordances::for_swipe_mode(false),
            RowAffordances {
                inline_delete: true,
                swipe_delete: false
            }
        );
    }
}
