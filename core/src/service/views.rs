use std::cmp::Ordering;

use crate::model::task::Task;
use crate::time::parse_due_date;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Text,
    DueDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Case-insensitive substring match against text, description and the
/// due-date string. An empty search matches everything.
pub fn matches_search(task: &Task, search: &str) -> bool {
    let needle = search.to_lowercase();
    task.text.to_lowercase().contains(&needle)
        || task.description.to_lowercase().contains(&needle)
        || task.due_date.to_lowercase().contains(&needle)
}

pub fn filter_tasks<'a>(tasks: &'a [Task], search: &str) -> Vec<&'a Task> {
    tasks.iter().filter(|t| matches_search(t, search)).collect()
}

/// Ascending comparison for one sort key. Text compares case-insensitive;
/// due dates compare as calendar days with unparseable or missing dates
/// ordered after every valid one.
pub fn compare_tasks(a: &Task, b: &Task, key: SortKey) -> Ordering {
    match key {
        SortKey::Text => a.text.to_lowercase().cmp(&b.text.to_lowercase()),
        SortKey::DueDate => match (parse_due_date(&a.due_date), parse_due_date(&b.due_date)) {
            (Some(da), Some(db)) => da.cmp(&db),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
    }
}

/// Reorders a collection in place. The store uses this on the
/// authoritative vector; `visible_page` uses the same comparator on a
/// borrowed view.
pub fn sort_tasks(tasks: &mut [Task], key: SortKey, direction: SortDirection) {
    tasks.sort_by(|a, b| directed(compare_tasks(a, b, key), direction));
}

fn directed(ordering: Ordering, direction: SortDirection) -> Ordering {
    match direction {
        SortDirection::Ascending => ordering,
        SortDirection::Descending => ordering.reverse(),
    }
}

/// The slice `[(page-1)*page_size, page*page_size)` clamped to the
/// collection bounds. Pages are 1-based; a page past the end is empty.
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    if page_size == 0 {
        return &[];
    }
    let start = page.saturating_sub(1).saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = (start + page_size).min(items.len());
    &items[start..end]
}

pub fn total_pages(item_count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    item_count.div_ceil(page_size)
}

/// The full derived-view pipeline: filter, then optionally sort, then
/// slice. Never touches the input collection.
pub fn visible_page<'a>(
    tasks: &'a [Task],
    search: &str,
    sort: Option<(SortKey, SortDirection)>,
    page: usize,
    page_size: usize,
) -> Vec<&'a Task> {
    let mut filtered = filter_tasks(tasks, search);
    if let Some((key, direction)) = sort {
        filtered.sort_by(|a, b| directed(compare_tasks(a, b, key), direction));
    }
    paginate(&filtered, page, page_size).to_vec()
}
