use crate::api::User;

/// Users whose name contains `query`, compared case-insensitively.
///
/// An empty query matches every user. Order of the input is preserved.
pub fn filter_by_name<'a>(users: &'a [User], query: &str) -> Vec<&'a User> {
    let q = query.to_lowercase();
    if q.is_empty() {
        return users.iter().collect();
    }
    users
        .iter()
        .filter(|u| u.name.to_lowercase().contains(&q))
        .collect()
}

/// Number of pages needed for `count` items; zero when there are no items.
pub fn total_pages(count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    count.div_ceil(page_size)
}

/// Items on the 1-based `page`. Pages past the end yield an empty slice.
pub fn page_slice<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    let start = page.saturating_sub(1).saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = (start + page_size).min(items.len());
    &items[start..end]
}
