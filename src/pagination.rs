//! Positional-offset cursor pagination over a fully materialised result set.
//!
//! Cursors are plain offsets into the ordered set, not opaque tokens: edge
//! `i` of a page starting at `after` carries cursor `after + i`.

pub struct Edge<T> {
    pub cursor: usize,
    pub node: T,
}

pub struct Page<T> {
    pub total_count: usize,
    pub edges: Vec<Edge<T>>,
    pub end_cursor: usize,
    pub has_next_page: bool,
}

/// Slice `items[after .. after + limit)` into cursor-tagged edges.
///
/// `end_cursor` is the cursor of the last emitted edge, or 0 when the page
/// is empty. `has_next_page` is true when entries remain past the slice.
pub fn paginate<T>(items: Vec<T>, limit: usize, after: usize) -> Page<T> {
    let total_count = items.len();
    let has_next_page = total_count > after + limit;

    let edges: Vec<Edge<T>> = items
        .into_iter()
        .skip(after)
        .take(limit)
        .enumerate()
        .map(|(index, node)| Edge {
            cursor: after + index,
            node,
        })
        .collect();

    let end_cursor = edges.last().map(|edge| edge.cursor).unwrap_or(0);

    Page {
        total_count,
        edges,
        end_cursor,
        has_next_page,
    }
}
