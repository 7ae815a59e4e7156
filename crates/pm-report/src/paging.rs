//! Fixed-size page grouping.

/// Split `items` into consecutive chunks of at most `page_size`.
///
/// Order is preserved and only the last chunk may be short. A page size of
/// zero is treated as one.
pub fn group<T: Clone>(items: &[T], page_size: usize) -> Vec<Vec<T>> {
    items
        .chunks(page_size.max(1))
        .map(|chunk| chunk.to_vec())
        .collect()
}

/// Number of pages `group` would produce.
pub fn page_count(len: usize, page_size: usize) -> usize {
    len.div_ceil(page_size.max(1))
}
