//! Pagination stage: fixed-size slicing of an already sorted sequence.

/// One page of a sorted sequence.
#[derive(Debug, PartialEq, Eq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    /// `ceil(len / page_size)`; 0 for an empty sequence.
    pub total_pages: usize,
    /// 0-based offset of the first item of this page.
    pub start_index: usize,
}

impl<T> Clone for Page<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Page<'_, T> {}

/// Slice page `page` (1-based) of `items`.
///
/// No bounds validation beyond the arithmetic: a page past the end (or page 0)
/// yields empty `items`. Callers are expected to keep navigation within
/// `1..=total_pages`. A zero `page_size` produces no pages.
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> Page<'_, T> {
    if page_size == 0 {
        return Page {
            items: &[],
            total_pages: 0,
            start_index: 0,
        };
    }

    let total_pages = items.len().div_ceil(page_size);
    let Some(start_index) = page.checked_sub(1).map(|p| p.saturating_mul(page_size)) else {
        return Page {
            items: &[],
            total_pages,
            start_index: 0,
        };
    };

    let slice = if start_index >= items.len() {
        &items[..0]
    } else {
        let end = start_index.saturating_add(page_size).min(items.len());
        &items[start_index..end]
    };

    Page {
        items: slice,
        total_pages,
        start_index,
    }
}
