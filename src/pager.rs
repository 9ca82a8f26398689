//! Fixed-size pagination over an already-ordered sequence. Out-of-range
//! requests clamp instead of erroring, so a feed link never 404s.

pub const POSTS_ON_PAGE: usize = 10;

pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based index of the page actually served.
    pub number: usize,
    /// ceil(total / page_size); 0 when the sequence is empty.
    pub total_pages: usize,
}

impl<T> Page<T> {
    pub fn has_prev(&self) -> bool {
        self.number > 1
    }

    pub fn has_next(&self) -> bool {
        self.number < self.total_pages
    }
}

/// Pure: same items, size and request always give the same page. A request
/// below 1 clamps to 1, a request past the end clamps to the last page, and
/// a non-empty sequence never produces an empty page.
pub fn paginate<T>(items: Vec<T>, page_size: usize, requested: Option<i64>) -> Page<T> {
    assert!(page_size > 0);

    let total_pages = items.len().div_ceil(page_size);
    let requested = requested.unwrap_or(1).max(1) as usize;
    let number = requested.min(total_pages.max(1));
    let start = (number - 1) * page_size;

    Page {
        items: items.into_iter().skip(start).take(page_size).collect(),
        number,
        total_pages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pages_concatenate_to_the_original_sequence() {
        let items: Vec<u32> = (0..23).collect();
        let total_pages = paginate(items.clone(), 10, None).total_pages;
        assert_eq!(total_pages, 3);

        let mut seen = Vec::new();
        for number in 1..=total_pages {
            let page = paginate(items.clone(), 10, Some(number as i64));
            assert!(!page.items.is_empty());
            assert_eq!(page.number, number);
            seen.extend(page.items);
        }
        assert_eq!(seen, items);
    }

    #[test]
    fn last_page_holds_the_remainder() {
        let page = paginate((0..12).collect::<Vec<_>>(), 10, Some(2));
        assert_eq!(page.items, vec![10, 11]);
        assert_eq!(page.number, 2);
        assert_eq!(page.total_pages, 2);
    }

    #[test]
    fn overshoot_clamps_to_the_last_page() {
        let items: Vec<u32> = (0..12).collect();
        let clamped = paginate(items.clone(), 10, Some(99));
        let last = paginate(items, 10, Some(2));
        assert_eq!(clamped.items, last.items);
        assert_eq!(clamped.number, last.number);
    }

    #[test]
    fn zero_and_negative_requests_clamp_to_the_first_page() {
        let items: Vec<u32> = (0..5).collect();
        for requested in [Some(0), Some(-3), None] {
            let page = paginate(items.clone(), 10, requested);
            assert_eq!(page.number, 1);
            assert_eq!(page.items, items);
        }
    }

    #[test]
    fn empty_sequence_gives_an_empty_first_page() {
        let page = paginate(Vec::<u32>::new(), 10, Some(4));
        assert!(page.items.is_empty());
        assert_eq!(page.number, 1);
        assert_eq!(page.total_pages, 0);
        assert!(!page.has_next());
        assert!(!page.has_prev());
    }
}
