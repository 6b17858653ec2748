//! Paginated list traversal.
//!
//! Every AWS list call returns one batch of results plus an opaque
//! continuation token. [`Page`] carries one such batch and [`Pager`] tracks
//! the token across successive calls, so counters are written as a plain
//! `while` loop with `break` for early termination instead of nested
//! callback closures.

/// One batch of results from a paginated list call.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_token: Option<String>,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, next_token: Option<String>) -> Self {
        Self { items, next_token }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_last(&self) -> bool {
        self.next_token.is_none()
    }
}

/// Continuation-token state machine for a paginated traversal.
///
/// ```ignore
/// let mut pager = Pager::new();
/// while !pager.is_done() {
///     let page = svc.list_volumes(pager.token()).await?;
///     total += page.len() as u64;
///     pager.advance(&page);
/// }
/// ```
#[derive(Debug, Default)]
pub struct Pager {
    token: Option<String>,
    done: bool,
}

impl Pager {
    pub fn new() -> Self {
        Self::default()
    }

    /// The token to send with the next list call. `None` on the first call.
    pub fn token(&mut self) -> Option<String> {
        self.token.take()
    }

    /// Record the page just received; the traversal finishes when the page
    /// carries no continuation token.
    pub fn advance<T>(&mut self, page: &Page<T>) {
        if page.is_last() {
            self.done = true;
        } else {
            self.token = page.next_token.clone();
        }
    }

    pub fn is_done(&self) -> bool {
        self.done
    }
}
