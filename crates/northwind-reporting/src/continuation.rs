//! Continuation-token paging.
//!
//! A remote query answers with one page of items plus, when more remain,
//! an opaque token addressing the rest. [`follow_continuations`] turns
//! that page-plus-token protocol into one lazy stream of items.

use async_stream::try_stream;
use async_trait::async_trait;
use futures::stream::BoxStream;
use futures::StreamExt;
use northwind_core::NorthwindResult;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Store-issued marker for where the previous page left off.
///
/// Only meaningful to the query that produced it.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ContinuationToken(String);

impl ContinuationToken {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ContinuationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ContinuationToken").field(&self.0).finish()
    }
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPage<T> {
    pub items: Vec<T>,
    /// Present when more pages follow.
    pub continuation: Option<ContinuationToken>,
}

impl<T> QueryPage<T> {
    #[must_use]
    pub fn last(items: Vec<T>) -> Self {
        Self {
            items,
            continuation: None,
        }
    }

    #[must_use]
    pub fn with_continuation(items: Vec<T>, token: ContinuationToken) -> Self {
        Self {
            items,
            continuation: Some(token),
        }
    }
}

/// A remote query that returns results page by page.
#[async_trait]
pub trait PagedQuery<T>: Send + Sync {
    async fn first_page(&self) -> NorthwindResult<QueryPage<T>>;

    /// Fetches the page addressed by a token this query produced earlier.
    async fn next_page(&self, token: &ContinuationToken) -> NorthwindResult<QueryPage<T>>;
}

/// Streams every item of `query`, across pages, in order.
///
/// Each page is requested only when the consumer advances past the
/// previous one. Tokens are fed back verbatim. A store that always
/// returns a token yields an endless stream. Calling this again on the
/// same query starts over from the first page.
pub fn follow_continuations<T, Q>(query: Arc<Q>) -> BoxStream<'static, NorthwindResult<T>>
where
    T: Send + 'static,
    Q: PagedQuery<T> + ?Sized + 'static,
{
    walk_pages(query).boxed()
}

fn walk_pages<T, Q>(query: Arc<Q>) -> impl futures::Stream<Item = NorthwindResult<T>> + Send + 'static
where
    T: Send + 'static,
    Q: PagedQuery<T> + ?Sized + 'static,
{
    try_stream! {
        let mut page = query.first_page().await?;
        let mut pages = 1_usize;
        loop {
            let QueryPage { items, continuation } = page;
            for item in items {
                yield item;
            }
            let Some(token) = continuation else {
                break;
            };
            page = query.next_page(&token).await?;
            pages += 1;
            debug!(pages, "Followed continuation");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::TryStreamExt;
    use northwind_core::NorthwindError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Serves fixed page sizes, numbering items consecutively.
    struct SizedPages {
        sizes: Vec<usize>,
        requests: AtomicUsize,
        seen_tokens: std::sync::Mutex<Vec<String>>,
    }

    impl SizedPages {
        fn new(sizes: &[usize]) -> Arc<Self> {
            Arc::new(Self {
                sizes: sizes.to_vec(),
                requests: AtomicUsize::new(0),
                seen_tokens: std::sync::Mutex::new(Vec::new()),
            })
        }

        fn page(&self, index: usize) -> QueryPage<usize> {
            let start: usize = self.sizes[..index].iter().sum();
            let items = (start..start + self.sizes[index]).collect();
            if index + 1 < self.sizes.len() {
                QueryPage::with_continuation(items, ContinuationToken::new(format!("skip={}", index + 1)))
            } else {
                QueryPage::last(items)
            }
        }

        fn requests(&self) -> usize {
            self.requests.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PagedQuery<usize> for SizedPages {
        async fn first_page(&self) -> NorthwindResult<QueryPage<usize>> {
            self.requests.fetch_add(1, Ordering::SeqCst);
            Ok(self.page(0))
        }

        async fn next_page(&self, token: &ContinuationToken) -> NorthwindResult<QueryPage<usize>> {
            self.requests.fetch_add(1, Ordering::SeqCst);
            self.seen_tokens.lock().unwrap().push(token.as_str().to_string());
            let index = token
                .as_str()
                .strip_prefix("skip=")
                .and_then(|n| n.parse().ok())
                .ok_or_else(|| NorthwindError::internal("bad token"))?;
            Ok(self.page(index))
        }
    }

    /// Always hands out another token.
    struct Endless;

    #[async_trait]
    impl PagedQuery<u8> for Endless {
        async fn first_page(&self) -> NorthwindResult<QueryPage<u8>> {
            Ok(QueryPage::with_continuation(vec![1, 2], ContinuationToken::new("more")))
        }

        async fn next_page(&self, token: &ContinuationToken) -> NorthwindResult<QueryPage<u8>> {
            Ok(QueryPage::with_continuation(vec![1, 2], token.clone()))
        }
    }

    #[tokio::test]
    async fn test_pages_are_concatenated_in_order() {
        let query = SizedPages::new(&[10, 10, 4]);

        let items: Vec<usize> = follow_continuations(query.clone()).try_collect().await.unwrap();

        assert_eq!(items, (0..24).collect::<Vec<_>>());
        assert_eq!(query.requests(), 3);
        assert_eq!(*query.seen_tokens.lock().unwrap(), ["skip=1", "skip=2"]);
    }

    #[tokio::test]
    async fn test_next_page_requested_only_when_needed() {
        let query = SizedPages::new(&[10, 10, 4]);
        let mut stream = follow_continuations(query.clone());

        assert_eq!(query.requests(), 0);
        for _ in 0..10 {
            stream.try_next().await.unwrap();
        }
        assert_eq!(query.requests(), 1);

        stream.try_next().await.unwrap();
        assert_eq!(query.requests(), 2);
    }

    #[tokio::test]
    async fn test_reiteration_reissues_requests() {
        let query = SizedPages::new(&[3, 1]);

        let first: Vec<usize> = follow_continuations(query.clone()).try_collect().await.unwrap();
        let second: Vec<usize> = follow_continuations(query.clone()).try_collect().await.unwrap();

        assert_eq!(first, second);
        assert_eq!(query.requests(), 4);
    }

    #[tokio::test]
    async fn test_single_page_without_token() {
        let query = SizedPages::new(&[0]);
        let items: Vec<usize> = follow_continuations(query.clone()).try_collect().await.unwrap();
        assert!(items.is_empty());
        assert_eq!(query.requests(), 1);
    }

    #[tokio::test]
    async fn test_endless_store_yields_endless_stream() {
        let taken: Vec<u8> = follow_continuations(Arc::new(Endless))
            .take(25)
            .try_collect()
            .await
            .unwrap();
        assert_eq!(taken.len(), 25);
    }
}
