//! Paging
//!
//! Listings come back as `{ value, nextLink }` pages. A [`Pager`] walks them
//! forward one request at a time until the server stops returning a cursor.

use super::client::ArmClient;
use crate::error::{Error, PageStage, Result};
use futures::Stream;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::marker::PhantomData;

/// One page of a listing, remembering the operation that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    operation: &'static str,
    items: Vec<T>,
    next_link: Option<String>,
}

impl<T> Page<T> {
    pub fn new(operation: &'static str, items: Vec<T>, next_link: Option<String>) -> Self {
        Self {
            operation,
            items,
            next_link,
        }
    }

    /// Name of the listing this page belongs to; follow-up loads report
    /// failures under it
    pub fn operation(&self) -> &'static str {
        self.operation
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Continuation cursor for the next page
    pub fn next_link(&self) -> Option<&str> {
        self.next_link.as_deref()
    }

    pub fn has_more(&self) -> bool {
        self.next_link.is_some()
    }
}

/// Wire shape of a listing response
#[derive(Debug, Deserialize)]
pub(crate) struct PageBody<T> {
    value: Option<Vec<T>>,
    #[serde(rename = "nextLink")]
    next_link: Option<String>,
}

impl<T> PageBody<T> {
    pub(crate) fn into_page(self, operation: &'static str) -> Page<T> {
        Page::new(operation, self.value.unwrap_or_default(), self.next_link)
    }
}

/// Test applied to every drained item
pub trait Predicate<T> {
    fn matches(&self, item: &T) -> bool;
}

impl<T, F> Predicate<T> for F
where
    F: Fn(&T) -> bool,
{
    fn matches(&self, item: &T) -> bool {
        self(item)
    }
}

/// Predicate that keeps every item
#[derive(Debug, Clone, Copy, Default)]
pub struct MatchAll;

impl<T> Predicate<T> for MatchAll {
    fn matches(&self, _item: &T) -> bool {
        true
    }
}

/// Every item of a fully drained listing, in server order
#[derive(Debug, Clone, PartialEq)]
pub struct CompleteResult<T> {
    pub items: Vec<T>,
}

enum PagerState {
    First {
        path: String,
        query: Vec<(String, String)>,
    },
    Next(String),
    Done,
}

/// Forward-only sequence of pages for one listing
pub struct Pager<T> {
    client: ArmClient,
    operation: &'static str,
    state: PagerState,
    _item: PhantomData<fn() -> T>,
}

impl<T: DeserializeOwned> Pager<T> {
    pub(crate) fn new(
        client: ArmClient,
        operation: &'static str,
        path: String,
        query: Vec<(String, String)>,
    ) -> Self {
        Self {
            client,
            operation,
            state: PagerState::First { path, query },
            _item: PhantomData,
        }
    }

    /// Fetch the next page, or `None` once the last page has been returned.
    /// A failed fetch leaves the pager where it was.
    pub async fn next_page(&mut self) -> Result<Option<Page<T>>> {
        let page = match &self.state {
            PagerState::First { path, query } => {
                self.client.get_page(self.operation, path, query).await?
            }
            PagerState::Next(link) => self.client.get_next_page(self.operation, link).await?,
            PagerState::Done => return Ok(None),
        };

        self.state = match page.next_link() {
            Some(link) => PagerState::Next(link.to_string()),
            None => PagerState::Done,
        };
        Ok(Some(page))
    }

    /// Pages as a stream; ends after the last page or the first error
    pub fn into_stream(self) -> impl Stream<Item = Result<Page<T>>> {
        futures::stream::try_unfold(self, |mut pager| async move {
            Ok(pager.next_page().await?.map(|page| (page, pager)))
        })
    }

    /// Drain every page sequentially, keeping items the predicate accepts.
    /// Stops at the first failed fetch and returns no partial result.
    pub async fn collect_matching<P>(mut self, predicate: &P) -> Result<CompleteResult<T>>
    where
        P: Predicate<T> + ?Sized,
    {
        let mut items = Vec::new();
        let mut stage = PageStage::Initial;

        while let Some(page) = self.next_page().await.map_err(|e| Error::Page {
            stage,
            source: Box::new(e),
        })? {
            tracing::debug!(
                "{}: loaded {} page with {} items",
                self.operation,
                stage,
                page.items().len()
            );
            items.extend(
                page.into_items()
                    .into_iter()
                    .filter(|item| predicate.matches(item)),
            );
            stage = PageStage::Next;
        }

        Ok(CompleteResult { items })
    }
}
