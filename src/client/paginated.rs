//! Cursor pagination over Roblox list endpoints.
//!
//! List endpoints take an optional `cursor` query parameter and answer with
//! a page holding a `data` array and a `nextPageCursor`. An absent or empty
//! cursor marks the last page. A page without a `data` array is an error,
//! never an empty page.
//!
//! Two helpers are provided: [`read_pages`] collects every page eagerly,
//! and [`CursorStream`] yields items lazily as a [`Stream`].

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures_util::Stream;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use super::endpoint::ApiUrl;
use crate::{Error, Result};

/// Query parameter carrying the page cursor.
pub const CURSOR_PARAM: &str = "cursor";

/// Response field carrying the next page cursor.
pub const NEXT_CURSOR_FIELD: &str = "nextPageCursor";

/// Response field carrying the page items.
pub const DATA_FIELD: &str = "data";

/// One page of a cursor-paginated list.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CursorPage<T> {
    /// Cursor of the previous page, if any.
    #[serde(default)]
    pub previous_page_cursor: Option<String>,
    /// Cursor of the next page; `None` or empty on the last page.
    #[serde(default)]
    pub next_page_cursor: Option<String>,
    /// The items in this page.
    pub data: Vec<T>,
}

impl<T> CursorPage<T> {
    /// The cursor for the next page, treating an empty string as absent.
    pub fn next_cursor(&self) -> Option<&str> {
        self.next_page_cursor.as_deref().filter(|c| !c.is_empty())
    }
}

/// Read the next page cursor out of a raw page body.
pub fn next_cursor(page: &Value) -> Option<String> {
    page.get(NEXT_CURSOR_FIELD)
        .and_then(Value::as_str)
        .filter(|c| !c.is_empty())
        .map(String::from)
}

/// The `data` array of a raw page body.
///
/// # Errors
///
/// Returns [`Error::MissingField`] if the field is absent or not an array.
pub fn page_data(page: &Value) -> Result<&Vec<Value>> {
    page.get(DATA_FIELD)
        .and_then(Value::as_array)
        .ok_or(Error::MissingField("data"))
}

/// Fetch every page of a list and collect the mapped items in order.
///
/// `next_page` builds the URL for a page given the cursor (`None` for the
/// first page); `map_page` turns one raw page body into items. Pages are
/// requested one after another until a page has no next cursor. There is
/// no page limit.
///
/// ```no_run
/// use blox_rs::client::read_pages;
///
/// # async fn example(client: blox_rs::BloxClient) -> blox_rs::Result<()> {
/// let base = client.url("groups", "/v1/groups/%id%/users?limit=100", [("id", 1)]);
/// let names = read_pages(
///     |cursor| match cursor {
///         Some(c) => base.with_query("cursor", c),
///         None => Ok(base.clone()),
///     },
///     |page| {
///         Ok(page["data"]
///             .as_array()
///             .into_iter()
///             .flatten()
///             .filter_map(|m| m["username"].as_str().map(String::from))
///             .collect())
///     },
/// )
/// .await?;
/// # Ok(())
/// # }
/// ```
pub async fn read_pages<T, F, M>(mut next_page: F, mut map_page: M) -> Result<Vec<T>>
where
    F: FnMut(Option<&str>) -> Result<ApiUrl>,
    M: FnMut(&Value) -> Result<Vec<T>>,
{
    let mut items = Vec::new();
    let mut cursor: Option<String> = None;
    let mut pages = 0usize;

    loop {
        let url = next_page(cursor.as_deref())?;
        let response = url.get(None, None).await?;
        let page = response.json()?;

        items.extend(map_page(page)?);
        pages += 1;

        cursor = next_cursor(page);
        if cursor.is_none() {
            break;
        }
    }

    tracing::debug!(pages, items = items.len(), "Read all pages");
    Ok(items)
}

/// Type alias for a boxed future used internally.
type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

type FetchPage<T> = Box<dyn Fn(Option<String>) -> BoxFuture<'static, Result<CursorPage<T>>> + Send + Sync>;

/// A stream that lazily fetches pages from a cursor-paginated endpoint.
///
/// Items are yielded in page order. The next page is only requested once
/// the current one is drained. An error ends the stream.
///
/// # Example
///
/// ```no_run
/// use futures_util::StreamExt;
/// use blox_rs::GroupId;
///
/// # async fn example(client: blox_rs::BloxClient) -> blox_rs::Result<()> {
/// let mut members = client.groups().members_stream(GroupId::new(1200769));
///
/// while let Some(member) = members.next().await {
///     println!("{}", member?.username);
/// }
/// # Ok(())
/// # }
/// ```
pub struct CursorStream<T> {
    /// Function to fetch a page by cursor.
    fetch_page: FetchPage<T>,
    /// Current page of items being yielded.
    current_items: VecDeque<T>,
    /// Cursor of the next page to fetch; `None` once exhausted.
    next: Option<Option<String>>,
    /// Current in-flight fetch future.
    pending_fetch: Option<BoxFuture<'static, Result<CursorPage<T>>>>,
}

impl<T> CursorStream<T>
where
    T: DeserializeOwned + Send + 'static,
{
    /// Create a stream from a page fetcher.
    pub fn new<F>(fetch_page: F) -> Self
    where
        F: Fn(Option<String>) -> BoxFuture<'static, Result<CursorPage<T>>> + Send + Sync + 'static,
    {
        Self {
            fetch_page: Box::new(fetch_page),
            current_items: VecDeque::new(),
            next: Some(None),
            pending_fetch: None,
        }
    }

    /// Stream every page of `base`, adding the cursor as a query parameter.
    pub fn from_url(base: ApiUrl) -> Self {
        Self::new(move |cursor: Option<String>| {
            let base = base.clone();
            Box::pin(async move {
                let url = match cursor {
                    Some(ref c) => base.with_query(CURSOR_PARAM, c)?,
                    None => base,
                };
                let response = url.get(None, None).await?;
                page_data(response.json()?)?;
                response.json_as::<CursorPage<T>>()
            })
        })
    }
}

impl<T> Stream for CursorStream<T> {
    type Item = Result<T>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = &mut *self;

        loop {
            if let Some(item) = this.current_items.pop_front() {
                return Poll::Ready(Some(Ok(item)));
            }

            if let Some(ref mut fut) = this.pending_fetch {
                match fut.as_mut().poll(cx) {
                    Poll::Ready(Ok(page)) => {
                        this.pending_fetch = None;
                        this.next = page.next_cursor().map(|c| Some(c.to_string()));
                        this.current_items = page.data.into();
                        continue;
                    }
                    Poll::Ready(Err(e)) => {
                        this.pending_fetch = None;
                        this.next = None;
                        return Poll::Ready(Some(Err(e)));
                    }
                    Poll::Pending => return Poll::Pending,
                }
            }

            if let Some(cursor) = this.next.take() {
                this.pending_fetch = Some((this.fetch_page)(cursor));
                continue;
            }

            return Poll::Ready(None);
        }
    }
}

impl<T> Unpin for CursorStream<T> {}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use futures_util::StreamExt;

    use super::*;

    fn page(data: Vec<u32>, next: Option<&str>) -> CursorPage<u32> {
        CursorPage {
            previous_page_cursor: None,
            next_page_cursor: next.map(String::from),
            data,
        }
    }

    #[test]
    fn test_next_cursor_from_value() {
        let body = serde_json::json!({ "nextPageCursor": "abc", "data": [] });
        assert_eq!(next_cursor(&body).as_deref(), Some("abc"));

        let empty = serde_json::json!({ "nextPageCursor": "", "data": [] });
        assert_eq!(next_cursor(&empty), None);

        let null = serde_json::json!({ "nextPageCursor": null, "data": [] });
        assert_eq!(next_cursor(&null), None);

        assert_eq!(next_cursor(&serde_json::json!({ "data": [] })), None);
    }

    #[test]
    fn test_page_deserialize() {
        let p: CursorPage<u32> = serde_json::from_value(serde_json::json!({
            "previousPageCursor": null,
            "nextPageCursor": "",
            "data": [1, 2]
        }))
        .unwrap();
        assert_eq!(p.data, vec![1, 2]);
        assert_eq!(p.next_cursor(), None);
    }

    #[test]
    fn test_page_without_data_is_rejected() {
        let body = serde_json::json!({ "nextPageCursor": null, "errors": [] });
        assert!(matches!(page_data(&body), Err(Error::MissingField("data"))));
        assert!(serde_json::from_value::<CursorPage<u32>>(body).is_err());

        let empty = serde_json::json!({ "nextPageCursor": null, "data": [] });
        assert!(page_data(&empty).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_stream_follows_cursors_in_order() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();
        let stream = CursorStream::new(move |cursor: Option<String>| {
            seen.fetch_add(1, Ordering::SeqCst);
            Box::pin(async move {
                Ok(match cursor.as_deref() {
                    None => page(vec![1, 2], Some("p2")),
                    Some("p2") => page(vec![], Some("p3")),
                    Some("p3") => page(vec![3], None),
                    Some(other) => panic!("unexpected cursor {other}"),
                })
            })
        });

        let items: Vec<u32> = stream.map(|r| r.unwrap()).collect().await;
        assert_eq!(items, vec![1, 2, 3]);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_stream_stops_on_error() {
        let stream = CursorStream::<u32>::new(|cursor: Option<String>| {
            Box::pin(async move {
                match cursor {
                    None => Ok(page(vec![1], Some("boom"))),
                    Some(_) => Err(crate::Error::Timeout),
                }
            })
        });

        let results: Vec<Result<u32>> = stream.collect().await;
        assert_eq!(results.len(), 2);
        assert!(matches!(results[0], Ok(1)));
        assert!(matches!(results[1], Err(crate::Error::Timeout)));
    }
}
