//! Lazy iteration over paginated list endpoints.
//!
//! A `Paginator` owns a fetch closure `(offset, limit) -> page` and walks
//! the result one page per `next()`. The offset advances by the number of
//! items actually received, so a server returning short pages is still
//! walked without gaps. Iteration ends when the offset reaches the total
//! reported by the first page, when a page comes back empty, or after the
//! first error.

use tracing::debug;

use crate::api::clamp_limit;
use crate::error::Result;
use crate::models::PaginatedResponse;

type FetchPage<'a, T> = Box<dyn FnMut(usize, usize) -> Result<PaginatedResponse<T>> + 'a>;

pub struct Paginator<'a, T> {
    fetch: FetchPage<'a, T>,
    offset: usize,
    page_size: usize,
    total: Option<usize>,
    finished: bool,
}

impl<'a, T> Paginator<'a, T> {
    /// `page_size` is clamped to the server maximum.
    pub fn new<F>(offset: usize, page_size: usize, fetch: F) -> Self
    where
        F: FnMut(usize, usize) -> Result<PaginatedResponse<T>> + 'a,
    {
        Self {
            fetch: Box::new(fetch),
            offset,
            page_size: clamp_limit(page_size),
            total: None,
            finished: false,
        }
    }

    /// Total reported by the server; `None` until the first page arrives.
    pub fn total(&self) -> Option<usize> {
        self.total
    }

    /// Offset of the next page to fetch.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Fetch every remaining page and concatenate the items in order.
    pub fn all(self) -> Result<Vec<T>> {
        let mut items = Vec::new();
        for page in self {
            items.extend(page?);
        }
        Ok(items)
    }
}

impl<T> Iterator for Paginator<'_, T> {
    type Item = Result<Vec<T>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        if let Some(total) = self.total {
            if self.offset >= total {
                self.finished = true;
                return None;
            }
        }

        let page = match (self.fetch)(self.offset, self.page_size) {
            Ok(page) => page,
            Err(err) => {
                self.finished = true;
                return Some(Err(err));
            }
        };

        // Later pages never move the stopping point.
        let total = *self.total.get_or_insert(page.pagination.total);
        let received = page.data.len();
        debug!(offset = self.offset, received, total, "fetched page");

        if received == 0 {
            self.finished = true;
            return None;
        }
        self.offset += received;
        if self.offset >= total {
            self.finished = true;
        }
        Some(Ok(page.data))
    }
}

impl<T> std::iter::FusedIterator for Paginator<'_, T> {}

/// Build a paginator from any page-fetching closure.
pub fn paginate<'a, T, F>(fetch: F, offset: usize, page_size: usize) -> Paginator<'a, T>
where
    F: FnMut(usize, usize) -> Result<PaginatedResponse<T>> + 'a,
{
    Paginator::new(offset, page_size, fetch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ListParams;
    use crate::client::AnytypeClient;
    use crate::config::ClientConfig;
    use crate::error::ApiError;
    use crate::models::PaginationMeta;
    use crate::testing::{object_page, ScriptedTransport};

    fn numbers(offset: usize, limit: usize, total: usize) -> PaginatedResponse<usize> {
        let end = (offset + limit).min(total);
        PaginatedResponse {
            data: (offset..end).collect(),
            pagination: PaginationMeta {
                offset,
                limit,
                total,
                has_more: end < total,
            },
        }
    }

    #[test]
    fn walks_whole_result_through_the_client() {
        let transport = ScriptedTransport::new();
        transport.push_json(200, object_page(0, 1000, 2500, 1000));
        transport.push_json(200, object_page(1000, 1000, 2500, 1000));
        transport.push_json(200, object_page(2000, 500, 2500, 1000));
        let client = AnytypeClient::with_transport(ClientConfig::default(), transport.clone());

        let pages: Vec<usize> = client
            .objects()
            .paginate("s1", ListParams::new(0, 5000))
            .map(|page| page.unwrap().len())
            .collect();
        assert_eq!(pages, vec![1000, 1000, 500]);

        let requests = transport.requests();
        assert_eq!(requests.len(), 3);
        let offsets: Vec<&str> = requests.iter().map(|r| r.query_param("offset").unwrap()).collect();
        assert_eq!(offsets, vec!["0", "1000", "2000"]);
        assert!(requests.iter().all(|r| r.query_param("limit") == Some("1000")));
    }

    #[test]
    fn all_preserves_fetch_order() {
        let items = paginate(|offset, limit| Ok(numbers(offset, limit, 7)), 0, 3).all().unwrap();
        assert_eq!(items, (0..7).collect::<Vec<_>>());
    }

    #[test]
    fn empty_result_yields_no_pages() {
        let mut calls = 0;
        let pages: Vec<_> = paginate(
            |offset, limit| {
                calls += 1;
                Ok(numbers(offset, limit, 0))
            },
            0,
            10,
        )
        .collect();
        assert!(pages.is_empty());
        assert_eq!(calls, 1);
    }

    #[test]
    fn short_pages_advance_by_items_received() {
        let mut offsets = Vec::new();
        let items = paginate(
            |offset, _limit| {
                offsets.push(offset);
                Ok(numbers(offset, 2, 5))
            },
            0,
            10,
        )
        .all()
        .unwrap();
        assert_eq!(items, vec![0, 1, 2, 3, 4]);
        assert_eq!(offsets, vec![0, 2, 4]);
    }

    #[test]
    fn stops_on_empty_page_despite_larger_total() {
        let mut paginator = paginate(
            |offset, limit| {
                let mut page = numbers(offset, limit, 100);
                if offset >= 4 {
                    page.data.clear();
                }
                Ok(page)
            },
            0,
            4,
        );
        assert_eq!(paginator.next().unwrap().unwrap(), vec![0, 1, 2, 3]);
        assert!(paginator.next().is_none());
        assert_eq!(paginator.total(), Some(100));
        assert_eq!(paginator.offset(), 4);
        assert!(paginator.next().is_none());
    }

    #[test]
    fn total_is_fixed_by_the_first_page() {
        let mut calls = 0;
        let items = paginate(
            |offset, _limit| {
                calls += 1;
                let total = if offset == 0 { 4 } else { 100 };
                Ok(numbers(offset, 2, total))
            },
            0,
            2,
        )
        .all()
        .unwrap();
        assert_eq!(items, vec![0, 1, 2, 3]);
        assert_eq!(calls, 2);
    }

    #[test]
    fn error_ends_iteration() {
        let mut paginator: Paginator<'_, usize> = paginate(|_, _| Err(ApiError::Timeout), 0, 10);
        assert!(matches!(paginator.next(), Some(Err(ApiError::Timeout))));
        assert!(paginator.next().is_none());
    }

    #[test]
    fn starting_offset_is_respected() {
        let items = paginate(|offset, limit| Ok(numbers(offset, limit, 6)), 4, 10).all().unwrap();
        assert_eq!(items, vec![4, 5]);
    }
}
