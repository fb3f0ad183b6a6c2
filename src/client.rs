use url::Url;

use crate::crawler::Fetching;
use crate::error::Result;
use crate::filmot::{parse_filter_page, parse_video_cards, FilterSet, VideoRecord};
use crate::logger::{Logger, Logging};
use crate::query::{Filters, SortOption};

const BASE_URL: &str = "https://filmot.com/search/";

/// Everything one search needs: the caption query plus the optional knobs
/// that become URL parameters.
#[derive(Clone, Debug, Default)]
pub struct SearchRequest {
    pub query: String,
    pub channel_id: Option<String>,
    pub filters: Filters,
    pub sort: Option<SortOption>,
}

pub struct SearchClient<'a, F: Fetching> {
    crawler: &'a F,
    logger: &'a Logger,
}

impl<'a, F: Fetching> SearchClient<'a, F> {
    pub fn new(crawler: &'a F, logger: &'a Logger) -> Self {
        SearchClient { crawler, logger }
    }

    /// Builds `<base>/<query>/1/<page>?gridView=1&...` for a request.
    pub fn build_search_url(&self, request: &SearchRequest, page: u32) -> Url {
        let mut url = Url::parse(BASE_URL).expect("base search url");
        url.path_segments_mut()
            .expect("base url cannot be opaque")
            .pop_if_empty()
            .push(&request.query)
            .push("1")
            .push(&page.to_string());
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("gridView", "1");
            if let Some(channel_id) = &request.channel_id {
                pairs.append_pair("channelID", channel_id);
            }
            for (key, value) in request.filters.to_params() {
                pairs.append_pair(key, &value);
            }
            if let Some(sort) = &request.sort {
                pairs.append_pair("sortField", sort.field.as_param());
                pairs.append_pair("sortOrder", sort.order.as_param());
            }
        }
        url
    }

    async fn fetch_document(&self, url: &Url) -> Result<String> {
        let body_bytes = self.crawler.fetch_body(url.as_str()).await?;
        Ok(String::from_utf8_lossy(&body_bytes).into_owned())
    }

    /// Fetches and parses one results page.
    pub async fn search_page(&self, request: &SearchRequest, page: u32) -> Result<Vec<VideoRecord>> {
        let url = self.build_search_url(request, page);
        self.logger.verbose(&format!("search url: {url}"));
        let html = self.fetch_document(&url).await?;
        let records = parse_video_cards(&html);
        self.logger
            .debug(&format!("{} cards found on page {page}", records.len()));
        Ok(records)
    }

    /// First page of results.
    pub async fn search(&self, request: &SearchRequest) -> Result<Vec<VideoRecord>> {
        self.search_page(request, 1).await
    }

    /// Walks result pages lazily, one fetch per step. A pager always starts
    /// from page 1; to restart, build a new one.
    pub fn pages(&self, request: SearchRequest) -> SearchPager<'_, F> {
        SearchPager {
            client: self,
            request,
            next_page: 1,
            done: false,
        }
    }

    /// Fetches the first results page and parses the filter controls it offers.
    pub async fn filter_options(&self, request: &SearchRequest) -> Result<FilterSet> {
        let url = self.build_search_url(request, 1);
        self.logger.verbose(&format!("filter url: {url}"));
        let html = self.fetch_document(&url).await?;
        Ok(parse_filter_page(&html))
    }
}

/// Lazy page-at-a-time iteration over all results of a request. The site has
/// no total count; the first page that comes back with zero cards is the
/// termination signal.
pub struct SearchPager<'a, F: Fetching> {
    client: &'a SearchClient<'a, F>,
    request: SearchRequest,
    next_page: u32,
    done: bool,
}

impl<'a, F: Fetching> SearchPager<'a, F> {
    /// The next page of records, or `None` once a page came back empty.
    /// After that every call returns `None` without touching the network.
    pub async fn next_page(&mut self) -> Result<Option<Vec<VideoRecord>>> {
        if self.done {
            return Ok(None);
        }
        let records = self.client.search_page(&self.request, self.next_page).await?;
        if records.is_empty() {
            self.done = true;
            return Ok(None);
        }
        self.next_page += 1;
        Ok(Some(records))
    }
}
