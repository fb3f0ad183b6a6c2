use serde_json::Value;

use crate::crawler::Fetching;
use crate::error::{Error, Result};
use crate::filmot::embedded_json::extract_embedded_object;
use crate::logger::Logging;

const INITIAL_DATA_VARIABLE: &str = "ytInitialData";
const CHANNEL_ID_PATH: &str = "/metadata/channelMetadataRenderer/externalId";

/// Reads the canonical channel id out of a channel page body.
pub fn channel_id_from_page(html: &str) -> Result<String> {
    let data = extract_embedded_object(html, INITIAL_DATA_VARIABLE)?;
    data.pointer(CHANNEL_ID_PATH)
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or(Error::IdentifierNotFound)
}

/// A channel handle. Vanity URLs like `https://www.youtube.com/@somename`
/// hide the canonical id; it is resolved from the channel page on first
/// access and kept for the lifetime of the handle.
pub struct Channel<'a, F: Fetching> {
    url: String,
    crawler: &'a F,
    channel_id: Option<String>,
}

impl<'a, F: Fetching> Channel<'a, F> {
    pub fn new(url: &str, crawler: &'a F) -> Self {
        Channel {
            url: url.to_owned(),
            crawler,
            channel_id: None,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// The canonical channel id. The first call fetches and parses the
    /// channel page; later calls return the stored value without touching
    /// the network.
    pub async fn channel_id<L: Logging>(&mut self, logger: &L) -> Result<&str> {
        let channel_id = match self.channel_id.take() {
            Some(channel_id) => channel_id,
            None => {
                let body_bytes = self.crawler.fetch_body(&self.url).await?;
                let html = String::from_utf8_lossy(&body_bytes);
                let channel_id = channel_id_from_page(&html)?;
                logger.verbose(&format!(
                    "channel id for '{}' resolved as '{channel_id}'",
                    self.url
                ));
                channel_id
            }
        };
        Ok(self.channel_id.insert(channel_id).as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::MockFetching;
    use crate::logger::Logger;

    fn channel_page(external_id: &str) -> String {
        format!(
            r#"<html><script>ytInitialData = {{"metadata": {{"channelMetadataRenderer": {{"externalId": "{external_id}", "title": "some channel"}}}}}};</script></html>"#
        )
    }

    #[test]
    fn reads_the_external_id_from_the_metadata_path() {
        let html = channel_page("UC3k3floOm_HtKOv0l6JU-xQ");
        let channel_id = channel_id_from_page(&html).unwrap();
        assert_eq!(channel_id, "UC3k3floOm_HtKOv0l6JU-xQ");
    }

    #[test]
    fn missing_metadata_path_is_an_identifier_error() {
        let html = r#"<html><script>ytInitialData = {"metadata": {}};</script></html>"#;
        let error = channel_id_from_page(html).unwrap_err();
        assert!(matches!(error, Error::IdentifierNotFound));
    }

    #[test]
    fn missing_initial_data_is_a_not_found_error() {
        let html = "<html><body>no bootstrap payload</body></html>";
        let error = channel_id_from_page(html).unwrap_err();
        assert!(matches!(error, Error::NotFound { .. }));
    }

    #[tokio::test]
    async fn channel_id_is_fetched_once_and_memoized() {
        let logger = Logger::new(0);
        let mut mock_crawler = MockFetching::new();
        mock_crawler.expect_fetch_body().times(1).returning(|url| {
            assert_eq!(url, "https://www.youtube.com/@somename");
            Ok(channel_page("UCabcdef").into_bytes())
        });
        let mut channel = Channel::new("https://www.youtube.com/@somename", &mock_crawler);
        let first = channel.channel_id(&logger).await.unwrap().to_owned();
        let second = channel.channel_id(&logger).await.unwrap().to_owned();
        assert_eq!(first, "UCabcdef");
        assert_eq!(second, "UCabcdef");
    }

    #[tokio::test]
    async fn fetch_errors_propagate_unresolved() {
        let logger = Logger::new(0);
        let mut mock_crawler = MockFetching::new();
        mock_crawler.expect_fetch_body().times(1).returning(|url| {
            Err(Error::Fetch {
                url: url.to_owned(),
                status: 404,
            })
        });
        let mut channel = Channel::new("https://www.youtube.com/@gone", &mock_crawler);
        let error = channel.channel_id(&logger).await.unwrap_err();
        assert!(matches!(error, Error::Fetch { status: 404, .. }));
    }
}
