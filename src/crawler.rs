use async_trait::async_trait;
use flate2::read::GzDecoder;
#[cfg(test)]
use mockall::automock;
use reqwest::StatusCode;
use std::io::Read;

use crate::error::{Error, Result};
use crate::logger::{Logger, Logging};

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/98.0.4758.80 Safari/537.36";
const REFERER: &str = "https://filmot.com";

#[cfg_attr(test, automock)]
#[async_trait]
pub trait Fetching {
    async fn fetch_body(&self, url: &str) -> Result<Vec<u8>>;
}

pub struct Crawler<'a> {
    client: reqwest::Client,
    user_agent: String,
    logger: &'a Logger,
}

impl<'a> Crawler<'a> {
    pub fn new(user_agent: &str, logger: &'a Logger) -> Self {
        let user_agent = if user_agent.is_empty() {
            DEFAULT_USER_AGENT.to_owned()
        } else {
            user_agent.to_owned()
        };
        Crawler {
            client: reqwest::Client::new(),
            user_agent,
            logger,
        }
    }
}

#[async_trait]
impl<'a> Fetching for Crawler<'a> {
    async fn fetch_body(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .header("user-agent", &self.user_agent)
            .header("referer", REFERER)
            .send()
            .await?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(Error::Fetch {
                url: url.to_owned(),
                status: status.as_u16(),
            });
        }
        self.logger.verbose(&format!("status for '{url}': {status}"));

        let encoding = match response.headers().get("Content-Encoding") {
            Some(header_value) => header_value.to_str().unwrap_or("").to_owned(),
            None => String::from(""),
        };
        self.logger
            .verbose(&format!("encoding is '{encoding}' for '{url}'"));

        let body_bytes = response.bytes().await?;
        if encoding == "gzip" {
            let mut reader = GzDecoder::new(&body_bytes[..]);
            let mut buf: Vec<u8> = Vec::new();
            reader.read_to_end(&mut buf)?;
            Ok(buf)
        } else {
            Ok(Vec::from(&body_bytes[..]))
        }
    }
}
