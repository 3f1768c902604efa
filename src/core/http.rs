use futures::future::try_join_all;
use reqwest::Client;
use tracing::debug;

use crate::core::{
    FetchedPage,
    VerbDeckError,
};

/// Marker substituted with the word in a source URL.
pub const WORD_PLACEHOLDER: &str = "XXXXXX";

/// A source URL with exactly one word placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlTemplate(String);

impl UrlTemplate {
    pub fn new(template: impl Into<String>) -> Result<Self, VerbDeckError> {
        let template = template.into();
        if template.matches(WORD_PLACEHOLDER).count() != 1 {
            return Err(VerbDeckError::InvalidTemplate(template));
        }
        Ok(Self(template))
    }

    pub fn url_for(&self, word: &str) -> String {
        self.0.replace(WORD_PLACEHOLDER, word)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One client per batch; its connection pool is shared by every request
/// in the batch and released when the batch ends.
pub fn http_client() -> Result<Client, VerbDeckError> {
    Ok(Client::builder().build()?)
}

/// Fetches one page per word over a single client and returns them in
/// word order. Any transport failure fails the whole batch.
pub async fn fetch_batch(
    template: &UrlTemplate,
    words: &[String],
) -> Result<Vec<FetchedPage>, VerbDeckError> {
    let client = http_client()?;
    let requests = words.iter().map(|word| fetch_page(&client, template, word));
    try_join_all(requests).await
}

async fn fetch_page(
    client: &Client,
    template: &UrlTemplate,
    word: &str,
) -> Result<FetchedPage, VerbDeckError> {
    let url = template.url_for(word);
    debug!(%url, "fetching");

    let fail = |source: reqwest::Error| VerbDeckError::Fetch {
        url: url.clone(),
        source: Box::new(source),
    };

    let response = client.get(&url).send().await.map_err(fail)?;
    let status = response.status();
    if !status.is_success() {
        // Error pages still go to the extractors, which know how to reject them
        debug!(%url, %status, "non-success status");
    }
    let body = response.text().await.map_err(fail)?;

    Ok(FetchedPage { word: word.to_string(), body })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::{
        io::{
            AsyncReadExt,
            AsyncWriteExt,
        },
        net::TcpListener,
    };

    use super::*;

    /// Serves the request path back as the body. Paths ending in a digit
    /// are delayed by `10 - digit` * 20ms so later words finish first.
    async fn echo_server() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else { break };
                tokio::spawn(async move {
                    let mut buf = vec![0u8; 4096];
                    let n = socket.read(&mut buf).await.unwrap_or(0);
                    let request = String::from_utf8_lossy(&buf[..n]).to_string();
                    let path = request.split_whitespace().nth(1).unwrap_or("/").to_string();
                    let digit = path.chars().last().and_then(|c| c.to_digit(10)).unwrap_or(9);
                    tokio::time::sleep(Duration::from_millis(u64::from(10 - digit) * 20)).await;
                    let response = format!(
                        "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                        path.len(),
                        path
                    );
                    let _ = socket.write_all(response.as_bytes()).await;
                });
            }
        });
        format!("http://{addr}/verb/{WORD_PLACEHOLDER}")
    }

    #[test]
    fn test_template_requires_single_placeholder() {
        assert!(UrlTemplate::new("https://example.org/XXXXXX.html").is_ok());
        assert!(matches!(
            UrlTemplate::new("https://example.org/verb.html"),
            Err(VerbDeckError::InvalidTemplate(_))
        ));
        assert!(UrlTemplate::new("https://example.org/XXXXXX/XXXXXX").is_err());
    }

    #[test]
    fn test_url_for_substitutes_word() {
        let template = UrlTemplate::new("https://example.org/verb-XXXXXX.html").unwrap();
        assert_eq!(template.url_for("gehen"), "https://example.org/verb-gehen.html");
    }

    #[tokio::test]
    async fn test_fetch_batch_preserves_input_order() {
        let template = UrlTemplate::new(echo_server().await).unwrap();
        let words: Vec<String> = (1..=6).map(|i| format!("wort{i}")).collect();

        let pages = fetch_batch(&template, &words).await.unwrap();

        assert_eq!(pages.len(), words.len());
        for (page, word) in pages.iter().zip(&words) {
            assert_eq!(&page.word, word);
            assert_eq!(page.body, format!("/verb/{word}"));
        }
    }

    #[tokio::test]
    async fn test_fetch_batch_empty_word_list() {
        let template = UrlTemplate::new(echo_server().await).unwrap();
        let pages = fetch_batch(&template, &[]).await.unwrap();
        assert!(pages.is_empty());
    }

    #[tokio::test]
    async fn test_single_transport_failure_fails_batch() {
        // Bind then drop to get a port with nothing listening
        let addr = {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap()
        };
        let template = UrlTemplate::new(format!("http://{addr}/{WORD_PLACEHOLDER}")).unwrap();
        let words = vec!["gehen".to_string(), "sein".to_string()];

        let result = fetch_batch(&template, &words).await;
        assert!(matches!(result, Err(VerbDeckError::Fetch { .. })));
    }
}
