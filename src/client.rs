//! This module provides a client to the hosted event table
//!
//! The table is exposed through a PostgREST API (as hosted by Supabase), under `<base URL>/rest/v1/<table>`.

use async_trait::async_trait;
use chrono::SecondsFormat;
use reqwest::{Method, RequestBuilder, Response};
use url::Url;

use crate::config::{self, EVENTS_TABLE};
use crate::error::StoreError;
use crate::event::{Event, EventId, NewEvent};
use crate::grid::DateRange;
use crate::traits::EventStore;


/// An [`EventStore`] that fetches its data from a PostgREST server
#[derive(Clone, Debug)]
pub struct Client {
    base_url: Url,
    api_key: String,
    table: String,

    http: reqwest::Client,
}

impl Client {
    /// Create a client. This does not start a connection
    ///
    /// The table name is taken from [`config::EVENTS_TABLE`].
    pub fn new<S: AsRef<str>, T: ToString>(url: S, api_key: T) -> Result<Self, StoreError> {
        let base_url = Url::parse(url.as_ref())?;

        Ok(Self {
            base_url,
            api_key: api_key.to_string(),
            table: config::current(&EVENTS_TABLE),
            http: reqwest::Client::new(),
        })
    }

    /// Use another table than the configured one
    pub fn with_table<T: ToString>(mut self, table: T) -> Self {
        self.table = table.to_string();
        self
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// `<base URL>/rest/v1/<table>`
    pub fn table_url(&self) -> Result<Url, StoreError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| StoreError::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(&["rest", "v1", self.table.as_str()]);
        Ok(url)
    }

    /// The URL that selects every event of `range`, ordered by date
    pub fn query_url(&self, range: &DateRange) -> Result<Url, StoreError> {
        let mut url = self.table_url()?;
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("date", &format!("gte.{}", range.start.to_rfc3339_opts(SecondsFormat::Millis, true)))
            .append_pair("date", &format!("lte.{}", range.end.to_rfc3339_opts(SecondsFormat::Millis, true)))
            .append_pair("order", "date.asc");
        Ok(url)
    }

    /// The URL that selects a single event
    pub fn item_url(&self, id: &EventId) -> Result<Url, StoreError> {
        let mut url = self.table_url()?;
        url.query_pairs_mut()
            .append_pair("id", &format!("eq.{}", id));
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.http
            .request(method, url)
            .header("apikey", self.api_key.as_str())
            .bearer_auth(&self.api_key)
    }
}

async fn check_status(response: Response) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() == false {
        let body = response.text().await.unwrap_or_default();
        return Err(StoreError::Status { status: status.as_u16(), body });
    }
    Ok(response)
}

#[async_trait]
impl EventStore for Client {
    async fn query(&self, range: &DateRange) -> Result<Vec<Event>, StoreError> {
        let url = self.query_url(range)?;
        log::debug!("Querying {}", url);

        let response = self.request(Method::GET, url).send().await?;
        let text = check_status(response).await?.text().await?;

        let events: Vec<Event> = serde_json::from_str(&text)?;
        log::debug!("Received {} events", events.len());
        Ok(events)
    }

    async fn insert(&self, event: NewEvent) -> Result<Event, StoreError> {
        let url = self.table_url()?;
        log::debug!("Inserting {:?} into {}", event.title, url);

        let response = self.request(Method::POST, url)
            .header("Prefer", "return=representation")
            .json(&[event])
            .send()
            .await?;
        let text = check_status(response).await?.text().await?;

        let stored: Vec<Event> = serde_json::from_str(&text)?;
        stored.into_iter().next().ok_or(StoreError::EmptyInsert)
    }

    async fn delete_by_id(&self, id: &EventId) -> Result<(), StoreError> {
        let url = self.item_url(id)?;
        log::debug!("Deleting {}", url);

        let response = self.request(Method::DELETE, url).send().await?;
        check_status(response).await?;
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    use crate::event::EventType;
    use crate::grid::MonthRef;

    fn pairs(url: &Url) -> Vec<(String, String)> {
        url.query_pairs().map(|(k, v)| (k.into_owned(), v.into_owned())).collect()
    }

    #[test]
    fn table_url() {
        let client = Client::new("https://abcd.supabase.co", "secret").unwrap();
        assert_eq!(client.table(), "calendar_events");
        assert_eq!(client.table_url().unwrap().as_str(), "https://abcd.supabase.co/rest/v1/calendar_events");

        let client = Client::new("http://localhost:54321/", "secret").unwrap().with_table("events");
        assert_eq!(client.table_url().unwrap().as_str(), "http://localhost:54321/rest/v1/events");
    }

    #[test]
    fn query_url_selects_a_month() {
        let client = Client::new("https://abcd.supabase.co", "secret").unwrap().with_table("calendar_events");
        let range = MonthRef::new(2024, 10).unwrap().range_in(&Utc);
        let url = client.query_url(&range).unwrap();

        assert_eq!(url.path(), "/rest/v1/calendar_events");
        assert_eq!(pairs(&url), vec![
            ("select".to_string(), "*".to_string()),
            ("date".to_string(), "gte.2024-11-01T00:00:00.000Z".to_string()),
            ("date".to_string(), "lte.2024-11-30T23:59:59.000Z".to_string()),
            ("order".to_string(), "date.asc".to_string()),
        ]);
    }

    #[test]
    fn item_url() {
        let client = Client::new("https://abcd.supabase.co", "secret").unwrap().with_table("calendar_events");
        let url = client.item_url(&EventId::from(42i64)).unwrap();
        assert_eq!(pairs(&url), vec![("id".to_string(), "eq.42".to_string())]);
    }

    #[test]
    fn invalid_base_url() {
        assert!(matches!(Client::new("not a url", "secret"), Err(StoreError::Url(_))));
    }


    /// A request, as received by [`serve_once`]
    struct Received {
        head: String,
        body: String,
    }

    impl Received {
        /// Returns `None` until the whole body (as announced by `content-length`) has been read
        fn parse(raw: &[u8]) -> Option<Self> {
            let text = String::from_utf8_lossy(raw);
            let (head, body) = text.split_once("\r\n\r\n")?;
            let length = head.lines()
                .filter_map(|line| line.split_once(':'))
                .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
                .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if body.len() < length {
                return None;
            }
            Some(Self { head: head.to_string(), body: body.to_string() })
        }

        fn request_line(&self) -> &str {
            self.head.lines().next().unwrap_or("")
        }

        fn header(&self, name: &str) -> Option<&str> {
            self.head.lines()
                .skip(1)
                .filter_map(|line| line.split_once(':'))
                .find(|(key, _)| key.trim().eq_ignore_ascii_case(name))
                .map(|(_, value)| value.trim())
        }
    }

    /// Answers a single request with a canned response, and hands the request back
    async fn serve_once(status: &'static str, body: &'static str) -> (Client, JoinHandle<Received>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());

        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut raw = Vec::new();
            let mut chunk = [0u8; 1024];
            let received = loop {
                let n = socket.read(&mut chunk).await.unwrap();
                raw.extend_from_slice(&chunk[..n]);
                if let Some(received) = Received::parse(&raw) {
                    break received;
                }
                assert!(n > 0, "Connection closed in the middle of a request");
            };

            let response = format!(
                "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                status, body.len(), body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            received
        });

        let mut client = Client::new(url, "KEY").unwrap().with_table("calendar_events");
        client.http = reqwest::Client::builder().no_proxy().build().unwrap();
        (client, server)
    }

    fn dentist() -> NewEvent {
        NewEvent::new("Dentist", EventType::Event, Utc.with_ymd_and_hms(2024, 11, 20, 0, 0, 0).unwrap())
    }

    #[tokio::test]
    async fn insert_returns_the_stored_row() {
        let (client, server) = serve_once(
            "201 Created",
            r#"[{"id":7,"title":"Dentist","type":"event","description":null,"date":"2024-11-20T00:00:00+00:00"}]"#,
        ).await;

        let stored = client.insert(dentist()).await.unwrap();
        assert_eq!(stored.id().as_str(), "7");
        assert_eq!(stored.title(), "Dentist");
        assert_eq!(stored.date(), Utc.with_ymd_and_hms(2024, 11, 20, 0, 0, 0).unwrap());

        let request = server.await.unwrap();
        assert_eq!(request.request_line(), "POST /rest/v1/calendar_events HTTP/1.1");
        assert_eq!(request.header("apikey"), Some("KEY"));
        assert_eq!(request.header("authorization"), Some("Bearer KEY"));
        assert_eq!(request.header("prefer"), Some("return=representation"));

        let body: serde_json::Value = serde_json::from_str(&request.body).unwrap();
        assert_eq!(body, serde_json::json!([{
            "title": "Dentist",
            "type": "event",
            "description": null,
            "date": "2024-11-20T00:00:00Z",
        }]));
    }

    #[tokio::test]
    async fn insert_without_representation() {
        let (client, server) = serve_once("201 Created", "[]").await;
        assert!(matches!(client.insert(dentist()).await, Err(StoreError::EmptyInsert)));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn rejected_insert() {
        let (client, server) = serve_once("400 Bad Request", r#"{"message":"null value in column \"title\""}"#).await;
        match client.insert(dentist()).await {
            Err(StoreError::Status { status, body }) => {
                assert_eq!(status, 400);
                assert!(body.contains("null value"));
            },
            other => panic!("Unexpected result {:?}", other),
        }
        server.await.unwrap();
    }

    #[tokio::test]
    async fn query_a_month() {
        let (client, server) = serve_once(
            "200 OK",
            r#"[{"id":"a","title":"Soccer","type":"activity","description":"","date":"2024-11-16T09:00:00.000Z"},
                {"id":"b","title":"Call grandma","type":"note","description":"about the holidays","date":"2024-11-16T18:00:00"}]"#,
        ).await;

        let range = MonthRef::new(2024, 10).unwrap().range_in(&Utc);
        let events = client.query(&range).await.unwrap();
        let titles: Vec<&str> = events.iter().map(|e| e.title()).collect();
        assert_eq!(titles, vec!["Soccer", "Call grandma"]);
        assert_eq!(events[0].event_type(), EventType::Activity);
        assert_eq!(events[0].description(), None);
        assert_eq!(events[1].date(), Utc.with_ymd_and_hms(2024, 11, 16, 18, 0, 0).unwrap());

        let request = server.await.unwrap();
        assert!(request.request_line().starts_with("GET /rest/v1/calendar_events?select="));
        assert_eq!(request.header("apikey"), Some("KEY"));
        assert_eq!(request.header("authorization"), Some("Bearer KEY"));
    }

    #[tokio::test]
    async fn delete_an_unknown_id() {
        // The table answers 204 whether or not a row matched
        let (client, server) = serve_once("204 No Content", "").await;
        client.delete_by_id(&EventId::from("does-not-exist")).await.unwrap();

        let request = server.await.unwrap();
        assert_eq!(request.request_line(), "DELETE /rest/v1/calendar_events?id=eq.does-not-exist HTTP/1.1");
        assert_eq!(request.header("apikey"), Some("KEY"));
    }
}
