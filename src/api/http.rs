//! reqwest implementation of the Ticket API.
//!
//! # Security Note - Logging
//!
//! The API token travels in the `Authorization` header. It is wrapped in
//! `RedactedHeader` and the resulting header value is marked sensitive, so
//! neither our own `Debug` output nor reqwest's request logging prints it.

use std::fmt;
use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response, header};
use secrecy::{ExposeSecret, SecretBox};
use url::Url;

use super::{
    ApiFailure, TicketApi, TicketListResponse, extract_error_message, transition_body,
};
use crate::config::Config;
use crate::error::{HelpdeskError, Result};
use crate::transition::TicketOperation;
use crate::types::Ticket;

/// Upper bound on followed `next` links when listing tickets
const MAX_PAGES: usize = 100;

/// Wrapper for sensitive header values that redacts the value when formatted.
struct RedactedHeader {
    value: String,
}

impl RedactedHeader {
    fn bearer(token: &str) -> Self {
        Self {
            value: format!("Bearer {token}"),
        }
    }

    fn as_header_value(&self) -> std::result::Result<header::HeaderValue, ApiFailure> {
        let mut value =
            header::HeaderValue::from_str(&self.value).map_err(|_| ApiFailure::Network {
                detail: "API token contains characters not allowed in a header".to_string(),
            })?;
        value.set_sensitive(true);
        Ok(value)
    }
}

impl fmt::Display for RedactedHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl fmt::Debug for RedactedHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedactedHeader")
            .field("value", &"[REDACTED]")
            .finish()
    }
}

/// HTTP client for the Ticket API
pub struct HttpTicketApi {
    client: Client,
    base_url: Url,
    token: Option<SecretBox<String>>,
}

impl fmt::Debug for HttpTicketApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTicketApi")
            .field("base_url", &self.base_url.as_str())
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl HttpTicketApi {
    /// Create a client from configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let url = config.api_url().ok_or_else(|| {
            HelpdeskError::Config(
                "Ticket API URL not configured. Set HELPDESK_API_URL or run: helpdesk config set api.url <url>"
                    .to_string(),
            )
        })?;
        Self::new(&url, config.api_token(), config.api_timeout())
    }

    /// Create a client for `base_url`.
    ///
    /// `timeout` bounds each whole request; there is no retry.
    pub fn new(base_url: &str, token: Option<String>, timeout: Duration) -> Result<Self> {
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout.min(Duration::from_secs(10)))
            .build()?;

        Ok(Self {
            client,
            base_url,
            token: token.map(|t| SecretBox::new(Box::new(t))),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn join(&self, path: &str) -> std::result::Result<Url, ApiFailure> {
        self.base_url.join(path).map_err(|e| ApiFailure::Network {
            detail: format!("invalid request URL '{path}': {e}"),
        })
    }

    /// `{base}/tickets/`
    pub fn tickets_url(&self) -> std::result::Result<Url, ApiFailure> {
        self.join("tickets/")
    }

    /// `{base}/tickets/{id}/{operation}/`
    pub fn operation_url(
        &self,
        ticket_id: u64,
        operation: TicketOperation,
    ) -> std::result::Result<Url, ApiFailure> {
        self.join(&format!("tickets/{ticket_id}/{}/", operation.as_str()))
    }

    fn authorize(&self, request: RequestBuilder) -> std::result::Result<RequestBuilder, ApiFailure> {
        let request = request.header(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );
        match &self.token {
            Some(token) => {
                let auth_header = RedactedHeader::bearer(token.expose_secret());
                Ok(request.header(header::AUTHORIZATION, auth_header.as_header_value()?))
            }
            None => Ok(request),
        }
    }

    /// Turn a non-2xx response into a failure carrying the server's message
    async fn rejection(response: Response) -> ApiFailure {
        let status = response.status();
        let body = response.bytes().await.unwrap_or_default();
        let message = extract_error_message(&body);
        tracing::debug!(
            status = status.as_u16(),
            message = message.as_deref().unwrap_or(""),
            "ticket API rejected request"
        );
        ApiFailure::Rejected {
            status: status.as_u16(),
            message,
        }
    }
}

impl TicketApi for HttpTicketApi {
    async fn list_tickets(&self) -> std::result::Result<Vec<Ticket>, ApiFailure> {
        let mut tickets = Vec::new();
        let mut next = Some(self.tickets_url()?);
        let mut pages = 0;

        while let Some(url) = next.take() {
            pages += 1;
            if pages > MAX_PAGES {
                tracing::warn!("ticket list exceeded {MAX_PAGES} pages, stopping");
                break;
            }

            let response = self.authorize(self.client.get(url))?.send().await?;
            if !response.status().is_success() {
                return Err(Self::rejection(response).await);
            }

            match response.json::<TicketListResponse>().await? {
                TicketListResponse::Plain(page) => tickets.extend(page),
                TicketListResponse::Paginated {
                    results,
                    next: next_url,
                } => {
                    tickets.extend(results);
                    next = match next_url {
                        Some(link) => Some(self.join(&link)?),
                        None => None,
                    };
                }
            }
        }

        tracing::debug!(count = tickets.len(), "fetched ticket list");
        Ok(tickets)
    }

    async fn perform(
        &self,
        ticket_id: u64,
        operation: TicketOperation,
        reason: Option<&str>,
    ) -> std::result::Result<Option<Ticket>, ApiFailure> {
        let url = self.operation_url(ticket_id, operation)?;
        tracing::debug!(ticket_id, %operation, "submitting transition");

        let mut request = self.authorize(self.client.post(url))?;
        if let Some(body) = transition_body(operation, reason) {
            request = request.json(&body);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(Self::rejection(response).await);
        }

        let body = response.bytes().await?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        // Accepted either way; an unrecognized body only loses the echo
        match serde_json::from_slice::<Ticket>(&body) {
            Ok(ticket) => Ok(Some(ticket)),
            Err(e) => {
                tracing::debug!(ticket_id, "transition response was not a ticket: {e}");
                Ok(None)
            }
        }
    }
}
