#[cfg(not(feature = "multi"))]
use std::cell::RefCell;
use std::time::Duration;

#[cfg(feature = "multi")]
use parking_lot::Mutex;
use reqwest::header::USER_AGENT;
use reqwest::Client;

use crate::types;

/// A request to be sent through a `Transport`.
#[derive(Debug, Clone, Copy)]
pub enum ReqType<'a> {
    /// A GET request to the given URL.
    Get(&'a str),
    /// A POST request to the given URL with the given form fields as the body.
    Post(&'a str, &'a [(&'a str, &'a str)]),
}

impl<'a> ReqType<'a> {
    /// The URL this request is sent to.
    pub fn url(&self) -> &'a str {
        match self {
            ReqType::Get(u) | ReqType::Post(u, _) => *u,
        }
    }
}

/// A response as seen by the wrapper: the status code and the full body.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct LearnResponse {
    pub status: u16,
    pub body: String,
}

impl LearnResponse {
    /// Whether the status code is in the `2xx` range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The HTTP layer used by the wrapper. Implementations are expected to keep cookies across
/// requests, since the login handshake relies on them.
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// Sends the request and reads the full response.
    ///
    /// # Parameters
    /// - `req_type`: The request.
    ///
    /// # Returns
    /// The response, or an error if no response could be obtained.
    async fn send(&self, req_type: ReqType<'_>) -> types::Result<LearnResponse>;
}

/// The default transport, backed by a `reqwest` client with a cookie store.
pub struct ReqwestTransport {
    pub(crate) client: Client,
    pub(crate) user_agent: String,
    pub(crate) timeout: Duration,
}

impl ReqwestTransport {
    /// Creates a transport from an existing client. The client must have its cookie store
    /// enabled, or logging in will not work.
    ///
    /// # Parameters
    /// - `client`: The client.
    /// - `user_agent`: The user agent sent with every request.
    /// - `timeout`: The timeout of each request.
    ///
    /// # Returns
    /// The transport.
    pub fn new(client: Client, user_agent: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            user_agent: user_agent.into(),
            timeout,
        }
    }
}

impl Transport for ReqwestTransport {
    async fn send(&self, req_type: ReqType<'_>) -> types::Result<LearnResponse> {
        let req = match req_type {
            ReqType::Get(u) => self.client.get(u),
            ReqType::Post(u, form) => self.client.post(u).form(form),
        }
        .header(USER_AGENT, self.user_agent.as_str())
        .timeout(self.timeout);

        let res = req.send().await?;
        let status = res.status().as_u16();
        let body = res.text().await?;
        Ok(LearnResponse { status, body })
    }
}

/// Holds the security token of the current session.
#[derive(Default)]
pub(crate) struct TokenSlot {
    #[cfg(feature = "multi")]
    token: Mutex<Option<String>>,
    #[cfg(not(feature = "multi"))]
    token: RefCell<Option<String>>,
}

impl TokenSlot {
    #[cfg(feature = "multi")]
    pub fn get(&self) -> Option<String> {
        self.token.lock().clone()
    }

    #[cfg(not(feature = "multi"))]
    pub fn get(&self) -> Option<String> {
        self.token.borrow().clone()
    }

    #[cfg(feature = "multi")]
    pub fn set(&self, token: Option<String>) {
        *self.token.lock() = token;
    }

    #[cfg(not(feature = "multi"))]
    pub fn set(&self, token: Option<String>) {
        *self.token.borrow_mut() = token;
    }
}
