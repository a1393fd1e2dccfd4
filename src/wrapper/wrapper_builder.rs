use std::time::Duration;

use reqwest::Client;

use crate::constants::{ID_LOGIN, LEARN_PREFIX, MY_USER_AGENT};
use crate::types::{self, Credentials, WrapperError};
use crate::urls::LearnUrls;
use crate::wrapper::request_data::{ReqwestTransport, Transport};
use crate::wrapper::LearnWrapper;

/// A builder for the `LearnWrapper`. This should be used to construct a new wrapper.
///
/// # Example
/// ```rust,no_run
/// use std::time::Duration;
/// use learnweg::wrapper::wrapper_builder::LearnWrapperBuilder;
///
/// let wrapper = LearnWrapperBuilder::new()
///     .with_credentials("2019012345", "my password")
///     .with_default_timeout(Duration::from_secs(10))
///     .try_build_wrapper();
///
/// assert!(wrapper.is_ok());
/// ```
pub struct LearnWrapperBuilder {
    credentials: Option<Credentials>,
    client: Option<Client>,
    user_agent: String,
    default_timeout: Duration,
    learn_prefix: String,
    id_login: String,
}

impl LearnWrapperBuilder {
    /// Constructs a `LearnWrapperBuilder` with the default endpoints, user agent, and default
    /// timeout. You are responsible for providing the credentials.
    ///
    /// # Returns
    /// A `LearnWrapperBuilder`.
    pub fn new() -> Self {
        Self {
            credentials: None,
            client: None,
            user_agent: MY_USER_AGENT.to_owned(),
            default_timeout: Duration::from_secs(30),
            learn_prefix: LEARN_PREFIX.to_owned(),
            id_login: ID_LOGIN.to_owned(),
        }
    }

    /// Sets the credentials used to log in.
    ///
    /// # Parameters
    /// - `username`: The username.
    /// - `password`: The password.
    ///
    /// # Returns
    /// The builder.
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.credentials = Some(Credentials::new(username, password));
        self
    }

    /// Sets the client to the specified client. The client must have its cookie store
    /// enabled. If no client is given, one is created when building.
    ///
    /// # Parameters
    /// - `client`: The client to use.
    ///
    /// # Returns
    /// The builder.
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Sets the user agent to the specified user agent.
    ///
    /// # Parameters
    /// - `user_agent`: The user agent to use.
    ///
    /// # Returns
    /// The builder.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Sets the timeout to the specified timeout.
    ///
    /// # Parameters
    /// - `timeout`: The timeout to use.
    ///
    /// # Returns
    /// The builder.
    pub fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    /// Sets the prefix of every Web Learning endpoint.
    ///
    /// # Parameters
    /// - `prefix`: The prefix, e.g. `https://learn.tsinghua.edu.cn`.
    ///
    /// # Returns
    /// The builder.
    pub fn with_learn_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.learn_prefix = prefix.into();
        self
    }

    /// Sets the identity provider endpoint that credentials are posted to.
    ///
    /// # Parameters
    /// - `url`: The login URL.
    ///
    /// # Returns
    /// The builder.
    pub fn with_id_login_url(mut self, url: impl Into<String>) -> Self {
        self.id_login = url.into();
        self
    }

    fn take_credentials(&mut self) -> types::Result<Credentials> {
        self.credentials.take().ok_or(WrapperError::InputError(
            "credentials",
            "no username and password were provided.",
        ))
    }

    /// Attempts to build the wrapper using `reqwest` as the transport. To successfully build
    /// the wrapper, the credentials must be provided.
    ///
    /// # Returns
    /// The `LearnWrapper`, or an error if the credentials are missing or the client could not
    /// be created.
    pub fn try_build_wrapper(mut self) -> types::Result<LearnWrapper> {
        let credentials = self.take_credentials()?;
        let client = match self.client {
            Some(c) => c,
            None => Client::builder().cookie_store(true).build()?,
        };

        Ok(LearnWrapper::from_parts(
            credentials,
            LearnUrls::new(self.learn_prefix, self.id_login),
            ReqwestTransport::new(client, self.user_agent, self.default_timeout),
        ))
    }

    /// Attempts to build the wrapper on top of a custom transport. The client, user agent
    /// and timeout set on this builder are ignored, since the transport owns those.
    ///
    /// # Parameters
    /// - `transport`: The transport.
    ///
    /// # Returns
    /// The `LearnWrapper`, or an error if the credentials are missing.
    pub fn try_build_with_transport<T: Transport>(
        mut self,
        transport: T,
    ) -> types::Result<LearnWrapper<T>> {
        let credentials = self.take_credentials()?;
        Ok(LearnWrapper::from_parts(
            credentials,
            LearnUrls::new(self.learn_prefix, self.id_login),
            transport,
        ))
    }
}

impl Default for LearnWrapperBuilder {
    fn default() -> Self {
        Self::new()
    }
}
