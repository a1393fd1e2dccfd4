use log::{debug, info, warn};
use serde_json::Value;
use tokio::sync::Mutex;

use crate::constants::BAD_CREDENTIALS;
use crate::lw_parser;
use crate::raw_types::{RawCourseListResponse, RawHomeworkListResponse, RawSemesterResponse};
use crate::types::{
    self, Courses, CourseType, Credentials, HomeworkStatus, Homeworks, Semester, WrapperError,
};
use crate::urls::LearnUrls;
use crate::util::append_csrf_token;
use crate::wrapper::lw_helper::process_json;
use crate::wrapper::request_data::{
    LearnResponse, ReqType, ReqwestTransport, TokenSlot, Transport,
};
use crate::wrapper::wrapper_builder::LearnWrapperBuilder;

mod lw_helper;
pub mod request_data;
pub mod wrapper_builder;

/// A wrapper for [Tsinghua's Web Learning](https://learn.tsinghua.edu.cn) portal. The wrapper
/// logs in with your credentials, keeps the resulting session around, and exposes typed
/// accessors for the semester, course, and homework endpoints.
///
/// Requests are made one after another; no two requests made by one call are ever in
/// flight at the same time.
pub struct LearnWrapper<T: Transport = ReqwestTransport> {
    credentials: Credentials,
    urls: LearnUrls,
    transport: T,
    token: TokenSlot,
    // Held for the whole handshake, so that only one login runs at a time.
    login_lock: Mutex<()>,
}

impl LearnWrapper {
    /// Creates a new instance of the `LearnWrapper` with the specified credentials. The
    /// default endpoints, timeout and user agent will be used. To override these, use
    /// [`LearnWrapperBuilder`].
    ///
    /// No request is made until the first call; see `login`.
    ///
    /// # Parameters
    /// - `username`: Your username.
    /// - `password`: Your password.
    ///
    /// # Returns
    /// The new instance of the `LearnWrapper`, or an error if the HTTP client could not be
    /// created.
    ///
    /// # Example
    /// ```rust,no_run
    /// use learnweg::wrapper::LearnWrapper;
    ///
    /// let wrapper = LearnWrapper::new("2019012345", "my password").unwrap();
    /// assert!(!wrapper.is_logged_in());
    /// ```
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> types::Result<Self> {
        Self::builder()
            .with_credentials(username, password)
            .try_build_wrapper()
    }

    /// Creates a new builder that can be used to construct a `LearnWrapper`. This is the
    /// preferred method for creating a wrapper for more complex situations.
    ///
    /// # Returns
    /// The builder.
    pub fn builder() -> LearnWrapperBuilder {
        LearnWrapperBuilder::new()
    }
}

impl<T: Transport> LearnWrapper<T> {
    pub(crate) fn from_parts(credentials: Credentials, urls: LearnUrls, transport: T) -> Self {
        Self {
            credentials,
            urls,
            transport,
            token: TokenSlot::default(),
            login_lock: Mutex::new(()),
        }
    }

    /// The endpoints this wrapper talks to.
    pub fn urls(&self) -> &LearnUrls {
        &self.urls
    }

    /// Whether a security token is currently held, i.e. whether `login` succeeded and
    /// `logout` has not been called since.
    pub fn is_logged_in(&self) -> bool {
        self.token.get().is_some()
    }

    /// Logs in to Web Learning. This goes through the identity provider, redeems the ticket
    /// it hands out, and finally scrapes the security token from the course list page.
    ///
    /// Every step must succeed for the next one to run. Nothing is retried; calling this
    /// function again repeats the whole sequence. Concurrent logins on the same wrapper run
    /// one after another.
    ///
    /// # Returns
    /// Nothing if the login succeeded. Otherwise, the error tells you which step failed:
    /// - `FetchFromId` if the identity provider could not be reached,
    /// - `BadCredentials` if it rejected the username or password,
    /// - `Roaming` if the ticket could not be redeemed,
    /// - `InvalidResponse` if no security token could be found.
    ///
    /// # Example
    /// ```rust,no_run
    /// use learnweg::types::WrapperError;
    /// use learnweg::wrapper::LearnWrapper;
    ///
    /// # #[tokio::main(flavor = "current_thread")]
    /// # async fn main() {
    /// let wrapper = LearnWrapper::new("2019012345", "my password").unwrap();
    /// match wrapper.login().await {
    ///     Ok(()) => println!("Logged in!"),
    ///     Err(WrapperError::BadCredentials) => eprintln!("Wrong password."),
    ///     Err(e) => eprintln!("An error occurred! {}", e),
    /// }
    /// # }
    /// ```
    pub async fn login(&self) -> types::Result<()> {
        let _guard = self.login_lock.lock().await;
        self.run_handshake().await
    }

    async fn run_handshake(&self) -> types::Result<()> {
        // Step 1: post the credentials to the identity provider
        let form = [
            ("i_user", self.credentials.username()),
            ("i_pass", self.credentials.password()),
            ("atOnce", "true"),
        ];

        let ticket_res = self
            .transport
            .send(ReqType::Post(self.urls.id_login(), &form))
            .await
            .map_err(|e| {
                warn!("identity provider unreachable: {e}");
                WrapperError::FetchFromId(e.to_string())
            })?;

        if !ticket_res.is_success() {
            warn!("identity provider responded with {}", ticket_res.status);
            return Err(WrapperError::FetchFromId(format!(
                "unsuccessful status code: {}",
                ticket_res.status
            )));
        }

        // Step 2: the ticket is at the end of the redirect link
        let ticket = lw_parser::parse_ticket(&ticket_res.body)?;
        debug!("ticket = {ticket}");
        if ticket == BAD_CREDENTIALS {
            warn!("credentials for {} were rejected", self.credentials.username());
            return Err(WrapperError::BadCredentials);
        }

        // Step 3: redeem the ticket
        let roam_url = self.urls.auth_roam(&ticket)?;
        debug!("roaming through {roam_url}");
        let roam_res = self
            .transport
            .send(ReqType::Get(roam_url.as_str()))
            .await
            .map_err(|e| WrapperError::Roaming(e.to_string()))?;

        if !roam_res.is_success() {
            warn!("roaming responded with {}", roam_res.status);
            return Err(WrapperError::Roaming(format!(
                "unsuccessful status code: {}",
                roam_res.status
            )));
        }

        // Step 4: the course list page sets the remaining cookies and carries the token
        let page = self
            .transport
            .send(ReqType::Get(&self.urls.student_course_list_page()))
            .await?;
        info!("course list page responded with {}", page.status);

        let token = lw_parser::parse_csrf_token(&page.body)?;
        debug!("security token = {token}");
        self.token.set(Some(token));
        info!("logged in as {}", self.credentials.username());
        Ok(())
    }

    /// Logs out of Web Learning. The response is not checked. The security token is
    /// discarded even if the request fails, so the next fetch will log in again.
    ///
    /// # Returns
    /// Nothing, or an error if the request could not be sent.
    pub async fn logout(&self) -> types::Result<()> {
        self.token.set(None);
        let res = self
            .transport
            .send(ReqType::Post(&self.urls.logout(), &[]))
            .await?;
        info!("logout responded with {}", res.status);
        Ok(())
    }

    /// Makes a GET request with the security token attached as the `_csrf` query parameter.
    ///
    /// If no token is held yet, this logs in first; if that login fails, its error is
    /// returned and no request is made. Fetches that run concurrently on a fresh wrapper share
    /// a single login. The status code of the response is not checked.
    ///
    /// # Parameters
    /// - `url`: The URL to request.
    ///
    /// # Returns
    /// The response.
    pub async fn fetch_with_token(&self, url: &str) -> types::Result<LearnResponse> {
        let token = match self.token.get() {
            Some(t) => t,
            None => self.ensure_token().await?,
        };

        let url = append_csrf_token(url, &token);
        self.transport.send(ReqType::Get(&url)).await
    }

    /// Logs in unless another caller already did while we were waiting for the login lock.
    async fn ensure_token(&self) -> types::Result<String> {
        let _guard = self.login_lock.lock().await;
        if let Some(t) = self.token.get() {
            return Ok(t);
        }

        info!("no security token yet, logging in first");
        self.run_handshake().await?;
        self.token.get().ok_or_else(|| {
            WrapperError::GeneralError("login did not store a security token".into())
        })
    }

    /// Gets the current semester.
    ///
    /// # Returns
    /// The current semester, or an error if the response was not successful.
    ///
    /// # Example
    /// ```rust,no_run
    /// use learnweg::wrapper::LearnWrapper;
    ///
    /// # #[tokio::main(flavor = "current_thread")]
    /// # async fn main() {
    /// let wrapper = LearnWrapper::new("2019012345", "my password").unwrap();
    /// let semester = wrapper.get_current_semester().await.unwrap();
    /// println!("{}", semester);
    /// # }
    /// ```
    pub async fn get_current_semester(&self) -> types::Result<Semester> {
        let res = self.fetch_with_token(&self.urls.current_semester()).await?;
        lw_parser::parse_current_semester(process_json::<RawSemesterResponse>(
            &res,
            "current semester",
        )?)
    }

    /// Gets the IDs of all semesters you have courses in.
    ///
    /// # Returns
    /// The semester IDs, e.g. `2019-2020-2`.
    pub async fn get_semester_id_list(&self) -> types::Result<Vec<String>> {
        let res = self.fetch_with_token(&self.urls.semester_list()).await?;
        lw_parser::parse_semester_id_list(process_json::<Value>(&res, "semester list")?)
    }

    /// Gets all courses in a semester.
    ///
    /// The time and location of each course lives behind a separate endpoint, so this makes
    /// one additional request per course, in the order the portal lists them. A course whose
    /// details cannot be read fails the whole list.
    ///
    /// # Parameters
    /// - `semester_id`: The semester ID, e.g. from `get_current_semester`.
    /// - `course_type`: Whether to list the courses you take or the courses you teach.
    ///
    /// # Returns
    /// The courses.
    ///
    /// # Example
    /// ```rust,no_run
    /// use learnweg::types::CourseType;
    /// use learnweg::wrapper::LearnWrapper;
    ///
    /// # #[tokio::main(flavor = "current_thread")]
    /// # async fn main() {
    /// let wrapper = LearnWrapper::new("2019012345", "my password").unwrap();
    /// let courses = wrapper
    ///     .get_course_list("2019-2020-2", CourseType::Student)
    ///     .await
    ///     .unwrap();
    /// courses.iter().for_each(|c| println!("{}", c));
    /// # }
    /// ```
    pub async fn get_course_list(
        &self,
        semester_id: &str,
        course_type: CourseType,
    ) -> types::Result<Courses> {
        let res = self
            .fetch_with_token(&self.urls.course_list(semester_id, course_type))
            .await?;
        let raw_courses = lw_parser::parse_course_list(process_json::<RawCourseListResponse>(
            &res,
            "course list",
        )?)?;

        let mut courses = Vec::with_capacity(raw_courses.len());
        for raw in raw_courses {
            let detail_url = self.urls.course_time_location(&raw.course_id)?;
            let detail = self.fetch_with_token(detail_url.as_str()).await?;
            let time_and_location = process_json::<Value>(&detail, "course time and location")?;
            let url = self
                .urls
                .course_page(&raw.course_id, course_type)?
                .to_string();
            courses.push(lw_parser::parse_course(
                raw,
                time_and_location,
                url,
                course_type,
            )?);
        }

        Ok(courses)
    }

    /// Gets the homework listed at one of the homework list endpoints. Every homework listed
    /// there is given the same status.
    ///
    /// # Parameters
    /// - `url`: The homework list endpoint, e.g. from `LearnUrls::homework_list_sources`.
    /// - `status`: The status of every homework at this endpoint.
    ///
    /// # Returns
    /// The homework.
    pub async fn get_homework_list_at_url(
        &self,
        url: &str,
        status: HomeworkStatus,
    ) -> types::Result<Homeworks> {
        debug!("fetching {status} homework from {url}");
        let res = self.fetch_with_token(url).await?;
        lw_parser::parse_homework_list(
            process_json::<RawHomeworkListResponse>(&res, "homework list")?,
            status,
        )
    }

    /// Gets all homework in a course: first the unsubmitted ones, then the submitted but
    /// ungraded ones, and finally the graded ones.
    ///
    /// Only courses you take are supported. For `CourseType::Teacher`, an
    /// `UnsupportedOperation` error is returned without making any request.
    ///
    /// # Parameters
    /// - `course_id`: The course ID, e.g. from `get_course_list`.
    /// - `course_type`: The viewpoint of the course.
    ///
    /// # Returns
    /// The homework.
    ///
    /// # Example
    /// ```rust,no_run
    /// use learnweg::types::CourseType;
    /// use learnweg::wrapper::LearnWrapper;
    ///
    /// # #[tokio::main(flavor = "current_thread")]
    /// # async fn main() {
    /// let wrapper = LearnWrapper::new("2019012345", "my password").unwrap();
    /// let homework = wrapper
    ///     .get_homework_list("2019-2020-2140259642", CourseType::Student)
    ///     .await
    ///     .unwrap();
    /// homework.iter().for_each(|h| println!("{}", h));
    /// # }
    /// ```
    pub async fn get_homework_list(
        &self,
        course_id: &str,
        course_type: CourseType,
    ) -> types::Result<Homeworks> {
        if course_type == CourseType::Teacher {
            return Err(WrapperError::UnsupportedOperation(
                "homework lists are only available for courses you take",
            ));
        }

        let mut all_homework = vec![];
        for (url, status) in self.urls.homework_list_sources(course_id)? {
            all_homework.extend(self.get_homework_list_at_url(url.as_str(), status).await?);
        }

        Ok(all_homework)
    }
}
