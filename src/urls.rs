use url::Url;

use crate::constants::*;
use crate::types::{self, CourseType, HomeworkStatus};

/// The lookup table of every endpoint the wrapper talks to. Every URL is derived from two
/// configurable bases: the Web Learning prefix and the identity provider login URL.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct LearnUrls {
    learn_prefix: String,
    id_login: String,
}

impl LearnUrls {
    /// Creates a new lookup table.
    ///
    /// # Parameters
    /// - `learn_prefix`: The Web Learning prefix, e.g. `https://learn.tsinghua.edu.cn`. A
    ///                   trailing slash is ignored.
    /// - `id_login`: The identity provider endpoint that credentials are posted to.
    ///
    /// # Returns
    /// The lookup table.
    pub fn new(learn_prefix: impl Into<String>, id_login: impl Into<String>) -> Self {
        let mut learn_prefix = learn_prefix.into();
        while learn_prefix.ends_with('/') {
            learn_prefix.pop();
        }

        Self {
            learn_prefix,
            id_login: id_login.into(),
        }
    }

    pub fn learn_prefix(&self) -> &str {
        &self.learn_prefix
    }

    pub fn id_login(&self) -> &str {
        &self.id_login
    }

    fn learn(&self, path: &str) -> String {
        format!("{}{}", self.learn_prefix, path)
    }

    /// The URL that redeems a ticket for a Web Learning session.
    pub fn auth_roam(&self, ticket: &str) -> types::Result<Url> {
        Ok(Url::parse_with_params(
            &self.learn(AUTH_ROAM),
            &[("ticket", ticket)],
        )?)
    }

    pub fn logout(&self) -> String {
        self.learn(LOGOUT)
    }

    /// The student course list page. Besides being a page, this is also where the security
    /// token is scraped from after logging in.
    pub fn student_course_list_page(&self) -> String {
        self.learn(STUDENT_COURSE_LIST_PAGE)
    }

    pub fn semester_list(&self) -> String {
        self.learn(SEMESTER_LIST)
    }

    pub fn current_semester(&self) -> String {
        self.learn(CURRENT_SEMESTER)
    }

    /// The course list of a semester, as seen from the given viewpoint.
    pub fn course_list(&self, semester_id: &str, course_type: CourseType) -> String {
        match course_type {
            CourseType::Student => format!("{}/{}", self.learn(STUDENT_COURSE_LIST), semester_id),
            CourseType::Teacher => {
                format!("{}/{}/0", self.learn(TEACHER_COURSE_LIST), semester_id)
            }
        }
    }

    /// The page of a single course.
    pub fn course_page(&self, course_id: &str, course_type: CourseType) -> types::Result<Url> {
        Ok(Url::parse_with_params(
            &format!("{}/{}/course", self.learn(COURSE_PAGE), course_type.as_path()),
            &[("wlkcid", course_id)],
        )?)
    }

    pub fn course_time_location(&self, course_id: &str) -> types::Result<Url> {
        Ok(Url::parse_with_params(
            &self.learn(COURSE_TIME_LOCATION),
            &[("id", course_id)],
        )?)
    }

    fn homework_list(&self, path: &str, course_id: &str) -> types::Result<Url> {
        Ok(Url::parse_with_params(
            &self.learn(path),
            &[("wlkcid", course_id), ("size", MAX_SIZE.to_string().as_str())],
        )?)
    }

    /// The three homework list endpoints of a student course, each paired with the status
    /// every homework listed there has. The order is: not submitted, submitted, graded.
    ///
    /// # Parameters
    /// - `course_id`: The Web Learning course ID.
    ///
    /// # Returns
    /// The endpoints and their statuses.
    pub fn homework_list_sources(
        &self,
        course_id: &str,
    ) -> types::Result<[(Url, HomeworkStatus); 3]> {
        Ok([
            (
                self.homework_list(HOMEWORK_LIST_NEW, course_id)?,
                HomeworkStatus::NOT_SUBMITTED,
            ),
            (
                self.homework_list(HOMEWORK_LIST_SUBMITTED, course_id)?,
                HomeworkStatus::SUBMITTED,
            ),
            (
                self.homework_list(HOMEWORK_LIST_GRADED, course_id)?,
                HomeworkStatus::GRADED,
            ),
        ])
    }

    /// Parses a course-scoped list URL (e.g. one returned by `homework_list_sources`) back
    /// into the course ID and page size it was built with.
    ///
    /// # Parameters
    /// - `url`: The URL to parse.
    ///
    /// # Returns
    /// The course ID and the page size, or `None` if either is missing or the size is not
    /// a number.
    pub fn parse_course_query(url: &str) -> Option<(String, usize)> {
        let url = Url::parse(url).ok()?;
        let mut course_id = None;
        let mut size = None;
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "wlkcid" => course_id = Some(value.into_owned()),
                "size" => size = value.parse::<usize>().ok(),
                _ => {}
            }
        }

        Some((course_id?, size?))
    }
}

impl Default for LearnUrls {
    fn default() -> Self {
        Self::new(LEARN_PREFIX, ID_LOGIN)
    }
}
