use std::fmt::{Display, Formatter};

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use thiserror::Error;

/// The generic type is the return value. Otherwise, regardless of request type,
/// we're just returning the error if there is an error.
pub type Result<T, E = WrapperError> = std::result::Result<T, E>;

/// All courses in a semester.
pub type Courses = Vec<CourseInfo>;

/// All homework in a course.
pub type Homeworks = Vec<Homework>;

/// The username and password used to log in through the identity provider.
#[derive(Clone, Eq, PartialEq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub(crate) fn password(&self) -> &str {
        &self.password
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<hidden>")
            .finish()
    }
}

/// The type of a semester, derived from the last digit of the academic year string.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize)]
pub enum SemesterType {
    Fall,
    Spring,
    Summer,
    Unknown,
}

impl SemesterType {
    /// Gets the label that the Web Learning portal itself uses for this semester type.
    ///
    /// # Returns
    /// The label, e.g. `春季学期` for the spring semester.
    pub fn chinese_name(&self) -> &'static str {
        match self {
            SemesterType::Fall => "秋季学期",
            SemesterType::Spring => "春季学期",
            SemesterType::Summer => "夏季学期",
            SemesterType::Unknown => "未知学期",
        }
    }
}

impl Display for SemesterType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SemesterType::Fall => write!(f, "Fall"),
            SemesterType::Spring => write!(f, "Spring"),
            SemesterType::Summer => write!(f, "Summer"),
            SemesterType::Unknown => write!(f, "Unknown"),
        }
    }
}

/// The viewpoint of the current user for a course. This selects which family of endpoints
/// is used.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize)]
pub enum CourseType {
    /// The user is enrolled in the course.
    Student,
    /// The user is on the teaching staff of the course.
    Teacher,
}

impl CourseType {
    /// The path segment used by the portal for this course type.
    pub fn as_path(&self) -> &'static str {
        match self {
            CourseType::Student => "student",
            CourseType::Teacher => "teacher",
        }
    }
}

impl Display for CourseType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_path())
    }
}

/// Information about a semester.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct Semester {
    /// The semester ID. For example, `2019-2020-2`.
    pub id: String,
    /// The first day of the semester.
    pub start_date: NaiveDate,
    /// The last day of the semester.
    pub end_date: NaiveDate,
    /// The first year of the academic year. For `2019-2020-2`, this is `2019`.
    pub start_year: i32,
    /// The second year of the academic year. For `2019-2020-2`, this is `2020`.
    pub end_year: i32,
    /// The semester type. For `2019-2020-2`, this is `Spring`.
    pub semester_type: SemesterType,
}

impl Display for Semester {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "[{}] {}-{} {}",
            self.id, self.start_year, self.end_year, self.semester_type
        )?;
        writeln!(f, "\tFrom {} to {}", self.start_date, self.end_date)
    }
}

/// A course that the user is enrolled in or teaches.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseInfo {
    /// The Web Learning course ID (`wlkcid`).
    pub id: String,
    /// The course name.
    pub name: String,
    /// The English course name.
    pub english_name: String,
    /// The time and location information, exactly as the portal returns it.
    pub time_and_location: serde_json::Value,
    /// The URL of the course page.
    pub url: String,
    /// The name of the teacher. Empty if the portal does not provide one.
    pub teacher_name: String,
    /// The teacher's staff number.
    pub teacher_number: String,
    /// The course number, e.g. `30240243`.
    pub course_number: String,
    /// The course index (section number).
    pub course_index: i64,
    /// Whether this course was fetched from the student or teacher viewpoint.
    pub course_type: CourseType,
}

impl Display for CourseInfo {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "[{}] {} ({}) - {}",
            self.id, self.name, self.english_name, self.course_number
        )?;
        writeln!(f, "\tTeacher: {}", self.teacher_name)?;
        writeln!(f, "\tIndex: {}", self.course_index)?;
        writeln!(f, "\tURL: {}", self.url)
    }
}

/// The state of a homework assignment. Only three states are observable: not submitted,
/// submitted but not graded, and graded.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize)]
pub struct HomeworkStatus {
    submitted: bool,
    graded: bool,
}

impl HomeworkStatus {
    /// The homework has not been submitted.
    pub const NOT_SUBMITTED: HomeworkStatus = HomeworkStatus {
        submitted: false,
        graded: false,
    };

    /// The homework has been submitted but not graded yet.
    pub const SUBMITTED: HomeworkStatus = HomeworkStatus {
        submitted: true,
        graded: false,
    };

    /// The homework has been submitted and graded.
    pub const GRADED: HomeworkStatus = HomeworkStatus {
        submitted: true,
        graded: true,
    };

    /// Creates a new status from the two flags.
    ///
    /// # Parameters
    /// - `submitted`: Whether the homework was submitted.
    /// - `graded`: Whether the homework was graded.
    ///
    /// # Returns
    /// The status, or an error if the homework is marked as graded without being submitted.
    pub fn new(submitted: bool, graded: bool) -> Result<Self> {
        if graded && !submitted {
            return Err(WrapperError::InputError(
                "graded",
                "homework cannot be graded without being submitted.",
            ));
        }

        Ok(Self { submitted, graded })
    }

    pub fn submitted(&self) -> bool {
        self.submitted
    }

    pub fn graded(&self) -> bool {
        self.graded
    }
}

impl Display for HomeworkStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match (self.submitted, self.graded) {
            (true, true) => write!(f, "Graded"),
            (true, false) => write!(f, "Ungraded"),
            _ => write!(f, "Not submitted"),
        }
    }
}

/// A homework assignment in a course.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct Homework {
    /// The homework ID (`zyid`).
    pub id: String,
    /// The ID of this student's copy of the homework (`xszyid`).
    pub student_homework_id: String,
    /// The title.
    pub title: String,
    /// The deadline, in the portal's local time.
    pub deadline: NaiveDateTime,
    /// Whether the homework was submitted and graded.
    pub status: HomeworkStatus,
}

impl Display for Homework {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "[{}] {}", self.id, self.title)?;
        writeln!(f, "\tDeadline: {}", self.deadline)?;
        writeln!(f, "\tStatus: {}", self.status)
    }
}

#[derive(Error, Debug)]
pub enum WrapperError {
    /// Occurs if the identity provider could not be reached or answered with a bad
    /// status code.
    #[error("Could not fetch a ticket from the identity provider: {0}")]
    FetchFromId(String),

    /// Occurs if the identity provider rejected the username or password.
    #[error("The identity provider rejected the given credentials.")]
    BadCredentials,

    /// Occurs if redeeming the ticket at the Web Learning portal failed.
    #[error("Roaming authentication failed: {0}")]
    Roaming(String),

    /// Occurs if a response did not have the expected shape, or the discriminator
    /// field did not indicate success.
    #[error("Invalid response from Web Learning: {0}")]
    InvalidResponse(String),

    /// Occurs if the requested operation is not available for the given course type.
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(&'static str),

    /// Occurs if there was an error encountered by the reqwest library.
    #[error("Request error occurred: {0}")]
    RequestError(#[from] reqwest::Error),

    /// Occurs when there was an error parsing the URL.
    #[error("Malformed url: {0}")]
    UrlParseError(#[from] url::ParseError),

    /// Occurs when the given input is not valid.
    #[error("Invalid input for '{0}' provided: {1}")]
    InputError(&'static str, &'static str),

    /// The general error, given when the particular error doesn't
    /// fit into any of the other categories.
    #[error("Error: {0}")]
    GeneralError(String),
}
