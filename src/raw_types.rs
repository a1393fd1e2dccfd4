//! Raw shapes of the JSON payloads returned by the Web Learning portal. Field names follow
//! the portal's pinyin abbreviations; the doc comment on each field says what it holds.

use serde::Deserialize;
use serde_json::Value;

/// The response of the current semester endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct RawSemesterResponse {
    /// `success` if the request went through.
    pub message: Option<String>,
    pub result: Option<RawSemester>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawSemester {
    /// The semester ID.
    pub id: String,
    /// Start date (`kssj`), formatted `YYYY-MM-DD`.
    #[serde(rename = "kssj")]
    pub start_date: String,
    /// End date (`jssj`), formatted `YYYY-MM-DD`.
    #[serde(rename = "jssj")]
    pub end_date: String,
    /// Academic year and term (`xnxq`), formatted `YYYY-YYYY-N`.
    #[serde(rename = "xnxq")]
    pub year_and_term: String,
}

/// The response of the course list endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct RawCourseListResponse {
    pub message: Option<String>,
    #[serde(rename = "resultList")]
    pub result_list: Option<Vec<RawCourse>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawCourse {
    /// Web Learning course ID.
    #[serde(rename = "wlkcid")]
    pub course_id: String,
    /// Course name.
    #[serde(rename = "kcm")]
    pub name: String,
    /// English course name.
    #[serde(rename = "ywkcm")]
    pub english_name: Option<String>,
    /// Teacher name.
    #[serde(rename = "jsm")]
    pub teacher_name: Option<String>,
    /// Teacher staff number.
    #[serde(rename = "jsh")]
    pub teacher_number: Option<String>,
    /// Course number.
    #[serde(rename = "kch")]
    pub course_number: String,
    /// Course index. The portal sends either a number or a numeric string.
    #[serde(rename = "kxh")]
    pub course_index: Value,
}

/// The response of the homework list endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct RawHomeworkListResponse {
    /// `success` if the request went through.
    pub result: Option<String>,
    pub object: Option<RawHomeworkObject>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawHomeworkObject {
    #[serde(rename = "aaData")]
    pub aa_data: Option<Vec<RawHomework>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawHomework {
    /// Homework ID.
    #[serde(rename = "zyid")]
    pub homework_id: String,
    /// The ID of the student's copy of the homework.
    #[serde(rename = "xszyid")]
    pub student_homework_id: String,
    /// Title.
    #[serde(rename = "bt")]
    pub title: String,
    /// Deadline, formatted `YYYY-MM-DD HH:MM`.
    #[serde(rename = "jzsjStr")]
    pub deadline: String,
}
