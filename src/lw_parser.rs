use chrono::{NaiveDate, NaiveDateTime};
use log::debug;
use regex::Regex;
use scraper::{Html, Selector};
use serde_json::Value;

use crate::constants::*;
use crate::raw_types::{
    RawCourse, RawCourseListResponse, RawHomework, RawHomeworkListResponse, RawSemester,
    RawSemesterResponse,
};
use crate::types::{
    self, CourseInfo, CourseType, Homework, HomeworkStatus, Homeworks, Semester, WrapperError,
};
use crate::util::parse_semester_type;

/// Extracts the ticket from the identity provider's response. The response is a small HTML
/// page whose first anchor links to the portal; the ticket is whatever follows the last `=`
/// in that link.
///
/// # Parameters
/// - `body`: The HTML returned by the identity provider.
///
/// # Returns
/// The ticket, or an error if the page has no anchor with a link. Note that a rejected
/// login still produces a ticket, namely `BAD_CREDENTIALS`.
pub fn parse_ticket(body: &str) -> types::Result<String> {
    let document = Html::parse_document(body);
    let anchor = Selector::parse("a")
        .map_err(|e| WrapperError::GeneralError(format!("bad anchor selector: {e}")))?;

    let href = document
        .select(&anchor)
        .next()
        .and_then(|a| a.value().attr("href"))
        .ok_or_else(|| {
            WrapperError::InvalidResponse("no redirect link in identity provider response".into())
        })?;

    // `rsplit` always yields at least one item.
    Ok(href.rsplit('=').next().unwrap_or(href).to_string())
}

/// Extracts the security token from the student course list page. Links on that page carry
/// the token as a `_csrf` query parameter after some other parameter (`&_csrf=`).
///
/// Candidates are counted per line: a line with several such links yields only its last
/// one, and `?_csrf=` links are not counted. The page's fixed layout puts the token for the
/// logged in user on the second candidate line, so that one is used when available; a page
/// with a single candidate uses the first.
///
/// # Parameters
/// - `page`: The raw text of the course list page.
///
/// # Returns
/// The token, or an error if the page does not contain any.
pub fn parse_csrf_token(page: &str) -> types::Result<String> {
    // `.` stops at line breaks, so the greedy prefix leaves one match per line.
    let token_regex = Regex::new(r#".*&_csrf=(\S*)".*"#)
        .map_err(|e| WrapperError::GeneralError(format!("bad token pattern: {e}")))?;

    let candidates = token_regex
        .captures_iter(page)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .collect::<Vec<_>>();

    let token = candidates
        .get(1)
        .or_else(|| candidates.first())
        .ok_or_else(|| WrapperError::InvalidResponse("no security token on course page".into()))?;

    if candidates.iter().any(|c| c != token) {
        debug!(
            "course page has {} differing token candidates, using {}",
            candidates.len(),
            token
        );
    }

    Ok(token.to_string())
}

/// Checks the `message`/`result` discriminator of a response.
fn check_success(discriminator: Option<&str>, what: &str) -> types::Result<()> {
    match discriminator {
        Some(SUCCESS) => Ok(()),
        Some(other) => Err(WrapperError::InvalidResponse(format!(
            "{what} request was not successful: {other}"
        ))),
        None => Err(WrapperError::InvalidResponse(format!(
            "{what} response has no status"
        ))),
    }
}

fn parse_date(s: &str) -> types::Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|e| WrapperError::InvalidResponse(format!("bad date '{s}': {e}")))
}

fn parse_year(year_and_term: &str, from: usize, to: usize) -> types::Result<i32> {
    year_and_term
        .get(from..to)
        .and_then(|s| s.parse::<i32>().ok())
        .ok_or_else(|| {
            WrapperError::InvalidResponse(format!("bad academic year '{year_and_term}'"))
        })
}

/// Converts the raw semester object into a `Semester`.
///
/// # Parameters
/// - `raw`: The raw semester.
///
/// # Returns
/// The semester, or an error if the academic year string is not of the form `YYYY-YYYY-N`
/// or either date is not of the form `YYYY-MM-DD`.
pub fn parse_semester(raw: RawSemester) -> types::Result<Semester> {
    let xnxq = raw.year_and_term.as_str();
    let start_year = parse_year(xnxq, 0, 4)?;
    let end_year = parse_year(xnxq, 5, 9)?;
    let term = xnxq
        .get(10..11)
        .and_then(|s| s.parse::<u32>().ok())
        .ok_or_else(|| WrapperError::InvalidResponse(format!("bad academic term '{xnxq}'")))?;

    Ok(Semester {
        start_date: parse_date(&raw.start_date)?,
        end_date: parse_date(&raw.end_date)?,
        start_year,
        end_year,
        semester_type: parse_semester_type(term),
        id: raw.id,
    })
}

/// Processes the response of the current semester endpoint.
///
/// # Parameters
/// - `res`: The raw response.
///
/// # Returns
/// The current semester.
pub fn parse_current_semester(res: RawSemesterResponse) -> types::Result<Semester> {
    check_success(res.message.as_deref(), "current semester")?;
    let raw = res
        .result
        .ok_or_else(|| WrapperError::InvalidResponse("current semester is missing".into()))?;
    parse_semester(raw)
}

/// Processes the response of the course list endpoint, without the per-course details.
///
/// # Parameters
/// - `res`: The raw response.
///
/// # Returns
/// The raw courses. A missing or `null` list is treated as an empty one.
pub fn parse_course_list(res: RawCourseListResponse) -> types::Result<Vec<RawCourse>> {
    check_success(res.message.as_deref(), "course list")?;
    Ok(res.result_list.unwrap_or_default())
}

fn parse_course_index(raw: &Value) -> types::Result<i64> {
    let index = match raw {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };

    index.ok_or_else(|| WrapperError::InvalidResponse(format!("bad course index {raw}")))
}

/// Converts a raw course into a `CourseInfo`.
///
/// # Parameters
/// - `raw`: The raw course.
/// - `time_and_location`: The time and location details fetched separately for this course.
/// - `url`: The URL of the course page.
/// - `course_type`: The viewpoint the course was fetched from.
///
/// # Returns
/// The course, or an error if the course index is not a number.
pub fn parse_course(
    raw: RawCourse,
    time_and_location: Value,
    url: String,
    course_type: CourseType,
) -> types::Result<CourseInfo> {
    Ok(CourseInfo {
        course_index: parse_course_index(&raw.course_index)?,
        id: raw.course_id,
        name: raw.name,
        english_name: raw.english_name.unwrap_or_default(),
        time_and_location,
        url,
        teacher_name: raw.teacher_name.unwrap_or_default(),
        teacher_number: raw.teacher_number.unwrap_or_default(),
        course_number: raw.course_number,
        course_type,
    })
}

fn parse_homework(raw: RawHomework, status: HomeworkStatus) -> types::Result<Homework> {
    let deadline = NaiveDateTime::parse_from_str(raw.deadline.trim(), DEADLINE_FORMAT)
        .map_err(|e| {
            WrapperError::InvalidResponse(format!("bad deadline '{}': {e}", raw.deadline))
        })?;

    Ok(Homework {
        id: raw.homework_id,
        student_homework_id: raw.student_homework_id,
        title: raw.title,
        deadline,
        status,
    })
}

/// Processes the response of one homework list endpoint.
///
/// # Parameters
/// - `res`: The raw response.
/// - `status`: The status every homework on this endpoint has.
///
/// # Returns
/// The homework, in the order the portal listed them. A missing or `null` list is treated
/// as an empty one; a single malformed entry fails the whole list.
pub fn parse_homework_list(
    res: RawHomeworkListResponse,
    status: HomeworkStatus,
) -> types::Result<Homeworks> {
    check_success(res.result.as_deref(), "homework list")?;
    res.object
        .and_then(|o| o.aa_data)
        .unwrap_or_default()
        .into_iter()
        .map(|h| parse_homework(h, status))
        .collect()
}

/// Processes the response of the semester list endpoint, which is a plain array of
/// semester IDs.
///
/// # Parameters
/// - `res`: The raw response.
///
/// # Returns
/// The semester IDs, skipping any `null` entries.
pub fn parse_semester_id_list(res: Value) -> types::Result<Vec<String>> {
    let Value::Array(entries) = res else {
        return Err(WrapperError::InvalidResponse(
            "semester list is not an array".into(),
        ));
    };

    entries
        .into_iter()
        .filter(|e| !e.is_null())
        .map(|e| match e {
            Value::String(s) => Ok(s),
            other => Err(WrapperError::InvalidResponse(format!(
                "bad semester id {other}"
            ))),
        })
        .collect()
}
