use crate::constants::CSRF_PARAM;
use crate::types::SemesterType;

/// Appends the security token to the given URL as the `_csrf` query parameter.
///
/// # Parameters
/// - `url`: The URL. If it already contains a query string, the token is appended with
///          `&`; otherwise, a query string is started with `?`.
/// - `token`: The security token.
///
/// # Returns
/// The URL with the token.
///
/// # Example
/// ```rust
/// use learnweg::util::append_csrf_token;
///
/// assert_eq!("https://a.b/c?_csrf=t", append_csrf_token("https://a.b/c", "t"));
/// assert_eq!("https://a.b/c?d=1&_csrf=t", append_csrf_token("https://a.b/c?d=1", "t"));
/// ```
pub fn append_csrf_token(url: &str, token: &str) -> String {
    let sep = if url.contains('?') { '&' } else { '?' };
    format!("{url}{sep}{CSRF_PARAM}={token}")
}

/// Parses the term digit at the end of an academic year string.
///
/// # Parameters
/// - `n`: The term digit.
///
/// # Returns
/// The semester type. `1` is fall, `2` is spring, `3` is summer and anything else is
/// unknown.
pub fn parse_semester_type(n: u32) -> SemesterType {
    match n {
        1 => SemesterType::Fall,
        2 => SemesterType::Spring,
        3 => SemesterType::Summer,
        _ => SemesterType::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_is_appended_with_the_right_separator() {
        assert_eq!(
            "https://learn.tsinghua.edu.cn/b/x?_csrf=abc",
            append_csrf_token("https://learn.tsinghua.edu.cn/b/x", "abc")
        );
        assert_eq!(
            "https://learn.tsinghua.edu.cn/b/x?id=1&_csrf=abc",
            append_csrf_token("https://learn.tsinghua.edu.cn/b/x?id=1", "abc")
        );
    }

    #[test]
    fn term_digits() {
        assert_eq!(SemesterType::Fall, parse_semester_type(1));
        assert_eq!(SemesterType::Spring, parse_semester_type(2));
        assert_eq!(SemesterType::Summer, parse_semester_type(3));
        assert_eq!(SemesterType::Unknown, parse_semester_type(0));
        assert_eq!(SemesterType::Unknown, parse_semester_type(4));
    }
}
