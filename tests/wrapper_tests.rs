use std::cell::RefCell;
use std::rc::Rc;

use learnweg::types::{self, WrapperError};
use learnweg::wrapper::request_data::{LearnResponse, ReqType, Transport};
use learnweg::wrapper::wrapper_builder::LearnWrapperBuilder;
use learnweg::wrapper::LearnWrapper;

const ID_LOGIN: &str = "https://id.example.edu/do/off/ui/auth/login/post/0?/login.do";
const LEARN_PREFIX: &str = "https://learn.example.edu";

/// A request seen by the mock transport.
#[derive(Debug, Clone, PartialEq)]
pub struct SeenRequest {
    pub method: &'static str,
    pub url: String,
    pub form: Vec<(String, String)>,
}

/// A transport that answers from a fixed routing table and records every request. A route
/// matches if the requested URL contains its pattern; the first matching route wins. A
/// route with status `0` simulates a connection failure.
pub struct MockTransport {
    routes: Vec<(&'static str, u16, String)>,
    seen: Rc<RefCell<Vec<SeenRequest>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            routes: vec![],
            seen: Rc::new(RefCell::new(vec![])),
        }
    }

    pub fn route(mut self, pattern: &'static str, status: u16, body: &str) -> Self {
        self.routes.push((pattern, status, body.to_string()));
        self
    }

    /// The default login routes, all of which succeed.
    pub fn with_login(self) -> Self {
        self.route("id.example.edu", 200, include_str!("html/id_login_ok.html"))
            .route("roaming_entry", 200, "")
            .route(
                "/f/wlxt/index/course/student/",
                200,
                include_str!("html/course_page.html"),
            )
    }

    pub fn log(&self) -> Rc<RefCell<Vec<SeenRequest>>> {
        Rc::clone(&self.seen)
    }
}

impl Transport for MockTransport {
    async fn send(&self, req_type: ReqType<'_>) -> types::Result<LearnResponse> {
        let (method, form) = match req_type {
            ReqType::Get(_) => ("GET", vec![]),
            ReqType::Post(_, form) => (
                "POST",
                form.iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            ),
        };

        let url = req_type.url();
        self.seen.borrow_mut().push(SeenRequest {
            method,
            url: url.to_string(),
            form,
        });

        // Lets other futures on the same task run, as a real network round trip would.
        tokio::task::yield_now().await;

        match self.routes.iter().find(|(p, _, _)| url.contains(p)) {
            Some((_, 0, _)) => Err(WrapperError::GeneralError("connection refused".into())),
            Some((_, status, body)) => Ok(LearnResponse {
                status: *status,
                body: body.clone(),
            }),
            None => Ok(LearnResponse {
                status: 404,
                body: String::new(),
            }),
        }
    }
}

/// Gets a wrapper backed by the given mock transport.
///
/// # Parameters
/// - `transport`: The mock transport.
///
/// # Returns
/// The wrapper, and the log of requests it makes.
pub fn get_wrapper(
    transport: MockTransport,
) -> (LearnWrapper<MockTransport>, Rc<RefCell<Vec<SeenRequest>>>) {
    let log = transport.log();
    let wrapper = LearnWrapperBuilder::new()
        .with_credentials("2019012345", "hunter2")
        .with_learn_prefix(LEARN_PREFIX)
        .with_id_login_url(ID_LOGIN)
        .try_build_with_transport(transport)
        .unwrap();
    (wrapper, log)
}

/// Gets the URLs of all requests in the log.
pub fn urls(log: &Rc<RefCell<Vec<SeenRequest>>>) -> Vec<String> {
    log.borrow().iter().map(|r| r.url.clone()).collect()
}

#[cfg(test)]
mod login_tests {
    use learnweg::types::WrapperError;

    use crate::{get_wrapper, urls, MockTransport, ID_LOGIN};

    #[tokio::test]
    pub async fn test_login_sequence() {
        let (wrapper, log) = get_wrapper(MockTransport::new().with_login());
        wrapper.login().await.unwrap();
        assert!(wrapper.is_logged_in());

        let log = log.borrow();
        assert_eq!(3, log.len());
        assert_eq!("POST", log[0].method);
        assert_eq!(ID_LOGIN, log[0].url);
        assert_eq!(
            vec![
                ("i_user".to_string(), "2019012345".to_string()),
                ("i_pass".to_string(), "hunter2".to_string()),
                ("atOnce".to_string(), "true".to_string()),
            ],
            log[0].form
        );
        assert_eq!(
            "https://learn.example.edu/b/j_spring_security_thauth_roaming_entry?ticket=ST-4f9a2c71",
            log[1].url
        );
        assert_eq!(
            "https://learn.example.edu/f/wlxt/index/course/student/",
            log[2].url
        );
    }

    #[tokio::test]
    pub async fn test_bad_credentials() {
        let (wrapper, log) = get_wrapper(
            MockTransport::new()
                .route("id.example.edu", 200, include_str!("html/id_login_bad.html"))
                .route("roaming_entry", 200, ""),
        );

        assert!(matches!(
            wrapper.login().await,
            Err(WrapperError::BadCredentials)
        ));
        assert!(!wrapper.is_logged_in());
        assert_eq!(1, urls(&log).len());
    }

    #[tokio::test]
    pub async fn test_identity_provider_bad_status() {
        let (wrapper, _) = get_wrapper(MockTransport::new().route("id.example.edu", 502, ""));
        assert!(matches!(
            wrapper.login().await,
            Err(WrapperError::FetchFromId(_))
        ));
    }

    #[tokio::test]
    pub async fn test_identity_provider_unreachable() {
        let (wrapper, _) = get_wrapper(MockTransport::new().route("id.example.edu", 0, ""));
        assert!(matches!(
            wrapper.login().await,
            Err(WrapperError::FetchFromId(_))
        ));
    }

    #[tokio::test]
    pub async fn test_roaming_failure() {
        let (wrapper, log) = get_wrapper(
            MockTransport::new()
                .route("id.example.edu", 200, include_str!("html/id_login_ok.html"))
                .route("roaming_entry", 403, "Forbidden"),
        );

        assert!(matches!(wrapper.login().await, Err(WrapperError::Roaming(_))));
        assert_eq!(2, urls(&log).len());
    }

    #[tokio::test]
    pub async fn test_no_token_on_course_page() {
        let (wrapper, _) = get_wrapper(
            MockTransport::new()
                .route("id.example.edu", 200, include_str!("html/id_login_ok.html"))
                .route("roaming_entry", 200, "")
                .route(
                    "/f/wlxt/index/course/student/",
                    200,
                    include_str!("html/course_page_none.html"),
                ),
        );

        assert!(matches!(
            wrapper.login().await,
            Err(WrapperError::InvalidResponse(_))
        ));
        assert!(!wrapper.is_logged_in());
    }

    #[tokio::test]
    pub async fn test_logout_clears_token() {
        let (wrapper, log) = get_wrapper(MockTransport::new().with_login());
        wrapper.login().await.unwrap();
        wrapper.logout().await.unwrap();
        assert!(!wrapper.is_logged_in());

        let log = log.borrow();
        let last = log.last().unwrap();
        assert_eq!("POST", last.method);
        assert_eq!("https://learn.example.edu/f/j_spring_security_logout", last.url);
    }

    #[tokio::test]
    pub async fn test_failed_logout_still_forgets_token() {
        let (wrapper, log) = get_wrapper(
            MockTransport::new()
                .with_login()
                .route("j_spring_security_logout", 0, "")
                .route("/b/ping", 200, "{}"),
        );
        wrapper.login().await.unwrap();

        assert!(wrapper.logout().await.is_err());
        assert!(!wrapper.is_logged_in());

        // The next fetch goes through the identity provider again
        wrapper
            .fetch_with_token("https://learn.example.edu/b/ping")
            .await
            .unwrap();
        let logins = log
            .borrow()
            .iter()
            .filter(|r| r.method == "POST" && r.url == ID_LOGIN)
            .count();
        assert_eq!(2, logins);
        assert!(wrapper.is_logged_in());
    }
}

#[cfg(test)]
mod fetch_tests {
    use learnweg::types::WrapperError;

    use crate::{get_wrapper, urls, MockTransport, ID_LOGIN};

    #[tokio::test]
    pub async fn test_implicit_login_and_token() {
        let (wrapper, log) =
            get_wrapper(MockTransport::new().with_login().route("/b/ping", 200, "{}"));

        wrapper
            .fetch_with_token("https://learn.example.edu/b/ping")
            .await
            .unwrap();
        wrapper
            .fetch_with_token("https://learn.example.edu/b/ping?id=1")
            .await
            .unwrap();

        let urls = urls(&log);
        // Three login requests, then the two fetches; the second fetch does not log in again
        assert_eq!(5, urls.len());
        assert_eq!(
            "https://learn.example.edu/b/ping?_csrf=9e8d7c6b-session",
            urls[3]
        );
        assert_eq!(
            "https://learn.example.edu/b/ping?id=1&_csrf=9e8d7c6b-session",
            urls[4]
        );
    }

    #[tokio::test]
    pub async fn test_failed_implicit_login_skips_request() {
        let (wrapper, log) = get_wrapper(
            MockTransport::new()
                .route("id.example.edu", 200, include_str!("html/id_login_bad.html"))
                .route("/b/ping", 200, "{}"),
        );

        assert!(matches!(
            wrapper
                .fetch_with_token("https://learn.example.edu/b/ping")
                .await,
            Err(WrapperError::BadCredentials)
        ));
        assert!(!urls(&log).iter().any(|u| u.contains("/b/ping")));
    }

    #[tokio::test]
    pub async fn test_concurrent_fetches_share_one_login() {
        let (wrapper, log) =
            get_wrapper(MockTransport::new().with_login().route("/b/ping", 200, "{}"));

        let (a, b) = tokio::join!(
            wrapper.fetch_with_token("https://learn.example.edu/b/ping?id=a"),
            wrapper.fetch_with_token("https://learn.example.edu/b/ping?id=b"),
        );
        a.unwrap();
        b.unwrap();

        let log = log.borrow();
        assert_eq!(
            1,
            log.iter()
                .filter(|r| r.method == "POST" && r.url == ID_LOGIN)
                .count()
        );
        let mut fetched = log
            .iter()
            .filter(|r| r.url.contains("/b/ping"))
            .map(|r| r.url.as_str())
            .collect::<Vec<_>>();
        fetched.sort_unstable();
        assert_eq!(
            vec![
                "https://learn.example.edu/b/ping?id=a&_csrf=9e8d7c6b-session",
                "https://learn.example.edu/b/ping?id=b&_csrf=9e8d7c6b-session",
            ],
            fetched
        );
    }
}

#[cfg(test)]
mod semester_tests {
    use learnweg::types::{SemesterType, WrapperError};

    use crate::{get_wrapper, urls, MockTransport};

    #[tokio::test]
    pub async fn test_current_semester() {
        let (wrapper, log) = get_wrapper(MockTransport::new().with_login().route(
            "getCurrentAndNextSemester",
            200,
            include_str!("json/current_semester.json"),
        ));

        let semester = wrapper.get_current_semester().await.unwrap();
        assert_eq!(2019, semester.start_year);
        assert_eq!(2020, semester.end_year);
        assert_eq!(SemesterType::Spring, semester.semester_type);
        assert_eq!(
            "https://learn.example.edu/b/kc/zhjw_v_code_xnxq/getCurrentAndNextSemester?_csrf=9e8d7c6b-session",
            urls(&log).last().unwrap()
        );
    }

    #[tokio::test]
    pub async fn test_current_semester_not_json() {
        let (wrapper, _) = get_wrapper(MockTransport::new().with_login().route(
            "getCurrentAndNextSemester",
            200,
            "<html>login</html>",
        ));

        assert!(matches!(
            wrapper.get_current_semester().await,
            Err(WrapperError::InvalidResponse(_))
        ));
    }

    #[tokio::test]
    pub async fn test_semester_id_list() {
        let (wrapper, _) = get_wrapper(MockTransport::new().with_login().route(
            "queryxnxq",
            200,
            include_str!("json/semester_list.json"),
        ));

        assert_eq!(
            vec!["2019-2020-2", "2019-2020-1", "2018-2019-3"],
            wrapper.get_semester_id_list().await.unwrap()
        );
    }
}

#[cfg(test)]
mod course_tests {
    use learnweg::types::CourseType;
    use serde_json::json;

    use crate::{get_wrapper, urls, MockTransport};

    #[tokio::test]
    pub async fn test_one_detail_request_per_course() {
        let (wrapper, log) = get_wrapper(
            MockTransport::new()
                .with_login()
                .route(
                    "loadCourseBySemesterId/2019-2020-2",
                    200,
                    include_str!("json/course_list.json"),
                )
                .route(
                    "v_wlkc_xk_sjddb/detail",
                    200,
                    include_str!("json/course_time_location.json"),
                ),
        );

        let courses = wrapper
            .get_course_list("2019-2020-2", CourseType::Student)
            .await
            .unwrap();

        assert_eq!(2, courses.len());
        assert_eq!("2019-2020-2140259642", courses[0].id);
        assert_eq!("2019-2020-2151520265", courses[1].id);
        assert_eq!(
            "https://learn.example.edu/f/wlxt/index/course/student/course?wlkcid=2019-2020-2140259642",
            courses[0].url
        );
        assert_eq!("", courses[1].teacher_name);
        assert_eq!(
            json!(["星期二第2节(全周)，六教6A201", "星期四第2节(单周)，六教6A201"]),
            courses[0].time_and_location
        );
        assert!(courses.iter().all(|c| c.course_type == CourseType::Student));

        let details = urls(&log)
            .into_iter()
            .filter(|u| u.contains("v_wlkc_xk_sjddb/detail"))
            .collect::<Vec<_>>();
        assert_eq!(
            vec![
                "https://learn.example.edu/b/kc/v_wlkc_xk_sjddb/detail?id=2019-2020-2140259642&_csrf=9e8d7c6b-session",
                "https://learn.example.edu/b/kc/v_wlkc_xk_sjddb/detail?id=2019-2020-2151520265&_csrf=9e8d7c6b-session",
            ],
            details
        );
    }

    #[tokio::test]
    pub async fn test_teacher_course_list_endpoint() {
        let (wrapper, log) = get_wrapper(
            MockTransport::new()
                .with_login()
                .route(
                    "queryAsorCoCourseList/2019-2020-2/0",
                    200,
                    include_str!("json/course_list.json"),
                )
                .route(
                    "v_wlkc_xk_sjddb/detail",
                    200,
                    include_str!("json/course_time_location.json"),
                ),
        );

        let courses = wrapper
            .get_course_list("2019-2020-2", CourseType::Teacher)
            .await
            .unwrap();

        assert_eq!(2, courses.len());
        assert_eq!(
            "https://learn.example.edu/f/wlxt/index/course/teacher/course?wlkcid=2019-2020-2140259642",
            courses[0].url
        );
        assert_eq!(
            "https://learn.example.edu/f/wlxt/index/course/teacher/course?wlkcid=2019-2020-2151520265",
            courses[1].url
        );
        assert_eq!(
            json!(["星期二第2节(全周)，六教6A201", "星期四第2节(单周)，六教6A201"]),
            courses[1].time_and_location
        );
        assert!(courses.iter().all(|c| c.course_type == CourseType::Teacher));

        let urls = urls(&log);
        assert!(urls.iter().any(|u| u.starts_with(
            "https://learn.example.edu/b/kc/v_wlkc_kcb/queryAsorCoCourseList/2019-2020-2/0?"
        )));
        let details = urls
            .into_iter()
            .filter(|u| u.contains("v_wlkc_xk_sjddb/detail"))
            .collect::<Vec<_>>();
        assert_eq!(
            vec![
                "https://learn.example.edu/b/kc/v_wlkc_xk_sjddb/detail?id=2019-2020-2140259642&_csrf=9e8d7c6b-session",
                "https://learn.example.edu/b/kc/v_wlkc_xk_sjddb/detail?id=2019-2020-2151520265&_csrf=9e8d7c6b-session",
            ],
            details
        );
    }

    #[tokio::test]
    pub async fn test_teacher_course_list_null() {
        let (wrapper, log) = get_wrapper(MockTransport::new().with_login().route(
            "queryAsorCoCourseList/2019-2020-2/0",
            200,
            include_str!("json/course_list_null.json"),
        ));

        let courses = wrapper
            .get_course_list("2019-2020-2", CourseType::Teacher)
            .await
            .unwrap();
        assert!(courses.is_empty());
        assert!(!urls(&log).iter().any(|u| u.contains("detail")));
    }
}

#[cfg(test)]
mod homework_tests {
    use learnweg::types::{CourseType, HomeworkStatus, WrapperError};
    use learnweg::urls::LearnUrls;

    use crate::{get_wrapper, urls, MockTransport};

    const COURSE: &str = "2019-2020-2140259642";

    fn homework_transport() -> MockTransport {
        MockTransport::new()
            .with_login()
            .route("zyListWj", 200, include_str!("json/homework_new.json"))
            .route("zyListYjwg", 200, include_str!("json/homework_submitted.json"))
            .route("zyListYpg", 200, include_str!("json/homework_graded.json"))
    }

    #[tokio::test]
    pub async fn test_teacher_homework_is_unsupported() {
        let (wrapper, log) = get_wrapper(homework_transport());
        assert!(matches!(
            wrapper.get_homework_list(COURSE, CourseType::Teacher).await,
            Err(WrapperError::UnsupportedOperation(_))
        ));
        assert!(urls(&log).is_empty());
    }

    #[tokio::test]
    pub async fn test_homework_in_fixed_order() {
        let (wrapper, log) = get_wrapper(homework_transport());
        let homework = wrapper
            .get_homework_list(COURSE, CourseType::Student)
            .await
            .unwrap();

        assert_eq!(3, homework.len());
        assert_eq!("Project proposal", homework[0].title);
        assert_eq!(HomeworkStatus::NOT_SUBMITTED, homework[0].status);
        assert_eq!("Requirements document", homework[1].title);
        assert_eq!(HomeworkStatus::GRADED, homework[1].status);
        assert_eq!("Design review", homework[2].title);

        let lists = urls(&log)
            .into_iter()
            .filter(|u| u.contains("/b/wlxt/kczy/zy/student/index/"))
            .collect::<Vec<_>>();
        assert_eq!(3, lists.len());
        assert!(lists[0].contains("zyListWj?wlkcid=2019-2020-2140259642&size=200&_csrf="));
        assert!(lists[1].contains("zyListYjwg"));
        assert!(lists[2].contains("zyListYpg"));
    }

    #[tokio::test]
    pub async fn test_null_aa_data_is_empty() {
        let (wrapper, _) = get_wrapper(homework_transport());
        let homework = wrapper
            .get_homework_list_at_url(
                "https://learn.example.edu/b/wlxt/kczy/zy/student/index/zyListYjwg?wlkcid=x&size=200",
                HomeworkStatus::SUBMITTED,
            )
            .await
            .unwrap();
        assert!(homework.is_empty());
    }

    #[tokio::test]
    pub async fn test_failed_list_fails_everything() {
        let (wrapper, _) = get_wrapper(
            MockTransport::new()
                .with_login()
                .route("zyListWj", 200, include_str!("json/homework_new.json"))
                .route("zyListYjwg", 200, include_str!("json/homework_fail.json")),
        );

        assert!(matches!(
            wrapper.get_homework_list(COURSE, CourseType::Student).await,
            Err(WrapperError::InvalidResponse(_))
        ));
    }

    #[test]
    pub fn test_homework_url_round_trip() {
        let urls = LearnUrls::default();
        let sources = urls.homework_list_sources(COURSE).unwrap();
        for (url, _) in sources {
            assert_eq!(
                Some((COURSE.to_string(), 200)),
                LearnUrls::parse_course_query(url.as_str())
            );
        }
    }
}
