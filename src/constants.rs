pub(crate) const MY_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, \
like Gecko) Chrome/100.0.4896.60 Safari/537.36";

/// The default prefix of every Web Learning endpoint.
pub const LEARN_PREFIX: &str = "https://learn.tsinghua.edu.cn";

/// The default identity provider endpoint that credentials are posted to.
pub const ID_LOGIN: &str =
    "https://id.tsinghua.edu.cn/do/off/ui/auth/login/post/bb5df85216504820be7bba2b0ae1535b/0?/login.do";

/// The ticket the identity provider hands out when the username or password is wrong.
pub(crate) const BAD_CREDENTIALS: &str = "BAD_CREDENTIALS";

/// The value of the `message`/`result` discriminator on a successful response.
pub(crate) const SUCCESS: &str = "success";

/// The name of the query parameter carrying the security token.
pub(crate) const CSRF_PARAM: &str = "_csrf";

/// The page size requested from list endpoints.
pub(crate) const MAX_SIZE: usize = 200;

// Paths under the Web Learning prefix
pub(crate) const AUTH_ROAM: &str = "/b/j_spring_security_thauth_roaming_entry";
pub(crate) const LOGOUT: &str = "/f/j_spring_security_logout";
pub(crate) const STUDENT_COURSE_LIST_PAGE: &str = "/f/wlxt/index/course/student/";
pub(crate) const SEMESTER_LIST: &str = "/b/wlxt/kc/v_wlkc_xs_xktjb_coassb/queryxnxq";
pub(crate) const CURRENT_SEMESTER: &str = "/b/kc/zhjw_v_code_xnxq/getCurrentAndNextSemester";
pub(crate) const STUDENT_COURSE_LIST: &str =
    "/b/wlxt/kc/v_wlkc_xs_xkb_kcb_extend/student/loadCourseBySemesterId";
pub(crate) const TEACHER_COURSE_LIST: &str = "/b/kc/v_wlkc_kcb/queryAsorCoCourseList";
pub(crate) const COURSE_PAGE: &str = "/f/wlxt/index/course";
pub(crate) const COURSE_TIME_LOCATION: &str = "/b/kc/v_wlkc_xk_sjddb/detail";

pub(crate) const HOMEWORK_LIST_NEW: &str = "/b/wlxt/kczy/zy/student/index/zyListWj";
pub(crate) const HOMEWORK_LIST_SUBMITTED: &str = "/b/wlxt/kczy/zy/student/index/zyListYjwg";
pub(crate) const HOMEWORK_LIST_GRADED: &str = "/b/wlxt/kczy/zy/student/index/zyListYpg";

/// The date format used by the semester endpoint.
pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

/// The deadline format used by the homework endpoints.
pub(crate) const DEADLINE_FORMAT: &str = "%Y-%m-%d %H:%M";
