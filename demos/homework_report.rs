use learnweg::types::CourseType;
use learnweg::wrapper::LearnWrapper;

/// Prints the current semester, its courses, and the homework of each course. The
/// credentials are read from `LEARN_USERNAME` and `LEARN_PASSWORD`, which may also be put in
/// a `.env` file.
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Don't fail if there is no .env file.
    let _ = dotenv::dotenv();
    env_logger::init();

    let (Ok(username), Ok(password)) = (
        std::env::var("LEARN_USERNAME"),
        std::env::var("LEARN_PASSWORD"),
    ) else {
        eprintln!("LEARN_USERNAME and LEARN_PASSWORD must be set.");
        return;
    };

    let wrapper = match LearnWrapper::new(username, password) {
        Ok(w) => w,
        Err(e) => {
            eprintln!("Could not create the wrapper: {e}");
            return;
        }
    };

    // Logging in is optional; the first request would do it anyway. Doing it here gives
    // a clearer error.
    if let Err(e) = wrapper.login().await {
        eprintln!("Could not log in: {e}");
        return;
    }

    let semester = match wrapper.get_current_semester().await {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Could not get the current semester: {e}");
            return;
        }
    };
    println!("{semester}");

    let courses = match wrapper
        .get_course_list(&semester.id, CourseType::Student)
        .await
    {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Could not get the course list: {e}");
            return;
        }
    };

    for course in courses {
        print!("{course}");
        match wrapper.get_homework_list(&course.id, course.course_type).await {
            Ok(homework) => homework.iter().for_each(|h| print!("{h}")),
            Err(e) => eprintln!("\tCould not get homework: {e}"),
        }
    }

    _ = wrapper.logout().await;
}
