use std::time::Duration;

use learnweg::types::{Credentials, WrapperError};
use learnweg::wrapper::wrapper_builder::LearnWrapperBuilder;
use learnweg::wrapper::LearnWrapper;
use reqwest::Client;

#[test]
fn fail_construct_wrapper() {
    let wrapper = LearnWrapperBuilder::new()
        .with_client(Client::new())
        .with_default_timeout(Duration::from_secs(5))
        .try_build_wrapper();
    assert!(matches!(wrapper, Err(WrapperError::InputError("credentials", _))));
}

#[test]
fn success_construct_wrapper() {
    let wrapper = LearnWrapperBuilder::new()
        .with_credentials("2019012345", "hunter2")
        .with_learn_prefix("https://learn.example.edu/")
        .try_build_wrapper()
        .unwrap();
    assert!(!wrapper.is_logged_in());
    assert_eq!("https://learn.example.edu", wrapper.urls().learn_prefix());
}

#[test]
fn success_construct_default_wrapper() {
    let wrapper = LearnWrapper::new("2019012345", "hunter2").unwrap();
    assert_eq!("https://learn.tsinghua.edu.cn", wrapper.urls().learn_prefix());
}

#[test]
fn credentials_hide_password() {
    let credentials = Credentials::new("2019012345", "hunter2");
    let debug = format!("{credentials:?}");
    assert!(debug.contains("2019012345"));
    assert!(!debug.contains("hunter2"));
}
