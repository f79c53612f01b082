use envtree::{Load, LoadError, Loader, define_config, get_env, load};
use std::collections::HashMap;

define_config! {
    #[derive(Debug, Default)]
    pub struct Worker {
        #[field(env = "QUEUE", doc = "Queue the worker consumes")]
        pub queue: String,

        #[field(env = "CONCURRENCY", doc = "Jobs processed in parallel")]
        pub concurrency: u16,
    }
}

define_config! {
    #[derive(Debug, Default)]
    pub struct AppConfig {
        #[field(env = "NAME", doc = "Service name")]
        pub name: String,

        #[field(env = "WORKERS", doc = "Background workers")]
        pub workers: Vec<Worker>,

        #[field(env = "LIMITS", doc = "Transfer limits in MB")]
        pub limits: HashMap<String, u32>,
    }
}

// Each test uses its own prefix, the process environment is shared.
fn set_env(key: &str, value: &str) {
    unsafe { std::env::set_var(key, value) };
}

#[test]
fn test_load_from_process_environment() {
    set_env("ENV_LOAD_APP_NAME", "billing");
    set_env("ENV_LOAD_APP_WORKERS_1_QUEUE", "invoices");
    set_env("env_load_app_workers_1_concurrency", "8");
    set_env("ENV_LOAD_APP_LIMITS_UPLOAD", "5");

    let mut config = AppConfig::default();
    load("env_load_app", &mut config).unwrap();

    assert_eq!(config.name, "billing");
    assert_eq!(config.workers.len(), 2);
    assert_eq!(config.workers[1].queue, "invoices");
    assert_eq!(config.workers[1].concurrency, 8);
    assert!(config.workers[0].queue.is_empty());
    assert_eq!(config.limits["upload"], 5);
}

#[test]
fn test_load_error_from_process_environment() {
    set_env("ENV_ERROR_APP_WORKERS_FIRST_QUEUE", "x");

    let mut config = AppConfig::default();
    let err = load("ENV_ERROR_APP", &mut config).unwrap_err();
    assert!(matches!(err, LoadError::InvalidIndex { ref index, .. } if index == "FIRST"));
}

#[test]
fn test_load_trait() {
    set_env("ENV_TRAIT_APP_NAME", "trait");

    let config = AppConfig::load("ENV_TRAIT_APP");
    assert_eq!(config.name, "trait");

    let limits = HashMap::<String, u32>::load_or_error("ENV_TRAIT_APP_LIMITS").unwrap();
    assert!(limits.is_empty());
}

#[test]
#[should_panic]
fn test_load_trait_panics_on_error() {
    set_env("ENV_PANIC_APP_WORKERS_0_CONCURRENCY", "many");
    let _config = AppConfig::load("ENV_PANIC_APP");
}

#[test]
fn test_load_from_dotenv_file() {
    dotenvy::from_filename("./test.env").ok();

    let config = AppConfig::load_or_error("dotenv_app").unwrap();
    assert_eq!(config.name, "from-dotenv");
    assert_eq!(config.workers.len(), 2);
    assert_eq!(config.workers[0].queue, "emails");
    assert_eq!(config.workers[0].concurrency, 4);
    assert_eq!(config.workers[1].queue, "reports");
    assert_eq!(config.limits["upload"], 10);
    assert_eq!(config.limits["download"], 20);
}

#[test]
fn test_loader_with_dotenv_keeps_existing_values() {
    set_env("ENV_DOTENV_APP_NAME", "from-env");

    let mut config = AppConfig::default();
    Loader::new("ENV_DOTENV_APP")
        .with_dotenv(true)
        .load(&mut config)
        .unwrap();
    assert_eq!(config.name, "from-env");
}

#[test]
fn test_get_env() {
    set_env("ENV_GET_SET", "DD");
    set_env("ENV_GET_EMPTY", "");

    assert_eq!(get_env("ENV_GET_UNSET", "BB"), "BB");
    assert_eq!(get_env("ENV_GET_SET", "EE"), "DD");
    assert_eq!(get_env("ENV_GET_EMPTY", "FF"), "FF");
}
