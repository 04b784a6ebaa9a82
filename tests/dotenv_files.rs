//! Integration tests for loading dotenv files into an environment.

use std::path::Path;

use pretty_assertions::assert_eq;
use serial_test::serial;

use geomancy::dotenv::{ParseOptions, load_env, parse};
use geomancy::env::Env;

const TEST_ENV: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/test.env");

#[test]
fn fixture_file_loads_five_variables() {
    let mut env = Env::empty();
    let count = load_env(Path::new(TEST_ENV), false, &mut env, &ParseOptions::default());

    assert_eq!(count, 5);
    assert_eq!(env.var("VALUE1").unwrap(), "My Value");
    assert_eq!(env.var("VALUE2").unwrap(), "dev");
    assert_eq!(env.var("VALUE3").unwrap(), "my-dev");
    assert_eq!(env.var("VALUE4").unwrap(), "A Multiline\nenvironment variable");
    assert_eq!(env.var("VALUE5").unwrap(), "Extra endspaces removed");
}

#[test]
fn fixture_file_has_no_skipped_lines() {
    let text = std::fs::read_to_string(TEST_ENV).unwrap();
    let parsed = parse(&text, &Env::empty(), &ParseOptions::default());
    assert!(parsed.skipped.is_empty(), "skipped: {:?}", parsed.skipped);
    let names: Vec<_> = parsed.vars.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["VALUE1", "VALUE2", "VALUE3", "VALUE4", "VALUE5"]);
}

#[test]
fn live_value_wins_in_substitution() {
    let mut env = Env::from_vars([("VALUE2", "prod")]);
    let count = load_env(Path::new(TEST_ENV), false, &mut env, &ParseOptions::default());

    assert_eq!(count, 4);
    assert_eq!(env.var("VALUE2").unwrap(), "prod");
    assert_eq!(env.var("VALUE3").unwrap(), "my-prod");
}

#[test]
fn loading_twice_without_overwrite_sets_nothing_new() {
    let mut env = Env::empty();
    let options = ParseOptions::default();
    assert_eq!(load_env(Path::new(TEST_ENV), false, &mut env, &options), 5);
    assert_eq!(load_env(Path::new(TEST_ENV), false, &mut env, &options), 0);
    assert_eq!(load_env(Path::new(TEST_ENV), true, &mut env, &options), 5);
}

#[test]
#[serial]
fn loads_into_process_environment() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".env");
    std::fs::write(
        &path,
        "GEOMANCY_IT_BASE=/opt/app\nGEOMANCY_IT_BIN=\"${GEOMANCY_IT_BASE}/bin\"\n",
    )
    .unwrap();

    let mut env = Env::real();
    let count = load_env(&path, true, &mut env, &ParseOptions::default());

    assert_eq!(count, 2);
    assert_eq!(std::env::var("GEOMANCY_IT_BIN").unwrap(), "/opt/app/bin");
}

#[test]
#[serial]
fn process_environment_is_kept_without_overwrite() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".env");
    std::fs::write(&path, "GEOMANCY_IT_KEPT=from-file\n").unwrap();

    let mut env = Env::real();
    env.set_var("GEOMANCY_IT_KEPT", "from-process").unwrap();
    let count = load_env(&path, false, &mut env, &ParseOptions::default());

    assert_eq!(count, 0);
    assert_eq!(std::env::var("GEOMANCY_IT_KEPT").unwrap(), "from-process");
}

#[test]
#[serial]
fn value_with_nul_is_skipped_and_loading_continues() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".env");
    std::fs::write(
        &path,
        "GEOMANCY_IT_NUL=\"a\\0b\"\nGEOMANCY_IT_HEX=\"a\\x00b\"\nGEOMANCY_IT_AFTER_NUL=ok\n",
    )
    .unwrap();

    let mut env = Env::real();
    let count = load_env(&path, true, &mut env, &ParseOptions::default());

    assert_eq!(count, 1);
    assert!(std::env::var_os("GEOMANCY_IT_NUL").is_none());
    assert!(std::env::var_os("GEOMANCY_IT_HEX").is_none());
    assert_eq!(std::env::var("GEOMANCY_IT_AFTER_NUL").unwrap(), "ok");
}

#[cfg(unix)]
#[test]
#[serial]
fn non_unicode_process_value_is_set_and_wins() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    // SAFETY: serialized with the other tests that touch the process environment.
    unsafe { std::env::set_var("GEOMANCY_IT_RAW", OsStr::from_bytes(b"raw\xff")) };

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".env");
    std::fs::write(
        &path,
        "GEOMANCY_IT_RAW=from-file\nGEOMANCY_IT_COPY=${GEOMANCY_IT_RAW}\n",
    )
    .unwrap();

    let mut env = Env::real();
    assert!(env.is_set("GEOMANCY_IT_RAW"));
    assert_eq!(env.var("GEOMANCY_IT_RAW").unwrap(), "raw\u{fffd}");

    let count = load_env(&path, false, &mut env, &ParseOptions::default());
    assert_eq!(count, 1);
    assert_eq!(
        std::env::var_os("GEOMANCY_IT_RAW").unwrap(),
        OsStr::from_bytes(b"raw\xff")
    );
    assert_eq!(std::env::var("GEOMANCY_IT_COPY").unwrap(), "raw\u{fffd}");
}
