#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use std::time::Duration;

use pretty_assertions::assert_eq;
use tarn_eval::ResourceLimits;

use super::{parse_options, read_file, Options};

fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| (*s).to_string()).collect()
}

#[test]
fn no_flags_gives_the_defaults() {
    assert_eq!(parse_options(&[]).unwrap(), Options::default());
}

#[test]
fn flags_set_limits_and_modes() {
    let options = parse_options(&args(&[
        "--max-time=0.5",
        "--max-steps=42",
        "--max-depth=7",
        "--debug",
        "--arrays",
        "--trace",
    ]))
    .unwrap();
    assert_eq!(options.limits.max_time, Duration::from_millis(500));
    assert_eq!(options.limits.max_steps, 42);
    assert_eq!(options.limits.max_call_depth, 7);
    assert_eq!(
        options.limits.max_exponent,
        ResourceLimits::DEFAULT_MAX_EXPONENT
    );
    assert!(options.debug && options.arrays && options.trace);
}

#[test]
fn bad_flags_are_reported() {
    assert_eq!(
        parse_options(&args(&["--max-steps=lots"])).unwrap_err(),
        "invalid --max-steps value 'lots'"
    );
    assert!(parse_options(&args(&["--max-time=0"])).is_err());
    assert_eq!(
        parse_options(&args(&["--fast"])).unwrap_err(),
        "unknown option '--fast'"
    );
}

#[test]
fn options_configure_the_interpreter() {
    let options = parse_options(&args(&["--max-steps=50", "--arrays"])).unwrap();
    let interp = options.interpreter();
    assert_eq!(interp.limits().max_steps, 50);
    assert!(interp.use_arrays());
}

#[test]
fn missing_files_are_named() {
    assert_eq!(
        read_file("/no/such/script.tn").unwrap_err(),
        "cannot find file '/no/such/script.tn'"
    );
}
