mod codec_tests;
mod sub_schematic_tests;

/// Route log output through the test harness. Safe to call repeatedly.
pub(crate) fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
