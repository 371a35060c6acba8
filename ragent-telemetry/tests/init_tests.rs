//! Global initialization is process-wide, so all checks share one test.

#[test]
fn second_initialization_reports_instead_of_panicking() {
    ragent_telemetry::init_telemetry().unwrap();

    assert!(ragent_telemetry::init_telemetry().is_err());
    assert!(ragent_telemetry::init_json_telemetry().is_err());

    ragent_telemetry::info!(component = "telemetry-test", "subscriber installed");
}
