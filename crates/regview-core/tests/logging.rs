mod common;

use common::{capture_logs, FakeFetch};
use regview_core::{LoaderConfig, RegisterLoader};

#[tokio::test]
async fn http_failure_logs_an_error() {
    let (logs, _guard) = capture_logs();
    let fetch = FakeFetch::responding(404, "\"not found\"");
    RegisterLoader::new(&fetch, LoaderConfig::default()).load().await;

    let out = logs.contents();
    assert!(out.contains("ERROR"), "no error entry in: {out}");
    assert!(out.contains("failed to fetch data"), "got: {out}");
    assert!(out.contains("status=404"), "got: {out}");
}

#[tokio::test]
async fn transport_failure_logs_an_error() {
    let (logs, _guard) = capture_logs();
    let fetch = FakeFetch::refusing("connection refused");
    RegisterLoader::new(&fetch, LoaderConfig::default()).load().await;

    let out = logs.contents();
    assert!(out.contains("ERROR"), "no error entry in: {out}");
    assert!(out.contains("connection refused"), "got: {out}");
}

#[tokio::test]
async fn verbose_success_logs_payload() {
    let (logs, _guard) = capture_logs();
    let fetch = FakeFetch::responding(200, r#"[{"tag":"FlowRate"}]"#);
    let cfg = LoaderConfig::default().with_verbose(true);
    RegisterLoader::new(&fetch, cfg).load().await;

    let out = logs.contents();
    assert!(out.contains("loaded registers"), "got: {out}");
    assert!(out.contains("FlowRate"), "payload missing from: {out}");
    assert!(!out.contains("ERROR"));
}

#[tokio::test]
async fn quiet_success_does_not_log_payload() {
    let (logs, _guard) = capture_logs();
    let fetch = FakeFetch::responding(200, r#"[{"tag":"FlowRate"}]"#);
    RegisterLoader::new(&fetch, LoaderConfig::default()).load().await;

    let out = logs.contents();
    assert!(!out.contains("FlowRate"), "payload leaked into: {out}");
    assert!(!out.contains("ERROR"));
}
