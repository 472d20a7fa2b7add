use std::sync::Arc;

use cloud_log_facade::logger;
use cloud_log_facade::request::RequestSnapshot;
use cloud_log_facade::trace::{TraceContext, CLOUD_TRACE_CONTEXT_HEADER};
use cloud_log_facade::{EnvironmentMode, Fields, LogConfig};

fn main() {
    let mode = match std::env::args().nth(1).as_deref() {
        Some("cloud") => EnvironmentMode::Cloud,
        _ => EnvironmentMode::Local,
    };
    let config = Arc::new(
        LogConfig::builder()
            .mode(mode)
            .app_id("teammates-demo")
            .build()
            .expect("config"),
    );
    let log = logger!(config);

    let request = RequestSnapshot::new("GET", "/webapi/join?key=regkey-123&entitytype=student")
        .with_header("User-Agent", "Mozilla/5.0")
        .with_header(CLOUD_TRACE_CONTEXT_HEADER, "105445aa7843bc8bf206b1200/1;o=1")
        .with_header("Cookie", "session=secret");

    let trace = TraceContext::from_cloud_trace_header(Some("105445aa7843bc8bf206b1200/1;o=1"));
    let request_log = log.with_trace(Arc::new(trace));

    let mut user_info = Fields::new();
    user_info.insert("googleId".into(), "alice".into());

    request_log.request(&request, 200, "joined course", &mut user_info, Fields::new());

    // The registration key was propagated into the caller's map.
    println!("userInfo after logging: {}", serde_json::Value::Object(user_info));
}
