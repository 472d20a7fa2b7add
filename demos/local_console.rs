use std::sync::Arc;

use cloud_log_facade::{log_info, log_warning, logger};
use cloud_log_facade::{EnvironmentMode, Fields, LogConfig, LogEventKind};

fn main() {
    let config = Arc::new(
        LogConfig::builder()
            .mode(EnvironmentMode::Local)
            .build()
            .expect("local config"),
    );
    let log = logger!(config);

    log.info("starting service");
    log_info!(log, "loaded {} courses", 12);
    log_warning!(log, "cache is cold");

    let mut details = Fields::new();
    details.insert("courseId".into(), "CS101".into());
    log.event(LogEventKind::custom("COURSE_CREATED"), "course created", details);

    log.severe("simulated failure on the error channel");
}
