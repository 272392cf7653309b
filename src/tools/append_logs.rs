use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::journal::LogEntry;

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct AppendLogsParams {
    #[schemars(description = "Captured text fragments to append, in any order")]
    pub logs: Vec<CapturedLog>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct CapturedLog {
    #[schemars(description = "The captured, already-redacted text")]
    pub text: String,

    #[serde(alias = "appPackage")]
    #[schemars(description = "Package name of the app the text came from, e.g. 'com.android.chrome'")]
    pub app_package: String,

    #[schemars(description = "Capture time in milliseconds since the Unix epoch")]
    pub timestamp: i64,

    #[serde(default, alias = "deviceId")]
    #[schemars(description = "Optional identifier of the capturing device")]
    pub device_id: Option<String>,
}

impl From<CapturedLog> for LogEntry {
    fn from(log: CapturedLog) -> Self {
        LogEntry {
            text: log.text,
            source_app: log.app_package,
            timestamp: log.timestamp,
            device_id: log.device_id,
        }
    }
}
