use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ReadLogsParams {
    #[schemars(description = "Single day to read (YYYY-MM-DD). Defaults to today when no dates are given.")]
    pub date: Option<String>,

    #[schemars(description = "First day of a range (YYYY-MM-DD). Ignored when 'date' is set.")]
    pub start_date: Option<String>,

    #[schemars(description = "Last day of a range, inclusive (YYYY-MM-DD). Ignored when 'date' is set.")]
    pub end_date: Option<String>,
}
