use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct SummarizeDayParams {
    #[schemars(description = "Day to analyze (YYYY-MM-DD). Defaults to yesterday.")]
    pub date: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct SummarizeTodayParams {}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct SummarizeRangeParams {
    #[schemars(description = "First day of the range (YYYY-MM-DD). Defaults to 7 days before the end date.")]
    pub start_date: Option<String>,

    #[schemars(description = "Last day of the range, inclusive (YYYY-MM-DD). Defaults to today.")]
    pub end_date: Option<String>,
}
