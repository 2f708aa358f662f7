/// Value of a Card rendered for a successful sub-query that returned no rows.
pub const NO_DATA_FOUND: &str = "no data found";

/// Prefix of a Card rendered for a failed sub-query.
pub const ERROR_CARD_PREFIX: &str = "error: failed to get information";

/// Environment variable holding the tracing filter directive.
pub const LOG_ENV_VAR: &str = "DBINSPECT_LOG";

/// Number of digest bytes kept in a report ID (hex-encoded to twice as many chars).
pub const REPORT_ID_BYTES: usize = 16;

/// Separator used when a section joins the errors of its failed sub-queries.
pub const SECTION_ERROR_SEPARATOR: &str = "; ";

/// Date format of chart tooltips.
pub const CHART_TOOLTIP_FORMAT: &str = "yyyy-MM-dd HH:mm";
