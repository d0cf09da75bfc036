use crate::types::Field;

/// Constants shared by the simulated producers and their tests
pub mod simulated {
    /// Task id handed out for every install request.
    /// No task tracking exists behind it.
    pub const INSTALL_TASK_ID: &str = "mock_task_123";

    /// Version assumed when an install request names none
    pub const DEFAULT_PACKAGE_VERSION: &str = "latest";

    /// Rows reported for any query that is not a read
    pub const ROWS_AFFECTED: u64 = 3;

    /// Exit code reported for commands the simulated shell does not know
    pub const COMMAND_NOT_FOUND_EXIT: i32 = 127;
}

/// Return the value when present and non-empty, otherwise the missing field.
///
/// Emptiness is the only check: whitespace-only values are accepted,
/// the same as any other non-empty string.
pub fn required(field: Field, value: Option<&str>) -> Result<&str, Field> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(field),
    }
}

/// True when the query starts with `select`, ignoring ASCII case.
///
/// This is a prefix test only; the text is never parsed as SQL.
pub fn is_select_query(query: &str) -> bool {
    query
        .get(..6)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("select"))
}

/// First whitespace-separated token of a command line, or `""`.
pub fn first_token(command: &str) -> &str {
    command.split_whitespace().next().unwrap_or("")
}
