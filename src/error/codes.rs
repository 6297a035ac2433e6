/// Error code registry for procminer
///
/// Error codes are organized by category:
/// - 1000-1999: Configuration errors
/// - 2000-2999: Input errors
/// - 3000-3999: Validation errors
/// - 4000-4999: Statistics errors
/// - 5000-5999: Execution errors
/// - 9000-9999: Other errors
#[allow(dead_code)]
pub struct ErrorCode;

impl ErrorCode {
    // Configuration errors (1000-1999)
    pub const CONFIG_GENERIC: u16 = 1000;
    pub const CONFIG_NOT_FOUND: u16 = 1001;
    pub const CONFIG_INVALID_TOML: u16 = 1002;
    pub const CONFIG_UNKNOWN_TIME_UNIT: u16 = 1004;
    pub const CONFIG_INVALID_OFFSET: u16 = 1005;
    pub const CONFIG_INVALID_PARTITIONS: u16 = 1006;

    // Input errors (2000-2999)
    pub const INPUT_IO_ERROR: u16 = 2001;
    pub const INPUT_NOT_FOUND: u16 = 2002;
    pub const INPUT_MALFORMED_RECORD: u16 = 2003;

    // Validation errors (3000-3999)
    pub const VALIDATION_GENERIC: u16 = 3000;
    pub const VALIDATION_TIMESTAMP_ORDERING: u16 = 3001;
    pub const VALIDATION_EMPTY_IDENTIFIER: u16 = 3002;
    pub const VALIDATION_NEGATIVE_WEIGHT: u16 = 3003;

    // Statistics errors (4000-4999)
    pub const STATS_NON_FINITE_OBSERVATION: u16 = 4001;

    // Execution errors (5000-5999)
    pub const EXEC_WORKER_PANICKED: u16 = 5001;
    pub const EXEC_JOIN_FAILED: u16 = 5002;

    // Other errors (9000-9999)
    pub const OTHER_GENERIC: u16 = 9000;
}

/// Get a human-readable description for an error code
pub fn describe_error_code(code: u16) -> &'static str {
    match code {
        // Configuration errors
        1000 => "Generic configuration error",
        1001 => "Configuration file not found",
        1002 => "Invalid TOML syntax in configuration",
        1004 => "Unknown time unit",
        1005 => "Invalid day-bucket offset",
        1006 => "Invalid partition count",

        // Input errors
        2001 => "Input I/O error",
        2002 => "Input file not found",
        2003 => "Malformed event record",

        // Validation errors
        3000 => "Generic validation error",
        3001 => "Event ends before it starts",
        3002 => "Identifier must not be empty",
        3003 => "Relation weight must not be negative",

        // Statistics errors
        4001 => "Observation is not a finite number",

        // Execution errors
        5001 => "Partition worker panicked",
        5002 => "Failed to join analysis task",

        // Other errors
        9000 => "Generic error",

        _ => "Unknown error code",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_ranges() {
        assert!((1000..2000).contains(&ErrorCode::CONFIG_UNKNOWN_TIME_UNIT));
        assert!((2000..3000).contains(&ErrorCode::INPUT_MALFORMED_RECORD));
        assert!((3000..4000).contains(&ErrorCode::VALIDATION_NEGATIVE_WEIGHT));
        assert!((4000..5000).contains(&ErrorCode::STATS_NON_FINITE_OBSERVATION));
        assert!((5000..6000).contains(&ErrorCode::EXEC_WORKER_PANICKED));
        assert!((9000..10000).contains(&ErrorCode::OTHER_GENERIC));
    }

    #[test]
    fn test_error_code_descriptions() {
        assert_eq!(describe_error_code(3001), "Event ends before it starts");
        assert_eq!(describe_error_code(4001), "Observation is not a finite number");
        assert_eq!(describe_error_code(65535), "Unknown error code");
        assert_eq!(describe_error_code(1003), "Unknown error code");
    }
}
