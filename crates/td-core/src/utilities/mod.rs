/// Date formatting helpers.
pub mod data_formatters;

/// Date parsing helpers.
pub mod data_parsers;
