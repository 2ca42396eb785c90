//! Integration tests: the engine end to end over an in-memory pick source.

mod ev_report;
mod mock_source;
mod pattern_analysis;
