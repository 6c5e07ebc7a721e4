//! Configuration for the xiangqi command-line tool.
//!
//! Every value has a compile-time default and can be overridden at runtime
//! via a dedicated environment variable.

use xiangqi::START_FEN;

/// Default tracing filter when neither `RUST_LOG` nor `XIANGQI_LOG` is set.
const DEFAULT_LOG_FILTER: &str = "warn";

/// Default perft depth.
const DEFAULT_PERFT_DEPTH: u32 = 2;

/// Get the tracing filter directive.
///
/// Priority:
/// 1. `XIANGQI_LOG` env variable if set
/// 2. `warn` as fallback
///
/// `RUST_LOG` is consulted before this by the subscriber itself.
pub fn get_log_filter() -> String {
    if let Ok(filter) = std::env::var("XIANGQI_LOG") {
        return filter;
    }

    DEFAULT_LOG_FILTER.to_string()
}

/// Get the FEN used when no `--fen` argument is given.
///
/// Priority:
/// 1. `XIANGQI_START_FEN` env variable if set
/// 2. the standard opening position
pub fn get_start_fen() -> String {
    if let Ok(fen) = std::env::var("XIANGQI_START_FEN") {
        return fen;
    }

    START_FEN.to_string()
}

/// Get the default perft depth.
///
/// Priority:
/// 1. `XIANGQI_PERFT_DEPTH` env variable if set (falls back to default if the
///    value cannot be parsed as a `u32`)
/// 2. `2` as fallback
pub fn get_perft_depth() -> u32 {
    if let Ok(depth) = std::env::var("XIANGQI_PERFT_DEPTH") {
        return depth.parse().unwrap_or(DEFAULT_PERFT_DEPTH);
    }

    DEFAULT_PERFT_DEPTH
}
