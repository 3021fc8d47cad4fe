use crate::{Error, Value, truncate_long};
use std::time::Duration;

/// Observer of every statement issued by a [`crate::Mapper`].
///
/// `log_query` runs right before the statement reaches the querier, `log_query_after` once it
/// completed, successfully or not.
pub trait QueryLogger: Send + Sync {
    fn log_query(&self, query: &str, args: &[Value]);
    fn log_query_after(
        &self,
        _query: &str,
        _args: &[Value],
        _elapsed: Duration,
        _error: Option<&Error>,
    ) {
    }
}

impl<F> QueryLogger for F
where
    F: Fn(&str, &[Value]) + Send + Sync,
{
    fn log_query(&self, query: &str, args: &[Value]) {
        self(query, args)
    }
}

/// Forwards the statements to the `log` facade, at the given level.
#[derive(Debug, Clone, Copy)]
pub struct LogQueryLogger {
    pub level: log::Level,
}

impl Default for LogQueryLogger {
    fn default() -> Self {
        Self {
            level: log::Level::Info,
        }
    }
}

impl QueryLogger for LogQueryLogger {
    fn log_query(&self, query: &str, args: &[Value]) {
        log::log!(self.level, "{} {:?}", truncate_long!(query), args);
    }
    fn log_query_after(
        &self,
        query: &str,
        _args: &[Value],
        elapsed: Duration,
        error: Option<&Error>,
    ) {
        match error {
            Some(e) => log::log!(
                self.level,
                "{} failed after {:?}: {:#}",
                truncate_long!(query),
                elapsed,
                e
            ),
            None => log::log!(self.level, "{} took {:?}", truncate_long!(query), elapsed),
        }
    }
}
