mod as_value;
mod catalog;
mod connection;
mod criteria;
mod decode;
mod error;
mod expression;
mod hooks;
mod logger;
mod mapper;
mod naming;
mod querier;
mod query;
mod record;
mod statement;
mod transaction;
mod util;
mod value;
pub mod writer;

pub use ::anyhow::Context;
pub use as_value::*;
pub use catalog::*;
pub use connection::*;
pub use criteria::*;
pub use decode::*;
pub use error::*;
pub use expression::*;
pub use hooks::*;
pub use logger::*;
pub use mapper::*;
pub use naming::*;
pub use querier::*;
pub use query::*;
pub use record::*;
pub use statement::*;
pub use transaction::*;
pub use util::*;
pub use value::*;
pub use writer::{
    Context as WriterContext, DEFAULT_PARAMETER_PREFIX, Fragment, GenericSqlWriter,
    MySqlSqlWriter, PostgresSqlWriter, SqlWriter,
};
pub mod stream {
    pub use ::futures::stream::*;
}
pub use ::futures::future;

pub type Result<T> = anyhow::Result<T>;
pub type Error = anyhow::Error;
