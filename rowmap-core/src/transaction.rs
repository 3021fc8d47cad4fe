use crate::{Querier, Result};
use std::future::Future;

pub trait Transaction: Querier {
    fn commit(&mut self) -> impl Future<Output = Result<()>> + Send;
    fn rollback(&mut self) -> impl Future<Output = Result<()>> + Send;
}
