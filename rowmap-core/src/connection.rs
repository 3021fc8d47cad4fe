use crate::{Querier, Result, Transaction};
use std::future::Future;

/// A querier able to start transactions.
pub trait Connection: Querier {
    type Transaction<'c>: Transaction
    where
        Self: 'c;

    /// Begin a transaction, it borrows the connection until it ends.
    fn begin(&mut self) -> impl Future<Output = Result<Self::Transaction<'_>>> + Send;
}
