#![allow(dead_code)]

use rowmap::{
    Connection, Error, Querier, Result, Row, RowSet, RowsAffected, Transaction, Value,
};
use std::collections::VecDeque;

/// Statement expected by [`MockQuerier`], with the outcome it produces.
#[derive(Debug)]
pub enum Expectation {
    Execute {
        sql: String,
        args: Vec<Value>,
        outcome: std::result::Result<u64, String>,
    },
    Query {
        sql: String,
        args: Vec<Value>,
        outcome: std::result::Result<RowSet, String>,
    },
    Begin,
    Commit {
        fail: bool,
    },
    Rollback,
}

/// In-memory querier replaying a script of expectations, in order.
///
/// Any statement not matching the next expectation panics, failing the test.
#[derive(Debug, Default)]
pub struct MockQuerier {
    pub expectations: VecDeque<Expectation>,
    /// Every statement received, including transaction control.
    pub received: Vec<String>,
}

impl MockQuerier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expect_execute(&mut self, sql: &str, args: Vec<Value>) -> &mut Self {
        self.expectations.push_back(Expectation::Execute {
            sql: sql.into(),
            args,
            outcome: Ok(1),
        });
        self
    }

    pub fn expect_execute_error(&mut self, sql: &str, args: Vec<Value>, error: &str) -> &mut Self {
        self.expectations.push_back(Expectation::Execute {
            sql: sql.into(),
            args,
            outcome: Err(error.into()),
        });
        self
    }

    pub fn expect_query(
        &mut self,
        sql: &str,
        args: Vec<Value>,
        columns: &[&str],
        rows: Vec<Vec<Value>>,
    ) -> &mut Self {
        self.expectations.push_back(Expectation::Query {
            sql: sql.into(),
            args,
            outcome: Ok(RowSet::new(
                columns.iter().copied(),
                rows.into_iter().map(Row::from),
            )),
        });
        self
    }

    pub fn expect_query_error(&mut self, sql: &str, args: Vec<Value>, error: &str) -> &mut Self {
        self.expectations.push_back(Expectation::Query {
            sql: sql.into(),
            args,
            outcome: Err(error.into()),
        });
        self
    }

    pub fn expect_begin(&mut self) -> &mut Self {
        self.expectations.push_back(Expectation::Begin);
        self
    }

    pub fn expect_commit(&mut self, fail: bool) -> &mut Self {
        self.expectations.push_back(Expectation::Commit { fail });
        self
    }

    pub fn expect_rollback(&mut self) -> &mut Self {
        self.expectations.push_back(Expectation::Rollback);
        self
    }

    /// Panics if some expectation was never met.
    pub fn assert_done(&self) {
        assert!(
            self.expectations.is_empty(),
            "Statements never received: {:#?}",
            self.expectations
        );
    }

    fn next(&mut self, received: &str) -> Expectation {
        self.received.push(received.into());
        match self.expectations.pop_front() {
            Some(v) => v,
            None => panic!("Unexpected statement: {received}"),
        }
    }

    fn take_execute(&mut self, sql: &str, args: &[Value]) -> Result<RowsAffected> {
        match self.next(sql) {
            Expectation::Execute {
                sql: expected_sql,
                args: expected_args,
                outcome,
            } => {
                assert_eq!(sql, expected_sql);
                assert_eq!(args, expected_args.as_slice());
                outcome.map(RowsAffected::new).map_err(Error::msg)
            }
            other => panic!("Expected {other:?}, received execute `{sql}`"),
        }
    }

    fn take_query(&mut self, sql: &str, args: &[Value]) -> Result<RowSet> {
        match self.next(sql) {
            Expectation::Query {
                sql: expected_sql,
                args: expected_args,
                outcome,
            } => {
                assert_eq!(sql, expected_sql);
                assert_eq!(args, expected_args.as_slice());
                outcome.map_err(Error::msg)
            }
            other => panic!("Expected {other:?}, received query `{sql}`"),
        }
    }
}

impl Querier for MockQuerier {
    type Cursor<'c>
        = RowSet
    where
        Self: 'c;

    async fn execute(&mut self, sql: &str, args: &[Value]) -> Result<RowsAffected> {
        self.take_execute(sql, args)
    }

    async fn query(&mut self, sql: &str, args: &[Value]) -> Result<RowSet> {
        self.take_query(sql, args)
    }
}

impl Connection for MockQuerier {
    type Transaction<'c>
        = MockTransaction<'c>
    where
        Self: 'c;

    async fn begin(&mut self) -> Result<MockTransaction<'_>> {
        match self.next("begin") {
            Expectation::Begin => Ok(MockTransaction { inner: self }),
            other => panic!("Expected {other:?}, received begin"),
        }
    }
}

/// Transaction over a [`MockQuerier`], sharing its script.
#[derive(Debug)]
pub struct MockTransaction<'c> {
    inner: &'c mut MockQuerier,
}

impl<'c> Querier for MockTransaction<'c> {
    type Cursor<'t>
        = RowSet
    where
        Self: 't;

    async fn execute(&mut self, sql: &str, args: &[Value]) -> Result<RowsAffected> {
        self.inner.take_execute(sql, args)
    }

    async fn query(&mut self, sql: &str, args: &[Value]) -> Result<RowSet> {
        self.inner.take_query(sql, args)
    }
}

impl<'c> Transaction for MockTransaction<'c> {
    async fn commit(&mut self) -> Result<()> {
        match self.inner.next("commit") {
            Expectation::Commit { fail: false } => Ok(()),
            Expectation::Commit { fail: true } => Err(Error::msg("commit refused")),
            other => panic!("Expected {other:?}, received commit"),
        }
    }

    async fn rollback(&mut self) -> Result<()> {
        match self.inner.next("rollback") {
            Expectation::Rollback => Ok(()),
            other => panic!("Expected {other:?}, received rollback"),
        }
    }
}
