mod resource {
    pub mod mock;
    pub mod records;
}

#[cfg(test)]
mod tests {
    use crate::resource::{mock::MockQuerier, records::Customer};
    use log::LevelFilter;
    use rowmap::{
        Error, LogQueryLogger, Mapper, MappingError, QueryLogger, Value, mapping_error,
    };
    use std::{
        env,
        sync::{Arc, Mutex},
        time::Duration,
    };

    fn init_logs() {
        let mut logger = env_logger::builder();
        logger
            .is_test(true)
            .format_file(true)
            .format_line_number(true);
        if env::var("RUST_LOG").is_err() {
            logger.filter_level(LevelFilter::Warn);
        }
        let _ = logger.try_init();
    }

    #[derive(Default, Clone)]
    struct Recorder {
        before: Arc<Mutex<Vec<(String, Vec<Value>)>>>,
        after: Arc<Mutex<Vec<(String, Option<String>)>>>,
    }

    impl QueryLogger for Recorder {
        fn log_query(&self, query: &str, args: &[Value]) {
            self.before
                .lock()
                .unwrap()
                .push((query.to_string(), args.to_vec()));
        }
        fn log_query_after(
            &self,
            query: &str,
            _args: &[Value],
            _elapsed: Duration,
            error: Option<&Error>,
        ) {
            self.after
                .lock()
                .unwrap()
                .push((query.to_string(), error.map(|e| format!("{e:#}"))));
        }
    }

    #[tokio::test]
    async fn closure_logger() {
        init_logs();
        let logged = Arc::new(Mutex::new(Vec::<String>::new()));
        let mapper = Mapper::default().with_query_logger({
            let logged = logged.clone();
            move |query: &str, args: &[Value]| {
                logged
                    .lock()
                    .unwrap()
                    .push(format!("{query} {args:?}"));
            }
        });
        let mut querier = MockQuerier::new();
        querier.expect_execute(
            "delete from customers where id = $1",
            vec![Value::from(5_i64)],
        );
        let mut customer = Customer {
            id: 5,
            ..Default::default()
        };
        mapper.delete(&mut querier, &mut customer).await.unwrap();
        assert_eq!(
            *logged.lock().unwrap(),
            ["delete from customers where id = $1 [Int64(Some(5))]"]
        );
    }

    #[tokio::test]
    async fn logger_sees_failures() {
        init_logs();
        let recorder = Recorder::default();
        let mapper = Mapper::default().with_query_logger(recorder.clone());
        let mut querier = MockQuerier::new();
        querier
            .expect_query(
                "select * from customers",
                vec![],
                &["id", "full_name", "email"],
                vec![],
            )
            .expect_query_error("select count(*) from customers", vec![], "disk I/O error");
        mapper.find_all::<Customer, _>(&mut querier).await.unwrap();
        mapper.count_all::<Customer, _>(&mut querier).await.unwrap_err();
        assert_eq!(
            *recorder.before.lock().unwrap(),
            [
                ("select * from customers".to_string(), vec![]),
                ("select count(*) from customers".to_string(), vec![]),
            ]
        );
        let after = recorder.after.lock().unwrap();
        assert_eq!(after.len(), 2);
        assert_eq!(after[0], ("select * from customers".to_string(), None));
        assert!(after[1].1.as_deref().is_some_and(|e| e.contains("disk I/O error")));
    }

    #[tokio::test]
    async fn logger_sees_decoding_failures() {
        init_logs();
        let recorder = Recorder::default();
        let mapper = Mapper::default().with_query_logger(recorder.clone());
        let mut querier = MockQuerier::new();
        querier.expect_query(
            "select * from customers",
            vec![],
            &["id", "full_name", "bogus"],
            vec![vec![
                Value::from(1_i64),
                Value::from("Ann"),
                Value::from("?"),
            ]],
        );
        let error = mapper
            .find_all::<Customer, _>(&mut querier)
            .await
            .unwrap_err();
        assert!(matches!(
            mapping_error(&error),
            Some(MappingError::UnresolvedColumns { .. })
        ));
        let after = recorder.after.lock().unwrap();
        assert_eq!(after.len(), 1);
        assert_eq!(after[0].0, "select * from customers");
        assert!(after[0].1.as_deref().is_some_and(|e| e.contains("bogus")));
        querier.assert_done();
    }

    #[tokio::test]
    async fn replace_and_clear_logger() {
        init_logs();
        let recorder = Recorder::default();
        let mut mapper = Mapper::default().with_query_logger(LogQueryLogger {
            level: log::Level::Debug,
        });
        mapper.set_query_logger(recorder.clone());
        let mut querier = MockQuerier::new();
        querier
            .expect_execute("delete from customers where id = $1", vec![Value::from(1_i64)])
            .expect_execute("delete from customers where id = $1", vec![Value::from(2_i64)]);
        let mut customer = Customer {
            id: 1,
            ..Default::default()
        };
        mapper.delete(&mut querier, &mut customer).await.unwrap();
        mapper.clear_query_logger();
        customer.id = 2;
        mapper.delete(&mut querier, &mut customer).await.unwrap();
        assert_eq!(recorder.before.lock().unwrap().len(), 1);
        querier.assert_done();
    }
}
