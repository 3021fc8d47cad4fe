#[cfg(test)]
mod tests {
    use rowmap_core::{
        GenericSqlWriter, MySqlSqlWriter, PostgresSqlWriter, SqlWriter, Statement, Value,
        WriterContext,
    };

    fn context() -> WriterContext {
        WriterContext::default()
    }

    #[test]
    fn insert() {
        let writer = GenericSqlWriter::new();
        let mut context = context();
        let mut out = String::new();
        writer.write_insert(
            &mut context,
            &mut out,
            "points",
            vec![("x", Value::from(1)), ("y", Value::from(2))],
            None,
        );
        assert_eq!(out, "insert into points (x, y) values ($1, $2)");
        assert_eq!(context.args, [Value::from(1), Value::from(2)]);

        let mut out = String::new();
        writer.write_insert(&mut WriterContext::default(), &mut out, "points", vec![], None);
        assert_eq!(out, "insert into points default values");
    }

    #[test]
    fn update_numbers_identity_first() {
        let writer = GenericSqlWriter::new();
        let mut context = WriterContext::new(Default::default(), "?");
        let mut out = String::new();
        writer.write_update(
            &mut context,
            &mut out,
            "points",
            vec![("x", Value::from(5)), ("y", Value::from(6))],
            vec![("id", Value::from(9))],
        );
        assert_eq!(out, "update points set x = ?2, y = ?3 where id = ?1");
        assert_eq!(
            context.args,
            [Value::from(9), Value::from(5), Value::from(6)]
        );
    }

    #[test]
    fn update_anonymous_placeholders_follow_text() {
        let mut context = context();
        let mut out = String::new();
        MySqlSqlWriter.write_update(
            &mut context,
            &mut out,
            "points",
            vec![("x", Value::from(5)), ("y", Value::from(6))],
            vec![("id", Value::from(9)), ("layer", Value::from("top"))],
        );
        assert_eq!(
            out,
            "update points set x = ?, y = ? where id = ? and layer = ?"
        );
        assert_eq!(
            context.args,
            [
                Value::from(5),
                Value::from(6),
                Value::from(9),
                Value::from("top"),
            ]
        );
    }

    #[test]
    fn upserts() {
        let row = || vec![("a", Value::from(1)), ("b", Value::from(2))];
        let mut out = String::new();
        let identity = ["a", "b"];
        PostgresSqlWriter.write_insert(
            &mut context(),
            &mut out,
            "pairs",
            row(),
            Some(identity.as_slice()),
        );
        assert_eq!(
            out,
            "insert into pairs (a, b) values ($1, $2) on conflict (a, b) do nothing"
        );
        let mut out = String::new();
        GenericSqlWriter.write_insert(
            &mut context(),
            &mut out,
            "pairs",
            row(),
            Some(identity.as_slice()),
        );
        assert_eq!(out, "insert or replace into pairs (a, b) values ($1, $2)");
    }

    #[test]
    fn delete() {
        let mut out = String::new();
        MySqlSqlWriter.write_delete(
            &mut context(),
            &mut out,
            "pairs",
            vec![("a", Value::from(1)), ("b", Value::from(2))],
        );
        assert_eq!(out, "delete from pairs where a = ? and b = ?");
    }

    #[test]
    fn string_literals() {
        let mut out = String::new();
        GenericSqlWriter.write_value_string(&mut context(), &mut out, "it's 'quoted'");
        assert_eq!(out, "'it''s ''quoted'''");
    }

    #[test]
    fn long_statement_display() {
        let sql = format!("select * from t where name in ({})", "'é', ".repeat(200));
        let statement = Statement::new(sql.clone(), vec![]);
        let shown = statement.to_string();
        assert!(shown.ends_with("..."));
        assert!(shown.len() <= 500);
        assert!(sql.starts_with(shown.trim_end_matches("...")));
        assert_eq!(
            Statement::new("select 1", vec![]).to_string(),
            "select 1"
        );
    }
}
