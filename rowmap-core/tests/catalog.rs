#[cfg(test)]
mod tests {
    use rowmap_core::{FieldSpec, MappingError, TypeDescriptor, column_name, table_name};

    fn spec(name: &'static str, sql: &'static str) -> FieldSpec {
        FieldSpec {
            sql: Some(sql),
            ..FieldSpec::new(name)
        }
    }

    fn describe_error(specs: Vec<FieldSpec>) -> String {
        let error = TypeDescriptor::new("Broken", specs).unwrap_err();
        assert!(matches!(
            error.downcast_ref::<MappingError>(),
            Some(MappingError::Describe {
                type_name: "Broken",
                ..
            })
        ));
        error.to_string()
    }

    fn address() -> Vec<FieldSpec> {
        vec![FieldSpec::new("street"), spec("zipCode", "zip")]
    }

    #[test]
    fn naming() {
        assert_eq!(column_name("firstName"), "first_name");
        assert_eq!(column_name("HTTPStatus"), "http_status");
        assert_eq!(column_name("already_snake"), "already_snake");
        assert_eq!(table_name("User"), "users");
        assert_eq!(table_name("OrderLine"), "order_lines");
    }

    #[test]
    fn parameters() {
        let descriptor = TypeDescriptor::new(
            "Order",
            vec![
                spec("code", " order_code , id "),
                spec("createdAt", ",readonly"),
                FieldSpec {
                    readonly: true,
                    ..FieldSpec::new("total")
                },
                spec("note", "-"),
                spec("hidden", "-,id"),
            ],
        )
        .unwrap();
        assert_eq!(descriptor.table, "orders");
        let code = descriptor.field("code").unwrap();
        assert_eq!(code.column, "order_code");
        assert!(code.identity);
        let created = descriptor.field("createdAt").unwrap();
        assert_eq!(created.column, "created_at");
        assert!(created.readonly && !created.explicit_column);
        assert!(descriptor.field("total").unwrap().readonly);
        assert!(descriptor.field("note").unwrap().excluded);
        let hidden = descriptor.field("hidden").unwrap();
        assert!(hidden.excluded && !hidden.identity);
        assert_eq!(descriptor.identity, [0]);
        assert_eq!(
            descriptor
                .updatable_fields()
                .map(|f| f.name)
                .collect::<Vec<_>>(),
            ["code"]
        );
    }

    #[test]
    fn excluded_id_is_not_the_identity() {
        let descriptor =
            TypeDescriptor::new("Draft", vec![spec("id", "-"), FieldSpec::new("body")]).unwrap();
        assert!(descriptor.identity.is_empty());
        assert!(descriptor.require_identity().is_err());
    }

    #[test]
    fn table_override() {
        let by_param = TypeDescriptor::new(
            "Person",
            vec![spec("id", "id,table:people"), FieldSpec::new("name")],
        )
        .unwrap();
        assert_eq!(by_param.table, "people");

        let by_attribute = TypeDescriptor::new(
            "Person",
            vec![
                FieldSpec::new("id"),
                FieldSpec {
                    table: Some("humans"),
                    ..spec("name", ",table:people")
                },
            ],
        )
        .unwrap();
        assert_eq!(by_attribute.table, "humans");

        let first_wins = TypeDescriptor::new(
            "Person",
            vec![
                spec("id", ",table:first"),
                spec("name", ",table:second"),
            ],
        )
        .unwrap();
        assert_eq!(first_wins.table, "first");
    }

    #[test]
    fn embedded() {
        let descriptor = TypeDescriptor::new(
            "Store",
            vec![
                FieldSpec::new("id"),
                FieldSpec {
                    table: Some("stores_v2"),
                    embedded: Some(address),
                    ..FieldSpec::new("address")
                },
                FieldSpec {
                    embedded: Some(address),
                    ..spec("billing", "-")
                },
            ],
        )
        .unwrap();
        assert_eq!(descriptor.table, "stores_v2");
        let columns: Vec<_> = descriptor
            .fields
            .iter()
            .map(|f| (f.column.as_str(), &*f.path, f.excluded))
            .collect();
        assert_eq!(
            columns,
            [
                ("id", &[0][..], false),
                ("street", &[1, 0][..], false),
                ("zip", &[1, 1][..], false),
                ("street", &[2, 0][..], true),
                ("zip", &[2, 1][..], true),
            ]
        );
        assert_eq!(descriptor.field("zipCode").unwrap().default_column, "zip_code");
    }

    #[test]
    fn invalid_annotations() {
        let message = describe_error(vec![spec("id", "id,primary")]);
        assert!(message.contains("unknown parameter `primary`"), "{message}");

        let message = describe_error(vec![spec("id", "id,table:")]);
        assert!(message.contains("empty `table:`"), "{message}");

        let message = describe_error(vec![FieldSpec {
            table: Some(""),
            ..spec("id", "id")
        }]);
        assert!(message.contains("empty `#[table]`"), "{message}");

        let message = describe_error(vec![FieldSpec::new("name"), spec("label", "name")]);
        assert!(message.contains("both map to the column `name`"), "{message}");

        let message = describe_error(vec![FieldSpec {
            embedded: Some(address),
            ..spec("address", "addr")
        }]);
        assert!(message.contains("embedded field `address`"), "{message}");
    }

    #[test]
    fn excluded_fields_may_share_a_column() {
        assert!(TypeDescriptor::new("Note", vec![spec("a", "-"), spec("b", "-")]).is_ok());
    }
}
