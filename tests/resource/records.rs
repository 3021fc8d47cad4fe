#![allow(dead_code)]

use rowmap::{AsValue, Hook, Hooks, OverrideScan, Querier, Record, Result, Scanner, Value};

#[derive(Record, Default, Debug, Clone, PartialEq)]
pub struct Customer {
    pub id: i64,
    pub full_name: String,
    pub email: Option<String>,
}

#[derive(Record, Default, Debug, Clone, PartialEq)]
pub struct Membership {
    #[sql("user_id,id")]
    pub user: i64,
    #[sql("group_id,id")]
    pub group: i64,
    pub role: String,
}

#[derive(Record, Default, Debug, Clone, PartialEq)]
pub struct Invoice {
    #[sql("invoice_number,id")]
    pub number: String,
    #[table("billing_invoices")]
    pub customer_id: i64,
    #[sql("total_cents")]
    pub total: i64,
    #[sql(",readonly")]
    pub issued_on: String,
    #[readonly]
    pub issued_by: String,
    #[sql("-")]
    pub label: String,
}

#[derive(Record, Default, Debug, Clone, PartialEq)]
pub struct Address {
    pub street: String,
    #[sql("zip_code")]
    pub zip: String,
}

#[derive(Record, Default, Debug, Clone, PartialEq)]
pub struct Shop {
    pub id: i64,
    pub name: String,
    #[embed]
    pub address: Address,
}

/// No identity at all.
#[derive(Record, Default, Debug, Clone, PartialEq)]
pub struct LogLine {
    pub message: String,
}

/// Records every hook it receives, failing on `fail_on`.
#[derive(Record, Default, Debug, Clone, PartialEq)]
#[hooks]
pub struct Audited {
    #[sql("id,table:audited_records")]
    pub id: i64,
    pub name: String,
    #[sql("-")]
    pub calls: Vec<Hook>,
    #[sql("-")]
    pub fail_on: Option<Hook>,
    /// Write an audit row through the querier after creating.
    #[sql("-")]
    pub audit: bool,
}

impl Audited {
    fn called(&mut self, hook: Hook) -> Result<()> {
        self.calls.push(hook);
        if self.fail_on == Some(hook) {
            anyhow::bail!("{hook} refused `{}`", self.name);
        }
        Ok(())
    }
}

impl Hooks for Audited {
    async fn before_create<Q: Querier>(&mut self, _querier: &mut Q) -> Result<()> {
        self.called(Hook::BeforeCreate)
    }
    async fn after_create<Q: Querier>(&mut self, querier: &mut Q) -> Result<()> {
        if self.audit {
            querier
                .execute(
                    "insert into audits (record_id) values ($1)",
                    &[Value::from(self.id)],
                )
                .await?;
        }
        self.called(Hook::AfterCreate)
    }
    async fn before_save<Q: Querier>(&mut self, _querier: &mut Q) -> Result<()> {
        self.called(Hook::BeforeSave)
    }
    async fn after_save<Q: Querier>(&mut self, _querier: &mut Q) -> Result<()> {
        self.called(Hook::AfterSave)
    }
    async fn before_replace<Q: Querier>(&mut self, _querier: &mut Q) -> Result<()> {
        self.called(Hook::BeforeReplace)
    }
    async fn after_replace<Q: Querier>(&mut self, _querier: &mut Q) -> Result<()> {
        self.called(Hook::AfterReplace)
    }
    async fn before_delete<Q: Querier>(&mut self, _querier: &mut Q) -> Result<()> {
        self.called(Hook::BeforeDelete)
    }
    async fn after_delete<Q: Querier>(&mut self, _querier: &mut Q) -> Result<()> {
        self.called(Hook::AfterDelete)
    }
}

/// Stores its tags as a single comma separated column.
#[derive(Record, Default, Debug, Clone, PartialEq)]
#[override_scan]
pub struct Article {
    pub id: i64,
    pub title: String,
    #[sql("tags")]
    pub raw_tags: String,
    #[sql("-")]
    pub tags: Vec<String>,
}

impl OverrideScan for Article {
    fn override_scan<'a>(
        &'a mut self,
        names: &[&'static str],
        slots: &mut [Option<Box<dyn Scanner + 'a>>],
    ) -> Result<()> {
        if let Some(i) = names.iter().position(|v| *v == "raw_tags") {
            let tags = &mut self.tags;
            slots[i] = Some(Box::new(move |value: Value| -> Result<()> {
                let text = String::try_from_value(value)?;
                *tags = text
                    .split(',')
                    .filter(|v| !v.is_empty())
                    .map(ToString::to_string)
                    .collect();
                Ok(())
            }));
        }
        Ok(())
    }
}
