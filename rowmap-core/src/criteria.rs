use crate::{
    Expression, ExpressionExt, Mapper, Statement,
    writer::{Context, Fragment},
};

/// Composable filter, ordering and window of a query.
///
/// ```rust
/// use rowmap_core::{Criteria, ExpressionExt, Mapper, col, param};
/// let criteria = Criteria::new()
///     .filter(col("age").ge(param(18)))
///     .order_by(col("name").asc())
///     .limit(10);
/// let rendered = criteria.render(&Mapper::default());
/// assert_eq!(rendered.sql, "where age >= $1 order by name asc limit 10");
/// ```
#[derive(Debug, Default)]
pub struct Criteria {
    filter: Option<Box<dyn Expression>>,
    order: Vec<Box<dyn Expression>>,
    limit: Option<u64>,
    offset: Option<u64>,
}

impl Criteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the filter, combined with `and` when one is already present.
    pub fn filter(mut self, condition: impl Expression + 'static) -> Self {
        self.filter = Some(match self.filter.take() {
            Some(current) => current.and(condition).boxed(),
            None => Box::new(condition),
        });
        self
    }

    /// Combine the current filter with `condition` using `or`.
    pub fn or_filter(mut self, condition: impl Expression + 'static) -> Self {
        self.filter = Some(match self.filter.take() {
            Some(current) => current.or(condition).boxed(),
            None => Box::new(condition),
        });
        self
    }

    /// Append an ordering term, use [`ExpressionExt::asc`] or [`ExpressionExt::desc`].
    pub fn order_by(mut self, term: impl Expression + 'static) -> Self {
        self.order.push(Box::new(term));
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn has_filter(&self) -> bool {
        self.filter.is_some()
    }

    fn render_parts(&self, mapper: &Mapper, order: bool, window: bool) -> Statement {
        let writer = mapper.writer();
        let mut context = Context::new(Fragment::None, mapper.parameter_prefix());
        let mut parts: Vec<String> = Vec::with_capacity(3);
        if let Some(filter) = &self.filter {
            let mut out = String::new();
            writer.write_where(&mut context, &mut out, filter.as_ref());
            parts.push(out);
        }
        if order {
            let mut out = String::new();
            writer.write_order_by(&mut context, &mut out, &self.order);
            parts.push(out);
        }
        if window {
            let mut out = String::new();
            writer.write_limit(&mut context, &mut out, self.limit, self.offset);
            parts.push(out);
        }
        parts.retain(|v| !v.is_empty());
        Statement::new(parts.join(" "), context.args)
    }

    /// `where <filter> order by <terms> limit <n> offset <m>`, only the present clauses.
    pub fn render(&self, mapper: &Mapper) -> Statement {
        self.render_parts(mapper, true, true)
    }

    /// Only the `where` clause.
    pub fn render_filter(&self, mapper: &Mapper) -> Statement {
        self.render_parts(mapper, false, false)
    }

    /// The `where` and `order by` clauses, without the window.
    pub fn render_filter_and_order(&self, mapper: &Mapper) -> Statement {
        self.render_parts(mapper, true, false)
    }
}
