use crate::{MappingError, Querier, Record, Result};
use std::{
    fmt::{self, Display, Formatter},
    future::Future,
};

/// Lifecycle points around the mutating operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hook {
    BeforeCreate,
    AfterCreate,
    BeforeSave,
    AfterSave,
    BeforeReplace,
    AfterReplace,
    BeforeDelete,
    AfterDelete,
}

impl Display for Hook {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Hook::BeforeCreate => "BeforeCreate",
            Hook::AfterCreate => "AfterCreate",
            Hook::BeforeSave => "BeforeSave",
            Hook::AfterSave => "AfterSave",
            Hook::BeforeReplace => "BeforeReplace",
            Hook::AfterReplace => "AfterReplace",
            Hook::BeforeDelete => "BeforeDelete",
            Hook::AfterDelete => "AfterDelete",
        })
    }
}

/// Callbacks invoked around create, save, replace and delete.
///
/// Every method defaults to doing nothing. `#[derive(Record)]` provides an empty implementation
/// unless the type is marked `#[hooks]`, in which case the type implements this trait itself and
/// overrides the hooks it needs. The querier is the one running the operation, statements issued
/// through it share the caller's transaction.
///
/// A failing `before_*` hook prevents any statement from being executed, a failing `after_*`
/// hook is reported after the statements already took effect.
pub trait Hooks: Send {
    fn before_create<Q: Querier>(
        &mut self,
        _querier: &mut Q,
    ) -> impl Future<Output = Result<()>> + Send {
        async { Ok(()) }
    }
    fn after_create<Q: Querier>(
        &mut self,
        _querier: &mut Q,
    ) -> impl Future<Output = Result<()>> + Send {
        async { Ok(()) }
    }
    fn before_save<Q: Querier>(
        &mut self,
        _querier: &mut Q,
    ) -> impl Future<Output = Result<()>> + Send {
        async { Ok(()) }
    }
    fn after_save<Q: Querier>(
        &mut self,
        _querier: &mut Q,
    ) -> impl Future<Output = Result<()>> + Send {
        async { Ok(()) }
    }
    fn before_replace<Q: Querier>(
        &mut self,
        _querier: &mut Q,
    ) -> impl Future<Output = Result<()>> + Send {
        async { Ok(()) }
    }
    fn after_replace<Q: Querier>(
        &mut self,
        _querier: &mut Q,
    ) -> impl Future<Output = Result<()>> + Send {
        async { Ok(()) }
    }
    fn before_delete<Q: Querier>(
        &mut self,
        _querier: &mut Q,
    ) -> impl Future<Output = Result<()>> + Send {
        async { Ok(()) }
    }
    fn after_delete<Q: Querier>(
        &mut self,
        _querier: &mut Q,
    ) -> impl Future<Output = Result<()>> + Send {
        async { Ok(()) }
    }
}

/// Invoke `hook` on `record`, a failure becomes [`MappingError::Hook`].
pub async fn dispatch_hook<R: Record, Q: Querier>(
    hook: Hook,
    record: &mut R,
    querier: &mut Q,
) -> Result<()> {
    let result = match hook {
        Hook::BeforeCreate => record.before_create(querier).await,
        Hook::AfterCreate => record.after_create(querier).await,
        Hook::BeforeSave => record.before_save(querier).await,
        Hook::AfterSave => record.after_save(querier).await,
        Hook::BeforeReplace => record.before_replace(querier).await,
        Hook::AfterReplace => record.after_replace(querier).await,
        Hook::BeforeDelete => record.before_delete(querier).await,
        Hook::AfterDelete => record.after_delete(querier).await,
    };
    result.map_err(|source| {
        log::debug!("Hook {hook} of `{}` failed: {source:#}", R::NAME);
        MappingError::Hook { hook, source }.into()
    })
}
