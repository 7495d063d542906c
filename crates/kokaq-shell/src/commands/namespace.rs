use kokaq_core::QueueService;
use tracing::debug;

use crate::command::ScopeAction;
use crate::commands::Reply;
use crate::error::{ShellError, ShellResult};
use crate::output::render_names;
use crate::session::SessionChange;

pub(crate) async fn handle_namespace<S>(service: &S, action: ScopeAction) -> ShellResult<Reply>
where
    S: QueueService + ?Sized,
{
    debug!(action = action.keyword(), "namespace command");
    match action {
        ScopeAction::Create(name) => handle_create(service, name).await,
        ScopeAction::Delete(name) => handle_delete(service, name).await,
        ScopeAction::Use(name) => handle_use(service, name).await,
        ScopeAction::List => handle_list(service).await,
    }
}

async fn handle_create<S>(service: &S, name: String) -> ShellResult<Reply>
where
    S: QueueService + ?Sized,
{
    let created = service
        .create_namespace(&name)
        .await
        .map_err(ShellError::remote("namespace create"))?;
    Ok(Reply::line(format!("Created namespace: {}", created.name))
        .with_line(format!("Selected namespace: {name}"))
        .with_change(SessionChange::SelectNamespace(name)))
}

async fn handle_delete<S>(service: &S, name: String) -> ShellResult<Reply>
where
    S: QueueService + ?Sized,
{
    service
        .resolve_namespace(&name)
        .await
        .map_err(ShellError::remote("namespace delete"))?;
    service
        .delete_namespace(&name)
        .await
        .map_err(ShellError::remote("namespace delete"))?;
    Ok(Reply::line(format!("Deleted namespace: {name}"))
        .with_change(SessionChange::ForgetNamespace(name)))
}

async fn handle_use<S>(service: &S, name: String) -> ShellResult<Reply>
where
    S: QueueService + ?Sized,
{
    service
        .resolve_namespace(&name)
        .await
        .map_err(ShellError::remote("namespace use"))?;
    Ok(Reply::line(format!("Selected namespace: {name}"))
        .with_change(SessionChange::SelectNamespace(name)))
}

async fn handle_list<S>(service: &S) -> ShellResult<Reply>
where
    S: QueueService + ?Sized,
{
    let names = service
        .list_namespaces()
        .await
        .map_err(ShellError::remote("namespace list"))?;
    Ok(Reply::line(render_names("Namespaces", &names)))
}
