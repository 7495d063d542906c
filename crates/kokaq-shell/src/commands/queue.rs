use kokaq_core::{QueueRef, QueueService};
use tracing::debug;

use crate::command::ScopeAction;
use crate::commands::Reply;
use crate::error::{ShellError, ShellResult};
use crate::output::render_names;
use crate::session::SessionChange;

pub(crate) async fn handle_queue<S>(
    service: &S,
    namespace: &str,
    action: ScopeAction,
) -> ShellResult<Reply>
where
    S: QueueService + ?Sized,
{
    debug!(namespace, action = action.keyword(), "queue command");
    match action {
        ScopeAction::Create(name) => {
            let created = service
                .create_queue(&QueueRef::new(namespace, name.as_str()))
                .await
                .map_err(ShellError::remote("queue create"))?;
            Ok(Reply::line(format!("Created queue: {}", created.name))
                .with_line(format!("Selected queue: {name}"))
                .with_change(SessionChange::SelectQueue(name)))
        }
        ScopeAction::Delete(name) => {
            let queue = QueueRef::new(namespace, name.as_str());
            service
                .resolve_queue(&queue)
                .await
                .map_err(ShellError::remote("queue delete"))?;
            service
                .delete_queue(&queue)
                .await
                .map_err(ShellError::remote("queue delete"))?;
            Ok(Reply::line(format!("Deleted queue: {name}"))
                .with_change(SessionChange::ForgetQueue(name)))
        }
        ScopeAction::Use(name) => {
            service
                .resolve_queue(&QueueRef::new(namespace, name.as_str()))
                .await
                .map_err(ShellError::remote("queue use"))?;
            Ok(Reply::line(format!("Selected queue: {name}"))
                .with_change(SessionChange::SelectQueue(name)))
        }
        ScopeAction::List => {
            let names = service
                .list_queues(namespace)
                .await
                .map_err(ShellError::remote("queue list"))?;
            Ok(Reply::line(render_names("Queues", &names)))
        }
    }
}
