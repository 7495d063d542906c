use kokaq_core::{FailureReason, QueueRef, QueueService};
use tracing::debug;

use crate::command::MessageCommand;
use crate::commands::Reply;
use crate::error::{ShellError, ShellResult};
use crate::output::{NO_MESSAGES, render_dequeued, render_peeked, render_receipt};

const DEQUEUE_BATCH: u32 = 1;

pub(crate) async fn handle_message<S>(
    service: &S,
    queue: &QueueRef,
    command: MessageCommand,
) -> ShellResult<Reply>
where
    S: QueueService + ?Sized,
{
    match command {
        MessageCommand::Enqueue { body, priority } => {
            let receipt = service
                .send(queue, body.as_bytes(), priority)
                .await
                .map_err(ShellError::remote("enqueue"))?;
            debug!(%queue, message_id = %receipt.message_id, priority, "message enqueued");
            Ok(Reply::line(render_receipt(&receipt, priority)))
        }
        MessageCommand::Dequeue => {
            let delivered = service
                .receive(queue, DEQUEUE_BATCH)
                .await
                .map_err(ShellError::remote("dequeue"))?;
            debug!(%queue, count = delivered.len(), "dequeue returned");
            Ok(deliveries(delivered.iter().map(render_dequeued).collect()))
        }
        MessageCommand::Ack {
            message_id,
            lock_id,
        } => {
            service
                .acknowledge(queue, &message_id, &lock_id)
                .await
                .map_err(ShellError::remote("ack"))?;
            debug!(%queue, %message_id, "message acknowledged");
            Ok(Reply::line("ack done"))
        }
        MessageCommand::Nack {
            message_id,
            lock_id,
        } => {
            service
                .reject(
                    queue,
                    &message_id,
                    &lock_id,
                    FailureReason::ProcessingError,
                    true,
                )
                .await
                .map_err(ShellError::remote("nack"))?;
            debug!(%queue, %message_id, "message returned for redelivery");
            Ok(Reply::line("nack done"))
        }
        MessageCommand::Peek {
            count,
            wait_hint_ms,
        } => {
            let visible = service
                .peek(queue, count, wait_hint_ms)
                .await
                .map_err(ShellError::remote("peek"))?;
            Ok(deliveries(visible.iter().map(render_peeked).collect()))
        }
    }
}

fn deliveries(lines: Vec<String>) -> Reply {
    if lines.is_empty() {
        Reply::line(NO_MESSAGES)
    } else {
        Reply::lines(lines)
    }
}
