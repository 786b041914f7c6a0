use dog_upload::UploadState;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Print every state transition until the run ends
pub fn spawn_reporter(mut state: watch::Receiver<UploadState>) -> JoinHandle<()> {
    tokio::spawn(async move {
        while state.changed().await.is_ok() {
            let current = *state.borrow_and_update();
            println!("[upload] {current} ({}%)", current.percent());
            if current.is_terminal() {
                break;
            }
        }
    })
}

/// Wait for the reporter; returns false when it did not end cleanly
pub async fn finish(reporter: JoinHandle<()>) -> bool {
    match reporter.await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "progress reporter stopped abnormally");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reporter_stops_at_terminal_state() {
        let (tx, rx) = watch::channel(UploadState::Idle);
        let reporter = spawn_reporter(rx);

        tx.send_replace(UploadState::SessionInitiated);
        tx.send_replace(UploadState::Finalized);

        // The sender is still alive, so only the terminal state can end the loop
        assert!(finish(reporter).await);
        drop(tx);
    }

    #[tokio::test]
    async fn failed_reporter_is_reported() {
        let reporter = tokio::spawn(async { panic!("stdout closed") });
        assert!(!finish(reporter).await);
    }

    #[tokio::test]
    async fn cancelled_reporter_is_reported() {
        let reporter = tokio::spawn(std::future::pending::<()>());
        reporter.abort();
        assert!(!finish(reporter).await);
    }
}
