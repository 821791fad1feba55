use crate::events::AppEvent;
use async_channel::Sender;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::UnixListener;
use wedge::ipc::{Request, SOCKET_PATH};

impl From<Request> for AppEvent {
    fn from(request: Request) -> Self {
        match request {
            Request::Pointer(event) => AppEvent::Pointer(event),
            Request::Dismiss => AppEvent::Dismiss,
        }
    }
}

pub async fn run_server(tx: Sender<AppEvent>) {
    // Cleanup old socket if it exists
    if std::fs::metadata(SOCKET_PATH).is_ok() {
        let _ = std::fs::remove_file(SOCKET_PATH);
    }

    let listener = match UnixListener::bind(SOCKET_PATH) {
        Ok(l) => l,
        Err(e) => {
            log::error!("Failed to bind unix socket: {}", e);
            return;
        }
    };
    log::debug!("Listening on {}", SOCKET_PATH);

    loop {
        match listener.accept().await {
            Ok((mut stream, _)) => {
                let tx = tx.clone();
                tokio::spawn(async move {
                    let reader = BufReader::new(&mut stream);
                    let mut lines = reader.lines();

                    while let Ok(Some(line)) = lines.next_line().await {
                        if line.trim().is_empty() {
                            continue;
                        }
                        match line.parse::<Request>() {
                            Ok(request) => {
                                log::trace!("Request: {}", request);
                                if tx.send(AppEvent::from(request)).await.is_err() {
                                    break;
                                }
                            }
                            Err(e) => log::warn!("Ignoring request '{}': {}", line.trim(), e),
                        }
                    }
                });
            }
            Err(e) => {
                log::error!("Failed to accept connection: {}", e);
            }
        }
    }
}
