use crate::config;
use crate::events::AppEvent;
use crate::sys::server;
use async_channel::Sender;
use std::thread::{self, JoinHandle};

/// Runs the remote-control socket and the config watcher on a tokio runtime of their own, off the
/// GTK main thread. Both report back through `tx`.
pub fn start_background_services(tx: Sender<AppEvent>) -> std::io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("dhd-services".into())
        .spawn(move || {
            let rt = match tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
            {
                Ok(rt) => rt,
                Err(e) => {
                    log::error!("Failed to create Tokio runtime: {}", e);
                    return;
                }
            };

            rt.block_on(async move {
                let server = tokio::spawn(server::run_server(tx.clone()));
                let watcher = tokio::spawn(config::run_async_watcher(tx));
                let _ = tokio::join!(server, watcher);
                log::warn!("Background services stopped");
            });
        })
}
