//! Async-friendly page API backed by a dedicated worker thread.
//!
//! The worker owns a synchronous [`FxEngine`] and executes commands sent
//! from async tasks, so callers get an async interface without the engine
//! having to be `Send` across await points.

use crate::engine::FxEngine;
use crate::{EffectsConfig, Error, PageEffects, Result, StateSnapshot};
use std::sync::mpsc::{self, Sender};
use std::thread;
use tokio::sync::oneshot;

enum Command {
    #[cfg(feature = "fetch")]
    Goto(String, oneshot::Sender<Result<()>>),
    LoadHtml(String, Option<String>, oneshot::Sender<Result<()>>),
    ScrollTo(f64, oneshot::Sender<f64>),
    Click(String, oneshot::Sender<bool>),
    Submit(oneshot::Sender<bool>),
    RunFrames(u32, oneshot::Sender<()>),
    Snapshot(oneshot::Sender<Result<StateSnapshot>>),
    Close(oneshot::Sender<Result<()>>),
}

/// An async handle to an effects engine running on a background thread.
#[derive(Clone)]
pub struct Page {
    cmd_tx: Sender<Command>,
}

impl Page {
    /// Create a new page handle (spawns the worker thread that owns the
    /// engine).
    pub async fn new(config: Option<EffectsConfig>) -> Result<Self> {
        let config = config.unwrap_or_default();

        let (cmd_tx, cmd_rx) = mpsc::channel::<Command>();
        let (init_tx, init_rx): (oneshot::Sender<Result<()>>, oneshot::Receiver<Result<()>>) =
            oneshot::channel();

        thread::spawn(move || {
            // Initialize the engine on the worker thread
            let mut engine = match FxEngine::new(config) {
                Ok(e) => e,
                Err(err) => {
                    let _ = init_tx.send(Err(err));
                    return;
                }
            };

            let _ = init_tx.send(Ok(()));

            // Command loop
            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    #[cfg(feature = "fetch")]
                    Command::Goto(url, resp) => {
                        let res = engine.load_url(&url);
                        let _ = resp.send(res);
                    }
                    Command::LoadHtml(html, url, resp) => {
                        let res = engine.load_html(&html, url.as_deref());
                        let _ = resp.send(res);
                    }
                    Command::ScrollTo(y, resp) => {
                        engine.scroll_to(y);
                        let _ = resp.send(engine.scroll_y());
                    }
                    Command::Click(href, resp) => {
                        let _ = resp.send(engine.click_anchor(&href));
                    }
                    Command::Submit(resp) => {
                        let _ = resp.send(engine.submit_form());
                    }
                    Command::RunFrames(count, resp) => {
                        engine.run_frames(count);
                        let _ = resp.send(());
                    }
                    Command::Snapshot(resp) => {
                        let _ = resp.send(engine.snapshot());
                    }
                    Command::Close(resp) => {
                        let _ = resp.send(engine.close());
                        break;
                    }
                }
            }
        });

        let init_res = init_rx
            .await
            .map_err(|e| Error::Other(format!("Worker init canceled: {}", e)))?;
        init_res?;

        Ok(Self { cmd_tx })
    }

    /// Navigate to a URL
    #[cfg(feature = "fetch")]
    pub async fn goto(&self, url: &str) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        let _ = self.cmd_tx.send(Command::Goto(url.to_string(), tx));
        rx.await
            .map_err(|e| Error::Other(format!("Goto canceled: {}", e)))?
    }

    /// Install a page from markup
    pub async fn load_html(&self, html: &str, url: Option<&str>) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        let _ = self.cmd_tx.send(Command::LoadHtml(
            html.to_string(),
            url.map(|u| u.to_string()),
            tx,
        ));
        rx.await
            .map_err(|e| Error::Other(format!("LoadHtml canceled: {}", e)))?
    }

    /// Process one scroll event; returns the clamped offset
    pub async fn scroll_to(&self, y: f64) -> Result<f64> {
        let (tx, rx) = oneshot::channel();
        let _ = self.cmd_tx.send(Command::ScrollTo(y, tx));
        rx.await
            .map_err(|e| Error::Other(format!("ScrollTo canceled: {}", e)))
    }

    /// Activate a same-page link; returns whether a smooth-scroll started
    pub async fn click(&self, href: &str) -> Result<bool> {
        let (tx, rx) = oneshot::channel();
        let _ = self.cmd_tx.send(Command::Click(href.to_string(), tx));
        rx.await
            .map_err(|e| Error::Other(format!("Click canceled: {}", e)))
    }

    /// Submit the contact form; returns whether a form was present
    pub async fn submit(&self) -> Result<bool> {
        let (tx, rx) = oneshot::channel();
        let _ = self.cmd_tx.send(Command::Submit(tx));
        rx.await
            .map_err(|e| Error::Other(format!("Submit canceled: {}", e)))
    }

    /// Advance the engine by `count` rendered frames
    pub async fn run_frames(&self, count: u32) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        let _ = self.cmd_tx.send(Command::RunFrames(count, tx));
        rx.await
            .map_err(|e| Error::Other(format!("RunFrames canceled: {}", e)))
    }

    /// Snapshot the full effect state
    pub async fn snapshot(&self) -> Result<StateSnapshot> {
        let (tx, rx) = oneshot::channel();
        let _ = self.cmd_tx.send(Command::Snapshot(tx));
        rx.await
            .map_err(|e| Error::Other(format!("Snapshot canceled: {}", e)))?
    }

    /// Shut down the background worker
    pub async fn close(self) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        let _ = self.cmd_tx.send(Command::Close(tx));
        rx.await
            .map_err(|e| Error::Other(format!("Close canceled: {}", e)))?
    }
}
