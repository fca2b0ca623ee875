use std::future::Future;
use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Context as _;
use base64::Engine as _;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::target::Target;

/// How long a copy acknowledgement stays visible.
pub const REVERT_DELAY: Duration = Duration::from_millis(3000);

pub trait Clipboard {
    fn write_text(&self, text: &str) -> impl Future<Output = anyhow::Result<()>> + Send;
}

/// Sets the terminal's clipboard with an OSC 52 escape sequence.
pub struct Osc52Clipboard<W> {
    out: Mutex<W>,
}

impl<W: Write + Send> Osc52Clipboard<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        match self.out.into_inner() {
            Ok(w) => w,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write_sequence(&self, text: &str) -> anyhow::Result<()> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(text.as_bytes());
        let mut out = self
            .out
            .lock()
            .map_err(|_| anyhow::anyhow!("clipboard writer lock poisoned"))?;
        write!(out, "\x1b]52;c;{}\x07", encoded).context("write OSC 52 sequence")?;
        out.flush().context("flush OSC 52 sequence")?;
        Ok(())
    }
}

impl<W: Write + Send> Clipboard for Osc52Clipboard<W> {
    async fn write_text(&self, text: &str) -> anyhow::Result<()> {
        self.write_sequence(text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Hidden,
    Shown,
}

impl Visibility {
    /// CSS opacity of the status element.
    pub fn opacity(self) -> &'static str {
        match self {
            Visibility::Hidden => "0",
            Visibility::Shown => "1",
        }
    }
}

/// "Copied" acknowledgement for one target.
///
/// Shown after a successful clipboard write and hidden again once [`REVERT_DELAY`]
/// has passed since the latest copy. A pending revert is aborted when a new copy lands.
pub struct StatusIndicator {
    target: Target,
    delay: Duration,
    state: Arc<watch::Sender<Visibility>>,
    revert: Mutex<Option<JoinHandle<()>>>,
}

impl StatusIndicator {
    pub fn new(target: Target) -> Self {
        Self::with_delay(target, REVERT_DELAY)
    }

    pub fn with_delay(target: Target, delay: Duration) -> Self {
        let (tx, _rx) = watch::channel(Visibility::Hidden);
        Self {
            target,
            delay,
            state: Arc::new(tx),
            revert: Mutex::new(None),
        }
    }

    pub fn target(&self) -> Target {
        self.target
    }

    /// Element id of the status message on the page.
    pub fn element_id(&self) -> String {
        format!("copy-status-message-{}", self.target.key())
    }

    pub fn visibility(&self) -> Visibility {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<Visibility> {
        self.state.subscribe()
    }

    /// Writes `text` to `clipboard` and shows the acknowledgement on success.
    ///
    /// A failed write is logged and returned; the status stays as it was.
    pub async fn copy<C: Clipboard>(&self, clipboard: &C, text: &str) -> anyhow::Result<()> {
        if let Err(e) = clipboard.write_text(text).await {
            tracing::warn!(
                target_key = self.target.key(),
                error = %format!("{:#}", e),
                "hit a snag when copying to clipboard"
            );
            return Err(e.context(format!("copy {} command", self.target)));
        }
        self.show();
        tracing::info!(target_key = self.target.key(), "copied install command");
        Ok(())
    }

    /// Resolves once the acknowledgement is hidden again.
    pub async fn settled(&self) {
        let mut rx = self.subscribe();
        let _ = rx.wait_for(|v| *v == Visibility::Hidden).await;
    }

    fn show(&self) {
        self.state.send_replace(Visibility::Shown);

        let mut pending = match self.revert.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(prev) = pending.take() {
            prev.abort();
        }

        let state = Arc::clone(&self.state);
        let delay = self.delay;
        *pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            state.send_replace(Visibility::Hidden);
        }));
    }
}

impl Drop for StatusIndicator {
    fn drop(&mut self) {
        if let Ok(mut pending) = self.revert.lock() {
            if let Some(handle) = pending.take() {
                handle.abort();
            }
        }
    }
}
