//! Dedicated driver thread.
//!
//! The browser session, its WebSocket reader and the [`BrowserController`]
//! all live on one OS thread running a single-threaded runtime. Everything
//! else reaches the controller by queueing jobs through a [`WorkerHandle`];
//! jobs run one at a time in arrival order.

use std::future::Future;
use std::thread::{self, JoinHandle};

use futures::future::LocalBoxFuture;
use futures::FutureExt;
use pagehand_config::{BrowserConfig, Config};
use tokio::sync::{mpsc, oneshot};
use tracing::{error, info, warn};

use crate::cdp::CdpBrowser;
use crate::controller::BrowserController;
use crate::driver::{BrowserDriver, DriverError};
use crate::error::FatalError;

const THREAD_NAME: &str = "pagehand-driver";

type Job = Box<dyn for<'a> FnOnce(&'a mut BrowserController) -> LocalBoxFuture<'a, ()> + Send>;

enum Command {
    Run(Job),
    Shutdown(oneshot::Sender<()>),
}

fn boxed_job<F>(job: F) -> Job
where
    F: for<'a> FnOnce(&'a mut BrowserController) -> LocalBoxFuture<'a, ()> + Send + 'static,
{
    Box::new(job)
}

/// Cloneable sender side of the worker queue.
#[derive(Clone)]
pub struct WorkerHandle {
    tx: mpsc::UnboundedSender<Command>,
}

impl WorkerHandle {
    /// Run `f` against the controller on the worker thread and wait for it.
    ///
    /// ```rust,ignore
    /// let snapshot = handle
    ///     .call(|c| async move { c.get_snapshot(None).await }.boxed_local())
    ///     .await?;
    /// ```
    pub async fn call<T, F>(&self, f: F) -> Result<T, FatalError>
    where
        T: Send + 'static,
        F: for<'a> FnOnce(&'a mut BrowserController) -> LocalBoxFuture<'a, Result<T, FatalError>>
            + Send
            + 'static,
    {
        let (reply_tx, reply_rx) = oneshot::channel();
        let job = boxed_job(move |controller| {
            async move {
                let result = f(controller).await;
                let _ = reply_tx.send(result);
            }
            .boxed_local()
        });
        self.tx
            .send(Command::Run(job))
            .map_err(|_| FatalError::WorkerStopped)?;
        reply_rx.await.map_err(|_| FatalError::WorkerStopped)?
    }

    pub fn is_running(&self) -> bool {
        !self.tx.is_closed()
    }

    /// Ask the worker to release the browser and stop. Jobs already queued
    /// run first.
    pub async fn shutdown(&self) -> Result<(), FatalError> {
        let (done_tx, done_rx) = oneshot::channel();
        self.tx
            .send(Command::Shutdown(done_tx))
            .map_err(|_| FatalError::WorkerStopped)?;
        done_rx.await.map_err(|_| FatalError::WorkerStopped)
    }
}

/// Owner of the driver thread.
pub struct BrowserWorker {
    handle: WorkerHandle,
    thread: Option<JoinHandle<()>>,
}

impl BrowserWorker {
    /// Launch or attach to Chrome per `config.browser` on a new worker thread.
    pub async fn spawn(config: Config) -> Result<Self, FatalError> {
        Self::spawn_with(config, |browser_config| async move {
            CdpBrowser::launch(&browser_config)
                .await
                .map(|browser| Box::new(browser) as Box<dyn BrowserDriver>)
        })
        .await
    }

    /// Start the worker thread with a custom browser factory.
    ///
    /// The factory runs on the worker thread, so any tasks the browser
    /// spawns are bound to the worker's runtime.
    pub async fn spawn_with<F, Fut>(config: Config, factory: F) -> Result<Self, FatalError>
    where
        F: FnOnce(BrowserConfig) -> Fut + Send + 'static,
        Fut: Future<Output = Result<Box<dyn BrowserDriver>, DriverError>> + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let (ready_tx, ready_rx) = oneshot::channel();

        let thread = thread::Builder::new()
            .name(THREAD_NAME.to_string())
            .spawn(move || run(config, factory, ready_tx, rx))
            .map_err(|e| FatalError::WorkerStartup(e.to_string()))?;

        match ready_rx.await {
            Ok(Ok(())) => {
                info!("Browser worker started");
                Ok(Self {
                    handle: WorkerHandle { tx },
                    thread: Some(thread),
                })
            }
            Ok(Err(e)) => {
                let _ = thread.join();
                Err(e)
            }
            Err(_) => {
                let _ = thread.join();
                Err(FatalError::WorkerStartup(
                    "worker thread exited during startup".to_string(),
                ))
            }
        }
    }

    pub fn handle(&self) -> WorkerHandle {
        self.handle.clone()
    }

    /// Stop the worker and wait for its thread to exit.
    pub async fn shutdown(mut self) -> Result<(), FatalError> {
        if let Err(e) = self.handle.shutdown().await {
            warn!("Worker shutdown request failed: {}", e);
        }
        if let Some(thread) = self.thread.take() {
            let joined = tokio::task::spawn_blocking(move || thread.join()).await;
            if !matches!(joined, Ok(Ok(()))) {
                error!("Browser worker thread panicked");
                return Err(FatalError::WorkerStopped);
            }
        }
        info!("Browser worker stopped");
        Ok(())
    }
}

fn run<F, Fut>(
    config: Config,
    factory: F,
    ready: oneshot::Sender<Result<(), FatalError>>,
    mut rx: mpsc::UnboundedReceiver<Command>,
) where
    F: FnOnce(BrowserConfig) -> Fut,
    Fut: Future<Output = Result<Box<dyn BrowserDriver>, DriverError>>,
{
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create worker runtime: {}", e);
            let _ = ready.send(Err(FatalError::WorkerStartup(e.to_string())));
            return;
        }
    };

    runtime.block_on(async move {
        let browser = match factory(config.browser.clone()).await {
            Ok(browser) => browser,
            Err(e) => {
                error!("Browser connection failed: {}", e);
                let _ = ready.send(Err(FatalError::WorkerStartup(e.to_string())));
                return;
            }
        };
        let mut controller = match BrowserController::new(browser, config).await {
            Ok(controller) => controller,
            Err(e) => {
                error!("Opening the first tab failed: {}", e);
                let _ = ready.send(Err(FatalError::WorkerStartup(e.to_string())));
                return;
            }
        };
        let _ = ready.send(Ok(()));

        let mut done = None;
        while let Some(command) = rx.recv().await {
            match command {
                Command::Run(job) => job(&mut controller).await,
                Command::Shutdown(ack) => {
                    done = Some(ack);
                    break;
                }
            }
        }

        rx.close();
        if let Err(e) = controller.shutdown().await {
            error!("Controller shutdown failed: {}", e);
        }
        if let Some(ack) = done {
            let _ = ack.send(());
        }
    });
}
