//! Deployments panel controller
//!
//! Polls the dashboard server for the selected project's deployments and
//! submits the editor content as new deployments. The DOM and the network
//! are reached through the traits below so the controller runs the same in
//! the browser and in tests.

use std::future::{poll_fn, Future};
use std::pin::pin;
use std::task::Poll;
use std::time::Duration;

use async_trait::async_trait;
use futures::stream::{FuturesUnordered, StreamExt};
use openapi_client::models::Deployment;
use openapi_server::models::DeployRequest;
use tracing::{debug, error, info};

use crate::errors::UiError;
use crate::render::{render_deployments, CREATING_DEPLOYMENT};

/// Period of the deployments poll
pub const POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Initial editor content
pub const STARTER_CODE: &str = r#"Deno.serve((req: Request) => {
  return new Response("Hello from deploydash!");
});
"#;

/// Code editor widget
pub trait Editor {
    fn content(&self) -> String;
    fn set_content(&self, content: &str);
}

/// Project selector, read fresh on every use
pub trait ProjectSelector {
    fn selected_project_id(&self) -> String;
}

/// Container of the rendered deployments
pub trait DeploymentsPanel {
    fn replace(&self, html: &str);
    fn prepend(&self, html: &str);
}

/// Dashboard server endpoints used by the browser
#[async_trait(?Send)]
pub trait DashboardApi {
    /// `GET /deployments?projectId=`; `None` when the server sent no list
    async fn list_deployments(&self, project_id: &str)
        -> Result<Option<Vec<Deployment>>, UiError>;

    /// `POST /deployment`
    async fn create_deployment(&self, request: &DeployRequest)
        -> Result<serde_json::Value, UiError>;
}

pub struct Controller {
    api: Box<dyn DashboardApi>,
    editor: Box<dyn Editor>,
    selector: Box<dyn ProjectSelector>,
    panel: Box<dyn DeploymentsPanel>,
}

impl Controller {
    pub fn new(
        api: Box<dyn DashboardApi>,
        editor: Box<dyn Editor>,
        selector: Box<dyn ProjectSelector>,
        panel: Box<dyn DeploymentsPanel>,
    ) -> Self {
        Self {
            api,
            editor,
            selector,
            panel,
        }
    }

    /// Fill the editor with the starter program
    pub fn init_editor(&self) {
        self.editor.set_content(STARTER_CODE);
    }

    /// Refresh the panel; failures are logged and leave it untouched
    pub async fn poll(&self) {
        let project_id = self.selector.selected_project_id();
        debug!("Polling deployments of project {:?}", project_id);

        match self.api.list_deployments(&project_id).await {
            Ok(deployments) => {
                self.panel.replace(&render_deployments(deployments.as_deref()));
            }
            Err(e) => {
                error!("Failed to load deployments of project {:?}: {}", project_id, e);
            }
        }
    }

    /// Submit the editor content as a new deployment of the selected project
    ///
    /// The panel only shows a transient notice; the next poll shows the result.
    pub async fn deploy(&self) {
        self.panel.prepend(CREATING_DEPLOYMENT);

        let request = DeployRequest {
            project_id: self.selector.selected_project_id(),
            code: self.editor.content(),
        };

        match self.api.create_deployment(&request).await {
            Ok(_) => info!("Deployment requested for project {:?}", request.project_id),
            Err(e) => error!("Failed to create deployment: {}", e),
        }
    }

    pub async fn on_project_change(&self) {
        self.poll().await;
    }
}

enum Wake {
    Tick,
    Shutdown,
}

/// Poll once immediately and then every `interval` until `shutdown_signal` resolves
///
/// Ticks follow the timer alone: every tick starts a new poll even when
/// earlier ones are still waiting on the network. Polls still in flight at
/// shutdown are dropped.
pub async fn run_polling<S, F>(
    controller: &Controller,
    interval: Duration,
    sleep_fn: S,
    shutdown_signal: impl Future<Output = ()>,
) where
    S: Fn(Duration) -> F,
    F: Future<Output = ()>,
{
    info!("Deployment polling every {:?}", interval);
    let mut shutdown_signal = pin!(shutdown_signal);
    let mut tick = pin!(sleep_fn(interval));
    let mut in_flight = FuturesUnordered::new();
    in_flight.push(controller.poll());

    loop {
        let wake = poll_fn(|cx| {
            if shutdown_signal.as_mut().poll(cx).is_ready() {
                return Poll::Ready(Wake::Shutdown);
            }
            while let Poll::Ready(Some(())) = in_flight.poll_next_unpin(cx) {}
            if tick.as_mut().poll(cx).is_ready() {
                return Poll::Ready(Wake::Tick);
            }
            Poll::Pending
        })
        .await;

        match wake {
            Wake::Tick => {
                in_flight.push(controller.poll());
                tick.set(sleep_fn(interval));
            }
            Wake::Shutdown => {
                info!(
                    "Deployment polling stopped with {} poll(s) in flight",
                    in_flight.len()
                );
                return;
            }
        }
    }
}

/// Resolves once `done` returns true; checked whenever it is polled
pub fn when<P: Fn() -> bool>(done: P) -> impl Future<Output = ()> {
    poll_fn(move |_| if done() { Poll::Ready(()) } else { Poll::Pending })
}
