//! Browser bindings of the deployments controller

use std::io;
use std::rc::Rc;

use async_trait::async_trait;
use openapi_client::models::Deployment;
use openapi_server::models::DeployRequest;
use tracing::{error, info};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{
    Document, Element, Event, Headers, HtmlSelectElement, HtmlTextAreaElement, Request,
    RequestInit, RequestMode, Response,
};

use crate::controller::{
    run_polling, Controller, DashboardApi, DeploymentsPanel, Editor, ProjectSelector,
    POLL_INTERVAL,
};
use crate::errors::UiError;

const EDITOR_ID: &str = "editor";
const PROJECT_SELECT_ID: &str = "project-select";
const DEPLOY_BUTTON_ID: &str = "deploy-button";
const DEPLOYMENTS_ID: &str = "deployments";

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    init_console_logging();

    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| JsValue::from_str("no document available"))?;

    let editor: HtmlTextAreaElement = element_by_id(&document, EDITOR_ID)?.dyn_into()?;
    let select: HtmlSelectElement = element_by_id(&document, PROJECT_SELECT_ID)?.dyn_into()?;
    let button = element_by_id(&document, DEPLOY_BUTTON_ID)?;
    let panel = element_by_id(&document, DEPLOYMENTS_ID)?;

    let controller = Rc::new(Controller::new(
        Box::new(FetchApi),
        Box::new(TextAreaEditor(editor)),
        Box::new(SelectProjects(select.clone())),
        Box::new(ElementPanel(panel)),
    ));
    controller.init_editor();

    let on_deploy = {
        let controller = controller.clone();
        Closure::<dyn FnMut(Event)>::new(move |_: Event| {
            let controller = controller.clone();
            spawn_local(async move { controller.deploy().await });
        })
    };
    button.add_event_listener_with_callback("click", on_deploy.as_ref().unchecked_ref())?;
    on_deploy.forget();

    let on_change = {
        let controller = controller.clone();
        Closure::<dyn FnMut(Event)>::new(move |_: Event| {
            let controller = controller.clone();
            spawn_local(async move { controller.on_project_change().await });
        })
    };
    select.add_event_listener_with_callback("change", on_change.as_ref().unchecked_ref())?;
    on_change.forget();

    spawn_local(async move {
        run_polling(
            &controller,
            POLL_INTERVAL,
            gloo_timers::future::sleep,
            std::future::pending(),
        )
        .await;
    });

    info!("Dashboard controller started");
    Ok(())
}

fn element_by_id(document: &Document, id: &str) -> Result<Element, JsValue> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("missing element #{}", id)))
}

/// Buffers one formatted event and writes it to the browser console on drop
struct ConsoleWriter(Vec<u8>);

impl io::Write for ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        let line = String::from_utf8_lossy(&self.0);
        let line = line.trim_end();
        if !line.is_empty() {
            web_sys::console::log_1(&JsValue::from_str(line));
        }
    }
}

fn init_console_logging() {
    // No clock in the browser sandbox
    let _ = tracing_subscriber::fmt()
        .with_writer(|| ConsoleWriter(Vec::new()))
        .with_max_level(tracing::Level::INFO)
        .without_time()
        .with_ansi(false)
        .try_init();
}

struct TextAreaEditor(HtmlTextAreaElement);

impl Editor for TextAreaEditor {
    fn content(&self) -> String {
        self.0.value()
    }

    fn set_content(&self, content: &str) {
        self.0.set_value(content);
    }
}

struct SelectProjects(HtmlSelectElement);

impl ProjectSelector for SelectProjects {
    fn selected_project_id(&self) -> String {
        self.0.value()
    }
}

struct ElementPanel(Element);

impl DeploymentsPanel for ElementPanel {
    fn replace(&self, html: &str) {
        self.0.set_inner_html(html);
    }

    fn prepend(&self, html: &str) {
        if let Err(e) = self.0.insert_adjacent_html("afterbegin", html) {
            error!("Failed to update deployments panel: {:?}", e);
        }
    }
}

/// Same-origin calls to the dashboard server
struct FetchApi;

impl FetchApi {
    async fn fetch_text(url: &str, method: &str, body: Option<&str>) -> Result<String, UiError> {
        let opts = RequestInit::new();
        opts.set_method(method);
        opts.set_mode(RequestMode::SameOrigin);

        let headers = Headers::new().map_err(js_error)?;
        if let Some(data) = body {
            opts.set_body(&JsValue::from_str(data));
            headers
                .append("Content-Type", "application/json")
                .map_err(js_error)?;
        }
        opts.set_headers(&headers);

        let request = Request::new_with_str_and_init(url, &opts).map_err(js_error)?;
        let window = web_sys::window().ok_or_else(|| UiError::Dom("no window".to_string()))?;
        let response: Response = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(js_error)?
            .dyn_into()
            .map_err(js_error)?;

        if !response.ok() {
            return Err(UiError::Status(response.status()));
        }

        let text = JsFuture::from(response.text().map_err(js_error)?)
            .await
            .map_err(js_error)?;
        Ok(text.as_string().unwrap_or_default())
    }
}

#[async_trait(?Send)]
impl DashboardApi for FetchApi {
    async fn list_deployments(
        &self,
        project_id: &str,
    ) -> Result<Option<Vec<Deployment>>, UiError> {
        let encoded = String::from(js_sys::encode_uri_component(project_id));
        let text = Self::fetch_text(&format!("/deployments?projectId={}", encoded), "GET", None)
            .await?;
        if text.trim().is_empty() {
            return Ok(None);
        }
        Ok(serde_json::from_str(&text)?)
    }

    async fn create_deployment(
        &self,
        request: &DeployRequest,
    ) -> Result<serde_json::Value, UiError> {
        let body = serde_json::to_string(request)?;
        let text = Self::fetch_text("/deployment", "POST", Some(&body)).await?;
        Ok(serde_json::from_str(&text)?)
    }
}

fn js_error(value: JsValue) -> UiError {
    UiError::Network(format!("{:?}", value))
}
