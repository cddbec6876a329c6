//! Scripted in-memory driver for engine tests.
//!
//! Script responses are keyed by the `/* pagehand:<name> */` tag every
//! generated script carries. A queued response is consumed; the last one
//! sticks.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{Value, json};

use crate::driver::{AxNode, BrowserDriver, DriverError, Locator, PageDriver, Rect, Viewport};
use crate::scripts;

#[derive(Debug, Clone)]
enum Scripted {
    Value(Value),
    Error(String),
}

#[derive(Debug)]
pub(crate) struct PageState {
    scripts: HashMap<String, VecDeque<Scripted>>,
    ax: VecDeque<Result<Option<AxNode>, String>>,
    locators: Vec<(Locator, Rect)>,
    hidden: Vec<Locator>,
    fillable: Vec<Locator>,
    options: Vec<(Locator, String, String)>,
    pub viewport: Viewport,
    pub url: String,
    pub title: String,
    load_fails: bool,
    click_fails: bool,
    history: Vec<String>,
    history_index: usize,

    pub clicks: Vec<(f64, f64)>,
    pub typed: Vec<String>,
    pub keys: Vec<String>,
    pub fills: Vec<(Locator, String)>,
    pub located: Vec<Locator>,
    pub evaluated: Vec<String>,
    pub navigations: Vec<String>,
    pub fronted: usize,
    pub reloads: usize,
}

impl Default for PageState {
    fn default() -> Self {
        Self {
            scripts: HashMap::new(),
            ax: VecDeque::new(),
            locators: Vec::new(),
            hidden: Vec::new(),
            fillable: Vec::new(),
            options: Vec::new(),
            viewport: Viewport {
                width: 1280,
                height: 800,
            },
            url: "about:blank".to_string(),
            title: String::new(),
            load_fails: false,
            click_fails: false,
            history: vec!["about:blank".to_string()],
            history_index: 0,
            clicks: Vec::new(),
            typed: Vec::new(),
            keys: Vec::new(),
            fills: Vec::new(),
            located: Vec::new(),
            evaluated: Vec::new(),
            navigations: Vec::new(),
            fronted: 0,
            reloads: 0,
        }
    }
}

fn take_sticky<T: Clone>(queue: &mut VecDeque<T>) -> Option<T> {
    if queue.len() > 1 {
        queue.pop_front()
    } else {
        queue.front().cloned()
    }
}

/// Page whose every response is scripted by the test.
#[derive(Debug, Clone)]
pub(crate) struct FakePage {
    id: String,
    state: Arc<Mutex<PageState>>,
}

impl FakePage {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            state: Arc::new(Mutex::new(PageState::default())),
        }
    }

    /// Inspect or tweak the recorded state.
    pub fn with<R>(&self, f: impl FnOnce(&mut PageState) -> R) -> R {
        f(&mut self.state.lock())
    }

    pub fn script(&self, tag: &str, value: Value) {
        self.state
            .lock()
            .scripts
            .insert(tag.to_string(), VecDeque::from([Scripted::Value(value)]));
    }

    pub fn script_sequence(&self, tag: &str, values: Vec<Value>) {
        self.state.lock().scripts.insert(
            tag.to_string(),
            values.into_iter().map(Scripted::Value).collect(),
        );
    }

    pub fn script_error(&self, tag: &str, message: &str) {
        self.state.lock().scripts.insert(
            tag.to_string(),
            VecDeque::from([Scripted::Error(message.to_string())]),
        );
    }

    pub fn ax_sequence(&self, responses: Vec<Result<Option<AxNode>, String>>) {
        self.state.lock().ax = responses.into();
    }

    pub fn ax_tree(&self, tree: AxNode) {
        self.ax_sequence(vec![Ok(Some(tree))]);
    }

    pub fn place(&self, locator: Locator, rect: Rect) {
        self.state.lock().locators.push((locator, rect));
    }

    /// Element that exists but never becomes visible.
    pub fn hide(&self, locator: Locator) {
        self.state.lock().hidden.push(locator);
    }

    pub fn allow_fill(&self, locator: Locator) {
        self.state.lock().fillable.push(locator);
    }

    pub fn add_option(&self, locator: Locator, label: &str, value: &str) {
        self.state
            .lock()
            .options
            .push((locator, label.to_string(), value.to_string()));
    }

    pub fn fail_load(&self) {
        self.state.lock().load_fails = true;
    }

    pub fn fail_clicks(&self) {
        self.state.lock().click_fails = true;
    }

    pub fn clicks(&self) -> Vec<(f64, f64)> {
        self.state.lock().clicks.clone()
    }

    pub fn evaluated(&self, tag: &str) -> usize {
        self.state.lock().evaluated.iter().filter(|t| *t == tag).count()
    }
}

#[async_trait]
impl PageDriver for FakePage {
    fn page_id(&self) -> &str {
        &self.id
    }

    async fn navigate(&self, url: &str, _timeout: Duration) -> Result<(), DriverError> {
        let mut state = self.state.lock();
        state.navigations.push(url.to_string());
        if state.load_fails {
            return Err(DriverError::Timeout("Page load timeout".to_string()));
        }
        state.url = url.to_string();
        let keep = state.history_index + 1;
        state.history.truncate(keep);
        state.history.push(url.to_string());
        state.history_index = keep;
        Ok(())
    }

    async fn url(&self) -> Result<String, DriverError> {
        Ok(self.state.lock().url.clone())
    }

    async fn title(&self) -> Result<String, DriverError> {
        Ok(self.state.lock().title.clone())
    }

    async fn viewport(&self) -> Result<Viewport, DriverError> {
        Ok(self.state.lock().viewport)
    }

    async fn accessibility_tree(&self) -> Result<Option<AxNode>, DriverError> {
        let response = take_sticky(&mut self.state.lock().ax)
            .unwrap_or_else(|| Ok(Some(AxNode::new("RootWebArea", ""))));
        response.map_err(|message| DriverError::Protocol {
            code: -32000,
            message,
        })
    }

    async fn evaluate(&self, script: &str) -> Result<Value, DriverError> {
        let tag = scripts::tag_of(script).unwrap_or("untagged").to_string();
        let mut state = self.state.lock();
        state.evaluated.push(tag.clone());

        let scripted = state.scripts.get_mut(&tag).and_then(take_sticky);
        match scripted {
            Some(Scripted::Value(v)) => Ok(v),
            Some(Scripted::Error(e)) => Err(DriverError::JavaScript(e)),
            None => Ok(match tag.as_str() {
                "body_present" => json!(true),
                "ready_state" => json!("complete"),
                "mutation_sample" => json!(0),
                "dom_scan" | "form_errors" => json!([]),
                "page_text" => json!({"text": "", "title": state.title, "url": state.url}),
                "scroll" => json!(0),
                _ => Value::Null,
            }),
        }
    }

    async fn count(&self, locator: &Locator) -> Result<usize, DriverError> {
        let state = self.state.lock();
        let placed = state.locators.iter().filter(|(l, _)| l == locator).count();
        let hidden = state.hidden.iter().filter(|l| *l == locator).count();
        Ok(placed + hidden)
    }

    async fn locate(
        &self,
        locator: &Locator,
        timeout: Duration,
        _scroll: bool,
    ) -> Result<Option<Rect>, DriverError> {
        let found = {
            let mut state = self.state.lock();
            state.located.push(locator.clone());
            state
                .locators
                .iter()
                .find(|(l, _)| l == locator)
                .map(|(_, r)| *r)
        };
        if found.is_none() && !timeout.is_zero() {
            tokio::time::sleep(timeout).await;
        }
        Ok(found)
    }

    async fn fill(&self, locator: &Locator, text: &str, _timeout: Duration) -> Result<bool, DriverError> {
        let mut state = self.state.lock();
        if state.fillable.contains(locator) {
            state.fills.push((locator.clone(), text.to_string()));
            return Ok(true);
        }
        Ok(false)
    }

    async fn select_option(
        &self,
        locator: &Locator,
        label: &str,
        _timeout: Duration,
    ) -> Result<Option<String>, DriverError> {
        let state = self.state.lock();
        Ok(state
            .options
            .iter()
            .find(|(l, option_label, _)| l == locator && option_label.eq_ignore_ascii_case(label))
            .map(|(_, _, value)| value.clone()))
    }

    async fn click_at(&self, x: f64, y: f64) -> Result<(), DriverError> {
        let mut state = self.state.lock();
        if state.click_fails {
            return Err(DriverError::Protocol {
                code: -32000,
                message: "click rejected".to_string(),
            });
        }
        state.clicks.push((x, y));
        Ok(())
    }

    async fn type_text(&self, text: &str) -> Result<(), DriverError> {
        self.state.lock().typed.push(text.to_string());
        Ok(())
    }

    async fn press_key(&self, key: &str) -> Result<(), DriverError> {
        self.state.lock().keys.push(key.to_string());
        Ok(())
    }

    async fn wait_for_load(&self, _timeout: Duration) -> Result<(), DriverError> {
        if self.state.lock().load_fails {
            return Err(DriverError::Timeout("Page load timeout".to_string()));
        }
        Ok(())
    }

    async fn screenshot(&self, _full_page: bool) -> Result<String, DriverError> {
        Ok("iVBORw0KGgo=".to_string())
    }

    async fn bring_to_front(&self) -> Result<(), DriverError> {
        self.state.lock().fronted += 1;
        Ok(())
    }

    async fn go_back(&self) -> Result<bool, DriverError> {
        let mut state = self.state.lock();
        if state.history_index == 0 {
            return Ok(false);
        }
        state.history_index -= 1;
        state.url = state.history[state.history_index].clone();
        Ok(true)
    }

    async fn go_forward(&self) -> Result<bool, DriverError> {
        let mut state = self.state.lock();
        if state.history_index + 1 >= state.history.len() {
            return Ok(false);
        }
        state.history_index += 1;
        state.url = state.history[state.history_index].clone();
        Ok(true)
    }

    async fn reload(&self) -> Result<(), DriverError> {
        self.state.lock().reloads += 1;
        Ok(())
    }
}

#[derive(Debug, Default)]
struct BrowserState {
    pages: Vec<FakePage>,
    closed: Vec<String>,
    created: usize,
    fail_new_page: bool,
}

/// Browser handing out [`FakePage`]s the test can still reach.
#[derive(Debug, Clone, Default)]
pub(crate) struct FakeBrowser {
    state: Arc<Mutex<BrowserState>>,
}

impl FakeBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Page created by the `n`-th `new_page` call.
    pub fn page(&self, n: usize) -> FakePage {
        self.state.lock().pages[n].clone()
    }

    pub fn closed(&self) -> Vec<String> {
        self.state.lock().closed.clone()
    }

    pub fn fail_new_page(&self) {
        self.state.lock().fail_new_page = true;
    }
}

#[async_trait]
impl BrowserDriver for FakeBrowser {
    async fn new_page(&self) -> Result<Box<dyn PageDriver>, DriverError> {
        let mut state = self.state.lock();
        if state.fail_new_page {
            return Err(DriverError::ConnectionFailed("no more pages".to_string()));
        }
        let page = FakePage::new(&format!("page-{}", state.created));
        state.created += 1;
        state.pages.push(page.clone());
        Ok(Box::new(page))
    }

    async fn close_page(&self, page_id: &str) -> Result<(), DriverError> {
        self.state.lock().closed.push(page_id.to_string());
        Ok(())
    }
}
