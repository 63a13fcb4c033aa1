//! In-memory render surface for pipeline tests.
//!
//! Elements are node indices into a flat arena; document order is insertion
//! order. Time is virtual: `sleep` only advances a counter, which also gates
//! when nodes appear or become clickable.
#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use trawl_drivers::{RenderSurface, SurfaceError, SurfaceResult};

#[derive(Debug, Clone, Default)]
struct Node {
    selector: String,
    parent: Option<usize>,
    text: String,
    attrs: HashMap<String, String>,
    appears_at: Duration,
    interactable_at: Duration,
    stale: bool,
    click_fails: bool,
    reveals: Option<(usize, String)>,
}

#[derive(Debug, Default)]
struct State {
    nodes: Vec<Node>,
    clock: Duration,
    extents: Vec<u64>,
    extent_reads: usize,
    scrolls: usize,
    clicks: Vec<usize>,
    navigations: Vec<String>,
    closes: usize,
    fail_navigation: bool,
    panic_on_navigate: bool,
}

impl State {
    fn visible(&self, id: usize) -> bool {
        let node = &self.nodes[id];
        !node.stale && self.clock >= node.appears_at
    }

    fn is_descendant(&self, id: usize, ancestor: usize) -> bool {
        let mut cur = self.nodes[id].parent;
        while let Some(p) = cur {
            if p == ancestor {
                return true;
            }
            cur = self.nodes[p].parent;
        }
        false
    }

    fn live(&self, id: usize) -> SurfaceResult<&Node> {
        let node = self
            .nodes
            .get(id)
            .ok_or_else(|| SurfaceError::NotFound(format!("node {id}")))?;
        if node.stale {
            return Err(SurfaceError::Stale(format!("node {id}")));
        }
        Ok(node)
    }

    fn matching(&self, scope: Option<usize>, selector: &str) -> Vec<usize> {
        (0..self.nodes.len())
            .filter(|&id| self.nodes[id].selector == selector && self.visible(id))
            .filter(|&id| scope.map_or(true, |s| self.is_descendant(id, s)))
            .collect()
    }
}

pub struct FakeSurface {
    state: Arc<Mutex<State>>,
}

/// Read-only view that outlives the surface (which `close` consumes).
#[derive(Clone)]
pub struct FakeProbe {
    state: Arc<Mutex<State>>,
}

impl FakeSurface {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(State::default())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    pub fn probe(&self) -> FakeProbe {
        FakeProbe {
            state: Arc::clone(&self.state),
        }
    }

    /// Append a node; returns its element handle.
    pub fn add(&self, parent: Option<usize>, selector: &str, text: &str) -> usize {
        let mut st = self.lock();
        st.nodes.push(Node {
            selector: selector.to_string(),
            parent,
            text: text.to_string(),
            ..Node::default()
        });
        st.nodes.len() - 1
    }

    pub fn set_attr(&self, id: usize, name: &str, value: &str) {
        self.lock().nodes[id]
            .attrs
            .insert(name.to_string(), value.to_string());
    }

    pub fn appear_at(&self, id: usize, at: Duration) {
        self.lock().nodes[id].appears_at = at;
    }

    pub fn interactable_at(&self, id: usize, at: Duration) {
        self.lock().nodes[id].interactable_at = at;
    }

    pub fn mark_stale(&self, id: usize) {
        self.lock().nodes[id].stale = true;
    }

    pub fn fail_clicks(&self, id: usize) {
        self.lock().nodes[id].click_fails = true;
    }

    /// Clicking `button` replaces the text of `target` with `full_text`.
    pub fn reveals(&self, button: usize, target: usize, full_text: &str) {
        self.lock().nodes[button].reveals = Some((target, full_text.to_string()));
    }

    /// Successive `scrollHeight` readings; the last one repeats forever.
    pub fn set_extents(&self, extents: Vec<u64>) {
        self.lock().extents = extents;
    }

    pub fn fail_navigation(&self) {
        self.lock().fail_navigation = true;
    }

    pub fn panic_on_navigate(&self) {
        self.lock().panic_on_navigate = true;
    }
}

impl FakeProbe {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    pub fn clock(&self) -> Duration {
        self.lock().clock
    }

    pub fn scrolls(&self) -> usize {
        self.lock().scrolls
    }

    pub fn clicks(&self) -> Vec<usize> {
        self.lock().clicks.clone()
    }

    pub fn closes(&self) -> usize {
        self.lock().closes
    }

    pub fn navigations(&self) -> Vec<String> {
        self.lock().navigations.clone()
    }

    pub fn text_of(&self, id: usize) -> String {
        self.lock().nodes[id].text.clone()
    }
}

#[async_trait]
impl RenderSurface for FakeSurface {
    type Element = usize;

    async fn navigate(&self, url: &str) -> SurfaceResult<()> {
        let (fail, panics) = {
            let mut st = self.lock();
            st.navigations.push(url.to_string());
            (st.fail_navigation, st.panic_on_navigate)
        };
        if panics {
            panic!("renderer crashed");
        }
        if fail {
            return Err(SurfaceError::Session("net::ERR_NAME_NOT_RESOLVED".into()));
        }
        Ok(())
    }

    async fn find(&self, selector: &str) -> SurfaceResult<usize> {
        self.lock()
            .matching(None, selector)
            .first()
            .copied()
            .ok_or_else(|| SurfaceError::NotFound(selector.to_string()))
    }

    async fn find_all(&self, selector: &str) -> SurfaceResult<Vec<usize>> {
        Ok(self.lock().matching(None, selector))
    }

    async fn find_within(&self, scope: &usize, selector: &str) -> SurfaceResult<usize> {
        let st = self.lock();
        st.live(*scope)?;
        st.matching(Some(*scope), selector)
            .first()
            .copied()
            .ok_or_else(|| SurfaceError::NotFound(selector.to_string()))
    }

    async fn find_all_within(&self, scope: &usize, selector: &str) -> SurfaceResult<Vec<usize>> {
        let st = self.lock();
        st.live(*scope)?;
        Ok(st.matching(Some(*scope), selector))
    }

    async fn read_text(&self, element: &usize) -> SurfaceResult<String> {
        Ok(self.lock().live(*element)?.text.clone())
    }

    async fn read_attribute(&self, element: &usize, name: &str) -> SurfaceResult<Option<String>> {
        Ok(self.lock().live(*element)?.attrs.get(name).cloned())
    }

    async fn is_interactable(&self, element: &usize) -> SurfaceResult<bool> {
        let st = self.lock();
        let node = st.live(*element)?;
        Ok(st.clock >= node.interactable_at)
    }

    async fn click(&self, element: &usize) -> SurfaceResult<()> {
        let mut st = self.lock();
        let node = st.live(*element)?;
        if node.click_fails {
            return Err(SurfaceError::NotInteractable(format!("node {element}")));
        }
        let reveals = node.reveals.clone();
        st.clicks.push(*element);
        if let Some((target, full)) = reveals {
            st.nodes[target].text = full;
        }
        Ok(())
    }

    async fn run_script(&self, _script: &str, _args: Vec<Value>) -> SurfaceResult<Value> {
        Ok(Value::Null)
    }

    fn element_arg(&self, element: &usize) -> SurfaceResult<Value> {
        Ok(json!(element))
    }

    async fn sleep(&self, duration: Duration) {
        self.lock().clock += duration;
    }

    async fn close(self) -> SurfaceResult<()> {
        self.lock().closes += 1;
        Ok(())
    }

    async fn scroll_into_view(&self, element: &usize) -> SurfaceResult<()> {
        self.lock().live(*element)?;
        Ok(())
    }

    async fn scroll_to_end(&self, element: &usize) -> SurfaceResult<()> {
        let mut st = self.lock();
        st.live(*element)?;
        st.scrolls += 1;
        Ok(())
    }

    async fn current_extent(&self, element: &usize) -> SurfaceResult<u64> {
        let mut st = self.lock();
        st.live(*element)?;
        let idx = st.extent_reads.min(st.extents.len().saturating_sub(1));
        let extent = st.extents.get(idx).copied().unwrap_or(0);
        st.extent_reads += 1;
        Ok(extent)
    }
}
