//! WebAssembly bindings for the Photon binding engine.
//!
//! ## Example
//!
//! ```js
//! import { PhotonApp } from 'photon-wasm';
//!
//! const app = new PhotonApp({ theme: 'dark' });
//! const id = app.addComponent('#counter');
//!
//! app.setState(id, { count: 0 });
//! app.onClick(id, (state, target) =>
//!   target.id === 'inc' ? { count: state.count + 1 } : undefined);
//! app.prepareStates(id);
//! ```

use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

use photon_binder::{
    App, ComponentId, RefreshReport, Signature, StateMap, Transform, Value, ValueKind,
};
use serde::Serialize;
use tracing::warn;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, MouseEvent};

mod host;
mod types;

pub use host::DomHost;
pub use types::*;

/// Initialize panic hook and browser console tracing.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(debug_assertions)]
    console_error_panic_hook::set_once();
    let _ = tracing_wasm::try_set_as_global_default();
}

struct Inner {
    app: App<DomHost>,
    host: DomHost,
}

struct ClickListener {
    component: ComponentId,
    root: Element,
    closure: Closure<dyn FnMut(MouseEvent)>,
}

/// The Photon application interface for JavaScript.
#[wasm_bindgen]
pub struct PhotonApp {
    inner: Rc<RefCell<Inner>>,
    listeners: Vec<ClickListener>,
}

#[wasm_bindgen]
impl PhotonApp {
    /// Create an application with an optional initial global state object.
    #[wasm_bindgen(constructor)]
    pub fn new(initial_state: JsValue) -> Result<PhotonApp, JsError> {
        let initial = state_from_js(initial_state)?;
        let host = DomHost::new().map_err(|e| JsError::new(&format!("Host error: {}", e)))?;
        Ok(Self {
            inner: Rc::new(RefCell::new(Inner {
                app: App::new(initial),
                host,
            })),
            listeners: Vec::new(),
        })
    }

    /// Get the version of the engine.
    #[wasm_bindgen(js_name = version)]
    pub fn version() -> String {
        env!("CARGO_PKG_VERSION").to_string()
    }

    /// Set binding options for components added afterwards.
    #[wasm_bindgen(js_name = setOptions)]
    pub fn set_options(&mut self, options: JsValue) -> Result<(), JsError> {
        let opts: BindOptionsJs = serde_wasm_bindgen::from_value(options)
            .map_err(|e| JsError::new(&format!("Invalid options: {}", e)))?;

        self.inner_mut()?.app.set_options(opts.into_core());
        Ok(())
    }

    /// Register the element matching `selector` as a component root.
    #[wasm_bindgen(js_name = addComponent)]
    pub fn add_component(&mut self, selector: &str) -> Result<u32, JsError> {
        let mut inner = self.inner_mut()?;
        let Inner { app, host } = &mut *inner;
        let root = host
            .select(selector)
            .map_err(|e| JsError::new(&format!("Host error: {}", e)))?;
        let id = app
            .add_component(host, root)
            .map_err(|e| JsError::new(&format!("Component error: {}", e)))?;
        Ok(id.0)
    }

    /// Rewrite the component's placeholders and apply its bindings.
    #[wasm_bindgen(js_name = prepareStates)]
    pub fn prepare_states(&mut self, id: u32) -> Result<JsValue, JsError> {
        let report = self.with_component(id, |component, host| {
            component
                .prepare(host)
                .map_err(|e| JsError::new(&format!("Prepare error: {}", e)))
        })??;
        report_to_js(&report)
    }

    /// Merge a partial state object and refresh the component.
    #[wasm_bindgen(js_name = setState)]
    pub fn set_state(&mut self, id: u32, partial: JsValue) -> Result<JsValue, JsError> {
        let partial = state_from_js(partial)?;
        let report =
            self.with_component(id, |component, host| component.set_state(host, partial))?;
        report_to_js(&report)
    }

    /// Run one refresh pass over the component.
    #[wasm_bindgen]
    pub fn refresh(&mut self, id: u32) -> Result<JsValue, JsError> {
        let report = self.with_component(id, |component, host| component.refresh(host))?;
        report_to_js(&report)
    }

    /// Install a JavaScript function as the override for `identifier`.
    ///
    /// `input` and `output` name value kinds (`"number"`, `"string"`, ...);
    /// omitted kinds accept anything.
    #[wasm_bindgen(js_name = registerOverride)]
    pub fn register_override(
        &mut self,
        id: u32,
        identifier: &str,
        func: js_sys::Function,
        input: Option<String>,
        output: Option<String>,
    ) -> Result<(), JsError> {
        let signature = Signature::new(parse_kind(input)?, parse_kind(output)?);
        let name = identifier.to_string();
        let transform = Transform::with_signature(signature, move |value| {
            call_override(&func, &name, value)
        });

        self.with_component(id, |component, _| {
            component
                .register_override(identifier, transform)
                .map_err(|e| JsError::new(&format!("Override error: {}", e)))
        })?
    }

    /// Install a click handler on the component root.
    ///
    /// The handler receives `(state, target)` and may return a partial state.
    /// It runs with the app unborrowed, so it may call back into the app.
    #[wasm_bindgen(js_name = onClick)]
    pub fn on_click(&mut self, id: u32, handler: js_sys::Function) -> Result<(), JsError> {
        let component = ComponentId(id);
        let root = self.with_component(id, |c, _| c.root().clone())?;

        let inner = Rc::clone(&self.inner);
        let closure = Closure::wrap(Box::new(move |event: MouseEvent| {
            let Some(target) = event.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
                return;
            };
            let Some(state) = component_state(&inner, component) else {
                return;
            };
            let Some(partial) = call_click_handler(&handler, &target, &state) else {
                return;
            };
            let Ok(mut inner) = inner.try_borrow_mut() else {
                warn!(%component, "click update dropped while the app is busy");
                return;
            };
            let Inner { app, host } = &mut *inner;
            if let Some(c) = app.component_mut(component) {
                c.set_state(host, partial);
            }
        }) as Box<dyn FnMut(MouseEvent)>);

        root.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())
            .map_err(|e| JsError::new(&format!("Listener error: {:?}", e)))?;

        self.remove_listener(component);
        self.listeners.push(ClickListener {
            component,
            root,
            closure,
        });
        Ok(())
    }

    /// Diagnostic table of the component's state.
    #[wasm_bindgen(js_name = printState)]
    pub fn print_state(&self, id: u32) -> Result<String, JsError> {
        let inner = self.inner()?;
        inner
            .app
            .component(ComponentId(id))
            .map(|c| c.print_state())
            .ok_or_else(|| JsError::new(&format!("Unknown component: {}", id)))
    }

    /// Remove the component and its click listener.
    #[wasm_bindgen]
    pub fn detach(&mut self, id: u32) -> Result<(), JsError> {
        let component = ComponentId(id);
        self.remove_listener(component);
        let mut inner = self.inner_mut()?;
        let Inner { app, host } = &mut *inner;
        app.detach(host, component)
            .map_err(|e| JsError::new(&format!("Component error: {}", e)))
    }

    /// Merge into the application-wide store.
    #[wasm_bindgen(js_name = setGlobalState)]
    pub fn set_global_state(&mut self, partial: JsValue) -> Result<(), JsError> {
        let partial = state_from_js(partial)?;
        self.inner_mut()?.app.set_state(partial);
        Ok(())
    }

    /// Read a key from the application-wide store; `undefined` when absent.
    #[wasm_bindgen(js_name = getState)]
    pub fn get_state(&self, key: &str) -> Result<JsValue, JsError> {
        let inner = self.inner()?;
        match inner.app.get_state(key) {
            Some(value) => value_to_js(value),
            None => Ok(JsValue::UNDEFINED),
        }
    }
}

impl PhotonApp {
    fn inner(&self) -> Result<Ref<'_, Inner>, JsError> {
        self.inner.try_borrow().map_err(|_| busy())
    }

    fn inner_mut(&self) -> Result<RefMut<'_, Inner>, JsError> {
        self.inner.try_borrow_mut().map_err(|_| busy())
    }

    fn with_component<T>(
        &self,
        id: u32,
        f: impl FnOnce(&mut photon_binder::Component<DomHost>, &mut DomHost) -> T,
    ) -> Result<T, JsError> {
        let mut inner = self.inner_mut()?;
        let Inner { app, host } = &mut *inner;
        let component = app
            .try_component_mut(ComponentId(id))
            .map_err(|e| JsError::new(&format!("Component error: {}", e)))?;
        Ok(f(component, host))
    }

    fn remove_listener(&mut self, component: ComponentId) {
        self.listeners.retain(|listener| {
            if listener.component != component {
                return true;
            }
            let callback = listener.closure.as_ref().unchecked_ref();
            let _ = listener
                .root
                .remove_event_listener_with_callback("click", callback);
            false
        });
    }
}

fn busy() -> JsError {
    JsError::new("App is busy: a binding pass is running")
}

/// Snapshot of a component's state, taken without holding the borrow.
fn component_state(inner: &RefCell<Inner>, component: ComponentId) -> Option<StateMap> {
    let Ok(inner) = inner.try_borrow() else {
        warn!(%component, "click ignored while the app is busy");
        return None;
    };
    inner.app.component(component).map(|c| c.state().clone())
}

fn state_from_js(value: JsValue) -> Result<StateMap, JsError> {
    if value.is_undefined() || value.is_null() {
        return Ok(StateMap::new());
    }
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| JsError::new(&format!("Invalid state: {}", e)))
}

fn value_to_js(value: &Value) -> Result<JsValue, JsError> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

fn report_to_js(report: &RefreshReport) -> Result<JsValue, JsError> {
    serde_wasm_bindgen::to_value(&RefreshReportJs::from(report))
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

fn parse_kind(name: Option<String>) -> Result<Option<ValueKind>, JsError> {
    name.map(|name| name.parse::<ValueKind>())
        .transpose()
        .map_err(|e| JsError::new(&format!("Invalid signature: {}", e)))
}

/// Call a JavaScript override. A throwing or unconvertible call yields `Null`.
fn call_override(func: &js_sys::Function, identifier: &str, value: Option<&Value>) -> Value {
    let arg = match value.map(value_to_js).transpose() {
        Ok(arg) => arg.unwrap_or(JsValue::UNDEFINED),
        Err(_) => JsValue::UNDEFINED,
    };
    let result = func
        .call1(&JsValue::NULL, &arg)
        .map_err(|e| format!("{e:?}"))
        .and_then(|out| serde_wasm_bindgen::from_value::<Value>(out).map_err(|e| e.to_string()));
    match result {
        Ok(value) => value,
        Err(error) => {
            warn!(identifier, %error, "override call failed");
            Value::Null
        }
    }
}

/// Call a JavaScript click handler. `undefined` or `null` means no update.
fn call_click_handler(
    handler: &js_sys::Function,
    target: &Element,
    state: &StateMap,
) -> Option<StateMap> {
    let state = match state.serialize(&serde_wasm_bindgen::Serializer::json_compatible()) {
        Ok(state) => state,
        Err(error) => {
            warn!(%error, "state not passed to click handler");
            return None;
        }
    };
    match handler.call2(&JsValue::NULL, &state, target) {
        Ok(out) if out.is_undefined() || out.is_null() => None,
        Ok(out) => match serde_wasm_bindgen::from_value(out) {
            Ok(partial) => Some(partial),
            Err(error) => {
                warn!(%error, "click handler returned an invalid state");
                None
            }
        },
        Err(error) => {
            warn!(error = ?error, "click handler threw");
            None
        }
    }
}
