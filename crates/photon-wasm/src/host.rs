//! `Host` over the browser DOM.

use photon_core::{Host, HostError};
use tracing::warn;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Document, Element, HtmlElement, HtmlImageElement, HtmlInputElement, HtmlSelectElement,
    HtmlTextAreaElement, Node,
};

/// The live document of the current window.
#[derive(Debug, Clone)]
pub struct DomHost {
    document: Document,
}

impl DomHost {
    pub fn new() -> Result<Self, HostError> {
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| HostError::Call {
                message: "no document available".to_string(),
            })?;
        Ok(Self { document })
    }

    /// First element matching a CSS selector.
    pub fn select(&self, selector: &str) -> Result<Element, HostError> {
        self.document
            .query_selector(selector)
            .map_err(|e| call_error(&e))?
            .ok_or_else(|| HostError::ElementNotFound {
                selector: selector.to_string(),
            })
    }
}

fn call_error(error: &JsValue) -> HostError {
    HostError::Call {
        message: error.as_string().unwrap_or_else(|| format!("{error:?}")),
    }
}

fn log_failure(operation: &str, result: Result<(), JsValue>) {
    if let Err(error) = result {
        warn!(operation, error = ?error, "DOM call failed");
    }
}

impl Host for DomHost {
    type Node = Element;

    fn query_class(&self, root: &Element, class: &str) -> Vec<Element> {
        let mut found = Vec::new();
        if root.class_list().contains(class) {
            found.push(root.clone());
        }
        let collection = root.get_elements_by_class_name(class);
        found.extend((0..collection.length()).filter_map(|i| collection.item(i)));
        found
    }

    fn contains(&self, ancestor: &Element, node: &Element) -> bool {
        let node: &Node = node.as_ref();
        ancestor.contains(Some(node))
    }

    fn inner_html(&self, node: &Element) -> String {
        node.inner_html()
    }

    fn set_inner_html(&mut self, node: &Element, markup: &str) -> Result<(), HostError> {
        node.set_inner_html(markup);
        Ok(())
    }

    fn attribute(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn set_attribute(&mut self, node: &Element, name: &str, value: &str) {
        log_failure("setAttribute", node.set_attribute(name, value));
    }

    fn remove_attribute(&mut self, node: &Element, name: &str) {
        log_failure("removeAttribute", node.remove_attribute(name));
    }

    fn value(&self, node: &Element) -> Option<String> {
        if let Some(input) = node.dyn_ref::<HtmlInputElement>() {
            Some(input.value())
        } else if let Some(area) = node.dyn_ref::<HtmlTextAreaElement>() {
            Some(area.value())
        } else if let Some(select) = node.dyn_ref::<HtmlSelectElement>() {
            Some(select.value())
        } else {
            node.get_attribute("value")
        }
    }

    fn set_value(&mut self, node: &Element, value: &str) {
        if let Some(input) = node.dyn_ref::<HtmlInputElement>() {
            input.set_value(value);
        } else if let Some(area) = node.dyn_ref::<HtmlTextAreaElement>() {
            area.set_value(value);
        } else if let Some(select) = node.dyn_ref::<HtmlSelectElement>() {
            select.set_value(value);
        } else {
            log_failure("setAttribute", node.set_attribute("value", value));
        }
    }

    fn class_list(&self, node: &Element) -> Vec<String> {
        node.class_name()
            .split_whitespace()
            .map(str::to_string)
            .collect()
    }

    fn set_class_list(&mut self, node: &Element, classes: &[String]) {
        node.set_class_name(&classes.join(" "));
    }

    fn style_property(&self, node: &Element, name: &str) -> Option<String> {
        node.dyn_ref::<HtmlElement>()?
            .style()
            .get_property_value(name)
            .ok()
            .filter(|value| !value.is_empty())
    }

    fn set_style_property(&mut self, node: &Element, name: &str, value: &str) {
        if let Some(element) = node.dyn_ref::<HtmlElement>() {
            log_failure("style.setProperty", element.style().set_property(name, value));
        }
    }

    fn set_source(&mut self, node: &Element, value: &str) {
        match node.dyn_ref::<HtmlImageElement>() {
            Some(image) => image.set_src(value),
            None => log_failure("setAttribute", node.set_attribute("src", value)),
        }
    }
}
