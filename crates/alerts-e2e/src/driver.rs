//! Page driver abstraction.
//!
//! The page surface talks to a browser only through [`PageDriver`], so the
//! CDP implementation can be swapped for [`MockDriver`] in unit tests.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::locator::Selector;
use crate::result::{E2eError, E2eResult};

/// Abstract driver for a single browser page
#[async_trait]
pub trait PageDriver: Send + Sync {
    /// Navigate to an absolute URL and wait for the load event
    async fn navigate(&self, url: &str) -> E2eResult<()>;

    /// Current page URL
    async fn current_url(&self) -> E2eResult<String>;

    /// Evaluate a JavaScript expression and return its JSON value
    async fn evaluate(&self, script: &str) -> E2eResult<serde_json::Value>;

    /// Click the first element matching `selector`
    async fn click(&self, selector: &Selector) -> E2eResult<()>;

    /// Focus the first element matching `selector` and type `text`
    async fn type_text(&self, selector: &Selector, text: &str) -> E2eResult<()>;

    /// Clear the value of the first input matching `selector`
    async fn clear(&self, selector: &Selector) -> E2eResult<()>;

    /// Close the page
    async fn close(&self) -> E2eResult<()>;
}

/// Gesture scripts shared by real drivers.
///
/// Each script evaluates to `true` when the element was found.
pub mod scripts {
    use crate::locator::Selector;

    /// Scroll into view and click
    #[must_use]
    pub fn click(selector: &Selector) -> String {
        format!(
            "((el) => {{ if (!el) return false; el.scrollIntoView({{block: 'center'}}); el.click(); return true; }})({})",
            selector.to_query()
        )
    }

    /// Focus, placing the caret at the end of the current value
    #[must_use]
    pub fn focus(selector: &Selector) -> String {
        format!(
            "((el) => {{ if (!el) return false; el.focus(); if (typeof el.value === 'string') {{ el.setSelectionRange(el.value.length, el.value.length); }} return true; }})({})",
            selector.to_query()
        )
    }

    /// Clear through the native value setter so controlled inputs observe it
    #[must_use]
    pub fn clear(selector: &Selector) -> String {
        format!(
            "((el) => {{ if (!el) return false; \
             const proto = el instanceof HTMLTextAreaElement ? HTMLTextAreaElement.prototype : HTMLInputElement.prototype; \
             Object.getOwnPropertyDescriptor(proto, 'value').set.call(el, ''); \
             el.dispatchEvent(new Event('input', {{bubbles: true}})); return true; }})({})",
            selector.to_query()
        )
    }

    /// Whether a script result reports the element as found
    #[must_use]
    pub fn found(value: &serde_json::Value) -> bool {
        value.as_bool().unwrap_or(false)
    }
}

#[derive(Debug, Default)]
struct MockState {
    url: String,
    results: VecDeque<serde_json::Value>,
    missing: Vec<String>,
    history: Vec<String>,
}

/// Mock driver for unit testing
#[derive(Debug, Default)]
pub struct MockDriver {
    state: Mutex<MockState>,
}

impl MockDriver {
    /// Create new mock driver
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queue the result of the next `evaluate` call
    pub fn push_result(&self, result: serde_json::Value) {
        self.state().results.push_back(result);
    }

    /// Make gestures on `selector` fail with `ElementNotFound`
    pub fn set_missing(&self, selector: &Selector) {
        self.state().missing.push(selector.to_string());
    }

    /// Get call history
    #[must_use]
    pub fn history(&self) -> Vec<String> {
        self.state().history.clone()
    }

    /// Check if method was called
    #[must_use]
    pub fn was_called(&self, method: &str) -> bool {
        self.state().history.iter().any(|c| c.starts_with(method))
    }

    fn gesture(&self, call: String, selector: &Selector) -> E2eResult<()> {
        let mut state = self.state();
        state.history.push(call);
        let rendered = selector.to_string();
        if state.missing.contains(&rendered) {
            return Err(E2eError::ElementNotFound { selector: rendered });
        }
        Ok(())
    }
}

#[async_trait]
impl PageDriver for MockDriver {
    async fn navigate(&self, url: &str) -> E2eResult<()> {
        let mut state = self.state();
        state.history.push(format!("navigate:{url}"));
        state.url = url.to_string();
        Ok(())
    }

    async fn current_url(&self) -> E2eResult<String> {
        Ok(self.state().url.clone())
    }

    async fn evaluate(&self, script: &str) -> E2eResult<serde_json::Value> {
        let mut state = self.state();
        state.history.push(format!("evaluate:{script}"));
        state
            .results
            .pop_front()
            .ok_or_else(|| E2eError::EvaluationError {
                message: "No mock result queued".to_string(),
            })
    }

    async fn click(&self, selector: &Selector) -> E2eResult<()> {
        self.gesture(format!("click:{selector}"), selector)
    }

    async fn type_text(&self, selector: &Selector, text: &str) -> E2eResult<()> {
        self.gesture(format!("type:{selector}:{text}"), selector)
    }

    async fn clear(&self, selector: &Selector) -> E2eResult<()> {
        self.gesture(format!("clear:{selector}"), selector)
    }

    async fn close(&self) -> E2eResult<()> {
        self.state().history.push("close".to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locator::selectors;
    use serde_json::json;

    mod mock_driver_tests {
        use super::*;

        #[tokio::test]
        async fn test_records_history() {
            let driver = MockDriver::new();
            driver.navigate("http://localhost/alerts").await.unwrap();
            driver.click(&selectors::page_fab()).await.unwrap();
            assert_eq!(
                driver.current_url().await.unwrap(),
                "http://localhost/alerts"
            );
            assert!(driver.was_called("navigate:"));
            assert_eq!(driver.history()[1], "click:button[data-cy=page-fab]");
        }

        #[tokio::test]
        async fn test_results_are_consumed_in_order() {
            let driver = MockDriver::new();
            driver.push_result(json!(1));
            driver.push_result(json!("two"));
            assert_eq!(driver.evaluate("a").await.unwrap(), json!(1));
            assert_eq!(driver.evaluate("b").await.unwrap(), json!("two"));
            assert!(driver.evaluate("c").await.is_err());
        }

        #[tokio::test]
        async fn test_missing_element() {
            let driver = MockDriver::new();
            driver.set_missing(&selectors::load_more_logs());
            let err = driver.click(&selectors::load_more_logs()).await.unwrap_err();
            assert!(matches!(err, E2eError::ElementNotFound { .. }));
        }
    }

    mod scripts_tests {
        use super::*;

        #[test]
        fn test_click_script_guards_missing_element() {
            let script = scripts::click(&selectors::select_all());
            assert!(script.contains("if (!el) return false"));
            assert!(script.contains("el.click()"));
        }

        #[test]
        fn test_clear_uses_native_setter() {
            let script = scripts::clear(&selectors::dialog_field("input[name=serviceSearch]"));
            assert!(script.contains("getOwnPropertyDescriptor"));
            assert!(script.contains("new Event('input'"));
        }

        #[test]
        fn test_found() {
            assert!(scripts::found(&json!(true)));
            assert!(!scripts::found(&json!(false)));
            assert!(!scripts::found(&serde_json::Value::Null));
        }
    }
}
