use serde_json::Value;
use tracing::debug;

use super::{ActionDispatcher, ActionOutcome, ElementState, element_locator};
use crate::driver::Locator;
use crate::scripts::{self, Probe};
use crate::snapshot::InteractiveElement;

impl ActionDispatcher<'_> {
    /// Read checked, aria-checked, value and disabled. Read only.
    pub async fn get_element_state(&self, node_id: usize) -> ActionOutcome {
        match self.resolve(node_id) {
            Ok(element) => ActionOutcome::with_state(self.read_state(&element).await),
            Err(e) => ActionOutcome::failed(&e),
        }
    }

    /// Each probe runs on its own so one failing leaves the others intact.
    pub(super) async fn read_state(&self, element: &InteractiveElement) -> ElementState {
        let Some(locator) = element_locator(element) else {
            debug!(node_id = element.node_id, "Element has no name or position, state unknown");
            return ElementState::default();
        };

        ElementState {
            checked: self.probe(Probe::Checked, &locator).await.and_then(|v| v.as_bool()),
            aria_checked: self
                .probe(Probe::AriaChecked, &locator)
                .await
                .and_then(|v| v.as_str().map(str::to_string)),
            value: self
                .probe(Probe::Value, &locator)
                .await
                .and_then(|v| v.as_str().map(str::to_string)),
            disabled: self.probe(Probe::Disabled, &locator).await.and_then(|v| v.as_bool()),
        }
    }

    async fn probe(&self, probe: Probe, locator: &Locator) -> Option<Value> {
        match self.page.evaluate(&scripts::element_probe(probe, locator)).await {
            Ok(Value::Null) => None,
            Ok(value) => Some(value),
            Err(e) => {
                debug!(?probe, "State probe failed: {}", e);
                None
            }
        }
    }
}
