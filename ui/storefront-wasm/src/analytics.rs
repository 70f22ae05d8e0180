//! Google tag (`gtag.js`) sink.

use rrd_analytics::{AnalyticsEvent, AnalyticsSink};
use serde::Serialize;
use tracing::{debug, warn};
use wasm_bindgen::{JsCast, JsValue};

pub struct GtagSink {
    measurement_id: String,
}

impl GtagSink {
    pub fn new(measurement_id: impl Into<String>) -> Self {
        Self {
            measurement_id: measurement_id.into(),
        }
    }

    fn gtag() -> Option<js_sys::Function> {
        let window = web_sys::window()?;
        js_sys::Reflect::get(&window, &JsValue::from_str("gtag"))
            .ok()?
            .dyn_into::<js_sys::Function>()
            .ok()
    }
}

impl AnalyticsSink for GtagSink {
    fn track(&self, event: &AnalyticsEvent) {
        let Some(gtag) = Self::gtag() else {
            debug!("gtag not loaded, dropping {}", event.name());
            return;
        };

        let call = event.to_gtag(&self.measurement_id);
        let params = match call
            .params
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        {
            Ok(params) => params,
            Err(err) => {
                warn!("could not encode {} params: {}", event.name(), err);
                return;
            }
        };

        if let Err(err) = gtag.call3(
            &JsValue::NULL,
            &JsValue::from_str(call.command.as_str()),
            &JsValue::from_str(&call.target),
            &params,
        ) {
            warn!("gtag call for {} failed: {:?}", event.name(), err);
        }
    }
}
