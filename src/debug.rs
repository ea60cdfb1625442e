use crate::VehicleId;
#[cfg(feature = "debug")]
use serde_json::json;

#[cfg(feature = "debug")]
thread_local!(
    static DEBUG_FRAME: std::cell::RefCell<Vec<serde_json::Value>> = Default::default();
);

/// Records that `vehicle` gave way to `other` this frame.
#[allow(unused)]
pub(crate) fn debug_yield(vehicle: VehicleId, other: VehicleId) {
    #[cfg(feature = "debug")]
    DEBUG_FRAME.with(|frame| {
        frame.borrow_mut().push(json!({
            "type": "yield",
            "vehicle": format!("{:?}", vehicle),
            "to": format!("{:?}", other),
        }))
    });
}

#[cfg(feature = "debug")]
pub(crate) fn take_debug_frame() -> serde_json::Value {
    json!(DEBUG_FRAME.with(|frame| frame.take()))
}
