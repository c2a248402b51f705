use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::engine::core::app_state::SessionRequest;
use crate::tools::interaction::{InteractionEngine, InteractionSignal, Placement};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsValue;

#[cfg(target_arch = "wasm32")]
use web_sys::{MessageEvent, window};

/// JSON-RPC 2.0 request structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 response structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcResponse {
    pub jsonrpc: String,
    pub result: Option<serde_json::Value>,
    pub error: Option<RpcError>,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 notification structure for one-way communication.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcNotification {
    pub jsonrpc: String,
    pub method: String,
    pub params: serde_json::Value,
}

/// JSON-RPC error object.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    pub data: Option<serde_json::Value>,
}

/// Outgoing queue drained to the parent window at the end of each frame.
#[derive(Resource, Default)]
pub struct WebRpcInterface {
    outgoing_notifications: Vec<RpcNotification>,
    outgoing_responses: Vec<RpcResponse>,
}

impl WebRpcInterface {
    /// Send notification to the embedding page without expecting a response.
    pub fn send_notification(&mut self, method: &str, params: serde_json::Value) {
        self.outgoing_notifications.push(RpcNotification {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
        });
    }

    fn queue_response(&mut self, response: RpcResponse) {
        self.outgoing_responses.push(response);
    }
}

/// Plugin wiring the postMessage bridge to the interaction engine.
pub struct WebRpcPlugin;

impl Plugin for WebRpcPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WebRpcInterface>()
            .add_event::<IncomingRpcMessage>()
            .add_systems(
                Update,
                (
                    process_incoming_messages,
                    handle_rpc_messages,
                    notify_interaction_signals,
                    send_outgoing_messages,
                )
                    .chain(),
            );

        #[cfg(target_arch = "wasm32")]
        app.add_systems(Startup, setup_message_listener);
    }
}

#[cfg(target_arch = "wasm32")]
fn setup_message_listener(mut commands: Commands) {
    use std::sync::Arc;
    use std::sync::Mutex;

    let message_queue: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let queue_clone = message_queue.clone();

    let closure = Closure::wrap(Box::new(move |event: MessageEvent| {
        if let Ok(data) = event.data().dyn_into::<js_sys::JsString>() {
            let message_str: String = data.into();

            if message_str.contains("jsonrpc") {
                if let Ok(mut queue) = queue_clone.lock() {
                    queue.push(message_str);
                }
            }
        }
    }) as Box<dyn FnMut(MessageEvent)>);

    let Some(window) = window() else {
        error!("Window object not available, RPC bridge disabled");
        return;
    };
    if let Err(e) =
        window.add_event_listener_with_callback("message", closure.as_ref().unchecked_ref())
    {
        error!("Failed to register message listener: {:?}", e);
        return;
    }

    // Listener must outlive this system; ownership moves to JS.
    closure.forget();
    commands.insert_resource(MessageQueue(message_queue));
}

#[derive(Resource)]
struct MessageQueue(std::sync::Arc<std::sync::Mutex<Vec<String>>>);

/// Raw JSON text received from the parent window.
#[derive(Event)]
pub struct IncomingRpcMessage {
    pub content: String,
}

fn process_incoming_messages(
    message_queue: Option<Res<MessageQueue>>,
    mut message_events: EventWriter<IncomingRpcMessage>,
) {
    let Some(queue_res) = message_queue else {
        return;
    };

    let messages = if let Ok(mut queue) = queue_res.0.lock() {
        std::mem::take(&mut *queue)
    } else {
        Vec::new()
    };

    for message_str in messages {
        message_events.write(IncomingRpcMessage {
            content: message_str,
        });
    }
}

fn handle_rpc_messages(
    mut events: EventReader<IncomingRpcMessage>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut engine: ResMut<InteractionEngine>,
    mut session_events: EventWriter<SessionRequest>,
) {
    for event in events.read() {
        let request = match serde_json::from_str::<RpcRequest>(&event.content) {
            Ok(request) => request,
            Err(parse_error) => {
                warn!("Dropping malformed RPC message: {}", parse_error);
                continue;
            }
        };
        debug!("RPC request: {}", request.method);

        let mut session_requests = Vec::new();
        if let Some(response) = handle_rpc_request(&request, &mut engine, &mut session_requests) {
            rpc_interface.queue_response(response);
        }
        session_events.write_batch(session_requests);
    }
}

/// Handle one request against the engine.
///
/// Session transitions are returned through `session_requests` rather than applied
/// here, so they go through the same state handling as keyboard and tap requests.
pub fn handle_rpc_request(
    request: &RpcRequest,
    engine: &mut InteractionEngine,
    session_requests: &mut Vec<SessionRequest>,
) -> Option<RpcResponse> {
    // Notifications carry no ID and get no response, but are still executed.
    let id = request.id.clone();

    let result = if request.jsonrpc != "2.0" {
        Err(RpcError::invalid_request("Expected jsonrpc \"2.0\""))
    } else {
        match request.method.as_str() {
            "start_session" => {
                session_requests.push(SessionRequest::Start);
                Ok(serde_json::json!({ "success": true }))
            }
            "end_session" => {
                session_requests.push(SessionRequest::End);
                Ok(serde_json::json!({ "success": true }))
            }
            "set_auto_place" => handle_set_auto_place(&request.params, engine),
            "get_placement" => Ok(serde_json::json!({
                "placement": engine.placement().map(placement_json),
            })),
            "get_tracking" => Ok(serde_json::json!({
                "tracking": engine.is_tracking(),
                "reticle_visible": engine.reticle_visible(),
            })),
            "get_config" => serde_json::to_value(engine.config())
                .map_err(|e| RpcError::internal_error(&e.to_string())),
            _ => {
                warn!("Unknown RPC method: {}", request.method);
                Err(RpcError {
                    code: RpcError::METHOD_NOT_FOUND,
                    message: "Method not found".to_string(),
                    data: Some(serde_json::json!({ "method": request.method })),
                })
            }
        }
    };

    let id = id?;
    Some(match result {
        Ok(result_value) => RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: Some(result_value),
            error: None,
            id: Some(id),
        },
        Err(error) => RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(error),
            id: Some(id),
        },
    })
}

fn handle_set_auto_place(
    params: &serde_json::Value,
    engine: &mut InteractionEngine,
) -> Result<serde_json::Value, RpcError> {
    #[derive(Deserialize)]
    struct AutoPlaceParams {
        enabled: bool,
    }

    let parsed = serde_json::from_value::<AutoPlaceParams>(params.clone())
        .map_err(|_| RpcError::invalid_params("Expected boolean 'enabled' parameter"))?;

    engine.set_auto_place(parsed.enabled);
    info!("Auto-place set to {}", parsed.enabled);

    Ok(serde_json::json!({
        "success": true,
        "auto_place": parsed.enabled
    }))
}

fn placement_json(placement: &Placement) -> serde_json::Value {
    serde_json::json!({
        "position": placement.position.to_array(),
        "orientation": placement.orientation.to_array(),
        "scale": placement.scale,
        "rotation_y": placement.rotation_y,
    })
}

/// Method name and params pushed to the parent window for an engine signal.
pub fn signal_notification(signal: &InteractionSignal) -> (&'static str, serde_json::Value) {
    match signal {
        InteractionSignal::TrackingChanged(tracking) => (
            "tracking_changed",
            serde_json::json!({ "tracking": tracking }),
        ),
        InteractionSignal::PlacementChanged { placement, cause } => {
            let mut params = placement_json(placement);
            params["cause"] = serde_json::json!(format!("{:?}", cause));
            ("placement_changed", params)
        }
        InteractionSignal::PlacementCleared => ("placement_cleared", serde_json::json!({})),
        InteractionSignal::SessionReset => ("session_ended", serde_json::json!({})),
    }
}

fn notify_interaction_signals(
    mut signals: EventReader<InteractionSignal>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    for signal in signals.read() {
        let (method, params) = signal_notification(signal);
        rpc_interface.send_notification(method, params);
    }
}

fn send_outgoing_messages(mut rpc_interface: ResMut<WebRpcInterface>) {
    for notification in rpc_interface.outgoing_notifications.drain(..) {
        send_message_to_parent(&notification);
    }

    for response in rpc_interface.outgoing_responses.drain(..) {
        send_message_to_parent(&response);
    }
}

fn send_message_to_parent<T: Serialize>(message: &T) {
    #[cfg(target_arch = "wasm32")]
    {
        match serde_json::to_string(message) {
            Ok(json) => {
                if let Some(window) = window() {
                    if let Some(parent) = window.parent().ok().flatten() {
                        if let Err(e) = parent.post_message(&JsValue::from_str(&json), "*") {
                            error!("Failed to send message to parent: {:?}", e);
                        }
                    } else {
                        warn!("No parent window available for message transmission");
                    }
                } else {
                    error!("Window object not available");
                }
            }
            Err(e) => {
                error!("Failed to serialize message: {}", e);
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = message;
    }
}

impl RpcError {
    pub const INVALID_REQUEST: i32 = -32600;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;

    pub fn invalid_request(message: &str) -> Self {
        Self {
            code: Self::INVALID_REQUEST,
            message: message.to_string(),
            data: None,
        }
    }

    pub fn invalid_params(message: &str) -> Self {
        Self {
            code: Self::INVALID_PARAMS,
            message: message.to_string(),
            data: None,
        }
    }

    pub fn internal_error(message: &str) -> Self {
        Self {
            code: Self::INTERNAL_ERROR,
            message: message.to_string(),
            data: None,
        }
    }
}

impl fmt::Display for RpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RPC error {}: {}", self.code, self.message)
    }
}

impl std::error::Error for RpcError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::interaction::{HitSample, InteractionEvent, PlacementCause};

    fn request(method: &str, params: serde_json::Value) -> RpcRequest {
        RpcRequest {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
            id: Some(serde_json::json!(7)),
        }
    }

    fn call(engine: &mut InteractionEngine, req: RpcRequest) -> (RpcResponse, Vec<SessionRequest>) {
        let mut sessions = Vec::new();
        let response = handle_rpc_request(&req, engine, &mut sessions).expect("response");
        (response, sessions)
    }

    #[test]
    fn end_session_is_forwarded_as_a_session_request() {
        let mut engine = InteractionEngine::default();
        let (response, sessions) = call(&mut engine, request("end_session", serde_json::Value::Null));
        assert!(response.error.is_none());
        assert_eq!(sessions, vec![SessionRequest::End]);
    }

    #[test]
    fn set_auto_place_updates_config() {
        let mut engine = InteractionEngine::default();
        let (response, _) = call(
            &mut engine,
            request("set_auto_place", serde_json::json!({ "enabled": true })),
        );
        assert!(response.error.is_none());
        assert!(engine.config().auto_place);
    }

    #[test]
    fn set_auto_place_rejects_bad_params() {
        let mut engine = InteractionEngine::default();
        let (response, _) = call(
            &mut engine,
            request("set_auto_place", serde_json::json!({ "enabled": "yes" })),
        );
        assert_eq!(response.error.map(|e| e.code), Some(RpcError::INVALID_PARAMS));
        assert!(!engine.config().auto_place);
    }

    #[test]
    fn unknown_method_is_reported() {
        let mut engine = InteractionEngine::default();
        let (response, sessions) = call(&mut engine, request("fly", serde_json::Value::Null));
        assert_eq!(response.error.map(|e| e.code), Some(RpcError::METHOD_NOT_FOUND));
        assert!(sessions.is_empty());
    }

    #[test]
    fn wrong_protocol_version_is_an_invalid_request() {
        let mut engine = InteractionEngine::default();
        let mut req = request("get_tracking", serde_json::Value::Null);
        req.jsonrpc = "1.0".to_string();
        let (response, _) = call(&mut engine, req);
        assert_eq!(response.error.map(|e| e.code), Some(RpcError::INVALID_REQUEST));
    }

    #[test]
    fn notifications_run_without_a_response() {
        let mut engine = InteractionEngine::default();
        let mut req = request("end_session", serde_json::Value::Null);
        req.id = None;
        let mut sessions = Vec::new();
        assert!(handle_rpc_request(&req, &mut engine, &mut sessions).is_none());
        assert_eq!(sessions, vec![SessionRequest::End]);
    }

    #[test]
    fn get_placement_reports_the_current_transform() {
        let mut engine = InteractionEngine::default();
        let (response, _) = call(&mut engine, request("get_placement", serde_json::Value::Null));
        assert_eq!(response.result, Some(serde_json::json!({ "placement": null })));

        engine.dispatch(InteractionEvent::HitTest(Some(HitSample::new(
            Vec3::new(1.0, 0.0, -2.0),
            Quat::IDENTITY,
        ))));
        engine.dispatch(InteractionEvent::Select);

        let (response, _) = call(&mut engine, request("get_placement", serde_json::Value::Null));
        let placement = &response.result.expect("result")["placement"];
        assert_eq!(placement["position"], serde_json::json!([1.0, 0.0, -2.0]));
        assert_eq!(placement["rotation_y"], serde_json::json!(0.0));
    }

    #[test]
    fn get_tracking_follows_hit_samples() {
        let mut engine = InteractionEngine::default();
        engine.dispatch(InteractionEvent::HitTest(Some(HitSample::new(
            Vec3::ZERO,
            Quat::IDENTITY,
        ))));
        let (response, _) = call(&mut engine, request("get_tracking", serde_json::Value::Null));
        assert_eq!(
            response.result,
            Some(serde_json::json!({ "tracking": true, "reticle_visible": true }))
        );
    }

    #[test]
    fn signals_map_to_notifications() {
        let (method, params) = signal_notification(&InteractionSignal::TrackingChanged(false));
        assert_eq!(method, "tracking_changed");
        assert_eq!(params, serde_json::json!({ "tracking": false }));

        let placement = Placement {
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            scale: 0.3,
            rotation_y: 0.0,
        };
        let (method, params) = signal_notification(&InteractionSignal::PlacementChanged {
            placement,
            cause: PlacementCause::Tap,
        });
        assert_eq!(method, "placement_changed");
        assert_eq!(params["cause"], serde_json::json!("Tap"));

        let (method, _) = signal_notification(&InteractionSignal::SessionReset);
        assert_eq!(method, "session_ended");
    }
}
