//! JavaScript injection surface for embedders hosting real web content.
//!
//! An embedder evaluates [`BRIDGE_INIT_SCRIPT`] once per page at load time
//! to install the content-side bridge object, and renders each outgoing
//! [`crate::message::Delivery`] with [`js_dispatch`] for evaluation in the
//! page. The wire format posted by the script is exactly the serialized
//! [`crate::message::Envelope`].

/// Installs `window.celadon` into content scope.
///
/// The object is created once per page load; nothing persists across a
/// reload. `ipcSend` maps to a notification, `invoke` to an invocation
/// (returning its correlation token), `on` registers a broadcast callback
/// for a channel.
pub const BRIDGE_INIT_SCRIPT: &str = r#"
(function() {
    if (window.celadon) { return; }
    var seq = 0;
    function post(envelope) {
        window.ipc.postMessage(JSON.stringify(envelope));
    }
    function asPayload(value) {
        return value == null ? "" : String(value);
    }
    window.celadon = {
        ipcSend: function(channel, payload) {
            post({
                kind: "notification",
                channel: channel,
                payload: asPayload(payload)
            });
        },
        invoke: function(channel, payload) {
            var correlation = (seq++).toString(16) + "-" + Math.random().toString(16).slice(2, 10);
            post({
                kind: "invocation",
                channel: channel,
                payload: asPayload(payload),
                replyChannel: channel + ":response",
                correlation: correlation
            });
            return correlation;
        },
        _subscribers: {},
        on: function(channel, callback) {
            (this._subscribers[channel] = this._subscribers[channel] || []).push(callback);
        },
        _dispatch: function(channel, payload) {
            var list = this._subscribers[channel] || [];
            for (var i = 0; i < list.length; i++) {
                list[i](payload);
            }
        }
    };
})();
"#;

/// Render the script delivering one message into the page's dispatch table.
///
/// Channel and payload are JSON-escaped so arbitrary strings cannot break
/// out of the script context.
pub fn js_dispatch(channel: &str, payload: &str) -> String {
    format!(
        "window.celadon._dispatch({}, {});",
        serde_json::to_string(channel).unwrap_or_else(|_| "\"\"".to_string()),
        serde_json::to_string(payload).unwrap_or_else(|_| "\"\"".to_string()),
    )
}
