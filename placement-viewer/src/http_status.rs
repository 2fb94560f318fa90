use crate::viewer::{lock, SharedState};
use log::{debug, info};
use serde_json::json;
use std::net::Ipv4Addr;

/// Serves the viewer's current state on localhost. Runs on its own thread
/// since tiny_http blocks.
pub fn spawn_http_status(
    port: u16,
    state: SharedState,
) -> anyhow::Result<std::thread::JoinHandle<()>> {
    let server = tiny_http::Server::http((Ipv4Addr::LOCALHOST, port))
        .map_err(|e| anyhow::anyhow!("could not bind the status endpoint on port {}: {}", port, e))?;
    info!("Status endpoint listening on http://127.0.0.1:{}/", port);
    Ok(std::thread::spawn(move || {
        for request in server.incoming_requests() {
            let (status, body) = route(request.url(), &state);
            let mut response = tiny_http::Response::from_string(body).with_status_code(status);
            if let Ok(header) =
                tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..])
            {
                response = response.with_header(header);
            }
            if let Err(e) = request.respond(response) {
                debug!("Status response failed: {}", e);
            }
        }
    }))
}

pub fn route(url: &str, state: &SharedState) -> (u16, String) {
    let path = url.split('?').next().unwrap_or("");
    let body = {
        let state = lock(state);
        match path {
            "/check" => Ok(json!("ok")),
            "/scene" => serde_json::to_value(state.scene.to_nodes()),
            "/transforms" => serde_json::to_value(&state.transforms),
            "/status" => Ok(json!({ "editor": state.editor })),
            _ => return (404, json!({ "error": "not found" }).to_string()),
        }
    };
    match body {
        Ok(body) => (200, body.to_string()),
        Err(e) => (500, json!({ "error": e.to_string() }).to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewer::ViewerState;
    use shared::SceneTransforms;
    use std::sync::{Arc, Mutex};

    fn state() -> SharedState {
        Arc::new(Mutex::new(ViewerState::new(SceneTransforms::default())))
    }

    #[test]
    fn known_routes_answer_json() {
        let state = state();
        assert_eq!(route("/check", &state), (200, "\"ok\"".to_string()));

        let (status, body) = route("/status?cache=1", &state);
        assert_eq!(status, 200);
        assert_eq!(body, r#"{"editor":"disconnected"}"#);

        let (status, body) = route("/transforms", &state);
        assert_eq!(status, 200);
        let transforms: SceneTransforms = serde_json::from_str(&body).unwrap();
        assert_eq!(transforms, SceneTransforms::default());

        let (status, body) = route("/scene", &state);
        assert_eq!(status, 200);
        let nodes: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(nodes.as_array().map(|nodes| nodes.len()), Some(5));
    }

    #[test]
    fn unknown_routes_are_404() {
        assert_eq!(route("/admin", &state()).0, 404);
    }
}
