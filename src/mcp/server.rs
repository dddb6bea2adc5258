//! MCP server exposing the cut-list engine as tools.
//!
//! A session moves through three phases. `initialize` is answered with the
//! tool capability, `notifications/initialized` opens the tools, and the loop
//! ends on EOF or a termination signal. A tool that fails returns an
//! `isError` result; JSON-RPC errors are reserved for protocol faults.
//!
//! # Tools
//!
//! - `compute_cut_list`: pieces, hardware, diagnostics and cost as JSON or CSV
//! - `validate_cabinet`: diagnostics only
//! - `export_cut_list`: writes a CSV cut sheet inside the allowed paths
//! - `get_catalog`: the materials and hardware catalog in use

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::engine::{compute_cut_list, CabinetSpec, Catalog, CutList};
use crate::export;
use crate::mcp::protocol::{
    Incoming, Request, RequestId, Response, RpcError, MCP_PROTOCOL_VERSION, SERVER_NAME,
};
use crate::mcp::transport::StdioTransport;

/// Where a session stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing received yet; only `initialize` and `ping` are accepted.
    Fresh,
    /// `initialize` answered, waiting for `notifications/initialized`.
    Handshake,
    /// Tools may be listed and called.
    Ready,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InitializeParams {
    protocol_version: String,
    #[serde(default)]
    client_info: Option<ClientInfo>,
}

#[derive(Debug, Deserialize)]
struct ClientInfo {
    name: String,
}

/// A tool definition for tools/list response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    /// Unique tool name.
    pub name: String,
    /// Human-readable description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// JSON Schema for the tool's input parameters.
    pub input_schema: Value,
}

/// Parameters for tools/call request.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolCallParams {
    /// Name of the tool to call.
    pub name: String,
    /// Arguments for the tool.
    #[serde(default)]
    pub arguments: Value,
}

/// Content item in a tool call response.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ToolContent {
    /// Text content.
    Text {
        /// The text content.
        text: String,
    },
}

#[allow(clippy::trivially_copy_pass_by_ref)] // serde's skip_serializing_if requires a predicate fn(&T) -> bool
const fn is_false(b: &bool) -> bool {
    !*b
}

/// Result of a tool call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCallResult {
    /// Content returned by the tool.
    pub content: Vec<ToolContent>,
    /// Whether the tool call resulted in an error.
    #[serde(skip_serializing_if = "is_false")]
    pub is_error: bool,
}

impl ToolCallResult {
    /// Creates a successful text result.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text { text: text.into() }],
            is_error: false,
        }
    }

    /// Creates an error text result.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text {
                text: message.into(),
            }],
            is_error: true,
        }
    }

    /// Creates a pretty-printed JSON result.
    fn json(value: &Value, is_error: bool) -> Self {
        let text = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
        if is_error {
            Self::error(text)
        } else {
            Self::text(text)
        }
    }
}

/// Output format of `compute_cut_list`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Json,
    Csv,
}

/// Resolves when the process is asked to stop, naming the signal.
#[cfg(unix)]
async fn termination() -> std::io::Result<&'static str> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut terminate = signal(SignalKind::terminate())?;
    Ok(tokio::select! {
        _ = interrupt.recv() => "SIGINT",
        _ = terminate.recv() => "SIGTERM",
    })
}

/// Resolves when the process is asked to stop, naming the signal.
#[cfg(windows)]
async fn termination() -> std::io::Result<&'static str> {
    tokio::signal::ctrl_c().await?;
    Ok("Ctrl+C")
}

/// The MCP server for cabinet cut-lists.
pub struct McpServer {
    phase: Phase,
    transport: StdioTransport,
    /// Directories cut sheets may be written into. Empty means unrestricted.
    allowed_paths: Vec<PathBuf>,
    catalog: Catalog,
    /// Default margin multiplier for quoted prices.
    margin: f64,
}

impl McpServer {
    /// Creates a server that has not yet seen `initialize`.
    #[must_use]
    pub fn new(allowed_paths: Vec<PathBuf>, catalog: Catalog, margin: f64) -> Self {
        Self {
            phase: Phase::Fresh,
            transport: StdioTransport::new(),
            allowed_paths,
            catalog,
            margin,
        }
    }

    /// Current session phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Checks that an export target lies inside an allowed directory.
    fn validate_path(&self, filepath: &str) -> Result<(), String> {
        if self.allowed_paths.is_empty() {
            return Ok(());
        }

        let path = Path::new(filepath);

        // The export target usually does not exist yet; resolve its parent instead
        let target = if path.exists() {
            path.canonicalize()
                .map_err(|e| format!("Failed to resolve path '{}': {e}", path.display()))?
        } else {
            let parent = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let filename = path.file_name().ok_or_else(|| {
                format!("Invalid path '{}': no filename specified", path.display())
            })?;
            let parent = parent.canonicalize().map_err(|e| {
                format!(
                    "Parent directory '{}' does not exist or is inaccessible: {e}",
                    parent.display()
                )
            })?;
            parent.join(filename)
        };

        let inside = self
            .allowed_paths
            .iter()
            .filter_map(|allowed| allowed.canonicalize().ok())
            .any(|allowed| target.starts_with(allowed));
        if inside {
            Ok(())
        } else {
            Err("Access denied: path is outside the configured allowed directories".to_string())
        }
    }

    /// Serves requests from stdin until EOF or a termination signal.
    ///
    /// # Errors
    ///
    /// Returns an error if stdio fails or signal handlers cannot be installed.
    pub async fn run(&mut self) -> std::io::Result<()> {
        let stop = termination();
        tokio::pin!(stop);

        loop {
            let line = tokio::select! {
                signal = &mut stop => {
                    tracing::info!(signal = signal?, "Stopping");
                    return Ok(());
                }
                line = self.transport.read_line() => line?,
            };
            let Some(line) = line else {
                tracing::info!("stdin closed");
                return Ok(());
            };
            if let Some(answer) = self.handle_line(&line) {
                self.transport.reply(&answer).await?;
            }
        }
    }

    /// Processes one input line. `None` means nothing is sent back: blank
    /// lines and notifications.
    fn handle_line(&mut self, line: &str) -> Option<Result<Response, RpcError>> {
        if line.trim().is_empty() {
            return None;
        }
        let message = match Incoming::parse(line) {
            Ok(message) => message,
            Err(error) => {
                tracing::debug!(code = error.code(), "Rejected malformed message");
                return Some(Err(error));
            }
        };
        tracing::debug!(method = message.method(), "Received message");
        match message {
            Incoming::Request(req) => Some(self.dispatch(&req)),
            Incoming::Notification(note) => {
                self.on_notification(&note.method);
                None
            }
        }
    }

    fn dispatch(&mut self, req: &Request) -> Result<Response, RpcError> {
        let result = match req.method.as_str() {
            "initialize" => self.initialize(req)?,
            "ping" => json!({}),
            "tools/list" => {
                self.ensure_ready(&req.id)?;
                json!({ "tools": Self::get_tool_definitions() })
            }
            "tools/call" => {
                self.ensure_ready(&req.id)?;
                let params: ToolCallParams = req.params_as("tool call")?;
                serde_json::to_value(self.call_tool(&params)).map_err(|e| {
                    tracing::error!(error = %e, "Failed to serialise tool call result");
                    RpcError::internal(req.id.clone(), "Internal error: failed to serialise result")
                })?
            }
            other => return Err(RpcError::method_not_found(req.id.clone(), other)),
        };
        Ok(Response::new(req.id.clone(), result))
    }

    fn on_notification(&mut self, method: &str) {
        if method == "notifications/initialized" && self.phase == Phase::Handshake {
            tracing::info!("Client initialised, tools available");
            self.phase = Phase::Ready;
        }
    }

    fn initialize(&mut self, req: &Request) -> Result<Value, RpcError> {
        if self.phase != Phase::Fresh {
            return Err(RpcError::invalid_request(
                Some(req.id.clone()),
                "Server already initialised",
            ));
        }
        let params: InitializeParams = req.params_as("initialize")?;
        tracing::info!(
            client = params.client_info.as_ref().map_or("unknown", |c| c.name.as_str()),
            requested_version = %params.protocol_version,
            "Initialising"
        );
        self.phase = Phase::Handshake;

        Ok(json!({
            "protocolVersion": MCP_PROTOCOL_VERSION,
            "capabilities": { "tools": {} },
            "serverInfo": { "name": SERVER_NAME, "version": env!("CARGO_PKG_VERSION") },
        }))
    }

    fn ensure_ready(&self, id: &RequestId) -> Result<(), RpcError> {
        if self.phase == Phase::Ready {
            Ok(())
        } else {
            Err(RpcError::invalid_request(Some(id.clone()), "Server not initialised"))
        }
    }

    /// Runs one tool.
    fn call_tool(&self, params: &ToolCallParams) -> ToolCallResult {
        tracing::debug!(tool = %params.name, "Tool call");
        match params.name.as_str() {
            "compute_cut_list" => self.call_compute_cut_list(&params.arguments),
            "validate_cabinet" => self.call_validate_cabinet(&params.arguments),
            "export_cut_list" => self.call_export_cut_list(&params.arguments),
            "get_catalog" => self.call_get_catalog(),
            _ => ToolCallResult::error(format!("Unknown tool: {}", params.name)),
        }
    }

    /// Returns the list of available tools.
    #[allow(clippy::too_many_lines)]
    fn get_tool_definitions() -> Vec<ToolDefinition> {
        let cabinet = Self::cabinet_schema();
        vec![
            ToolDefinition {
                name: "compute_cut_list".to_string(),
                description: Some(
                    "Decompose a cabinet layout into its cut-list (every panel with length, \
                     width, grain, material and banded edges), hardware shopping list, \
                     feasibility diagnostics and a cost estimate. All dimensions are in \
                     millimetres. An unbuildable layout still returns a result: check \
                     is_valid and the diagnostics."
                        .to_string(),
                ),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "cabinet": cabinet,
                        "format": {
                            "type": "string",
                            "enum": ["json", "csv"],
                            "description": "Output format: 'json' for the full result (default), 'csv' for a cut sheet"
                        },
                        "margin": {
                            "type": "number",
                            "description": "Optional: margin multiplier for the quoted price (default from config)"
                        }
                    },
                    "required": ["cabinet"]
                }),
            },
            ToolDefinition {
                name: "validate_cabinet".to_string(),
                description: Some(
                    "Check whether a cabinet layout can be built. Returns is_valid and the \
                     diagnostics (errors, warnings, info) without the cut-list."
                        .to_string(),
                ),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "cabinet": cabinet
                    },
                    "required": ["cabinet"]
                }),
            },
            ToolDefinition {
                name: "export_cut_list".to_string(),
                description: Some(
                    "Compute the cut-list of a cabinet and write it as a CSV cut sheet \
                     (pieces, hardware, sheets and totals). Refused when the layout has \
                     blocking errors or the path is outside the allowed directories."
                        .to_string(),
                ),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "cabinet": cabinet,
                        "filepath": {
                            "type": "string",
                            "description": "Path of the .csv file to write"
                        }
                    },
                    "required": ["cabinet", "filepath"]
                }),
            },
            ToolDefinition {
                name: "get_catalog".to_string(),
                description: Some(
                    "Return the materials and hardware catalog in use: slide clearances, \
                     hinge and hardware prices, sheet sizes and prices, waste factors, and \
                     the default margin multiplier."
                        .to_string(),
                ),
                input_schema: json!({
                    "type": "object",
                    "properties": {}
                }),
            },
        ]
    }

    /// JSON schema of a cabinet layout.
    fn cabinet_schema() -> Value {
        let component = json!({
            "type": "object",
            "description": "Slot content, tagged by 'kind': empty | drawer_bank {count, side_height?} | \
                door {leaves: 1|2, hinge_side: left|right, opening: hinged|flip_up|flip_down, \
                mount: overlay|inset, height?, interior?} | shelf_bank {count} | hanging_rod | \
                cube_grid {rows, cols}",
            "properties": {
                "kind": {
                    "type": "string",
                    "enum": ["empty", "drawer_bank", "door", "shelf_bank", "hanging_rod", "cube_grid"]
                }
            },
            "required": ["kind"]
        });

        json!({
            "type": "object",
            "description": "Cabinet layout; all dimensions in mm",
            "properties": {
                "width": { "type": "number" },
                "height": { "type": "number", "description": "Overall height including plinth" },
                "depth": { "type": "number" },
                "plinth_height": { "type": "number", "description": "Default 0" },
                "panel_thickness": { "type": "number", "enum": [15, 18, 25] },
                "back_thickness": { "type": "number", "enum": [3, 5.5, 18] },
                "front_grain": { "type": "string", "enum": ["horizontal", "vertical"] },
                "hinge_style": { "type": "string", "enum": ["codo_0", "codo_9", "codo_18"] },
                "slide_type": { "type": "string", "enum": ["telescopic", "undermount", "roller"] },
                "sliding_door_kit": { "type": "boolean" },
                "columns": {
                    "type": "array",
                    "description": "Columns left to right",
                    "items": {
                        "type": "object",
                        "properties": {
                            "mode": { "type": "string", "enum": ["whole", "split"] },
                            "slot": component,
                            "lower_height": { "type": "number" },
                            "lower": component,
                            "upper": component
                        },
                        "required": ["mode"]
                    }
                }
            },
            "required": ["width", "height", "depth", "columns"]
        })
    }

    /// Extracts and parses the `cabinet` argument.
    fn parse_cabinet(arguments: &Value) -> Result<CabinetSpec, ToolCallResult> {
        let Some(cabinet) = arguments.get("cabinet") else {
            return Err(ToolCallResult::error("Missing required parameter: cabinet"));
        };
        CabinetSpec::deserialize(cabinet)
            .map_err(|e| ToolCallResult::error(format!("Invalid cabinet layout: {e}")))
    }

    /// Serialises a cut list into a JSON value.
    fn cut_list_value(cut_list: &CutList) -> Result<Value, ToolCallResult> {
        serde_json::to_value(cut_list).map_err(|e| {
            tracing::error!(error = %e, "Failed to serialise cut list");
            ToolCallResult::error("Internal error: failed to serialise cut list")
        })
    }

    fn call_compute_cut_list(&self, arguments: &Value) -> ToolCallResult {
        let spec = match Self::parse_cabinet(arguments) {
            Ok(spec) => spec,
            Err(result) => return result,
        };

        let format = match arguments.get("format").and_then(Value::as_str) {
            None => OutputFormat::Json,
            Some(f) if f.eq_ignore_ascii_case("json") => OutputFormat::Json,
            Some(f) if f.eq_ignore_ascii_case("csv") => OutputFormat::Csv,
            Some(_) => return ToolCallResult::error("Invalid format. Expected 'json' or 'csv'."),
        };

        let margin = match arguments.get("margin") {
            None => self.margin,
            Some(value) => match value.as_f64() {
                Some(m) if m.is_finite() && m > 0.0 => m,
                _ => return ToolCallResult::error("Invalid margin. Expected a number above 0."),
            },
        };

        let cut_list = compute_cut_list(&spec, &self.catalog);

        if format == OutputFormat::Csv {
            return match export::to_csv(&cut_list, margin) {
                Ok(csv) => ToolCallResult::text(csv),
                Err(e) => ToolCallResult::json(
                    &json!({
                        "status": "error",
                        "error": e.to_string(),
                        "diagnostics": cut_list.diagnostics,
                    }),
                    true,
                ),
            };
        }

        let value = match Self::cut_list_value(&cut_list) {
            Ok(value) => value,
            Err(result) => return result,
        };
        ToolCallResult::json(
            &json!({
                "status": if cut_list.is_valid { "success" } else { "invalid" },
                "cut_list": value,
                "margin": margin,
                "quoted_price": cut_list.quoted_price(margin),
            }),
            false,
        )
    }

    fn call_validate_cabinet(&self, arguments: &Value) -> ToolCallResult {
        let spec = match Self::parse_cabinet(arguments) {
            Ok(spec) => spec,
            Err(result) => return result,
        };

        let cut_list = compute_cut_list(&spec, &self.catalog);
        let errors = cut_list.errors().count();
        ToolCallResult::json(
            &json!({
                "is_valid": cut_list.is_valid,
                "error_count": errors,
                "diagnostics": cut_list.diagnostics,
            }),
            false,
        )
    }

    fn call_export_cut_list(&self, arguments: &Value) -> ToolCallResult {
        let Some(filepath) = arguments.get("filepath").and_then(Value::as_str) else {
            return ToolCallResult::error("Missing required parameter: filepath");
        };

        if let Err(e) = self.validate_path(filepath) {
            return ToolCallResult::error(e);
        }

        let spec = match Self::parse_cabinet(arguments) {
            Ok(spec) => spec,
            Err(result) => return result,
        };

        let cut_list = compute_cut_list(&spec, &self.catalog);
        match export::write_csv_file(&cut_list, self.margin, Path::new(filepath)) {
            Ok(()) => ToolCallResult::json(
                &json!({
                    "status": "success",
                    "filepath": filepath,
                    "piece_lines": cut_list.pieces.len(),
                    "piece_count": cut_list.piece_count(),
                    "cost_estimate": cut_list.cost_estimate,
                    "quoted_price": cut_list.quoted_price(self.margin),
                }),
                false,
            ),
            Err(e) => ToolCallResult::json(
                &json!({
                    "status": "error",
                    "filepath": filepath,
                    "error": e.to_string(),
                    "diagnostics": cut_list.diagnostics,
                }),
                true,
            ),
        }
    }

    fn call_get_catalog(&self) -> ToolCallResult {
        match serde_json::to_value(&self.catalog) {
            Ok(catalog) => ToolCallResult::json(
                &json!({
                    "catalog": catalog,
                    "margin_multiplier": self.margin,
                }),
                false,
            ),
            Err(e) => ToolCallResult::error(format!("Failed to serialise catalog: {e}")),
        }
    }
}
