//! Blocking HTTP backend for the chain endpoints.
//!
//! Every request carries the CSRF token header. A mutation endpoint answers
//! `{"success": bool, "error"?: string}`; `success: false` becomes
//! `BackendError::Rejected`.

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;
use url::Url;

use super::backend::{ChainBackend, ChainScope, ChooseOriginRequest};
use crate::error::BackendError;
use crate::model::{DocumentId, TreeData};
use crate::parsers::{JsonPayloadParser, Parser};

/// Where the chain endpoints live. Path templates may use `{tis_id}`,
/// `{imovel_id}`, `{documento_id}` and `{codigo}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    pub base_url: String,
    pub csrf_token: Option<String>,
    pub csrf_header: String,
    pub timeout_secs: u64,
    pub tree_data: String,
    pub escolher_origem: String,
    pub ajustar_nivel: String,
    pub cadeia_atualizada: String,
    pub criar_documento: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/".to_string(),
            csrf_token: None,
            csrf_header: "X-CSRFToken".to_string(),
            timeout_secs: 30,
            tree_data: "dominial/tis/{tis_id}/imovel/{imovel_id}/tree-data/".to_string(),
            escolher_origem: "dominial/escolher-origem/".to_string(),
            ajustar_nivel: "dominial/documento/{documento_id}/ajustar-nivel/".to_string(),
            cadeia_atualizada: "dominial/tis/{tis_id}/imovel/{imovel_id}/cadeia-atualizada/"
                .to_string(),
            criar_documento: "dominial/criar-documento/{codigo}/".to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct MutationReply {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    error: Option<String>,
}

impl MutationReply {
    /// An explicit `success` flag decides; without one, an `error` field
    /// means the change was refused.
    fn into_result(self) -> Result<(), BackendError> {
        let applied = self.success.unwrap_or(self.error.is_none());
        if applied {
            Ok(())
        } else {
            Err(BackendError::Rejected(
                self.error.unwrap_or_else(|| "erro desconhecido".to_string()),
            ))
        }
    }
}

pub struct HttpBackend {
    client: Client,
    base: Url,
    endpoints: EndpointConfig,
}

impl HttpBackend {
    pub fn new(endpoints: EndpointConfig) -> Result<Self, BackendError> {
        let base = Url::parse(&endpoints.base_url)
            .map_err(|e| BackendError::Transport(format!("invalid base url: {e}")))?;
        let client = Client::builder()
            .timeout(Duration::from_secs(endpoints.timeout_secs))
            .build()
            .map_err(|e| BackendError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            base,
            endpoints,
        })
    }

    /// Append `template` to the base path, one segment at a time. Variables
    /// are substituted inside their segment and percent-encoded as path data,
    /// so a `/` or space in a value stays inside that segment.
    fn url(&self, template: &str, vars: &[(&str, String)]) -> Result<Url, BackendError> {
        let mut url = self.base.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|()| {
                BackendError::Transport(format!("base url {} cannot carry a path", self.base))
            })?;
            segments.pop_if_empty();
            for raw in template.split('/').filter(|s| !s.is_empty()) {
                let mut segment = raw.to_string();
                for (name, value) in vars {
                    segment = segment.replace(&format!("{{{name}}}"), value);
                }
                segments.push(&segment);
            }
            if template.ends_with('/') {
                segments.push("");
            }
        }
        Ok(url)
    }

    fn with_token(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.endpoints.csrf_token {
            Some(token) => request.header(self.endpoints.csrf_header.as_str(), token),
            None => request,
        }
    }

    fn execute(&self, request: RequestBuilder) -> Result<String, BackendError> {
        let response = self
            .with_token(request)
            .send()
            .map_err(|e| BackendError::Transport(e.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .map_err(|e| BackendError::Transport(e.to_string()))?;
        if !status.is_success() {
            return Err(BackendError::Status {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }
        Ok(body)
    }

    fn fetch_chain(&self, template: &str, scope: &ChainScope) -> Result<TreeData, BackendError> {
        let url = self.url(
            template,
            &[
                ("tis_id", scope.tis_id.to_string()),
                ("imovel_id", scope.imovel_id.to_string()),
            ],
        )?;
        debug!(url = %url, "fetching chain");
        let body = self.execute(self.client.get(url))?;
        JsonPayloadParser
            .parse(&body)
            .map_err(|e| BackendError::Decode(e.to_string()))
    }

    fn mutation(&self, request: RequestBuilder) -> Result<(), BackendError> {
        let body = self.execute(request)?;
        if body.trim().is_empty() {
            return Ok(());
        }
        let reply: MutationReply =
            serde_json::from_str(&body).map_err(|e| BackendError::Decode(e.to_string()))?;
        reply.into_result()
    }
}

impl ChainBackend for HttpBackend {
    fn tree_data(&self, scope: &ChainScope) -> Result<TreeData, BackendError> {
        self.fetch_chain(&self.endpoints.tree_data, scope)
    }

    fn choose_origin(&self, request: &ChooseOriginRequest) -> Result<(), BackendError> {
        let url = self.url(&self.endpoints.escolher_origem, &[])?;
        self.mutation(self.client.post(url).json(request))
    }

    fn set_manual_level(
        &self,
        document: DocumentId,
        nivel_manual: Option<u32>,
    ) -> Result<(), BackendError> {
        let url = self.url(
            &self.endpoints.ajustar_nivel,
            &[("documento_id", document.to_string())],
        )?;
        self.mutation(
            self.client
                .post(url)
                .json(&json!({ "nivel_manual": nivel_manual })),
        )
    }

    fn create_document(&self, codigo: &str) -> Result<(), BackendError> {
        let url = self.url(
            &self.endpoints.criar_documento,
            &[("codigo", codigo.to_string())],
        )?;
        self.mutation(self.client.get(url))
    }

    fn refreshed_chain(&self, scope: &ChainScope) -> Result<TreeData, BackendError> {
        self.fetch_chain(&self.endpoints.cadeia_atualizada, scope)
    }
}
