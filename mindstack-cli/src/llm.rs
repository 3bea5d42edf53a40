use anyhow::{Context, Result, bail};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};

use crate::auth;
use crate::config::Config;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Anthropic,
    OpenAI,
}

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub provider: Provider,
    pub model: String,
    pub temperature: f32,
}

/// Pick the classifier backend from config + stored auth.
///
/// `provider = "auto"` prefers Anthropic when a token is present, then
/// OpenAI. `None` means no credentials at all — callers turn that into a
/// "run mindstack auth ..." message.
pub fn resolve_config(cfg: &Config) -> Result<Option<LlmConfig>> {
    let a = auth::load_auth()?;

    let provider = match cfg.llm.provider.as_str() {
        "anthropic" => Some(Provider::Anthropic),
        "openai" => Some(Provider::OpenAI),
        "auto" => {
            if a.anthropic_token.is_some() {
                Some(Provider::Anthropic)
            } else if a.openai_api_key.is_some() {
                Some(Provider::OpenAI)
            } else {
                None
            }
        }
        other => bail!("unknown llm provider in config.toml: {other}"),
    };

    Ok(provider.map(|provider| {
        let model = if cfg.llm.model.is_empty() {
            match provider {
                Provider::Anthropic => "claude-3-5-haiku-latest".to_string(),
                Provider::OpenAI => "gpt-4o-mini".to_string(),
            }
        } else {
            cfg.llm.model.clone()
        };
        LlmConfig {
            provider,
            model,
            temperature: cfg.llm.temperature,
        }
    }))
}

/// One-shot completion: a system prompt plus a single user message.
///
/// The CLI uses #[tokio::main], so we're often already inside a runtime.
/// Creating a nested runtime and calling block_on will panic, so:
/// - if a runtime is running: block_in_place + Handle::block_on
/// - otherwise: create a runtime and block_on
pub fn complete(config: &LlmConfig, system: &str, user: &str) -> Result<String> {
    if let Ok(handle) = tokio::runtime::Handle::try_current() {
        tokio::task::block_in_place(|| {
            handle.block_on(async { complete_async(config, system, user).await })
        })
    } else {
        let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;
        rt.block_on(async { complete_async(config, system, user).await })
    }
}

async fn complete_async(config: &LlmConfig, system: &str, user: &str) -> Result<String> {
    match config.provider {
        Provider::Anthropic => anthropic_complete(&config.model, system, user).await,
        Provider::OpenAI => openai_complete(config, system, user).await,
    }
}

async fn anthropic_complete(model: &str, system: &str, user: &str) -> Result<String> {
    let a = auth::load_auth()?;
    let token = a.anthropic_token.ok_or_else(|| {
        anyhow::anyhow!("missing anthropic_token; run: mindstack auth paste-anthropic-token")
    })?;

    #[derive(Serialize)]
    struct Msg {
        role: String,
        content: String,
    }

    #[derive(Serialize)]
    struct Req {
        model: String,
        max_tokens: i32,
        system: String,
        messages: Vec<Msg>,
    }

    #[derive(Deserialize)]
    struct Resp {
        content: Vec<ContentBlock>,
    }

    #[derive(Deserialize)]
    struct ContentBlock {
        #[serde(rename = "type")]
        t: String,
        text: Option<String>,
    }

    let body = Req {
        model: model.to_string(),
        max_tokens: 300,
        system: system.to_string(),
        messages: vec![Msg {
            role: "user".to_string(),
            content: user.to_string(),
        }],
    };

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {token}"))?);
    headers.insert("anthropic-version", HeaderValue::from_static("2023-06-01"));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    let client = reqwest::Client::new();
    let resp = client
        .post("https://api.anthropic.com/v1/messages")
        .headers(headers)
        .json(&body)
        .send()
        .await
        .context("anthropic request")?;

    let status = resp.status();
    if !status.is_success() {
        let txt = resp.text().await.unwrap_or_default();
        bail!("anthropic error: {status} {txt}");
    }

    let out: Resp = resp.json().await.context("parse anthropic response")?;
    let mut s = String::new();
    for b in out.content {
        if b.t == "text" {
            if let Some(t) = b.text {
                s.push_str(&t);
            }
        }
    }
    Ok(s.trim().to_string())
}

async fn openai_complete(config: &LlmConfig, system: &str, user: &str) -> Result<String> {
    let a = auth::load_auth()?;
    let key = a.openai_api_key.ok_or_else(|| {
        anyhow::anyhow!("missing openai_api_key; run: mindstack auth paste-openai-api-key")
    })?;

    #[derive(Serialize)]
    struct Msg {
        role: String,
        content: String,
    }

    #[derive(Serialize)]
    struct Req {
        model: String,
        messages: Vec<Msg>,
        temperature: f32,
    }

    #[derive(Deserialize)]
    struct Resp {
        choices: Vec<Choice>,
    }

    #[derive(Deserialize)]
    struct Choice {
        message: MsgOut,
    }

    #[derive(Deserialize)]
    struct MsgOut {
        content: Option<String>,
    }

    let body = Req {
        model: config.model.clone(),
        messages: vec![
            Msg {
                role: "system".to_string(),
                content: system.to_string(),
            },
            Msg {
                role: "user".to_string(),
                content: user.to_string(),
            },
        ],
        temperature: config.temperature,
    };

    let client = reqwest::Client::new();
    let resp = client
        .post("https://api.openai.com/v1/chat/completions")
        .header(AUTHORIZATION, format!("Bearer {key}"))
        .json(&body)
        .send()
        .await
        .context("openai request")?;

    let status = resp.status();
    if !status.is_success() {
        let txt = resp.text().await.unwrap_or_default();
        bail!("openai error: {status} {txt}");
    }

    let out: Resp = resp.json().await.context("parse openai response")?;
    let content = out
        .choices
        .first()
        .and_then(|c| c.message.content.clone())
        .unwrap_or_default();

    Ok(content.trim().to_string())
}
