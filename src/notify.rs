use std::io::{self, Write};

use anyhow::Result;
use reqwest::blocking::Client;
use serde::Deserialize;

use crate::config::TelegramConfig;
use crate::error::DeliveryError;
use crate::http_client::{body_snippet, http_client};

const TELEGRAM_API: &str = "https://api.telegram.org";

pub trait Notifier {
    fn send(&self, text: &str) -> Result<(), DeliveryError>;
}

/// Sends plain-text messages to one Telegram chat.
pub struct TelegramNotifier {
    client: &'static Client,
    url: String,
    chat_id: String,
}

#[derive(Debug, Deserialize)]
struct TelegramReply {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

impl TelegramNotifier {
    pub fn new(cfg: &TelegramConfig) -> Result<Self> {
        Ok(Self {
            client: http_client()?,
            url: format!("{TELEGRAM_API}/bot{}/sendMessage", cfg.bot_token),
            chat_id: cfg.chat_id.clone(),
        })
    }
}

impl Notifier for TelegramNotifier {
    fn send(&self, text: &str) -> Result<(), DeliveryError> {
        let body = serde_json::json!({
            "chat_id": self.chat_id,
            "text": text,
            "disable_web_page_preview": true,
        });
        let resp = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .map_err(|e| DeliveryError::Transport(e.without_url().to_string()))?;
        let status = resp.status();
        let raw = resp
            .text()
            .map_err(|e| DeliveryError::Transport(e.without_url().to_string()))?;
        if !status.is_success() {
            return Err(DeliveryError::Rejected {
                status: status.as_u16(),
                body: body_snippet(&raw),
            });
        }
        match serde_json::from_str::<TelegramReply>(&raw) {
            Ok(reply) if reply.ok => Ok(()),
            Ok(reply) => Err(DeliveryError::Rejected {
                status: status.as_u16(),
                body: reply.description.unwrap_or_default(),
            }),
            Err(_) => Err(DeliveryError::Rejected {
                status: status.as_u16(),
                body: body_snippet(&raw),
            }),
        }
    }
}

/// Prints messages instead of delivering them.
pub struct StdoutNotifier;

impl Notifier for StdoutNotifier {
    fn send(&self, text: &str) -> Result<(), DeliveryError> {
        let mut out = io::stdout().lock();
        writeln!(out, "{text}\n").map_err(|e| DeliveryError::Transport(e.to_string()))
    }
}
