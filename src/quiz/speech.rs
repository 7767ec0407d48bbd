use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use log::{debug, error};
use reqwest::Client;
use teloxide::prelude::*;
use teloxide::types::{ChatAction, InputFile};
use thiserror::Error;

const SPEECH_URL: &str = "https://api.openai.com/v1/audio/speech";
// Telegram plays Opus-in-Ogg as a voice note
const SPEECH_FORMAT: &str = "opus";

#[derive(Error, Debug)]
pub enum SpeechError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("speech server error: {status} - {message}")]
    Server { status: u16, message: String },
    #[error("no audio data received")]
    EmptyAudio,
}

#[derive(serde::Serialize)]
struct SpeechRequest<'a> {
    model: &'a str,
    input: &'a str,
    voice: &'a str,
    response_format: &'a str,
}

/// Chats that currently have a pronunciation being generated or sent.
#[derive(Debug, Default)]
pub struct PlaybackSlots {
    active: Mutex<HashSet<ChatId>>,
}

/// Holds the playback slot of one chat until dropped.
pub struct PlaybackGuard<'a> {
    slots: &'a PlaybackSlots,
    chat_id: ChatId,
}

impl PlaybackSlots {
    /// Returns `None` if the chat already has a playback in flight.
    pub fn try_acquire(&self, chat_id: ChatId) -> Option<PlaybackGuard<'_>> {
        let mut active = self.active.lock().unwrap_or_else(PoisonError::into_inner);
        if !active.insert(chat_id) {
            return None;
        }
        Some(PlaybackGuard {
            slots: self,
            chat_id,
        })
    }
}

impl Drop for PlaybackGuard<'_> {
    fn drop(&mut self) {
        self.slots
            .active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.chat_id);
    }
}

/// Reads Spanish text aloud by sending a synthesized voice message.
pub struct Pronouncer {
    client: Client,
    api_key: String,
    model: String,
    voice: String,
    slots: PlaybackSlots,
}

impl Pronouncer {
    pub fn new(api_key: String, model: String, voice: String) -> Result<Self, SpeechError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            api_key,
            model,
            voice,
            slots: PlaybackSlots::default(),
        })
    }

    /// Synthesizes `text` and sends it to the chat as a voice message.
    ///
    /// Never fails: errors are logged and the audio is skipped. A request made
    /// while the chat's previous one is still running is ignored.
    pub async fn pronounce(&self, bot: &Bot, chat_id: ChatId, text: &str) {
        let Some(_guard) = self.slots.try_acquire(chat_id) else {
            debug!("Ignoring pronunciation of {:?}, chat {} is busy", text, chat_id);
            return;
        };

        // We don't care if this fails, the voice message follows anyway
        let _ = bot.send_chat_action(chat_id, ChatAction::RecordVoice).await;

        let audio = match self.synthesize(text).await {
            Ok(audio) => audio,
            Err(err) => {
                error!("TTS error for {:?}: {}", text, err);
                return;
            }
        };

        let voice = InputFile::memory(audio).file_name("pronunciation.ogg");
        if let Err(err) = bot.send_voice(chat_id, voice).await {
            error!("Failed to send pronunciation to chat {}: {}", chat_id, err);
        }
    }

    pub async fn synthesize(&self, text: &str) -> Result<Vec<u8>, SpeechError> {
        let request = SpeechRequest {
            model: &self.model,
            input: text,
            voice: &self.voice,
            response_format: SPEECH_FORMAT,
        };

        let response = self
            .client
            .post(SPEECH_URL)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SpeechError::Server {
                status: status.as_u16(),
                message,
            });
        }

        let audio = response.bytes().await?;
        if audio.is_empty() {
            return Err(SpeechError::EmptyAudio);
        }
        Ok(audio.to_vec())
    }
}
