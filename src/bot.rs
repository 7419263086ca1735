//! Transport-facing front end.
//!
//! Turns raw message text into captions with an image attached. A chat
//! transport only needs to supply the sender's username and display name
//! and deliver the returned [`Response`] values in order.

use crate::config::{GuessConfig, Result};
use crate::image::{ImageSource, StaticImage};
use crate::state::{AppState, RegistryStore, Reply, SessionEvent};
use crate::texts::Texts;

/// One outgoing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub caption: String,
    pub image_url: String,
}

pub struct GuessBot {
    state: AppState,
    texts: Texts,
    images: Box<dyn ImageSource>,
}

impl GuessBot {
    pub fn new(state: AppState, texts: Texts, images: Box<dyn ImageSource>) -> Self {
        Self {
            state,
            texts,
            images,
        }
    }

    /// Build from configuration, loading the registry and text catalog.
    pub fn from_config(config: &GuessConfig) -> Result<Self> {
        config.validate()?;

        let texts = match &config.texts_path {
            Some(path) => Texts::load(path)?,
            None => Texts::default(),
        };
        let state = AppState::open(
            RegistryStore::new(config.stats_path.clone()),
            config.rules.clone(),
        );
        let images = Box::new(StaticImage::new(config.fallback_image_url.clone()));

        Ok(Self::new(state, texts, images))
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Handle one incoming message.
    pub fn respond(&mut self, username: &str, display_name: &str, text: &str) -> Vec<Response> {
        let event = SessionEvent::parse(text, self.texts.vocabulary());
        let replies = self.state.handle(username, event);
        replies
            .iter()
            .map(|reply| self.render(reply, display_name))
            .collect()
    }

    fn render(&self, reply: &Reply, display_name: &str) -> Response {
        Response {
            caption: self.texts.render(reply, display_name, self.state.rules()),
            image_url: self.images.image_url(),
        }
    }
}
