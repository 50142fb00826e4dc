//! Remote text-completion backends.
//!
//! Each backend implements [`CompletionModel`]: send one fully resolved
//! prompt, get the raw completion text back, or a
//! [`ClassifyError::Transport`](crate::error::ClassifyError::Transport) on
//! network, auth, or protocol failure.

pub mod azure;

use async_trait::async_trait;

use crate::error::ClassifyError;

/// Sampling temperature for every classification request. Greedy decoding
/// keeps repeated runs over the same catalog stable.
pub const TEMPERATURE: f32 = 0.0;

#[async_trait]
pub trait CompletionModel: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, ClassifyError>;
}

#[cfg(test)]
pub mod testing {
    use std::sync::Mutex;

    use super::*;

    /// Replies chosen by a closure over the prompt; records every prompt seen.
    pub struct ScriptedModel<F> {
        reply: F,
        pub prompts: Mutex<Vec<String>>,
    }

    impl<F> ScriptedModel<F>
    where
        F: Fn(&str) -> Result<String, ClassifyError> + Send + Sync,
    {
        pub fn new(reply: F) -> Self {
            Self {
                reply,
                prompts: Mutex::new(Vec::new()),
            }
        }

        pub fn calls(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }
    }

    /// A model that always answers with the same text.
    pub fn fixed(
        reply: &str,
    ) -> ScriptedModel<impl Fn(&str) -> Result<String, ClassifyError> + Send + Sync> {
        let reply = reply.to_string();
        ScriptedModel::new(move |_: &str| Ok(reply.clone()))
    }

    #[async_trait]
    impl<F> CompletionModel for ScriptedModel<F>
    where
        F: Fn(&str) -> Result<String, ClassifyError> + Send + Sync,
    {
        async fn complete(&self, prompt: &str) -> Result<String, ClassifyError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            (self.reply)(prompt)
        }
    }
}
