use chatgpt::prelude::*;
use chatgpt::types::CompletionResponse;
use log::{debug, error, warn};

use crate::quiz::{Subject, Tense};

/// Asks ChatGPT for a short example sentence to go with an answered round.
pub struct QuizHelper {
    chat_gpt: ChatGPT,
}

impl QuizHelper {
    pub fn new(chat_gpt: ChatGPT) -> Self {
        Self { chat_gpt }
    }

    /// Returns `None` when the request fails; the quiz carries on without it.
    pub async fn example_sentence(
        &self,
        infinitive: &str,
        tense: Tense,
        subject: Subject,
    ) -> Option<String> {
        match self.generate_example(infinitive, tense, subject).await {
            Ok(content) if !content.trim().is_empty() => Some(content.trim().to_string()),
            Ok(_) => {
                warn!("ChatGPT returned an empty example for {}", infinitive);
                None
            }
            Err(err) => {
                error!("ChatGPT error while generating example for {}: {}", infinitive, err);
                None
            }
        }
    }

    async fn generate_example(
        &self,
        infinitive: &str,
        tense: Tense,
        subject: Subject,
    ) -> Result<String> {
        debug!("Generating example for {} ({}, {})", infinitive, tense, subject);
        let prompt = example_prompt(infinitive, tense, subject);

        // send_message is one-shot; no conversation history is kept between rounds
        let response: CompletionResponse = self.chat_gpt.send_message(&prompt).await?;
        let content = response.message().clone().content;

        debug!("Completion: {:?}", content);

        Ok(content)
    }
}

fn example_prompt(infinitive: &str, tense: Tense, subject: Subject) -> String {
    format!(
        "Give a very short (max 15 words) Spanish example sentence and its English translation using the verb \"{}\" in the \"{}\" tense conjugated for \"{}\".",
        infinitive, tense, subject
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_names_verb_tense_and_subject() {
        let prompt = example_prompt("hablar", Tense::Preterite, Subject::ElEllaUsted);
        assert!(prompt.contains("\"hablar\""));
        assert!(prompt.contains("\"Preterite\" tense"));
        assert!(prompt.contains("\"Él/Ella/Usted\""));
        assert!(prompt.contains("max 15 words"));
    }
}
