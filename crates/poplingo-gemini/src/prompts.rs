use poplingo_types::{ChatMessage, LanguagePair};
use serde_json::json;

use crate::markup::{HIGHLIGHT_CLOSE, HIGHLIGHT_OPEN, strip_markup};
use crate::wire::{Content, GenerateContentRequest, GenerationConfig, SpeechConfig};
use crate::ChatContext;

pub fn definition_request(term: &str, languages: &LanguagePair) -> GenerateContentRequest {
    let LanguagePair { native, target } = languages;
    let prompt = format!(
        r#"Define the term "{term}" (a {target} word or phrase) for a native {native} speaker.

1. Give a natural definition written in {native}. No markdown (no ** or *).
2. Give the IPA transcription of the term.
3. Give 3 example sentences in {target}, each with a {native} translation.
   Every example MUST contain "{term}" itself or an inflected form of it (plural, conjugation).
   Wrap exactly that occurrence, and nothing else, in {HIGHLIGHT_OPEN}{HIGHLIGHT_CLOSE} tags,
   e.g. for "run": "I love to {HIGHLIGHT_OPEN}run{HIGHLIGHT_CLOSE} in the morning."
4. Write a short usage note in {native}: lively and casual, slang allowed where it fits.
   Cover tone, cultural nuance or common mistakes. No greetings, no textbook voice, no markdown."#
    );

    GenerateContentRequest {
        contents: vec![Content::user(prompt)],
        system_instruction: None,
        generation_config: Some(GenerationConfig {
            response_mime_type: Some("application/json".to_string()),
            response_schema: Some(definition_schema()),
            ..Default::default()
        }),
    }
}

/// Response schema enforced on the provider side
pub fn definition_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "definition": { "type": "STRING" },
            "phonetic": { "type": "STRING" },
            "examples": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "original": { "type": "STRING" },
                        "translation": { "type": "STRING" }
                    },
                    "required": ["original", "translation"]
                }
            },
            "usageNote": { "type": "STRING" }
        },
        "required": ["definition", "examples", "usageNote", "phonetic"]
    })
}

pub fn image_request(term: &str) -> GenerateContentRequest {
    GenerateContentRequest::prompt(format!(
        r#"Create a bold, vibrant 3D illustration that explains the concept "{term}".

Audience: teenagers learning a language.
Style: polished 3D render in the look of modern animation or sticker art, saturated colours
(neon blue, hot pink, bright yellow), dynamic composition.
The picture must be a direct visual metaphor for the meaning of "{term}", not abstract art.
Background: plain, soft colour so the subject stands out."#
    ))
}

/// Markup is stripped here so highlight tags are never pronounced
pub fn speech_request(text: &str, voice: &str) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content::bare(strip_markup(text))],
        system_instruction: None,
        generation_config: Some(GenerationConfig {
            response_modalities: Some(vec!["AUDIO".to_string()]),
            speech_config: Some(SpeechConfig::prebuilt(voice)),
            ..Default::default()
        }),
    }
}

pub fn story_request(terms: &[String], languages: &LanguagePair) -> GenerateContentRequest {
    let LanguagePair { native, target } = languages;
    let words = terms.join(", ");

    GenerateContentRequest::prompt(format!(
        r#"Write a short, funny, coherent story in {target} that uses these words: [{words}].
After every sentence add its {native} translation in parentheses.
Keep the language simple so the words are easy to memorise. Plain text, no markdown."#
    ))
}

pub fn tutor_instruction(context: &ChatContext) -> String {
    let ChatContext {
        term,
        definition,
        usage_note,
        languages,
    } = context;

    format!(
        r#"You are "Pop", an upbeat and friendly language tutor for teenagers.
Tone: relaxed, encouraging, a little slangy but always accurate. Emojis welcome.

Topic: the {target} word "{term}".
Definition: {definition}
Usage note: {usage_note}

Answer the student's questions about grammar, usage or nuance of this word.
Reply in {native} unless asked otherwise. Keep answers short.
Use Markdown: **bold** for key terms, "- " lists when explaining several points."#,
        target = languages.target,
        native = languages.native,
    )
}

/// The whole conversation is replayed on every call; only the last
/// `history_limit` turns of `history` are sent.
pub fn chat_request(
    context: &ChatContext,
    history: &[ChatMessage],
    message: &str,
    history_limit: usize,
) -> GenerateContentRequest {
    let start = history.len().saturating_sub(history_limit);

    let mut contents: Vec<Content> = history[start..]
        .iter()
        .map(|m| Content::with_role(m.role.as_str(), m.text.clone()))
        .collect();
    contents.push(Content::user(message));

    GenerateContentRequest {
        contents,
        system_instruction: Some(Content::bare(tutor_instruction(context))),
        generation_config: None,
    }
}
