use poplingo_types::{Definition, ExampleSentence};
use serde::Deserialize;

use crate::markup::highlight_count;
use crate::GatewayError;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DefinitionPayload {
    definition: String,
    #[serde(default)]
    phonetic: Option<String>,
    examples: Vec<ExamplePayload>,
    usage_note: String,
}

#[derive(Deserialize)]
struct ExamplePayload {
    original: String,
    translation: String,
}

/// Parse the schema-shaped JSON document returned for a definition request.
///
/// There is no partial fallback: anything malformed is an error.
pub fn parse_definition(text: &str) -> Result<Definition, GatewayError> {
    let payload: DefinitionPayload = serde_json::from_str(text.trim())?;

    let phonetic = payload
        .phonetic
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty());

    let examples = payload
        .examples
        .into_iter()
        .map(|e| ExampleSentence::new(e.original, e.translation))
        .collect();

    Ok(Definition {
        definition: payload.definition,
        phonetic,
        examples,
        usage_note: payload.usage_note,
    })
}

/// Indices of examples that do not carry exactly one highlighted span
pub fn unhighlighted_examples(definition: &Definition) -> Vec<usize> {
    definition
        .examples
        .iter()
        .enumerate()
        .filter(|(_, e)| highlight_count(&e.original) != 1)
        .map(|(i, _)| i)
        .collect()
}
