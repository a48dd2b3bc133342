//! Tolerant extraction of JSON from collaborator responses.
//!
//! The analysis collaborator wraps an LLM, and LLM output frequently
//! arrives as JSON buried in markdown fences or explanatory prose. This
//! module locates the payload before typed parsing: fenced code block
//! first, then the first balanced object or array.

use callsheet_error::{CallsheetResult, JsonError, PipelineError, PipelineErrorKind};

/// Extract JSON from a response that may contain markdown or extra text.
///
/// Strategies, in order:
/// 1. Markdown code blocks: ```json ... ```
/// 2. The first balanced `{...}` or `[...]`, whichever opens earlier
///
/// # Errors
///
/// Returns an error if no JSON-like substring is found.
///
/// # Examples
///
/// ```
/// use callsheet_pipeline::extract_json;
///
/// let response = "Here is the analysis:\n```json\n{\"is_valid\": true}\n```\n";
/// assert!(extract_json(response).unwrap().contains("is_valid"));
/// ```
pub fn extract_json(response: &str) -> CallsheetResult<String> {
    if let Some(json) = extract_from_code_block(response) {
        return Ok(json);
    }

    // Prefer whichever structure opens first in the response.
    let bracket = response.find('[');
    let brace = response.find('{');
    let order: [(char, char); 2] = match (bracket, brace) {
        (Some(b), Some(c)) if b < c => [('[', ']'), ('{', '}')],
        _ => [('{', '}'), ('[', ']')],
    };
    for (open, close) in order {
        if let Some(json) = extract_balanced(response, open, close) {
            return Ok(json);
        }
    }

    tracing::error!(
        response_length = response.len(),
        "No JSON found in collaborator response"
    );
    Err(PipelineError::new(PipelineErrorKind::MalformedResponse(format!(
        "no JSON found in response of length {}",
        response.len()
    )))
    .into())
}

/// Parse a collaborator response into `T`, retrying once through
/// [`extract_json`] when direct parsing fails.
///
/// # Errors
///
/// Returns an error when the response holds no parseable JSON at all;
/// callers treat that the same as an unavailable collaborator.
pub fn parse_tolerant<T>(response: &str) -> CallsheetResult<T>
where
    T: serde::de::DeserializeOwned,
{
    match serde_json::from_str(response) {
        Ok(value) => Ok(value),
        Err(first_error) => {
            let extracted = extract_json(response)?;
            serde_json::from_str(&extracted).map_err(|e| {
                let preview: String = response.chars().take(100).collect();
                tracing::error!(
                    direct_error = %first_error,
                    extracted_error = %e,
                    response_preview = %preview,
                    "Collaborator response failed tolerant parsing"
                );
                JsonError::new(format!("failed to parse extracted JSON: {e}")).into()
            })
        }
    }
}

/// Extract content from a markdown code block, with or without a `json`
/// language tag.
fn extract_from_code_block(response: &str) -> Option<String> {
    let start = response.find("```")?;
    let content_start = start + 3;
    // Skip the language tag line if present.
    let skip_to = response[content_start..]
        .find('\n')
        .map(|n| content_start + n + 1)
        .unwrap_or(content_start);

    match response[skip_to..].find("```") {
        Some(end) => Some(response[skip_to..skip_to + end].trim().to_string()),
        // No closing fence: likely a truncated response, take the rest.
        None => Some(response[skip_to..].trim().to_string()),
    }
}

/// Extract content between balanced delimiters, honoring strings and
/// escapes so braces inside JSON strings do not confuse the depth count.
fn extract_balanced(response: &str, open: char, close: char) -> Option<String> {
    let start = response.find(open)?;
    let mut depth = 0;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, ch) in response[start..].char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }
        match ch {
            '\\' => escape_next = true,
            '"' => in_string = !in_string,
            c if c == open && !in_string => depth += 1,
            c if c == close && !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(response[start..start + i + 1].to_string());
                }
            }
            _ => {}
        }
    }
    None
}
