use banter_model::GenerationRequest;
use serde::{Deserialize, Serialize};

/// The fallback text used when a response carries no candidate text.
pub const NO_RESPONSE_FALLBACK: &str = "No response.";

// ------------------------
// Types sent to the server
// ------------------------

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<Part>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
struct Part {
    text: String,
}

// ------------------------------
// Types received from the server
// ------------------------------

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct GenerateContentResponse {
    pub candidates: Option<Vec<Candidate>>,
    #[serde(rename = "promptFeedback")]
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Candidate {
    pub content: Option<CandidateContent>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct CandidateContent {
    pub parts: Option<Vec<CandidatePart>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct CandidatePart {
    pub text: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct PromptFeedback {
    #[serde(rename = "blockReason")]
    pub block_reason: Option<String>,
}

// -----------
// Conversions
// -----------

#[inline]
pub fn create_request(req: &GenerationRequest) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content {
            role: "user",
            parts: vec![Part {
                text: req.prompt.clone(),
            }],
        }],
    }
}

/// Pulls the reply text out of `candidates[0].content.parts[0].text`.
///
/// Any break in that path yields [`NO_RESPONSE_FALLBACK`] instead of an
/// error: an empty reply is still a renderable reply.
#[inline]
pub fn reply_text(resp: GenerateContentResponse) -> String {
    resp.candidates
        .and_then(|candidates| candidates.into_iter().next())
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts)
        .and_then(|parts| parts.into_iter().next())
        .and_then(|part| part.text)
        .unwrap_or_else(|| NO_RESPONSE_FALLBACK.to_owned())
}
