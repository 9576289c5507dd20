// Prompt constants for the LLM-backed recognizer.

/// System prompt for entity/phrase recognition — enforces JSON-only output.
pub const RECOGNIZE_SYSTEM: &str = "You are a precise named-entity and noun-phrase tagger \
    for resumes and job descriptions. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Recognition prompt template. Replace `{text}` before sending.
pub const RECOGNIZE_PROMPT_TEMPLATE: &str = r#"Tag the following text.

Return a JSON object with this EXACT schema (no extra fields):
{
  "entities": [
    {"text": "Amazon Web Services", "label": "organization"}
  ],
  "phrases": [
    "distributed systems"
  ]
}

Rules:
- "label" is one of: "organization", "product", "location", "person", "other".
- Technologies, tools, frameworks and platforms are "product".
- Copy entity text exactly as it appears, preserving case.
- "phrases" lists the noun phrases of the text, each copied verbatim.
- Do NOT invent text that does not appear in the input.

TEXT:
{text}"#;
