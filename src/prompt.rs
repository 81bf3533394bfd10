//! Prompt construction for the summarizer.
//!
//! One fixed system prompt, one user message carrying the context. The
//! system prompt pins the exact section structure the validator checks for,
//! and explicitly forbids the model from inventing facts that are not in the
//! context, since summaries land in front of stakeholders unreviewed.

/// Fixed instruction text sent as the system message on every call.
pub const SYSTEM_PROMPT: &str = "\
You are a work item analyst. Extract and present ONLY the factual information \
provided in the context. Do not make assumptions, extrapolate, or add \
interpretations.

OUTPUT FORMAT (produce exactly these sections, in this order):

**EXECUTIVE SUMMARY**
What this work item addresses, based on its title and description only.

**KEY METRICS**
Priority, business value, story points, and state, exactly as given. Write \
\"Not specified\" for anything missing.

**TECHNICAL SOLUTION**
Technical approach extracted from the description and acceptance criteria, \
or \"No technical details provided\".

**RECENT ACTIVITY (LAST 3 MONTHS)**
What happened recently according to the activity listed in the context, or \
\"No recent activity\".

**DEPENDENCIES & RISKS**
Dependencies, blockers, and risks mentioned in the context or implied by the \
related items, or \"No dependencies identified\".

**NEXT ACTIONS**
Specific actions mentioned in the context, or \"No specific actions \
identified\".

STRICT RULES:
1. Use ONLY information explicitly present in the context.
2. Copy field values exactly as they appear.
3. If information is missing, say so instead of guessing.
4. Keep every section heading exactly as written above, in the given order.
5. Keep responses factual and concise.";

/// A fully assembled prompt: fixed system message plus per-item context.
#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

/// Embed a built context into a prompt.
pub fn build(context: &str) -> Prompt {
    Prompt {
        system: SYSTEM_PROMPT.to_string(),
        user: context.to_string(),
    }
}
