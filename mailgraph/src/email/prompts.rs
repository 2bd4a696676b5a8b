//! Prompt text for each generation call of the email workflow.

use super::state::{EmailState, Memory};

fn instruction_list(memories: &[Memory]) -> String {
    if memories.is_empty() {
        return "(none)".to_string();
    }
    memories
        .iter()
        .map(|m| format!("- {}", m.instruction))
        .collect::<Vec<_>>()
        .join("\n")
}

fn bullet_list(items: &[String]) -> String {
    items
        .iter()
        .map(|s| format!("- {}", s))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn categorize(state: &EmailState, categories: &[String]) -> String {
    format!(
        "You categorize email exchanges between a user and a prospect. The user sent a message \
and the prospect replied. Pick the most fitting category from the list, or propose a new one.

Rules:
- If the reply is not in English, the category is 'Non English' (create it if missing).
- If the reply is HTML/CSS markup apart from a signature, the category is 'System Generated' \
(create it if missing).
- Judge by the reply; the sent message is context only.
- If nothing in the list captures the exchange well, propose a new category. Be more willing \
to do so while the list has fewer than 9 entries.
- When several fit, pick the most relevant one.

Reply message:
{reply}

Existing categories:
{categories}

Sent message (context only):
{sent}
",
        reply = state.reply_text,
        categories = categories.join(", "),
        sent = state.sent_text,
    )
}

pub fn collect_scenarios(state: &EmailState, scenarios: &[String]) -> String {
    format!(
        "You map an email reply to known scenarios. Select only the scenarios from the list that \
directly and clearly occur in the prospect's reply. Selecting none is fine; return an empty list \
when nothing clearly applies. Check each selection against the reply again before answering.

Reply message:
{reply}

Known scenarios:
{scenarios}

Sent message (context only):
{sent}
",
        reply = state.reply_text,
        scenarios = bullet_list(scenarios),
        sent = state.sent_text,
    )
}

pub fn validate_scenarios(state: &EmailState, scenarios: &[String]) -> String {
    format!(
        "You critically review scenarios matched to an email reply. Keep a scenario only if it is \
clearly required to answer the prospect's reply; drop anything not evident in the email. Return \
an empty list if none qualify.

Reply message:
{reply}

Matched scenarios:
{scenarios}

Sent message (context only):
{sent}
",
        reply = state.reply_text,
        scenarios = bullet_list(scenarios),
        sent = state.sent_text,
    )
}

pub fn count_responses(state: &EmailState) -> String {
    format!(
        "You decide how many emails to send in answer to a prospect's reply.

Relevant instructions (highest priority):
{instructions}

Guidelines:
- The default is 3: a direct response and two follow-ups.
- Follow the relevant instructions above first.
- The number must be between 1 and 4.
- Use fewer for simple replies; use 4 only when extended follow-up is clearly needed.

Reply message:
{reply}

Sent message (context only):
{sent}
",
        instructions = instruction_list(&state.selected_memories),
        reply = state.reply_text,
        sent = state.sent_text,
    )
}

pub fn first_response(state: &EmailState) -> String {
    format!(
        "Write the user's answer to the prospect's reply below.

Reply message from the prospect:
{reply}

Message the user originally sent (context only):
{sent}

Email category: {category}

Relevant instructions (highest priority):
{instructions}

Guidelines:
- Be clear, concise and professional.
- Address the reply directly; skip long greetings and preambles.
- End with the signature of the user who sent the original email.
",
        reply = state.reply_text,
        sent = state.sent_text,
        category = state.category,
        instructions = instruction_list(&state.selected_memories),
    )
}

pub fn review_first_response(state: &EmailState) -> String {
    format!(
        "Check a drafted answer to a prospect's reply. It is valid when it answers the reply, \
follows every relevant instruction and keeps a professional tone. When it is not valid, \
provide a corrected version.

Reply message from the prospect:
{reply}

Drafted answer:
{draft}

Relevant instructions (highest priority):
{instructions}
",
        reply = state.reply_text,
        draft = state.first_response,
        instructions = instruction_list(&state.validator_memory),
    )
}

pub fn follow_up(state: &EmailState, number: usize) -> String {
    let earlier = if state.follow_ups.is_empty() {
        "(none)".to_string()
    } else {
        bullet_list(&state.follow_ups)
    };
    format!(
        "Write follow-up email number {number} of {total} for a prospect who has not answered yet. \
Keep it short, do not repeat earlier emails, and add one new reason to reply.

Prospect's last reply:
{reply}

First response already sent:
{first}

Earlier follow-ups:
{earlier}
",
        number = number,
        total = state.response_count.saturating_sub(1),
        reply = state.reply_text,
        first = state.first_response,
        earlier = earlier,
    )
}
