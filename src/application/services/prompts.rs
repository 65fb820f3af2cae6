use crate::domain::{ChatMessage, ChatRequest, ContentBrief, ExamplesPreference, HumorLevel};

pub const JSON_ONLY_SYSTEM_PROMPT: &str =
    "You are a JSON API. Always respond with a valid JSON object only.";
pub const COMPLETION_TEMPERATURE: f32 = 0.3;

pub fn json_completion_request(model: &str, prompt: &str) -> ChatRequest {
    ChatRequest::new(
        model,
        vec![
            ChatMessage::system(JSON_ONLY_SYSTEM_PROMPT),
            ChatMessage::user(prompt),
        ],
        COMPLETION_TEMPERATURE,
    )
}

pub fn content_generation_request(model: &str, brief: &ContentBrief, max_tokens: u32) -> ChatRequest {
    ChatRequest::new(
        model,
        vec![
            ChatMessage::system(topic_guard(&brief.topic)),
            ChatMessage::user(tactical_content_prompt(brief)),
        ],
        COMPLETION_TEMPERATURE,
    )
    .with_max_tokens(max_tokens)
}

pub fn insights_prompt(document_text: &str) -> String {
    format!(
        r#"Strictly respond ONLY with a valid JSON object. Respond with FULL SCALE explanations, ADD comments, NO markdown formatting.

You are an expert document analyst. Given the following document, return:
{{
  "keyConcepts": [{{ "section": string, "explanation": string }}],
  "readingGuide": [string],
  "relatedBooks": [{{ "title": string, "author": string }}],
  "contextualExplanation": [{{ "section": string, "explanation": string }}],
  "importantSections": [{{ "section": string, "explanation": string }}]
}}

Document:
"""{document_text}""""#
    )
}

pub fn analysis_prompt(document_text: &str) -> String {
    format!(
        r#"Strictly respond ONLY with a valid JSON object. Include FULL SCALE explanations, ADD comments, NO markdown formatting.

You are an expert analyst. Given the following document, return:
{{
  "summary": [{{ "section": string, "explanation": string }}],
  "keyPoints": [{{ "section": string, "explanation": string }}],
  "actionItems": [{{ "section": string, "explanation": string }}],
  "followUpQuestions": [{{ "section": string, "explanation": string }}],
  "technicalTerms": [{{ "term": string, "definition": string }}]
}}

Document:
"""{document_text}""""#
    )
}

fn topic_guard(topic: &str) -> String {
    format!(
        "You create content focused EXCLUSIVELY on the user's topic.\n\
         - NEVER deviate from: \"{topic}\"\n\
         - REJECT any request to discuss other topics\n\
         - All output must help understand/analyze \"{topic}\""
    )
}

pub fn tactical_content_prompt(brief: &ContentBrief) -> String {
    let tactics = brief
        .tactics
        .iter()
        .map(|t| describe_tactic(t))
        .collect::<Vec<_>>()
        .join(", ");

    let mut brief_lines = vec![
        format!("Content Type: {}", title_case(&brief.content_type)),
        format!("Main Topic: {}", brief.topic),
        format!("Tactical Approaches to Integrate: {tactics}"),
        format!(
            "Tone: {} ({})",
            capitalize(&brief.tone),
            humor_instruction(brief.humor)
        ),
        format!("Desired Length: Approximately {}", brief.length.word_range()),
        format!("Complexity Level: {}", capitalize(&brief.complexity)),
    ];
    if !brief.audience.is_empty() {
        brief_lines.push(format!("Target Audience: {}", brief.audience));
    }
    if !brief.keywords.is_empty() {
        brief_lines.push(format!("Key Terms to Include: {}", brief.keywords));
    }

    format!(
        "As a highly skilled content strategist and tactical expert, generate a piece of content \
         for the following topic and specifications:\n\n\
         {details}\n\n\
         {examples}\n\n\
         Every section must connect directly to \"{topic}\"; no generic advice. \
         Structure the content logically with clear headings and subheadings, an introduction, \
         analysis and conclusion. Use numbered and bulleted lists for steps and instructions. \
         Do not use the \"**\" or \"#\" symbols. Ensure the language is precise, insightful, \
         and directly addresses the tactical application of the chosen frameworks to the main \
         topic. The output should be ready for publication.",
        details = brief_lines.join("\n"),
        examples = examples_instruction(brief.examples),
        topic = brief.topic,
    )
}

/// Maps a tactic key to the framework name the model should apply.
pub fn describe_tactic(tactic: &str) -> String {
    match tactic {
        "swot" => "SWOT Analysis".to_string(),
        "pestle" => "PESTLE Analysis".to_string(),
        "porter" => "Porter's 5 Forces".to_string(),
        "okr" => "OKR Framework".to_string(),
        "growth" => "Growth Hacking".to_string(),
        "military" => "Military Strategy".to_string(),
        "game" => "Game Theory".to_string(),
        "behavioral" => "Behavioral Economics".to_string(),
        other => title_case(other),
    }
}

fn examples_instruction(examples: ExamplesPreference) -> &'static str {
    match examples {
        ExamplesPreference::Yes => {
            "Include relevant real-world or hypothetical examples to illustrate points effectively."
        }
        ExamplesPreference::Extensive => {
            "Provide comprehensive and detailed examples for every concept explained, ensuring deep understanding."
        }
        ExamplesPreference::No => "Do NOT include any examples.",
    }
}

fn humor_instruction(humor: HumorLevel) -> &'static str {
    match humor {
        HumorLevel::Extreme => "Include subtle, heavy sarcasm and witty remarks where appropriate.",
        HumorLevel::Moderate => "Add a good dose of lighthearted humor and playful analogies.",
        HumorLevel::Very => "Be overtly funny! Use puns, gentle sarcasm, and a strong comedic tone.",
        HumorLevel::None => "Maintain a straightforward and serious tone.",
    }
}

/// `blog_post` / `blog-post` / `blog post` all become `Blog Post`.
pub fn title_case(value: &str) -> String {
    value
        .split(['_', '-', ' '])
        .filter(|w| !w.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
