//! Prompt templates for the judged metrics
//!
//! PRIVATE MODULE - Not exported from crate

pub const FAITHFULNESS_STATEMENTS: &str =
    include_str!("../assets/prompts/faithfulness_statements.txt");

pub const FAITHFULNESS_VERDICTS: &str = include_str!("../assets/prompts/faithfulness_verdicts.txt");

pub const ANSWER_RELEVANCY_QUESTION: &str =
    include_str!("../assets/prompts/answer_relevancy_question.txt");

pub const CONTEXT_RECALL: &str = include_str!("../assets/prompts/context_recall.txt");

pub const CONTEXT_PRECISION: &str = include_str!("../assets/prompts/context_precision.txt");

/// Fill `{key}` placeholders in a single pass.
///
/// Substituted values are never rescanned, so sample text containing
/// `{context}` and the like is inserted verbatim.
pub fn format_prompt(template: &str, vars: &[(&str, &str)]) -> String {
    let mut result = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        result.push_str(&rest[..open]);
        let tail = &rest[open..];

        let replacement = vars.iter().find_map(|(key, value)| {
            let placeholder = format!("{{{key}}}");
            tail.starts_with(&placeholder)
                .then_some((placeholder.len(), *value))
        });

        match replacement {
            Some((len, value)) => {
                result.push_str(value);
                rest = &tail[len..];
            }
            None => {
                result.push('{');
                rest = &tail[1..];
            }
        }
    }
    result.push_str(rest);
    result
}

/// Join items into a numbered list, one per line
pub fn numbered_list(items: &[String]) -> String {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{}. {item}", i + 1))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_prompt() {
        let template = "Hello {name}, you are {age} years old.";
        let vars = [("name", "Alice"), ("age", "30")];
        let result = format_prompt(template, &vars);
        assert_eq!(result, "Hello Alice, you are 30 years old.");
    }

    #[test]
    fn test_format_prompt_keeps_json_braces_and_values_verbatim() {
        let template = "{\"verdict\": 1}\nQ: {question}\nC: {context}";
        let vars = [("question", "what is {context}?"), ("context", "ctx")];
        assert_eq!(
            format_prompt(template, &vars),
            "{\"verdict\": 1}\nQ: what is {context}?\nC: ctx"
        );
    }

    #[test]
    fn test_numbered_list() {
        let items = vec!["a".to_string(), "b".to_string()];
        assert_eq!(numbered_list(&items), "1. a\n2. b");
    }

    #[test]
    #[allow(clippy::len_zero)]
    fn test_prompts_load_with_placeholders() {
        assert!(FAITHFULNESS_STATEMENTS.contains("{answer}"));
        assert!(FAITHFULNESS_VERDICTS.contains("{statements}"));
        assert!(ANSWER_RELEVANCY_QUESTION.contains("{answer}"));
        assert!(CONTEXT_RECALL.contains("{reference}"));
        assert!(CONTEXT_PRECISION.len() > 0);
    }
}
