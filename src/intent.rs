use std::fmt;

use crate::config::prompt::PromptConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Greeting,
    Information,
    Recommendation,
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Intent::Greeting => "GREETING",
            Intent::Information => "INFORMATION",
            Intent::Recommendation => "RECOMMENDATION",
        };
        write!(f, "{}", name)
    }
}

/// Keyword-based intent detection.
///
/// Both keyword checks always run; a short greeting wins over an
/// information keyword found in the same query.
pub fn classify(config: &PromptConfig, query: &str) -> Intent {
    let folded = query.to_lowercase();
    let contains_any = |keywords: &[String]| keywords.iter().any(|k| folded.contains(k.as_str()));

    let word_count = query.split_whitespace().count();
    let is_greeting =
        contains_any(&config.keywords.greeting) && word_count <= config.greeting_max_words;
    let is_information = contains_any(&config.keywords.information);

    if is_greeting {
        Intent::Greeting
    } else if is_information {
        Intent::Information
    } else {
        Intent::Recommendation
    }
}
