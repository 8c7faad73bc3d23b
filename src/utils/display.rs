use crate::agents::{Composition, CompositionPattern};
use colored::*;

pub fn print_header(text: &str) {
    println!("\n{}", text.bright_cyan().bold());
    println!("{}", "=".repeat(text.len()).bright_cyan());
}

pub fn print_success(text: &str) {
    println!("{}", text.green());
}

pub fn print_error(text: &str) {
    eprintln!("{}", text.red().bold());
}

pub fn print_info(text: &str) {
    println!("{}", text.blue());
}

/// One line describing which agents produced a composition.
pub fn composition_summary(composition: &Composition) -> String {
    let agents: Vec<&str> = composition.agents.iter().map(|a| a.as_str()).collect();
    match (&composition.pattern, &composition.reason) {
        (CompositionPattern::Branching, Some(reason)) => {
            format!("{} -> {} ({})", composition.pattern, agents.join(", "), reason)
        }
        _ => format!("{} -> {}", composition.pattern, agents.join(" + ")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::AgentKind;

    #[test]
    fn test_composition_summary() {
        let branching = Composition {
            content: String::new(),
            pattern: CompositionPattern::Branching,
            agents: vec![AgentKind::Creative],
            reason: Some("story request".to_string()),
        };
        assert_eq!(
            composition_summary(&branching),
            "branching -> creative (story request)"
        );

        let parallel = Composition {
            content: String::new(),
            pattern: CompositionPattern::Parallel,
            agents: vec![AgentKind::Researcher, AgentKind::Creative],
            reason: None,
        };
        assert_eq!(
            composition_summary(&parallel),
            "parallel -> researcher + creative"
        );
    }
}
