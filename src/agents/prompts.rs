// Prompt templates for LLM interactions
//
// All prompt text used by the agents lives here. Templates are versioned
// so a prompt change is visible in logs and reproducible after the fact.

use std::collections::HashMap;

/// A named, versioned prompt template with `{{variable}}` placeholders
pub struct PromptTemplate {
    pub name: &'static str,
    pub version: &'static str,
    pub template: &'static str,
}

impl PromptTemplate {
    /// Render the template, substituting every `{{key}}` placeholder
    pub fn render(&self, variables: &HashMap<&str, &str>) -> String {
        let mut rendered = self.template.to_string();
        for (key, value) in variables {
            rendered = rendered.replace(&format!("{{{{{key}}}}}"), value);
        }
        rendered
    }
}

pub fn parse_requirements() -> PromptTemplate {
    PromptTemplate {
        name: "parse_requirements",
        version: "1.0.0",
        template: "You are a requirements analyst. Parse the following software \
                   requirements and extract:\n\
                   1. Main application purpose\n\
                   2. List of specific features needed\n\
                   3. Any technical constraints\n\n\
                   Requirements:\n\
                   {{requirements}}\n\n\
                   Provide a structured response in this format:\n\
                   PURPOSE: [main purpose]\n\
                   FEATURES:\n\
                   - [feature 1]\n\
                   - [feature 2]\n\
                   ...\n\
                   CONSTRAINTS:\n\
                   - [constraint 1]\n\
                   ...",
    }
}

pub fn generate_code() -> PromptTemplate {
    PromptTemplate {
        name: "generate_code",
        version: "1.0.0",
        template: "You are a software developer. Generate Python code based on \
                   these requirements:\n\n\
                   {{parsed_requirements}}\n\n\
                   Important:\n\
                   - Write complete, runnable Python code\n\
                   - Include all necessary imports\n\
                   - Add comments explaining the code\n\
                   - Make sure every requirement is satisfied\n\
                   - Use simple, clean code structure\n\
                   - Include a main function or example usage at the bottom\n\n\
                   Provide ONLY the Python code, no explanations before or after.",
    }
}

pub fn generate_tests() -> PromptTemplate {
    PromptTemplate {
        name: "generate_tests",
        version: "1.0.0",
        template: "You are a QA engineer. Generate comprehensive test cases for \
                   this Python code:\n\n\
                   ```python\n\
                   {{code}}\n\
                   ```\n\n\
                   Requirements that need to be tested:\n\
                   {{parsed_requirements}}\n\n\
                   Important:\n\
                   - Create at least 10 test cases using Python's unittest framework\n\
                   - Test all major functionality\n\
                   - Include both positive and negative test cases\n\
                   - Make sure tests are runnable\n\
                   - Write clear test names that explain what is being tested\n\
                   - Include all necessary imports\n\n\
                   Provide ONLY the Python test code, no explanations before or after.",
    }
}
