//! Prompt builders for the generation and modification pipelines.
//!
//! The text here is content, not architecture: both prompts demand one JSON
//! object (path -> complete file text) as the entire reply, because that is
//! what the extractor recovers on the way back.

use crate::models::FileMap;

/// Prompt for generating a fresh project. No prior project context; this is
/// a clean build from the description and feature list alone.
pub fn generation_prompt(description: &str, features: &str) -> String {
    format!(
        r#"Generate a React application as a complete set of source files.

Application description: {description}

Features: {features}

Rules:
- Each component or page lives in its own file, exported as
  `export default function ComponentName() {{ ... }}`.
- Do not generate any index.js or index.html file.
- Place App.js and App.css directly at the project root, not under src/.
- When components reference images, use valid example URLs.
- The application must be responsive.
- Do not use any external packages.

Structure the reply as a single valid JSON object:
- each key is a file path,
- each value is the complete content of that file.

Reply with raw, valid JSON only."#
    )
}

/// Prompt for modifying an existing project.
///
/// The entire current file mapping is embedded, every file, not a diff.
/// The extractor reconstructs a complete mapping from the reply, so the
/// model has to see the complete prior state to reproduce unmodified files
/// verbatim.
pub fn modification_prompt(user_message: &str, current_project: &FileMap) -> String {
    let mut project_context = String::new();
    for (path, content) in current_project {
        project_context.push_str(&format!("\n--- {path} ---\n{content}\n"));
    }

    format!(
        r#"Modify the existing React project according to this user request: "{user_message}"

CURRENT PROJECT, COMPLETE:
{project_context}

Modification rules:
- ALWAYS return the COMPLETE project with ALL files.
- Apply ONLY the changes the user asked for.
- Keep every other file EXACTLY as it is.
- For colors/themes: adjust the relevant stylesheets.
- For logos/images: use emoji or unicode characters when no URL is given.
- For features: add the necessary code without breaking what exists.
- Do not introduce external packages.

Required output structure:
- a single JSON object containing ALL project files, modified AND unmodified,
- each key is a file path, each value is the complete file content.

Do NOT return only the modified files; return the ENTIRE project with the
changes applied. Reply with raw, valid JSON only."#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modification_prompt_embeds_every_file() {
        let mut files = FileMap::new();
        files.insert("/App.js".to_string(), "app code".to_string());
        files.insert("/components/Nav.js".to_string(), "nav code".to_string());

        let prompt = modification_prompt("make it blue", &files);
        assert!(prompt.contains("--- /App.js ---"));
        assert!(prompt.contains("app code"));
        assert!(prompt.contains("--- /components/Nav.js ---"));
        assert!(prompt.contains("nav code"));
        assert!(prompt.contains("make it blue"));
    }
}
