//! Prompt text for component summaries.

use std::fmt::Write as _;
use std::path::Path;

/// System instruction for summary requests.
pub const SUMMARY_SYSTEM_PROMPT: &str =
    "You are an AI assistant specialized in summarizing code files.";

/// Returns `true` if a file looks like a test program: "test" in its name
/// and "main" somewhere in its content, both case-insensitive.
#[must_use]
pub fn is_probable_test(path: &Path, content: &str) -> bool {
    let name = crate::project::file_name(path).to_lowercase();
    name.contains("test") && content.to_lowercase().contains("main")
}

/// Joins member contents behind a header naming every member file.
#[must_use]
pub fn combine_contents(file_names: &[String], contents: &[String]) -> String {
    format!("/* Combined files: {} */\n\n{}", file_names.join(", "), contents.join("\n\n"))
}

/// Builds the summary prompt for one component.
#[must_use]
pub fn build_summary_prompt(
    file_names: &[String],
    combined_content: &str,
    project_overview: &str,
    is_test: bool,
) -> String {
    let mut prompt = String::new();
    let _ = write!(prompt, "Here is an overview of the project structure:\n{project_overview}\n\n");

    if let [only] = file_names {
        let _ = write!(prompt, "The following is a code file named {only}.\n\n");
    } else {
        let _ = write!(prompt, "The following are code files named {}.\n\n", file_names.join(", "));
    }

    prompt.push_str(
        "Please provide a detailed summary. Start with a brief overview, then describe the public \
         interface in detail, and finally explain the inner workings of the file(s), including how \
         the code is implemented. Structure it into 5 sections: 1. Filename 2. Summary \
         3. Public Interface 4. Implementation 5. The relevance score.\n\
         After the summary, always assign a relevance score from 1 to 10 indicating its importance \
         to the overall project (1 being not important, 10 being critically important). Be \
         critical and assign lower scores unless the file(s) are crucial to the main functionality \
         of the project. The main file itself should always have a score of 10. \
         Format the relevance score like this: [Relevance score: 7].\n\n",
    );
    prompt.push_str(combined_content);

    if is_test {
        prompt.push_str("\n\nNote: This file appears to be a test file.");
    }
    prompt
}
