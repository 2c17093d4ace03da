use dom_query::Document;

use crate::core::ExtractedRecord;
use crate::fields::text::page_text;

/// Standing instructions sent as the system turn of every review request.
pub const SYSTEM_INSTRUCTIONS: &str = r#"You are a competitive programming coach who reviews solutions to LeetCode problems for efficiency and clarity.

For each problem and submitted solution:

1. Write the most time- and space-efficient solution you can, in the same language as the submission, with comments describing the approach.

2. Compare the submission with your solution: time complexity, space complexity, readability, handling of edge cases, and concrete changes the author could make.

3. Write study notes in markdown: why the optimal approach works, the key insight, pitfalls to avoid, where the submission differs, what it does well, and improvements with code samples.

4. Name 3 or 4 specific topics worth reviewing to master similar problems, such as "Two Pointers", "Binary Search" or "Graph - DFS".

Answer with JSON only, in exactly this shape:
{
  "optimalSolution": {
    "code": "...",
    "language": "...",
    "timeComplexity": "O(...)",
    "spaceComplexity": "O(...)"
  },
  "comparison": {
    "userTimeComplexity": "O(...)",
    "userSpaceComplexity": "O(...)",
    "differences": ["..."],
    "strengths": ["..."],
    "improvements": ["..."]
  },
  "notes": "...",
  "topics": ["..."]
}

Keep the tone encouraging; the goal is for the author to learn."#;

const NOT_AVAILABLE: &str = "N/A";

/// Flattens an HTML fragment to one line of text, entities decoded.
#[must_use]
pub fn strip_html(html: &str) -> String {
    let doc = Document::from(html);
    page_text(&doc).split_whitespace().collect::<Vec<_>>().join(" ")
}

/// The user turn for reviewing `record`. `description` overrides the
/// record's own statement when given.
#[must_use]
pub fn build_prompt(record: &ExtractedRecord, description: Option<&str>) -> String {
    let description = description
        .or(record.description_html.as_deref())
        .map_or_else(|| "Not available".to_string(), strip_html);
    let perf = &record.performance;
    let lang = &record.language;

    format!(
        "Problem: {name}
Difficulty: {difficulty}
Language: {lang}

Problem Description:
{description}

User's Solution:
```{fence}
{code}
```

User's Results:
- Status: {status}
- Test Cases: {passed}/{total} passed
- Runtime: {runtime}
- Memory: {memory}

Please review this solution and provide:
1. An optimal solution in {lang}
2. A detailed comparison between the user's solution and the optimal one
3. Study notes with insights and improvements
4. 3-4 specific topics to review

Respond in the JSON format given in your instructions.",
        name = record.problem_name,
        difficulty = record.difficulty,
        fence = lang.to_lowercase(),
        code = record.code,
        status = record.status,
        passed = record.test_cases.passed,
        total = record.test_cases.total,
        runtime = perf.runtime.as_deref().unwrap_or(NOT_AVAILABLE),
        memory = perf.memory.as_deref().unwrap_or(NOT_AVAILABLE),
    )
}

