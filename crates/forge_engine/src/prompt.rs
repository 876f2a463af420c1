//! Natural-language instructions sent to the model.
//!
//! Both prompts ask for Python scraping code whose selectors are XPath
//! expressions; the response shape itself is enforced by the schema in
//! [`crate::schema`].

use std::fmt::Write;

use forge_core::ScrapingRequest;

const TECHNICAL_RULES: &str = "\
[Technical rules]
1. Use Python with requests + lxml. If the site shows clear anti-bot measures or loads its content dynamically, switch to Selenium or Playwright.
2. XPath: never use brittle absolute paths such as /html/body/div[3]/div. Use robust relative paths anchored on attributes, e.g. //div[contains(@class, 'product-price')] or //*[@id='main-title'].
3. Structure: randomize the User-Agent, send realistic request headers and wrap network and parsing steps in thorough try/except handling.
4. Output: respond with valid JSON only.";

/// Prompt for a first generation.
pub fn build_generation_prompt(request: &ScrapingRequest) -> String {
    let mut prompt = String::new();
    prompt.push_str("You are a top-tier Python web scraping expert.\n");
    prompt.push_str("Task: write an extremely precise XPath-based scraping script for the user.\n\n");
    prompt.push_str("[Core goal]\n");
    let _ = writeln!(prompt, "Target URL: {}", request.url);
    let _ = writeln!(prompt, "User requirement: {}", request.requirement);
    prompt.push('\n');

    match &request.html_context {
        Some(html) => {
            prompt.push_str("[Important reference: HTML snippet from the page]\n");
            prompt.push_str(html);
            prompt.push_str(
                "\n(Derive every XPath strictly from this HTML structure; do not invent elements that are not in it.)\n",
            );
        }
        None => {
            let _ = writeln!(
                prompt,
                "[Scraping notes] Use web search to look up the current DOM structure, class names and ids of this site ({}). Do not guess from intuition; find the site's real HTML attributes.",
                request.url
            );
        }
    }

    prompt.push('\n');
    prompt.push_str(TECHNICAL_RULES);
    prompt.push('\n');
    prompt
}

/// Prompt asking for a corrected version of `previous_code`.
pub fn build_regeneration_prompt(
    request: &ScrapingRequest,
    previous_code: &str,
    feedback: &str,
) -> String {
    let mut prompt = String::new();
    prompt.push_str("[Bug fix task]\n");
    prompt.push_str("The user reports that the previous scraping script does not work correctly.\n\n");
    let _ = writeln!(prompt, "Target URL: {}", request.url);
    let _ = writeln!(prompt, "Original requirement: {}", request.requirement);
    if let Some(html) = &request.html_context {
        let _ = writeln!(prompt, "Known HTML structure: {html}");
    }
    prompt.push_str("\nPrevious code:\n```python\n");
    prompt.push_str(previous_code);
    if !previous_code.ends_with('\n') {
        prompt.push('\n');
    }
    prompt.push_str("```\n\n");
    let _ = writeln!(prompt, "The user's description of the problem:\n\"{feedback}\"\n");
    prompt.push_str(
        "Fix the XPath or logic errors precisely according to this feedback. If an XPath matched nothing, use search to verify the site's current real tags.\n\n",
    );
    prompt.push_str(TECHNICAL_RULES);
    prompt.push('\n');
    prompt
}
