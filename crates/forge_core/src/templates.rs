/// A named skeleton of labeled sections for the requirement field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Framework {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub template: &'static str,
}

pub const FRAMEWORKS: &[Framework] = &[
    Framework {
        id: "ICIO",
        name: "ICIO framework",
        description: "General purpose: instruction, context, input, output",
        template: "[Instruction]: Scrape [specific content] from the page\n\
[Context]: This is a [e-commerce/news/social] page; the main goal is [collect data/monitor changes]\n\
[Input]: Locate the region of elements carrying [class name/ID]\n\
[Output]: Emit [field 1, field 2] as [list/JSON/CSV]",
    },
    Framework {
        id: "CRISPE",
        name: "CRISPE framework",
        description: "Professional: capability, role, insight, statement, personality, experiment",
        template: "[Capability & role]: You are a senior Python scraping engineer\n\
[Insight]: The page is [dynamically loaded/statically rendered] and [core component] must be extracted\n\
[Statement]: Write a script using [lxml/Selenium] that extracts [specific fields]\n\
[Personality]: Keep the code concise and highly fault tolerant\n\
[Experiment]: If anti-bot measures appear, apply [proxies/throttling]",
    },
    Framework {
        id: "RESCEF",
        name: "RESCEF framework",
        description: "Comprehensive: role, execution, situation, context, expectation, feedback",
        template: "[Role]: Data collection specialist\n\
[Execution]: Walk the page and extract [target data]\n\
[Situation]: Runs as [high-frequency collection/one-off scrape]\n\
[Context]: A page source snippet is provided in the advanced options [yes/no]\n\
[Expectation]: Produce fully accurate XPath with error handling\n\
[Feedback]: If an XPath cannot be pinned down uniquely, list fallback paths",
    },
];

/// Case-insensitive lookup by framework id.
pub fn find_framework(id: &str) -> Option<&'static Framework> {
    let id = id.trim();
    FRAMEWORKS
        .iter()
        .find(|framework| framework.id.eq_ignore_ascii_case(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_ignores_case_and_whitespace() {
        assert_eq!(find_framework(" crispe ").map(|f| f.id), Some("CRISPE"));
        assert!(find_framework("unknown").is_none());
    }

    #[test]
    fn every_template_has_labeled_sections() {
        for framework in FRAMEWORKS {
            assert!(framework.template.lines().count() >= 4, "{}", framework.id);
            assert!(framework.template.lines().all(|line| line.starts_with('[')));
        }
    }
}
