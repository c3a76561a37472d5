use chrono::NaiveDate;
use regex::Regex;

use crate::models::TaskCategory;

#[derive(Debug, PartialEq)]
pub struct ParsedTask {
    pub title: String,
    pub category: Option<TaskCategory>,
    pub due_date: Option<NaiveDate>,
}

/// Pulls `#category` and `@YYYY-MM-DD` tokens out of a task title. The
/// first valid token of each kind wins. Recognized category tokens and
/// anything date-shaped are stripped from the title; a `#word` that is not
/// a category stays in the title.
pub fn parse_task_input(input: &str) -> ParsedTask {
    let category_re = Regex::new(r"#([A-Za-z]+)\s*").unwrap();
    let date_re = Regex::new(r"@(\d{4}-\d{2}-\d{2})\s*").unwrap();

    let mut category = None;

    // Category
    for caps in category_re.captures_iter(input) {
        if let Some(word) = caps.get(1) {
            if let Some(parsed) = TaskCategory::parse(word.as_str()) {
                if category.is_none() {
                    category = Some(parsed);
                }
            }
        }
    }

    let mut due_date = None;

    // Due date
    for caps in date_re.captures_iter(input) {
        if let Some(date_match) = caps.get(1) {
            if let Ok(date) = NaiveDate::parse_from_str(date_match.as_str(), "%Y-%m-%d") {
                if due_date.is_none() {
                    due_date = Some(date);
                }
            }
        }
    }

    let title = category_re.replace_all(input, |caps: &regex::Captures| {
        if TaskCategory::parse(&caps[1]).is_some() {
            String::new()
        } else {
            caps[0].to_string()
        }
    });
    let title = date_re.replace_all(&title, "").to_string();

    let title = Regex::new(r"\s+")
        .unwrap()
        .replace_all(&title, " ")
        .trim()
        .to_string();

    ParsedTask {
        title,
        category,
        due_date,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_category_in_middle() {
        let input = "Update #work software documentation";
        let expected = ParsedTask {
            title: "Update software documentation".to_string(),
            category: Some(TaskCategory::Work),
            due_date: None,
        };
        let result = parse_task_input(input);
        assert_eq!(result, expected);
    }

    #[test]
    fn test_parse_with_extra_spaces_after_category() {
        let input = "Book checkup #health    next week";
        let expected = ParsedTask {
            title: "Book checkup next week".to_string(),
            category: Some(TaskCategory::Health),
            due_date: None,
        };
        let result = parse_task_input(input);
        assert_eq!(result, expected);
    }

    #[test]
    fn test_parse_with_multiple_categories_first_wins() {
        let input = "  #finance  #work Review    quarterly budget ";
        let expected = ParsedTask {
            title: "Review quarterly budget".to_string(),
            category: Some(TaskCategory::Finance),
            due_date: None,
        };
        let result = parse_task_input(input);
        assert_eq!(result, expected);
    }

    #[test]
    fn test_parse_keeps_unknown_hash_word_in_title() {
        let input = "Fix the #flaky test";
        let expected = ParsedTask {
            title: "Fix the #flaky test".to_string(),
            category: None,
            due_date: None,
        };
        let result = parse_task_input(input);
        assert_eq!(result, expected);
    }

    #[test]
    fn test_parse_with_due_date_at_end() {
        let input = "File tax return @2026-09-15   ";
        let expected = ParsedTask {
            title: "File tax return".to_string(),
            category: None,
            due_date: NaiveDate::from_ymd_opt(2026, 9, 15),
        };
        let result = parse_task_input(input);
        assert_eq!(result, expected);
    }

    #[test]
    fn test_parse_strips_impossible_date_but_sets_none() {
        let input = "Plan trip @2026-13-40 with the family";
        let expected = ParsedTask {
            title: "Plan trip with the family".to_string(),
            category: None,
            due_date: None,
        };
        let result = parse_task_input(input);
        assert_eq!(result, expected);
    }

    #[test]
    fn test_parse_with_category_and_due_date() {
        let input = "#shopping Buy groceries @2026-08-08";
        let expected = ParsedTask {
            title: "Buy groceries".to_string(),
            category: Some(TaskCategory::Shopping),
            due_date: NaiveDate::from_ymd_opt(2026, 8, 8),
        };
        let result = parse_task_input(input);
        assert_eq!(result, expected);
    }

    #[test]
    fn test_parse_plain_title_is_untouched() {
        let input = "Water the plants";
        let expected = ParsedTask {
            title: "Water the plants".to_string(),
            category: None,
            due_date: None,
        };
        let result = parse_task_input(input);
        assert_eq!(result, expected);
    }
}
