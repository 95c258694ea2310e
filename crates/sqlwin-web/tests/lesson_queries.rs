use sqlwin_engine::QueryRunner;
use sqlwin_web::lessons::{self, Section, CUSTOM_EXAMPLES, DEFAULT_CUSTOM_QUERY};

fn runner() -> QueryRunner {
    QueryRunner::with_standard_catalog().unwrap()
}

#[test]
fn every_lesson_example_runs_and_returns_rows() {
    let runner = runner();
    for (section, lesson, example) in lessons::all_examples() {
        let result = runner.execute(example.sql).unwrap_or_else(|e| {
            panic!("{:?}/{} '{}' failed: {}", section, lesson.slug, example.title, e)
        });
        assert!(!result.is_empty(), "{:?}/{} returned no rows", section, lesson.slug);
    }
}

#[test]
fn custom_page_snippets_run() {
    let runner = runner();
    for example in CUSTOM_EXAMPLES {
        let result = runner.execute(example.sql).unwrap();
        assert!(!result.is_empty(), "{}", example.title);
    }
    let result = runner.execute(DEFAULT_CUSTOM_QUERY).unwrap();
    assert_eq!(result.row_count(), 10);
    assert_eq!(
        result.column_names(),
        vec!["employee_name", "department", "salary", "avg_salary"]
    );
}

#[test]
fn top_three_per_region_keeps_at_most_three() {
    let runner = runner();
    let top = CUSTOM_EXAMPLES
        .iter()
        .find(|e| e.title.starts_with("Top 3"))
        .unwrap();
    let result = runner.execute(top.sql).unwrap();
    for region in ["North", "South", "East", "West"] {
        let count = result
            .column_values("region")
            .unwrap()
            .iter()
            .filter(|v| v.as_str() == Some(region))
            .count();
        assert!(count <= 3, "{} has {} rows", region, count);
    }
}

#[test]
fn second_highest_salary_per_department() {
    let runner = runner();
    let lesson = lessons::find_lesson(Section::Analytical, Some("nth-value")).unwrap();
    let result = runner.execute(lesson.examples[0].sql).unwrap();
    // Every department has at least two employees
    assert_eq!(result.row_count(), 4);
}

#[test]
fn ntile_lesson_spreads_orders_over_four_quartiles() {
    let runner = runner();
    let lesson = lessons::find_lesson(Section::Ranking, Some("ntile")).unwrap();
    let result = runner.execute(lesson.examples[0].sql).unwrap();
    let quartiles: Vec<i64> = result
        .column_values("quartile")
        .unwrap()
        .into_iter()
        .filter_map(|v| v.as_i64())
        .collect();
    assert_eq!(quartiles.len(), 20);
    assert!(quartiles.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(quartiles.first(), Some(&1));
    assert_eq!(quartiles.last(), Some(&4));
}
