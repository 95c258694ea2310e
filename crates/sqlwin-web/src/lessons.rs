//! Lesson catalog: sections, tabs and the canned example queries
//!
//! Every example here runs against the sample tables; the integration tests
//! execute all of them.

use serde::Serialize;

/// A top-level page of the cheat sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Home,
    Aggregate,
    Ranking,
    Analytical,
    SampleData,
    CustomQuery,
    QuickReference,
}

impl Section {
    /// All sections in navigation order
    pub fn all() -> &'static [Section] {
        &[
            Section::Home,
            Section::Aggregate,
            Section::Ranking,
            Section::Analytical,
            Section::SampleData,
            Section::CustomQuery,
            Section::QuickReference,
        ]
    }

    pub fn slug(&self) -> &'static str {
        match self {
            Section::Home => "home",
            Section::Aggregate => "aggregate",
            Section::Ranking => "ranking",
            Section::Analytical => "analytical",
            Section::SampleData => "sample-data",
            Section::CustomQuery => "custom",
            Section::QuickReference => "reference",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Section> {
        Section::all().iter().copied().find(|s| s.slug() == slug)
    }

    pub fn title(&self) -> &'static str {
        match self {
            Section::Home => "Home",
            Section::Aggregate => "Aggregate Functions",
            Section::Ranking => "Ranking Functions",
            Section::Analytical => "Analytical Functions",
            Section::SampleData => "Sample Data",
            Section::CustomQuery => "Custom Query",
            Section::QuickReference => "Quick Reference",
        }
    }

    /// Route of the section page
    pub fn path(&self) -> &'static str {
        match self {
            Section::Home => "/",
            Section::Aggregate => "/aggregate",
            Section::Ranking => "/ranking",
            Section::Analytical => "/analytical",
            Section::SampleData => "/sample-data",
            Section::CustomQuery => "/custom",
            Section::QuickReference => "/reference",
        }
    }

    /// Page header for the function sections
    pub fn header(&self) -> &'static str {
        match self {
            Section::Home => "Welcome to Window Functions Cheat Sheet!",
            Section::Aggregate => "Aggregate Window Functions",
            Section::Ranking => "Ranking Window Functions",
            Section::Analytical => "Analytical Window Functions",
            Section::SampleData => "Sample Datasets",
            Section::CustomQuery => "Custom Query Runner",
            Section::QuickReference => "Quick Reference Guide",
        }
    }

    pub fn subtitle(&self) -> Option<&'static str> {
        match self {
            Section::Aggregate => Some("Functions that perform calculations: SUM, AVG, COUNT, MIN, MAX"),
            Section::Ranking => {
                Some("Functions for ranking: ROW_NUMBER, RANK, DENSE_RANK, NTILE, PERCENT_RANK")
            }
            Section::Analytical => Some(
                "Functions for accessing relative rows: LAG, LEAD, FIRST_VALUE, LAST_VALUE, NTH_VALUE",
            ),
            Section::SampleData => Some("Preview the databases used in all examples"),
            Section::CustomQuery => Some("Write your own SQL queries using the sample tables available"),
            Section::Home | Section::QuickReference => None,
        }
    }
}

/// A canned query with its caption
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Example {
    pub title: &'static str,
    pub sql: &'static str,
}

/// One tab of a function section
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Lesson {
    pub slug: &'static str,
    pub tab: &'static str,
    pub heading: &'static str,
    pub key_point: Option<&'static str>,
    pub syntax: Option<&'static str>,
    pub examples: &'static [Example],
}

/// A function family shown as a card on the home page
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Category {
    pub name: &'static str,
    pub color: &'static str,
    pub functions: &'static [&'static str],
    pub description: &'static str,
    pub section: Section,
}

pub const CATEGORIES: &[Category] = &[
    Category {
        name: "Aggregate",
        color: "#e80c0c",
        functions: &["SUM", "AVG", "COUNT", "MIN", "MAX"],
        description: "Calculate aggregates within windows",
        section: Section::Aggregate,
    },
    Category {
        name: "Ranking",
        color: "#312279",
        functions: &["ROW_NUMBER", "RANK", "DENSE_RANK", "NTILE", "PERCENT_RANK"],
        description: "Rank and position rows",
        section: Section::Ranking,
    },
    Category {
        name: "Analytical",
        color: "#3fb433",
        functions: &["LAG", "LEAD", "FIRST_VALUE", "LAST_VALUE", "NTH_VALUE"],
        description: "Access relative row values",
        section: Section::Analytical,
    },
];

const AGGREGATE: &[Lesson] = &[
    Lesson {
        slug: "sum",
        tab: "SUM()",
        heading: "SUM() - Running Total & Department Sum",
        key_point: None,
        syntax: Some("SUM(column) OVER ([PARTITION BY ...] [ORDER BY ...] [ROWS BETWEEN ...])"),
        examples: &[
            Example {
                title: "Running Total by Department",
                sql: "SELECT
    employee_id,
    employee_name,
    department,
    salary,
    SUM(salary) OVER (
        PARTITION BY department
        ORDER BY employee_id
        ROWS BETWEEN UNBOUNDED PRECEDING AND CURRENT ROW
    ) AS running_total
FROM employees
ORDER BY department, employee_id;",
            },
            Example {
                title: "Total Department Salary",
                sql: "SELECT
    employee_id,
    employee_name,
    department,
    salary,
    SUM(salary) OVER (PARTITION BY department) AS dept_total
FROM employees
ORDER BY department, salary DESC;",
            },
        ],
    },
    Lesson {
        slug: "avg",
        tab: "AVG()",
        heading: "AVG() - Average with Comparison",
        key_point: None,
        syntax: Some("AVG(column) OVER ([PARTITION BY ...] [ORDER BY ...])"),
        examples: &[Example {
            title: "Compare to Department Average",
            sql: "SELECT
    employee_name,
    department,
    salary,
    ROUND(AVG(salary) OVER (PARTITION BY department), 2) AS dept_avg,
    ROUND(salary - AVG(salary) OVER (PARTITION BY department), 2) AS diff_from_avg
FROM employees
ORDER BY department, salary DESC;",
        }],
    },
    Lesson {
        slug: "count",
        tab: "COUNT()",
        heading: "COUNT() - Order Count per Customer",
        key_point: None,
        syntax: Some("COUNT(column) OVER ([PARTITION BY ...] [ORDER BY ...])"),
        examples: &[Example {
            title: "Orders per Customer",
            sql: "SELECT
    order_id,
    customer_id,
    customer_name,
    order_amount,
    COUNT(*) OVER (PARTITION BY customer_id) AS customer_order_count,
    ROUND(AVG(order_amount) OVER (PARTITION BY customer_id), 2) AS avg_order_amount
FROM orders
ORDER BY customer_id, order_date;",
        }],
    },
    Lesson {
        slug: "min-max",
        tab: "MIN()/MAX()",
        heading: "MIN() / MAX() - Range Analysis",
        key_point: None,
        syntax: Some("MIN(column) OVER (...) / MAX(column) OVER (...)"),
        examples: &[Example {
            title: "Salary Range by Department",
            sql: "SELECT
    employee_name,
    department,
    salary,
    MAX(salary) OVER (PARTITION BY department) AS max_salary,
    MIN(salary) OVER (PARTITION BY department) AS min_salary,
    MAX(salary) OVER (PARTITION BY department) - salary AS gap_to_max
FROM employees
ORDER BY department, salary DESC;",
        }],
    },
    Lesson {
        slug: "combined",
        tab: "Combined",
        heading: "Combined Aggregates - Comprehensive Analysis",
        key_point: None,
        syntax: None,
        examples: &[Example {
            title: "Department Summary",
            sql: "SELECT
    department,
    employee_name,
    salary,
    COUNT(*) OVER (PARTITION BY department) AS emp_count,
    SUM(salary) OVER (PARTITION BY department) AS total_salary,
    ROUND(AVG(salary) OVER (PARTITION BY department), 2) AS avg_salary,
    MAX(salary) OVER (PARTITION BY department) AS max_salary,
    MIN(salary) OVER (PARTITION BY department) AS min_salary
FROM employees
ORDER BY department, salary DESC;",
        }],
    },
];

const RANKING: &[Lesson] = &[
    Lesson {
        slug: "row-number",
        tab: "ROW_NUMBER()",
        heading: "ROW_NUMBER() - Unique Sequential Numbering",
        key_point: Some("Always returns unique numbers, even for ties"),
        syntax: Some("ROW_NUMBER() OVER ([PARTITION BY ...] ORDER BY ...)"),
        examples: &[Example {
            title: "Top Performers per Department",
            sql: "SELECT
    ROW_NUMBER() OVER (PARTITION BY department ORDER BY salary DESC) AS rank,
    employee_name,
    department,
    salary
FROM employees
ORDER BY department, rank;",
        }],
    },
    Lesson {
        slug: "rank",
        tab: "RANK()",
        heading: "RANK() - Ranking with Gaps on Ties",
        key_point: Some("Has gaps when there are tied values"),
        syntax: Some("RANK() OVER ([PARTITION BY ...] ORDER BY ...)"),
        examples: &[Example {
            title: "Sales Amount Ranking by Region",
            sql: "SELECT
    RANK() OVER (PARTITION BY region ORDER BY amount DESC) AS rank,
    product,
    region,
    amount
FROM sales
ORDER BY region, rank;",
        }],
    },
    Lesson {
        slug: "dense-rank",
        tab: "DENSE_RANK()",
        heading: "DENSE_RANK() - Consecutive Ranking",
        key_point: Some("No gaps in ranking, consecutive numbers even with ties"),
        syntax: Some("DENSE_RANK() OVER ([PARTITION BY ...] ORDER BY ...)"),
        examples: &[Example {
            title: "Dense Ranking by Product",
            sql: "SELECT
    DENSE_RANK() OVER (PARTITION BY product ORDER BY amount DESC) AS rank,
    product,
    region,
    amount
FROM sales
ORDER BY product, rank;",
        }],
    },
    Lesson {
        slug: "ntile",
        tab: "NTILE()",
        heading: "NTILE() - Divide into N Groups",
        key_point: Some("Divides rows into N equal (or near-equal) groups"),
        syntax: Some("NTILE(n) OVER ([PARTITION BY ...] ORDER BY ...)"),
        examples: &[Example {
            title: "Quartile Analysis - Sales by Quartile",
            sql: "SELECT
    NTILE(4) OVER (ORDER BY order_amount DESC) AS quartile,
    customer_name,
    order_amount
FROM orders
ORDER BY quartile, order_amount DESC;",
        }],
    },
    Lesson {
        slug: "percent-rank",
        tab: "PERCENT_RANK()",
        heading: "PERCENT_RANK() - Percentile Ranking (0-1)",
        key_point: Some("Returns value between 0 and 1 representing percentile"),
        syntax: Some("PERCENT_RANK() OVER ([PARTITION BY ...] ORDER BY ...)"),
        examples: &[Example {
            title: "Salary Percentile by Department",
            sql: "SELECT
    employee_name,
    department,
    salary,
    ROUND(PERCENT_RANK() OVER (PARTITION BY department ORDER BY salary), 4) AS pct_rank,
    ROUND(PERCENT_RANK() OVER (PARTITION BY department ORDER BY salary) * 100, 2) AS pct
FROM employees
ORDER BY department, salary;",
        }],
    },
];

const ANALYTICAL: &[Lesson] = &[
    Lesson {
        slug: "lag",
        tab: "LAG()",
        heading: "LAG() - Access Previous Row",
        key_point: None,
        syntax: Some("LAG(column, offset, default_value) OVER ([PARTITION BY ...] ORDER BY ...)"),
        examples: &[Example {
            title: "Order-over-Order Comparison",
            sql: "SELECT
    order_id,
    customer_name,
    order_amount,
    LAG(order_amount) OVER (PARTITION BY customer_id ORDER BY order_id) AS prev_order,
    order_amount - LAG(order_amount) OVER (PARTITION BY customer_id ORDER BY order_id) AS change
FROM orders
ORDER BY customer_id, order_id;",
        }],
    },
    Lesson {
        slug: "lead",
        tab: "LEAD()",
        heading: "LEAD() - Access Next Row",
        key_point: None,
        syntax: Some("LEAD(column, offset, default_value) OVER ([PARTITION BY ...] ORDER BY ...)"),
        examples: &[Example {
            title: "Next Sale Prediction",
            sql: "SELECT
    sale_id,
    product,
    amount,
    LEAD(amount) OVER (PARTITION BY product ORDER BY sale_id) AS next_amount,
    LEAD(sale_date) OVER (PARTITION BY product ORDER BY sale_id) AS next_date
FROM sales
ORDER BY product, sale_id;",
        }],
    },
    Lesson {
        slug: "first-value",
        tab: "FIRST_VALUE()",
        heading: "FIRST_VALUE() - First Row Value",
        key_point: None,
        syntax: Some("FIRST_VALUE(column) OVER ([PARTITION BY ...] ORDER BY ... [ROWS ...])"),
        examples: &[Example {
            title: "Compare to First Order",
            sql: "SELECT
    order_id,
    customer_name,
    order_amount,
    FIRST_VALUE(order_amount) OVER (
        PARTITION BY customer_id
        ORDER BY order_id
    ) AS first_order,
    order_amount - FIRST_VALUE(order_amount) OVER (
        PARTITION BY customer_id
        ORDER BY order_id
    ) AS growth
FROM orders
ORDER BY customer_id, order_id;",
        }],
    },
    Lesson {
        slug: "last-value",
        tab: "LAST_VALUE()",
        heading: "LAST_VALUE() - Last Row Value (Full Frame Required)",
        key_point: None,
        syntax: Some(
            "LAST_VALUE(column) OVER ([PARTITION BY ...] ORDER BY ...
ROWS BETWEEN UNBOUNDED PRECEDING AND UNBOUNDED FOLLOWING)",
        ),
        examples: &[Example {
            title: "Latest Order Amount",
            sql: "SELECT
    order_id,
    customer_name,
    order_amount,
    LAST_VALUE(order_amount) OVER (
        PARTITION BY customer_id
        ORDER BY order_id
        ROWS BETWEEN UNBOUNDED PRECEDING AND UNBOUNDED FOLLOWING
    ) AS latest_order,
    LAST_VALUE(order_id) OVER (
        PARTITION BY customer_id
        ORDER BY order_id
        ROWS BETWEEN UNBOUNDED PRECEDING AND UNBOUNDED FOLLOWING
    ) AS latest_order_id
FROM orders
ORDER BY customer_id, order_id;",
        }],
    },
    Lesson {
        slug: "nth-value",
        tab: "NTH_VALUE()",
        heading: "NTH_VALUE() - Nth Row Value",
        key_point: None,
        syntax: Some("NTH_VALUE(column, n) OVER ([PARTITION BY ...] ORDER BY ... [ROWS ...])"),
        examples: &[Example {
            title: "Get 2nd Highest Salary per Department",
            sql: "WITH ranked_employees AS (
    SELECT
        department,
        employee_name,
        salary,
        NTH_VALUE(salary, 2) OVER (
            PARTITION BY department
            ORDER BY salary DESC
            ROWS BETWEEN UNBOUNDED PRECEDING AND UNBOUNDED FOLLOWING
        ) AS second_highest_salary,
        NTH_VALUE(employee_name, 2) OVER (
            PARTITION BY department
            ORDER BY salary DESC
            ROWS BETWEEN UNBOUNDED PRECEDING AND UNBOUNDED FOLLOWING
        ) AS second_highest_emp
    FROM employees
)
SELECT DISTINCT
    department,
    second_highest_salary,
    second_highest_emp
FROM ranked_employees
WHERE second_highest_salary IS NOT NULL;",
        }],
    },
];

/// Snippets shown next to the custom query editor
pub const CUSTOM_EXAMPLES: &[Example] = &[
    Example {
        title: "Running Total of Sales Amount",
        sql: "SELECT
    sale_id,
    product,
    amount,
    SUM(amount) OVER (ORDER BY sale_id) AS running_total
FROM sales;",
    },
    Example {
        title: "Top 3 Sales by Region",
        sql: "SELECT * FROM (
    SELECT
        *,
        ROW_NUMBER() OVER (PARTITION BY region ORDER BY amount DESC) AS rn
    FROM sales
) WHERE rn <= 3;",
    },
    Example {
        title: "Moving Average of Sales Amount",
        sql: "SELECT
    sale_id,
    sale_date,
    amount,
    AVG(amount) OVER (
        ORDER BY sale_id
        ROWS BETWEEN 2 PRECEDING AND CURRENT ROW
    ) AS moving_avg
FROM sales;",
    },
];

/// Text the custom query editor starts with
pub const DEFAULT_CUSTOM_QUERY: &str = "SELECT
    employee_name,
    department,
    salary,
    AVG(salary) OVER (PARTITION BY department) AS avg_salary
FROM employees
ORDER BY department, salary DESC;";

/// Tabs of a function section; empty for the other sections
pub fn lessons_for(section: Section) -> &'static [Lesson] {
    match section {
        Section::Aggregate => AGGREGATE,
        Section::Ranking => RANKING,
        Section::Analytical => ANALYTICAL,
        _ => &[],
    }
}

/// Lesson for `tab`, falling back to the first tab of the section
pub fn find_lesson(section: Section, tab: Option<&str>) -> Option<&'static Lesson> {
    let lessons = lessons_for(section);
    tab.and_then(|t| lessons.iter().find(|l| l.slug == t))
        .or_else(|| lessons.first())
}

/// Every canned lesson example, in page order
pub fn all_examples() -> impl Iterator<Item = (Section, &'static Lesson, &'static Example)> {
    Section::all().iter().flat_map(|&section| {
        lessons_for(section)
            .iter()
            .flat_map(move |lesson| lesson.examples.iter().map(move |ex| (section, lesson, ex)))
    })
}
