//! Quick reference content

use sqlwin_core::{CellValue, Column, ResultSet, Row};

/// Tabs of the quick reference page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceTab {
    Syntax,
    Patterns,
    Mistakes,
    Tips,
}

impl ReferenceTab {
    pub fn all() -> &'static [ReferenceTab] {
        &[
            ReferenceTab::Syntax,
            ReferenceTab::Patterns,
            ReferenceTab::Mistakes,
            ReferenceTab::Tips,
        ]
    }

    pub fn slug(&self) -> &'static str {
        match self {
            ReferenceTab::Syntax => "syntax",
            ReferenceTab::Patterns => "patterns",
            ReferenceTab::Mistakes => "mistakes",
            ReferenceTab::Tips => "tips",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ReferenceTab::Syntax => "Syntax",
            ReferenceTab::Patterns => "Common Patterns",
            ReferenceTab::Mistakes => "Mistakes",
            ReferenceTab::Tips => "Tips",
        }
    }

    /// Tab for `slug`, falling back to Syntax
    pub fn from_slug(slug: Option<&str>) -> ReferenceTab {
        slug.and_then(|s| ReferenceTab::all().iter().copied().find(|t| t.slug() == s))
            .unwrap_or(ReferenceTab::Syntax)
    }
}

/// A titled SQL block
#[derive(Debug, Clone, Copy)]
pub struct Snippet {
    pub title: &'static str,
    pub sql: &'static str,
}

/// A common error next to its fix
#[derive(Debug, Clone, Copy)]
pub struct Mistake {
    pub title: &'static str,
    pub wrong: &'static str,
    pub correct: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct Tip {
    pub title: &'static str,
    pub detail: &'static str,
    pub sql: &'static str,
}

pub const SYNTAX: &[Snippet] = &[
    Snippet {
        title: "Basic Window Function Syntax",
        sql: "SELECT
    column1,
    column2,
    WINDOW_FUNCTION() OVER (
        [PARTITION BY column]
        [ORDER BY column [ASC|DESC]]
        [ROWS BETWEEN ... AND ...]
    ) AS window_result
FROM table_name;",
    },
    Snippet {
        title: "Frame Boundaries",
        sql: "ROWS BETWEEN
    UNBOUNDED PRECEDING      -- From first row
    | n PRECEDING            -- n rows before
    | CURRENT ROW
    AND
    CURRENT ROW
    | n FOLLOWING            -- n rows after
    | UNBOUNDED FOLLOWING    -- To last row",
    },
];

/// ROWS counts physical rows, RANGE compares ordering values
pub const ROWS_VS_RANGE: [Snippet; 2] = [
    Snippet {
        title: "ROWS (Physical)",
        sql: "ROWS BETWEEN 5 PRECEDING
AND CURRENT ROW",
    },
    Snippet {
        title: "RANGE (Value-based)",
        sql: "RANGE BETWEEN INTERVAL '7 days' PRECEDING
AND CURRENT ROW",
    },
];

pub const PATTERNS: &[Snippet] = &[
    Snippet {
        title: "Running Total Pattern",
        sql: "SELECT
    date,
    amount,
    SUM(amount) OVER (
        ORDER BY date
        ROWS BETWEEN UNBOUNDED PRECEDING AND CURRENT ROW
    ) as running_total
FROM transactions;",
    },
    Snippet {
        title: "Top N Per Group Pattern",
        sql: "SELECT * FROM (
    SELECT
        *,
        ROW_NUMBER() OVER (
            PARTITION BY department
            ORDER BY salary DESC
        ) as rank
    FROM employees
) ranked
WHERE rank <= 3;",
    },
    Snippet {
        title: "Comparison to Group Average Pattern",
        sql: "SELECT
    name,
    value,
    AVG(value) OVER (PARTITION BY group) as avg,
    value - AVG(value) OVER (PARTITION BY group) as diff
FROM data;",
    },
    Snippet {
        title: "Month-over-Month Change Pattern",
        sql: "SELECT
    month,
    revenue,
    LAG(revenue) OVER (ORDER BY month) as prev_revenue,
    revenue - LAG(revenue) OVER (ORDER BY month) as change,
    ROUND(100.0 * (revenue - LAG(revenue) OVER (ORDER BY month))
        / LAG(revenue) OVER (ORDER BY month), 2) as pct_change
FROM monthly_data;",
    },
];

pub const MISTAKES: &[Mistake] = &[
    Mistake {
        title: "Mistake 1: Missing ORDER BY",
        wrong: "SELECT
    SUM(salary) OVER (
        PARTITION BY department
    )
FROM employees;
-- Returns department total, not running total!",
        correct: "SELECT
    SUM(salary) OVER (
        PARTITION BY department
        ORDER BY employee_id
        ROWS BETWEEN UNBOUNDED PRECEDING
            AND CURRENT ROW
    )
FROM employees;
-- Returns running total",
    },
    Mistake {
        title: "Mistake 2: Wrong Frame for LAST_VALUE()",
        wrong: "SELECT
    LAST_VALUE(salary) OVER (
        PARTITION BY department
        ORDER BY employee_id
    )
-- Returns current or next row only!",
        correct: "SELECT
    LAST_VALUE(salary) OVER (
        PARTITION BY department
        ORDER BY employee_id
        ROWS BETWEEN UNBOUNDED PRECEDING
            AND UNBOUNDED FOLLOWING
    )
-- Returns actual last value",
    },
    Mistake {
        title: "Mistake 3: Using Window Function in GROUP BY",
        wrong: "SELECT
    department,
    ROW_NUMBER() OVER (...) as num
FROM employees
GROUP BY department
-- Error! Can't use window in GROUP BY",
        correct: "WITH ranked AS (
    SELECT
        department,
        salary,
        ROW_NUMBER() OVER (...) as num
    FROM employees
)
SELECT * FROM ranked
-- Use CTE first",
    },
];

pub const TIPS: &[Tip] = &[
    Tip {
        title: "Index Partition Columns",
        detail: "Create index on columns used in PARTITION BY",
        sql: "CREATE INDEX idx_dept_id ON employees(department, employee_id);",
    },
    Tip {
        title: "Check Execution Plan",
        detail: "Understand query performance",
        sql: "EXPLAIN SELECT ... FROM employees WHERE ...;",
    },
    Tip {
        title: "Materialize Complex Results",
        detail: "Store intermediate results",
        sql: "CREATE TEMP TABLE ranked_data AS
SELECT *, ROW_NUMBER() OVER (...) FROM ...;",
    },
    Tip {
        title: "Use Specific Frames",
        detail: "Narrow frames perform better",
        sql: "-- Better: Specific frame
ROWS BETWEEN 10 PRECEDING AND CURRENT ROW
-- Instead of: Full frame
ROWS BETWEEN UNBOUNDED PRECEDING AND UNBOUNDED FOLLOWING",
    },
    Tip {
        title: "Reuse Window Definitions",
        detail: "Use WINDOW clause (some SQL dialects)",
        sql: "SELECT *,
    ROW_NUMBER() OVER w as rn,
    RANK() OVER w as rank
FROM employees
WINDOW w AS (PARTITION BY department ORDER BY salary DESC);",
    },
];

const USE_CASES: &[(&str, &str)] = &[
    ("Get running total", "SUM + ORDER BY + ROWS"),
    ("Top N per group", "ROW_NUMBER + PARTITION BY"),
    ("Compare individuals to group", "AVG + PARTITION BY"),
    ("Date-over-date change", "LAG or LEAD"),
    ("Rank with gaps on ties", "RANK()"),
    ("Rank without gaps", "DENSE_RANK()"),
    ("Divide into quartiles", "NTILE(4)"),
    ("Get previous row value", "LAG()"),
    ("Access first value", "FIRST_VALUE()"),
    ("Complex relative position", "NTH_VALUE()"),
];

/// The "when to use which function" table
pub fn use_case_table() -> ResultSet {
    let rows = USE_CASES
        .iter()
        .map(|(case, function)| Row::new(vec![CellValue::from(*case), CellValue::from(*function)]))
        .collect();
    ResultSet::new(vec![Column::new("Use Case"), Column::new("Function")], rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_fallback() {
        assert_eq!(ReferenceTab::from_slug(Some("tips")), ReferenceTab::Tips);
        assert_eq!(ReferenceTab::from_slug(Some("nonsense")), ReferenceTab::Syntax);
        assert_eq!(ReferenceTab::from_slug(None), ReferenceTab::Syntax);
    }

    #[test]
    fn test_use_case_table() {
        let table = use_case_table();
        assert_eq!(table.row_count(), 10);
        assert_eq!(table.column_names(), vec!["Use Case", "Function"]);
        assert_eq!(
            table.value(6, "function"),
            Some(&CellValue::Text("NTILE(4)".into()))
        );
    }

    #[test]
    fn test_every_mistake_has_both_sides() {
        for mistake in MISTAKES {
            assert!(!mistake.wrong.is_empty() && !mistake.correct.is_empty());
            assert_ne!(mistake.wrong, mistake.correct);
        }
    }
}
