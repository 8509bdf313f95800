//! The table of request cases
//!
//! Each row fixes a method, path, optional JSON body, and the status code
//! the service is expected to return. Response bodies are checked against
//! the golden file named after the case.

#![allow(dead_code)]

use crate::http::HttpRequest;
use crate::models::TestCase;

/// A single row of the request table
#[derive(Clone, Copy, Debug)]
pub struct RequestCase {
    pub case: TestCase,
    pub method: &'static str,
    pub path: &'static str,
    pub body: Option<&'static str>,
    pub expected_status: u16,
}

impl RequestCase {
    /// Build the HTTP request for this row
    pub fn request(&self) -> HttpRequest {
        let mut request = HttpRequest::new(self.method, self.path);
        if let Some(body) = self.body {
            request = request.json_body(body);
        }
        request
    }

    /// Golden file stem for this row
    pub fn golden_name(&self) -> &'static str {
        self.case.golden_name()
    }
}

/// The full table, in execution order.
///
/// Rows are order-dependent: creates and deletes change the user set that
/// later reads observe, so the reads run against seed data first.
pub fn all_cases() -> Vec<RequestCase> {
    vec![
        RequestCase {
            case: TestCase::ListUsers,
            method: "GET",
            path: "/users",
            body: None,
            expected_status: 200,
        },
        RequestCase {
            case: TestCase::GetUser,
            method: "GET",
            path: "/users/1",
            body: None,
            expected_status: 200,
        },
        RequestCase {
            case: TestCase::GetUserMissing,
            method: "GET",
            path: "/users/9999",
            body: None,
            expected_status: 404,
        },
        RequestCase {
            case: TestCase::CreateUser,
            method: "POST",
            path: "/users",
            body: Some(r#"{"name":"Dana Whitfield","email":"dana@example.com"}"#),
            expected_status: 201,
        },
        RequestCase {
            case: TestCase::CreateUserInvalid,
            method: "POST",
            path: "/users",
            body: Some(r#"{"email":"nobody@example.com"}"#),
            expected_status: 400,
        },
        RequestCase {
            case: TestCase::UpdateUser,
            method: "PUT",
            path: "/users/2",
            body: Some(r#"{"name":"Bob T. Tran","email":"bob.tran@example.com"}"#),
            expected_status: 200,
        },
        RequestCase {
            case: TestCase::UpdateUserMissing,
            method: "PUT",
            path: "/users/9999",
            body: Some(r#"{"name":"Nobody","email":"nobody@example.com"}"#),
            expected_status: 404,
        },
        RequestCase {
            case: TestCase::DeleteUser,
            method: "DELETE",
            path: "/users/3",
            body: None,
            expected_status: 200,
        },
        RequestCase {
            case: TestCase::DeleteUserMissing,
            method: "DELETE",
            path: "/users/9999",
            body: None,
            expected_status: 404,
        },
    ]
}

/// Look up the table row for a test case
pub fn case_row(case: TestCase) -> RequestCase {
    all_cases()
        .into_iter()
        .find(|row| row.case == case)
        .expect("every TestCase has a table row")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_covers_every_case() {
        let rows = all_cases();
        assert_eq!(rows.len(), TestCase::all().len());
        for case in TestCase::all() {
            assert_eq!(case_row(case).case, case);
        }
    }

    #[test]
    fn test_table_order_matches_case_numbers() {
        let rows = all_cases();
        for (i, row) in rows.iter().enumerate() {
            assert_eq!(row.case.number() as usize, i + 1);
        }
    }

    #[test]
    fn test_mutating_rows_carry_json_bodies() {
        for row in all_cases() {
            match row.method {
                "POST" | "PUT" => {
                    assert!(row.body.is_some(), "{} row is missing a body", row.case)
                }
                _ => assert!(row.body.is_none()),
            }
        }
    }

    #[test]
    fn test_expected_statuses_are_the_fixed_set() {
        for row in all_cases() {
            assert!(matches!(row.expected_status, 200 | 201 | 400 | 404));
        }
    }

    #[test]
    fn test_request_builds_with_content_type() {
        let row = case_row(TestCase::CreateUser);
        let request = row.request();
        assert_eq!(request.method, "POST");
        assert_eq!(
            request.headers.get("Content-Type").map(String::as_str),
            Some("application/json")
        );
    }
}
